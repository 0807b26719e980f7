use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::error::SuitterError;

/// Publisher-side limit; checked here so an oversized upload fails before
/// any bytes leave the client.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);
const STORAGE_EPOCHS: u32 = 5;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    newly_created: Option<NewlyCreated>,
    already_certified: Option<AlreadyCertified>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewlyCreated {
    blob_object: BlobObject,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BlobObject {
    blob_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlreadyCertified {
    blob_id: String,
}

/// Client for the decentralized blob-storage network. Blobs are immutable
/// and content-addressed; the aggregator serves them back by blob id.
#[derive(Clone)]
pub struct WalrusClient {
    http: reqwest::Client,
    publisher_url: String,
    aggregator_url: String,
}

impl WalrusClient {
    pub fn new(
        publisher_url: impl Into<String>,
        aggregator_url: impl Into<String>,
    ) -> Result<Self, SuitterError> {
        let http = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            publisher_url: publisher_url.into(),
            aggregator_url: aggregator_url.into(),
        })
    }

    /// Uploads raw bytes, optionally transferring the resulting blob object
    /// to `owner`. Returns the blob id, whether newly stored or already
    /// certified.
    pub async fn put(&self, bytes: Vec<u8>, owner: Option<&str>) -> Result<String, SuitterError> {
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(SuitterError::Blob(format!(
                "Upload of {} bytes exceeds the {} byte publisher limit",
                bytes.len(),
                MAX_UPLOAD_BYTES
            )));
        }

        let mut upload_url = format!("{}/v1/blobs?epochs={}", self.publisher_url, STORAGE_EPOCHS);
        if let Some(owner) = owner {
            upload_url.push_str(&format!("&send_object_to={}", owner));
        }

        let response = self
            .http
            .put(&upload_url)
            .header("Content-Type", "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(|e| SuitterError::Blob(format!("Upload failed: {}", e)))?
            .error_for_status()
            .map_err(|e| SuitterError::Blob(format!("Publisher rejected upload: {}", e)))?;

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| SuitterError::Blob(format!("Malformed publisher response: {}", e)))?;

        upload
            .newly_created
            .map(|n| n.blob_object.blob_id)
            .or(upload.already_certified.map(|a| a.blob_id))
            .ok_or_else(|| SuitterError::Blob("Publisher response has no blob id".to_string()))
    }

    pub fn url(&self, blob_id: &str) -> String {
        format!("{}/v1/blobs/{}", self.aggregator_url, blob_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> WalrusClient {
        WalrusClient::new("https://publisher.example", "https://aggregator.example").unwrap()
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected_locally() {
        let err = client()
            .put(vec![0u8; MAX_UPLOAD_BYTES + 1], None)
            .await
            .unwrap_err();
        assert!(matches!(err, SuitterError::Blob(_)));
    }

    #[test]
    fn blob_url_points_at_the_aggregator() {
        assert_eq!(
            client().url("abc123"),
            "https://aggregator.example/v1/blobs/abc123"
        );
    }

    #[test]
    fn both_publisher_response_shapes_carry_a_blob_id() {
        let created: UploadResponse = serde_json::from_str(
            r#"{"newlyCreated": {"blobObject": {"id": "0x1", "blobId": "b-1"}}}"#,
        )
        .unwrap();
        assert_eq!(created.newly_created.unwrap().blob_object.blob_id, "b-1");

        let certified: UploadResponse =
            serde_json::from_str(r#"{"alreadyCertified": {"blobId": "b-2"}}"#).unwrap();
        assert_eq!(certified.already_certified.unwrap().blob_id, "b-2");
    }
}
