pub mod cli;
pub mod controllers;
pub mod error;
pub mod models;
pub mod views;

// Re-exports for convenience
pub use error::SuitterError;
pub use models::{Config, SuiRpc, SuitterClient};
pub use controllers::{Actions, Scheduler};
