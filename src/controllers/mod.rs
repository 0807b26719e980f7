pub mod actions;
pub mod scheduler;

pub use actions::{Actions, CallArg, TransactionSpec, TxReceipt, Wallet};
pub use scheduler::{spawn_view, Scheduler, ViewHandle};
