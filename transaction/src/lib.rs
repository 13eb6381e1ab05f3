//! Arbor Transaction
//!
//! The transactional boundary every structural mutation runs inside.
//!
//! Responsibilities:
//! - Apply writes to the graph and record how to undo them
//! - Implement BEGIN/COMMIT/ROLLBACK (rollback on drop when abandoned)
//! - Reject writes inside read-only transactions
//! - Provide read-your-writes access to the graph

mod buffer;
mod error;
mod manager;

pub use buffer::{UndoEntry, UndoLog};
pub use error::{TransactionError, TransactionResult};
pub use manager::{run_in_transaction, Transaction, TransactionMode, TransactionState};
