//! Work queue

pub mod sqs;
pub mod traits;

pub use sqs::SqsWorkQueue;
pub use traits::{Lease, WorkQueue};
