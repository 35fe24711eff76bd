//! Kernel module - the RemoteStore seam and its implementations.

pub mod client_kernel;
pub mod memory_store;
pub mod test_dependencies;
pub mod traits;

pub use client_kernel::ClientKernel;
pub use memory_store::{DemoAccounts, MemoryStore};
pub use test_dependencies::{MockOp, MockRemoteStore, StoreCall};
pub use traits::*;
