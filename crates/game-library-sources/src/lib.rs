pub mod error;
pub mod fetch;
pub mod rest;
pub mod snapshot;
pub mod traits;

pub use error::BackendError;
pub use fetch::{fetch_library, LibraryData};
pub use rest::RestBackend;
pub use snapshot::{SnapshotBackend, SnapshotStore};
pub use traits::LibraryBackend;
