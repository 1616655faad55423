pub mod dom_node;
pub mod error;
#[allow(clippy::module_inception)]
pub mod snapshot;

pub use dom_node::DomNode;
pub use error::{ProbeError, SnapshotError};
pub use snapshot::{CapturedPage, DomSnapshot, Snapshot};
