pub mod api;
pub mod bridge;
pub mod completion;
pub mod edit_buffer;
pub mod editor;
pub mod error;
pub mod host;

#[cfg(test)]
pub(crate) mod test_support;

// Convenience re-exports
pub use api::client::JoplinClient;
pub use bridge::{HostBridge, HostRequest, HostResponse, QueryResult};
pub use error::{QuickLinksError, Result};
