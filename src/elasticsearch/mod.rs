//! Elasticsearch client and operations.

mod bulk;
mod client;
mod schema;
mod store;

pub use bulk::BulkIndexer;
pub use client::EsClient;
pub use schema::create_index;
pub use store::EsStore;

/// A document that can be bulk-indexed under a stable id.
pub trait EsDocument: serde::Serialize {
    fn id(&self) -> &str;
}
