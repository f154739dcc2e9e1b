pub mod config;
pub mod local;
pub mod object_store;

pub use local::LocalDirSink;
pub use object_store::ObjectStoreSink;

/// Durably stores a generated document under its filename. Exactly one
/// write per document, no retries; a failed store surfaces as a failed
/// request.
#[async_trait::async_trait]
pub trait DocumentSink: Send + Sync {
    async fn store(&self, filename: &str, body: &[u8]) -> anyhow::Result<()>;
}
