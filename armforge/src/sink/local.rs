use std::path::PathBuf;

use anyhow::Context;
use tokio::{fs::File, io::AsyncWriteExt};

use super::DocumentSink;

/// Writes generated documents into a local output directory.
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait::async_trait]
impl DocumentSink for LocalDirSink {
    #[tracing::instrument(level = "debug", skip(self, body))]
    async fn store(&self, filename: &str, body: &[u8]) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await.with_context(|| {
            format!("could not create output directory: {}", self.dir.display())
        })?;

        // Write next to the final name, then rename, so a failed write never
        // leaves a partial document under the generated name.
        let tmp_path = self.dir.join(format!("{filename}.tmp"));
        let final_path = self.dir.join(filename);

        let mut file = File::create(&tmp_path).await?;
        file.write_all(body).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp_path, &final_path).await?;

        tracing::debug!(path = %final_path.display(), "Stored document.");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_writes_the_body() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LocalDirSink::new(dir.path());

        sink.store("2026_03_01_ARM_0a1b2c3.json", b"{\"ok\": true}\n")
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(
            dir.path().join("2026_03_01_ARM_0a1b2c3.json"),
        )
        .await
        .unwrap();
        assert_eq!(written, "{\"ok\": true}\n");

        // No temp file survives a successful store.
        let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            names.push(entry.file_name());
        }
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn store_creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("inbound");
        let sink = LocalDirSink::new(&nested);

        sink.store("2026_03_01_ARM_0a1b2c3.json", b"{}").await.unwrap();
        assert!(nested.join("2026_03_01_ARM_0a1b2c3.json").exists());
    }
}
