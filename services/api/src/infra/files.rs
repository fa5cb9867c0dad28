use std::path::PathBuf;

use anyhow::Context as _;

use crate::domain::repository::FileStore;

/// Uploaded files live in a flat local directory; references are URL paths
/// whose last segment is the stored filename.
#[derive(Clone)]
pub struct LocalFileStore {
    pub root: PathBuf,
}

impl FileStore for LocalFileStore {
    async fn remove(&self, reference: &str) -> anyhow::Result<()> {
        let filename = reference
            .rsplit('/')
            .next()
            .filter(|f| !f.is_empty() && !f.contains(".."))
            .context("malformed file reference")?;
        tokio::fs::remove_file(self.root.join(filename))
            .await
            .with_context(|| format!("remove {filename}"))?;
        Ok(())
    }
}
