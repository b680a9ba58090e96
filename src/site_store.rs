use std::path::{Component, Path, PathBuf};

use anyhow::Context as _;
use async_trait::async_trait;
use tokio::fs;

/// Destination for generated site files, addressed by site-relative path.
#[async_trait]
pub trait SiteStore: Send + Sync {
    async fn exists(&self, rel_path: &str) -> anyhow::Result<bool>;
    async fn write_text(&self, rel_path: &str, contents: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct LocalFsSiteStore {
    base_dir: PathBuf,
}

impl LocalFsSiteStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, rel_path: &str) -> anyhow::Result<PathBuf> {
        let rel = Path::new(rel_path);
        if rel_path.is_empty() {
            anyhow::bail!("site path must not be empty");
        }
        for component in rel.components() {
            match component {
                Component::Normal(_) => {}
                _ => anyhow::bail!("site path must be relative without '..': {rel_path}"),
            }
        }
        Ok(self.base_dir.join(rel))
    }
}

#[async_trait]
impl SiteStore for LocalFsSiteStore {
    async fn exists(&self, rel_path: &str) -> anyhow::Result<bool> {
        let path = self.resolve(rel_path)?;
        fs::try_exists(&path)
            .await
            .with_context(|| format!("stat: {}", path.display()))
    }

    async fn write_text(&self, rel_path: &str, contents: &str) -> anyhow::Result<()> {
        let path = self.resolve(rel_path)?;
        write_atomic(&path, contents.as_bytes()).await?;
        tracing::debug!(path = %path.display(), "wrote site file");
        Ok(())
    }
}

async fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    fs::create_dir_all(parent)
        .await
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("path has no file name: {}", path.display()))?;
    let tmp_path = parent.join(format!(
        ".{file_name}.tmp.{}",
        uuid::Uuid::new_v4().simple()
    ));
    fs::write(&tmp_path, data)
        .await
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}
