use std::path::{Path, PathBuf};

pub const DEFAULT_CODE_FILE: &str = "codigo.txt";

/// Writes code-bearing replies to a fixed local file so they can be attached.
///
/// Every save overwrites the same file.
pub struct CodeFileWriter {
    path: PathBuf,
}

impl CodeFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, contents: &str) -> std::io::Result<&Path> {
        tokio::fs::write(&self.path, contents).await?;
        tracing::info!(path = %self.path.display(), bytes = contents.len(), "Saved code file");
        Ok(&self.path)
    }
}

impl Default for CodeFileWriter {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_FILE)
    }
}
