pub mod graphviz;

use std::path::Path;

use super::MiningError;

/// Output of a visualizer's `apply` step, consumed by its `save` step.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendering {
    /// Graphviz source, still to be laid out.
    Dot(String),
    /// An encoded PNG image.
    Png(Vec<u8>),
}

/// Write `bytes` to `path`, creating the parent directory when missing.
/// The whole image is in memory before the file is touched.
pub(crate) async fn write_artifact(path: &Path, bytes: &[u8]) -> Result<(), MiningError> {
    if bytes.is_empty() {
        return Err(MiningError::Visualization("renderer produced an empty image".to_string()));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, bytes).await?;
    Ok(())
}
