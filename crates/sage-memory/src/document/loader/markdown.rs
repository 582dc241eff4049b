use std::path::Path;

use super::super::error::DocumentError;

#[derive(Debug, Clone)]
pub struct MarkdownFile {
    pub file_name: String,
    pub content: String,
}

/// Load every `*.md` file in `dir`, sorted by file name.
///
/// `read_dir` order is platform-dependent; sorting keeps ingestion
/// deterministic across runs.
///
/// # Errors
///
/// Returns an error if the directory or any matching file cannot be read.
pub async fn load_markdown_dir(dir: &Path) -> Result<Vec<MarkdownFile>, DocumentError> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let content = tokio::fs::read_to_string(&path).await?;
        files.push(MarkdownFile {
            file_name: file_name.to_owned(),
            content,
        });
    }

    files.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(files)
}
