//! Flat-file persistence of the roster document

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::domain::RosterDocument;

/// Writes the document as indented UTF-8 JSON, replacing any existing file.
/// Non-ASCII text is written as-is, not escaped.
pub async fn write_roster(path: &Path, document: &RosterDocument) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let mut json = serde_json::to_string_pretty(document)?;
    json.push('\n');
    fs::write(path, json).await?;

    info!(
        "💾 Saved {} ({} agencies, {} channels)",
        path.display(),
        document.agencies.len(),
        document.channel_count()
    );
    Ok(())
}

/// Reads a document previously written by [`write_roster`]
pub async fn read_roster(path: &Path) -> io::Result<RosterDocument> {
    let text = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}
