use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::types::Document;

/// Load the document table written by the corpus pipeline (a JSON array of
/// [`Document`]). Row order is preserved; it must match the vector index.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::IndexLoad(format!("cannot read document table {}: {e}", path.display())))?;
    let docs = parse_documents(&content)
        .map_err(|e| Error::IndexLoad(format!("{}: {e}", path.display())))?;
    info!(path = %path.display(), documents = docs.len(), "loaded document table");
    Ok(docs)
}

pub fn parse_documents(content: &str) -> Result<Vec<Document>> {
    serde_json::from_str(content).map_err(|e| Error::IndexLoad(format!("malformed document table: {e}")))
}
