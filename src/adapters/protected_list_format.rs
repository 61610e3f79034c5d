//! Decoding of protected path list documents.
//!
//! Accepted shapes: `{"protected": [...]}`, a bare JSON array of strings, or
//! plain text with one path per line (`#` comments allowed).

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ProtectedDocument {
    protected: Vec<String>,
}

/// Decode a protected list body.
///
/// Every entry must be an absolute path. A body with any other entry, such as an
/// HTML login or error page served with status 200, is rejected as a whole.
pub fn parse_protected_list(body: &str) -> Result<Vec<String>, String> {
    let trimmed = body.trim_start();

    let entries = if trimmed.starts_with('{') {
        let document: ProtectedDocument = serde_json::from_str(trimmed)
            .map_err(|e| format!("invalid protected list document: {}", e))?;
        document.protected
    } else if trimmed.starts_with('[') {
        serde_json::from_str::<Vec<String>>(trimmed)
            .map_err(|e| format!("invalid protected list array: {}", e))?
    } else {
        trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect()
    };

    if let Some(bad) = entries.iter().find(|entry| !entry.trim().starts_with('/')) {
        return Err(format!("protected list entry is not an absolute path: {:?}", bad));
    }
    Ok(entries)
}
