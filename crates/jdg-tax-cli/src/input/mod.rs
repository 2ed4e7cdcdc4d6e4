pub mod file;
pub mod tables;

use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Read a request from `--input`, falling back to piped stdin.
///
/// Returns `None` when neither is available so callers can build the request
/// from flags instead.
pub fn read_request<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_json(path)?));
    }
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut piped = String::new();
    io::stdin().read_to_string(&mut piped)?;
    parse_piped(&piped)
}

/// Blank input means no request; anything else must be a complete request.
fn parse_piped<T: DeserializeOwned>(text: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let request = serde_json::from_str(text)
        .map_err(|e| format!("Failed to parse request from stdin: {}", e))?;
    tracing::debug!(bytes = text.len(), "request read from stdin");
    Ok(Some(request))
}
