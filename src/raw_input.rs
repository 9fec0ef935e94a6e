use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tokio::fs;

use crate::response_sanitizer::sanitize_and_parse_json;

/// Reads a saved model response. A blank file means "no response" and
/// yields `None`; anything else must contain recoverable JSON.
pub async fn read_raw_response(path: &Path) -> Result<Option<Value>> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read raw response file '{}'", path.display()))?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    let value = sanitize_and_parse_json(&content)
        .with_context(|| format!("Raw response in '{}' is not JSON", path.display()))?;
    Ok(Some(value))
}

/// Writes `json` to `output`, or to stdout when no path is given.
pub async fn write_output(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write output file '{}'", path.display())),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
