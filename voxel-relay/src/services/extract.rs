//! Turning raw model text into a JSON array.
//!
//! Models often wrap their answer in markdown fences or chatter around it, so
//! the array is cut out of the text before a strict parse.

use crate::models::Voxel;
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No JSON array found in model output")]
    NoArray,

    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid voxel at index {index}: {reason}")]
    InvalidVoxel { index: usize, reason: String },
}

/// Remove every markdown fence token and surrounding whitespace.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Slice from the first `[` through the last `]`.
pub fn array_span(text: &str) -> Option<&str> {
    let first = text.find('[')?;
    let last = text.rfind(']')?;
    (first < last).then(|| &text[first..=last])
}

/// Clean `raw` and strictly parse the embedded array.
pub fn extract_json_array(raw: &str) -> Result<Vec<Value>, ExtractError> {
    let cleaned = strip_code_fences(raw);
    let span = array_span(&cleaned).ok_or(ExtractError::NoArray)?;
    Ok(serde_json::from_str::<Vec<Value>>(span)?)
}

/// Check every element against the voxel shape.
pub fn validate_voxels(items: &[Value]) -> Result<(), ExtractError> {
    for (index, item) in items.iter().enumerate() {
        let voxel: Voxel =
            serde_json::from_value(item.clone()).map_err(|e| ExtractError::InvalidVoxel {
                index,
                reason: e.to_string(),
            })?;
        voxel.validate().map_err(|e| ExtractError::InvalidVoxel {
            index,
            reason: e.to_string(),
        })?;
    }
    Ok(())
}
