//! Voxel descriptor returned to callers.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// A single cube in the generated structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Voxel {
    pub x: i64,
    pub y: i64,
    pub z: i64,

    /// Colour as `#RGB` or `#RRGGBB`.
    #[validate(custom(function = "validate_hex_color"))]
    pub c: String,
}

fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let digits = color
        .strip_prefix('#')
        .ok_or_else(|| ValidationError::new("hex_color"))?;

    let valid_len = digits.len() == 3 || digits.len() == 6;
    if valid_len && digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}
