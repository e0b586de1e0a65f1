//! Instruction template wrapped around the caller's prompt.

/// Wrap `subject` in the voxel-generation instructions.
///
/// The subject is interpolated verbatim; quotes inside it are not escaped.
pub fn voxel_prompt(subject: &str) -> String {
    format!(
        r##"
You are a Voxel Generator.
Task: Create a JSON array of voxels for: "{subject}".
Format: [{{"x":0,"y":0,"z":0,"c":"#FF0000"}}, ...]
Rules: Size approx 12x12x12. Return ONLY valid JSON. No markdown.
"##
    )
}
