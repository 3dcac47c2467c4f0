//! Request body bounds for note fields, mirrored by the editor UI.

pub const TITLE_MAX_CHARS: usize = 500;
pub const CONTENT_MAX_CHARS: usize = 500_000;

/// Check optional note fields against the API bounds.
///
/// Absent fields are fine (creation falls back to defaults, update leaves
/// them unchanged). Returns every violation, not just the first.
pub fn validate_note_fields(
    title: Option<&str>,
    content_json: Option<&str>,
) -> Result<(), Vec<String>> {
    let mut issues = Vec::new();

    if let Some(title) = title {
        let len = title.chars().count();
        if len == 0 {
            issues.push("title must not be empty".to_string());
        } else if len > TITLE_MAX_CHARS {
            issues.push(format!("title must be at most {} characters", TITLE_MAX_CHARS));
        }
    }

    if let Some(content) = content_json {
        if content.chars().count() > CONTENT_MAX_CHARS {
            issues.push(format!(
                "contentJson must be at most {} characters",
                CONTENT_MAX_CHARS
            ));
        }
    }

    if issues.is_empty() { Ok(()) } else { Err(issues) }
}
