use uuid::Uuid;

pub const MAX_FILE_NAME_LEN: usize = 100;

/// Reduce a user-supplied file name to a safe single path segment.
///
/// Keeps ASCII alphanumerics, `.`, `-` and `_`; every other character becomes
/// `_` and runs of `_` collapse to one. Leading dots are dropped so the result
/// is never hidden and never `.` or `..`. An empty result becomes `file`.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len().min(MAX_FILE_NAME_LEN));

    for ch in name.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_') {
            ch
        } else {
            '_'
        };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }

    let trimmed = out.trim_start_matches('.');
    // Output is ASCII only, so byte truncation stays on a char boundary.
    let truncated = &trimmed[..trimmed.len().min(MAX_FILE_NAME_LEN)];

    if truncated.is_empty() {
        "file".to_string()
    } else {
        truncated.to_string()
    }
}

/// Object key for a new upload: `{workspace_id}/{object_id}-{sanitized_name}`.
pub fn storage_path(workspace_id: Uuid, object_id: Uuid, file_name: &str) -> String {
    format!("{}/{}-{}", workspace_id, object_id, sanitize_file_name(file_name))
}
