use crate::error::{Result, SyndicatorError};

const MAX_HANDLE_LEN: usize = 15;

pub fn normalize_and_validate_handle(handle: &str) -> Result<String> {
    let normalized_handle = normalize_handle(handle);
    if !validate_handle(&normalized_handle) {
        return Err(SyndicatorError::InvalidHandle(handle.to_string()));
    }
    Ok(normalized_handle)
}

/// Screen names are case-insensitive and often pasted with their `@`.
pub fn normalize_handle(handle: &str) -> String {
    handle.trim().trim_start_matches('@').to_lowercase()
}

pub fn validate_handle(handle: &str) -> bool {
    if handle.is_empty() || handle.len() > MAX_HANDLE_LEN {
        return false;
    }
    handle
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
