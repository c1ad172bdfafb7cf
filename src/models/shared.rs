use crate::error::AppError;

/// Escape LIKE wildcard characters in a search string.
pub fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Validate a required name-like field (trimmed, 1-255 Unicode characters).
pub fn validate_required_name(value: &str, field: &str) -> Result<(), AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > 255 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-255 characters"
        )));
    }
    Ok(())
}

/// Deduplicate an id list preserving first-seen order.
pub fn dedup_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
