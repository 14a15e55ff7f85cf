//! Inline field checks shared by the request payload types.

use crate::error::ApiError;

pub const MAX_TITLE: usize = 200;
pub const MAX_NAME: usize = 100;
pub const MAX_TAG: usize = 50;
pub const MAX_LONG_TEXT: usize = 5000;
pub const MAX_SHORT_TEXT: usize = 255;

/// Trim and require a non-empty value no longer than `max` characters.
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::invalid_field(field, "must not be empty"));
    }
    check_len(field, trimmed, max)?;
    Ok(trimmed.to_string())
}

/// Trim an optional value; blank becomes `None`.
pub fn optional_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            check_len(field, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

/// Patch variant: `None` leaves the column alone, `Some("")` clears it.
pub fn patch_text(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, ApiError> {
    match value.map(str::trim) {
        None => Ok(None),
        Some(v) => {
            check_len(field, v, max)?;
            Ok(Some(v.to_string()))
        }
    }
}

/// Patch variant for columns that may never be blank.
pub fn patch_required(field: &str, value: Option<&str>, max: usize) -> Result<Option<String>, ApiError> {
    value.map(|v| required_text(field, v, max)).transpose()
}

pub fn optional_url(field: &str, value: Option<&str>) -> Result<Option<String>, ApiError> {
    let value = optional_text(field, value, 2048)?;
    if let Some(url) = &value {
        check_url(field, url)?;
    }
    Ok(value)
}

pub fn patch_url(field: &str, value: Option<&str>) -> Result<Option<String>, ApiError> {
    let value = patch_text(field, value, 2048)?;
    if let Some(url) = value.as_deref().filter(|v| !v.is_empty()) {
        check_url(field, url)?;
    }
    Ok(value)
}

pub fn optional_email(field: &str, value: Option<&str>) -> Result<Option<String>, ApiError> {
    let value = optional_text(field, value, MAX_SHORT_TEXT)?;
    if let Some(email) = &value {
        check_email(field, email)?;
    }
    Ok(value)
}

pub fn patch_email(field: &str, value: Option<&str>) -> Result<Option<String>, ApiError> {
    let value = patch_text(field, value, MAX_SHORT_TEXT)?;
    if let Some(email) = value.as_deref().filter(|v| !v.is_empty()) {
        check_email(field, email)?;
    }
    Ok(value)
}

/// Trim, drop blanks, dedupe case-insensitively (first spelling wins) and cap the count.
pub fn tag_list(field: &str, values: &[String], max_items: usize) -> Result<Vec<String>, ApiError> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for raw in values {
        let tag = raw.trim();
        if tag.is_empty() {
            continue;
        }
        check_len(field, tag, MAX_TAG)?;
        if !out.iter().any(|seen| same_tag(seen, tag)) {
            out.push(tag.to_string());
        }
    }
    if out.len() > max_items {
        return Err(ApiError::invalid_field(
            field,
            format!("at most {} entries allowed", max_items),
        ));
    }
    Ok(out)
}

/// Full Unicode case fold, matching `lower()` in the roles unique index.
pub fn same_tag(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn check_len(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::invalid_field(
            field,
            format!("must be at most {} characters", max),
        ));
    }
    Ok(())
}

fn check_url(field: &str, value: &str) -> Result<(), ApiError> {
    if value.starts_with("http://") || value.starts_with("https://") {
        Ok(())
    } else {
        Err(ApiError::invalid_field(field, "must be an http(s) URL"))
    }
}

fn check_email(field: &str, value: &str) -> Result<(), ApiError> {
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => Ok(()),
        _ => Err(ApiError::invalid_field(field, "must be a valid email address")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("title", "  Grip  ", MAX_TITLE).unwrap(), "Grip");
        assert!(required_text("title", "   ", MAX_TITLE).is_err());
        assert!(required_text("title", &"x".repeat(MAX_TITLE + 1), MAX_TITLE).is_err());
    }

    #[test]
    fn patch_text_keeps_blank_as_clear() {
        assert_eq!(patch_text("bio", None, 10).unwrap(), None);
        assert_eq!(patch_text("bio", Some("  "), 10).unwrap(), Some(String::new()));
    }

    #[test]
    fn urls_and_emails() {
        assert!(optional_url("website", Some("https://example.com")).is_ok());
        assert!(optional_url("website", Some("ftp://example.com")).is_err());
        assert_eq!(patch_url("website", Some("")).unwrap(), Some(String::new()));
        assert!(optional_email("email", Some("crew@set.io")).is_ok());
        assert!(optional_email("email", Some("crew@")).is_err());
        assert!(optional_email("email", Some("a@b@c")).is_err());
    }

    #[test]
    fn tag_list_dedupes_case_insensitively() {
        let tags = vec!["Gaffer".to_string(), " gaffer ".to_string(), "".to_string(), "Grip".to_string()];
        assert_eq!(tag_list("roles", &tags, 5).unwrap(), vec!["Gaffer", "Grip"]);

        let many: Vec<String> = (0..4).map(|i| format!("r{}", i)).collect();
        assert!(tag_list("roles", &many, 3).is_err());
    }

    #[test]
    fn tag_list_folds_non_ascii_case() {
        let tags = vec!["Éclairagiste".to_string(), "éclairagiste".to_string(), "ÉCLAIRAGISTE".to_string()];
        assert_eq!(tag_list("roles", &tags, 5).unwrap(), vec!["Éclairagiste"]);
        assert!(same_tag("Ülkü", "üLKÜ"));
        assert!(!same_tag("Grip", "Gaffer"));
    }
}
