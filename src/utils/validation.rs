use crate::utils::error::{ReorderError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> ReorderError {
    ReorderError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(
            field_name,
            url_str,
            format!("Invalid URL format: {}", e),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

/// 相對 URL 路徑片段，例如 `reorder` 或 `order/bulk`
pub fn validate_path_segment(field_name: &str, segment: &str) -> Result<()> {
    validate_non_empty_string(field_name, segment)?;

    if segment.starts_with('/') || segment.ends_with('/') {
        return Err(invalid(
            field_name,
            segment,
            "Path segment must not start or end with '/'",
        ));
    }

    if segment.contains(char::is_whitespace) {
        return Err(invalid(field_name, segment, "Path segment contains whitespace"));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("collection.endpoint", "https://example.com").is_ok());
        assert!(validate_url("collection.endpoint", "http://example.com").is_ok());
        assert!(validate_url("collection.endpoint", "").is_err());
        assert!(validate_url("collection.endpoint", "invalid-url").is_err());
        assert!(validate_url("collection.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_path_segment() {
        assert!(validate_path_segment("collection.reorder_path", "reorder").is_ok());
        assert!(validate_path_segment("collection.reorder_path", "order/bulk").is_ok());
        assert!(validate_path_segment("collection.reorder_path", "/reorder").is_err());
        assert!(validate_path_segment("collection.reorder_path", "reorder/").is_err());
        assert!(validate_path_segment("collection.reorder_path", " ").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("http.timeout_seconds", 30, 1, 300).is_ok());
        assert!(validate_range("http.timeout_seconds", 0, 1, 300).is_err());
        assert!(validate_range("http.timeout_seconds", 301, 1, 300).is_err());
    }
}
