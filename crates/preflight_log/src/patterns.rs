//! Message patterns recognized inside structured records.
//!
//! Matching is split into independent steps: an optional `<timestamp> [LEVEL]`
//! prefix that some tools nest inside the message text is stripped first, and
//! the remainder is then matched against the resource outcome shape.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entry::ResourceStatus;

/// `2024-09-17T10:30:00Z [INFO] ` style prefix nested in a message.
static LEVEL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\d{4}[-/]\d{2}[-/]\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})?\s+\[[A-Za-z]+\]\s*",
    )
    .expect("level prefix pattern is valid")
});

/// `<anything> <identifier>: success|failed`
static RESOURCE_OUTCOME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:.*\s)?([^:]+):\s*(success|failed)\b")
        .expect("resource outcome pattern is valid")
});

static PREFLIGHT_ERROR_COUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)preflight errors:\s*(\d+)").expect("error count pattern is valid")
});

/// Drop embedded line feeds and surrounding whitespace for matching.
pub fn clean_message(message: &str) -> String {
    message.replace('\n', "").trim().to_string()
}

/// Remove a leading `<timestamp> [LEVEL]` tag if present.
pub fn strip_level_prefix(message: &str) -> &str {
    match LEVEL_PREFIX.find(message) {
        Some(prefix) => &message[prefix.end()..],
        None => message,
    }
}

/// Match a `<identifier>: <status>` message, returning the trimmed identifier.
pub fn match_resource_outcome(message: &str) -> Option<(String, ResourceStatus)> {
    let caps = RESOURCE_OUTCOME.captures(strip_level_prefix(message))?;
    let resource = caps.get(1)?.as_str().trim();
    if resource.is_empty() {
        return None;
    }
    let status = ResourceStatus::parse(caps.get(2)?.as_str())?;
    Some((resource.to_string(), status))
}

/// Match a `preflight errors: N` summary line.
pub fn match_preflight_error_count(message: &str) -> Option<u64> {
    PREFLIGHT_ERROR_COUNT
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|count| count.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_message_removes_line_feeds() {
        assert_eq!(clean_message("  a\nb \n"), "ab");
    }

    #[test]
    fn test_strip_level_prefix() {
        assert_eq!(
            strip_level_prefix("2024-09-17T10:30:00Z [INFO] azurerm_resource_group.main: success"),
            "azurerm_resource_group.main: success"
        );
        assert_eq!(
            strip_level_prefix("2024/09/17 10:30:00 [DEBUG] planning"),
            "planning"
        );
        assert_eq!(strip_level_prefix("no prefix here"), "no prefix here");
    }

    #[test]
    fn test_match_plain_outcome() {
        let (resource, status) =
            match_resource_outcome("azurerm_resource_group.main: success").unwrap();
        assert_eq!(resource, "azurerm_resource_group.main");
        assert_eq!(status, ResourceStatus::Success);
    }

    #[test]
    fn test_match_outcome_with_nested_prefix() {
        let line = "2024-09-17T10:30:00Z [INFO] azurerm_subnet.internal: failed";
        let (resource, status) = match_resource_outcome(line).unwrap();
        assert_eq!(resource, "azurerm_subnet.internal");
        assert_eq!(status, ResourceStatus::Failed);
    }

    #[test]
    fn test_match_outcome_with_arbitrary_prefix() {
        let (resource, status) =
            match_resource_outcome("validating resource azurerm_key_vault.kv:success").unwrap();
        assert_eq!(resource, "azurerm_key_vault.kv");
        assert_eq!(status, ResourceStatus::Success);
    }

    #[test]
    fn test_no_outcome_without_status_token() {
        assert!(match_resource_outcome("azurerm_resource_group.main: pending").is_none());
        assert!(match_resource_outcome("azurerm_resource_group.main: successful").is_none());
        assert!(match_resource_outcome("preflight errors: 2").is_none());
        assert!(match_resource_outcome(": success").is_none());
    }

    #[test]
    fn test_preflight_error_count_is_case_insensitive() {
        assert_eq!(match_preflight_error_count("Preflight Errors: 3"), Some(3));
        assert_eq!(match_preflight_error_count("preflight errors:0"), Some(0));
        assert_eq!(match_preflight_error_count("preflight errors: none"), None);
    }
}
