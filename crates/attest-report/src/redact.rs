//! Masking of sensitive environment values before they reach the report.

use std::collections::BTreeMap;

use regex::Regex;
use serde_json::Value;

/// The masking glyph (U+2593 DARK SHADE), repeated once per character so the
/// value's length stays visible. Length-preserving masking is deliberate;
/// never hash or fixed-length-mask here.
pub const MASK: char = '\u{2593}';

fn is_redactable(key: &str, patterns: &[Regex]) -> bool {
    // Patterns are compiled with a leading `^(?:...)`, so a match means the
    // key matches from its start (not necessarily in full).
    patterns.iter().any(|p| p.is_match(key))
}

/// Mask every value whose key matches one of the configured patterns.
///
/// Matching values are replaced by [`MASK`] repeated to the length of their
/// string form; non-matching entries pass through untouched.
pub fn redact_environment(metadata: &mut BTreeMap<String, Value>, patterns: &[Regex]) {
    for (key, value) in metadata.iter_mut() {
        if is_redactable(key, patterns) {
            let shown = match &*value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let masked: String = shown.chars().map(|_| MASK).collect();
            *value = Value::String(masked);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compile_redact_patterns;
    use serde_json::json;

    fn env(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn matching_value_is_masked_length_preserving() {
        let patterns = compile_redact_patterns(&["SECRET.*".to_string()]).unwrap();
        let mut metadata = env(&[("SECRET_KEY", json!("abc123")), ("HOME", json!("/root"))]);
        redact_environment(&mut metadata, &patterns);

        assert_eq!(metadata["SECRET_KEY"], json!("\u{2593}".repeat(6)));
        assert_eq!(metadata["HOME"], json!("/root"));
    }

    #[test]
    fn match_is_anchored_at_start_only() {
        let patterns = compile_redact_patterns(&["KEY".to_string()]).unwrap();
        let mut metadata = env(&[("KEYSTORE", json!("xy")), ("API_KEY", json!("xy"))]);
        redact_environment(&mut metadata, &patterns);

        // prefix match redacts, interior match does not
        assert_eq!(metadata["KEYSTORE"], json!("\u{2593}\u{2593}"));
        assert_eq!(metadata["API_KEY"], json!("xy"));
    }

    #[test]
    fn non_string_values_mask_their_string_form() {
        let patterns = compile_redact_patterns(&["PORT".to_string()]).unwrap();
        let mut metadata = env(&[("PORT", json!(8080))]);
        redact_environment(&mut metadata, &patterns);

        assert_eq!(metadata["PORT"], json!("\u{2593}".repeat(4)));
    }

    #[test]
    fn mixed_value_types_are_masked_in_one_pass() {
        let patterns = compile_redact_patterns(&["DB_.*".to_string()]).unwrap();
        let mut metadata = env(&[
            ("DB_PASSWORD", json!("hunter2")),
            ("DB_POOL_SIZE", json!(16)),
            ("DB_TLS", json!(true)),
        ]);
        redact_environment(&mut metadata, &patterns);

        assert_eq!(metadata["DB_PASSWORD"], json!("\u{2593}".repeat(7)));
        assert_eq!(metadata["DB_POOL_SIZE"], json!("\u{2593}".repeat(2)));
        assert_eq!(metadata["DB_TLS"], json!("\u{2593}".repeat(4)));
    }
}
