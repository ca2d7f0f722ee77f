//! `${VAR}` and `${VAR:-default}` expansion for configuration strings.

use crate::ConfigError;

/// Expand environment variable references in `value`.
///
/// Strings without a `${` sequence are returned as-is, so bare `$` in
/// link targets survives. `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |name| match std::env::var(name) {
        Ok(val) => Ok(Some(val)),
        Err(_) => Err(UnsetVar(name.to_owned())),
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| ConfigError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.0),
    })
}

/// Lookup failure carrying the unset variable name.
struct UnsetVar(String);

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_expand_var() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("MDSITE_TEST_VERSION", "1.2.3");
        }
        let result = expand_env("v${MDSITE_TEST_VERSION}", "links.version").unwrap();
        assert_eq!(result, "v1.2.3");
        unsafe {
            std::env::remove_var("MDSITE_TEST_VERSION");
        }
    }

    #[test]
    fn test_expand_default() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDSITE_TEST_UNSET_DEFAULT");
        }
        let result = expand_env("${MDSITE_TEST_UNSET_DEFAULT:-0.11.2}", "links.version").unwrap();
        assert_eq!(result, "0.11.2");
    }

    #[test]
    fn test_missing_var_names_field() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var("MDSITE_TEST_MISSING");
        }
        let err = expand_env("${MDSITE_TEST_MISSING}", "rewrite.target").unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("MDSITE_TEST_MISSING"));
        assert!(message.contains("rewrite.target"));
    }

    #[test]
    fn test_without_braces_unchanged() {
        let result = expand_env("/api/$ref", "links.api").unwrap();
        assert_eq!(result, "/api/$ref");
    }
}
