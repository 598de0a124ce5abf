//! Expansion of path-like config values (`content.root`).
//!
//! `${NAME}` and `${NAME:-fallback}` are substituted from the environment and
//! a leading `~` becomes `$HOME`. Values containing neither are used verbatim,
//! which keeps a literal `$` in a plain path intact.

use std::borrow::Cow;

use crate::ConfigError;

/// Marker for a `${NAME}` reference with no value and no fallback.
struct Unset;

/// Expand `value` against the process environment.
pub(crate) fn expand_path(value: &str, field: &str) -> Result<String, ConfigError> {
    expand_with(value, field, |name| std::env::var(name).ok())
}

fn expand_with<F>(value: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !value.contains("${") && !value.starts_with('~') {
        return Ok(value.to_owned());
    }

    let home = || lookup("HOME");
    shellexpand::full_with_context(value, home, |name| lookup(name).map(Some).ok_or(Unset))
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_plain_root_untouched() {
        let lookup = env(&[]);

        assert_eq!(expand_with("public", "content.root", &lookup).unwrap(), "public");
        assert_eq!(
            expand_with("public/$locale", "content.root", &lookup).unwrap(),
            "public/$locale"
        );
    }

    #[test]
    fn test_root_from_variable() {
        let lookup = env(&[("SITE", "site-a")]);

        let root = expand_with("/data/${SITE}/public", "content.root", lookup).unwrap();

        assert_eq!(root, "/data/site-a/public");
    }

    #[test]
    fn test_fallback_when_unset() {
        let root = expand_with("${CONTENT_ROOT:-public}", "content.root", env(&[])).unwrap();

        assert_eq!(root, "public");
    }

    #[test]
    fn test_leading_tilde_uses_home() {
        let lookup = env(&[("HOME", "/home/writer")]);

        let root = expand_with("~/site/public", "content.root", lookup).unwrap();

        assert_eq!(root, "/home/writer/site/public");
    }

    #[test]
    fn test_unset_variable_names_field_and_variable() {
        let err = expand_with("${CONTENT_ROOT}/en", "content.root", env(&[])).unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        let message = err.to_string();
        assert!(message.contains("CONTENT_ROOT"));
        assert!(message.contains("content.root"));
    }

    #[test]
    fn test_process_environment_lookup() {
        // PATH is set in any environment running the test suite
        let root = expand_path("${PATH:-none}", "content.root").unwrap();

        assert_ne!(root, "${PATH:-none}");
    }
}
