//! Environment-variable reference expansion for command-line tokens.
//!
//! Recognizes `%NAME%`, `${NAME}` and `$NAME`. References to variables the
//! lookup does not know are left verbatim. Expansion is a single pass: a
//! substituted value is never scanned again.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%([^%]+)%|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)").unwrap()
});

/// Expand variable references in `input` using `lookup`.
pub fn expand_vars<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    REFERENCE_RE
        .replace_all(input, |caps: &Captures<'_>| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map_or("", |m| m.as_str());
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
