//! PII masking for values that end up in logs (raw DB error messages carry
//! user emails from unique-constraint violations).

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

#[allow(clippy::unwrap_used)]
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap());

// Long opaque runs: password hashes, api tokens, uuids without dashes.
#[allow(clippy::unwrap_used)]
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Za-z0-9+/]{24,}={0,2}").unwrap());

/// Mask emails (keeping the first character and the domain) and long
/// token-like runs.
pub fn redact(input: &str) -> String {
    let masked = EMAIL.replace_all(input, |caps: &regex::Captures| {
        let email = &caps[0];
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                format!("{}***@{domain}", &local[..1])
            }
            _ => email.to_string(),
        }
    });

    TOKEN.replace_all(&masked, "[REDACTED]").into_owned()
}

/// Display wrapper that redacts on format.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", redact(self.0))
    }
}
