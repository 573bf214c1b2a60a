//! Runtime expansion placeholders.
//!
//! Parameter values may reference expansions such as `${revision}` or
//! `${bucket|mciuploads}` that are only resolved when a task runs on an
//! agent. Their real value is unknown at validation time, so format and
//! content checks must not be applied to them.

use regex::Regex;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*\}").expect("placeholder pattern is valid"));

/// Does the value contain at least one `${...}` placeholder?
pub fn is_expandable(value: &str) -> bool {
    PLACEHOLDER.is_match(value)
}
