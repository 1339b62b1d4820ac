//! Human-readable diagnostics for failed submissions.
//!
//! A failing validator usually answers with a stack dump. The cleanup below
//! strips markup and package-qualified frames so the remaining text can be
//! shown next to a support contact. It is lossy and heuristic: arbitrary
//! server text is not guaranteed to come out clean.
use std::sync::LazyLock;

use regex::Regex;

static MARKUP_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?R)\{(.*?)\}|<(.*?)>").unwrap_or_else(|e| panic!("markup pattern: {e}"))
});
static COM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^.*com.*$").unwrap_or_else(|e| panic!("com line pattern: {e}"))
});
static ORG_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mR)^.*org.*$").unwrap_or_else(|e| panic!("org line pattern: {e}"))
});
static LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\r?\n|\r").unwrap_or_else(|e| panic!("line break pattern: {e}"))
});

/// Strip `{...}`/`<...>` tokens, blank lines mentioning `com` or `org`, and
/// fold line breaks into spaces.
///
/// # Examples
/// ```rust
/// use miring_core::diagnostic::clean_error_body;
///
/// assert_eq!(clean_error_body("<error>boom</error>"), "boom");
/// ```
pub fn clean_error_body(body: &str) -> String {
    let without_markup = MARKUP_TOKEN.replace_all(body, "");
    let without_com = COM_LINE.replace_all(&without_markup, "");
    let without_org = ORG_LINE.replace_all(&without_com, "");
    LINE_BREAK.replace_all(&without_org, " ").into_owned()
}

/// Results text shown in place of a report when submission fails.
pub fn failure_message(contact: &str, body: &str) -> String {
    format!(
        "Please contact the System Admin: {contact} in your message attach your hml and note your version number.             \n{}",
        clean_error_body(body)
    )
}
