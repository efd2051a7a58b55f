//! Markup escaping for user-supplied text.

/// Escape `&`, `<` and `>` so client-side rendering treats the text as plain text.
pub fn escape_markup(input: &str) -> String {
    html_escape::encode_text(input).into_owned()
}
