//! MiniJinja environment setup shared by every template set.

use minijinja::value::Value;
use minijinja::{
    escape_formatter, AutoEscape, Environment, Error, ErrorKind, Output, State,
    UndefinedBehavior,
};

use super::builtins::register_builtins;

/// Creates an environment configured for HTML responses.
///
/// - Every template is HTML auto-escaped, whatever its file extension.
///   Only `&`, `<`, `>`, `"` and `'` are replaced, so paths and URLs print
///   as written.
/// - Trailing newlines are kept so files render byte for byte.
/// - Undefined values render as empty strings.
/// - The builtin functions (`html`, `nl2br`) are installed.
pub fn new_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_name| AutoEscape::Html);
    env.set_formatter(html_formatter);
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::Lenient);
    register_builtins(&mut env);
    env
}

/// Escapes only the five HTML special characters.
///
/// Safe strings, `none` and undefined values keep the default formatting.
fn html_formatter(
    out: &mut Output<'_>,
    state: &State<'_, '_>,
    value: &Value,
) -> Result<(), Error> {
    if value.is_safe()
        || value.is_undefined()
        || value.is_none()
        || !matches!(state.auto_escape(), AutoEscape::Html)
    {
        return escape_formatter(out, state, value);
    }
    write_escaped(out, &value.to_string())
        .map_err(|_| Error::new(ErrorKind::WriteFailure, "failed to write template output"))
}

/// Writes `s` with the HTML special characters replaced by entities.
fn write_escaped<W: std::fmt::Write>(out: &mut W, s: &str) -> std::fmt::Result {
    let mut last = 0;
    for (i, b) in s.bytes().enumerate() {
        let entity = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&#34;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.write_str(&s[last..i])?;
        out.write_str(entity)?;
        last = i + 1;
    }
    out.write_str(&s[last..])
}
