//! Builtin template functions.
//!
//! Two functions are installed into every template environment before any
//! caller-supplied function, so a caller can replace either by registering
//! the same name:
//!
//! | Function | Output |
//! |----------|--------|
//! | `html(s)` | `s` emitted verbatim, without escaping |
//! | `nl2br(s)` | `s` with every `\n` replaced by `<br>`, emitted verbatim |
//!
//! Neither function sanitizes its input. Only pass trusted strings.

use minijinja::{Environment, Value};

/// Returns the input as raw markup.
pub fn html(s: String) -> Value {
    Value::from_safe_string(s)
}

/// Replaces every line feed with a `<br>` element and returns raw markup.
pub fn nl2br(s: String) -> Value {
    Value::from_safe_string(s.replace('\n', "<br>"))
}

/// Registers the builtin functions on a MiniJinja environment.
pub fn register_builtins(env: &mut Environment<'static>) {
    env.add_function("html", html);
    env.add_function("nl2br", nl2br);
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::AutoEscape;

    fn env() -> Environment<'static> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        register_builtins(&mut env);
        env
    }

    #[test]
    fn test_html_is_not_escaped() {
        let out = env()
            .render_str("{{ html(s) }}|{{ s }}", minijinja::context! { s => "<b>" })
            .unwrap();
        assert_eq!(out, "<b>|&lt;b&gt;");
    }

    #[test]
    fn test_nl2br_replaces_every_newline() {
        let out = env()
            .render_str("{{ nl2br(s) }}", minijinja::context! { s => "a\nb\n\nc" })
            .unwrap();
        assert_eq!(out, "a<br>b<br><br>c");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn test_nl2br_without_newline_is_unchanged() {
        assert_eq!(nl2br("plain".into()).as_str(), Some("plain"));
    }
}
