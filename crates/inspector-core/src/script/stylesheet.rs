//! The CSS commit script pushed into an already-loaded page.
//!
//! Committing CSS does not reload the page.  The host synthesizes a small
//! script that owns exactly one `<style>` element, identified by
//! [`MANAGED_STYLE_ID`], and replaces that element's whole text content:
//!
//! ```js
//! (function() {
//!   let style = document.getElementById("injected-css-style");
//!   if (!style) { /* create it and append it to <head> */ }
//!   style.textContent = `<escaped css>`;
//! })();
//! ```
//!
//! The CSS travels inside a template literal, so the text is escaped first.
//! Escaping covers backticks (which would end the literal), backslashes
//! (which would otherwise start escape sequences), `${` (which would start a
//! substitution) and carriage returns (which template literals normalize
//! away).  After evaluation the element content equals the draft exactly.

/// `id` of the single style element the host manages inside the page.
pub const MANAGED_STYLE_ID: &str = "injected-css-style";

const ASSIGNMENT: &str = "style.textContent = `";
const LOOKUP: &str = "document.getElementById(\"";

/// Escapes `text` for embedding between backticks of a template literal.
pub fn escape_template_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '`' => out.push_str("\\`"),
            '\r' => out.push_str("\\r"),
            '$' if chars.peek() == Some(&'{') => out.push_str("\\$"),
            other => out.push(other),
        }
    }
    out
}

/// Reverses [`escape_template_literal`].
///
/// Returns `None` if `body` contains an unescaped backtick or a dangling
/// backslash, either of which would have broken the literal.
pub fn unescape_template_literal(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next()? {
                '\\' => out.push('\\'),
                '`' => out.push('`'),
                '$' => out.push('$'),
                'r' => out.push('\r'),
                'n' => out.push('\n'),
                't' => out.push('\t'),
                _ => return None,
            },
            '`' => return None,
            other => out.push(other),
        }
    }
    Some(out)
}

/// Builds the script that writes `css` into the managed style element.
///
/// # Examples
///
/// ```rust
/// use inspector_core::script::stylesheet_script;
///
/// let js = stylesheet_script("a::after { content: `x`; }");
/// assert!(js.contains(r"content: \`x\`;"));
/// ```
pub fn stylesheet_script(css: &str) -> String {
    let escaped = escape_template_literal(css);
    format!(
        r#"(function() {{
  let style = document.getElementById("{id}");
  if (!style) {{
    style = document.createElement("style");
    style.id = "{id}";
    document.head.appendChild(style);
  }}
  {ASSIGNMENT}{escaped}`;
}})();
true;
"#,
        id = MANAGED_STYLE_ID,
    )
}

/// What a stylesheet script does once evaluated: the target element id and
/// the exact text it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StylesheetPatch {
    pub element_id: String,
    pub css: String,
}

/// Reads a script produced by [`stylesheet_script`] back into its effect.
///
/// Returns `None` for any other script.
pub fn parse_stylesheet_script(script: &str) -> Option<StylesheetPatch> {
    let id_start = script.find(LOOKUP)? + LOOKUP.len();
    let id_len = script[id_start..].find('"')?;
    let element_id = script[id_start..id_start + id_len].to_string();

    let body_start = script.find(ASSIGNMENT)? + ASSIGNMENT.len();
    let body_len = closing_backtick(&script[body_start..])?;
    let css = unescape_template_literal(&script[body_start..body_start + body_len])?;

    Some(StylesheetPatch { element_id, css })
}

/// Byte offset of the first backtick in `s` that is not escaped.
fn closing_backtick(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '`' => return Some(idx),
            _ => {}
        }
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
