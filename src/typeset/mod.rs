//! Math typesetting over sanitized HTML.
//!
//! The typesetter is a post-processing pass: it scans the text runs of an
//! already-sanitized document for math delimiters and replaces each
//! delimited expression with renderer output. Tag structure is preserved,
//! nothing inside `code`/`pre` (or other ignored tags) is touched, and the
//! output of one replacement is never re-scanned.

pub mod katex;
pub mod mathml;
pub mod splitter;

pub use katex::KatexRenderer;
pub use mathml::MathMlRenderer;
pub use splitter::{split_math_segments, MathSegment};

use crate::error::Result;

/// Math rendering backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MathBackend {
    /// Convert expressions to MathML for native rendering.
    #[default]
    MathMl,
    /// Emit raw LaTeX in `\(..\)` / `\[..\]` wrappers for client-side KaTeX.
    Katex,
    /// Same wrappers, MathJax head content.
    MathJax,
}

/// Trait for math renderers.
pub trait MathRenderer {
    /// Render inline math.
    fn render_inline(&self, latex: &str) -> Result<String>;

    /// Render display math.
    fn render_display(&self, latex: &str) -> Result<String>;

    /// Any required HTML head content (scripts, styles).
    fn head_content(&self) -> Option<String>;
}

/// Create a math renderer for the given backend.
pub fn create_renderer(backend: MathBackend) -> Box<dyn MathRenderer> {
    match backend {
        MathBackend::MathMl => Box::new(MathMlRenderer::new()),
        MathBackend::Katex => Box::new(KatexRenderer::new()),
        MathBackend::MathJax => Box::new(KatexRenderer::new_mathjax()),
    }
}

/// Tags whose subtrees are never typeset.
const IGNORED_TAGS: &[&str] = &["code", "pre", "script", "style", "textarea", "option"];

/// Delimiter-scanning typesetter over sanitized HTML strings.
pub struct MathTypesetter {
    renderer: Box<dyn MathRenderer>,
}

impl MathTypesetter {
    pub fn new(backend: MathBackend) -> Self {
        Self { renderer: create_renderer(backend) }
    }

    /// Head content needed by the active backend, for standalone exports.
    pub fn head_content(&self) -> Option<String> {
        self.renderer.head_content()
    }

    /// Replace delimited math in the text runs of `html`.
    ///
    /// A malformed expression degrades to an inert error element in place;
    /// a renderer failure is caught and logged, leaving that expression's
    /// source text intact. Neither aborts the rest of the document.
    pub fn apply(&self, html: &str) -> String {
        let mut out = String::with_capacity(html.len());
        let mut rest = html;
        let mut ignored_depth = 0usize;

        while let Some(lt) = rest.find('<') {
            let (text, tail) = rest.split_at(lt);
            self.emit_text(text, ignored_depth, &mut out);

            let Some(tag) = scan_tag(tail) else {
                // No closing `>`; emit the malformed remainder untouched.
                out.push_str(tail);
                return out;
            };

            out.push_str(tag.raw);
            if !tag.self_closing && IGNORED_TAGS.contains(&tag.name.as_str()) {
                if tag.closing {
                    ignored_depth = ignored_depth.saturating_sub(1);
                } else {
                    ignored_depth += 1;
                }
            }
            rest = &tail[tag.raw.len()..];
        }

        self.emit_text(rest, ignored_depth, &mut out);
        out
    }

    fn emit_text(&self, text: &str, ignored_depth: usize, out: &mut String) {
        if text.is_empty() {
            return;
        }
        if ignored_depth > 0 || !has_math_delimiter(text) {
            out.push_str(text);
            return;
        }

        let decoded = decode_entities(text);
        for segment in split_math_segments(&decoded) {
            match segment {
                MathSegment::Text(literal) => out.push_str(&encode_text(literal)),
                MathSegment::Math { latex, display } => {
                    out.push_str(&self.render_math(latex, display));
                }
            }
        }
    }

    fn render_math(&self, latex: &str, display: bool) -> String {
        let rendered = if display {
            self.renderer.render_display(latex)
        } else {
            self.renderer.render_inline(latex)
        };

        match rendered {
            Ok(markup) => markup,
            Err(err) => {
                log::warn!("math typesetting failed for {latex:?}: {err}");
                if display {
                    format!(r#"<div class="math display math-error">{}</div>"#, encode_text(latex))
                } else {
                    format!(r#"<span class="math inline math-error">{}</span>"#, encode_text(latex))
                }
            }
        }
    }
}

struct ScannedTag<'a> {
    raw: &'a str,
    name: String,
    closing: bool,
    self_closing: bool,
}

/// Scan one tag starting at `input[0] == '<'`, honoring quoted attribute
/// values so a `>` inside an attribute does not end the tag.
fn scan_tag(input: &str) -> Option<ScannedTag<'_>> {
    let bytes = input.as_bytes();
    let mut quote: Option<u8> = None;

    for (index, &byte) in bytes.iter().enumerate().skip(1) {
        match byte {
            b'"' | b'\'' => match quote {
                Some(open) if open == byte => quote = None,
                None => quote = Some(byte),
                _ => {}
            },
            b'>' if quote.is_none() => {
                let raw = &input[..=index];
                let closing = raw.as_bytes().get(1) == Some(&b'/');
                let self_closing = raw.ends_with("/>");
                let name_start = if closing { 2 } else { 1 };
                let name: String = raw[name_start..]
                    .chars()
                    .take_while(|c| c.is_ascii_alphanumeric())
                    .collect::<String>()
                    .to_ascii_lowercase();
                return Some(ScannedTag { raw, name, closing, self_closing });
            }
            _ => {}
        }
    }

    None
}

fn has_math_delimiter(text: &str) -> bool {
    text.contains('$') || text.contains("\\(") || text.contains("\\[")
}

/// Decode the entities an HTML serializer produces in text runs. `&amp;`
/// must come last so already-decoded sequences are not decoded twice.
fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Re-encode decoded literal text for an HTML content position.
fn encode_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typesetter() -> MathTypesetter {
        MathTypesetter::new(MathBackend::default())
    }

    #[test]
    fn test_inline_math_is_replaced() {
        let out = typesetter().apply("<p>Some $x^2$ math.</p>");
        assert!(!out.contains("$x^2$"));
        assert!(out.contains("math") || out.contains("<math"));
        assert!(out.contains("Some "));
        assert!(out.contains(" math.</p>"));
    }

    #[test]
    fn test_display_math_is_replaced() {
        let out = typesetter().apply("<p>$$E = mc^2$$</p>");
        assert!(!out.contains("$$"));
        assert!(out.contains("display"));
    }

    #[test]
    fn test_code_and_pre_are_skipped() {
        let out = typesetter().apply("<p>$a$</p><pre><code>$b$ and $c$</code></pre>");
        assert!(!out.contains("$a$"));
        assert!(out.contains("$b$ and $c$"));
    }

    #[test]
    fn test_inline_code_is_skipped() {
        let out = typesetter().apply("<p>run <code>$HOME</code> now</p>");
        assert!(out.contains("<code>$HOME</code>"));
    }

    #[test]
    fn test_unbalanced_input_degrades_gracefully() {
        // `$1+$` typesets; the stranded `$` and the tail stay literal.
        let out = typesetter().apply("<p>$1+$$ and more text</p>");
        assert!(!out.contains("$1+"));
        assert!(out.contains("$ and more text"));
        assert!(out.ends_with("</p>"));
    }

    #[test]
    fn test_text_without_math_is_untouched() {
        let html = "<p>plain &amp; simple</p>";
        assert_eq!(typesetter().apply(html), html);
    }

    #[test]
    fn test_entities_in_literal_text_stay_encoded() {
        let out = typesetter().apply("<p>5 &lt; 6 and $x$ end</p>");
        assert!(out.contains("5 &lt; 6 and "));
        assert!(!out.contains("$x$"));
    }

    #[test]
    fn test_dollar_inside_attribute_is_untouched() {
        let html = r#"<a title="cost > $5">link $x$</a>"#;
        let out = typesetter().apply(html);
        assert!(out.contains(r#"title="cost > $5""#));
        assert!(!out.contains("$x$"));
    }

    #[test]
    fn test_backslash_delimiters() {
        let out = typesetter().apply("<p>\\(a\\) and \\[b\\]</p>");
        assert!(!out.contains("\\(a\\)"));
        assert!(!out.contains("\\[b\\]"));
        assert!(out.contains(" and "));
    }

    #[test]
    fn test_katex_backend_emits_client_side_wrappers() {
        let typesetter = MathTypesetter::new(MathBackend::Katex);
        let out = typesetter.apply("<p>$x^2$</p>");
        assert!(out.contains(r#"<span class="math inline">\(x^2\)</span>"#));
    }

    #[test]
    fn test_head_content_varies_by_backend() {
        assert!(MathTypesetter::new(MathBackend::Katex)
            .head_content()
            .unwrap()
            .contains("katex"));
        assert!(MathTypesetter::new(MathBackend::MathJax)
            .head_content()
            .unwrap()
            .contains("MathJax"));
    }

    #[cfg(feature = "mathml")]
    #[test]
    fn test_mathml_backend_produces_math_elements() {
        let out = typesetter().apply("<p>$x^2$</p>");
        assert!(out.contains("<math"));
    }

    #[cfg(feature = "mathml")]
    #[test]
    fn test_invalid_expression_becomes_inert_error() {
        // \frac with a missing argument fails to convert; the expression
        // degrades to an inert error element and the rest is unaffected.
        let out = typesetter().apply("<p>$\\frac{x}$ rest</p>");
        assert!(out.contains("math-error"));
        assert!(out.contains(" rest</p>"));
    }
}
