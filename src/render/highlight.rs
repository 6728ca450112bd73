//! Fenced code block highlighting.

use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::error::{Error, RenderError, Result};
use crate::render::escape_html;

/// Classification used when a fence's language is missing or unrecognized.
const PLAINTEXT_CLASS: &str = "plaintext";

/// Syntax-set-backed highlighter, loaded once and reused for every block.
pub struct CodeHighlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl CodeHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    /// Render one fenced code block as a `<pre><code class="language-...">`
    /// fragment.
    ///
    /// The first whitespace-separated token of `info` selects the grammar.
    /// Unknown languages fall back to the plaintext classification; a
    /// highlighting failure inside a recognized grammar falls back to the
    /// escaped, unhighlighted source. Neither aborts the render.
    pub fn highlight_block(&self, info: &str, code: &str) -> String {
        let token = info.split_whitespace().next().unwrap_or("");

        let syntax = if token.is_empty() {
            None
        } else {
            self.syntaxes.find_syntax_by_token(token)
        };

        match syntax {
            Some(syntax) => match self.classed_html(syntax, code) {
                Ok(inner) => wrap_code_block(token, &inner),
                Err(err) => {
                    log::warn!("highlighting failed for language {token:?}: {err}");
                    wrap_code_block(token, &escape_html(code))
                }
            },
            None => wrap_code_block(PLAINTEXT_CLASS, &escape_html(code)),
        }
    }

    fn classed_html(
        &self,
        syntax: &syntect::parsing::SyntaxReference,
        code: &str,
    ) -> std::result::Result<String, syntect::Error> {
        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }
        Ok(generator.finalize())
    }

    /// Stylesheet for the class-based highlight markup, for standalone
    /// exports that render outside the app's own styling.
    pub fn theme_css(&self, theme_name: &str) -> Result<String> {
        let theme = self
            .themes
            .themes
            .get(theme_name)
            .ok_or_else(|| RenderError::Highlight(format!("unknown theme: {theme_name}")))?;

        css_for_theme_with_class_style(theme, ClassStyle::Spaced)
            .map_err(|e| Error::Render(RenderError::Highlight(e.to_string())))
    }
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap_code_block(language: &str, inner: &str) -> String {
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>\n",
        escape_html(language),
        inner
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_language_is_highlighted() {
        let highlighter = CodeHighlighter::new();
        let out = highlighter.highlight_block("rust", "fn main() {}\n");
        assert!(out.contains("language-rust"));
        assert!(out.contains("<span"));
        assert!(out.contains("main"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plaintext() {
        let highlighter = CodeHighlighter::new();
        let out = highlighter.highlight_block("nosuchlanguage", "some text\n");
        assert!(out.contains("language-plaintext"));
        assert!(out.contains("some text"));
    }

    #[test]
    fn test_missing_language_falls_back_to_plaintext() {
        let highlighter = CodeHighlighter::new();
        let out = highlighter.highlight_block("", "bare\n");
        assert!(out.contains("language-plaintext"));
    }

    #[test]
    fn test_plaintext_fallback_escapes_markup() {
        let highlighter = CodeHighlighter::new();
        let out = highlighter.highlight_block("nosuchlanguage", "<script>alert(1)</script>\n");
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_only_first_info_token_selects_language() {
        let highlighter = CodeHighlighter::new();
        let out = highlighter.highlight_block("rust ignore", "let x = 1;\n");
        assert!(out.contains("language-rust"));
    }

    #[test]
    fn test_theme_css_for_known_theme() {
        let highlighter = CodeHighlighter::new();
        let css = highlighter.theme_css("base16-ocean.dark").unwrap();
        assert!(css.contains("color"));
    }

    #[test]
    fn test_theme_css_for_unknown_theme_errors() {
        let highlighter = CodeHighlighter::new();
        assert!(highlighter.theme_css("missing-theme").is_err());
    }
}
