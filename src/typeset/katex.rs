//! KaTeX/MathJax passthrough renderer.

use super::MathRenderer;
use crate::error::Result;
use crate::render::escape_html;

/// Renderer that emits raw LaTeX in `\(..\)` / `\[..\]` wrappers for a
/// client-side typesetting script to pick up.
pub struct KatexRenderer {
    use_mathjax: bool,
}

impl KatexRenderer {
    pub fn new() -> Self {
        Self { use_mathjax: false }
    }

    /// Same wrappers, MathJax head content.
    pub fn new_mathjax() -> Self {
        Self { use_mathjax: true }
    }
}

impl Default for KatexRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MathRenderer for KatexRenderer {
    fn render_inline(&self, latex: &str) -> Result<String> {
        Ok(format!(
            r#"<span class="math inline">\({}\)</span>"#,
            escape_html(latex)
        ))
    }

    fn render_display(&self, latex: &str) -> Result<String> {
        Ok(format!(
            r#"<div class="math display">\[{}\]</div>"#,
            escape_html(latex)
        ))
    }

    fn head_content(&self) -> Option<String> {
        if self.use_mathjax {
            Some(MATHJAX_HEAD.to_string())
        } else {
            Some(KATEX_HEAD.to_string())
        }
    }
}

// Only the backslash delimiter forms appear in the config: by the time the
// client script runs, every `$` region has already been rewritten into a
// `\(..\)` or `\[..\]` wrapper.
const KATEX_HEAD: &str = r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css" crossorigin="anonymous">
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js" crossorigin="anonymous"></script>
<script defer src="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/contrib/auto-render.min.js" crossorigin="anonymous"
    onload="renderMathInElement(document.body, {
        delimiters: [
            {left: '\\[', right: '\\]', display: true},
            {left: '\\(', right: '\\)', display: false}
        ],
        throwOnError: false
    });"></script>"#;

const MATHJAX_HEAD: &str = r#"<script>
MathJax = {
    tex: {
        inlineMath: [['\\(', '\\)']],
        displayMath: [['\\[', '\\]']]
    }
};
</script>
<script id="MathJax-script" async src="https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js"></script>"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_wrapper() {
        let renderer = KatexRenderer::new();
        let result = renderer.render_inline("E = mc^2").unwrap();
        assert!(result.contains(r"\(E = mc^2\)"));
        assert!(result.contains("math inline"));
    }

    #[test]
    fn test_display_wrapper() {
        let renderer = KatexRenderer::new();
        let result = renderer.render_display("\\int_0^1 x dx").unwrap();
        assert!(result.contains("math display"));
        assert!(result.contains(r"\[\int_0^1 x dx\]"));
    }

    #[test]
    fn test_latex_is_escaped() {
        let renderer = KatexRenderer::new();
        let result = renderer.render_inline("a < b").unwrap();
        assert!(result.contains("&lt;"));
    }

    #[test]
    fn test_head_content_differs() {
        assert!(KatexRenderer::new().head_content().unwrap().contains("katex"));
        assert!(KatexRenderer::new_mathjax().head_content().unwrap().contains("MathJax"));
    }
}
