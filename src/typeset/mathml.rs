//! MathML renderer.

use super::MathRenderer;
use crate::error::Result;
use crate::render::escape_html;

/// Renderer that converts LaTeX to MathML.
///
/// With the `mathml` feature (on by default) expressions become `<math>`
/// elements; without it the renderer degrades to the same client-side
/// wrappers as the KaTeX backend. A conversion failure never propagates:
/// the offending expression becomes an inert `math-error` element and the
/// failure is logged.
#[derive(Debug, Default)]
pub struct MathMlRenderer;

impl MathMlRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl MathRenderer for MathMlRenderer {
    fn render_inline(&self, latex: &str) -> Result<String> {
        #[cfg(feature = "mathml")]
        {
            match latex2mathml::latex_to_mathml(latex, latex2mathml::DisplayStyle::Inline) {
                Ok(mathml) => Ok(mathml),
                Err(err) => {
                    log::warn!("mathml conversion failed for {latex:?}: {err}");
                    Ok(format!(
                        r#"<span class="math inline math-error">{}</span>"#,
                        escape_html(latex)
                    ))
                }
            }
        }

        #[cfg(not(feature = "mathml"))]
        {
            Ok(format!(
                r#"<span class="math inline">\({}\)</span>"#,
                escape_html(latex)
            ))
        }
    }

    fn render_display(&self, latex: &str) -> Result<String> {
        #[cfg(feature = "mathml")]
        {
            match latex2mathml::latex_to_mathml(latex, latex2mathml::DisplayStyle::Block) {
                Ok(mathml) => Ok(format!(r#"<div class="math display">{}</div>"#, mathml)),
                Err(err) => {
                    log::warn!("mathml conversion failed for {latex:?}: {err}");
                    Ok(format!(
                        r#"<div class="math display math-error">{}</div>"#,
                        escape_html(latex)
                    ))
                }
            }
        }

        #[cfg(not(feature = "mathml"))]
        {
            Ok(format!(
                r#"<div class="math display">\[{}\]</div>"#,
                escape_html(latex)
            ))
        }
    }

    fn head_content(&self) -> Option<String> {
        // MathML needs no external scripts, just a little styling.
        Some(MATHML_STYLES.to_string())
    }
}

const MATHML_STYLES: &str = r#"<style>
.math-error {
    color: red;
    font-family: monospace;
}
math {
    font-size: 1.1em;
}
</style>"#;
