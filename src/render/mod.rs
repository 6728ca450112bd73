//! Markdown rendering: GFM parsing, code highlighting, sanitization.

pub mod highlight;
pub mod sanitize;

pub use highlight::CodeHighlighter;
pub use sanitize::Sanitizer;

use pulldown_cmark::{html, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

/// Configure-once Markdown-to-sanitized-HTML pipeline.
///
/// Parser extensions, the highlighting grammars and the sanitizer
/// allow-list are all established in [`MarkupPipeline::new`] and immutable
/// afterwards; [`MarkupPipeline::render`] is deterministic and free of side
/// effects, so one instance can serve any number of documents.
pub struct MarkupPipeline {
    options: Options,
    highlighter: CodeHighlighter,
    sanitizer: Sanitizer,
}

impl MarkupPipeline {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_GFM);

        Self {
            options,
            highlighter: CodeHighlighter::new(),
            sanitizer: Sanitizer::new(),
        }
    }

    /// Render `source` to sanitized HTML.
    ///
    /// Fenced and indented code blocks are routed through the highlighter;
    /// everything else follows the standard GFM mapping. Single newlines
    /// stay soft breaks. The combined output passes through the allow-list
    /// sanitizer before it is returned.
    pub fn render(&self, source: &str) -> String {
        let parser = Parser::new_ext(source, self.options);

        let mut events = Vec::new();
        let mut in_code_block = false;
        let mut code_info = String::new();
        let mut code_buffer = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_buffer.clear();
                    code_info = match kind {
                        CodeBlockKind::Fenced(info) => info.to_string(),
                        CodeBlockKind::Indented => String::new(),
                    };
                }
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    let block = self.highlighter.highlight_block(&code_info, &code_buffer);
                    events.push(Event::Html(block.into()));
                }
                Event::Text(text) if in_code_block => code_buffer.push_str(&text),
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        self.sanitizer.clean(&html_output)
    }

    pub fn highlighter(&self) -> &CodeHighlighter {
        &self.highlighter
    }
}

impl Default for MarkupPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape text for HTML content and attribute positions.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
