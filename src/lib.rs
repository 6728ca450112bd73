//! # markdown-studio
//!
//! The document core of a live Markdown authoring surface: rendering,
//! math typesetting, file attachments, and session orchestration.
//!
//! ## Features
//!
//! - **GitHub-flavored rendering**: tables, strikethrough, task lists, and
//!   footnotes on top of CommonMark
//! - **Syntax highlighting**: fenced code blocks become class-annotated HTML,
//!   styled by a separately exported theme stylesheet
//! - **Sanitization**: every rendered fragment passes through a fixed
//!   allow-list before anything displays it
//! - **Math typesetting**: inline `$...$` / `\(...\)` and display `$$...$$` /
//!   `\[...\]` with configurable backends, applied after sanitization so the
//!   markup survives
//! - **Attachments**: dropped files become unguessable `blob:` URIs with
//!   ready-to-paste Markdown snippets; the backing bytes are released in bulk
//! - **Sessions**: a [`DocumentSession`] ties text, rendered view, focus
//!   state, notices, and exports together for a host UI
//!
//! ## Quick Start
//!
//! ```rust
//! use markdown_studio::{render, SessionOptions};
//!
//! let html = render("# Hello\n\nInline $E = mc^2$ math.", &SessionOptions::default());
//! assert!(html.contains("<h1>Hello</h1>"));
//! ```
//!
//! For an interactive host, keep a session instead of re-rendering by hand:
//!
//! ```rust
//! use std::sync::Arc;
//! use markdown_studio::{DocumentSession, MarkupPipeline};
//!
//! let pipeline = Arc::new(MarkupPipeline::new());
//! let mut session = DocumentSession::new(pipeline);
//!
//! session.handle_editor_change("**bold** and a task\n\n- [x] done");
//! assert!(session.html().contains("<strong>bold</strong>"));
//! ```
//!
//! ## Rendering model
//!
//! [`MarkupPipeline`] is configure-once: build it, share it behind an `Arc`,
//! and call [`MarkupPipeline::render`] as often as the text changes. Every
//! render is a full pass over the source; there is no incremental state to
//! fall out of sync. Rendering never fails: a fenced block with an unknown
//! language degrades to escaped plaintext, and an invalid math expression
//! becomes an inert error marker.
//!
//! Math typesetting is a separate post-pass ([`MathTypesetter`]) over the
//! sanitized HTML, so delimiters inside code spans and fenced blocks are
//! left alone.
//!
//! ## Math Backends
//!
//! - `MathML` (default): ahead-of-time conversion, no client script needed
//!   (requires the `mathml` feature)
//! - `KaTeX`: emits delimited markup for client-side KaTeX auto-render
//! - `MathJax`: same markup, MathJax script tags
//!
//! ## Attachments
//!
//! [`AttachmentRegistry`] stores raw file bytes under minted `blob:` URIs.
//! URIs are never reused; releasing the registry (or dropping it) makes
//! every URI dangle immediately. Handles carry a Markdown snippet the host
//! can paste into the document.
//!
//! ## FFI
//!
//! The library provides a C-compatible FFI for embedding from other
//! languages, and WASM bindings for browser hosts. See the `ffi` and `wasm`
//! module documentation.
//!
//! ## Feature flags
//!
//! - `mathml` (default): native MathML backend (requires `latex2mathml`)
//! - `wasm`: WebAssembly bindings (requires `wasm-bindgen`)
//! - `editor`: the `mds-preview` desktop application (requires `eframe`)

pub mod attachments;
pub mod config;
pub mod error;
pub mod render;
pub mod session;
pub mod typeset;
pub mod viewport;

// FFI module (only for non-WASM builds)
#[cfg(not(target_arch = "wasm32"))]
pub mod ffi;

// WASM module (only with feature)
#[cfg(feature = "wasm")]
pub mod wasm;

// Convenience re-exports
pub use attachments::{
    format_bytes, AttachmentHandle, AttachmentRegistry, BlobUri, FileInput, MimeCategory,
};
pub use config::{AppConfig, SessionOptions};
pub use error::{AttachmentError, ConfigError, Error, RenderError, Result, TemplateError};
pub use render::{CodeHighlighter, MarkupPipeline, Sanitizer};
pub use session::{
    DocumentSession, ExportArtifact, FetchTicket, FileTemplateSource, Panel, TemplateSource,
    NOTICE_TTL, WELCOME_TEXT,
};
pub use typeset::{MathBackend, MathRenderer, MathTypesetter};
pub use viewport::{Debouncer, MobileProbe};

/// Render Markdown to sanitized, typeset HTML in one step.
///
/// This builds a fresh [`MarkupPipeline`] and [`MathTypesetter`] per call,
/// which is fine for one-shot use. Interactive hosts should construct both
/// once and re-use them.
///
/// # Example
///
/// ```rust
/// use markdown_studio::{render, SessionOptions};
///
/// let html = render("- [ ] try *this*", &SessionOptions::default());
/// assert!(html.contains("<em>this</em>"));
/// ```
pub fn render(input: &str, options: &SessionOptions) -> String {
    let pipeline = MarkupPipeline::new();
    let typesetter = MathTypesetter::new(options.math_backend);
    typesetter.apply(&pipeline.render(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_default(input: &str) -> String {
        render(input, &SessionOptions::default())
    }

    #[test]
    fn test_full_pipeline() {
        let input = r#"# Introduction

The equation $E = mc^2$ is famous.

```rust
fn main() {}
```

| Col A | Col B |
| ----- | ----- |
| 1     | 2     |
"#;

        let html = render_default(input);

        assert!(html.contains("<h1>Introduction</h1>"));
        assert!(html.contains("language-rust"));
        assert!(html.contains("<table"));
        assert!(!html.contains("$E"));
    }

    #[test]
    fn test_simple_markdown() {
        let html = render_default("# Hello\n\n**Bold** and *italic* text.");

        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<strong>Bold</strong>"));
        assert!(html.contains("<em>italic</em>"));
    }

    #[test]
    fn test_code_block_keeps_language_class() {
        let html = render_default("```rust\nfn main() {}\n```");

        assert!(html.contains("<pre><code"));
        assert!(html.contains("language-rust"));
    }

    #[test]
    fn test_list() {
        let html = render_default("- Item 1\n- Item 2\n- Item 3");

        assert!(html.contains("<ul>"));
        assert!(html.contains("<li>"));
    }

    #[test]
    fn test_display_math() {
        let html = render_default("$$\n\\int_0^1 x dx\n$$");

        assert!(html.contains("math display") || html.contains("<math"));
        assert!(!html.contains("$$"));
    }

    #[test]
    fn test_raw_script_is_neutralized() {
        let html = render_default("hello <script>alert(1)</script> world");

        assert!(!html.contains("<script"));
        assert!(html.contains("hello"));
    }

    #[test]
    fn test_math_inside_code_span_is_literal() {
        let html = render_default("use `$x$` for math");

        assert!(html.contains("$x$"));
    }

    #[test]
    fn test_footnotes() {
        let html = render_default("Some text[^1].\n\n[^1]: The note.\n");

        assert!(html.contains("footnote"));
    }
}
