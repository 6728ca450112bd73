//! WebAssembly bindings for JavaScript/TypeScript.
//!
//! This module provides WASM bindings that work in both Node.js and browser environments.
//!
//! # Usage (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { renderMarkdown, Session, RenderOptions } from '@markdown-studio/wasm';
//!
//! // Initialize the WASM module (required before any other calls)
//! await init();
//!
//! // Simple rendering
//! const html = renderMarkdown('# Hello $E=mc^2$');
//!
//! // With options
//! const options = new RenderOptions();
//! options.setMathBackend('katex');
//! const katexHtml = renderMarkdown(source, options);
//!
//! // Interactive session
//! const session = new Session(null);
//! session.setText(textarea.value);
//! preview.innerHTML = session.html();
//!
//! // Attachments: register files, paste the returned snippets
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const info = session.addAttachment(file.name, file.type, file.lastModified, bytes);
//! console.log(info.snippet);
//!
//! // Template reset with last-writer-wins semantics
//! session.beginTemplateFetch();
//! const body = await fetch('/template.md').then(r => r.text());
//! const toast = session.applyTemplateFetch(body, null);
//! if (toast) showToast(toast);
//! ```

#![cfg(feature = "wasm")]

use crate::attachments::{format_bytes, AttachmentHandle, BlobUri, FileInput, MimeCategory};
use crate::config::SessionOptions;
use crate::render::MarkupPipeline;
use crate::session::{DocumentSession, ExportArtifact, FetchTicket};
use crate::typeset::MathBackend;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in console
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// ============================================================================
// Main API Functions
// ============================================================================

/// Render Markdown to sanitized, typeset HTML.
///
/// This is the primary one-shot function. It builds the rendering pipeline
/// per call; use [`Session`] for anything interactive.
///
/// # Arguments
///
/// * `input` - The Markdown source text.
/// * `options` - Optional configuration object.
///
/// # Returns
///
/// The rendered HTML string. Rendering never throws; malformed input
/// degrades to escaped text or inert error markers.
#[wasm_bindgen(js_name = renderMarkdown)]
pub fn render_markdown(input: &str, options: Option<RenderOptions>) -> String {
    let options = options.map(|o| o.to_session_options()).unwrap_or_default();
    crate::render(input, &options)
}

/// Head markup (scripts or styles) required by a math backend.
///
/// Inject the returned string into the page `<head>` once, before the
/// first render. Returns `undefined` when the backend needs nothing.
#[wasm_bindgen(js_name = mathHeadContent)]
pub fn math_head_content(backend: &str) -> Option<String> {
    crate::typeset::MathTypesetter::new(parse_backend(backend)).head_content()
}

/// CSS for a syntax highlighting theme, to be injected into the page.
///
/// # Errors
///
/// Throws if the theme name is unknown.
#[wasm_bindgen(js_name = highlightCss)]
pub fn highlight_css(theme: &str) -> Result<String, JsError> {
    crate::render::CodeHighlighter::new()
        .theme_css(theme)
        .map_err(|e| JsError::new(&e.to_string()))
}

/// Get the library version.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check if a feature is supported.
#[wasm_bindgen(js_name = hasFeature)]
pub fn has_feature(feature: &str) -> bool {
    match feature {
        "math" => true,
        "highlight" => true,
        "sanitize" => true,
        "attachments" => true,
        "tables" => true,
        "tasklists" => true,
        "footnotes" => true,
        "mathml" => cfg!(feature = "mathml"),
        _ => false,
    }
}

fn parse_backend(name: &str) -> MathBackend {
    match name.to_lowercase().as_str() {
        "katex" => MathBackend::Katex,
        "mathjax" => MathBackend::MathJax,
        _ => MathBackend::MathMl,
    }
}

// ============================================================================
// Configuration Types
// ============================================================================

/// Configuration options for rendering.
#[wasm_bindgen]
#[derive(Clone)]
pub struct RenderOptions {
    math_backend: String,
    highlight_theme: String,
    title: String,
}

#[wasm_bindgen]
impl RenderOptions {
    /// Create a new options object with defaults.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let defaults = SessionOptions::default();
        Self {
            math_backend: "mathml".to_string(),
            highlight_theme: defaults.highlight_theme,
            title: defaults.title,
        }
    }

    /// Set the math rendering backend: "mathml", "katex", or "mathjax".
    #[wasm_bindgen(js_name = setMathBackend)]
    pub fn set_math_backend(&mut self, backend: &str) {
        self.math_backend = backend.to_lowercase();
    }

    /// Get the current math backend.
    #[wasm_bindgen(js_name = getMathBackend)]
    pub fn get_math_backend(&self) -> String {
        self.math_backend.clone()
    }

    /// Set the highlight theme used for exported stylesheets.
    #[wasm_bindgen(js_name = setHighlightTheme)]
    pub fn set_highlight_theme(&mut self, theme: &str) {
        self.highlight_theme = theme.to_string();
    }

    /// Get the highlight theme.
    #[wasm_bindgen(js_name = getHighlightTheme)]
    pub fn get_highlight_theme(&self) -> String {
        self.highlight_theme.clone()
    }

    /// Set the title used by the standalone HTML export.
    #[wasm_bindgen(js_name = setTitle)]
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Get the export title.
    #[wasm_bindgen(js_name = getTitle)]
    pub fn get_title(&self) -> String {
        self.title.clone()
    }

    fn to_session_options(&self) -> SessionOptions {
        SessionOptions {
            title: self.title.clone(),
            highlight_theme: self.highlight_theme.clone(),
            math_backend: parse_backend(&self.math_backend),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Session
// ============================================================================

/// An interactive document session for a browser host.
///
/// Owns the text, the rendered view, and the attachment registry. The
/// pipeline is built once at construction; `setText` re-renders in full.
#[wasm_bindgen]
pub struct Session {
    inner: DocumentSession,
    pending_fetch: Option<FetchTicket>,
}

#[wasm_bindgen]
impl Session {
    /// Create a session. Pass `null` for default options.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<RenderOptions>) -> Self {
        let options = options.map(|o| o.to_session_options()).unwrap_or_default();
        let pipeline = Arc::new(MarkupPipeline::new());
        Self {
            inner: DocumentSession::with_options(pipeline, options),
            pending_fetch: None,
        }
    }

    /// Apply an edit coming from the host's text widget and re-render.
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: &str) {
        self.inner.handle_editor_change(text);
    }

    /// Current source text.
    pub fn text(&self) -> String {
        self.inner.text().to_string()
    }

    /// Current rendered HTML, ready for `innerHTML`.
    pub fn html(&self) -> String {
        self.inner.html().to_string()
    }

    /// Clear the document text.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Value the host's text widget should be reset to after a programmatic
    /// text change, or `undefined`. Consumed once; apply it only while the
    /// widget is not focused.
    #[wasm_bindgen(js_name = takeEditorPush)]
    pub fn take_editor_push(&mut self) -> Option<String> {
        self.inner.take_editor_push()
    }

    /// Register one file as an attachment and return its descriptor.
    ///
    /// The text is not modified. `lastModified` is epoch milliseconds, as
    /// on the JS `File` interface.
    ///
    /// # Errors
    ///
    /// Throws if the file is empty or serialization fails.
    #[wasm_bindgen(js_name = addAttachment)]
    pub fn add_attachment(
        &mut self,
        name: &str,
        mime_type: &str,
        last_modified: f64,
        bytes: js_sys::Uint8Array,
    ) -> Result<JsValue, JsError> {
        let file = FileInput::new(name, mime_type, last_modified as u64, bytes.to_vec());
        let added = self.inner.insert_attachments(vec![file]);

        match added.first() {
            Some(handle) => {
                let info = AttachmentInfo::from_handle(handle);
                serde_wasm_bindgen::to_value(&info).map_err(|e| JsError::new(&e.to_string()))
            }
            None => Err(JsError::new("attachment rejected: empty file")),
        }
    }

    /// All current attachments, newest first.
    pub fn attachments(&self) -> Result<JsValue, JsError> {
        let infos: Vec<AttachmentInfo> = self
            .inner
            .attachments()
            .iter()
            .map(AttachmentInfo::from_handle)
            .collect();
        serde_wasm_bindgen::to_value(&infos).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Attachment list as pretty-printed JSON, for debugging.
    #[wasm_bindgen(js_name = attachmentsToJson)]
    pub fn attachments_to_json(&self) -> Result<String, JsError> {
        let infos: Vec<AttachmentInfo> = self
            .inner
            .attachments()
            .iter()
            .map(AttachmentInfo::from_handle)
            .collect();
        serde_json::to_string_pretty(&infos).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Release every attachment and invalidate their URIs.
    #[wasm_bindgen(js_name = removeAttachments)]
    pub fn remove_attachments(&mut self) {
        self.inner.remove_all_attachments();
    }

    /// Bytes behind an attachment URI, or `undefined` if it was released.
    #[wasm_bindgen(js_name = resolveAttachment)]
    pub fn resolve_attachment(&self, uri: &str) -> Option<Vec<u8>> {
        self.inner
            .resolve_attachment(&BlobUri::from(uri))
            .map(|bytes| bytes.to_vec())
    }

    /// Start a template reset. Call `applyTemplateFetch` once the fetch
    /// settles; an edit in between makes the fetch a no-op.
    #[wasm_bindgen(js_name = beginTemplateFetch)]
    pub fn begin_template_fetch(&mut self) {
        self.pending_fetch = Some(self.inner.begin_template_fetch());
    }

    /// Complete a template reset.
    ///
    /// Pass the fetched template text, or `null` with an error message when
    /// the fetch failed (the built-in welcome content is used instead).
    /// Returns the notice message to show, or `undefined` if the fetch was
    /// superseded.
    #[wasm_bindgen(js_name = applyTemplateFetch)]
    pub fn apply_template_fetch(
        &mut self,
        template: Option<String>,
        error: Option<String>,
    ) -> Option<String> {
        let ticket = self.pending_fetch.take()?;
        let fetched = match template {
            Some(text) => Ok(text),
            None => {
                let message = error.unwrap_or_else(|| "unknown fetch error".to_string());
                Err(crate::error::TemplateError::Fetch(message).into())
            }
        };

        self.inner
            .complete_template_fetch(ticket, fetched)
            .map(str::to_string)
    }

    /// The raw document as a download: `{ filename, mime, content }`.
    #[wasm_bindgen(js_name = exportMarkdown)]
    pub fn export_markdown(&self) -> Result<JsValue, JsError> {
        to_export_value(self.inner.export_markdown())
    }

    /// Newline-joined attachment snippets as a download.
    #[wasm_bindgen(js_name = exportSnippets)]
    pub fn export_snippets(&self) -> Result<JsValue, JsError> {
        to_export_value(self.inner.export_snippets())
    }

    /// The rendered view as a standalone HTML document download.
    #[wasm_bindgen(js_name = exportPreviewHtml)]
    pub fn export_preview_html(&self) -> Result<JsValue, JsError> {
        to_export_value(self.inner.export_preview_html())
    }

    /// Head markup required by this session's math backend, if any.
    #[wasm_bindgen(js_name = headContent)]
    pub fn head_content(&self) -> Option<String> {
        self.inner.head_content()
    }
}

fn to_export_value(artifact: ExportArtifact) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(&ExportInfo::from_artifact(artifact))
        .map_err(|e| JsError::new(&e.to_string()))
}

// ============================================================================
// Serializable Types for JS Interop
// ============================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentInfo {
    id: String,
    uri: String,
    name: String,
    byte_size: u64,
    size_label: String,
    is_image: bool,
    snippet: String,
}

impl AttachmentInfo {
    fn from_handle(handle: &AttachmentHandle) -> Self {
        Self {
            id: handle.id.clone(),
            uri: handle.uri.as_str().to_string(),
            name: handle.name.clone(),
            byte_size: handle.byte_size,
            size_label: format_bytes(handle.byte_size),
            is_image: handle.category == MimeCategory::Image,
            snippet: handle.snippet.clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ExportInfo {
    filename: String,
    mime: String,
    content: String,
}

impl ExportInfo {
    fn from_artifact(artifact: ExportArtifact) -> Self {
        Self {
            filename: artifact.filename.to_string(),
            mime: artifact.mime.to_string(),
            content: artifact.content,
        }
    }
}
