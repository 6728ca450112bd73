//! Document session: source text, rendered view, attachment lifecycle,
//! focus state, notices and exports.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::attachments::{AttachmentHandle, AttachmentRegistry, BlobUri, FileInput};
use crate::config::{SessionOptions, DEFAULT_TEMPLATE_PATH};
use crate::error::{Result, TemplateError};
use crate::render::{escape_html, MarkupPipeline};
use crate::typeset::MathTypesetter;

/// Built-in starter content, used whenever the template fetch fails.
pub const WELCOME_TEXT: &str =
    "# Welcome to Markdown Studio\n\nStart writing your markdown here...";

/// How long a transient notice stays visible.
pub const NOTICE_TTL: Duration = Duration::from_millis(1200);

const NOTICE_RESET_TEMPLATE: &str = "Reset to welcome content";
const NOTICE_RESET_FALLBACK: &str = "Reset to fallback content";

/// Regions a session can exclusively expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Attachments,
    Editor,
    Preview,
}

/// A downloadable projection of session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub filename: &'static str,
    pub mime: &'static str,
    pub content: String,
}

/// Witness for an in-flight template fetch. The fetch result only applies
/// if no text mutation happened in between (last writer wins).
#[derive(Debug, Clone, Copy)]
pub struct FetchTicket {
    generation: u64,
}

/// Source of starter template content.
pub trait TemplateSource {
    fn fetch(&self) -> Result<String>;
}

/// Template source reading a well-known file path.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    path: PathBuf,
}

impl FileTemplateSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for FileTemplateSource {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_PATH)
    }
}

impl TemplateSource for FileTemplateSource {
    fn fetch(&self) -> Result<String> {
        if !self.path.exists() {
            return Err(TemplateError::NotFound(self.path.display().to_string()).into());
        }
        std::fs::read_to_string(&self.path)
            .map_err(|e| TemplateError::Fetch(e.to_string()).into())
    }
}

/// One authoring session over a single in-memory document.
///
/// The session owns the source text, the sanitized-and-typeset rendered
/// view (recomputed in full on every text change), and the attachment
/// registry. Dropping the session drops the registry, which releases every
/// blob object exactly once.
pub struct DocumentSession {
    pipeline: Arc<MarkupPipeline>,
    typesetter: MathTypesetter,
    registry: AttachmentRegistry,
    options: SessionOptions,
    text: String,
    html: String,
    focus: Option<Panel>,
    notice: Option<(String, Instant)>,
    editor_push: Option<String>,
    generation: u64,
}

impl DocumentSession {
    pub fn new(pipeline: Arc<MarkupPipeline>) -> Self {
        Self::with_options(pipeline, SessionOptions::default())
    }

    pub fn with_options(pipeline: Arc<MarkupPipeline>, options: SessionOptions) -> Self {
        let typesetter = MathTypesetter::new(options.math_backend);
        let mut session = Self {
            pipeline,
            typesetter,
            registry: AttachmentRegistry::new(),
            options,
            text: String::new(),
            html: String::new(),
            focus: None,
            notice: None,
            editor_push: None,
            generation: 0,
        };
        session.render_now();
        session
    }

    /// Current source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Current rendered view (sanitized, typeset HTML).
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Apply an edit coming from the text widget itself.
    ///
    /// The widget already shows this value, so nothing is queued for
    /// push-back; mirroring it would risk clobbering in-progress typing.
    pub fn handle_editor_change(&mut self, text: impl Into<String>) {
        self.generation += 1;
        self.text = text.into();
        self.render_now();
    }

    /// Set the text to empty.
    pub fn clear(&mut self) {
        self.apply_programmatic_text(String::new());
    }

    /// Value the text widget should be reset to after a programmatic text
    /// operation. Consumed once; the shell pushes it only while the widget
    /// is not focused.
    pub fn take_editor_push(&mut self) -> Option<String> {
        self.editor_push.take()
    }

    /// Hand a batch of files to the attachment registry. The text is never
    /// modified; the new handles carry ready-to-insert snippets.
    pub fn insert_attachments(&mut self, files: Vec<FileInput>) -> &[AttachmentHandle] {
        self.registry.add(files)
    }

    /// Current attachments, newest first.
    pub fn attachments(&self) -> &[AttachmentHandle] {
        self.registry.snapshot()
    }

    /// Release every attachment eagerly. Idempotent; dropping the session
    /// does the same implicitly.
    pub fn remove_all_attachments(&mut self) {
        self.registry.remove_all();
    }

    /// Bytes behind an attachment URI, for display surfaces.
    pub fn resolve_attachment(&self, uri: &BlobUri) -> Option<&[u8]> {
        self.registry.resolve(uri)
    }

    /// Head markup required by this session's math backend, if any.
    pub fn head_content(&self) -> Option<String> {
        self.typesetter.head_content()
    }

    /// Start a template reset. The returned ticket captures the current
    /// text generation; feed it back through [`Self::apply_template_fetch`]
    /// once the fetch resolves.
    pub fn begin_template_fetch(&self) -> FetchTicket {
        FetchTicket { generation: self.generation }
    }

    /// Complete a template reset, raising a notice on success.
    ///
    /// Returns `false` (and changes nothing) if a text mutation superseded
    /// the fetch. Otherwise the fetched template replaces the text and a
    /// notice is raised; on any fetch error the built-in welcome content is
    /// used instead. The caller never sees the error.
    pub fn apply_template_fetch(
        &mut self,
        ticket: FetchTicket,
        fetched: Result<String>,
        now: Instant,
    ) -> bool {
        match self.complete_template_fetch(ticket, fetched) {
            Some(notice) => {
                self.set_notice(notice, now);
                true
            }
            None => false,
        }
    }

    /// Complete a template reset without touching the notice state, for
    /// hosts that run their own toast timing. Returns the notice message
    /// to show, or `None` if the fetch was superseded.
    pub fn complete_template_fetch(
        &mut self,
        ticket: FetchTicket,
        fetched: Result<String>,
    ) -> Option<&'static str> {
        if ticket.generation != self.generation {
            log::debug!("template fetch superseded by a newer edit");
            return None;
        }

        let (text, notice) = match fetched {
            Ok(template) => (template, NOTICE_RESET_TEMPLATE),
            Err(err) => {
                log::warn!("template fetch failed, using built-in content: {err}");
                (WELCOME_TEXT.to_string(), NOTICE_RESET_FALLBACK)
            }
        };

        self.apply_programmatic_text(text);
        Some(notice)
    }

    /// Synchronous template reset; always succeeds from the caller's view.
    pub fn reset_to_template(&mut self, source: &dyn TemplateSource, now: Instant) {
        let ticket = self.begin_template_fetch();
        self.apply_template_fetch(ticket, source.fetch(), now);
    }

    /// Strict toggle: focusing the focused panel returns to none.
    pub fn toggle_focus(&mut self, panel: Panel) {
        self.focus = if self.focus == Some(panel) { None } else { Some(panel) };
    }

    pub fn focus(&self) -> Option<Panel> {
        self.focus
    }

    /// Raise a transient notice.
    pub fn set_notice(&mut self, message: impl Into<String>, now: Instant) {
        self.notice = Some((message.into(), now));
    }

    /// The current notice, if it has not expired yet.
    pub fn notice(&self, now: Instant) -> Option<&str> {
        match &self.notice {
            Some((message, raised)) if now.duration_since(*raised) < NOTICE_TTL => {
                Some(message.as_str())
            }
            _ => None,
        }
    }

    /// The raw document, as `document.md`.
    pub fn export_markdown(&self) -> ExportArtifact {
        ExportArtifact {
            filename: "document.md",
            mime: "text/markdown",
            content: self.text.clone(),
        }
    }

    /// Newline-joined attachment snippets, as `attachments.md`.
    pub fn export_snippets(&self) -> ExportArtifact {
        let content = self
            .registry
            .snapshot()
            .iter()
            .map(|handle| handle.snippet.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        ExportArtifact { filename: "attachments.md", mime: "text/markdown", content }
    }

    /// The rendered view wrapped in a minimal standalone document, as
    /// `preview.html`, so the export holds up outside the app's styling.
    pub fn export_preview_html(&self) -> ExportArtifact {
        let mut out = String::new();
        out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
        out.push_str("<meta charset=\"UTF-8\">\n");
        out.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
        out.push_str(&format!("<title>{}</title>\n", escape_html(&self.options.title)));

        if let Some(head) = self.typesetter.head_content() {
            out.push_str(&head);
            out.push('\n');
        }

        match self.pipeline.highlighter().theme_css(&self.options.highlight_theme) {
            Ok(css) => {
                out.push_str("<style>\n");
                out.push_str(&css);
                out.push_str("</style>\n");
            }
            Err(err) => log::warn!("highlight stylesheet unavailable: {err}"),
        }

        out.push_str(BASE_STYLES);
        out.push_str("</head>\n<body>\n");
        out.push_str("<article class=\"markdown-body\" aria-live=\"polite\">\n");
        out.push_str(&self.html);
        out.push_str("\n</article>\n</body>\n</html>\n");

        ExportArtifact { filename: "preview.html", mime: "text/html", content: out }
    }

    fn apply_programmatic_text(&mut self, text: String) {
        self.generation += 1;
        self.editor_push = Some(text.clone());
        self.text = text;
        self.render_now();
    }

    fn render_now(&mut self) {
        let rendered = self.pipeline.render(&self.text);
        self.html = self.typesetter.apply(&rendered);
    }
}

const BASE_STYLES: &str = r#"<style>
body {
    margin: 0;
    background: #0d1117;
    color: #e6edf3;
    font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif;
}
article.markdown-body {
    max-width: 52rem;
    margin: 0 auto;
    padding: 2rem 1.5rem;
    line-height: 1.6;
}
.markdown-body pre {
    padding: 0.75rem;
    overflow-x: auto;
    border-radius: 6px;
    background: #161b22;
}
.markdown-body code {
    font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
}
.markdown-body img {
    max-width: 100%;
}
.markdown-body table {
    border-collapse: collapse;
}
.markdown-body th, .markdown-body td {
    border: 1px solid #30363d;
    padding: 0.3rem 0.6rem;
}
.markdown-body blockquote {
    margin-left: 0;
    padding-left: 1rem;
    border-left: 3px solid #30363d;
    color: #9198a1;
}
</style>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct StaticSource(&'static str);

    impl TemplateSource for StaticSource {
        fn fetch(&self) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingSource;

    impl TemplateSource for FailingSource {
        fn fetch(&self) -> Result<String> {
            Err(TemplateError::Fetch("connection refused".to_string()).into())
        }
    }

    fn session() -> DocumentSession {
        DocumentSession::new(Arc::new(MarkupPipeline::new()))
    }

    fn png(name: &str) -> FileInput {
        FileInput::new(name, "image/png", 1_700_000_000_000, vec![1, 2, 3])
    }

    #[test]
    fn test_editor_change_rerenders() {
        let mut session = session();
        session.handle_editor_change("# Hello");
        assert_eq!(session.text(), "# Hello");
        assert!(session.html().contains("<h1>Hello</h1>"));
    }

    #[test]
    fn test_rendered_view_tracks_latest_text() {
        let mut session = session();
        session.handle_editor_change("# One");
        session.handle_editor_change("# Two");
        assert!(session.html().contains("Two"));
        assert!(!session.html().contains("One"));
    }

    #[test]
    fn test_render_is_deterministic_across_changes() {
        let mut session = session();
        session.handle_editor_change("Some $x^2$ and `code`.");
        let first = session.html().to_string();
        session.handle_editor_change("interruption");
        session.handle_editor_change("Some $x^2$ and `code`.");
        assert_eq!(session.html(), first);
    }

    #[test]
    fn test_editor_change_does_not_queue_push() {
        let mut session = session();
        session.handle_editor_change("typed by hand");
        assert_eq!(session.take_editor_push(), None);
    }

    #[test]
    fn test_clear_empties_text_and_queues_push() {
        let mut session = session();
        session.handle_editor_change("something");
        session.clear();
        assert_eq!(session.text(), "");
        assert_eq!(session.take_editor_push(), Some(String::new()));
        // Consumed exactly once.
        assert_eq!(session.take_editor_push(), None);
    }

    #[test]
    fn test_insert_attachments_leaves_text_alone() {
        let mut session = session();
        session.handle_editor_change("untouched");
        session.insert_attachments(vec![png("a.png")]);
        assert_eq!(session.text(), "untouched");
        assert_eq!(session.attachments().len(), 1);
        assert_eq!(session.take_editor_push(), None);
    }

    #[test]
    fn test_reset_uses_fetched_template() {
        let mut session = session();
        session.reset_to_template(&StaticSource("# Starter"), Instant::now());
        assert_eq!(session.text(), "# Starter");
        assert!(session.html().contains("<h1>Starter</h1>"));
        assert_eq!(session.notice(Instant::now()), Some("Reset to welcome content"));
        assert_eq!(session.take_editor_push(), Some("# Starter".to_string()));
    }

    #[test]
    fn test_reset_falls_back_when_fetch_fails() {
        let mut session = session();
        session.handle_editor_change("old");
        session.reset_to_template(&FailingSource, Instant::now());
        assert_eq!(session.text(), WELCOME_TEXT);
        assert!(!session.html().is_empty());
        assert_eq!(session.notice(Instant::now()), Some("Reset to fallback content"));
    }

    #[test]
    fn test_template_race_last_writer_wins() {
        let mut session = session();
        let ticket = session.begin_template_fetch();
        session.handle_editor_change("user kept typing");

        let applied =
            session.apply_template_fetch(ticket, Ok("# Late template".to_string()), Instant::now());

        assert!(!applied);
        assert_eq!(session.text(), "user kept typing");
        assert_eq!(session.notice(Instant::now()), None);
    }

    #[test]
    fn test_template_applies_without_interleaving_edit() {
        let mut session = session();
        let ticket = session.begin_template_fetch();
        let applied = session.apply_template_fetch(ticket, Ok("# Fresh".to_string()), Instant::now());
        assert!(applied);
        assert_eq!(session.text(), "# Fresh");
    }

    #[test]
    fn test_focus_is_a_strict_toggle() {
        let mut session = session();
        assert_eq!(session.focus(), None);

        session.toggle_focus(Panel::Editor);
        assert_eq!(session.focus(), Some(Panel::Editor));

        session.toggle_focus(Panel::Editor);
        assert_eq!(session.focus(), None);

        session.toggle_focus(Panel::Editor);
        session.toggle_focus(Panel::Preview);
        assert_eq!(session.focus(), Some(Panel::Preview));
    }

    #[test]
    fn test_notice_expires_after_ttl() {
        let mut session = session();
        let t0 = Instant::now();
        session.set_notice("Copied Markdown", t0);

        assert_eq!(session.notice(t0), Some("Copied Markdown"));
        assert_eq!(session.notice(t0 + Duration::from_millis(1100)), Some("Copied Markdown"));
        assert_eq!(session.notice(t0 + NOTICE_TTL), None);
    }

    #[test]
    fn test_export_markdown() {
        let mut session = session();
        session.handle_editor_change("raw *markdown*");
        let artifact = session.export_markdown();
        assert_eq!(artifact.filename, "document.md");
        assert_eq!(artifact.mime, "text/markdown");
        assert_eq!(artifact.content, "raw *markdown*");
    }

    #[test]
    fn test_export_snippets_joined_newest_first() {
        let mut session = session();
        session.insert_attachments(vec![png("first.png")]);
        session.insert_attachments(vec![png("second.png")]);

        let artifact = session.export_snippets();
        assert_eq!(artifact.filename, "attachments.md");
        assert_eq!(artifact.mime, "text/markdown");

        let lines: Vec<&str> = artifact.content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("second.png"));
        assert!(lines[1].contains("first.png"));
    }

    #[test]
    fn test_export_preview_html_is_standalone() {
        let mut session = session();
        session.handle_editor_change("# Exported");
        let artifact = session.export_preview_html();

        assert_eq!(artifact.filename, "preview.html");
        assert_eq!(artifact.mime, "text/html");
        assert!(artifact.content.starts_with("<!DOCTYPE html>"));
        assert!(artifact.content.contains(r#"<article class="markdown-body" aria-live="polite">"#));
        assert!(artifact.content.contains("<h1>Exported</h1>"));
        assert!(artifact.content.contains("<title>Markdown Studio Preview</title>"));
    }

    #[test]
    fn test_end_to_end_heading_and_math() {
        let mut session = session();
        session.handle_editor_change("# Title\n\nSome $x^2$ math.");

        let html = session.html();
        assert!(html.contains("<h1>Title</h1>"));
        assert!(!html.contains('$'));
        assert!(html.contains("<math") || html.contains("math inline"));
    }

    #[test]
    fn test_attachment_snippet_round_trip_through_render() {
        let mut session = session();
        session.insert_attachments(vec![png("shot.png")]);
        let snippet = session.attachments()[0].snippet.clone();
        let uri = session.attachments()[0].uri.clone();

        session.handle_editor_change(snippet);
        assert!(session.html().contains(uri.as_str()));
        assert!(session.resolve_attachment(&uri).is_some());
    }
}
