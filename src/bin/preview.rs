//! mds-preview: a desktop shell for markdown-studio document sessions
//!
//! Run with: cargo run --bin mds-preview --features editor
//! Or: cargo run --bin mds-preview --features editor -- path/to/file.md

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use eframe::egui;
use markdown_studio::{
    format_bytes, AppConfig, BlobUri, DocumentSession, ExportArtifact, FileInput,
    FileTemplateSource, MarkupPipeline, MimeCategory, MobileProbe, Panel,
};

const CONFIG_PATH: &str = "mds-preview.toml";

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("mds-preview"),
        ..Default::default()
    };

    // Check for file argument
    let initial_file = std::env::args().nth(1).map(PathBuf::from);

    eframe::run_native(
        "mds-preview",
        options,
        Box::new(|cc| Ok(Box::new(StudioApp::new(cc, initial_file)))),
    )
}

struct StudioApp {
    /// The document session driving everything below
    session: DocumentSession,
    /// Text widget buffer; the session pushes programmatic changes back here
    editor_text: String,
    /// Starter template for New and for first launch
    template: FileTemplateSource,
    /// Compact-layout probe fed from the window width
    probe: MobileProbe,
    /// Current file path (if any)
    current_file: Option<PathBuf>,
    /// Whether the document has unsaved changes
    dirty: bool,
    /// Whether the text widget had focus last frame
    editor_focused: bool,
    /// Show rendered HTML source instead of the formatted preview
    show_html_source: bool,
    /// Font size for the editor
    font_size: f32,
    /// Split ratio between editor and preview
    split_ratio: f32,
}

impl StudioApp {
    fn new(_cc: &eframe::CreationContext<'_>, initial_file: Option<PathBuf>) -> Self {
        let config = AppConfig::load_or_default(Path::new(CONFIG_PATH));
        let pipeline = Arc::new(MarkupPipeline::new());
        let session = DocumentSession::with_options(pipeline, config.session.clone());
        let template = FileTemplateSource::new(config.template_path.clone());

        let mut app = Self {
            session,
            editor_text: String::new(),
            template,
            probe: MobileProbe::with_breakpoint(config.mobile_breakpoint),
            current_file: None,
            dirty: false,
            editor_focused: false,
            show_html_source: false,
            font_size: config.font_size,
            split_ratio: 0.5,
        };

        match initial_file {
            Some(path) => app.load_file(&path),
            None => app.session.reset_to_template(&app.template, Instant::now()),
        }
        if let Some(text) = app.session.take_editor_push() {
            app.editor_text = text;
        }

        app
    }

    fn load_file(&mut self, path: &Path) {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                self.editor_text = content.clone();
                self.session.handle_editor_change(content);
                self.current_file = Some(path.to_path_buf());
                self.dirty = false;
            }
            Err(e) => {
                self.session
                    .set_notice(format!("Failed to load file: {e}"), Instant::now());
            }
        }
    }

    fn save_file(&mut self) {
        if let Some(path) = self.current_file.clone() {
            match std::fs::write(&path, self.session.text()) {
                Ok(_) => {
                    self.dirty = false;
                    self.session.set_notice("Saved", Instant::now());
                }
                Err(e) => {
                    self.session
                        .set_notice(format!("Failed to save file: {e}"), Instant::now());
                }
            }
        } else {
            self.save_file_as();
        }
    }

    fn save_file_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Markdown", &["md"])
            .add_filter("All files", &["*"])
            .set_file_name("document.md")
            .save_file()
        {
            self.current_file = Some(path);
            self.save_file();
        }
    }

    fn open_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Markdown", &["md"])
            .add_filter("All files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    fn new_document(&mut self) {
        self.session.reset_to_template(&self.template, Instant::now());
        self.current_file = None;
        self.dirty = false;
    }

    fn export_artifact(&mut self, artifact: ExportArtifact) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(artifact.filename)
            .save_file()
        {
            match std::fs::write(&path, artifact.content) {
                Ok(_) => {
                    self.session
                        .set_notice(format!("Exported {}", path.display()), Instant::now());
                }
                Err(e) => {
                    self.session
                        .set_notice(format!("Failed to export: {e}"), Instant::now());
                }
            }
        }
    }

    fn pick_attachments(&mut self) {
        let Some(paths) = rfd::FileDialog::new().pick_files() else {
            return;
        };

        let mut files = Vec::new();
        for path in paths {
            match std::fs::read(&path) {
                Ok(bytes) => {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "file".to_string());
                    let modified = std::fs::metadata(&path)
                        .ok()
                        .and_then(|m| m.modified().ok())
                        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                        .map(|d| d.as_millis() as u64)
                        .unwrap_or_else(epoch_millis);
                    let mime = guess_mime(&name).to_string();
                    files.push(FileInput::new(name, mime, modified, bytes));
                }
                Err(err) => log::warn!("could not read {}: {err}", path.display()),
            }
        }

        self.add_attachments(files);
    }

    fn add_attachments(&mut self, files: Vec<FileInput>) {
        if files.is_empty() {
            return;
        }
        let count = self.session.insert_attachments(files).len();
        self.session
            .set_notice(format!("Added {count} attachment(s)"), Instant::now());
    }

    fn window_title(&self) -> String {
        let file_name = self
            .current_file
            .as_ref()
            .map(|p| p.file_name().unwrap_or_default().to_string_lossy().to_string())
            .unwrap_or_else(|| "Untitled".to_string());

        let dirty_marker = if self.dirty { " *" } else { "" };

        format!("{}{} - mds-preview", file_name, dirty_marker)
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::N)) {
            self.new_document();
        }
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::O)) {
            self.open_file();
        }
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S)) {
            if ctx.input(|i| i.modifiers.shift) {
                self.save_file_as();
            } else {
                self.save_file();
            }
        }
        if ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::E)) {
            let artifact = self.session.export_preview_html();
            self.export_artifact(artifact);
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui
                        .add(egui::Button::new("New").shortcut_text("Ctrl+N"))
                        .clicked()
                    {
                        self.new_document();
                        ui.close_menu();
                    }
                    if ui
                        .add(egui::Button::new("Open...").shortcut_text("Ctrl+O"))
                        .clicked()
                    {
                        self.open_file();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui
                        .add(egui::Button::new("Save").shortcut_text("Ctrl+S"))
                        .clicked()
                    {
                        self.save_file();
                        ui.close_menu();
                    }
                    if ui
                        .add(egui::Button::new("Save As...").shortcut_text("Ctrl+Shift+S"))
                        .clicked()
                    {
                        self.save_file_as();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Export Markdown...").clicked() {
                        let artifact = self.session.export_markdown();
                        self.export_artifact(artifact);
                        ui.close_menu();
                    }
                    if ui.button("Export Attachment Snippets...").clicked() {
                        let artifact = self.session.export_snippets();
                        self.export_artifact(artifact);
                        ui.close_menu();
                    }
                    if ui
                        .add(egui::Button::new("Export Preview HTML...").shortcut_text("Ctrl+E"))
                        .clicked()
                    {
                        let artifact = self.session.export_preview_html();
                        self.export_artifact(artifact);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_html_source, "Show HTML source");
                    ui.separator();
                    ui.horizontal(|ui| {
                        ui.label("Font size:");
                        ui.add(egui::Slider::new(&mut self.font_size, 10.0..=24.0).suffix("px"));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Split:");
                        ui.add(egui::Slider::new(&mut self.split_ratio, 0.2..=0.8));
                    });
                    ui.separator();
                    if ui.button("Focus attachments").clicked() {
                        self.session.toggle_focus(Panel::Attachments);
                        ui.close_menu();
                    }
                    if ui.button("Focus editor").clicked() {
                        self.session.toggle_focus(Panel::Editor);
                        ui.close_menu();
                    }
                    if ui.button("Focus preview").clicked() {
                        self.session.toggle_focus(Panel::Preview);
                        ui.close_menu();
                    }
                });

                // Right-aligned status
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(path) = &self.current_file {
                        ui.label(
                            egui::RichText::new(path.to_string_lossy())
                                .small()
                                .color(egui::Color32::GRAY),
                        );
                    }
                });
            });
        });
    }

    fn notice_bar(&mut self, ctx: &egui::Context, now: Instant) {
        if let Some(message) = self.session.notice(now) {
            let message = message.to_string();
            egui::TopBottomPanel::bottom("notice_panel").show(ctx, |ui| {
                ui.label(egui::RichText::new(message).color(egui::Color32::LIGHT_GREEN));
            });
            // Keep repainting so the notice disappears on time.
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn attachments_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Attachments");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⛶").on_hover_text("Toggle full view").clicked() {
                    self.session.toggle_focus(Panel::Attachments);
                }
            });
        });
        ui.separator();

        ui.horizontal(|ui| {
            if ui.button("Add files...").clicked() {
                self.pick_attachments();
            }
            if ui.button("Remove all").clicked() {
                self.session.remove_all_attachments();
            }
        });
        ui.label(
            egui::RichText::new("Drop files anywhere to attach them.")
                .small()
                .color(egui::Color32::GRAY),
        );
        ui.separator();

        let mut copied: Option<String> = None;
        egui::ScrollArea::vertical()
            .id_salt("attachments_scroll")
            .show(ui, |ui| {
                for handle in self.session.attachments() {
                    ui.group(|ui| {
                        ui.horizontal(|ui| {
                            let icon = if handle.category == MimeCategory::Image {
                                "🖼"
                            } else {
                                "📄"
                            };
                            ui.label(icon);
                            ui.vertical(|ui| {
                                ui.label(egui::RichText::new(&handle.name).strong());
                                ui.label(
                                    egui::RichText::new(format_bytes(handle.byte_size))
                                        .small()
                                        .color(egui::Color32::GRAY),
                                );
                            });
                        });
                        ui.horizontal(|ui| {
                            if ui.small_button("Copy snippet").clicked() {
                                copied = Some(handle.snippet.clone());
                            }
                            ui.label(
                                egui::RichText::new(handle.uri.as_str())
                                    .small()
                                    .monospace()
                                    .color(egui::Color32::DARK_GRAY),
                            );
                        });
                    });
                }
            });

        if let Some(snippet) = copied {
            ui.ctx().copy_text(snippet);
            self.session
                .set_notice("Copied snippet to clipboard", Instant::now());
        }
    }

    fn editor_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Editor");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⛶").on_hover_text("Toggle full view").clicked() {
                    self.session.toggle_focus(Panel::Editor);
                }
                if ui.button("Clear").clicked() {
                    self.session.clear();
                }
                let lines = self.editor_text.lines().count();
                let chars = self.editor_text.len();
                ui.label(
                    egui::RichText::new(format!("{} lines, {} chars", lines, chars))
                        .small()
                        .color(egui::Color32::GRAY),
                );
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("editor_scroll")
            .show(ui, |ui| {
                let response = ui.add(
                    egui::TextEdit::multiline(&mut self.editor_text)
                        .font(egui::FontId::monospace(self.font_size))
                        .code_editor()
                        .desired_width(f32::INFINITY)
                        .desired_rows(30)
                        .lock_focus(true),
                );

                self.editor_focused = response.has_focus();
                if response.changed() {
                    self.dirty = true;
                    self.session.handle_editor_change(self.editor_text.clone());
                }
            });
    }

    fn preview_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Preview");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("⛶").on_hover_text("Toggle full view").clicked() {
                    self.session.toggle_focus(Panel::Preview);
                }
                if ui
                    .button(if self.show_html_source {
                        "Show preview"
                    } else {
                        "Show HTML"
                    })
                    .clicked()
                {
                    self.show_html_source = !self.show_html_source;
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("preview_scroll")
            .show(ui, |ui| {
                if self.show_html_source {
                    // Show raw HTML source
                    ui.add(
                        egui::TextEdit::multiline(&mut self.session.html())
                            .font(egui::FontId::monospace(self.font_size))
                            .code_editor()
                            .desired_width(f32::INFINITY),
                    );
                } else {
                    // egui has no HTML renderer; approximate the structure
                    render_preview(ui, &self.session);
                }
            });
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Update window title
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.window_title()));

        let now = Instant::now();
        self.probe.observe(ctx.screen_rect().width() as u32, now);
        self.probe.poll(now);
        let compact = self.probe.is_mobile();

        // Dropped files become attachments, never text edits.
        let dropped = collect_dropped_files(ctx);
        self.add_attachments(dropped);

        // Programmatic text changes reach the widget only while it is not
        // focused, so in-progress typing is never clobbered.
        if !self.editor_focused {
            if let Some(text) = self.session.take_editor_push() {
                self.editor_text = text;
            }
        }

        self.handle_shortcuts(ctx);
        self.menu_bar(ctx);
        self.notice_bar(ctx, now);

        match self.session.focus() {
            Some(Panel::Attachments) => {
                egui::CentralPanel::default().show(ctx, |ui| self.attachments_ui(ui));
            }
            Some(Panel::Editor) => {
                egui::CentralPanel::default().show(ctx, |ui| self.editor_ui(ui));
            }
            Some(Panel::Preview) => {
                egui::CentralPanel::default().show(ctx, |ui| self.preview_ui(ui));
            }
            None if compact => {
                let count = self.session.attachments().len();
                egui::TopBottomPanel::top("attachments_bar").show(ctx, |ui| {
                    egui::CollapsingHeader::new(format!("Attachments ({})", count))
                        .show(ui, |ui| self.attachments_ui(ui));
                });
                egui::TopBottomPanel::bottom("preview_half")
                    .resizable(true)
                    .default_height(ctx.screen_rect().height() * 0.45)
                    .show(ctx, |ui| self.preview_ui(ui));
                egui::CentralPanel::default().show(ctx, |ui| self.editor_ui(ui));
            }
            None => {
                egui::SidePanel::left("attachments_panel")
                    .resizable(true)
                    .default_width(260.0)
                    .show(ctx, |ui| self.attachments_ui(ui));
                egui::CentralPanel::default().show(ctx, |ui| {
                    let editor_width = ui.available_width() * self.split_ratio;

                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.set_width(editor_width - 8.0);
                            self.editor_ui(ui);
                        });
                        ui.separator();
                        ui.vertical(|ui| self.preview_ui(ui));
                    });
                });
            }
        }
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn guess_mime(name: &str) -> &'static str {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("md") | Some("markdown") => "text/markdown",
        Some("txt") => "text/plain",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

fn collect_dropped_files(ctx: &egui::Context) -> Vec<FileInput> {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let mut files = Vec::new();

    for file in dropped {
        let egui::DroppedFile {
            path,
            name,
            mime,
            last_modified,
            bytes,
            ..
        } = file;

        let (name, bytes) = if let Some(bytes) = bytes {
            (name, bytes.to_vec())
        } else if let Some(path) = &path {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "file".to_string());
            match std::fs::read(path) {
                Ok(bytes) => (name, bytes),
                Err(err) => {
                    log::warn!("could not read dropped file {}: {err}", path.display());
                    continue;
                }
            }
        } else {
            continue;
        };

        let mime = if mime.is_empty() {
            guess_mime(&name).to_string()
        } else {
            mime
        };
        let modified = last_modified
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_millis() as u64)
            .unwrap_or_else(epoch_millis);

        files.push(FileInput::new(name, mime, modified, bytes));
    }

    files
}

/// Simple preview renderer that displays the rendered HTML with basic
/// formatting. egui has no HTML widget, so this walks the markup line by
/// line and approximates headings, paragraphs, lists, and code blocks.
fn render_preview(ui: &mut egui::Ui, session: &DocumentSession) {
    let html = session.html();

    let mut in_pre = false;
    let mut code_buffer = String::new();

    for line in html.lines() {
        let trimmed = line.trim();

        // Handle code blocks; highlight markup is stripped back to text
        if let Some(rest) = trimmed.strip_prefix("<pre>") {
            in_pre = true;
            code_buffer.clear();

            let after_tag = rest.find('>').map(|i| &rest[i + 1..]).unwrap_or("");
            if let Some(end) = after_tag.find("</code></pre>") {
                show_code_block(ui, &strip_html(&after_tag[..end]));
                in_pre = false;
            } else {
                code_buffer.push_str(after_tag);
                code_buffer.push('\n');
            }
            continue;
        }
        if in_pre {
            if let Some(end) = line.find("</code></pre>") {
                code_buffer.push_str(&line[..end]);
                show_code_block(ui, &strip_html(&code_buffer));
                in_pre = false;
            } else {
                code_buffer.push_str(line);
                code_buffer.push('\n');
            }
            continue;
        }

        // Attachment images resolve against the session's registry
        if trimmed.contains("<img") {
            if let Some(src) = extract_attr(trimmed, "src") {
                let label = match session.resolve_attachment(&BlobUri::from(src.as_str())) {
                    Some(bytes) => {
                        format!("🖼 attachment ({})", format_bytes(bytes.len() as u64))
                    }
                    None => "🖼 missing attachment".to_string(),
                };
                ui.label(egui::RichText::new(label).italics().color(egui::Color32::GRAY));
            }
            let text = strip_html(trimmed);
            if !text.trim().is_empty() {
                ui.label(text);
            }
            continue;
        }

        // Handle headings
        if let Some(content) = trimmed.strip_prefix("<h1") {
            if let Some(text) = extract_tag_content(content, "h1") {
                ui.add_space(12.0);
                ui.heading(egui::RichText::new(strip_html(&text)).size(28.0).strong());
                ui.add_space(8.0);
                continue;
            }
        }
        if let Some(content) = trimmed.strip_prefix("<h2") {
            if let Some(text) = extract_tag_content(content, "h2") {
                ui.add_space(10.0);
                ui.heading(egui::RichText::new(strip_html(&text)).size(22.0).strong());
                ui.add_space(6.0);
                continue;
            }
        }
        if let Some(content) = trimmed.strip_prefix("<h3") {
            if let Some(text) = extract_tag_content(content, "h3") {
                ui.add_space(8.0);
                ui.heading(egui::RichText::new(strip_html(&text)).size(18.0).strong());
                ui.add_space(4.0);
                continue;
            }
        }

        // Handle paragraphs
        if trimmed.starts_with("<p>") {
            let text = strip_html(trimmed);
            if !text.is_empty() {
                ui.label(text);
                ui.add_space(4.0);
            }
            continue;
        }

        // Handle list items
        if trimmed.starts_with("<li>") {
            let text = strip_html(trimmed);
            ui.horizontal(|ui| {
                ui.label("•");
                ui.label(text);
            });
            continue;
        }

        // Handle horizontal rules
        if trimmed == "<hr>" || trimmed == "<hr/>" || trimmed == "<hr />" {
            ui.add_space(8.0);
            ui.separator();
            ui.add_space(8.0);
            continue;
        }

        // Handle table cells (simplified)
        if trimmed.starts_with("<th>") || trimmed.starts_with("<td>") {
            let text = strip_html(trimmed);
            if !text.is_empty() {
                ui.label(text);
            }
            continue;
        }

        // Skip pure HTML tags
        if trimmed.starts_with('<') && trimmed.ends_with('>') {
            let text = strip_html(trimmed);
            if text.trim().is_empty() {
                continue;
            }
            ui.label(text);
            continue;
        }

        // Handle any remaining content
        let text = strip_html(trimmed);
        if !text.is_empty() && !text.chars().all(|c| c.is_whitespace()) {
            ui.label(text);
        }
    }
}

fn show_code_block(ui: &mut egui::Ui, code: &str) {
    let code = code.trim_end();
    if code.is_empty() {
        return;
    }
    ui.add_space(4.0);
    ui.label(
        egui::RichText::new(code)
            .monospace()
            .background_color(egui::Color32::from_gray(30))
            .color(egui::Color32::LIGHT_GRAY),
    );
    ui.add_space(4.0);
}

/// Extract content between a tag
fn extract_tag_content(html: &str, tag: &str) -> Option<String> {
    let end_tag = format!("</{}>", tag);
    if let Some(start) = html.find('>') {
        let content = &html[start + 1..];
        if let Some(end) = content.find(&end_tag) {
            return Some(content[..end].to_string());
        }
        // Tag might end on a different line
        return Some(content.to_string());
    }
    None
}

/// Extract a double-quoted attribute value from a tag
fn extract_attr(tag: &str, attr: &str) -> Option<String> {
    let needle = format!("{}=\"", attr);
    let start = tag.find(&needle)? + needle.len();
    let rest = &tag[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

/// Strip HTML tags from text, preserving content
fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    // Decode common HTML entities; ampersand last so it cannot re-decode
    result
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
