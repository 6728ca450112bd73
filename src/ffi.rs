//! C FFI layer for cross-language interoperability.

use crate::attachments::FileInput;
use crate::config::SessionOptions;
use crate::render::MarkupPipeline;
use crate::session::DocumentSession;
use crate::typeset::MathBackend;
use libc::{c_char, c_int};
use std::ffi::{CStr, CString};
use std::ptr;
use std::sync::Arc;

/// Opaque handle to a document session.
pub struct MdStudioSession {
    inner: DocumentSession,
}

/// Configuration for rendering.
#[repr(C)]
pub struct MdStudioConfig {
    /// Math backend: 0 = MathML, 1 = KaTeX, 2 = MathJax
    pub math_backend: c_int,
    /// Highlight theme name for exported stylesheets (null for the default)
    pub highlight_theme: *const c_char,
    /// Title for the standalone HTML export (null for the default)
    pub title: *const c_char,
}

impl Default for MdStudioConfig {
    fn default() -> Self {
        Self {
            math_backend: 0,
            highlight_theme: ptr::null(),
            title: ptr::null(),
        }
    }
}

/// Result type for FFI operations.
#[repr(C)]
pub struct MdStudioResult {
    /// Pointer to result string (caller must free with mdstudio_free_string)
    pub data: *mut c_char,
    /// Error message if data is null (caller must free with mdstudio_free_string)
    pub error: *mut c_char,
}

impl MdStudioResult {
    fn ok(data: String) -> Self {
        let c_string = CString::new(data).unwrap_or_else(|_| CString::new("").unwrap());
        Self {
            data: c_string.into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn err(error: String) -> Self {
        let c_string =
            CString::new(error).unwrap_or_else(|_| CString::new("Unknown error").unwrap());
        Self {
            data: ptr::null_mut(),
            error: c_string.into_raw(),
        }
    }
}

unsafe fn options_from(config: *const MdStudioConfig) -> SessionOptions {
    let mut options = SessionOptions::default();
    if config.is_null() {
        return options;
    }

    let cfg = &*config;
    options.math_backend = match cfg.math_backend {
        1 => MathBackend::Katex,
        2 => MathBackend::MathJax,
        _ => MathBackend::MathMl,
    };
    if !cfg.highlight_theme.is_null() {
        if let Ok(theme) = CStr::from_ptr(cfg.highlight_theme).to_str() {
            options.highlight_theme = theme.to_string();
        }
    }
    if !cfg.title.is_null() {
        if let Ok(title) = CStr::from_ptr(cfg.title).to_str() {
            options.title = title.to_string();
        }
    }
    options
}

/// Render Markdown to sanitized, typeset HTML in one step.
///
/// # Safety
///
/// - `input` must be a valid null-terminated UTF-8 string.
/// - `config` may be null for defaults.
/// - The returned string must be freed with `mdstudio_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_render(
    input: *const c_char,
    config: *const MdStudioConfig,
) -> MdStudioResult {
    if input.is_null() {
        return MdStudioResult::err("Null input pointer".to_string());
    }

    let input = match CStr::from_ptr(input).to_str() {
        Ok(s) => s,
        Err(_) => return MdStudioResult::err("Invalid UTF-8 input".to_string()),
    };

    let options = options_from(config);
    MdStudioResult::ok(crate::render(input, &options))
}

/// Create a document session.
///
/// # Safety
///
/// - `config` may be null for defaults.
/// - The returned session must be freed with `mdstudio_session_free`.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_session_new(
    config: *const MdStudioConfig,
) -> *mut MdStudioSession {
    let options = options_from(config);
    let pipeline = Arc::new(MarkupPipeline::new());
    let inner = DocumentSession::with_options(pipeline, options);
    Box::into_raw(Box::new(MdStudioSession { inner }))
}

/// Replace the session text and re-render. Returns 0 on success, -1 on error.
///
/// # Safety
///
/// - `session` must be a pointer from `mdstudio_session_new`.
/// - `text` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_session_set_text(
    session: *mut MdStudioSession,
    text: *const c_char,
) -> c_int {
    if session.is_null() || text.is_null() {
        return -1;
    }

    let text = match CStr::from_ptr(text).to_str() {
        Ok(s) => s,
        Err(_) => return -1,
    };

    (*session).inner.handle_editor_change(text);
    0
}

/// Get the current rendered HTML.
///
/// # Safety
///
/// - `session` must be a pointer from `mdstudio_session_new`.
/// - The returned string must be freed with `mdstudio_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_session_html(session: *const MdStudioSession) -> MdStudioResult {
    if session.is_null() {
        return MdStudioResult::err("Null session pointer".to_string());
    }

    MdStudioResult::ok((*session).inner.html().to_string())
}

/// Get the current source text.
///
/// # Safety
///
/// - `session` must be a pointer from `mdstudio_session_new`.
/// - The returned string must be freed with `mdstudio_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_session_text(session: *const MdStudioSession) -> MdStudioResult {
    if session.is_null() {
        return MdStudioResult::err("Null session pointer".to_string());
    }

    MdStudioResult::ok((*session).inner.text().to_string())
}

/// Register a file as an attachment and return its Markdown snippet.
///
/// The document text is not modified; the caller decides where to paste
/// the snippet.
///
/// # Safety
///
/// - `session` must be a pointer from `mdstudio_session_new`.
/// - `name` and `mime_type` must be valid null-terminated UTF-8 strings.
/// - `bytes` must point to at least `len` readable bytes, or be null with
///   `len` of 0.
/// - The returned string must be freed with `mdstudio_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_session_add_attachment(
    session: *mut MdStudioSession,
    name: *const c_char,
    mime_type: *const c_char,
    last_modified: u64,
    bytes: *const u8,
    len: usize,
) -> MdStudioResult {
    if session.is_null() || name.is_null() || mime_type.is_null() {
        return MdStudioResult::err("Null pointer argument".to_string());
    }

    let name = match CStr::from_ptr(name).to_str() {
        Ok(s) => s,
        Err(_) => return MdStudioResult::err("Invalid UTF-8 name".to_string()),
    };
    let mime_type = match CStr::from_ptr(mime_type).to_str() {
        Ok(s) => s,
        Err(_) => return MdStudioResult::err("Invalid UTF-8 MIME type".to_string()),
    };

    let bytes = if bytes.is_null() || len == 0 {
        Vec::new()
    } else {
        std::slice::from_raw_parts(bytes, len).to_vec()
    };

    let file = FileInput::new(name, mime_type, last_modified, bytes);
    match (*session).inner.insert_attachments(vec![file]).first() {
        Some(handle) => MdStudioResult::ok(handle.snippet.clone()),
        None => MdStudioResult::err("Attachment rejected: empty file".to_string()),
    }
}

/// Release every attachment and invalidate their URIs.
///
/// # Safety
///
/// - `session` must be a pointer from `mdstudio_session_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_session_remove_attachments(session: *mut MdStudioSession) {
    if !session.is_null() {
        (*session).inner.remove_all_attachments();
    }
}

/// Export the rendered view as a standalone HTML document.
///
/// # Safety
///
/// - `session` must be a pointer from `mdstudio_session_new`.
/// - The returned string must be freed with `mdstudio_free_string`.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_session_export_preview(
    session: *const MdStudioSession,
) -> MdStudioResult {
    if session.is_null() {
        return MdStudioResult::err("Null session pointer".to_string());
    }

    MdStudioResult::ok((*session).inner.export_preview_html().content)
}

/// Free a session handle. Releases all attachments.
///
/// # Safety
///
/// - `session` must be a pointer returned by `mdstudio_session_new`, or null.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_session_free(session: *mut MdStudioSession) {
    if !session.is_null() {
        drop(Box::from_raw(session));
    }
}

/// Free a string returned by mdstudio functions.
///
/// # Safety
///
/// - `s` must be a pointer returned by a mdstudio function, or null.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

/// Free a result struct.
///
/// # Safety
///
/// - `result` must be a valid MdStudioResult.
#[no_mangle]
pub unsafe extern "C" fn mdstudio_free_result(result: MdStudioResult) {
    mdstudio_free_string(result.data);
    mdstudio_free_string(result.error);
}

/// Get the library version.
///
/// # Safety
///
/// The returned string is static and must not be freed.
#[no_mangle]
pub extern "C" fn mdstudio_version() -> *const c_char {
    static VERSION: &[u8] = b"0.1.0\0";
    VERSION.as_ptr() as *const c_char
}

// Generate C header content for documentation
/// ```c
/// // markdown_studio.h
/// #ifndef MARKDOWN_STUDIO_H
/// #define MARKDOWN_STUDIO_H
///
/// #include <stddef.h>
/// #include <stdint.h>
///
/// typedef struct MdStudioSession MdStudioSession;
///
/// typedef struct {
///     int math_backend;  // 0 = MathML, 1 = KaTeX, 2 = MathJax
///     const char* highlight_theme;
///     const char* title;
/// } MdStudioConfig;
///
/// typedef struct {
///     char* data;
///     char* error;
/// } MdStudioResult;
///
/// MdStudioResult mdstudio_render(const char* input, const MdStudioConfig* config);
/// MdStudioSession* mdstudio_session_new(const MdStudioConfig* config);
/// int mdstudio_session_set_text(MdStudioSession* session, const char* text);
/// MdStudioResult mdstudio_session_html(const MdStudioSession* session);
/// MdStudioResult mdstudio_session_text(const MdStudioSession* session);
/// MdStudioResult mdstudio_session_add_attachment(MdStudioSession* session,
///     const char* name, const char* mime_type, uint64_t last_modified,
///     const uint8_t* bytes, size_t len);
/// void mdstudio_session_remove_attachments(MdStudioSession* session);
/// MdStudioResult mdstudio_session_export_preview(const MdStudioSession* session);
/// void mdstudio_session_free(MdStudioSession* session);
/// void mdstudio_free_string(char* s);
/// void mdstudio_free_result(MdStudioResult result);
/// const char* mdstudio_version(void);
///
/// #endif
/// ```
const _: () = ();
