//! Ephemeral attachment lifecycle: in-memory blob objects, handles, and snippets.

use std::collections::HashMap;
use std::fmt;

use uuid::Uuid;

use crate::error::AttachmentError;

/// URI scheme prefix for blob objects issued by this crate.
const BLOB_URI_PREFIX: &str = "blob:markdown-studio/";

/// A file handed to the registry by the host: name, declared MIME type,
/// last-modified timestamp (milliseconds since the epoch) and raw bytes.
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub mime_type: String,
    pub last_modified: u64,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        last_modified: u64,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            last_modified,
            bytes,
        }
    }
}

/// An opaque, unguessable URI naming one blob object.
///
/// URIs are minted once per stored object and never reused; resolving a
/// URI after its object has been released yields nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobUri(String);

impl BlobUri {
    fn random() -> Self {
        Self(format!("{}{}", BLOB_URI_PREFIX, Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lookup key from a raw URI string. Resolving a value that was never
/// minted simply yields nothing.
impl From<&str> for BlobUri {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Coarse classification of an attachment's declared MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeCategory {
    Image,
    Other,
}

impl MimeCategory {
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("image/") {
            Self::Image
        } else {
            Self::Other
        }
    }
}

/// Immutable descriptor for one stored attachment.
///
/// Handles are cheap to clone; the backing bytes live only in the
/// registry's blob store.
#[derive(Debug, Clone)]
pub struct AttachmentHandle {
    /// Unique id derived from name, size, timestamp and a random salt, so
    /// re-adding an identical file still yields a distinct id.
    pub id: String,
    pub uri: BlobUri,
    pub name: String,
    pub byte_size: u64,
    pub category: MimeCategory,
    /// Ready-to-insert Markdown link for this attachment.
    pub snippet: String,
}

/// Arena of blob objects keyed by their URIs.
#[derive(Debug, Default)]
pub struct BlobStore {
    objects: HashMap<String, Vec<u8>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` under a freshly minted URI.
    pub fn create(&mut self, bytes: Vec<u8>) -> BlobUri {
        let uri = BlobUri::random();
        self.objects.insert(uri.0.clone(), bytes);
        uri
    }

    /// Look up the bytes behind `uri`, if the object is still live.
    pub fn resolve(&self, uri: &BlobUri) -> Option<&[u8]> {
        self.objects.get(&uri.0).map(Vec::as_slice)
    }

    /// Release every stored object. Idempotent.
    pub fn release_all(&mut self) {
        self.objects.clear();
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

/// Sole owner of attachment handles and their backing blob objects.
///
/// Handles are kept newest-upload-first. Nothing outside the registry
/// creates or releases blob objects; dropping the registry releases
/// everything exactly once.
#[derive(Debug, Default)]
pub struct AttachmentRegistry {
    store: BlobStore,
    handles: Vec<AttachmentHandle>,
}

impl AttachmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a batch of files and return the newly created handles.
    ///
    /// The batch is prepended to the collection in input order, so the
    /// newest upload sorts first while the batch itself keeps its order.
    /// A file with no readable bytes is skipped with a warning; the rest
    /// of the batch still goes through. An empty batch is a no-op.
    pub fn add(&mut self, files: Vec<FileInput>) -> &[AttachmentHandle] {
        let mut fresh = Vec::with_capacity(files.len());
        for file in files {
            match create_handle(&mut self.store, file) {
                Ok(handle) => fresh.push(handle),
                Err(err) => log::warn!("attachment skipped: {err}"),
            }
        }

        let count = fresh.len();
        self.handles.splice(0..0, fresh);
        &self.handles[..count]
    }

    /// Release every blob object and drop every handle. Idempotent.
    pub fn remove_all(&mut self) {
        self.store.release_all();
        self.handles.clear();
    }

    /// Read-only view of the current handles, newest first.
    pub fn snapshot(&self) -> &[AttachmentHandle] {
        &self.handles
    }

    /// Bytes behind `uri`, or `None` once the object has been released.
    pub fn resolve(&self, uri: &BlobUri) -> Option<&[u8]> {
        self.store.resolve(uri)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for AttachmentRegistry {
    fn drop(&mut self) {
        self.remove_all();
    }
}

fn create_handle(
    store: &mut BlobStore,
    file: FileInput,
) -> Result<AttachmentHandle, AttachmentError> {
    if file.bytes.is_empty() {
        return Err(AttachmentError::EmptyFile(file.name));
    }

    let byte_size = file.bytes.len() as u64;
    let category = MimeCategory::from_mime(&file.mime_type);
    let uri = store.create(file.bytes);

    let salt = Uuid::new_v4().simple().to_string();
    let id = format!("{}-{}-{}-{}", file.name, byte_size, file.last_modified, &salt[..8]);
    let snippet = snippet_for(&file.name, category, &uri);

    Ok(AttachmentHandle {
        id,
        uri,
        name: file.name,
        byte_size,
        category,
        snippet,
    })
}

/// Markdown link snippet for an attachment: `![name](uri)` for images,
/// `[name](uri)` otherwise. Any `]` in the name becomes `)` so the link
/// text cannot close the syntax early.
pub fn snippet_for(name: &str, category: MimeCategory, uri: &BlobUri) -> String {
    let safe_name = name.replace(']', ")");
    match category {
        MimeCategory::Image => format!("![{}]({})", safe_name, uri),
        MimeCategory::Other => format!("[{}]({})", safe_name, uri),
    }
}

/// Human-readable byte count: base 1024, always one decimal (`1.0 KB`).
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    format!("{:.1} {}", value, UNITS[exponent])
}
