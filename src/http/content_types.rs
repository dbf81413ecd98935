//! Builtin extension → MIME-type seed table.

/// Content type served when no mapping exists for an extension.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Builtin mappings covering common text, image, audio, video, and
/// application types. Handlers seed their mutable table from this list;
/// additional mappings can be registered at runtime.
pub const BUILTIN_CONTENT_TYPES: &[(&str, &str)] = &[
    ("bin", DEFAULT_CONTENT_TYPE),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("xhtml", "application/xhtml+xml"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("wasm", "application/wasm"),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
    ("rtf", "application/rtf"),
    ("pdf", "application/pdf"),
    ("ps", "application/postscript"),
    ("eps", "application/postscript"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("gif", "image/gif"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("ico", "image/x-icon"),
    ("woff", "font/woff"),
    ("woff2", "font/woff2"),
    ("wav", "audio/wav"),
    ("mp3", "audio/mpeg"),
    ("m4a", "audio/mp4"),
    ("ogg", "audio/ogg"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("mp4", "video/mp4"),
    ("webm", "video/webm"),
    ("mov", "video/quicktime"),
];
