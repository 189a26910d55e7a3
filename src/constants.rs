/// Constants used throughout dirsort
/// Built-in rule set, defaults and file locations live here

/// File extensions for document types
pub const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf",
    "doc",
    "docx",
    "odt",
    "rtf",
    "txt",
    "md",
];

/// File extensions for image types
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg",
    "jpeg",
    "png",
    "gif",
    "webp",
    "bmp",
    "tif",
    "tiff",
];

/// File extensions for video types
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4",
    "avi",
    "mov",
    "mkv",
    "webm",
];

/// File extensions for audio types
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3",
    "wav",
    "flac",
    "m4a",
    "ogg",
];

/// File extensions for archive types
pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    "zip",
    "tar",
    "gz",
    "rar",
    "7z",
];

/// File extensions for spreadsheet types
pub const SPREADSHEET_EXTENSIONS: &[&str] = &[
    "xls",
    "xlsx",
    "ods",
    "csv",
];

/// Built-in rules in priority order (folder name, extensions)
pub const DEFAULT_RULES: &[(&str, &[&str])] = &[
    ("documents", DOCUMENT_EXTENSIONS),
    ("images", IMAGE_EXTENSIONS),
    ("videos", VIDEO_EXTENSIONS),
    ("audio", AUDIO_EXTENSIONS),
    ("archives", ARCHIVE_EXTENSIONS),
    ("spreadsheets", SPREADSHEET_EXTENSIONS),
];

/// OS metadata files that are never moved
pub const DEFAULT_IGNORED_NAMES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
];

/// Rule whose files take part in similarity grouping
pub const DEFAULT_IMAGE_FOLDER: &str = "images";

/// Prefix of numbered similarity group folders
pub const DEFAULT_GROUP_PREFIX: &str = "group";

/// Minimum score for two images to be linked
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.85;

/// Candidate configuration locations, first existing one wins
pub const CONFIG_SEARCH_PATHS: &[&str] = &[
    "config/dirsort.toml",
    "./dirsort.toml",
    "~/.config/dirsort/config.toml",
];

/// Environment variable holding the tracing filter
pub const LOG_ENV_VAR: &str = "DIRSORT_LOG";
