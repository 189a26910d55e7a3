use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A configured association between a folder and the extensions it receives
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FolderRule {
    /// Folder name, created directly under the target directory
    pub folder: String,
    /// Extensions without the leading dot, lower-case once loaded
    pub extensions: Vec<String>,
}

impl FolderRule {
    pub fn new<S: Into<String>>(folder: S, extensions: &[&str]) -> Self {
        Self {
            folder: folder.into(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Destination decided for a single file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "folder")]
pub enum Classification {
    Folder(String),
    Unclassified,
}

impl Classification {
    pub fn folder(&self) -> Option<&str> {
        match self {
            Self::Folder(name) => Some(name),
            Self::Unclassified => None,
        }
    }
}

/// A file paired with its classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFile {
    pub source: PathBuf,
    pub classification: Classification,
}

/// Images judged mutually similar, materialized as one subfolder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSimilarityGroup {
    /// 1-based discovery order within this run
    pub number: usize,
    /// First member in listing order
    pub representative: PathBuf,
    /// Members in listing order
    pub members: Vec<PathBuf>,
}

impl ImageSimilarityGroup {
    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

/// An image that could not be decoded for comparison
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}
