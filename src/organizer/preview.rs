use crate::models::{Classification, ClassifiedFile, ImageSimilarityGroup, SkippedImage};
use crate::organizer::cluster::GroupingOutcome;
use crate::organizer::generator::FolderGenerator;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Represents a file move operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOperation {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Represents a directory creation operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDirOperation {
    pub path: PathBuf,
}

/// Everything a run decided to do, computed before any file is touched
#[derive(Debug, Clone, Default)]
pub struct OrganizePlan {
    pub base: PathBuf,
    pub directories_to_create: Vec<CreateDirOperation>,
    pub files_to_move: Vec<MoveOperation>,
    pub unclassified: Vec<PathBuf>,
    pub ignored: Vec<PathBuf>,
    pub skipped_images: Vec<SkippedImage>,
    /// Groups paired with their folder path
    pub groups: Vec<(ImageSimilarityGroup, PathBuf)>,
}

impl OrganizePlan {
    pub fn new<P: Into<PathBuf>>(base: P) -> Self {
        Self {
            base: base.into(),
            ..Self::default()
        }
    }

    /// Add a directory to be created (once)
    pub fn add_directory(&mut self, path: PathBuf) {
        if !self.directories_to_create.iter().any(|op| op.path == path) {
            self.directories_to_create.push(CreateDirOperation { path });
        }
    }

    /// Add a file move operation
    pub fn add_move(&mut self, source: PathBuf, destination: PathBuf) {
        self.files_to_move.push(MoveOperation {
            source,
            destination,
        });
    }

    /// Check if there are any filesystem operations
    pub fn is_empty(&self) -> bool {
        self.directories_to_create.is_empty() && self.files_to_move.is_empty()
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.base).unwrap_or(path)
    }
}

impl fmt::Display for OrganizePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Proposed changes in {}:", self.base.display())?;

        // Group files by directory
        let mut dir_files: BTreeMap<&Path, Vec<&MoveOperation>> = BTreeMap::new();
        for op in &self.files_to_move {
            let dir = op.destination.parent().unwrap_or(op.destination.as_path());
            dir_files.entry(dir).or_default().push(op);
        }

        for (dir, files) in &dir_files {
            writeln!(f, "📁 {}/", self.relative(dir).display())?;
            for op in files {
                let file_name = op
                    .destination
                    .file_name()
                    .map(|n| n.to_string_lossy())
                    .unwrap_or_default();
                writeln!(f, "  📄 {}", file_name)?;
            }
        }

        if !self.unclassified.is_empty() {
            writeln!(f, "Left in place (no matching rule):")?;
            for path in &self.unclassified {
                writeln!(f, "  · {}", self.relative(path).display())?;
            }
        }

        write!(
            f,
            "\nCreate {} directories, move {} files",
            self.directories_to_create.len(),
            self.files_to_move.len()
        )
    }
}

/// Inputs of the pure planning step
pub struct PlanInput<'a> {
    pub base: &'a Path,
    /// Non-ignored files in listing order
    pub classified: &'a [ClassifiedFile],
    pub ignored: &'a [PathBuf],
    /// Image rule folder, when grouping is active
    pub image_folder: Option<&'a str>,
    pub grouping: &'a GroupingOutcome,
    /// Existing group folders already use numbers up to this one
    pub group_offset: usize,
    pub generator: &'a FolderGenerator,
}

/// Turn classifications and image groups into a plan, without touching the filesystem.
/// Moves follow listing order.
pub fn build_plan(input: PlanInput<'_>) -> OrganizePlan {
    let mut plan = OrganizePlan::new(input.base);
    plan.ignored = input.ignored.to_vec();
    plan.skipped_images = input.grouping.skipped.clone();

    // image path -> destination directory
    let mut image_dirs: HashMap<&Path, PathBuf> = HashMap::new();
    if let Some(image_folder) = input.image_folder {
        let image_root = input.base.join(image_folder);

        for group in &input.grouping.groups {
            let folder = input
                .generator
                .group_folder(input.group_offset + group.number);
            let group_dir = image_root.join(folder);
            for member in &group.members {
                image_dirs.insert(member.as_path(), group_dir.clone());
            }
            plan.groups.push((group.clone(), group_dir));
        }

        // undecodable images still belong to the image folder
        for skipped in &input.grouping.skipped {
            image_dirs.insert(skipped.path.as_path(), image_root.clone());
        }
    }

    let mut claimed: HashSet<PathBuf> = HashSet::new();
    for file in input.classified {
        let folder = match &file.classification {
            Classification::Folder(folder) => folder,
            Classification::Unclassified => {
                plan.unclassified.push(file.source.clone());
                continue;
            }
        };

        let is_image = input
            .image_folder
            .map(|image_folder| image_folder == folder.as_str())
            .unwrap_or(false);
        let dest_dir = match image_dirs.get(file.source.as_path()) {
            Some(dir) if is_image => dir.clone(),
            _ => input.base.join(folder),
        };

        let Some(file_name) = file.source.file_name() else {
            continue;
        };
        let destination = dest_dir.join(file_name);
        if destination == file.source || !claimed.insert(destination.clone()) {
            continue;
        }

        if is_image && dest_dir != input.base.join(folder) {
            plan.add_directory(input.base.join(folder));
        }
        plan.add_directory(dest_dir);
        plan.add_move(file.source.clone(), destination);
    }

    plan
}
