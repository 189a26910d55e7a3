use crate::models::{Classification, ClassifiedFile, FolderRule};
use crate::utils;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Maps file extensions to destination folders
pub struct Classifier {
    rules: Vec<FolderRule>,
    // extension -> index into `rules`
    lookup: HashMap<String, usize>,
}

impl Classifier {
    /// Build the reverse lookup once; on duplicate extensions the first rule wins
    pub fn new(rules: &[FolderRule]) -> Self {
        let mut lookup: HashMap<String, usize> = HashMap::new();

        for (idx, rule) in rules.iter().enumerate() {
            // extensions arrive normalized from `Config`
            for ext in &rule.extensions {
                if let Some(&owner) = lookup.get(ext) {
                    warn!(
                        extension = %ext,
                        kept = %rules[owner].folder,
                        ignored = %rule.folder,
                        "extension listed by more than one rule"
                    );
                    continue;
                }
                lookup.insert(ext.clone(), idx);
            }
        }

        Self {
            rules: rules.to_vec(),
            lookup,
        }
    }

    pub fn classify_extension(&self, ext: &str) -> Classification {
        if ext.is_empty() {
            return Classification::Unclassified;
        }

        match self.lookup.get(&ext.to_lowercase()) {
            Some(&idx) => Classification::Folder(self.rules[idx].folder.clone()),
            None => Classification::Unclassified,
        }
    }

    pub fn classify(&self, path: &Path) -> Classification {
        self.classify_extension(&utils::get_extension(path))
    }

    /// Classify every path, preserving input order
    pub fn classify_all(&self, paths: &[PathBuf]) -> Vec<ClassifiedFile> {
        paths
            .iter()
            .map(|path| ClassifiedFile {
                source: path.clone(),
                classification: self.classify(path),
            })
            .collect()
    }

    pub fn extension_count(&self) -> usize {
        self.lookup.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> Classifier {
        Classifier::new(&[
            FolderRule::new("Documents", &["txt", "pdf"]),
            FolderRule::new("Images", &["jpg", "png"]),
        ])
    }

    #[test]
    fn test_classifies_known_extension() {
        let c = classifier();
        assert_eq!(
            c.classify(Path::new("/d/a.txt")),
            Classification::Folder("Documents".to_string())
        );
        assert_eq!(
            c.classify(Path::new("/d/b.jpg")),
            Classification::Folder("Images".to_string())
        );
    }

    #[test]
    fn test_classification_is_case_insensitive() {
        let c = classifier();
        assert_eq!(
            c.classify(Path::new("/d/SCAN.PDF")),
            Classification::Folder("Documents".to_string())
        );
    }

    #[test]
    fn test_unknown_extension_is_unclassified() {
        let c = classifier();
        assert_eq!(c.classify(Path::new("/d/c.dat")), Classification::Unclassified);
    }

    #[test]
    fn test_no_extension_is_unclassified() {
        let c = classifier();
        assert_eq!(c.classify(Path::new("/d/README")), Classification::Unclassified);
        assert_eq!(c.classify(Path::new("/d/trailing.")), Classification::Unclassified);
    }

    #[test]
    fn test_first_rule_wins_on_duplicate_extension() {
        let c = Classifier::new(&[
            FolderRule::new("notes", &["txt"]),
            FolderRule::new("documents", &["txt", "pdf"]),
        ]);
        assert_eq!(
            c.classify(Path::new("/d/a.txt")),
            Classification::Folder("notes".to_string())
        );
        assert_eq!(
            c.classify(Path::new("/d/a.pdf")),
            Classification::Folder("documents".to_string())
        );
        assert_eq!(c.extension_count(), 2);
    }

    #[test]
    fn test_matches_extensions_normalized_by_config() {
        let config = crate::config::Config::from_json_str(
            r#"{"Documents": [".TXT", "Md"], "Images": ["JPG"]}"#,
        )
        .unwrap();
        let c = Classifier::new(&config.rules);
        assert_eq!(
            c.classify(Path::new("/d/a.TxT")),
            Classification::Folder("Documents".to_string())
        );
        assert_eq!(
            c.classify(Path::new("/d/readme.md")),
            Classification::Folder("Documents".to_string())
        );
        assert_eq!(
            c.classify_extension("JPG"),
            Classification::Folder("Images".to_string())
        );
        assert_eq!(c.extension_count(), 3);
    }

    #[test]
    fn test_classify_all_preserves_order() {
        let c = classifier();
        let paths = vec![
            PathBuf::from("/d/a.txt"),
            PathBuf::from("/d/b.jpg"),
            PathBuf::from("/d/c.dat"),
        ];
        let results = c.classify_all(&paths);
        let sources: Vec<_> = results.iter().map(|r| r.source.clone()).collect();
        assert_eq!(sources, paths);
        assert_eq!(results[2].classification, Classification::Unclassified);
    }
}
