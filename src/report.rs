use crate::models::SkippedImage;
use crate::organizer::{FailedMove, MoveOutcome, MovedFile, OrganizePlan};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A similarity group as it ended up on disk
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GroupSummary {
    pub folder: PathBuf,
    pub members: usize,
    pub singleton: bool,
}

/// End-of-run summary of everything that happened or was left alone
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub target: PathBuf,
    pub dry_run: bool,
    pub moved: Vec<MovedFile>,
    pub unclassified: Vec<PathBuf>,
    pub ignored: Vec<PathBuf>,
    pub skipped_images: Vec<SkippedImage>,
    pub failed: Vec<FailedMove>,
    pub groups: Vec<GroupSummary>,
}

impl RunReport {
    pub fn new(plan: &OrganizePlan, outcome: MoveOutcome, dry_run: bool) -> Self {
        Self {
            target: plan.base.clone(),
            dry_run,
            moved: outcome.moved,
            unclassified: plan.unclassified.clone(),
            ignored: plan.ignored.clone(),
            skipped_images: plan.skipped_images.clone(),
            failed: outcome.failed,
            groups: plan
                .groups
                .iter()
                .map(|(group, folder)| GroupSummary {
                    folder: folder.clone(),
                    members: group.members.len(),
                    singleton: group.is_singleton(),
                })
                .collect(),
        }
    }

    pub fn renamed_count(&self) -> usize {
        self.moved.iter().filter(|m| m.renamed).count()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.target).unwrap_or(path)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = if self.dry_run { "Would move" } else { "Moved" };
        writeln!(f, "✓ {} {} file(s)", verb, self.moved.len())?;

        let renamed = self.renamed_count();
        if renamed > 0 {
            writeln!(f, "  ℹ️  {} renamed to avoid overwriting existing files", renamed)?;
        }

        if !self.groups.is_empty() {
            let singletons = self.groups.iter().filter(|g| g.singleton).count();
            writeln!(
                f,
                "  🖼  {} image group(s), {} singleton(s)",
                self.groups.len(),
                singletons
            )?;
        }

        if !self.unclassified.is_empty() {
            writeln!(f, "  ℹ️  {} unclassified file(s) left in place:", self.unclassified.len())?;
            for path in &self.unclassified {
                writeln!(f, "      {}", self.relative(path).display())?;
            }
        }

        if !self.ignored.is_empty() {
            writeln!(f, "  ℹ️  {} ignored file(s)", self.ignored.len())?;
        }

        if !self.skipped_images.is_empty() {
            writeln!(
                f,
                "  ⚠️  {} image(s) could not be decoded and were not grouped:",
                self.skipped_images.len()
            )?;
            for skipped in &self.skipped_images {
                writeln!(f, "      {}: {}", self.relative(&skipped.path).display(), skipped.reason)?;
            }
        }

        if !self.failed.is_empty() {
            writeln!(f, "  ⚠️  Failed to move {} file(s):", self.failed.len())?;
            for failed in &self.failed {
                writeln!(f, "      {}: {}", self.relative(&failed.path).display(), failed.reason)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ImageSimilarityGroup;

    fn sample() -> RunReport {
        let mut plan = OrganizePlan::new("/d");
        plan.unclassified.push(PathBuf::from("/d/c.dat"));
        plan.groups.push((
            ImageSimilarityGroup {
                number: 1,
                representative: PathBuf::from("/d/b.jpg"),
                members: vec![PathBuf::from("/d/b.jpg")],
            },
            PathBuf::from("/d/Images/group_1"),
        ));

        let outcome = MoveOutcome {
            moved: vec![MovedFile {
                source: PathBuf::from("/d/a.txt"),
                destination: PathBuf::from("/d/Documents/a_1.txt"),
                renamed: true,
            }],
            failed: vec![FailedMove {
                path: PathBuf::from("/d/x.txt"),
                reason: "permission denied".to_string(),
            }],
        };

        RunReport::new(&plan, outcome, false)
    }

    #[test]
    fn test_report_counts() {
        let report = sample();
        assert_eq!(report.renamed_count(), 1);
        assert!(report.has_failures());
        assert_eq!(
            report.groups,
            vec![GroupSummary {
                folder: PathBuf::from("/d/Images/group_1"),
                members: 1,
                singleton: true,
            }]
        );
    }

    #[test]
    fn test_report_display() {
        let text = sample().to_string();
        assert!(text.contains("Moved 1 file(s)"));
        assert!(text.contains("1 unclassified file(s)"));
        assert!(text.contains("c.dat"));
        assert!(text.contains("1 singleton(s)"));
        assert!(text.contains("x.txt: permission denied"));
    }

    #[test]
    fn test_report_json() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["dry_run"], false);
        assert_eq!(json["unclassified"][0], "/d/c.dat");
        assert_eq!(json["moved"][0]["renamed"], true);
        assert_eq!(json["groups"][0]["members"], 1);
    }
}
