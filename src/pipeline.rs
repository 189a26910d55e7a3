use crate::config::{Config, MeasureKind};
use crate::error::{OrganizeError, OrganizeResult};
use crate::models::Classification;
use crate::organizer::{
    build_plan, Classifier, FileMover, FolderGenerator, GroupingOutcome, OrganizePlan, PlanInput,
    SimilarityClusterer,
};
use crate::report::RunReport;
use crate::scanner;
use crate::similarity::{ColorHistogram, PerceptualHash};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runs enumerate → classify → group → plan, then executes the plan
pub struct Organizer {
    config: Config,
    classifier: Classifier,
    // folder name of the image rule, when grouping is active
    image_folder: Option<String>,
}

impl Organizer {
    /// Fails with a configuration error if grouping is requested but no image rule exists
    pub fn new(config: Config, group_images: bool) -> OrganizeResult<Self> {
        let image_folder = if group_images && config.grouping.enabled {
            Some(config.require_image_rule()?.folder.clone())
        } else {
            None
        };

        let classifier = Classifier::new(&config.rules);
        info!(
            rules = config.rules.len(),
            extensions = classifier.extension_count(),
            grouping = image_folder.is_some(),
            "organizer ready"
        );

        Ok(Self {
            config,
            classifier,
            image_folder,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grouping_enabled(&self) -> bool {
        self.image_folder.is_some()
    }

    /// Decide every move without mutating the filesystem.
    /// `progress` advances once per image fingerprinted.
    pub fn plan(&self, dir: &Path, progress: &ProgressBar) -> OrganizeResult<OrganizePlan> {
        let mover = FileMover::new(dir)?;
        let base = mover.base_path();

        let listing = scanner::scan_directory(base, &self.config.organizer.ignore);
        info!(
            files = listing.files.len(),
            ignored = listing.ignored.len(),
            "directory scanned"
        );

        let classified = self.classifier.classify_all(&listing.files);

        let generator = FolderGenerator::new(self.config.grouping.folder_prefix.trim());
        let (grouping, group_offset) = match &self.image_folder {
            Some(image_folder) => {
                let images: Vec<PathBuf> = classified
                    .iter()
                    .filter(|c| c.classification.folder() == Some(image_folder.as_str()))
                    .map(|c| c.source.clone())
                    .collect();

                progress.set_length(images.len() as u64);
                let grouping = self.group(&images, progress);
                progress.finish_and_clear();

                let existing = scanner::subdirectory_names(&base.join(image_folder));
                (grouping, generator.highest_existing(existing))
            }
            None => (GroupingOutcome::default(), 0),
        };

        let plan = build_plan(PlanInput {
            base,
            classified: &classified,
            ignored: &listing.ignored,
            image_folder: self.image_folder.as_deref(),
            grouping: &grouping,
            group_offset,
            generator: &generator,
        });

        let unclassified = classified
            .iter()
            .filter(|c| c.classification == Classification::Unclassified)
            .count();
        info!(
            moves = plan.files_to_move.len(),
            unclassified,
            groups = plan.groups.len(),
            "plan ready"
        );

        Ok(plan)
    }

    fn group(&self, images: &[PathBuf], progress: &ProgressBar) -> GroupingOutcome {
        let clusterer = SimilarityClusterer::new(self.config.grouping.threshold);
        match self.config.grouping.measure {
            MeasureKind::PerceptualHash => {
                clusterer.group_images(&PerceptualHash::new(), images, progress)
            }
            MeasureKind::Histogram => {
                clusterer.group_images(&ColorHistogram::new(), images, progress)
            }
        }
    }

    /// Apply a plan; per-file failures end up in the report, not in the error
    pub fn execute(&self, plan: &OrganizePlan, dry_run: bool) -> OrganizeResult<RunReport> {
        let mover = FileMover::new(&plan.base)?;
        mover
            .validate(plan)
            .map_err(|e| OrganizeError::TargetPath {
                path: plan.base.clone(),
                reason: format!("rejected plan: {}", e),
            })?;

        let outcome = mover.execute(plan, dry_run);
        Ok(RunReport::new(plan, outcome, dry_run))
    }

    /// Plan and execute without prompting or progress output
    pub fn run(&self, dir: &Path, dry_run: bool) -> OrganizeResult<RunReport> {
        let plan = self.plan(dir, &ProgressBar::hidden())?;
        self.execute(&plan, dry_run)
    }
}
