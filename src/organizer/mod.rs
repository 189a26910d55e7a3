pub mod classifier;
pub mod cluster;
pub mod generator;
pub mod mover;
pub mod preview;

pub use classifier::Classifier;
pub use cluster::{GroupingOutcome, SimilarityClusterer};
pub use generator::FolderGenerator;
pub use mover::{FailedMove, FileMover, MoveOutcome, MovedFile};
pub use preview::{build_plan, OrganizePlan, PlanInput};
