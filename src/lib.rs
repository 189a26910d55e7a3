pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod models;
pub mod organizer;
pub mod pipeline;
pub mod report;
pub mod scanner;
pub mod similarity;
pub mod utils;

pub use config::Config;
pub use error::{OrganizeError, OrganizeResult};
pub use models::{Classification, FolderRule, ImageSimilarityGroup};
pub use pipeline::Organizer;
pub use report::RunReport;
pub use similarity::SimilarityMeasure;
