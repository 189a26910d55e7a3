pub mod histogram;
pub mod phash;
pub mod r#trait;

pub use histogram::ColorHistogram;
pub use phash::PerceptualHash;
pub use r#trait::SimilarityMeasure;
