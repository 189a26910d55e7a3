use anyhow::Result;
use std::path::Path;

/// A perceptual comparison measure between two images.
///
/// Each image is decoded once into a fingerprint; pairwise scores are then
/// computed from fingerprints only.
pub trait SimilarityMeasure {
    type Fingerprint;

    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Decode the image at `path` and compute its fingerprint
    fn fingerprint(&self, path: &Path) -> Result<Self::Fingerprint>;

    /// Similarity in `[0, 1]`, 1 meaning identical
    fn similarity(&self, a: &Self::Fingerprint, b: &Self::Fingerprint) -> f64;
}
