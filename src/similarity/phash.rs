use crate::similarity::SimilarityMeasure;
use anyhow::{Context, Result};
use image_hasher::{HashAlg, Hasher, HasherConfig, ImageHash};
use std::path::Path;

/// Gradient perceptual hash; score is the share of matching hash bits
pub struct PerceptualHash {
    hasher: Hasher,
}

impl PerceptualHash {
    pub fn new() -> Self {
        Self::with_hash_size(8)
    }

    /// `size` x `size` bit hash; larger sizes are stricter
    pub fn with_hash_size(size: u32) -> Self {
        let hasher = HasherConfig::new()
            .hash_size(size, size)
            .hash_alg(HashAlg::Gradient)
            .to_hasher();
        Self { hasher }
    }
}

impl Default for PerceptualHash {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityMeasure for PerceptualHash {
    type Fingerprint = ImageHash;

    fn name(&self) -> &'static str {
        "perceptual-hash"
    }

    fn fingerprint(&self, path: &Path) -> Result<ImageHash> {
        let image = image::open(path)
            .with_context(|| format!("Failed to decode image: {}", path.display()))?;
        Ok(self.hasher.hash_image(&image))
    }

    fn similarity(&self, a: &ImageHash, b: &ImageHash) -> f64 {
        let bits = (a.as_bytes().len() * 8) as f64;
        if bits == 0.0 || a.as_bytes().len() != b.as_bytes().len() {
            return 0.0;
        }
        1.0 - f64::from(a.dist(b)) / bits
    }
}
