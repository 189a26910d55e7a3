use crate::similarity::SimilarityMeasure;
use anyhow::{Context, Result};
use std::path::Path;

const THUMBNAIL_SIZE: u32 = 64;

/// RGB colour histogram of a thumbnail, compared by cosine similarity
pub struct ColorHistogram {
    bins_per_channel: u32,
}

impl ColorHistogram {
    pub fn new() -> Self {
        Self::with_bins(4)
    }

    pub fn with_bins(bins_per_channel: u32) -> Self {
        Self {
            bins_per_channel: bins_per_channel.clamp(1, 64),
        }
    }

    fn bin(&self, value: u8) -> usize {
        (u32::from(value) * self.bins_per_channel / 256) as usize
    }
}

impl Default for ColorHistogram {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityMeasure for ColorHistogram {
    type Fingerprint = Vec<f64>;

    fn name(&self) -> &'static str {
        "histogram"
    }

    fn fingerprint(&self, path: &Path) -> Result<Vec<f64>> {
        let image = image::open(path)
            .with_context(|| format!("Failed to decode image: {}", path.display()))?;
        let rgb = image.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE).to_rgb8();

        let bins = self.bins_per_channel as usize;
        let mut histogram = vec![0.0; bins * bins * bins];
        for pixel in rgb.pixels() {
            let [r, g, b] = pixel.0;
            let idx = (self.bin(r) * bins + self.bin(g)) * bins + self.bin(b);
            histogram[idx] += 1.0;
        }

        let total = f64::from(rgb.width() * rgb.height());
        if total > 0.0 {
            for value in &mut histogram {
                *value /= total;
            }
        }

        Ok(histogram)
    }

    fn similarity(&self, a: &Vec<f64>, b: &Vec<f64>) -> f64 {
        cosine_similarity(a, b).clamp(0.0, 1.0)
    }
}

/// Compute cosine similarity between two vectors
fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
