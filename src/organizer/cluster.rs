use crate::models::{ImageSimilarityGroup, SkippedImage};
use crate::similarity::SimilarityMeasure;
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Result of grouping one batch of images
#[derive(Debug, Clone, Default)]
pub struct GroupingOutcome {
    pub groups: Vec<ImageSimilarityGroup>,
    pub skipped: Vec<SkippedImage>,
}

/// Groups images into connected components of the "score >= threshold" graph
pub struct SimilarityClusterer {
    similarity_threshold: f64,
}

impl SimilarityClusterer {
    /// Create a new clusterer with a similarity threshold in [0, 1]
    pub fn new(threshold: f64) -> Self {
        Self {
            similarity_threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.similarity_threshold
    }

    /// Partition `0..n` into components, comparing every pair once.
    ///
    /// Components are ordered by their smallest index and members are
    /// ascending, so numbering follows first discovery in input order.
    pub fn cluster_by_score<F>(&self, n: usize, score: F) -> Vec<Vec<usize>>
    where
        F: Fn(usize, usize) -> f64,
    {
        let mut sets = DisjointSet::new(n);

        // O(n^2): no index over fingerprints
        for i in 0..n {
            for j in (i + 1)..n {
                let s = score(i, j);
                if s >= self.similarity_threshold {
                    debug!(i, j, score = s, "linked");
                    sets.union(i, j);
                }
            }
        }

        let mut component_of_root: HashMap<usize, usize> = HashMap::new();
        let mut components: Vec<Vec<usize>> = Vec::new();
        for i in 0..n {
            let root = sets.find(i);
            let idx = *component_of_root.entry(root).or_insert_with(|| {
                components.push(Vec::new());
                components.len() - 1
            });
            components[idx].push(i);
        }

        components
    }

    /// Fingerprint every image with `measure` and group the decodable ones.
    /// Images that fail to decode are reported in `skipped`.
    pub fn group_images<M: SimilarityMeasure>(
        &self,
        measure: &M,
        images: &[PathBuf],
        progress: &ProgressBar,
    ) -> GroupingOutcome {
        let mut fingerprinted: Vec<(PathBuf, M::Fingerprint)> = Vec::with_capacity(images.len());
        let mut skipped = Vec::new();

        for path in images {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            progress.set_message(format!("Fingerprinting: {}", file_name));

            match measure.fingerprint(path) {
                Ok(fingerprint) => fingerprinted.push((path.clone(), fingerprint)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping undecodable image");
                    skipped.push(SkippedImage {
                        path: path.clone(),
                        reason: format!("{:#}", e),
                    });
                }
            }
            progress.inc(1);
        }

        let components = self.cluster_by_score(fingerprinted.len(), |i, j| {
            measure.similarity(&fingerprinted[i].1, &fingerprinted[j].1)
        });

        let groups: Vec<ImageSimilarityGroup> = components
            .into_iter()
            .enumerate()
            .map(|(idx, members)| {
                let members: Vec<PathBuf> = members
                    .into_iter()
                    .map(|m| fingerprinted[m].0.clone())
                    .collect();
                ImageSimilarityGroup {
                    number: idx + 1,
                    representative: members[0].clone(),
                    members,
                }
            })
            .collect();

        info!(
            measure = measure.name(),
            threshold = self.threshold(),
            images = images.len(),
            groups = groups.len(),
            skipped = skipped.len(),
            "images grouped"
        );

        GroupingOutcome { groups, skipped }
    }
}

/// Union-find with path halving
struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // keep the smaller index as root
            let (keep, merge) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[merge] = keep;
        }
    }
}
