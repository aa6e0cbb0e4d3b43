//! K-Means++ color clustering in RGB space.
//!
//! Centroids are kept as rounded 8-bit colors between iterations, so the
//! convergence test ("every centroid moved by a squared distance below 1")
//! amounts to "no centroid changed".

use palette::Srgb;
use rand::Rng;

use crate::config::DEFAULT_MAX_ITERATIONS;
use crate::error::{PaletteError, Result};

/// Returned for every cluster when there is nothing to cluster.
pub const NEUTRAL_GRAY: Srgb<u8> = Srgb::new(128, 128, 128);

const CONVERGENCE_THRESHOLD: u32 = 1;

/// Squared Euclidean distance between two colors.
#[inline]
pub fn distance_squared(a: Srgb<u8>, b: Srgb<u8>) -> u32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    (dr * dr + dg * dg + db * db) as u32
}

/// Outcome of a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    /// One color per cluster, in cluster index order.
    pub centroids: Vec<Srgb<u8>>,
    /// Cluster index of every sample from the last assignment pass.
    pub assignments: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

impl Clustering {
    /// Fraction of the samples assigned to each centroid.
    pub fn shares(&self) -> Vec<f32> {
        let mut counts = vec![0usize; self.centroids.len()];
        for &a in &self.assignments {
            counts[a] += 1;
        }
        let total = self.assignments.len();
        counts
            .into_iter()
            .map(|c| if total == 0 { 0.0 } else { c as f32 / total as f32 })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeans {
    k: usize,
    max_iterations: usize,
}

impl KMeans {
    pub fn new(k: usize) -> Result<Self> {
        if k == 0 {
            return Err(PaletteError::ZeroClusters);
        }
        Ok(Self {
            k,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        })
    }

    pub fn with_max_iterations(self, max_iterations: usize) -> Self {
        Self {
            max_iterations,
            ..self
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Cluster `samples` and return only the centroids.
    pub fn cluster<R: Rng + ?Sized>(&self, samples: &[Srgb<u8>], rng: &mut R) -> Vec<Srgb<u8>> {
        self.fit(samples, rng).centroids
    }

    /// Run K-Means++ seeding followed by Lloyd iterations.
    ///
    /// With no samples every centroid is [`NEUTRAL_GRAY`]. With at most `k`
    /// samples each sample is its own centroid, so fewer than `k` colors come
    /// back. Otherwise exactly `k` centroids are returned.
    ///
    /// A cluster that loses all of its samples keeps its previous centroid.
    pub fn fit<R: Rng + ?Sized>(&self, samples: &[Srgb<u8>], rng: &mut R) -> Clustering {
        if samples.is_empty() {
            tracing::warn!(k = self.k, "no usable samples, using neutral gray");
            return Clustering {
                centroids: vec![NEUTRAL_GRAY; self.k],
                assignments: Vec::new(),
                iterations: 0,
                converged: true,
            };
        }
        if samples.len() <= self.k {
            return Clustering {
                centroids: samples.to_vec(),
                assignments: (0..samples.len()).collect(),
                iterations: 0,
                converged: true,
            };
        }

        let mut centroids = seed_plus_plus(samples, self.k, rng);
        let mut assignments = Vec::new();
        let mut iterations = 0;
        let mut converged = false;

        while iterations < self.max_iterations {
            let (next_assignments, next) = step(samples, &centroids);
            iterations += 1;
            converged = next
                .iter()
                .zip(&centroids)
                .all(|(&n, &c)| distance_squared(n, c) < CONVERGENCE_THRESHOLD);
            centroids = next;
            assignments = next_assignments;
            if converged {
                break;
            }
        }
        if assignments.is_empty() {
            assignments = assign(samples, &centroids);
        }

        tracing::debug!(
            k = self.k,
            samples = samples.len(),
            iterations,
            converged,
            "k-means finished"
        );

        Clustering {
            centroids,
            assignments,
            iterations,
            converged,
        }
    }
}

/// Pick `k` initial centroids with K-Means++.
///
/// The first seed is uniform; each further seed is drawn with probability
/// proportional to its squared distance to the nearest seed so far. When the
/// draw selects nothing (all remaining weight is zero) the lowest-index
/// sample not yet used as a seed is taken instead.
///
/// `samples` must hold more than `k` entries.
pub fn seed_plus_plus<R: Rng + ?Sized>(samples: &[Srgb<u8>], k: usize, rng: &mut R) -> Vec<Srgb<u8>> {
    let first = rng.random_range(0..samples.len());
    let mut chosen = vec![first];
    let mut nearest: Vec<u32> = samples
        .iter()
        .map(|&s| distance_squared(s, samples[first]))
        .collect();

    while chosen.len() < k {
        let total: f64 = nearest.iter().map(|&d| d as f64).sum();
        let mut target = rng.random::<f64>() * total;

        let mut drawn = None;
        for (i, &d) in nearest.iter().enumerate() {
            if d == 0 {
                continue;
            }
            target -= d as f64;
            if target <= 0.0 {
                drawn = Some(i);
                break;
            }
        }

        let next = drawn
            .or_else(|| (0..samples.len()).find(|i| !chosen.contains(i)))
            .unwrap_or(first);
        chosen.push(next);

        for (d, &s) in nearest.iter_mut().zip(samples) {
            *d = (*d).min(distance_squared(s, samples[next]));
        }
    }

    chosen.into_iter().map(|i| samples[i]).collect()
}

/// Index of the nearest centroid for every sample. Ties go to the lowest index.
pub fn assign(samples: &[Srgb<u8>], centroids: &[Srgb<u8>]) -> Vec<usize> {
    samples
        .iter()
        .map(|&s| {
            let mut best = 0;
            let mut best_dist = u32::MAX;
            for (idx, &c) in centroids.iter().enumerate() {
                let d = distance_squared(s, c);
                if d < best_dist {
                    best_dist = d;
                    best = idx;
                }
            }
            best
        })
        .collect()
}

/// Rounded mean of each cluster; empty clusters keep their `previous` color.
pub fn update(samples: &[Srgb<u8>], assignments: &[usize], previous: &[Srgb<u8>]) -> Vec<Srgb<u8>> {
    let mut sums = vec![[0u64; 3]; previous.len()];
    let mut counts = vec![0u64; previous.len()];
    for (&s, &a) in samples.iter().zip(assignments) {
        sums[a][0] += s.red as u64;
        sums[a][1] += s.green as u64;
        sums[a][2] += s.blue as u64;
        counts[a] += 1;
    }

    previous
        .iter()
        .enumerate()
        .map(|(i, &old)| match counts[i] {
            0 => old,
            n => {
                let mean = |sum: u64| ((sum + n / 2) / n) as u8;
                Srgb::new(mean(sums[i][0]), mean(sums[i][1]), mean(sums[i][2]))
            }
        })
        .collect()
}

/// One Lloyd iteration: assign against `centroids`, then return a fresh
/// centroid set alongside the assignments that produced it.
pub fn step(samples: &[Srgb<u8>], centroids: &[Srgb<u8>]) -> (Vec<usize>, Vec<Srgb<u8>>) {
    let assignments = assign(samples, centroids);
    let next = update(samples, &assignments, centroids);
    (assignments, next)
}
