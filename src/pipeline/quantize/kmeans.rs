use std::collections::{BTreeMap, HashSet};

use kmeans_colors::{get_kmeans_hamerly, Kmeans};
use palette::Lab;
use tracing::debug;

use super::{Quantizer, WeightedColor};
use crate::color::Color;

/// `kmeans_colors` stores cluster indices as `u8`.
pub const MAX_CLUSTERS: usize = 256;

/// Coarse Lab grid cell: integer lightness, half-step a and b.
type Cell = (i32, i32, i32);

fn cell(lab: &Lab) -> Cell {
    (
        lab.l.round() as i32,
        (lab.a * 2.0).round() as i32,
        (lab.b * 2.0).round() as i32,
    )
}

/// K-means clustering in CIELAB with K-means++ seeding and restarts.
#[derive(Debug, Clone)]
pub struct ClusterQuantizer {
    /// Cluster count, deliberately larger than the final palette.
    pub k: usize,
    pub max_iter: usize,
    /// Convergence threshold passed to the Hamerly solver.
    pub converge: f32,
    /// Independent restarts; the lowest-score run wins.
    pub runs: u64,
    pub seed: u64,
}

impl Default for ClusterQuantizer {
    fn default() -> Self {
        Self {
            k: 32,
            max_iter: 20,
            converge: 5.0,
            runs: 3,
            seed: 42,
        }
    }
}

impl ClusterQuantizer {
    /// Cluster LAB pixels.
    ///
    /// Each cluster is represented by its most populated grid cell, so
    /// centroids that land on the same cell collapse into one entry.
    /// Returns colors sorted by weight (descending).
    pub fn quantize_lab(&self, pixels: &[Lab]) -> Vec<WeightedColor> {
        if pixels.is_empty() {
            return Vec::new();
        }

        // Seeding needs at least k distinct points.
        let distinct = pixels.iter().map(cell).collect::<HashSet<_>>().len();
        let k = self.k.clamp(1, MAX_CLUSTERS).min(distinct);

        let Some(result) = self.best_run(k, pixels) else {
            return Vec::new();
        };
        debug!(k, score = result.score, "k-means finished");

        let mut histograms: Vec<BTreeMap<Cell, (u32, [f32; 3])>> =
            vec![BTreeMap::new(); result.centroids.len()];
        for (lab, &idx) in pixels.iter().zip(&result.indices) {
            let entry = histograms[idx as usize]
                .entry(cell(lab))
                .or_insert((0, [0.0; 3]));
            entry.0 += 1;
            entry.1[0] += lab.l;
            entry.1[1] += lab.a;
            entry.1[2] += lab.b;
        }

        let mut colors: Vec<(Cell, WeightedColor)> = Vec::new();
        for histogram in &histograms {
            let members: u32 = histogram.values().map(|(count, _)| count).sum();
            let mut best: Option<(&Cell, u32, &[f32; 3])> = None;
            for (key, (count, sum)) in histogram {
                if best.map_or(true, |(_, c, _)| *count > c) {
                    best = Some((key, *count, sum));
                }
            }
            let Some((key, count, sum)) = best else {
                continue;
            };

            let n = count as f32;
            let color = Lab::new(sum[0] / n, sum[1] / n, sum[2] / n);
            match colors.iter().position(|(c, _)| c == key) {
                Some(i) => colors[i].1.weight += members,
                None => colors.push((
                    *key,
                    WeightedColor {
                        color,
                        weight: members,
                    },
                )),
            }
        }

        let mut colors: Vec<WeightedColor> = colors.into_iter().map(|(_, wc)| wc).collect();
        colors.sort_by(|a, b| b.weight.cmp(&a.weight));
        colors
    }

    fn best_run(&self, k: usize, pixels: &[Lab]) -> Option<Kmeans<Lab>> {
        let mut best: Option<Kmeans<Lab>> = None;
        for run in 0..self.runs.max(1) {
            let result =
                get_kmeans_hamerly(k, self.max_iter, self.converge, false, pixels, self.seed + run);
            if best.as_ref().map_or(true, |b| result.score < b.score) {
                best = Some(result);
            }
        }
        best
    }
}

impl Quantizer for ClusterQuantizer {
    fn name(&self) -> &str {
        "k-means"
    }

    fn quantize(&self, pixels: &[Color]) -> Vec<WeightedColor> {
        let lab: Vec<Lab> = pixels.iter().map(|c| c.to_lab()).collect();
        self.quantize_lab(&lab)
    }
}
