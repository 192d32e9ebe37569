//! Greedy selection of a perceptually distinct palette.
//!
//! The selector seeds with the most saturated vibrant candidate, then keeps
//! adding the candidate farthest (in Lab) from everything chosen so far. When
//! the vibrant pool runs dry a fallback pass draws from all candidates in
//! dominance order, so busy or muted images still fill the palette.

use palette::Lab;
use tracing::{debug, warn};

use super::quantize::WeightedColor;
use crate::color::{chroma, distance, Color};

/// HSL bounds a candidate must satisfy to count as vibrant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vibrancy {
    /// Exclusive lower bound on HSL saturation, in [0, 1].
    pub min_saturation: f32,
    /// Exclusive lightness band, in [0, 1].
    pub min_lightness: f32,
    pub max_lightness: f32,
}

impl Default for Vibrancy {
    fn default() -> Self {
        Self {
            min_saturation: 0.5,
            min_lightness: 0.3,
            max_lightness: 0.8,
        }
    }
}

impl Vibrancy {
    pub fn accepts(&self, lab: &Lab) -> bool {
        let hsl = Color::from_lab(*lab).to_hsl();
        hsl.saturation > self.min_saturation
            && hsl.lightness > self.min_lightness
            && hsl.lightness < self.max_lightness
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorConfig {
    /// Requested palette size.
    pub count: usize,
    /// `None` treats every candidate as vibrant.
    pub vibrancy: Option<Vibrancy>,
    /// No two selected colors are closer than this (Lab units).
    pub min_distance: f32,
    /// Fill up from non-vibrant candidates when too few vibrant ones exist.
    pub fallback: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            count: 16,
            vibrancy: Some(Vibrancy::default()),
            min_distance: 30.0,
            fallback: true,
        }
    }
}

/// Ordered, immutable palette of Lab colors. Index `i` is `color{i}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    colors: Vec<Lab>,
}

impl Palette {
    pub fn new(colors: Vec<Lab>) -> Self {
        Self { colors }
    }

    pub fn colors(&self) -> &[Lab] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Lab> {
        self.colors.iter()
    }
}

/// Pick up to `config.count` distinct colors from the quantizer output.
///
/// Never fabricates colors: if the candidates cannot supply `count` distinct
/// entries the palette is shorter and a warning is logged.
pub fn select_palette(candidates: &[WeightedColor], config: &SelectorConfig) -> Palette {
    if config.count == 0 || candidates.is_empty() {
        return Palette::default();
    }
    let mut selected: Vec<usize> = Vec::with_capacity(config.count);

    let mut pool: Vec<usize> = (0..candidates.len())
        .filter(|&i| {
            config
                .vibrancy
                .map_or(true, |v| v.accepts(&candidates[i].color))
        })
        .collect();
    debug!(
        candidates = candidates.len(),
        vibrant = pool.len(),
        "filtered candidates"
    );

    if let Some(seed) = most_saturated(candidates, &pool) {
        selected.push(pool.remove(seed));
        farthest_points(candidates, &mut pool, &mut selected, config);
    }

    if config.fallback && selected.len() < config.count {
        let mut rest: Vec<usize> = (0..candidates.len())
            .filter(|i| !selected.contains(i))
            .collect();
        rest.sort_by(|&a, &b| candidates[b].weight.cmp(&candidates[a].weight));
        let before = selected.len();
        farthest_points(candidates, &mut rest, &mut selected, config);
        debug!(added = selected.len() - before, "fallback pass");
    }

    if selected.len() < config.count {
        warn!(
            found = selected.len(),
            requested = config.count,
            "fewer distinct colors than requested"
        );
    }

    Palette::new(selected.into_iter().map(|i| candidates[i].color).collect())
}

/// Position in `pool` of the candidate with the largest chroma, first on ties.
fn most_saturated(candidates: &[WeightedColor], pool: &[usize]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (pos, &i) in pool.iter().enumerate() {
        let c = chroma(&candidates[i].color);
        if best.map_or(true, |(_, b)| c > b) {
            best = Some((pos, c));
        }
    }
    best.map(|(pos, _)| pos)
}

/// Farthest-point sampling from `pool` into `selected`.
///
/// Each step takes the candidate whose nearest selected color is farthest
/// away, first in pool order on ties. Stops at `config.count`, when the pool
/// is empty, or when the best candidate is within `config.min_distance`.
fn farthest_points(
    candidates: &[WeightedColor],
    pool: &mut Vec<usize>,
    selected: &mut Vec<usize>,
    config: &SelectorConfig,
) {
    while selected.len() < config.count && !pool.is_empty() {
        let mut best: Option<(usize, f32)> = None;
        for (pos, &i) in pool.iter().enumerate() {
            let nearest = selected
                .iter()
                .map(|&s| distance(&candidates[i].color, &candidates[s].color))
                .fold(f32::INFINITY, f32::min);
            if best.map_or(true, |(_, d)| nearest > d) {
                best = Some((pos, nearest));
            }
        }
        match best {
            Some((pos, d)) if d >= config.min_distance => selected.push(pool.remove(pos)),
            _ => break,
        }
    }
}
