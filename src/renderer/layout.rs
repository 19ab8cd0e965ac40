//! Layout computation: derives every pixel-space constant of a chart from
//! its tempo and time-signature data, and maps musical positions to rows.
//!
//! Measures are tiled into fixed-size measure groups. Each group becomes one
//! vertical row on the canvas, read bottom to top; rows are laid out left to
//! right.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::model::*;
use super::constants::*;

// ═══════════════════════════════════════════════════════════════════════
// Layout structure
// ═══════════════════════════════════════════════════════════════════════

/// Geometry constants for one chart. Computed once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub ticks_per_beat: f64,
    /// Tempo that fixes the vertical scale
    pub dominant_bpm: f64,
    pub pixels_per_beat: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    pub left_margin: f64,
    pub right_margin: f64,
    pub lane_width: f64,
    pub measure_group_size: usize,
    /// Pixel height of every measure in the chart
    pub measure_heights: Vec<f64>,
    /// Bottom edge of each slot in a row, plus the row top as the last
    /// entry. Derived from the first group and shared by every row.
    pub measure_bottoms: Vec<f64>,
    pub measure_group_count: usize,
    pub width: f64,
    pub height: f64,
}

// ═══════════════════════════════════════════════════════════════════════
// Dominant tempo
// ═══════════════════════════════════════════════════════════════════════

/// Pick the tempo whose run spans the most measures.
///
/// Runs are measured from one tempo change to the next change with a
/// different bpm, so the run still open at the end of the chart does not
/// count. A change at measure 0 resets the span tracker to zero. Ties keep
/// the first run seen.
pub fn dominant_bpm(tempo_changes: &[TempoChange]) -> Option<f64> {
    let mut sorted = tempo_changes.to_vec();
    sorted.sort_by_key(|change| change.measure);

    let mut most_frequent = 0.0_f64;
    let mut max_span = 0_u32;
    let mut last_measure = 0_u32;
    let mut last_bpm = 0.0_f64;

    for change in &sorted {
        if change.bpm == last_bpm {
            continue;
        }
        if change.measure == 0 {
            max_span = 0;
            most_frequent = change.bpm;
        } else {
            let span = change.measure - last_measure;
            // the sentinel run before the first change has no tempo
            if span > max_span && last_bpm > 0.0 {
                max_span = span;
                most_frequent = last_bpm;
            }
        }
        last_bpm = change.bpm;
        last_measure = change.measure;
    }

    if most_frequent > 0.0 {
        Some(most_frequent)
    } else {
        sorted.first().map(|change| change.bpm).filter(|bpm| *bpm > 0.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Layout computation
// ═══════════════════════════════════════════════════════════════════════

/// Compute the layout of a chart.
///
/// Fails only when the chart has no measures.
pub fn compute_layout(score: &Score, config: &RenderConfig) -> Result<Layout, RenderError> {
    if score.beats_per_measure.is_empty() {
        return Err(RenderError::NoMeasures);
    }

    let dominant = dominant_bpm(&score.tempo_changes).unwrap_or(config.reference_bpm);
    let pixels_per_beat = config.reference_pixels_per_beat / config.reference_bpm * dominant;
    let group_size = config.measure_group_size.max(1);

    let top_margin = (pixels_per_beat / TOP_MARGIN_DIVISOR).ceil();
    let bottom_margin = (pixels_per_beat / TOP_MARGIN_DIVISOR).ceil();
    let left_margin = (pixels_per_beat / SIDE_MARGIN_DIVISOR).ceil();
    let right_margin = (pixels_per_beat / SIDE_MARGIN_DIVISOR).ceil();
    let lane_width = (pixels_per_beat * config.beat_width_ratio / LANE_COUNT as f64).ceil();

    let measure_heights: Vec<f64> = score
        .beats_per_measure
        .iter()
        .map(|&beats| pixels_per_beat * beats as f64)
        .collect();

    // Prefix sums over the first group taken top-down, then flipped so
    // index 0 is the bottom of the row.
    let mut measure_bottoms = vec![top_margin];
    for height in measure_heights.iter().take(group_size).rev() {
        let above = measure_bottoms[measure_bottoms.len() - 1];
        measure_bottoms.push(above + height);
    }
    measure_bottoms.reverse();

    let measure_group_count = measure_heights.len().div_ceil(group_size);
    let height = measure_bottoms[0] + bottom_margin;
    let width = measure_group_count as f64
        * (left_margin + right_margin + lane_width * LANE_COUNT as f64)
        + right_margin;

    log::debug!(
        "layout: dominant {} bpm, {:.2} px/beat, lane {} px, {} rows, canvas {}x{}",
        dominant, pixels_per_beat, lane_width, measure_group_count, width, height
    );

    Ok(Layout {
        ticks_per_beat: config.ticks_per_beat as f64,
        dominant_bpm: dominant,
        pixels_per_beat,
        top_margin,
        bottom_margin,
        left_margin,
        right_margin,
        lane_width,
        measure_group_size: group_size,
        measure_heights,
        measure_bottoms,
        measure_group_count,
        width,
        height,
    })
}

// ═══════════════════════════════════════════════════════════════════════
// Coordinate helpers
// ═══════════════════════════════════════════════════════════════════════

impl Layout {
    /// Width of the 12-lane playfield.
    pub fn field_width(&self) -> f64 {
        self.lane_width * LANE_COUNT as f64
    }

    /// Horizontal distance between the origins of two adjacent rows.
    pub fn row_stride(&self) -> f64 {
        self.left_margin + self.right_margin + self.field_width()
    }

    /// X offset of a row.
    pub fn row_x(&self, row: usize) -> f64 {
        self.row_stride() * row as f64
    }

    /// Left edge of a 0-based lane column within row 0.
    pub fn lane_left(&self, lane: i32) -> f64 {
        self.left_margin + lane as f64 * self.lane_width
    }

    /// Row (measure group) holding a measure.
    pub fn row_of(&self, measure: u32) -> usize {
        measure as usize / self.measure_group_size
    }

    /// Vertical extent of one row's measures.
    pub fn row_height(&self) -> f64 {
        self.measure_bottoms[0] - self.row_top()
    }

    /// Top edge of the measures in every row.
    pub fn row_top(&self) -> f64 {
        self.measure_bottoms.last().copied().unwrap_or(self.top_margin)
    }

    /// Bottom edge of a slot within a row.
    pub fn slot_bottom(&self, slot: usize) -> f64 {
        self.measure_bottoms.get(slot).copied().unwrap_or_else(|| self.row_top())
    }

    pub fn tick_offset(&self, tick: u32) -> f64 {
        tick as f64 / self.ticks_per_beat * self.pixels_per_beat
    }

    /// Y of a musical position in its own row.
    pub fn y_of(&self, measure: u32, tick: u32) -> f64 {
        self.row_y(measure, tick, self.row_of(measure))
    }

    /// Y of a musical position expressed in another row's coordinates.
    /// Positions in later rows land above the canvas, earlier ones below.
    pub fn row_y(&self, measure: u32, tick: u32, row: usize) -> f64 {
        let own_row = self.row_of(measure);
        let slot = measure as usize % self.measure_group_size;
        let shift = (row as f64 - own_row as f64) * self.row_height();
        self.slot_bottom(slot) + shift - self.tick_offset(tick)
    }

    /// True for the first tick of the first measure of every row but the
    /// first one.
    pub fn is_seam(&self, measure: u32, tick: u32) -> bool {
        tick == 0 && measure as usize % self.measure_group_size == 0 && self.row_of(measure) > 0
    }

    /// Rows a point-like element is drawn in: the previous row first when
    /// the element sits on a seam, then its own row.
    pub fn rows_for(&self, measure: u32, tick: u32) -> Vec<usize> {
        let row = self.row_of(measure);
        if self.is_seam(measure, tick) {
            vec![row - 1, row]
        } else {
            vec![row]
        }
    }
}
