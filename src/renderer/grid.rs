//! Row scaffolding: background bands, lane lines, measure and beat lines,
//! measure numbers and tempo labels.

use crate::model::*;
use super::constants::*;
use super::layout::Layout;
use super::svg_builder::{Layer, SvgBuilder};

// ═══════════════════════════════════════════════════════════════════════
// Rows
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_rows(svg: &mut SvgBuilder, layout: &Layout, score: &Score) {
    for row in 0..layout.measure_group_count {
        render_background(svg, layout, row);
        render_lane_lines(svg, layout, row);
        render_measure_lines(svg, layout, row);
        render_beat_lines(svg, layout, score, row);
    }
}

fn render_background(svg: &mut SvgBuilder, layout: &Layout, row: usize) {
    svg.rect(
        Layer::Background,
        layout.left_margin + layout.row_x(row),
        0.0,
        layout.field_width(),
        layout.height,
        BACKGROUND_COLOR,
    );
}

/// Lines on every second lane edge; the outer two are brighter.
fn render_lane_lines(svg: &mut SvgBuilder, layout: &Layout, row: usize) {
    let edges: Vec<i32> = (0..=LANE_COUNT as i32).step_by(2).collect();
    for (i, &lane) in edges.iter().enumerate() {
        let color = if i == 0 || i == edges.len() - 1 {
            OUTER_LANE_COLOR
        } else {
            INNER_LANE_COLOR
        };
        let x = layout.lane_left(lane) + layout.row_x(row);
        svg.line(Layer::LaneLines, x, 0.0, x, layout.height, color, LANE_LINE_WIDTH);
    }
}

/// One line per slot boundary, with a tick and a measure number in the
/// left margin.
fn render_measure_lines(svg: &mut SvgBuilder, layout: &Layout, row: usize) {
    let x1 = layout.left_margin + layout.row_x(row);
    let x2 = x1 + layout.field_width();
    let label_x = layout.left_margin / 4.0 + layout.row_x(row);
    let font_size = label_font_size(layout);

    for (i, &y) in layout.measure_bottoms.iter().enumerate() {
        svg.line(Layer::MeasureLines, x1, y, x2, y, MEASURE_LINE_COLOR, GRID_LINE_WIDTH);
        svg.line(Layer::MeasureNumbers, label_x, y, x1, y, MEASURE_TICK_COLOR, GRID_LINE_WIDTH);
        let number = i + row * layout.measure_group_size + 1;
        svg.text(
            Layer::MeasureNumbers,
            label_x,
            y - layout.lane_width,
            &format!("{:03}", number),
            font_size,
            None,
        );
    }
}

/// Beat lines follow the time signature of the first row, like the
/// measure bottoms they are measured from.
fn render_beat_lines(svg: &mut SvgBuilder, layout: &Layout, score: &Score, row: usize) {
    let x1 = layout.left_margin + layout.row_x(row);
    let x2 = x1 + layout.field_width() + BEAT_LINE_OVERHANG;

    for slot in 0..layout.measure_group_size {
        let measure = row * layout.measure_group_size + slot;
        if measure >= score.measure_count() {
            break;
        }
        let Some(&beats) = score.beats_per_measure.get(slot) else {
            break;
        };
        for beat in 1..beats {
            let y = layout.slot_bottom(slot) - layout.pixels_per_beat * beat as f64;
            svg.line(Layer::BeatLines, x1, y, x2, y, BEAT_LINE_COLOR, GRID_LINE_WIDTH);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Tempo labels
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_tempo_labels(svg: &mut SvgBuilder, layout: &Layout, score: &Score) {
    let mut changes = score.tempo_changes.clone();
    changes.sort_by_key(|change| change.measure);

    let font_size = label_font_size(layout);
    for change in &changes {
        let x = layout.left_margin + layout.field_width() + layout.row_x(layout.row_of(change.measure));
        let y = layout.y_of(change.measure, change.tick);
        svg.text(
            Layer::MeasureNumbers,
            x,
            y,
            &format_bpm(change.bpm),
            font_size,
            Some(TEMPO_LABEL_COLOR),
        );
    }
}

fn label_font_size(layout: &Layout) -> f64 {
    (layout.left_margin / LABEL_FONT_DIVISOR).floor()
}

/// Whole tempos are zero-padded to three digits, fractional ones kept as is.
pub(super) fn format_bpm(bpm: f64) -> String {
    if bpm.fract() == 0.0 && bpm.abs() < 1e15 {
        format!("{:03}", bpm as i64)
    } else {
        format!("{}", bpm)
    }
}
