//! Note, flick arrow, slide path, diamond and event marker rendering.
//!
//! Every point-like element goes through [`Layout::rows_for`], so elements
//! on a row seam are also drawn at the top of the previous row.

use crate::model::*;
use super::constants::*;
use super::curves::{segment_rows, SegmentEdges};
use super::slides::SlideSegment;
use super::svg_builder::{Layer, SvgBuilder};
use super::RenderContext;

/// Sprite family of a note head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NoteStyle {
    Normal,
    Critical,
    Flick,
    Long,
}

impl NoteStyle {
    fn sprite(self) -> &'static str {
        match self {
            NoteStyle::Normal => "normal",
            NoteStyle::Critical => "crtcl",
            NoteStyle::Flick => "flick",
            NoteStyle::Long => "long",
        }
    }
}

/// Event marker kinds, named after their `<marker>` definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum EventMarker {
    Skill,
    FeverPrepare,
    FeverStart,
}

impl EventMarker {
    fn id(self) -> &'static str {
        match self {
            EventMarker::Skill => "skill",
            EventMarker::FeverPrepare => "feverPrepare",
            EventMarker::FeverStart => "feverStart",
        }
    }
}

fn column(note: &Note) -> i32 {
    note.lane - FIRST_PLAYABLE_LANE
}

// ═══════════════════════════════════════════════════════════════════════
// Note heads
// ═══════════════════════════════════════════════════════════════════════

/// Draw a note head as left cap, right cap and (for wide notes) a
/// stretched middle.
pub(super) fn render_note(svg: &mut SvgBuilder, ctx: &RenderContext, layer: Layer, style: NoteStyle, note: &Note) {
    let layout = &ctx.layout;
    let lane = layout.lane_width;
    let scale = lane * 3.0 / NOTE_SPRITE_BODY;
    let center = if style == NoteStyle::Long { LONG_SPRITE_CENTER } else { NOTE_SPRITE_CENTER };
    let height = NOTE_SPRITE_HEIGHT * scale;
    let side_margin = (NOTE_SPRITE_SIDE_MARGIN * scale).ceil();
    let end_width = (NOTE_SPRITE_END_WIDTH * scale).ceil();
    let middle_width = lane * (note.width - 1) as f64;

    let left_href = ctx.config.asset(&format!("notes_{}_left.png", style.sprite()));
    let right_href = ctx.config.asset(&format!("notes_{}_right.png", style.sprite()));
    let middle_href = ctx.config.asset(&format!("notes_{}_middle.png", style.sprite()));

    for row in layout.rows_for(note.measure, note.tick) {
        let x = layout.lane_left(column(note)) - side_margin + layout.row_x(row);
        let y = layout.row_y(note.measure, note.tick, row) - center * scale - NOTE_SPRITE_TOP_PAD * scale;

        svg.image(layer, &left_href, x, y, end_width, Some(height));
        svg.image(layer, &right_href, x + end_width + middle_width, y, end_width, Some(height));
        if note.width > 1 {
            svg.image(layer, &middle_href, x + end_width, y, middle_width, Some(height));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Flick arrows
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_flick_arrow(
    svg: &mut SvgBuilder,
    ctx: &RenderContext,
    note: &Note,
    direction: FlickDirection,
    critical: bool,
) {
    let layout = &ctx.layout;
    let lane = layout.lane_width;
    let arrow_lanes = note.width.clamp(1, MAX_ARROW_LANES);
    let arrow_width = lane * arrow_lanes as f64;

    let (sizes, suffix, shift) = match direction {
        FlickDirection::Up => (&STRAIGHT_ARROW_SIZES, "", 0.0),
        FlickDirection::Left => (&DIAGONAL_ARROW_SIZES, "_diagonal_left", -lane / 4.0),
        FlickDirection::Right => (&DIAGONAL_ARROW_SIZES, "_diagonal_right", lane / 4.0),
    };
    let (sprite_width, sprite_height) = sizes[(arrow_lanes - 1) as usize];
    let scale = arrow_width / sprite_width;
    let href = ctx.config.asset(&format!(
        "notes_flick_arrow{}_{:02}{}.png",
        if critical { "_crtcl" } else { "" },
        arrow_lanes,
        suffix
    ));

    for row in layout.rows_for(note.measure, note.tick) {
        let x = layout.lane_left(column(note)) + note.width as f64 / 2.0 * lane - arrow_width / 2.0
            + shift
            + layout.row_x(row);
        let y = layout.row_y(note.measure, note.tick, row)
            - sprite_height * scale
            - layout.pixels_per_beat / ARROW_LIFT_DIVISOR;
        svg.image(Layer::Arrows, &href, x, y, arrow_width, None);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Slides
// ═══════════════════════════════════════════════════════════════════════

fn diamond_href(ctx: &RenderContext, critical: bool) -> String {
    ctx.config.asset(if critical { "notes_long_among_crtcl.png" } else { "notes_long_among.png" })
}

/// Fill a segment once per row it passes through.
pub(super) fn render_slide_path(svg: &mut SvgBuilder, ctx: &RenderContext, segment: &SlideSegment, critical: bool) {
    let fill = if critical { CRITICAL_SLIDE_FILL } else { SLIDE_FILL };
    for row in segment_rows(&ctx.layout, segment) {
        let edges = SegmentEdges::for_row(&ctx.layout, segment, row);
        svg.path(Layer::SlidePaths, &edges.to_path_data(), fill);
    }
}

/// Diamond on a visible waypoint, centered on its lane span.
pub(super) fn render_waypoint_diamond(svg: &mut SvgBuilder, ctx: &RenderContext, note: &Note, critical: bool) {
    let layout = &ctx.layout;
    let diamond = layout.lane_width * DIAMOND_LANES;
    let href = diamond_href(ctx, critical);

    for row in layout.rows_for(note.measure, note.tick) {
        let x = layout.lane_left(column(note)) + layout.lane_width * note.width as f64 / 2.0 - diamond / 2.0
            + layout.row_x(row);
        let y = layout.row_y(note.measure, note.tick, row) - diamond / 2.0;
        svg.image(Layer::SlideDiamonds, &href, x, y, diamond, None);
    }
}

/// Diamond on a removed waypoint, centered on the (possibly curved) path
/// at the waypoint's height. Returns how many copies could not be placed.
pub(super) fn render_interpolated_diamond(
    svg: &mut SvgBuilder,
    ctx: &RenderContext,
    waypoint: &Note,
    segment: &SlideSegment,
    critical: bool,
) -> usize {
    let layout = &ctx.layout;
    let diamond = layout.lane_width * DIAMOND_LANES;
    let href = diamond_href(ctx, critical);
    let rows = segment_rows(layout, segment);
    let mut unresolved = 0;

    for row in layout.rows_for(waypoint.measure, waypoint.tick) {
        if !rows.contains(&row) {
            continue;
        }
        let y = layout.row_y(waypoint.measure, waypoint.tick, row);
        let edges = SegmentEdges::for_row(layout, segment, row);
        match edges.center_at(y) {
            Some(center) => {
                svg.image(Layer::SlideDiamonds, &href, center - diamond / 2.0, y - diamond / 2.0, diamond, None);
            }
            None => {
                log::warn!(
                    "no path crossing for waypoint at measure {} tick {} (row {}), skipping diamond",
                    waypoint.measure, waypoint.tick, row
                );
                unresolved += 1;
            }
        }
    }
    unresolved
}

// ═══════════════════════════════════════════════════════════════════════
// Event markers
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_event_marker(svg: &mut SvgBuilder, ctx: &RenderContext, note: &Note, marker: EventMarker) {
    let layout = &ctx.layout;
    for row in layout.rows_for(note.measure, note.tick) {
        let x = layout.left_margin + layout.field_width() + EVENT_MARKER_GAP + layout.row_x(row);
        let y = layout.row_y(note.measure, note.tick, row);
        svg.marker_line(Layer::SpecialEvents, x, y, marker.id(), EVENT_MARKER_STROKE);
    }
}
