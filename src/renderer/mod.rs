//! Chart renderer: converts a parsed chart into a layered SVG document.
//!
//! The renderer computes its own layout from the tempo and time-signature
//! data, tiles measures into rows, and draws every note as sprite
//! references resolved against the configured asset base.

mod constants;
mod grid;
mod notes;
mod svg_builder;

pub mod classify;
pub mod curves;
pub mod layout;
pub mod slides;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::model::*;
use classify::{classify_notes, NoteBuckets};
use layout::{compute_layout, Layout};
use notes::*;
use slides::{build_slide, Slide};
use svg_builder::{Layer, SvgBuilder};

pub use classify::Bucket;
pub use curves::{CubicBezier, Point, SegmentEdges};
pub use slides::SlideSegment;

/// Everything derived for one render. Lives exactly as long as the render
/// call, so concurrent renders never share buckets.
pub(crate) struct RenderContext<'a> {
    pub(crate) config: &'a RenderConfig,
    pub(crate) layout: Layout,
    pub(crate) buckets: NoteBuckets,
}

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Render a parsed chart into a complete SVG string.
///
/// Fails when the chart has no measures or a slide never closes a
/// segment. Diamonds whose position cannot be solved are skipped.
pub fn render_score_to_svg(score: &Score, config: &RenderConfig) -> Result<String, RenderError> {
    config.validate()?;

    let ctx = RenderContext {
        config,
        layout: compute_layout(score, config)?,
        buckets: classify_notes(score),
    };

    let slides = score
        .slide_notes
        .iter()
        .enumerate()
        .map(|(group, notes)| build_slide(notes, &ctx.buckets, group))
        .collect::<Result<Vec<_>, _>>()?;

    let mut svg = SvgBuilder::new(ctx.layout.width, ctx.layout.height);

    grid::render_rows(&mut svg, &ctx.layout, score);
    grid::render_tempo_labels(&mut svg, &ctx.layout, score);

    render_short_notes(&mut svg, &ctx, score);

    let mut unresolved = 0;
    for slide in &slides {
        unresolved += render_slide(&mut svg, &ctx, slide);
    }

    render_events(&mut svg, &ctx);

    log::debug!(
        "rendered {} short notes, {} slides ({} segments), {} unresolved diamonds",
        score.short_notes.len(),
        slides.len(),
        slides.iter().map(|slide| slide.segments.len()).sum::<usize>(),
        unresolved
    );

    Ok(svg.build())
}

// ═══════════════════════════════════════════════════════════════════════
// Short notes
// ═══════════════════════════════════════════════════════════════════════

fn is_playable(note: &Note) -> bool {
    (FIRST_PLAYABLE_LANE..=LAST_PLAYABLE_LANE).contains(&note.lane)
}

fn render_short_notes(svg: &mut SvgBuilder, ctx: &RenderContext, score: &Score) {
    let mut playable: Vec<&Note> = score.short_notes.iter().filter(|note| is_playable(note)).collect();
    playable.sort_by_key(|note| note.measure);

    for note in playable {
        let key = note.key();
        match ShortNoteKind::of(note) {
            Some(ShortNoteKind::Tap) => {
                if let Some(direction) = ctx.buckets.flick_direction(&key) {
                    render_note(svg, ctx, Layer::Notes, NoteStyle::Flick, note);
                    render_flick_arrow(svg, ctx, note, direction, false);
                } else if !ctx.buckets.is_eased(&key) {
                    // eased taps only anchor slide curves
                    render_note(svg, ctx, Layer::Notes, NoteStyle::Normal, note);
                }
            }
            Some(ShortNoteKind::CriticalTap) => {
                // slide starts draw their own critical head
                if !ctx.buckets.is_slide_start(&key) {
                    render_note(svg, ctx, Layer::CriticalNotes, NoteStyle::Critical, note);
                    if let Some(direction) = ctx.buckets.flick_direction(&key) {
                        render_flick_arrow(svg, ctx, note, direction, true);
                    }
                }
            }
            _ => {}
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Slides
// ═══════════════════════════════════════════════════════════════════════

/// Draw one slide: path fills and diamonds in their own sub-groups, then
/// the start and end heads. Returns the number of unplaced diamonds.
fn render_slide(svg: &mut SvgBuilder, ctx: &RenderContext, slide: &Slide) -> usize {
    let mut unresolved = 0;

    svg.begin_group(Layer::SlidePaths);
    svg.begin_group(Layer::SlideDiamonds);
    for segment in &slide.segments {
        render_slide_path(svg, ctx, segment, slide.critical);

        if SlideRole::from_tag(segment.start.note_type) == Some(SlideRole::VisibleWaypoint) {
            render_waypoint_diamond(svg, ctx, &segment.start, slide.critical);
        }
        for waypoint in &segment.interior_waypoints {
            unresolved += render_interpolated_diamond(svg, ctx, waypoint, segment, slide.critical);
        }
    }
    svg.end_group(Layer::SlideDiamonds);
    svg.end_group(Layer::SlidePaths);

    for note in &slide.notes {
        if !matches!(SlideRole::from_tag(note.note_type), Some(SlideRole::Start | SlideRole::End)) {
            continue;
        }
        let flick = ctx.buckets.flick_direction(&note.key());
        if slide.critical {
            render_note(svg, ctx, Layer::CriticalNotes, NoteStyle::Critical, note);
            if let Some(direction) = flick {
                render_flick_arrow(svg, ctx, note, direction, true);
            }
        } else if let Some(direction) = flick {
            render_note(svg, ctx, Layer::Notes, NoteStyle::Flick, note);
            render_flick_arrow(svg, ctx, note, direction, false);
        } else {
            render_note(svg, ctx, Layer::Notes, NoteStyle::Long, note);
        }
    }

    unresolved
}

// ═══════════════════════════════════════════════════════════════════════
// Skill and fever events
// ═══════════════════════════════════════════════════════════════════════

fn render_events(svg: &mut SvgBuilder, ctx: &RenderContext) {
    for note in &ctx.buckets.skills {
        render_event_marker(svg, ctx, note, EventMarker::Skill);
    }
    for (note, kind) in &ctx.buckets.fevers {
        let marker = match kind {
            ShortNoteKind::FeverPrepare => EventMarker::FeverPrepare,
            _ => EventMarker::FeverStart,
        };
        render_event_marker(svg, ctx, note, marker);
    }
}
