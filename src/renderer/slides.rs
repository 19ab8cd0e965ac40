//! Slide path reconstruction: turns one slide group into ordered,
//! contiguous segments between path-bearing notes.

use crate::error::RenderError;
use crate::model::*;
use super::classify::NoteBuckets;

/// One continuous stretch of a slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideSegment {
    pub start: Note,
    pub end: Note,
    pub ease_in: bool,
    pub ease_out: bool,
    /// Removed waypoints on this stretch; each only hosts a diamond
    pub interior_waypoints: Vec<Note>,
}

/// A whole slide gesture ready for drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub start: Note,
    pub critical: bool,
    pub segments: Vec<SlideSegment>,
    pub notes: Vec<Note>,
}

/// Segment still waiting for its end note.
struct OpenSegment {
    start: Note,
    ease_in: bool,
    ease_out: bool,
    interior_waypoints: Vec<Note>,
}

/// Split a slide group into segments.
///
/// Notes whose key carries a waypoint remover attach to the segment they
/// fall on instead of breaking the path. Removers after the last
/// path-bearing note attach to the final segment. `group` is only used for error
/// reporting.
pub fn build_slide_segments(
    notes: &[Note],
    buckets: &NoteBuckets,
    group: usize,
) -> Result<Vec<SlideSegment>, RenderError> {
    let mut segments: Vec<SlideSegment> = Vec::new();
    let mut open: Option<OpenSegment> = None;
    let last_path_note = notes
        .iter()
        .rposition(|note| !buckets.is_waypoint_remover(&note.key()));

    for (i, note) in notes.iter().enumerate() {
        let key = note.key();

        if buckets.is_waypoint_remover(&key) {
            if let Some(segment) = open.as_mut() {
                segment.interior_waypoints.push(*note);
            } else if let Some(segment) = segments.last_mut() {
                segment.interior_waypoints.push(*note);
            } else {
                log::warn!(
                    "slide {}: removed waypoint at measure {} tick {} precedes the path",
                    group, note.measure, note.tick
                );
            }
            continue;
        }

        if let Some(segment) = open.take() {
            segments.push(SlideSegment {
                start: segment.start,
                end: *note,
                ease_in: segment.ease_in,
                ease_out: segment.ease_out,
                interior_waypoints: segment.interior_waypoints,
            });
        }

        // the last path-bearing note only closes
        if Some(i) != last_path_note {
            open = Some(OpenSegment {
                start: *note,
                ease_in: buckets.has_ease_in(&key),
                ease_out: buckets.has_ease_out(&key),
                interior_waypoints: Vec::new(),
            });
        }
    }

    if segments.is_empty() {
        return Err(RenderError::IncompleteSlide { group });
    }
    Ok(segments)
}

/// Build a full slide: segments plus the criticality shared by all of its
/// parts.
pub fn build_slide(notes: &[Note], buckets: &NoteBuckets, group: usize) -> Result<Slide, RenderError> {
    let segments = build_slide_segments(notes, buckets, group)?;
    let start = notes
        .iter()
        .find(|note| SlideRole::from_tag(note.note_type) == Some(SlideRole::Start))
        .or_else(|| notes.first())
        .copied()
        .ok_or(RenderError::IncompleteSlide { group })?;

    let critical = buckets.is_critical(&start.key())
        || notes.iter().any(|note| buckets.is_critical(&note.key()));

    Ok(Slide {
        start,
        critical,
        segments,
        notes: notes.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::classify::classify_notes;
    use pretty_assertions::assert_eq;

    fn note(measure: u32, tick: u32, lane: i32, note_type: u8) -> Note {
        Note { measure, tick, lane, width: 2, note_type }
    }

    fn buckets_for(score: &Score) -> NoteBuckets {
        classify_notes(score)
    }

    #[test]
    fn removed_waypoint_stays_inside_one_segment() {
        let start = note(0, 0, 3, 1);
        let removed = note(0, 480, 4, 5);
        let end = note(1, 0, 5, 2);
        let score = Score {
            beats_per_measure: vec![4, 4],
            short_notes: vec![note(0, 480, 4, 3)],
            slide_notes: vec![vec![start, removed, end]],
            ..Score::default()
        };
        let buckets = buckets_for(&score);

        let segments = build_slide_segments(&score.slide_notes[0], &buckets, 0).unwrap();
        assert_eq!(
            segments,
            vec![SlideSegment {
                start,
                end,
                ease_in: false,
                ease_out: false,
                interior_waypoints: vec![removed],
            }]
        );
    }

    #[test]
    fn waypoints_chain_segments_in_order() {
        let notes = vec![
            note(0, 0, 3, 1),
            note(0, 480, 4, 3),
            note(0, 960, 5, 5),
            note(1, 0, 6, 2),
        ];
        let score = Score {
            beats_per_measure: vec![4, 4],
            air_notes: vec![note(0, 480, 4, 2), note(0, 960, 5, 5)],
            slide_notes: vec![notes.clone()],
            ..Score::default()
        };
        let segments = build_slide_segments(&notes, &buckets_for(&score), 0).unwrap();

        assert_eq!(segments.len(), 3);
        for (segment, pair) in segments.iter().zip(notes.windows(2)) {
            assert_eq!(segment.start, pair[0]);
            assert_eq!(segment.end, pair[1]);
        }
        assert_eq!((segments[0].ease_in, segments[0].ease_out), (false, false));
        assert_eq!((segments[1].ease_in, segments[1].ease_out), (true, false));
        assert_eq!((segments[2].ease_in, segments[2].ease_out), (false, true));
    }

    #[test]
    fn lone_start_is_malformed() {
        let notes = vec![note(0, 0, 3, 1)];
        let err = build_slide_segments(&notes, &NoteBuckets::default(), 7).unwrap_err();
        assert!(matches!(err, RenderError::IncompleteSlide { group: 7 }));
    }

    #[test]
    fn trailing_remover_joins_the_last_segment() {
        let removed = note(1, 0, 3, 5);
        let notes = vec![note(0, 0, 3, 1), note(0, 960, 3, 2), removed];
        let score = Score {
            beats_per_measure: vec![4, 4],
            short_notes: vec![note(1, 0, 3, 3)],
            slide_notes: vec![notes.clone()],
            ..Score::default()
        };
        let segments = build_slide_segments(&notes, &buckets_for(&score), 0).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end, notes[1]);
        assert_eq!(segments[0].interior_waypoints, vec![removed]);
    }

    #[test]
    fn leading_remover_is_dropped() {
        let notes = vec![note(0, 0, 3, 5), note(0, 480, 3, 1), note(1, 0, 3, 2)];
        let score = Score {
            beats_per_measure: vec![4, 4],
            short_notes: vec![note(0, 0, 3, 3)],
            slide_notes: vec![notes.clone()],
            ..Score::default()
        };
        let segments = build_slide_segments(&notes, &buckets_for(&score), 0).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start, notes[1]);
        assert!(segments[0].interior_waypoints.is_empty());
    }

    #[test]
    fn critical_end_marks_whole_slide() {
        let notes = vec![note(0, 0, 3, 1), note(1, 0, 5, 2)];
        let score = Score {
            beats_per_measure: vec![4, 4],
            short_notes: vec![note(1, 0, 5, 2)],
            slide_notes: vec![notes.clone()],
            ..Score::default()
        };
        let slide = build_slide(&notes, &buckets_for(&score), 0).unwrap();
        assert!(slide.critical);
        assert_eq!(slide.start, notes[0]);
    }
}
