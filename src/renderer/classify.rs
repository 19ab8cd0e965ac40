//! Note classification: buckets raw notation events by semantic role,
//! keyed by position.
//!
//! A position key may sit in several buckets at once; that overlap is how
//! later stages ask "is this tap also flicked?" or "is this slide start
//! critical?".

use std::collections::BTreeMap;

use crate::model::*;

pub type Bucket = BTreeMap<PositionKey, Vec<Note>>;

/// Classified notes of one chart. Built per render, never shared.
#[derive(Debug, Clone, Default)]
pub struct NoteBuckets {
    pub taps: Bucket,
    pub criticals: Bucket,
    pub waypoint_removers: Bucket,
    pub flick_modifiers: Bucket,
    pub ease_in: Bucket,
    pub ease_out: Bucket,
    pub slide_starts: Bucket,
    pub slide_ends: Bucket,
    pub visible_waypoints: Bucket,
    pub invisible_waypoints: Bucket,
    /// Skill triggers in input order
    pub skills: Vec<Note>,
    /// Fever events in input order, paired with whether they start fever
    pub fevers: Vec<(Note, ShortNoteKind)>,
    /// Notes whose tag was not recognised
    pub ignored: usize,
}

fn push(bucket: &mut Bucket, note: &Note) {
    bucket.entry(note.key()).or_default().push(*note);
}

/// Classify every note of a score.
pub fn classify_notes(score: &Score) -> NoteBuckets {
    let mut buckets = NoteBuckets::default();

    for note in score.slide_notes.iter().flatten() {
        match SlideRole::from_tag(note.note_type) {
            Some(SlideRole::Start) => push(&mut buckets.slide_starts, note),
            Some(SlideRole::End) => push(&mut buckets.slide_ends, note),
            Some(SlideRole::VisibleWaypoint) => push(&mut buckets.visible_waypoints, note),
            Some(SlideRole::InvisibleWaypoint) => push(&mut buckets.invisible_waypoints, note),
            None => buckets.ignore("slide", note),
        }
    }

    for note in &score.air_notes {
        match AirModifierKind::from_tag(note.note_type) {
            Some(AirModifierKind::Flick(_)) => push(&mut buckets.flick_modifiers, note),
            Some(AirModifierKind::EaseIn) => push(&mut buckets.ease_in, note),
            Some(AirModifierKind::EaseOut) => push(&mut buckets.ease_out, note),
            None => buckets.ignore("air", note),
        }
    }

    for note in &score.short_notes {
        match ShortNoteKind::of(note) {
            Some(ShortNoteKind::Tap) => push(&mut buckets.taps, note),
            Some(ShortNoteKind::CriticalTap) => push(&mut buckets.criticals, note),
            Some(ShortNoteKind::WaypointRemover) => push(&mut buckets.waypoint_removers, note),
            Some(ShortNoteKind::SkillTrigger) => buckets.skills.push(*note),
            Some(kind @ (ShortNoteKind::FeverPrepare | ShortNoteKind::FeverStart)) => {
                buckets.fevers.push((*note, kind))
            }
            None => buckets.ignore("short", note),
        }
    }

    log::debug!(
        "classified: {} taps, {} criticals, {} flicks, {} slide starts, {} ignored",
        buckets.taps.len(),
        buckets.criticals.len(),
        buckets.flick_modifiers.len(),
        buckets.slide_starts.len(),
        buckets.ignored
    );

    buckets
}

impl NoteBuckets {
    fn ignore(&mut self, collection: &str, note: &Note) {
        log::debug!(
            "ignoring {} note with unknown type {} at measure {} tick {}",
            collection, note.note_type, note.measure, note.tick
        );
        self.ignored += 1;
    }

    pub fn is_critical(&self, key: &PositionKey) -> bool {
        self.criticals.contains_key(key)
    }

    pub fn is_flick(&self, key: &PositionKey) -> bool {
        self.flick_modifiers.contains_key(key)
    }

    /// Direction of the flick at a key. Diagonals win over straight flicks,
    /// left over right.
    pub fn flick_direction(&self, key: &PositionKey) -> Option<FlickDirection> {
        let modifiers = self.flick_modifiers.get(key)?;
        let has = |wanted: FlickDirection| {
            modifiers.iter().any(|note| {
                AirModifierKind::from_tag(note.note_type) == Some(AirModifierKind::Flick(wanted))
            })
        };
        if has(FlickDirection::Left) {
            Some(FlickDirection::Left)
        } else if has(FlickDirection::Right) {
            Some(FlickDirection::Right)
        } else {
            Some(FlickDirection::Up)
        }
    }

    pub fn has_ease_in(&self, key: &PositionKey) -> bool {
        self.ease_in.contains_key(key)
    }

    pub fn has_ease_out(&self, key: &PositionKey) -> bool {
        self.ease_out.contains_key(key)
    }

    /// Whether a key carries any curve modifier.
    pub fn is_eased(&self, key: &PositionKey) -> bool {
        self.has_ease_in(key) || self.has_ease_out(key)
    }

    pub fn is_waypoint_remover(&self, key: &PositionKey) -> bool {
        self.waypoint_removers.contains_key(key)
    }

    pub fn is_slide_start(&self, key: &PositionKey) -> bool {
        self.slide_starts.contains_key(key)
    }

    /// Total number of notes placed in some bucket or list.
    pub fn classified_count(&self) -> usize {
        [
            &self.taps,
            &self.criticals,
            &self.waypoint_removers,
            &self.flick_modifiers,
            &self.ease_in,
            &self.ease_out,
            &self.slide_starts,
            &self.slide_ends,
            &self.visible_waypoints,
            &self.invisible_waypoints,
        ]
        .iter()
        .flat_map(|bucket| bucket.values())
        .map(Vec::len)
        .sum::<usize>()
            + self.skills.len()
            + self.fevers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(measure: u32, tick: u32, lane: i32, note_type: u8) -> Note {
        Note { measure, tick, lane, width: 2, note_type }
    }

    fn sample_score() -> Score {
        Score {
            beats_per_measure: vec![4, 4],
            short_notes: vec![
                note(0, 0, 4, 1),
                note(0, 240, 6, 2),
                note(0, 480, 8, 3),
                note(0, 0, 0, 4),
                note(1, 0, 15, 1),
                note(1, 480, 15, 2),
                note(1, 960, 4, 7),
            ],
            air_notes: vec![
                note(0, 0, 4, 3),
                note(0, 0, 4, 1),
                note(1, 0, 5, 2),
                note(1, 0, 5, 6),
                note(1, 0, 6, 9),
            ],
            slide_notes: vec![vec![
                note(1, 0, 5, 1),
                note(1, 240, 6, 3),
                note(1, 480, 7, 5),
                note(1, 960, 8, 2),
            ]],
            ..Score::default()
        }
    }

    #[test]
    fn every_known_note_lands_in_a_bucket() {
        let score = sample_score();
        let buckets = classify_notes(&score);
        let total = score.short_notes.len()
            + score.air_notes.len()
            + score.slide_notes.iter().map(Vec::len).sum::<usize>();
        assert_eq!(buckets.ignored, 2);
        assert_eq!(buckets.classified_count() + buckets.ignored, total);
        assert_eq!(buckets.skills.len(), 1);
        assert_eq!(buckets.fevers[0].1, ShortNoteKind::FeverPrepare);
        assert_eq!(buckets.fevers[1].1, ShortNoteKind::FeverStart);
    }

    #[test]
    fn modifiers_correlate_with_base_notes() {
        let buckets = classify_notes(&sample_score());
        let tap = note(0, 0, 4, 1).key();
        assert!(buckets.taps.contains_key(&tap));
        assert!(buckets.is_flick(&tap));
        assert_eq!(buckets.flick_modifiers[&tap].len(), 2);
        assert_eq!(buckets.flick_direction(&tap), Some(FlickDirection::Left));

        let start = note(1, 0, 5, 1).key();
        assert!(buckets.is_slide_start(&start));
        assert!(buckets.has_ease_in(&start));
        assert!(buckets.has_ease_out(&start));
        assert!(!buckets.is_flick(&start));

        assert!(buckets.is_critical(&note(0, 240, 6, 2).key()));
        assert!(buckets.is_waypoint_remover(&note(0, 480, 8, 3).key()));
        assert!(buckets.visible_waypoints.contains_key(&note(1, 240, 6, 3).key()));
        assert!(buckets.invisible_waypoints.contains_key(&note(1, 480, 7, 5).key()));
    }

    #[test]
    fn key_includes_width() {
        let buckets = classify_notes(&sample_score());
        let narrower = PositionKey { width: 1, ..note(0, 0, 4, 1).key() };
        assert!(!buckets.is_flick(&narrower));
    }
}
