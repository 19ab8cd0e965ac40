//! Data model for a parsed rhythm-game chart.
//!
//! These structures are produced by an external chart parser and capture
//! everything the renderer needs: tempo changes, time signatures and the
//! three note collections.

use serde::{Deserialize, Serialize};

/// A complete chart as produced by the chart parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Score {
    /// Tempo changes, not necessarily sorted
    pub tempo_changes: Vec<TempoChange>,
    /// Quarter-beats per measure, indexed by measure number
    pub beats_per_measure: Vec<u32>,
    /// Taps, criticals, waypoint removers, skill and fever events
    pub short_notes: Vec<Note>,
    /// Flick and ease modifiers
    pub air_notes: Vec<Note>,
    /// One inner list per slide gesture, in musical order
    pub slide_notes: Vec<Vec<Note>>,
}

impl Score {
    /// Number of measures in the chart.
    pub fn measure_count(&self) -> usize {
        self.beats_per_measure.len()
    }
}

/// A tempo change at a musical position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TempoChange {
    pub measure: u32,
    #[serde(default)]
    pub tick: u32,
    pub bpm: f64,
}

/// A single notation event. The meaning of `note_type` depends on which
/// collection of the [`Score`] holds the note; use [`ShortNoteKind`],
/// [`AirModifierKind`] or [`SlideRole`] to interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub measure: u32,
    pub tick: u32,
    pub lane: i32,
    pub width: i32,
    pub note_type: u8,
}

impl Note {
    pub fn key(&self) -> PositionKey {
        PositionKey::of(self)
    }
}

/// Identity under which modifiers attach to a base note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PositionKey {
    pub measure: u32,
    pub tick: u32,
    pub lane: i32,
    pub width: i32,
}

impl PositionKey {
    pub fn of(note: &Note) -> Self {
        Self {
            measure: note.measure,
            tick: note.tick,
            lane: note.lane,
            width: note.width,
        }
    }
}

/// Lane reserved for skill triggers.
pub const SKILL_LANE: i32 = 0;
/// Lane reserved for fever events.
pub const FEVER_LANE: i32 = 15;
/// First and last raw lane of the playable field.
pub const FIRST_PLAYABLE_LANE: i32 = 2;
pub const LAST_PLAYABLE_LANE: i32 = 13;

/// Meaning of a note in `short_notes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortNoteKind {
    Tap,
    CriticalTap,
    WaypointRemover,
    SkillTrigger,
    FeverPrepare,
    FeverStart,
}

impl ShortNoteKind {
    /// Interpret a short note. Returns `None` for tags this renderer does
    /// not know about.
    pub fn of(note: &Note) -> Option<Self> {
        match (note.lane, note.note_type) {
            (FEVER_LANE, 1) => Some(Self::FeverPrepare),
            (FEVER_LANE, 2) => Some(Self::FeverStart),
            (SKILL_LANE, 4) => Some(Self::SkillTrigger),
            (_, 1) => Some(Self::Tap),
            (_, 2) => Some(Self::CriticalTap),
            (_, 3) => Some(Self::WaypointRemover),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlickDirection {
    Up,
    Left,
    Right,
}

/// Meaning of a note in `air_notes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirModifierKind {
    Flick(FlickDirection),
    EaseIn,
    EaseOut,
}

impl AirModifierKind {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Flick(FlickDirection::Up)),
            3 => Some(Self::Flick(FlickDirection::Left)),
            4 => Some(Self::Flick(FlickDirection::Right)),
            2 => Some(Self::EaseIn),
            5 | 6 => Some(Self::EaseOut),
            _ => None,
        }
    }
}

/// Meaning of a note inside a slide group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideRole {
    Start,
    End,
    VisibleWaypoint,
    InvisibleWaypoint,
}

impl SlideRole {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::Start),
            2 => Some(Self::End),
            3 => Some(Self::VisibleWaypoint),
            5 => Some(Self::InvisibleWaypoint),
            _ => None,
        }
    }
}
