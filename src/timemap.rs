//! Compute absolute timestamps for measures and musical positions.
//! This answers "when does each measure start?" and "how long is it?" in
//! wall-clock time, honoring tempo changes at any tick.

use crate::model::{Note, Score, TempoChange};

/// Timing information for one measure.
#[derive(Debug, Clone, PartialEq)]
pub struct TimemapEntry {
    /// Measure number (0-based)
    pub index: usize,
    /// Cumulative start time in milliseconds from the beginning
    pub timestamp_ms: f64,
    /// Duration of this measure in milliseconds
    pub duration_ms: f64,
    /// Tempo in effect at the start of the measure
    pub tempo_bpm: f64,
    /// Quarter-beats in the measure
    pub beats: u32,
}

/// Tempo before the first tempo change.
const DEFAULT_TEMPO: f64 = 120.0;

/// A tempo change located on the absolute beat axis.
#[derive(Debug, Clone, Copy)]
struct TempoPoint {
    beat: f64,
    bpm: f64,
}

/// Beat offset of the start of every measure, plus the end of the chart.
fn measure_starts(score: &Score) -> Vec<f64> {
    let mut starts = Vec::with_capacity(score.beats_per_measure.len() + 1);
    let mut beat = 0.0;
    starts.push(beat);
    for &beats in &score.beats_per_measure {
        beat += beats as f64;
        starts.push(beat);
    }
    starts
}

fn beat_of(starts: &[f64], measure: u32, tick: u32, ticks_per_beat: u32) -> f64 {
    // positions past the last measure extend it with 4/4 bars
    let measure = measure as usize;
    let base = match starts.get(measure) {
        Some(&beat) => beat,
        None => starts.last().copied().unwrap_or(0.0) + 4.0 * (measure + 1 - starts.len()) as f64,
    };
    base + tick as f64 / ticks_per_beat.max(1) as f64
}

fn tempo_points(score: &Score, starts: &[f64], ticks_per_beat: u32) -> Vec<TempoPoint> {
    let mut changes: Vec<TempoChange> = score
        .tempo_changes
        .iter()
        .copied()
        .filter(|change| change.bpm > 0.0)
        .collect();
    changes.sort_by_key(|change| (change.measure, change.tick));

    let mut points = vec![TempoPoint { beat: 0.0, bpm: DEFAULT_TEMPO }];
    for change in changes {
        let beat = beat_of(starts, change.measure, change.tick, ticks_per_beat);
        match points.last_mut() {
            Some(last) if last.beat == beat => last.bpm = change.bpm,
            _ => points.push(TempoPoint { beat, bpm: change.bpm }),
        }
    }
    points
}

/// Milliseconds from the start of the chart to `beat`.
fn time_at_beat(points: &[TempoPoint], beat: f64) -> f64 {
    let mut elapsed = 0.0;
    for (i, point) in points.iter().enumerate() {
        let next = points.get(i + 1).map_or(f64::INFINITY, |p| p.beat);
        if beat <= next {
            return elapsed + (beat - point.beat) * 60_000.0 / point.bpm;
        }
        elapsed += (next - point.beat) * 60_000.0 / point.bpm;
    }
    elapsed
}

fn tempo_at_beat(points: &[TempoPoint], beat: f64) -> f64 {
    points
        .iter()
        .take_while(|point| point.beat <= beat)
        .last()
        .map_or(DEFAULT_TEMPO, |point| point.bpm)
}

/// Generate a timemap with one entry per measure.
pub fn generate_timemap(score: &Score, ticks_per_beat: u32) -> Vec<TimemapEntry> {
    let starts = measure_starts(score);
    let points = tempo_points(score, &starts, ticks_per_beat);

    score
        .beats_per_measure
        .iter()
        .enumerate()
        .map(|(index, &beats)| {
            let start = time_at_beat(&points, starts[index]);
            let end = time_at_beat(&points, starts[index + 1]);
            TimemapEntry {
                index,
                timestamp_ms: start,
                duration_ms: end - start,
                tempo_bpm: tempo_at_beat(&points, starts[index]),
                beats,
            }
        })
        .collect()
}

/// Wall-clock offset of a musical position in milliseconds.
pub fn time_at_ms(score: &Score, measure: u32, tick: u32, ticks_per_beat: u32) -> f64 {
    let starts = measure_starts(score);
    let points = tempo_points(score, &starts, ticks_per_beat);
    time_at_beat(&points, beat_of(&starts, measure, tick, ticks_per_beat))
}

/// Wall-clock offset of a note in milliseconds.
pub fn note_time_ms(score: &Score, note: &Note, ticks_per_beat: u32) -> f64 {
    time_at_ms(score, note.measure, note.tick, ticks_per_beat)
}

/// Total duration of the entire timemap in milliseconds.
pub fn total_duration_ms(timemap: &[TimemapEntry]) -> f64 {
    timemap.last().map_or(0.0, |e| e.timestamp_ms + e.duration_ms)
}
