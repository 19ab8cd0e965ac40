//! Shared constants for the chart renderer (all in SVG user units).

// ── Field & margins ─────────────────────────────────────────────────
pub(super) const LANE_COUNT: usize = 12; // playable lanes per row
pub(super) const TOP_MARGIN_DIVISOR: f64 = 8.0; // top/bottom margin = ppb / 8
pub(super) const SIDE_MARGIN_DIVISOR: f64 = 2.5; // left/right margin = ppb / 2.5
pub(super) const LANE_LINE_WIDTH: f64 = 2.0;
pub(super) const GRID_LINE_WIDTH: f64 = 2.0;
pub(super) const BEAT_LINE_OVERHANG: f64 = 4.0;
pub(super) const LABEL_FONT_DIVISOR: f64 = 2.5; // label font = left margin / 2.5

// ── Note sprites (source image pixels) ──────────────────────────────
pub(super) const NOTE_SPRITE_BODY: f64 = 354.0 - 48.0 - 48.0; // spans three lanes
pub(super) const NOTE_SPRITE_HEIGHT: f64 = 186.0;
pub(super) const NOTE_SPRITE_SIDE_MARGIN: f64 = 48.0;
pub(super) const NOTE_SPRITE_END_WIDTH: f64 = 91.0;
pub(super) const NOTE_SPRITE_TOP_PAD: f64 = 36.0;
pub(super) const NOTE_SPRITE_CENTER: f64 = 53.0;
pub(super) const LONG_SPRITE_CENTER: f64 = 54.0;

// ── Flick arrows ────────────────────────────────────────────────────
pub(super) const MAX_ARROW_LANES: i32 = 6;
pub(super) const ARROW_LIFT_DIVISOR: f64 = 32.0; // arrows float ppb / 32 above the note
/// (width, height) of the straight arrow sprites for 1..=6 lanes.
pub(super) const STRAIGHT_ARROW_SIZES: [(f64, f64); 6] = [
    (144.0, 158.0),
    (188.0, 174.0),
    (248.0, 194.0),
    (312.0, 216.0),
    (374.0, 236.0),
    (436.0, 258.0),
];
/// (width, height) of the diagonal arrow sprites for 1..=6 lanes.
pub(super) const DIAGONAL_ARROW_SIZES: [(f64, f64); 6] = [
    (176.0, 160.0),
    (228.0, 182.0),
    (298.0, 212.0),
    (376.0, 242.0),
    (444.0, 270.0),
    (514.0, 300.0),
];

// ── Slides ──────────────────────────────────────────────────────────
pub(super) const DIAMOND_LANES: f64 = 1.5; // diamond width in lanes
pub(super) const SLIDE_SHRINK_DIVISOR: f64 = 16.0; // edges pulled in by lane / 16
pub(super) const CURVE_EASE_RATIO: f64 = 0.5;
pub(super) const STRAIGHT_EASE_RATIO: f64 = 0.0;

// ── Event markers ───────────────────────────────────────────────────
pub(super) const EVENT_MARKER_GAP: f64 = 10.0; // distance right of the field
pub(super) const EVENT_MARKER_STROKE: f64 = 5.0;

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const BACKGROUND_COLOR: &str = "#00304030";
pub(super) const OUTER_LANE_COLOR: &str = "#FFFFFFFF";
pub(super) const INNER_LANE_COLOR: &str = "#FFFFFF80";
pub(super) const MEASURE_LINE_COLOR: &str = "#FFFFFFFF";
pub(super) const BEAT_LINE_COLOR: &str = "#FFFFFF80";
pub(super) const MEASURE_TICK_COLOR: &str = "#000000";
pub(super) const TEMPO_LABEL_COLOR: &str = "red";
pub(super) const SLIDE_FILL: &str = "#DAFDF0F0";
pub(super) const CRITICAL_SLIDE_FILL: &str = "#FFFCCCF0";
pub(super) const SKILL_MARKER_COLOR: &str = "darkcyan";
pub(super) const FEVER_START_MARKER_COLOR: &str = "brown";
pub(super) const FEVER_PREPARE_MARKER_COLOR: &str = "fuchsia";
