//! Rendering tests: build small charts, render them to SVG and inspect
//! the document.

use chartlib::renderer::layout::compute_layout;
use chartlib::{
    render_charts, render_json_to_svg, render_score_to_svg, Note, RenderConfig, RenderError, Score,
    TempoChange,
};
use pretty_assertions::assert_eq;

const LAYERS: [&str; 11] = [
    "background",
    "lane-lines",
    "measure-lines",
    "beat-lines",
    "measure-numbers",
    "slide-paths",
    "slide-diamonds",
    "notes",
    "critical-notes",
    "arrows",
    "special-events",
];

fn note(measure: u32, tick: u32, lane: i32, width: i32, note_type: u8) -> Note {
    Note { measure, tick, lane, width, note_type }
}

fn chart(measures: usize) -> Score {
    Score {
        tempo_changes: vec![TempoChange { measure: 0, tick: 0, bpm: 140.0 }],
        beats_per_measure: vec![4; measures],
        ..Score::default()
    }
}

fn config() -> RenderConfig {
    RenderConfig::with_asset_base("https://example.test/chart")
}

fn render(score: &Score) -> String {
    render_score_to_svg(score, &config()).expect("render failed")
}

fn root_size(svg: &str) -> (f64, f64) {
    let doc = roxmltree::Document::parse(svg).expect("SVG should be well-formed XML");
    let root = doc.root_element();
    let width = root.attribute("width").unwrap().parse().unwrap();
    let height = root.attribute("height").unwrap().parse().unwrap();
    (width, height)
}

/// (x, y) of every image in a layer whose href ends with `sprite`.
fn images(svg: &str, layer: &str, sprite: &str) -> Vec<(f64, f64)> {
    let doc = roxmltree::Document::parse(svg).unwrap();
    let group = doc
        .descendants()
        .find(|n| n.has_tag_name("g") && n.attribute("id") == Some(layer))
        .unwrap_or_else(|| panic!("missing layer {}", layer));
    group
        .descendants()
        .filter(|n| n.has_tag_name("image"))
        .filter(|n| n.attribute("href").map_or(false, |h| h.ends_with(sprite)))
        .map(|n| {
            (
                n.attribute("x").unwrap().parse().unwrap(),
                n.attribute("y").unwrap().parse().unwrap(),
            )
        })
        .collect()
}

#[test]
fn document_has_every_layer_in_paint_order() {
    let svg = render(&chart(4));
    let doc = roxmltree::Document::parse(&svg).unwrap();
    let ids: Vec<&str> = doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("g"))
        .filter_map(|n| n.attribute("id"))
        .collect();
    assert_eq!(ids, LAYERS.to_vec());
    assert!(doc.descendants().any(|n| n.has_tag_name("marker") && n.attribute("id") == Some("skill")));
}

#[test]
fn canvas_width_follows_row_count() {
    for measures in [1, 4, 5, 9, 16] {
        let score = chart(measures);
        let layout = compute_layout(&score, &config()).unwrap();
        let (width, _) = root_size(&render(&score));
        let rows = measures.div_ceil(4) as f64;
        let expected = rows * (layout.left_margin + layout.right_margin + 12.0 * layout.lane_width)
            + layout.right_margin;
        assert_eq!(width, expected, "{} measures", measures);
    }
}

#[test]
fn canvas_height_ignores_later_rows() {
    let (_, short) = root_size(&render(&chart(4)));
    let (_, long) = root_size(&render(&chart(40)));
    assert_eq!(short, long);
    // 4 measures of 4 beats at 80 px, plus 10 px margins
    assert_eq!(short, 1300.0);
}

#[test]
fn seam_note_is_drawn_in_both_rows() {
    let mut score = chart(8);
    score.short_notes = vec![note(4, 0, 4, 2, 1)];
    let svg = render(&score);
    let layout = compute_layout(&score, &config()).unwrap();

    let heads = images(&svg, "notes", "notes_normal_left.png");
    assert_eq!(heads.len(), 2);
    let (previous, own) = (heads[0], heads[1]);
    assert_eq!(own.0 - previous.0, layout.row_stride());
    // own row: bottom of the first slot; previous row: the row top
    assert_eq!(own.1 - previous.1, layout.measure_bottoms[0] - layout.row_top());
}

#[test]
fn off_seam_note_is_drawn_once() {
    let mut score = chart(8);
    score.short_notes = vec![note(4, 240, 4, 2, 1), note(5, 0, 4, 2, 1), note(0, 0, 4, 2, 1)];
    let svg = render(&score);
    assert_eq!(images(&svg, "notes", "notes_normal_left.png").len(), 3);
}

#[test]
fn seam_flick_and_event_are_wrapped() {
    let mut score = chart(8);
    score.short_notes = vec![note(4, 0, 6, 3, 2), note(4, 0, 0, 1, 4)];
    score.air_notes = vec![note(4, 0, 6, 3, 1)];
    let svg = render(&score);
    assert_eq!(images(&svg, "critical-notes", "notes_crtcl_left.png").len(), 2);
    assert_eq!(images(&svg, "arrows", "notes_flick_arrow_crtcl_03.png").len(), 2);
    assert_eq!(svg.matches("url(#skill)").count(), 2);
}

#[test]
fn wide_notes_get_a_middle_piece() {
    let mut score = chart(4);
    score.short_notes = vec![note(0, 0, 4, 1, 1), note(1, 0, 4, 4, 1)];
    let svg = render(&score);
    assert_eq!(images(&svg, "notes", "notes_normal_middle.png").len(), 1);
    assert_eq!(images(&svg, "notes", "notes_normal_right.png").len(), 2);
}

#[test]
fn side_lanes_hold_events_not_notes() {
    let mut score = chart(4);
    score.short_notes = vec![
        note(0, 0, 0, 1, 4),
        note(1, 0, 15, 1, 1),
        note(2, 0, 15, 1, 2),
        note(3, 0, 1, 1, 1),
    ];
    let svg = render(&score);
    assert_eq!(svg.matches("url(#skill)").count(), 1);
    assert_eq!(svg.matches("url(#feverPrepare)").count(), 1);
    assert_eq!(svg.matches("url(#feverStart)").count(), 1);
    assert!(images(&svg, "notes", ".png").is_empty());
    assert!(images(&svg, "critical-notes", ".png").is_empty());
}

#[test]
fn measure_numbers_continue_across_rows() {
    let svg = render(&chart(8));
    assert!(svg.contains(">001</text>"));
    assert!(svg.contains(">005</text>"));
    assert!(svg.contains(">009</text>"));
}

#[test]
fn tempo_changes_are_labelled() {
    let mut score = chart(8);
    score.tempo_changes.push(TempoChange { measure: 5, tick: 480, bpm: 95.0 });
    let svg = render(&score);
    assert!(svg.contains(r#"fill="red">140</text>"#));
    assert!(svg.contains(r#"fill="red">095</text>"#));
}

#[test]
fn unknown_note_types_are_ignored() {
    let mut score = chart(4);
    score.short_notes = vec![note(0, 0, 4, 2, 9)];
    score.air_notes = vec![note(0, 0, 4, 2, 8)];
    let plain = render(&chart(4));
    assert_eq!(render(&score), plain);
}

#[test]
fn render_is_deterministic() {
    let mut score = chart(9);
    score.short_notes = vec![note(0, 0, 4, 2, 1), note(2, 240, 8, 3, 2), note(4, 0, 10, 2, 1)];
    score.air_notes = vec![note(0, 0, 4, 2, 3), note(1, 0, 3, 2, 2)];
    score.slide_notes = vec![vec![note(1, 0, 3, 2, 1), note(3, 0, 7, 2, 3), note(5, 480, 9, 2, 2)]];
    let first = render(&score);
    let second = render(&score.clone());
    assert_eq!(first, second);
}

#[test]
fn empty_chart_is_malformed() {
    let err = render_score_to_svg(&Score::default(), &config()).unwrap_err();
    assert!(matches!(err, RenderError::NoMeasures));
}

#[test]
fn batch_failures_stay_local() {
    let mut good = chart(4);
    good.short_notes = vec![note(0, 0, 4, 2, 1)];
    let mut broken = chart(4);
    broken.slide_notes = vec![vec![note(0, 0, 4, 2, 1)]];

    let results = render_charts(&[good.clone(), Score::default(), broken, good.clone()], &config());
    assert_eq!(results.len(), 4);
    assert_eq!(results[0].as_ref().unwrap(), &render(&good));
    assert!(matches!(results[1], Err(RenderError::NoMeasures)));
    assert!(matches!(results[2], Err(RenderError::IncompleteSlide { group: 0 })));
    assert!(results[3].is_ok());
}

#[test]
fn json_entry_point_matches_struct_render() {
    let json = r#"{
        "tempoChanges": [{"measure": 0, "tick": 0, "bpm": 140}],
        "beatsPerMeasure": [4, 4, 4, 4, 4],
        "shortNotes": [{"measure": 4, "tick": 0, "lane": 6, "width": 2, "noteType": 1}]
    }"#;
    let svg = render_json_to_svg(json, &config()).unwrap();
    let score = chartlib::score_from_json(json).unwrap();
    assert_eq!(svg, render(&score));
    assert!(matches!(render_json_to_svg("{", &config()), Err(RenderError::Json(_))));
}

#[test]
fn c_api_round_trip() {
    use std::ffi::{CStr, CString};

    let json = CString::new(chartlib::score_to_json(&chart(2)).unwrap()).unwrap();
    let base = CString::new("assets").unwrap();
    unsafe {
        let out = chartlib::chartlib_render_json(json.as_ptr(), base.as_ptr());
        assert!(!out.is_null());
        let svg = CStr::from_ptr(out).to_str().unwrap().to_owned();
        chartlib::chartlib_free_string(out);
        assert!(svg.starts_with("<svg"));

        let bad = CString::new("[]").unwrap();
        assert!(chartlib::chartlib_render_json(bad.as_ptr(), std::ptr::null()).is_null());
    }
}

#[test]
fn removed_waypoint_follows_eased_curve() {
    let mut straight = chart(4);
    straight.short_notes = vec![note(0, 480, 4, 2, 3)];
    straight.slide_notes = vec![vec![note(0, 0, 3, 2, 1), note(0, 480, 4, 2, 5), note(1, 0, 5, 2, 2)]];
    let mut eased = straight.clone();
    eased.air_notes = vec![note(0, 0, 3, 2, 5)];

    let linear = images(&render(&straight), "slide-diamonds", "notes_long_among.png");
    let curved = images(&render(&eased), "slide-diamonds", "notes_long_among.png");
    assert_eq!(linear.len(), 1);
    assert_eq!(curved.len(), 1);
    // a quarter of the way from x 41..55 to 57..71, minus half a diamond
    assert_eq!(linear[0].0, 46.0);
    assert!((curved[0].0 - linear[0].0).abs() >= 0.5);
    assert_eq!(curved[0].1, linear[0].1);
}

#[test]
fn removed_waypoint_past_the_path_is_skipped() {
    let mut score = chart(4);
    score.short_notes = vec![note(1, 0, 3, 2, 3)];
    score.slide_notes = vec![vec![note(0, 0, 3, 2, 1), note(0, 960, 3, 2, 2), note(1, 0, 3, 2, 5)]];

    let svg = render_score_to_svg(&score, &config()).expect("unplaced diamond must not fail the render");
    assert!(images(&svg, "slide-diamonds", "notes_long_among.png").is_empty());
    assert_eq!(images(&svg, "notes", "notes_long_left.png").len(), 2);
}

#[test]
fn slide_across_rows_is_filled_in_each_row() {
    let mut score = chart(8);
    score.slide_notes = vec![vec![note(3, 0, 3, 2, 1), note(4, 480, 5, 2, 2)]];
    let svg = render(&score);

    let doc = roxmltree::Document::parse(&svg).unwrap();
    let fills: Vec<&str> = doc
        .descendants()
        .find(|n| n.has_tag_name("g") && n.attribute("id") == Some("slide-paths"))
        .unwrap()
        .descendants()
        .filter(|n| n.has_tag_name("path"))
        .filter_map(|n| n.attribute("fill"))
        .collect();
    assert_eq!(fills, vec!["#DAFDF0F0", "#DAFDF0F0"]);
}
