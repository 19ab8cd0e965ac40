//! chartlib: rhythm-game chart renderer.
//!
//! Takes a chart already parsed into a [`Score`] (tempo changes, beats per
//! measure, short/air/slide notes) and lays it out as a static SVG document
//! with one group per drawing layer, ready for a rasterizer.
//!
//! # Example
//! ```no_run
//! use chartlib::{render_json_to_svg, RenderConfig};
//!
//! let json = std::fs::read_to_string("chart.json").unwrap();
//! let svg = render_json_to_svg(&json, &RenderConfig::default()).unwrap();
//! println!("{} bytes of SVG", svg.len());
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod renderer;
pub mod timemap;

pub use config::RenderConfig;
pub use error::RenderError;
pub use model::*;
pub use renderer::render_score_to_svg;

/// Decode a chart from its JSON form.
pub fn score_from_json(json: &str) -> Result<Score, RenderError> {
    Ok(serde_json::from_str(json)?)
}

/// Convert a parsed chart to a JSON string.
/// Useful for passing data across FFI boundaries.
pub fn score_to_json(score: &Score) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(score)?)
}

/// Decode a JSON chart and render it directly to SVG.
pub fn render_json_to_svg(json: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let score = score_from_json(json)?;
    render_score_to_svg(&score, config)
}

/// Render independent charts one after another. A chart that fails only
/// yields an error in its own slot.
pub fn render_charts(scores: &[Score], config: &RenderConfig) -> Vec<Result<String, RenderError>> {
    scores
        .iter()
        .enumerate()
        .map(|(i, score)| {
            let result = render_score_to_svg(score, config);
            if let Err(ref e) = result {
                log::warn!("chart {} failed to render: {}", i, e);
            }
            result
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI for native embedders (static library / shared object)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Render a JSON chart and return SVG as a C string.
/// The caller must free the returned string with `chartlib_free_string`.
///
/// `asset_base` may be null to use the default sprite location.
/// Returns null on any error.
///
/// # Safety
/// `json` must be a valid null-terminated UTF-8 C string. `asset_base`
/// must be null or a valid null-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn chartlib_render_json(
    json: *const c_char,
    asset_base: *const c_char,
) -> *mut c_char {
    if json.is_null() {
        return std::ptr::null_mut();
    }
    let json = match unsafe { CStr::from_ptr(json) }.to_str() {
        Ok(s) => s,
        Err(_) => return std::ptr::null_mut(),
    };

    let config = if asset_base.is_null() {
        RenderConfig::default()
    } else {
        match unsafe { CStr::from_ptr(asset_base) }.to_str() {
            Ok(base) => RenderConfig::with_asset_base(base),
            Err(_) => return std::ptr::null_mut(),
        }
    };

    match render_json_to_svg(json, &config) {
        Ok(svg) => CString::new(svg).map_or(std::ptr::null_mut(), CString::into_raw),
        Err(e) => {
            log::warn!("chartlib_render_json: {}", e);
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by chartlib functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a chartlib function, or null.
#[no_mangle]
pub unsafe extern "C" fn chartlib_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
