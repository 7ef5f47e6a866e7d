//! Blank-render detection over raw RGBA pixel data
//!
//! The page hands the checker its canvas pixel buffer base64-encoded; the
//! scan itself runs here so it can be exercised without a browser.

use crate::error::{Error, Result};
use base64::Engine as _;

/// Decode the base64 pixel payload returned by the page
pub fn decode_pixels(b64: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| Error::Evaluation(format!("invalid pixel payload: {}", e)))
}

/// Whether every pixel's RGB channels match the first pixel's
///
/// A uniform buffer is treated as an unrendered surface. The scan walks the
/// buffer with stride 4 and stops at the first differing pixel; alpha never
/// participates in the comparison. Note the heuristic deliberately
/// classifies a uniform-but-valid solid fill as blank, matching the
/// reference behavior.
pub fn is_uniform(rgba: &[u8]) -> bool {
    if rgba.len() < 4 {
        return true;
    }
    let (r, g, b) = (rgba[0], rgba[1], rgba[2]);
    for px in rgba.chunks_exact(4).skip(1) {
        if px[0] != r || px[1] != g || px[2] != b {
            return false;
        }
    }
    true
}
