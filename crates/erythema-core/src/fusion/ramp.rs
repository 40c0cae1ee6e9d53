//! Perceptual ramp for the fused heatmap.
//!
//! Black → purple → magenta over `[0, 0.5]`, then magenta → orange → yellow
//! over `[0.5, 1]`; every quarter is a linear blend in RGB.

const STOPS: [[f64; 3]; 5] = [
    [0.0, 0.0, 0.0],
    [84.0, 15.0, 125.0],
    [190.0, 40.0, 140.0],
    [245.0, 125.0, 30.0],
    [252.0, 230.0, 60.0],
];

/// Ramp color for `t ∈ [0, 1]` (clamped; NaN maps to black).
pub fn fused_ramp(t: f64) -> [u8; 3] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let segments = (STOPS.len() - 1) as f64;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(STOPS.len() - 2);
    let frac = pos - idx as f64;

    let (lo, hi) = (STOPS[idx], STOPS[idx + 1]);
    std::array::from_fn(|c| (lo[c] + (hi[c] - lo[c]) * frac).round().clamp(0.0, 255.0) as u8)
}
