use crate::foundation::core::Vec2;

/// Directions shorter than this on both axes are treated as degenerate.
const DEGENERATE_EPS: f64 = 1e-9;

/// Safe-numeric coercion: `None` and non-finite values become `fallback`.
pub(crate) fn finite_or(v: Option<f64>, fallback: f64) -> f64 {
    match v {
        Some(x) if x.is_finite() => x,
        _ => fallback,
    }
}

/// Clamp into `0..=1`; NaN becomes 0.
pub(crate) fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Normalize an angle in degrees into `[0, 360)`.
pub(crate) fn normalize_deg(deg: f64) -> f64 {
    let d = ((deg % 360.0) + 360.0) % 360.0;
    // `-1e-15 % 360 + 360` rounds up to exactly 360.0.
    if d >= 360.0 { 0.0 } else { d }
}

/// Geometric angle of a direction vector: 0° points right, counter-clockwise positive.
pub(crate) fn geometric_angle_deg(dir: Vec2) -> Option<f64> {
    if dir.x.abs() < DEGENERATE_EPS && dir.y.abs() < DEGENERATE_EPS {
        return None;
    }
    Some(normalize_deg(dir.y.atan2(dir.x).to_degrees()))
}

/// Convert a gradient direction vector into the stylesheet angle convention (0° up, clockwise).
///
/// A degenerate direction yields 0.
pub fn css_gradient_angle(dir: Vec2) -> f64 {
    match geometric_angle_deg(dir) {
        Some(geo) => normalize_deg(90.0 - geo),
        None => 0.0,
    }
}

/// Round to `decimals` places and format without trailing zeros (`-0` prints as `0`).
pub(crate) fn fmt_num(v: f64, decimals: i32) -> String {
    let v = finite_or(Some(v), 0.0);
    let scale = 10f64.powi(decimals);
    let scaled = v * scale;
    // Overflow happens only far past 2^53, where no fractional digits remain.
    let r = if scaled.is_finite() { scaled.round() / scale } else { v };
    if r == 0.0 {
        return "0".to_owned();
    }
    format!("{r}")
}

/// Pixel length with two-decimal precision, e.g. `12.5px`, `0`.
pub(crate) fn px(v: f64) -> String {
    let n = fmt_num(v, 2);
    if n == "0" { n } else { format!("{n}px") }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
