use crate::foundation::math::{finite_or, unit};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Straight-alpha color with every channel normalized to `0..=1`.
///
/// This is the only color representation used by the normalized model. Conversion to the
/// `0..=255` channel range happens at emission time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Build a color, coercing each channel into `0..=1` (non-finite channels become 0, alpha 1).
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self {
            r: unit(finite_or(Some(r), 0.0)),
            g: unit(finite_or(Some(g), 0.0)),
            b: unit(finite_or(Some(b), 0.0)),
            a: unit(finite_or(Some(a), 1.0)),
        }
    }

    /// Multiply alpha by a paint-level opacity.
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self {
            a: unit(self.a * unit(finite_or(Some(opacity), 1.0))),
            ..self
        }
    }

    pub fn to_rgba8(self) -> Rgba8 {
        fn to_u8(x: f64) -> u8 {
            (unit(x) * 255.0).round() as u8
        }

        Rgba8 {
            r: to_u8(self.r),
            g: to_u8(self.g),
            b: to_u8(self.b),
            a: to_u8(self.a),
        }
    }
}

/// Straight (non-premultiplied) RGBA8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Four-sided spacing in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
