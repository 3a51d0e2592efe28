//! Normalized intermediate representation.
//!
//! Built once per conversion by [`crate::normalize`]; never mutated afterwards. A node's
//! `children` order is the paint and DOM order.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Color, Edges, Point};

/// Renderable node category after kind mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Container,
    Text,
    Vector,
    Image,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub layout: LayoutModel,
    pub style: StyleModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
    pub children: Vec<NormalizedNode>,
}

/// Flow axis of a container, or `None` when children are explicitly positioned.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    #[default]
    None,
    Row,
    Column,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowDirection {
    Row,
    Column,
}

impl From<FlowDirection> for FlowMode {
    fn from(value: FlowDirection) -> Self {
        match value {
            FlowDirection::Row => FlowMode::Row,
            FlowDirection::Column => FlowMode::Column,
        }
    }
}

/// Main-axis distribution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Justify {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
}

/// Cross-axis alignment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    #[default]
    Start,
    Center,
    End,
    Baseline,
    Stretch,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Px(f64),
    Auto,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum LayoutModel {
    /// The node lays out its own children along an axis.
    Flow {
        /// Parent-relative position; `None` when the parent's flow places this node.
        origin: Option<Point>,
        direction: FlowDirection,
        gap: f64,
        padding: Edges,
        align: Align,
        justify: Justify,
        width: f64,
        height: Dimension,
    },
    /// The node is spaced by its parent's flow; no coordinates.
    FlowItem { width: f64, height: f64 },
    /// Coordinates relative to the immediate parent's origin.
    Absolute {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl LayoutModel {
    pub fn flow_mode(&self) -> FlowMode {
        match self {
            Self::Flow { direction, .. } => (*direction).into(),
            Self::FlowItem { .. } | Self::Absolute { .. } => FlowMode::None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleModel {
    pub fills: Vec<Fill>,
    pub strokes: Vec<Stroke>,
    pub effects: Vec<Effect>,
    pub corner_radius: Option<CornerRadius>,
    pub typography: Option<Typography>,
    /// Always within `0..=1`.
    pub opacity: f64,
    pub blend_mode: Option<String>,
    pub is_mask: bool,
}

impl Default for StyleModel {
    fn default() -> Self {
        Self {
            fills: Vec::new(),
            strokes: Vec::new(),
            effects: Vec::new(),
            corner_radius: None,
            typography: None,
            opacity: 1.0,
            blend_mode: None,
            is_mask: false,
        }
    }
}

impl StyleModel {
    pub fn has_gradient(&self) -> bool {
        self.fills.iter().any(Fill::is_gradient)
    }

    /// First solid fill, with its paint opacity folded into alpha.
    pub fn first_solid_color(&self) -> Option<Color> {
        self.fills.iter().find_map(|f| match f {
            Fill::Solid { color, opacity } => Some(color.with_opacity(*opacity)),
            _ => None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position in `0..=1`.
    pub position: f64,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    Fill,
    Fit,
    Tile,
    Crop,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Fill {
    Solid {
        color: Color,
        opacity: f64,
    },
    LinearGradient {
        /// Stylesheet convention: 0° up, clockwise.
        angle_deg: f64,
        stops: Vec<ColorStop>,
    },
    RadialGradient {
        stops: Vec<ColorStop>,
    },
    ConicGradient {
        angle_deg: f64,
        stops: Vec<ColorStop>,
    },
    /// Representable, but has no stylesheet equivalent.
    DiamondGradient {
        stops: Vec<ColorStop>,
    },
    Image {
        image_ref: Option<String>,
        scale_mode: ScaleMode,
    },
}

impl Fill {
    pub fn is_gradient(&self) -> bool {
        matches!(
            self,
            Self::LinearGradient { .. }
                | Self::RadialGradient { .. }
                | Self::ConicGradient { .. }
                | Self::DiamondGradient { .. }
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeAlign {
    #[default]
    Center,
    Inside,
    Outside,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StrokePaint {
    Solid { color: Color },
    Gradient { stops: Vec<ColorStop> },
}

impl StrokePaint {
    /// Representative color; a gradient stroke uses its first stop.
    pub fn color(&self) -> Color {
        match self {
            Self::Solid { color } => *color,
            Self::Gradient { stops } => stops.first().map(|s| s.color).unwrap_or(Color::BLACK),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub align: StrokeAlign,
    pub width: f64,
    pub paint: StrokePaint,
    pub dashes: Vec<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: Color,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Effect {
    DropShadow(Shadow),
    InnerShadow(Shadow),
    LayerBlur { radius: f64 },
    BackgroundBlur { radius: f64 },
}

impl Effect {
    pub fn is_shadow(&self) -> bool {
        matches!(self, Self::DropShadow(_) | Self::InnerShadow(_))
    }

    pub fn is_blur(&self) -> bool {
        matches!(self, Self::LayerBlur { .. } | Self::BackgroundBlur { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CornerRadius {
    Uniform(f64),
    /// `[top-left, top-right, bottom-right, bottom-left]`.
    PerCorner([f64; 4]),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineHeight {
    #[default]
    Auto,
    Px(f64),
    Percent(f64),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
    SmallCaps,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub family: Option<String>,
    pub weight: Option<f64>,
    pub size: Option<f64>,
    pub italic: bool,
    pub line_height: LineHeight,
    pub letter_spacing: f64,
    pub case: TextCase,
    pub decoration: TextDecoration,
    pub align: TextAlign,
}

/// Fields of a styled run that differ from the node's base typography.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TypographyOverride {
    pub family: Option<String>,
    pub weight: Option<f64>,
    pub size: Option<f64>,
    pub italic: Option<bool>,
    pub line_height: Option<LineHeight>,
    pub letter_spacing: Option<f64>,
    pub case: Option<TextCase>,
    pub decoration: Option<TextDecoration>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub overrides: TypographyOverride,
    pub color: Option<Color>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub characters: String,
    /// Empty when the text carries no per-character styling.
    pub runs: Vec<TextRun>,
}

/// Aggregate counts collected during normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// Nodes visited, including unrenderable ones before they were dropped.
    pub nodes_total: usize,
    pub containers: usize,
    pub texts: usize,
    pub vectors: usize,
    pub images: usize,
    pub with_gradient: usize,
    pub with_mask: usize,
    /// Unrenderable nodes dropped with their subtree.
    pub dropped: usize,
    /// Hidden or non-visual nodes skipped before mapping.
    pub skipped: usize,
}

impl NormalizeStats {
    pub(crate) fn count_kind(&mut self, kind: NodeKind) {
        match kind {
            NodeKind::Container => self.containers += 1,
            NodeKind::Text => self.texts += 1,
            NodeKind::Vector => self.vectors += 1,
            NodeKind::Image => self.images += 1,
        }
    }

    pub(crate) fn merge(&mut self, other: &Self) {
        self.nodes_total += other.nodes_total;
        self.containers += other.containers;
        self.texts += other.texts;
        self.vectors += other.vectors;
        self.images += other.images;
        self.with_gradient += other.with_gradient;
        self.with_mask += other.with_mask;
        self.dropped += other.dropped;
        self.skipped += other.skipped;
    }
}
