//! Serde boundary model of the raw design-document tree.
//!
//! Every field is optional and numeric fields are parsed leniently: a value of the wrong shape
//! is read as absent instead of failing the whole document, and the mapper then applies its
//! fallback. Field extraction beyond this point happens only in [`crate::normalize`].

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};
use serde_json::Value;

use crate::foundation::error::{FigdomError, FigdomResult};

/// A fetched design file: the raw tree plus the collaborator's cache token.
#[derive(Clone, Debug, Serialize)]
pub struct RawDocument {
    /// Display name of the file.
    pub name: Option<String>,
    /// Last-modified token used by the fetch layer for cache invalidation.
    #[serde(rename = "lastModified")]
    pub last_modified: Option<String>,
    /// Root of the node tree.
    pub document: RawNode,
}

impl<'de> Deserialize<'de> for RawDocument {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Value::Object(mut map) = Value::deserialize(deserializer)? else {
            return Err(D::Error::custom("document must be a JSON object"));
        };

        match map.remove("document") {
            Some(document) => Ok(Self {
                name: take_string(&mut map, "name"),
                last_modified: take_string(&mut map, "lastModified"),
                document: node_from_value(document).map_err(D::Error::custom)?,
            }),
            None => {
                let document = node_from_value(Value::Object(map)).map_err(D::Error::custom)?;
                Ok(Self {
                    name: document.name.clone(),
                    last_modified: None,
                    document,
                })
            }
        }
    }
}

fn take_string(map: &mut serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

/// Node trees nest two JSON levels per node, so every deserializer that walks one grows the stack
/// on demand instead of relying on a recursion limit.
fn node_from_value(value: Value) -> Result<RawNode, serde_json::Error> {
    RawNode::deserialize(serde_stacker::Deserializer::new(value))
}

impl RawDocument {
    /// Parse a document from JSON text.
    ///
    /// Nesting depth is not limited here; the normalize pass drops nodes deeper than
    /// [`crate::normalize::MAX_DEPTH`] with a warning.
    pub fn from_json_str(s: &str) -> FigdomResult<Self> {
        let parse_err = |e: serde_json::Error| FigdomError::serde(format!("parse document: {e}"));
        let mut de = serde_json::Deserializer::from_str(s);
        de.disable_recursion_limit();
        let doc = Self::deserialize(serde_stacker::Deserializer::new(&mut de)).map_err(parse_err)?;
        de.end().map_err(parse_err)?;
        Ok(doc)
    }

    /// Wrap a single node as a document.
    pub fn from_node(document: RawNode) -> Self {
        Self {
            name: document.name.clone(),
            last_modified: None,
            document,
        }
    }

    /// Re-root the document at the node with the given id.
    pub fn subtree(&self, id: &str) -> FigdomResult<Self> {
        let node = self
            .document
            .find(id)
            .ok_or_else(|| FigdomError::validation(format!("node '{id}' not found in document")))?;
        Ok(Self {
            name: self.name.clone(),
            last_modified: self.last_modified.clone(),
            document: node.clone(),
        })
    }
}

/// One raw node. Unknown keys are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub visible: Option<bool>,
    pub children: Option<Vec<RawNode>>,
    pub absolute_bounding_box: Option<RawBox>,

    pub layout_mode: Option<String>,
    pub layout_positioning: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub padding_left: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub padding_right: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub padding_top: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub padding_bottom: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub item_spacing: Option<f64>,
    pub primary_axis_align_items: Option<String>,
    pub counter_axis_align_items: Option<String>,

    pub fills: Option<Vec<RawPaint>>,
    pub strokes: Option<Vec<RawPaint>>,
    #[serde(deserialize_with = "lenient_f64")]
    pub stroke_weight: Option<f64>,
    pub stroke_align: Option<String>,
    #[serde(alias = "dashPattern", deserialize_with = "lenient_f64_list")]
    pub stroke_dashes: Option<Vec<f64>>,
    pub effects: Option<Vec<RawEffect>>,
    #[serde(deserialize_with = "lenient_f64")]
    pub opacity: Option<f64>,
    pub blend_mode: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub is_mask: Option<bool>,
    #[serde(deserialize_with = "lenient_f64")]
    pub corner_radius: Option<f64>,
    #[serde(deserialize_with = "lenient_f64_list")]
    pub rectangle_corner_radii: Option<Vec<f64>>,

    pub style: Option<RawTypeStyle>,
    pub characters: Option<String>,
    pub character_style_overrides: Option<Vec<u32>>,
    pub style_override_table: Option<BTreeMap<String, RawTypeStyle>>,
}

impl RawNode {
    /// Depth-first, pre-order search by id.
    pub fn find(&self, id: &str) -> Option<&RawNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children
            .iter()
            .flatten()
            .find_map(|child| child.find(id))
    }
}

/// Absolute bounding box in document coordinates.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawBox {
    #[serde(deserialize_with = "lenient_f64")]
    pub x: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub y: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub width: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub height: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawColor {
    #[serde(deserialize_with = "lenient_f64")]
    pub r: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub g: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub b: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub a: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVector {
    #[serde(deserialize_with = "lenient_f64")]
    pub x: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub y: Option<f64>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawColorStop {
    #[serde(deserialize_with = "lenient_f64")]
    pub position: Option<f64>,
    pub color: Option<RawColor>,
}

/// Fill or stroke paint.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPaint {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub visible: Option<bool>,
    #[serde(deserialize_with = "lenient_f64")]
    pub opacity: Option<f64>,
    pub color: Option<RawColor>,
    /// 2×3 matrix `[[a, c, e], [b, d, f]]`.
    #[serde(deserialize_with = "lenient_matrix")]
    pub gradient_transform: Option<Vec<Vec<f64>>>,
    pub gradient_handle_positions: Option<Vec<RawVector>>,
    pub gradient_stops: Option<Vec<RawColorStop>>,
    pub scale_mode: Option<String>,
    pub image_ref: Option<String>,
    pub blend_mode: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEffect {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    pub visible: Option<bool>,
    pub color: Option<RawColor>,
    pub offset: Option<RawVector>,
    #[serde(deserialize_with = "lenient_f64")]
    pub radius: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub spread: Option<f64>,
}

/// Text style record; also used for per-run override entries.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawTypeStyle {
    pub font_family: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub font_weight: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub font_size: Option<f64>,
    #[serde(deserialize_with = "lenient_bool")]
    pub italic: Option<bool>,
    #[serde(deserialize_with = "lenient_f64")]
    pub line_height_px: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub line_height_percent_font_size: Option<f64>,
    pub line_height_unit: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub letter_spacing: Option<f64>,
    pub text_case: Option<String>,
    pub text_decoration: Option<String>,
    pub text_align_horizontal: Option<String>,
    pub fills: Option<Vec<RawPaint>>,
}

fn value_as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().and_then(value_as_f64))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// Non-numeric entries keep their slot as 0 so per-corner positions stay aligned.
fn lenient_f64_list<'de, D>(deserializer: D) -> Result<Option<Vec<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(match v {
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|x| value_as_f64(x).unwrap_or(0.0))
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_matrix<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<f64>>>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(rows)) = v else {
        return Ok(None);
    };
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let Value::Array(cols) = row else {
            return Ok(None);
        };
        out.push(cols.iter().map(|x| value_as_f64(x).unwrap_or(0.0)).collect());
    }
    Ok(Some(out))
}

#[cfg(test)]
#[path = "../../tests/unit/document/raw.rs"]
mod tests;
