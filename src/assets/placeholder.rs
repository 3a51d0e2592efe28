use std::{collections::BTreeMap, io::Cursor, path::PathBuf};

use anyhow::Context;

use crate::assets::export::ResolvedAssets;
use crate::foundation::error::FigdomResult;
use crate::foundation::naming::{asset_file_name, image_fill_file_name};

/// Edge length of the placeholder bitmap.
pub const PLACEHOLDER_SIZE: u32 = 8;
const PLACEHOLDER_RGBA: [u8; 4] = [0xd9, 0xd9, 0xd9, 0xff];

/// Sub-directory of the asset directory holding copied image-fill sources.
pub const IMAGE_FILL_DIR: &str = "images";

/// Encode the light-grey placeholder PNG.
pub fn placeholder_png() -> FigdomResult<Vec<u8>> {
    let img = image::RgbaImage::from_pixel(
        PLACEHOLDER_SIZE,
        PLACEHOLDER_SIZE,
        image::Rgba(PLACEHOLDER_RGBA),
    );
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode placeholder png")?;
    Ok(buf)
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where the bytes of an asset come from.
pub enum AssetSource {
    /// File produced by the exporter.
    Exported(PathBuf),
    /// Generated stand-in for a missing export.
    Placeholder(Vec<u8>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One image-fallback asset.
pub struct AssetEntry {
    /// Node the asset renders.
    pub node_id: String,
    /// File name inside the asset directory; the markup references exactly this name.
    pub file_name: String,
    /// Content source.
    pub source: AssetSource,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One copied image-fill source.
pub struct ImageFillEntry {
    /// `imageRef` of the fill.
    pub image_ref: String,
    /// Path inside the asset directory.
    pub file_name: String,
    /// File to copy.
    pub source: PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Files a conversion needs next to its markup.
pub struct AssetPlan {
    /// Image-fallback assets, sorted by node id.
    pub entries: Vec<AssetEntry>,
    /// Resolved image fills, sorted by reference.
    pub image_fills: Vec<ImageFillEntry>,
    /// Missing exports and unresolved image fills.
    pub warnings: Vec<String>,
}

impl AssetPlan {
    /// `imageRef` → URL relative to the markup.
    pub fn image_urls(&self, asset_dir: &str) -> BTreeMap<String, String> {
        let dir = asset_dir.trim_end_matches('/');
        self.image_fills
            .iter()
            .map(|e| {
                let url = if dir.is_empty() {
                    e.file_name.clone()
                } else {
                    format!("{dir}/{}", e.file_name)
                };
                (e.image_ref.clone(), url)
            })
            .collect()
    }

    pub fn placeholder_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.source, AssetSource::Placeholder(_)))
            .count()
    }
}

/// Pair every fallback id with exported content or a placeholder, and every image-fill reference
/// with its copied location.
#[tracing::instrument(skip_all, fields(ids = ids.len(), refs = refs.len()))]
pub fn plan_assets(
    ids: &[String],
    refs: &[String],
    resolved: &ResolvedAssets,
) -> FigdomResult<AssetPlan> {
    let mut plan = AssetPlan::default();
    let mut placeholder: Option<Vec<u8>> = None;

    for id in ids {
        let source = match resolved.exported.get(id) {
            Some(path) => AssetSource::Exported(path.clone()),
            None => {
                plan.warnings
                    .push(format!("node {id}: no rendered asset, using placeholder"));
                let bytes = match &placeholder {
                    Some(bytes) => bytes.clone(),
                    None => {
                        let bytes = placeholder_png()?;
                        placeholder = Some(bytes.clone());
                        bytes
                    }
                };
                AssetSource::Placeholder(bytes)
            }
        };
        plan.entries.push(AssetEntry {
            node_id: id.clone(),
            file_name: asset_file_name(id),
            source,
        });
    }

    for image_ref in refs {
        let Some(path) = resolved.image_fills.get(image_ref) else {
            plan.warnings.push(format!(
                "image fill {image_ref}: source not resolved, layer omitted"
            ));
            continue;
        };
        let ext = path.extension().and_then(|e| e.to_str());
        plan.image_fills.push(ImageFillEntry {
            image_ref: image_ref.clone(),
            file_name: format!("{IMAGE_FILL_DIR}/{}", image_fill_file_name(image_ref, ext)),
            source: path.clone(),
        });
    }

    tracing::debug!(
        assets = plan.entries.len(),
        placeholders = plan.placeholder_count(),
        image_fills = plan.image_fills.len(),
        "planned assets"
    );
    Ok(plan)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/placeholder.rs"]
mod tests;
