use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::foundation::error::{FigdomError, FigdomResult};
use crate::foundation::naming::asset_file_name;

/// Boundary to whatever renders image-fallback nodes and stores image-fill sources.
///
/// Called once per conversion, between the pure stages. Ids or references the exporter cannot
/// produce are simply absent from the returned maps.
pub trait AssetExporter {
    /// Rendered bitmap per node id.
    fn export_nodes(&mut self, ids: &[String]) -> FigdomResult<BTreeMap<String, PathBuf>>;

    /// Source file per image-fill reference.
    fn resolve_image_fills(&mut self, refs: &[String]) -> FigdomResult<BTreeMap<String, PathBuf>> {
        let _ = refs;
        Ok(BTreeMap::new())
    }
}

/// Everything the exporter returned.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResolvedAssets {
    /// Node id → rendered file.
    pub exported: BTreeMap<String, PathBuf>,
    /// Image-fill reference → source file.
    pub image_fills: BTreeMap<String, PathBuf>,
}

impl ResolvedAssets {
    /// Ask `exporter` for the given ids and references.
    pub fn collect(
        exporter: &mut dyn AssetExporter,
        ids: &[String],
        refs: &[String],
    ) -> FigdomResult<Self> {
        let exported = if ids.is_empty() {
            BTreeMap::new()
        } else {
            exporter.export_nodes(ids)?
        };
        let image_fills = if refs.is_empty() {
            BTreeMap::new()
        } else {
            exporter.resolve_image_fills(refs)?
        };
        Ok(Self {
            exported,
            image_fills,
        })
    }
}

/// Exporter that has nothing; every fallback gets a placeholder.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExport;

impl AssetExporter for NoExport {
    fn export_nodes(&mut self, _ids: &[String]) -> FigdomResult<BTreeMap<String, PathBuf>> {
        Ok(BTreeMap::new())
    }
}

/// Directory of files produced earlier by an external renderer.
///
/// Node renders are looked up as `dir/<asset file name>`, image-fill sources as
/// `dir/images/<imageRef>.<ext>`. Empty files count as missing.
#[derive(Clone, Debug)]
pub struct LocalAssetDir {
    dir: PathBuf,
}

impl LocalAssetDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// A missing directory holds nothing; a path that exists but is not a directory is an error.
    fn check_dir(&self) -> FigdomResult<()> {
        match std::fs::metadata(&self.dir) {
            Ok(m) if !m.is_dir() => Err(FigdomError::asset(format!(
                "rendered asset path '{}' is not a directory",
                self.dir.display()
            ))),
            _ => Ok(()),
        }
    }
}

fn non_empty_file(path: &Path) -> bool {
    std::fs::metadata(path).is_ok_and(|m| m.is_file() && m.len() > 0)
}

impl AssetExporter for LocalAssetDir {
    #[tracing::instrument(skip_all, fields(dir = %self.dir.display(), count = ids.len()))]
    fn export_nodes(&mut self, ids: &[String]) -> FigdomResult<BTreeMap<String, PathBuf>> {
        self.check_dir()?;
        let mut out = BTreeMap::new();
        for id in ids {
            let path = self.dir.join(asset_file_name(id));
            if non_empty_file(&path) {
                out.insert(id.clone(), path);
            }
        }
        tracing::debug!(found = out.len(), "looked up rendered assets");
        Ok(out)
    }

    #[tracing::instrument(skip_all, fields(dir = %self.dir.display(), count = refs.len()))]
    fn resolve_image_fills(&mut self, refs: &[String]) -> FigdomResult<BTreeMap<String, PathBuf>> {
        self.check_dir()?;
        let images = self.dir.join("images");
        let Ok(rd) = std::fs::read_dir(&images) else {
            return Ok(BTreeMap::new());
        };

        // Lowest path wins when one reference exists under several extensions.
        let mut by_stem: BTreeMap<String, PathBuf> = BTreeMap::new();
        for entry in rd {
            let entry =
                entry.with_context(|| format!("list image fills in '{}'", images.display()))?;
            let path = entry.path();
            if !non_empty_file(&path) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let stem = stem.to_owned();
            match by_stem.get(&stem) {
                Some(existing) if *existing <= path => {}
                _ => {
                    by_stem.insert(stem, path);
                }
            }
        }

        Ok(refs
            .iter()
            .filter_map(|r| by_stem.get(r).map(|p| (r.clone(), p.clone())))
            .collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/export.rs"]
mod tests;
