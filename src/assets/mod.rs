//! Asset exporter boundary and output asset planning.

pub mod export;
pub mod placeholder;

pub use export::{AssetExporter, LocalAssetDir, NoExport, ResolvedAssets};
pub use placeholder::{
    AssetEntry, AssetPlan, AssetSource, IMAGE_FILL_DIR, ImageFillEntry, PLACEHOLDER_SIZE,
    placeholder_png, plan_assets,
};
