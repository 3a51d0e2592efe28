use serde::{Deserialize, Serialize};

use crate::{
    assets::{AssetExporter, AssetPlan, ResolvedAssets, plan_assets},
    classify::{
        ClassifiedNode, ClassifierPolicy, StrategyCounts, classify_tree, fallback_ids, image_refs,
    },
    document::{model::NormalizeStats, raw::RawDocument},
    emit::{MarkupContext, StylesheetContext, emit_markup, emit_stylesheet, render_document},
    foundation::error::{FigdomError, FigdomResult},
    normalize::{SourceInfo, normalize},
};

/// Conversion options.
///
/// Every field has a default, so a partial JSON object is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOpts {
    /// Classification policy.
    pub classifier: ClassifierPolicy,
    /// Prefix of every generated class name.
    pub class_prefix: String,
    /// Asset directory, relative to the markup.
    pub asset_dir: String,
    /// Generic family appended after each declared font family.
    pub fallback_font_family: String,
    /// Stylesheet address linked from the HTML document.
    pub stylesheet_href: String,
    /// Document title; defaults to the design file name.
    pub title: Option<String>,
    /// Convert only the subtree rooted at this node id.
    pub root_node: Option<String>,
}

impl Default for ConvertOpts {
    fn default() -> Self {
        Self {
            classifier: ClassifierPolicy::default(),
            class_prefix: "fd-".to_owned(),
            asset_dir: "assets".to_owned(),
            fallback_font_family: "sans-serif".to_owned(),
            stylesheet_href: "styles.css".to_owned(),
            title: None,
            root_node: None,
        }
    }
}

impl ConvertOpts {
    /// Parse options from JSON; absent fields keep their defaults.
    pub fn from_json_str(s: &str) -> FigdomResult<Self> {
        let opts: Self = serde_json::from_str(s)
            .map_err(|e| FigdomError::serde(format!("parse convert options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn validate(&self) -> FigdomResult<()> {
        let mut chars = self.class_prefix.chars();
        let starts_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '-');
        if !starts_ok || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            return Err(FigdomError::validation(format!(
                "class prefix '{}' is not a valid class name start",
                self.class_prefix
            )));
        }

        let dir = self.asset_dir.replace('\\', "/");
        if dir.starts_with('/') || dir.split('/').any(|part| part == "..") {
            return Err(FigdomError::validation(
                "asset directory must be relative and must not contain '..'",
            ));
        }

        if self.fallback_font_family.trim().is_empty() {
            return Err(FigdomError::validation(
                "fallback font family must be non-empty",
            ));
        }
        Ok(())
    }
}

/// Normalized and classified tree waiting for its assets.
#[derive(Clone, Debug)]
pub struct PreparedConversion {
    /// Classified conversion root.
    pub tree: ClassifiedNode,
    /// Normalization warnings.
    pub warnings: Vec<String>,
    /// Normalization counts.
    pub stats: NormalizeStats,
    /// Provenance of the raw document.
    pub source: SourceInfo,
    /// Ids the exporter must render.
    pub fallback_ids: Vec<String>,
    /// Image-fill references the exporter must resolve.
    pub image_refs: Vec<String>,
}

/// Everything one conversion produces.
#[derive(Clone, Debug)]
pub struct ConversionOutput {
    /// Element tree of the conversion root.
    pub markup: String,
    /// Standalone HTML document around `markup`.
    pub document: String,
    /// Stylesheet text.
    pub stylesheet: String,
    /// Files to place in the asset directory.
    pub assets: AssetPlan,
    /// Classified tree.
    pub tree: ClassifiedNode,
    /// All warnings in stage order.
    pub warnings: Vec<String>,
    /// Normalization counts.
    pub stats: NormalizeStats,
    /// Nodes per render strategy.
    pub strategy_counts: StrategyCounts,
    /// Cache token of the source document.
    pub last_modified: Option<String>,
}

/// Runs normalize → classify → (assets) → emit with fixed options.
#[derive(Clone, Debug, Default)]
pub struct Converter {
    opts: ConvertOpts,
}

impl Converter {
    pub fn new(opts: ConvertOpts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &ConvertOpts {
        &self.opts
    }

    /// Normalize and classify. Pure; the exporter is consulted afterwards.
    #[tracing::instrument(skip_all)]
    pub fn prepare(&self, doc: &RawDocument) -> FigdomResult<PreparedConversion> {
        self.opts.validate()?;
        let scoped;
        let doc = match &self.opts.root_node {
            Some(id) => {
                scoped = doc.subtree(id)?;
                &scoped
            }
            None => doc,
        };

        let normalized = normalize(doc)?;
        let tree = classify_tree(normalized.root, &self.opts.classifier);
        Ok(PreparedConversion {
            fallback_ids: fallback_ids(&tree),
            image_refs: image_refs(&tree),
            tree,
            warnings: normalized.warnings,
            stats: normalized.stats,
            source: normalized.source,
        })
    }

    /// Plan assets and emit markup and stylesheet.
    #[tracing::instrument(skip_all)]
    pub fn finish(
        &self,
        prepared: PreparedConversion,
        resolved: ResolvedAssets,
    ) -> FigdomResult<ConversionOutput> {
        let PreparedConversion {
            tree,
            mut warnings,
            stats,
            source,
            fallback_ids,
            image_refs,
        } = prepared;

        let assets = plan_assets(&fallback_ids, &image_refs, &resolved)?;
        warnings.extend(assets.warnings.iter().cloned());

        let image_urls = assets.image_urls(&self.opts.asset_dir);
        let stylesheet = emit_stylesheet(
            &tree,
            &StylesheetContext {
                class_prefix: &self.opts.class_prefix,
                fallback_font_family: &self.opts.fallback_font_family,
                image_urls: &image_urls,
            },
        );
        let markup = emit_markup(
            &tree,
            &MarkupContext {
                class_prefix: &self.opts.class_prefix,
                asset_dir: &self.opts.asset_dir,
            },
        );

        let title = self
            .opts
            .title
            .clone()
            .or_else(|| source.name.clone())
            .unwrap_or_else(|| tree.name.clone());
        let document = render_document(&title, &markup, &self.opts.stylesheet_href);

        Ok(ConversionOutput {
            markup,
            document,
            stylesheet,
            assets,
            strategy_counts: StrategyCounts::of(&tree),
            tree,
            warnings,
            stats,
            last_modified: source.last_modified,
        })
    }

    /// Full conversion with the exporter called between the pure stages.
    pub fn convert(
        &self,
        doc: &RawDocument,
        exporter: &mut dyn AssetExporter,
    ) -> FigdomResult<ConversionOutput> {
        let prepared = self.prepare(doc)?;
        let resolved =
            ResolvedAssets::collect(exporter, &prepared.fallback_ids, &prepared.image_refs)?;
        let out = self.finish(prepared, resolved)?;
        tracing::info!(
            nodes = out.stats.nodes_total,
            text = out.strategy_counts.text,
            markup = out.strategy_counts.markup,
            image_fallback = out.strategy_counts.image_fallback,
            placeholders = out.assets.placeholder_count(),
            warnings = out.warnings.len(),
            "converted document"
        );
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
