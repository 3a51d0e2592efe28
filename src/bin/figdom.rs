use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use figdom::assets::{AssetSource, ImageFillEntry};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "figdom", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a design document into index.html, styles.css and an asset directory.
    Convert(ConvertArgs),
    /// Print the normalization and classification summary as JSON without writing files.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct PolicyArgs {
    /// Options JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Keep text nodes with complex strokes or effects as live text.
    #[arg(long)]
    keep_text: bool,

    /// Treat every non-solid fill as needing a rendered image.
    #[arg(long)]
    solid_only: bool,

    /// Classify vector shapes as markup instead of rendering them.
    #[arg(long)]
    no_rasterize_vectors: bool,

    /// Convert only the subtree rooted at this node id.
    #[arg(long)]
    node: Option<String>,

    /// Class name prefix.
    #[arg(long)]
    prefix: Option<String>,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Directory of pre-rendered node images (and `images/` fill sources).
    #[arg(long)]
    rendered_dir: Option<PathBuf>,

    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Input document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    #[command(flatten)]
    policy: PolicyArgs,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "figdom=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_document(path: &Path) -> anyhow::Result<figdom::RawDocument> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read document '{}'", path.display()))?;
    let doc = figdom::RawDocument::from_json_str(&s)
        .with_context(|| format!("parse document '{}'", path.display()))?;
    Ok(doc)
}

fn load_opts(policy: &PolicyArgs) -> anyhow::Result<figdom::ConvertOpts> {
    let mut opts = match &policy.config {
        Some(path) => {
            let s = std::fs::read_to_string(path)
                .with_context(|| format!("read options '{}'", path.display()))?;
            figdom::ConvertOpts::from_json_str(&s)?
        }
        None => figdom::ConvertOpts::default(),
    };

    if policy.keep_text {
        opts.classifier.text = figdom::TextPolicy::KeepText;
    }
    if policy.solid_only {
        opts.classifier.fills = figdom::FillPolicy::SolidOnly;
    }
    if policy.no_rasterize_vectors {
        opts.classifier.rasterize_vectors = false;
    }
    if let Some(node) = &policy.node {
        opts.root_node = Some(node.clone());
    }
    if let Some(prefix) = &policy.prefix {
        opts.class_prefix = prefix.clone();
    }
    opts.validate()?;
    Ok(opts)
}

#[derive(Serialize)]
struct AssetSummary<'a> {
    node_id: &'a str,
    file: &'a str,
    placeholder: bool,
}

#[derive(Serialize)]
struct Manifest<'a> {
    last_modified: Option<&'a str>,
    stats: figdom::NormalizeStats,
    strategy_counts: figdom::StrategyCounts,
    warnings: &'a [String],
    assets: Vec<AssetSummary<'a>>,
    image_fills: Vec<&'a str>,
    tree: &'a figdom::ClassifiedNode,
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn copy_file(from: &Path, to: &Path) -> anyhow::Result<()> {
    if let Some(parent) = to.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::copy(from, to)
        .with_context(|| format!("copy '{}' to '{}'", from.display(), to.display()))?;
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let doc = read_document(&args.in_path)?;
    let opts = load_opts(&args.policy)?;
    let converter = figdom::Converter::new(opts);

    let out = match &args.rendered_dir {
        Some(dir) => converter.convert(&doc, &mut figdom::LocalAssetDir::new(dir))?,
        None => converter.convert(&doc, &mut figdom::NoExport)?,
    };

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;
    write_file(&args.out.join("index.html"), out.document.as_bytes())?;
    let stylesheet_path = args.out.join(&converter.opts().stylesheet_href);
    write_file(&stylesheet_path, out.stylesheet.as_bytes())?;

    let asset_root = args.out.join(&converter.opts().asset_dir);
    for entry in &out.assets.entries {
        let dest = asset_root.join(&entry.file_name);
        match &entry.source {
            AssetSource::Exported(path) => copy_file(path, &dest)?,
            AssetSource::Placeholder(bytes) => write_file(&dest, bytes)?,
        }
    }
    for ImageFillEntry {
        file_name, source, ..
    } in &out.assets.image_fills
    {
        copy_file(source, &asset_root.join(file_name))?;
    }

    let manifest = Manifest {
        last_modified: out.last_modified.as_deref(),
        stats: out.stats,
        strategy_counts: out.strategy_counts,
        warnings: &out.warnings,
        assets: out
            .assets
            .entries
            .iter()
            .map(|e| AssetSummary {
                node_id: &e.node_id,
                file: &e.file_name,
                placeholder: matches!(e.source, AssetSource::Placeholder(_)),
            })
            .collect(),
        image_fills: out
            .assets
            .image_fills
            .iter()
            .map(|e| e.file_name.as_str())
            .collect(),
        tree: &out.tree,
    };
    let json = serde_json::to_vec_pretty(&manifest).context("serialize manifest")?;
    write_file(&args.out.join("manifest.json"), &json)?;

    for w in &out.warnings {
        eprintln!("warning: {w}");
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

#[derive(Serialize)]
struct Inspection<'a> {
    stats: figdom::NormalizeStats,
    strategy_counts: figdom::StrategyCounts,
    warnings: &'a [String],
    fallback_ids: &'a [String],
    image_refs: &'a [String],
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let doc = read_document(&args.in_path)?;
    let opts = load_opts(&args.policy)?;
    let prepared = figdom::Converter::new(opts).prepare(&doc)?;

    let report = Inspection {
        stats: prepared.stats,
        strategy_counts: figdom::StrategyCounts::of(&prepared.tree),
        warnings: &prepared.warnings,
        fallback_ids: &prepared.fallback_ids,
        image_refs: &prepared.image_refs,
    };
    let json = serde_json::to_string_pretty(&report).context("serialize inspection")?;
    println!("{json}");
    Ok(())
}
