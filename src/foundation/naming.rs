//! Stable derived names.
//!
//! Every class name and asset file name is a pure function of the node identifier, so repeated
//! runs against the same tree reuse cached assets and the placeholder written for a missing
//! export lands on the address the markup already references.

use xxhash_rust::xxh3::xxh3_64_with_seed;

const NAME_SEED: u64 = 0x5f1d_09c3_a2e4_7b61;
const MAX_SAFE_LEN: usize = 48;

/// Extension of every rendered fallback asset.
pub const ASSET_EXTENSION: &str = "png";

/// Replace every character outside `[A-Za-z0-9]` with `_` and cap the length.
pub fn safe_id(id: &str) -> String {
    let mut out: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(MAX_SAFE_LEN)
        .collect();
    if out.is_empty() {
        out.push('_');
    }
    out
}

/// Short hex digest of the raw id. Two ids that sanitize identically still get distinct names.
pub fn id_digest(id: &str) -> String {
    let h = xxh3_64_with_seed(id.as_bytes(), NAME_SEED);
    format!("{:08x}", h as u32)
}

/// Stylesheet class for a node.
pub fn class_name(prefix: &str, id: &str) -> String {
    format!("{prefix}{}-{}", safe_id(id), id_digest(id))
}

/// Class for the `index`-th styled run inside a text node.
pub fn run_class_name(prefix: &str, id: &str, index: usize) -> String {
    format!("{}-r{index}", class_name(prefix, id))
}

/// File name of the rendered asset backing an image-fallback node.
pub fn asset_file_name(id: &str) -> String {
    format!("{}-{}.{ASSET_EXTENSION}", safe_id(id), id_digest(id))
}

/// File name of a copied image-fill source; keeps a sane source extension.
pub fn image_fill_file_name(image_ref: &str, extension: Option<&str>) -> String {
    let ext = extension
        .map(str::to_ascii_lowercase)
        .filter(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| ASSET_EXTENSION.to_owned());
    format!("{}-{}.{ext}", safe_id(image_ref), id_digest(image_ref))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/naming.rs"]
mod tests;
