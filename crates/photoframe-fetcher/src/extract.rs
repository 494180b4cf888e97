//! Original-size image extraction from cooked topic HTML.

use std::collections::HashSet;

use scraper::{Html, Selector};

use crate::types::RemoteImage;

/// Path substring identifying original-size uploads among thumbnails,
/// avatars and emoji.
const ORIGINAL_PATH: &str = "/default/original/";

/// Collect original-size image URLs from `html`, deduplicated by hash.
///
/// Lightboxed uploads link through `<a href>`, inline ones embed via
/// `<img src>`; both are walked. Protocol-relative URLs are normalised to
/// https, and anything whose basename is not a 40-hex content hash is
/// skipped.
pub fn original_images(html: &str) -> Vec<RemoteImage> {
    let Ok(selector) = Selector::parse("a[href], img[src]") else {
        return Vec::new();
    };

    let document = Html::parse_fragment(html);
    let mut seen = HashSet::new();
    let mut images = Vec::new();

    for element in document.select(&selector) {
        let Some(url) = element
            .value()
            .attr("href")
            .or_else(|| element.value().attr("src"))
        else {
            continue;
        };
        if !url.contains(ORIGINAL_PATH) {
            continue;
        }
        let url = if let Some(rest) = url.strip_prefix("//") {
            format!("https://{rest}")
        } else {
            url.to_string()
        };
        let Some(hash) = upload_hash(&url) else {
            continue;
        };
        if seen.insert(hash.clone()) {
            images.push(RemoteImage { url, hash });
        }
    }
    images
}

/// Extract the 40-hex content hash from an upload URL basename
/// (`…/default/original/3X/a/b/<sha1>.<ext>`).
fn upload_hash(url: &str) -> Option<String> {
    let basename = url.rsplit('/').next()?;
    let stem = basename.split('.').next()?;
    if stem.len() == 40 && stem.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(stem.to_ascii_lowercase())
    } else {
        None
    }
}
