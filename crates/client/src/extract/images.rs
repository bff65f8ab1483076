//! Image source normalization.
//!
//! Problem pages embed images with origin-relative paths. Records and render
//! fragments carry absolute URLs instead.

use regex::Regex;
use sdamgia_core::{origin_str, subject::BASE_DOMAIN};
use std::sync::LazyLock;
use url::Url;

static IMG_SRC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(<img\b[^>]*?\bsrc=")([^"]*)(")"#).expect("invalid regex"));

/// Make an image `src` absolute against the subject origin.
///
/// Sources that already point at the site domain or parse as absolute URLs
/// are returned unchanged.
pub fn normalize_image_src(src: &str, origin: &Url) -> String {
    if src.contains(BASE_DOMAIN) || Url::parse(src).is_ok() {
        return src.to_string();
    }

    match origin.join(src) {
        Ok(url) => url.to_string(),
        Err(_) => format!("{}{}", origin_str(origin), src),
    }
}

/// Rewrite every `<img src="...">` in serialized HTML with
/// [`normalize_image_src`].
pub fn rewrite_image_sources(html: &str, origin: &Url) -> String {
    IMG_SRC
        .replace_all(html, |caps: &regex::Captures<'_>| {
            format!("{}{}{}", &caps[1], normalize_image_src(&caps[2], origin), &caps[3])
        })
        .into_owned()
}
