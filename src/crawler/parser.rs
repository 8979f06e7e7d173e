//! HTML extraction for crawled pages
//!
//! This module pulls three things out of a page body:
//! - Outbound links (from `<a href>`)
//! - Static assets (images, scripts, stylesheets and other media)
//! - Basic SEO signals (title, meta description, h1)
//!
//! `scraper::Html` is not `Send`, so every function here parses, extracts
//! owned data and drops the document before returning.

use crate::output::{AssetType, SeoData};
use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Elements that may reference an asset; `classify_asset` decides which do
const ASSET_CANDIDATES: &str = "img[src], script[src], link[href], source[src], video[src], audio[src]";

/// An asset reference found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub url: String,
    pub asset_type: AssetType,
}

/// Everything the crawler needs from one page body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    pub seo: SeoData,
    /// Absolute, fragment-free links in document order, duplicates removed
    pub links: Vec<String>,
    /// Assets in document order
    pub assets: Vec<AssetRef>,
}

/// Parses a page once and extracts SEO data, links and assets
///
/// # Example
///
/// ```
/// use pagewalk::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_page(html, &base_url);
/// assert_eq!(parsed.seo.title.as_deref(), Some("Test"));
/// assert_eq!(parsed.links, vec!["https://example.com/page".to_string()]);
/// ```
pub fn parse_page(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        seo: seo_from(&document),
        links: links_from(&document, base_url),
        assets: assets_from(&document, base_url),
    }
}

/// Extracts outbound links
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    links_from(&Html::parse_document(html), base_url)
}

/// Extracts asset references
pub fn extract_assets(html: &str, base_url: &Url) -> Vec<AssetRef> {
    assets_from(&Html::parse_document(html), base_url)
}

/// Extracts SEO signals
pub fn extract_seo(html: &str) -> SeoData {
    seo_from(&Html::parse_document(html))
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            tracing::error!("Invalid selector {}: {:?}", css, e);
            None
        }
    }
}

fn links_from(document: &Html, base_url: &Url) -> Vec<String> {
    let Some(anchors) = selector("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    document
        .select(&anchors)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .map(|url| url.to_string())
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

/// Classifies an element as an asset and returns the attribute holding its URL
fn classify_asset(element: &ElementRef<'_>) -> Option<(AssetType, &'static str)> {
    let value = element.value();
    match value.name() {
        "img" => Some((AssetType::Image, "src")),
        "script" => Some((AssetType::Script, "src")),
        "source" | "video" | "audio" => Some((AssetType::Other, "src")),
        "link" => {
            let rel = value.attr("rel")?.to_ascii_lowercase();
            let rels: Vec<&str> = rel.split_ascii_whitespace().collect();
            if rels.contains(&"stylesheet") {
                Some((AssetType::Stylesheet, "href"))
            } else if rels.iter().any(|r| *r == "icon" || *r == "preload") {
                Some((AssetType::Other, "href"))
            } else {
                None
            }
        }
        _ => None,
    }
}

fn assets_from(document: &Html, base_url: &Url) -> Vec<AssetRef> {
    let Some(candidates) = selector(ASSET_CANDIDATES) else {
        return Vec::new();
    };

    document
        .select(&candidates)
        .filter_map(|element| {
            let (asset_type, attr) = classify_asset(&element)?;
            let url = resolve_link(element.value().attr(attr)?, base_url)?;
            Some(AssetRef {
                url: url.to_string(),
                asset_type,
            })
        })
        .collect()
}

fn seo_from(document: &Html) -> SeoData {
    let mut seo = SeoData::default();

    if let Some(title) = selector("title").and_then(|s| document.select(&s).next()) {
        seo.has_title = true;
        seo.title = Some(collapse_whitespace(&title.text().collect::<String>()));
    }

    let description = selector("meta[name]").and_then(|s| {
        document.select(&s).find(|meta| {
            meta.value()
                .attr("name")
                .map(|name| name.eq_ignore_ascii_case("description"))
                .unwrap_or(false)
        })
    });
    if let Some(meta) = description {
        seo.has_description = true;
        seo.description = Some(meta.value().attr("content").unwrap_or("").to_string());
    }

    seo.has_h1 = selector("h1")
        .map(|s| document.select(&s).next().is_some())
        .unwrap_or(false);

    seo
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
