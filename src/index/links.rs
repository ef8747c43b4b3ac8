//! Anchor scanning and source archive link selection.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::archive::ArchiveKind;

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Matches `href` attributes of anchor tags (double, single or unquoted values).
///
/// `href` must be its own attribute, so `data-href` and the like never match.
static ANCHOR_HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r#"(?is)<a\s(?:[^>]*?\s)?href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
    )
});

/// Matches markup whose contents are never rendered as links: comments and
/// raw-text elements.
static NON_LINK_MARKUP_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_static_regex(
        r"(?is)<!--.*?(?:-->|\z)|<script\b.*?(?:</script\s*>|\z)|<style\b.*?(?:</style\s*>|\z)|<template\b.*?(?:</template\s*>|\z)",
    )
});

/// At most one remembered URL per archive kind.
///
/// Later matches of a kind overwrite earlier ones, so the guarantee is only
/// "some link with this extension", not the first or the most relevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateLinks {
    links: BTreeMap<ArchiveKind, String>,
}

impl CandidateLinks {
    /// Creates an empty candidate set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `url` and remembers it if it ends in a known extension.
    ///
    /// Returns the kind the URL was filed under.
    pub fn offer(&mut self, url: &str) -> Option<ArchiveKind> {
        let kind = ArchiveKind::from_name(url)?;
        self.links.insert(kind, url.to_string());
        Some(kind)
    }

    /// Returns the remembered URL for `kind`.
    #[must_use]
    pub fn get(&self, kind: ArchiveKind) -> Option<&str> {
        self.links.get(&kind).map(String::as_str)
    }

    /// Picks the link to download: tarball first, then zip.
    #[must_use]
    pub fn select(&self) -> Option<(ArchiveKind, &str)> {
        self.links
            .iter()
            .next()
            .map(|(kind, url)| (*kind, url.as_str()))
    }

    /// Returns true if no archive link was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

/// Scans every anchor `href` in `html` and collects archive candidates.
///
/// Relative links are resolved against `page_url`. Fragments are dropped
/// before the extension check.
#[must_use]
pub fn scan_links(html: &str, page_url: &str) -> CandidateLinks {
    let base = Url::parse(page_url).ok();
    let mut candidates = CandidateLinks::new();
    let visible = NON_LINK_MARKUP_RE.replace_all(html, " ");

    for caps in ANCHOR_HREF_RE.captures_iter(&visible) {
        let Some(raw) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };
        let href = decode_entities(raw.as_str().trim());
        let href = href.split('#').next().unwrap_or_default();
        if href.is_empty() {
            continue;
        }
        let Some(resolved) = absolutize_url(href, base.as_ref()) else {
            debug!(href, "skipping unresolvable link");
            continue;
        };
        if let Some(kind) = candidates.offer(&resolved) {
            debug!(%kind, url = %resolved, "archive link found");
        }
    }

    candidates
}

/// Resolves a possibly relative URL string against a base URL.
///
/// Returns the value as-is if it already starts with `http://` or `https://`;
/// normalizes `//...` to `https:...`; otherwise joins with `base_url`.
fn absolutize_url(value: &str, base_url: Option<&Url>) -> Option<String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    if value.starts_with("//") {
        return Some(format!("https:{value}"));
    }
    base_url?.join(value).ok().map(|url| url.to_string())
}

/// Decodes the entities that show up in index hrefs. `&amp;` goes last so
/// its output is never decoded a second time.
fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#38;", "&")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://pypi.org/project/examplepkg/#files";

    #[test]
    fn test_scan_links_finds_tarball() {
        let html = r#"<a href="https://example.com/examplepkg-1.0.0.tar.gz">examplepkg-1.0.0.tar.gz</a>"#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.select(),
            Some((
                ArchiveKind::Tarball,
                "https://example.com/examplepkg-1.0.0.tar.gz"
            ))
        );
        assert_eq!(links.get(ArchiveKind::Zip), None);
    }

    #[test]
    fn test_select_prefers_tarball_over_zip_regardless_of_order() {
        let html = r#"
            <a href="https://files.example/pkg-1.0.zip">zip</a>
            <a href="https://files.example/pkg-1.0.tar.gz">tar</a>
            <a href="https://files.example/pkg-0.9.zip">older zip</a>
        "#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.select(),
            Some((ArchiveKind::Tarball, "https://files.example/pkg-1.0.tar.gz"))
        );
    }

    #[test]
    fn test_later_match_of_same_kind_overwrites_earlier() {
        let html = r#"
            <a href="https://files.example/pkg-1.0.tar.gz">first</a>
            <a href="https://files.example/pkg-0.1.tar.gz">second</a>
        "#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.get(ArchiveKind::Tarball),
            Some("https://files.example/pkg-0.1.tar.gz")
        );
    }

    #[test]
    fn test_zip_selected_when_no_tarball() {
        let html = r#"<a class="x" href='https://files.example/numpy-1.15.4.zip'>zip</a>"#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.select(),
            Some((ArchiveKind::Zip, "https://files.example/numpy-1.15.4.zip"))
        );
    }

    #[test]
    fn test_no_archive_links_is_empty() {
        let html = r#"
            <a href="https://files.example/pkg-1.0-py3-none-any.whl">wheel</a>
            <a href="/help/">help</a>
            <a name="files">no href</a>
        "#;
        let links = scan_links(html, PAGE);
        assert!(links.is_empty());
        assert_eq!(links.select(), None);
    }

    #[test]
    fn test_relative_links_resolve_against_page() {
        let html = r#"<a href="../../packages/pkg-2.0.tar.gz#sha256=abc">pkg</a>"#;
        let links = scan_links(html, "https://mirror.example/simple/pkg/");
        assert_eq!(
            links.get(ArchiveKind::Tarball),
            Some("https://mirror.example/packages/pkg-2.0.tar.gz")
        );
    }

    #[test]
    fn test_protocol_relative_links_get_https() {
        let html = r#"<A HREF=//files.example/pkg-2.0.zip>pkg</A>"#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.get(ArchiveKind::Zip),
            Some("https://files.example/pkg-2.0.zip")
        );
    }

    #[test]
    fn test_entities_in_href_are_decoded() {
        let html = r#"<a href="https://files.example/get?a=1&amp;f=pkg-1.0.tar.gz">x</a>"#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.get(ArchiveKind::Tarball),
            Some("https://files.example/get?a=1&f=pkg-1.0.tar.gz")
        );
    }

    #[test]
    fn test_escaped_entity_is_decoded_once() {
        assert_eq!(decode_entities("a=&amp;quot;b"), "a=&quot;b");
        assert_eq!(decode_entities("x&amp;amp;y"), "x&amp;y");
        assert_eq!(decode_entities("&quot;q&quot;&amp;"), "\"q\"&");
    }

    #[test]
    fn test_commented_out_links_are_ignored() {
        let html = r#"
            <a href="https://f.example/pkg-1.0.tar.gz">pkg-1.0.tar.gz</a>
            <!-- <a href="https://f.example/pkg-0.0.1-broken.tar.gz">old</a> -->
        "#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.select(),
            Some((ArchiveKind::Tarball, "https://f.example/pkg-1.0.tar.gz"))
        );
    }

    #[test]
    fn test_script_style_and_template_bodies_are_ignored() {
        let html = r#"
            <a href="https://f.example/pkg-1.0.zip">zip</a>
            <script>document.write('<a href="https://f.example/evil-1.0.tar.gz">x</a>');</script>
            <style>a[href="https://f.example/style-1.0.tar.gz"] { color: red; }</style>
            <template><a href="https://f.example/tmpl-1.0.tar.gz">t</a></template>
        "#;
        let links = scan_links(html, PAGE);
        assert_eq!(links.get(ArchiveKind::Tarball), None);
        assert_eq!(
            links.select(),
            Some((ArchiveKind::Zip, "https://f.example/pkg-1.0.zip"))
        );
    }

    #[test]
    fn test_data_href_attribute_is_not_the_link() {
        let html = r#"
            <a data-href="https://f.example/decoy-9.9.tar.gz" href="https://f.example/pkg-1.0.tar.gz">a</a>
            <a data-href="https://f.example/other-1.0.zip">no real href</a>
        "#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.get(ArchiveKind::Tarball),
            Some("https://f.example/pkg-1.0.tar.gz")
        );
        assert_eq!(links.get(ArchiveKind::Zip), None);
    }

    #[test]
    fn test_unterminated_comment_hides_the_rest_of_the_page() {
        let html = r#"
            <a href="https://f.example/pkg-1.0.zip">zip</a>
            <!-- <a href="https://f.example/pkg-1.0.tar.gz">
        "#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.select(),
            Some((ArchiveKind::Zip, "https://f.example/pkg-1.0.zip"))
        );
    }

    #[test]
    fn test_link_text_is_not_used_for_ranking() {
        let html = r#"
            <a href="https://files.example/pkg-1.0.tar.gz">Download</a>
            <a href="https://files.example/pkg-docs.tar.gz">docs</a>
        "#;
        let links = scan_links(html, PAGE);
        assert_eq!(
            links.get(ArchiveKind::Tarball),
            Some("https://files.example/pkg-docs.tar.gz")
        );
    }
}
