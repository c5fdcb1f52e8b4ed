//! Regex-based HTML processing.
//!
//! Turns raw page HTML into the narrow facts the search needs: the page's
//! visible text, its title, and every anchor together with the text of its
//! enclosing paragraph or block. Enclosure is computed by byte-offset
//! containment over the tag-stripped document, which is enough for link
//! context; this is not a general DOM.

use regex::Regex;
use url::Url;

use crate::types::LinkContext;
use crate::urls;

/// Extract the page title, if any.
pub fn page_title(html: &str) -> Option<String> {
    let title_pattern = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap();
    title_pattern
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| clean_text(m.as_str()))
        .filter(|t| !t.is_empty())
}

/// Extract the visible text of a page.
///
/// Removes scripts and styles, strips all tags, decodes common entities
/// and collapses whitespace to single spaces.
pub fn visible_text(html: &str) -> String {
    clean_text(&strip_hidden(html))
}

/// Extract every outbound anchor with its local context, in document order.
///
/// Skips in-page anchors (`#…`), `javascript:`, `mailto:` and `tel:`
/// pseudo-links. Targets are resolved against `base` and normalized; hrefs
/// the URL parser rejects are dropped. The enclosing paragraph is the first
/// `<p>` span containing the anchor, falling back to the smallest
/// `<section>`, `<article>` or `<div>` span, else empty.
pub fn extract_links(base: &Url, html: &str) -> Vec<LinkContext> {
    let doc = strip_hidden(html);

    let anchor_pattern =
        Regex::new(r#"(?is)<a\b[^>]*?href\s*=\s*["']([^"']*)["'][^>]*>(.*?)</a>"#).unwrap();

    let paragraphs = spans(&doc, r"(?is)<p\b[^>]*>.*?</p>");
    let mut blocks = Vec::new();
    for pattern in [
        r"(?is)<section\b[^>]*>.*?</section>",
        r"(?is)<article\b[^>]*>.*?</article>",
        r"(?is)<div\b[^>]*>.*?</div>",
    ] {
        blocks.extend(spans(&doc, pattern));
    }

    let mut links = Vec::new();
    for cap in anchor_pattern.captures_iter(&doc) {
        let href = cap.get(1).map_or("", |m| m.as_str()).trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
        {
            continue;
        }

        let Some(target) = urls::resolve(base, href) else {
            continue;
        };

        let whole = cap.get(0).unwrap();
        let text = clean_text(cap.get(2).map_or("", |m| m.as_str()));
        let paragraph = enclosing_text(&doc, whole.start(), whole.end(), &paragraphs, &blocks);

        links.push(LinkContext::new(target, text).with_paragraph(paragraph));
    }

    links
}

/// Remove script and style elements so their contents never count as text.
fn strip_hidden(html: &str) -> String {
    let script_pattern = Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap();
    let style_pattern = Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap();
    let without_scripts = script_pattern.replace_all(html, " ");
    style_pattern.replace_all(&without_scripts, " ").into_owned()
}

/// Strip tags, decode common entities and collapse whitespace.
fn clean_text(fragment: &str) -> String {
    let tag_pattern = Regex::new(r"<[^>]+>").unwrap();
    let text = tag_pattern.replace_all(fragment, " ");

    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let space_pattern = Regex::new(r"\s+").unwrap();
    space_pattern.replace_all(text.trim(), " ").into_owned()
}

/// Byte spans of every match of `pattern` in `doc`.
fn spans(doc: &str, pattern: &str) -> Vec<(usize, usize)> {
    Regex::new(pattern)
        .unwrap()
        .find_iter(doc)
        .map(|m| (m.start(), m.end()))
        .collect()
}

/// Text of the span enclosing `[start, end)`: first paragraph hit wins,
/// else the smallest containing block.
fn enclosing_text(
    doc: &str,
    start: usize,
    end: usize,
    paragraphs: &[(usize, usize)],
    blocks: &[(usize, usize)],
) -> String {
    if let Some(&(s, e)) = paragraphs.iter().find(|&&(s, e)| s <= start && end <= e) {
        return clean_text(&doc[s..e]);
    }

    blocks
        .iter()
        .filter(|&&(s, e)| s <= start && end <= e)
        .min_by_key(|&&(s, e)| e - s)
        .map(|&(s, e)| clean_text(&doc[s..e]))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_visible_text_strips_markup() {
        let html = r#"
            <html><head><style>p { color: red; }</style>
            <script>var x = "<a href='/fake'>no</a>";</script></head>
            <body><h1>Title</h1><p>Hello &amp; welcome.</p></body></html>
        "#;
        let text = visible_text(html);
        assert_eq!(text, "Title Hello & welcome.");
        assert!(!text.contains("color"));
    }

    #[test]
    fn test_page_title() {
        assert_eq!(
            page_title("<head><title> My  Site </title></head>"),
            Some("My Site".to_string())
        );
        assert_eq!(page_title("<body>no title</body>"), None);
    }

    #[test]
    fn test_extract_links_resolves_and_filters() {
        let html = r##"
            <a href="/about">About us</a>
            <a href="https://example.com/contact/">Contact</a>
            <a href="#top">Top</a>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:x@example.com">Mail</a>
        "##;
        let links = extract_links(&base(), html);

        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url.as_str(), "https://example.com/about");
        assert_eq!(links[0].text, "About us");
        // Trailing slash normalized away
        assert_eq!(links[1].url.as_str(), "https://example.com/contact");
    }

    #[test]
    fn test_enclosing_paragraph() {
        let html = r#"
            <p>Read the <a href="/news">latest news</a> here.</p>
            <div>Sidebar with <a href="/other">other</a> link.</div>
            <a href="/bare">bare</a>
        "#;
        let links = extract_links(&base(), html);

        assert_eq!(links.len(), 3);
        assert_eq!(links[0].paragraph, "Read the latest news here.");
        assert_eq!(links[1].paragraph, "Sidebar with other link.");
        assert_eq!(links[2].paragraph, "");
    }

    #[test]
    fn test_paragraph_wins_over_block() {
        let html = r#"<div>Outer <p>Inner <a href="/x">x</a></p> tail</div>"#;
        let links = extract_links(&base(), html);
        assert_eq!(links[0].paragraph, "Inner x");
    }
}
