//! Page and link-context value objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// The local context of one outbound link on a page.
///
/// This is everything a relevance scorer is allowed to look at for a
/// candidate besides the page body itself: the anchor's own visible text,
/// its resolved target, and the text of the enclosing paragraph or block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkContext {
    /// Resolved and normalized target address
    pub url: Url,

    /// Visible text of the anchor element
    pub text: String,

    /// Text of the first enclosing paragraph, falling back to the nearest
    /// enclosing sectioning container; empty when neither exists
    pub paragraph: String,
}

impl LinkContext {
    /// Create a link context with empty surrounding text.
    pub fn new(url: Url, text: impl Into<String>) -> Self {
        Self {
            url,
            text: text.into(),
            paragraph: String::new(),
        }
    }

    /// Set the enclosing paragraph/block text.
    pub fn with_paragraph(mut self, paragraph: impl Into<String>) -> Self {
        self.paragraph = paragraph.into();
        self
    }
}

/// A fetched page: visible text plus outbound link contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Final address after redirects
    pub url: Url,

    /// Visible text of the page
    pub text: String,

    /// Page title if available
    pub title: Option<String>,

    /// Outbound links with their local context, in document order
    pub links: Vec<LinkContext>,

    /// When the page was fetched
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    /// Create a new page with no links.
    pub fn new(url: Url, text: impl Into<String>) -> Self {
        Self {
            url,
            text: text.into(),
            title: None,
            links: Vec::new(),
            fetched_at: Utc::now(),
        }
    }

    /// Set the page title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add an outbound link.
    pub fn with_link(mut self, link: LinkContext) -> Self {
        self.links.push(link);
        self
    }

    /// Add several outbound links.
    pub fn with_links(mut self, links: impl IntoIterator<Item = LinkContext>) -> Self {
        self.links.extend(links);
        self
    }

    /// Set the fetched timestamp.
    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = fetched_at;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_builder() {
        let url = Url::parse("https://example.com/").unwrap();
        let link = LinkContext::new(Url::parse("https://example.com/a").unwrap(), "About")
            .with_paragraph("Learn more about us");

        let page = Page::new(url, "Welcome")
            .with_title("Home")
            .with_link(link);

        assert_eq!(page.title.as_deref(), Some("Home"));
        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].text, "About");
        assert_eq!(page.links[0].paragraph, "Learn more about us");
    }
}
