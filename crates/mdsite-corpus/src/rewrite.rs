//! Per-page literal replacements applied to resolved markdown.

use mdsite_config::PageRewriteConfig;

use crate::page::PagePath;

/// Replace the first occurrence of `find` in one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRewrite {
    pub page: PagePath,
    pub find: String,
    pub replace: String,
}

impl From<&PageRewriteConfig> for PageRewrite {
    fn from(config: &PageRewriteConfig) -> Self {
        Self {
            page: PagePath::new(config.page.as_str()),
            find: config.find.clone(),
            replace: config.replace.clone(),
        }
    }
}

/// Ordered page rewrites.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRewrites(Vec<PageRewrite>);

impl PageRewrites {
    #[must_use]
    pub fn new(rewrites: Vec<PageRewrite>) -> Self {
        Self(rewrites)
    }

    /// Apply the rewrites registered for `page`, in order.
    #[must_use]
    pub fn apply(&self, page: &PagePath, text: &str) -> String {
        let mut text = text.to_owned();
        for rewrite in self.0.iter().filter(|rewrite| &rewrite.page == page) {
            if text.contains(&rewrite.find) {
                text = text.replacen(&rewrite.find, &rewrite.replace, 1);
            } else {
                tracing::debug!(page = %page, find = %rewrite.find, "Page rewrite did not match");
            }
        }
        text
    }
}

impl<'a> FromIterator<&'a PageRewriteConfig> for PageRewrites {
    fn from_iter<T: IntoIterator<Item = &'a PageRewriteConfig>>(iter: T) -> Self {
        Self(iter.into_iter().map(PageRewrite::from).collect())
    }
}
