//! `{{name}}` placeholders and the tables they resolve against.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Placeholder token. Names are link identifiers or root-relative page paths,
/// which may hold any character except braces and line breaks.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([^{}\n]+)\}\}").expect("placeholder pattern is valid")
});

/// Reserved page variable that always resolves to an empty string.
pub const TOC_VARIABLE: &str = "toc.md";

/// Link shortcuts available to every page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable(BTreeMap<String, String>);

impl LinkTable {
    #[must_use]
    pub fn new(links: BTreeMap<String, String>) -> Self {
        Self(links)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for LinkTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Lookup used by [`substitute`].
pub trait Variables {
    fn lookup(&self, name: &str) -> Option<&str>;
}

impl Variables for LinkTable {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

/// Link shortcuts plus the pass-1 text of every page.
#[derive(Debug, Clone, Default)]
pub struct VariableTable(HashMap<String, String>);

impl VariableTable {
    /// Table holding `links` and the empty [`TOC_VARIABLE`].
    #[must_use]
    pub fn with_links(links: &LinkTable) -> Self {
        let mut vars: HashMap<String, String> = links
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        vars.insert(TOC_VARIABLE.to_owned(), String::new());
        Self(vars)
    }

    /// Insert or replace a variable.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Variables for VariableTable {
    fn lookup(&self, name: &str) -> Option<&str> {
        self.get(name)
    }
}

/// Replace every `{{name}}` whose name is in `vars` with its value.
///
/// A single left-to-right scan: inserted text is never scanned again, so a
/// transcluded page's own placeholders stay as they were in its value.
/// Unknown placeholders are left as-is.
pub fn substitute<'t>(text: &'t str, vars: &impl Variables) -> Cow<'t, str> {
    PLACEHOLDER.replace_all(text, |caps: &Captures<'_>| match vars.lookup(&caps[1]) {
        Some(value) => value.to_owned(),
        None => caps[0].to_owned(),
    })
}
