//! Markdown corpus resolution for mdsite.
//!
//! Pages reference each other and a fixed set of link shortcuts through
//! `{{name}}` placeholders:
//!
//! - `{{site}}`: a link shortcut from the [`LinkTable`]
//! - `{{doc/guide/README.md}}`: the text of another page
//! - `{{appendix}}`: the configuration files of the documented module
//!
//! [`Resolver::resolve`] expands all of them across the corpus.
//!
//! # Example
//!
//! ```
//! use mdsite_corpus::{LinkTable, substitute};
//!
//! let links: LinkTable = [("site".to_owned(), "/".to_owned())].into_iter().collect();
//! assert_eq!(substitute("Back to {{site}}", &links), "Back to /");
//! ```

mod appendix;
mod error;
mod page;
mod resolver;
mod rewrite;
mod source;
mod variables;

pub use appendix::AppendixInjector;
pub use error::CorpusError;
pub use page::PagePath;
pub use resolver::{APPENDIX_TOKEN, ResolvedCorpus, Resolver};
pub use rewrite::{PageRewrite, PageRewrites};
pub use source::{UrlRewrite, read_source, strip_front_matter};
pub use variables::{LinkTable, TOC_VARIABLE, VariableTable, Variables, substitute};
