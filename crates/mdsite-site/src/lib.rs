//! Static site assembly for mdsite.
//!
//! [`SiteBuilder`] turns a markdown tree into an HTML site:
//!
//! ```text
//! md/index.md            ->  out/index.html          (template "index")
//! md/doc/README.md       ->  out/doc/index.html      (template "doc/index")
//! md/doc/jdbc/README.md  ->  out/doc/jdbc/index.html (template "doc/jdbc/index",
//!                                                     falling back to "doc/mod")
//! resources/**           ->  out/resources/**
//! ```
//!
//! Pages that are neither `index.md` nor a nested `README.md` are only
//! available for transclusion.

mod assets;
mod builder;
mod error;
mod layout;
mod scanner;

pub use assets::copy_assets;
pub use builder::{BuildReport, SiteBuilder};
pub use error::SiteError;
pub use layout::{is_page_of_interest, is_root_index, output_path, template_name};
pub use scanner::Scanner;
