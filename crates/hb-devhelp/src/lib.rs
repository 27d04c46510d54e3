//! Devhelp help-book index generation for HB.
//!
//! This crate is a formatting extension for the documentation host: it
//! observes pages as they are written, groups them by (extension, language),
//! and once the build finishes emits one `.devhelp2` index per pair under
//! `<output>/devhelp/`, alongside a help-browser-ready copy of the rendered
//! HTML.
//!
//! # Quick start
//!
//! ```ignore
//! use hb_config::Config;
//! use hb_devhelp::setup;
//! use hb_tree::HookRegistry;
//!
//! let config = Config::load(&config_path, Some(&cli_settings))?;
//! let mut hooks = HookRegistry::new();
//! setup(&config, &output_dir, "html", &mut hooks)?;
//! // The host render loop dispatches page_formatting / page_written /
//! // build_finished through the registry.
//! ```

mod builder;
mod error;
mod fscopy;
mod index;
mod pages;

pub use builder::{CORE_EXTENSION, DEVHELP_STYLESHEET, DevhelpBuilder, DevhelpOptions, setup};
pub use error::DevhelpError;
pub use fscopy::recursive_overwrite;
pub use index::{Chapter, IndexDocument, Keyword};
pub use pages::{FormattedPage, FormattedSymbol, keyword_type};
