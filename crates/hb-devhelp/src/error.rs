//! Error types for devhelp index generation.

use std::path::PathBuf;

/// Error raised while building devhelp indexes.
///
/// Apart from `Io`, every variant is an integration error: it means the
/// collector was not wired to the render pass it is indexing, and the build
/// must fail.
#[derive(Debug, thiserror::Error)]
pub enum DevhelpError {
    /// A page was written outside the configured output root.
    #[error("page output {} is not under the output root {}", .path.display(), .root.display())]
    PageOutsideOutput {
        /// The page's output path as reported by the host.
        path: PathBuf,
        /// The configured output root.
        root: PathBuf,
    },

    /// A subpage reference did not resolve in the documentation tree.
    #[error("unknown page in documentation tree: {0}")]
    UnknownPage(String),

    /// A page reachable from an index root was never collected.
    #[error("no formatted page recorded for {}", .0.display())]
    MissingProjection(PathBuf),

    /// The index root page was never collected for this bucket.
    #[error("no formatted page recorded for index root {page} (bucket {bucket})")]
    MissingRoot {
        /// Name of the root page.
        page: String,
        /// The (extension, language) bucket key.
        bucket: String,
    },

    /// The rendered HTML output directory does not exist.
    #[error("rendered HTML output not found at {}", .0.display())]
    MissingHtmlOutput(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
