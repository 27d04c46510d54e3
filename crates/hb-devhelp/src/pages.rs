//! Formatted-page projections collected during rendering.
//!
//! A [`FormattedPage`] is a read-only snapshot of a page taken at the moment
//! the host writes it, holding exactly what index emission needs: the page's
//! identity, its output path relative to the HTML root, a display title, and
//! one [`FormattedSymbol`] per non-skipped symbol.

use std::path::PathBuf;

use hb_tree::{Page, Symbol, SymbolKind};

/// Placeholder title for pages without one.
pub(crate) const MISSING_TITLE: &str = "missing-title";

/// Snapshot of one searchable symbol entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedSymbol {
    /// Keyword category tag; `None` for kinds without one.
    pub keyword_type: Option<&'static str>,
    /// Anchor path relative to the rendered HTML root.
    pub url_ref: String,
    /// Display name shown in the help browser's search pane.
    pub display_name: String,
}

impl FormattedSymbol {
    fn new(symbol: &Symbol, subfolder: &str) -> Self {
        Self {
            keyword_type: keyword_type(symbol.kind),
            url_ref: join_url(subfolder, &symbol.link.url_path),
            display_name: symbol.link.title.clone(),
        }
    }
}

/// Read-only snapshot of a rendered page, taken at page-write time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormattedPage {
    /// Identity key of the originating page.
    pub source_file: PathBuf,
    /// Page path relative to the rendered HTML root.
    pub full_ref: String,
    /// Display title; falls back to a fixed placeholder.
    pub title: String,
    /// Non-skipped symbols, in page order.
    pub symbols: Vec<FormattedSymbol>,
}

impl FormattedPage {
    /// Take a snapshot of `page`, written under `subfolder`.
    ///
    /// Symbols flagged as skipped are dropped here; symbols of untagged
    /// kinds are kept and dropped only at keyword emission.
    pub(crate) fn new(page: &Page, subfolder: &str) -> Self {
        let symbols = page
            .symbols
            .iter()
            .filter(|symbol| !symbol.skip)
            .map(|symbol| FormattedSymbol::new(symbol, subfolder))
            .collect();

        Self {
            source_file: page.source_file.clone(),
            full_ref: join_url(subfolder, &page.link.url_path),
            title: page
                .title
                .clone()
                .unwrap_or_else(|| MISSING_TITLE.to_owned()),
            symbols,
        }
    }
}

/// Keyword category tag for a symbol kind.
///
/// Kinds without a devhelp keyword category return `None`; their symbols
/// stay on the page but are dropped from the flat keyword list.
#[must_use]
pub fn keyword_type(kind: SymbolKind) -> Option<&'static str> {
    match kind {
        SymbolKind::Function | SymbolKind::Callback => Some("function"),
        SymbolKind::Struct => Some("struct"),
        SymbolKind::Enum => Some("enum"),
        SymbolKind::Property => Some("property"),
        SymbolKind::Signal => Some("signal"),
        SymbolKind::Constant | SymbolKind::FunctionMacro => Some("macro"),
        SymbolKind::Class | SymbolKind::Interface | SymbolKind::Alias | SymbolKind::VFunction => {
            None
        }
    }
}

/// Join two URL path fragments with `/`, tolerating empty fragments.
pub(crate) fn join_url(base: &str, rel: &str) -> String {
    if base.is_empty() {
        rel.to_owned()
    } else if rel.is_empty() {
        base.to_owned()
    } else {
        format!("{base}/{rel}")
    }
}
