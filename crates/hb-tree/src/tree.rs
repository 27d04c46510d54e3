//! Documentation tree and page model.
//!
//! Pages are stored in a flat `Vec<Page>` with a name index, giving O(1)
//! lookups by name and insertion-order traversal. Subpage relationships are
//! expressed by name so a page can be built before its children exist.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use crate::symbol::Symbol;

/// A resolved link: URL path plus display title.
///
/// URL paths use `/` separators on every platform and are relative to the
/// owning page's output subfolder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Link {
    /// Path component of the link (e.g. `"page.html"`, `"page.html#anchor"`).
    pub url_path: String,
    /// Display title of the link target.
    pub title: String,
}

impl Link {
    /// Create a new link.
    #[must_use]
    pub fn new(url_path: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url_path: url_path.into(),
            title: title.into(),
        }
    }
}

/// Per-page HTML output attributes.
///
/// Extensions may register additional assets here during the page-formatting
/// hook, before the page is serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputAttrs {
    /// Stylesheet references to include in the rendered page.
    pub stylesheets: BTreeSet<String>,
}

/// A page of the documentation tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Tree-unique name used to resolve subpage references.
    pub name: String,
    /// Identity key of the originating source file; unique per page.
    pub source_file: PathBuf,
    /// Page title, if one was extracted.
    pub title: Option<String>,
    /// Languages this page is rendered for; the first entry is primary.
    pub languages: Vec<String>,
    /// Identifier of the extension that owns this page.
    pub extension: String,
    /// True for pages that start an index subtree.
    pub is_root: bool,
    /// Ordered names of child pages.
    pub subpages: Vec<String>,
    /// Symbols documented on this page, in page order.
    pub symbols: Vec<Symbol>,
    /// Resolved link to this page's output file.
    pub link: Link,
    /// HTML output attributes, mutable until the page is serialized.
    pub output_attrs: OutputAttrs,
}

impl Page {
    /// Create a page with the given name, source file and owning extension.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        source_file: impl Into<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source_file: source_file.into(),
            title: None,
            languages: Vec::new(),
            extension: extension.into(),
            is_root: false,
            subpages: Vec::new(),
            symbols: Vec::new(),
            link: Link::default(),
            output_attrs: OutputAttrs::default(),
        }
    }

    /// Set the page title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the resolved output link.
    #[must_use]
    pub fn with_link(mut self, link: Link) -> Self {
        self.link = link;
        self
    }

    /// Set the language list; the first entry is the primary language.
    #[must_use]
    pub fn with_languages(mut self, languages: Vec<String>) -> Self {
        self.languages = languages;
        self
    }

    /// Set the ordered subpage names.
    #[must_use]
    pub fn with_subpages(mut self, subpages: Vec<String>) -> Self {
        self.subpages = subpages;
        self
    }

    /// Set the symbol list.
    #[must_use]
    pub fn with_symbols(mut self, symbols: Vec<Symbol>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Mark this page as an index root.
    #[must_use]
    pub fn as_root(mut self) -> Self {
        self.is_root = true;
        self
    }
}

/// The rendered documentation tree.
#[derive(Debug, Default)]
pub struct DocTree {
    pages: Vec<Page>,
    name_index: HashMap<String, usize>,
}

impl DocTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page to the tree.
    ///
    /// A page with the same name replaces the existing entry in place,
    /// keeping its position in traversal order.
    pub fn add_page(&mut self, page: Page) {
        if let Some(&index) = self.name_index.get(&page.name) {
            self.pages[index] = page;
        } else {
            self.name_index.insert(page.name.clone(), self.pages.len());
            self.pages.push(page);
        }
    }

    /// Resolve a page by name.
    #[must_use]
    pub fn page(&self, name: &str) -> Option<&Page> {
        self.name_index.get(name).map(|&i| &self.pages[i])
    }

    /// Resolve a page by name, mutably.
    pub fn page_mut(&mut self, name: &str) -> Option<&mut Page> {
        let index = *self.name_index.get(name)?;
        Some(&mut self.pages[index])
    }

    /// Iterate over all pages in insertion order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }

    /// Iterate over index-root pages in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter().filter(|page| page.is_root)
    }

    /// Number of pages in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// True if the tree has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
