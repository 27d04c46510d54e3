//! The devhelp index builder.
//!
//! [`DevhelpBuilder`] listens to the host's formatting lifecycle: it
//! snapshots every written page into an (extension, language) bucket, and
//! when the build finishes it copies the rendered HTML into the help-book
//! directory and emits one index document per (root page, language) pair.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use hb_config::{Config, ConfigError};
use hb_tree::{DocTree, FormatListener, HookError, HookRegistry, Page};

use crate::error::DevhelpError;
use crate::fscopy::recursive_overwrite;
use crate::index::{Chapter, IndexDocument, Keyword};
use crate::pages::{FormattedPage, join_url};

/// Extension identifier whose name is omitted from output names.
pub const CORE_EXTENSION: &str = "core";

/// Stylesheet registered on every page and overwritten in the help-book copy.
pub const DEVHELP_STYLESHEET: &str = "devhelp.css";

/// The help browser shows its own contents pane; the site's navigation UI
/// is dead weight there.
const NAV_HIDE_RULE: &str = "[data-role=\"navigation\"] { display: none; }\n";

/// Host-side paths and project identity for the devhelp builder.
#[derive(Clone, Debug)]
pub struct DevhelpOptions {
    /// Project name; part of every output name and the HTML root link.
    pub project_name: String,
    /// Optional project version; part of the output name when set.
    pub project_version: Option<String>,
    /// Root output directory of the build.
    pub output_dir: PathBuf,
    /// Name of the formatter's HTML output folder under `output_dir`.
    pub html_folder: String,
}

/// Builds devhelp indexes from formatting lifecycle notifications.
pub struct DevhelpBuilder {
    options: DevhelpOptions,
    /// (extension, language) buckets of page snapshots, in write order.
    pages: HashMap<String, Vec<FormattedPage>>,
    /// Languages observed per extension.
    languages: BTreeMap<String, BTreeSet<String>>,
}

impl DevhelpBuilder {
    /// Create a builder with the given options.
    #[must_use]
    pub fn new(options: DevhelpOptions) -> Self {
        Self {
            options,
            pages: HashMap::new(),
            languages: BTreeMap::new(),
        }
    }

    /// Build from configuration, if the extension is active for this build.
    ///
    /// Returns `None` when the extension is deactivated or the build is
    /// incremental.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` when activated without a project
    /// name.
    pub fn from_config(
        config: &Config,
        output_dir: impl Into<PathBuf>,
        html_folder: impl Into<String>,
    ) -> Result<Option<Self>, ConfigError> {
        if !config.devhelp.activate {
            return Ok(None);
        }
        let project_name = config.require_project_name()?.to_owned();

        // TODO: update previously emitted indexes instead of skipping
        // incremental builds.
        if config.incremental {
            return Ok(None);
        }

        Ok(Some(Self::new(DevhelpOptions {
            project_name,
            project_version: config.project_version.clone(),
            output_dir: output_dir.into(),
            html_folder: html_folder.into(),
        })))
    }

    /// Record a snapshot of a page that the host just wrote to `path`.
    ///
    /// The page's primary language is the first entry of its language list
    /// (empty when it declares none); the snapshot is appended to the
    /// bucket for (extension, primary language).
    ///
    /// # Errors
    ///
    /// Returns `DevhelpError::PageOutsideOutput` if `path` is not under the
    /// configured output root.
    pub fn collect_page(&mut self, page: &Page, path: &Path) -> Result<(), DevhelpError> {
        let rel = path.strip_prefix(&self.options.output_dir).map_err(|_| {
            DevhelpError::PageOutsideOutput {
                path: path.to_path_buf(),
                root: self.options.output_dir.clone(),
            }
        })?;
        let subfolder = url_path(rel.parent().unwrap_or(Path::new("")));

        let language = page.languages.first().cloned().unwrap_or_default();
        self.languages
            .entry(page.extension.clone())
            .or_default()
            .insert(language.clone());

        let key = bucket_key(&page.extension, &language);
        tracing::debug!(page = %page.name, bucket = %key, "collected page snapshot");
        self.pages
            .entry(key)
            .or_default()
            .push(FormattedPage::new(page, &subfolder));
        Ok(())
    }

    /// Emit one index document for `page` in `language`.
    ///
    /// Writes `<output>/devhelp/<name>/<name>.devhelp2` and returns the
    /// written path. Distinct (extension, language, root) combinations map
    /// to distinct paths.
    ///
    /// # Errors
    ///
    /// Returns `DevhelpError::MissingRoot` if `page` was never collected
    /// for this bucket, the chapter assembly errors (`UnknownPage`,
    /// `MissingProjection`), or an I/O error from writing the file.
    pub fn emit_index(
        &self,
        tree: &DocTree,
        page: &Page,
        language: &str,
    ) -> Result<PathBuf, DevhelpError> {
        let key = bucket_key(&page.extension, language);
        let bucket = self.pages.get(&key).map(Vec::as_slice).unwrap_or_default();

        let name = self.output_name(page, language);
        let out_dir = self.options.output_dir.join("devhelp").join(&name);
        fs::create_dir_all(&out_dir)?;
        let out_path = out_dir.join(format!("{name}.devhelp2"));

        let html_root = format!("../{}-html", self.options.project_name);

        // One pass over the bucket: identity lookup for chapter assembly,
        // the root projection, and the flat keyword list.
        let mut lookup: HashMap<&Path, &FormattedPage> = HashMap::new();
        let mut root = None;
        let mut keywords = Vec::new();
        for fpage in bucket {
            lookup.insert(fpage.source_file.as_path(), fpage);
            if fpage.source_file == page.source_file {
                root = Some(fpage);
            }
            for symbol in &fpage.symbols {
                let Some(kind) = symbol.keyword_type else {
                    continue;
                };
                keywords.push(Keyword {
                    kind,
                    name: symbol.display_name.clone(),
                    link: join_url(&html_root, &symbol.url_ref),
                });
            }
        }
        let root = root.ok_or_else(|| DevhelpError::MissingRoot {
            page: page.name.clone(),
            bucket: key,
        })?;

        let mut chapters = Vec::new();
        build_chapters(tree, &mut chapters, page, &html_root, &lookup)?;

        let mut title = format!("{} {}", self.options.project_name, root.title);
        if !language.is_empty() {
            title.push_str(&format!(" ({language})"));
        }

        let document = IndexDocument {
            title,
            link: join_url(&html_root, &root.full_ref),
            name,
            language: language.to_owned(),
            chapters,
            keywords,
        };

        fs::write(&out_path, document.to_xml())?;
        tracing::info!(path = %out_path.display(), "wrote devhelp index");
        Ok(out_path)
    }

    /// Finish the build: copy the rendered HTML into the help-book
    /// directory, strip what the help browser does not use, and emit every
    /// index.
    ///
    /// # Errors
    ///
    /// Returns `DevhelpError::MissingHtmlOutput` if the host never rendered
    /// anything, or any error from the copy and index emission steps.
    pub fn finalize(&self, tree: &DocTree) -> Result<(), DevhelpError> {
        let html_src = self.options.output_dir.join(&self.options.html_folder);
        if !html_src.exists() {
            return Err(DevhelpError::MissingHtmlOutput(html_src));
        }

        let book_html = self
            .options
            .output_dir
            .join("devhelp")
            .join(format!("{}-html", self.options.project_name))
            .join(&self.options.html_folder);
        recursive_overwrite(&html_src, &book_html)?;

        let css_path = book_html
            .join("assets")
            .join("css")
            .join(DEVHELP_STYLESHEET);
        if let Some(parent) = css_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&css_path, NAV_HIDE_RULE)?;

        // The help browser never executes page scripts.
        let js_dir = book_html.join("assets").join("js");
        match fs::remove_dir_all(&js_dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        for page in tree.roots() {
            let Some(languages) = self.languages.get(&page.extension) else {
                continue;
            };
            for language in languages {
                self.emit_index(tree, page, language)?;
            }
        }
        Ok(())
    }

    /// Unique output name for (root page, language).
    ///
    /// The core extension and the empty language are omitted.
    fn output_name(&self, page: &Page, language: &str) -> String {
        let mut name = self.options.project_name.clone();
        if let Some(version) = &self.options.project_version {
            name.push('-');
            name.push_str(version);
        }
        if page.extension != CORE_EXTENSION {
            name.push('-');
            name.push_str(&page.extension);
        }
        if !language.is_empty() {
            name.push('-');
            name.push_str(language);
        }
        name
    }
}

impl FormatListener for DevhelpBuilder {
    fn page_formatting(&mut self, page: &mut Page) -> Result<(), HookError> {
        page.output_attrs
            .stylesheets
            .insert(DEVHELP_STYLESHEET.to_owned());
        Ok(())
    }

    fn page_written(&mut self, page: &Page, path: &Path) -> Result<(), HookError> {
        self.collect_page(page, path).map_err(HookError::new)
    }

    fn build_finished(&mut self, tree: &DocTree) -> Result<(), HookError> {
        self.finalize(tree).map_err(HookError::new)
    }
}

/// Register the devhelp builder with the host's hook registry.
///
/// Returns `true` when a listener was registered. Deactivated and
/// incremental builds register nothing.
///
/// # Errors
///
/// Returns `ConfigError::Validation` when activated without a project name.
pub fn setup(
    config: &Config,
    output_dir: &Path,
    html_folder: &str,
    hooks: &mut HookRegistry,
) -> Result<bool, ConfigError> {
    match DevhelpBuilder::from_config(config, output_dir, html_folder)? {
        Some(builder) => {
            hooks.register(Box::new(builder));
            Ok(true)
        }
        None => Ok(false),
    }
}

/// Populate `children` with chapter nodes for `page`'s subpages.
///
/// Subpages owned by a different extension are skipped without descending
/// into them. Child order follows subpage order, recursively.
///
/// # Errors
///
/// Returns `DevhelpError::UnknownPage` for an unresolvable subpage name and
/// `DevhelpError::MissingProjection` when a reachable subpage was never
/// collected into `lookup`.
fn build_chapters(
    tree: &DocTree,
    children: &mut Vec<Chapter>,
    page: &Page,
    html_root: &str,
    lookup: &HashMap<&Path, &FormattedPage>,
) -> Result<(), DevhelpError> {
    for name in &page.subpages {
        let subpage = tree
            .page(name)
            .ok_or_else(|| DevhelpError::UnknownPage(name.clone()))?;
        if subpage.extension != page.extension {
            continue;
        }
        let fpage = lookup
            .get(subpage.source_file.as_path())
            .ok_or_else(|| DevhelpError::MissingProjection(subpage.source_file.clone()))?;

        let mut chapter = Chapter {
            name: fpage.title.clone(),
            link: join_url(html_root, &fpage.full_ref),
            children: Vec::new(),
        };
        build_chapters(tree, &mut chapter.children, subpage, html_root, lookup)?;
        children.push(chapter);
    }
    Ok(())
}

/// Bucket key for (extension, language).
fn bucket_key(extension: &str, language: &str) -> String {
    format!("{extension}-{language}")
}

/// Render a relative filesystem path as a `/`-separated URL path.
fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
