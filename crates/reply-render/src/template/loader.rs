//! Startup template loading.
//!
//! [`TemplateLoader`] is the single entry point for building a [`Templates`]
//! set. It probes the template directory once when created, collects
//! functions through [`register_functions`](TemplateLoader::register_functions),
//! and walks the directory in [`load`](TemplateLoader::load).
//!
//! `load` consumes the loader. Once it has run there is nothing left to
//! register functions on, which makes the "functions before templates"
//! ordering a compile-time property:
//!
//! ```rust,ignore
//! let mut loader = TemplateLoader::new("views");
//! loader.register_functions(FuncMap::new().add("to_upper", |s: String| s.to_uppercase()))?;
//! let templates = loader.load()?;   // startup barrier
//! // loader.register_functions(...)  // error: use of moved value
//! ```
//!
//! # Traversal
//!
//! The walk is depth-first. Inside each directory, entries are visited in
//! lexicographic file-name order, and a subdirectory's contents are visited
//! at the position where the subdirectory sorts. Every non-directory entry
//! is a template, named by its base file name (extension included).
//! Extensions and nesting carry no meaning, so `a/page.html` and
//! `b/page.html` both register `page.html`; `b/page.html` is visited last
//! and wins.
//!
//! Any unreadable entry or template syntax error aborts the load. There is
//! no partially loaded set.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::engine::new_environment;
use super::functions::FuncMap;
use super::registry::Templates;
use crate::error::RenderError;

/// Name of the template directory used when none is configured.
pub const DEFAULT_TEMPLATE_DIR: &str = "views";

/// A file found by [`walk_template_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
    /// Template name: the file's base name, extension included.
    pub name: String,
    /// Path of the file.
    pub path: PathBuf,
}

impl TemplateFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Collects template sources and functions, then builds a [`Templates`] set.
#[derive(Debug)]
pub struct TemplateLoader {
    root: PathBuf,
    present: bool,
    funcs: FuncMap,
}

impl TemplateLoader {
    /// Creates a loader for `root`, recording whether the directory exists.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let present = root.exists();
        Self {
            root,
            present,
            funcs: FuncMap::new(),
        }
    }

    /// Creates a loader for [`DEFAULT_TEMPLATE_DIR`] in the working directory.
    pub fn with_default_dir() -> Self {
        Self::new(DEFAULT_TEMPLATE_DIR)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns true if the template directory existed when the loader was created.
    pub fn is_present(&self) -> bool {
        self.present
    }

    /// Merges `funcs` into the template namespace.
    ///
    /// Later registrations replace earlier ones with the same name, and any
    /// registration replaces a builtin (`html`, `nl2br`) of that name.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::NoTemplateDirectory`] if the template directory
    /// does not exist. Functions are never silently dropped.
    pub fn register_functions(&mut self, funcs: FuncMap) -> Result<&mut Self, RenderError> {
        if !self.present {
            return Err(RenderError::NoTemplateDirectory {
                path: self.root.clone(),
            });
        }
        self.funcs.extend(funcs);
        Ok(self)
    }

    /// Walks the template directory and compiles every file.
    ///
    /// A missing directory is not an error: the returned set is absent and
    /// every later template operation reports
    /// [`RenderError::NoTemplateDirectory`].
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Walk`] if a directory or file cannot be read and
    /// [`RenderError::Parse`] if a file is not a valid template. Either one
    /// should stop the process from serving traffic.
    pub fn load(self) -> Result<Templates, RenderError> {
        if !self.present {
            info!(dir = %self.root.display(), "template directory not found, templates disabled");
            return Ok(Templates::absent(self.root));
        }

        let mut env = new_environment();
        self.funcs.install(&mut env);

        let files = walk_template_dir(&self.root)?;
        for file in &files {
            let source = fs::read_to_string(&file.path).map_err(|source| RenderError::Walk {
                path: file.path.clone(),
                source,
            })?;
            env.add_template_owned(file.name.clone(), source)
                .map_err(|source| RenderError::Parse {
                    name: file.name.clone(),
                    path: file.path.clone(),
                    source,
                })?;
            debug!(name = %file.name, path = %file.path.display(), "parsed template");
        }

        let templates = Templates::loaded(self.root, env);
        info!(
            dir = %templates.root().display(),
            files = files.len(),
            templates = templates.len(),
            "templates loaded"
        );
        Ok(templates)
    }
}

/// Walks `root` and lists every file in traversal order.
///
/// See the [module documentation](self) for the ordering rules. If `root`
/// is itself a file, it is the only entry.
///
/// # Errors
///
/// Returns [`RenderError::Walk`] for the first entry that cannot be read.
pub fn walk_template_dir(root: impl AsRef<Path>) -> Result<Vec<TemplateFile>, RenderError> {
    let root = root.as_ref();
    let mut files = Vec::new();
    walk_recursive(root, &mut files)?;
    Ok(files)
}

fn walk_recursive(path: &Path, files: &mut Vec<TemplateFile>) -> Result<(), RenderError> {
    let walk_err = |source| RenderError::Walk {
        path: path.to_path_buf(),
        source,
    };

    let metadata = fs::metadata(path).map_err(walk_err)?;
    if !metadata.is_dir() {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        files.push(TemplateFile::new(name, path));
        return Ok(());
    }

    let mut entries = fs::read_dir(path)
        .map_err(walk_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(walk_err)?;
    entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    for entry in entries {
        walk_recursive(&entry, files)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_walk_order_is_lexicographic_depth_first() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "b.html", "");
        write(tmp.path(), "a/z.html", "");
        write(tmp.path(), "a/y/x.txt", "");
        write(tmp.path(), "c", "");

        let names: Vec<String> = walk_template_dir(tmp.path())
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["x.txt", "z.html", "b.html", "c"]);
    }

    #[test]
    fn test_walk_single_file_root() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "only.tmpl", "");
        let files = walk_template_dir(tmp.path().join("only.tmpl")).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "only.tmpl");
    }

    #[test]
    fn test_walk_missing_root_is_walk_error() {
        let tmp = TempDir::new().unwrap();
        let err = walk_template_dir(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, RenderError::Walk { .. }));
    }

    #[test]
    fn test_register_functions_on_absent_dir_is_strict() {
        let tmp = TempDir::new().unwrap();
        let mut loader = TemplateLoader::new(tmp.path().join("views"));
        assert!(!loader.is_present());

        let err = loader
            .register_functions(FuncMap::new().add("f", || 1))
            .unwrap_err();
        assert!(err.is_no_template_directory());
    }

    #[test]
    fn test_register_functions_chains() {
        let tmp = TempDir::new().unwrap();
        let mut loader = TemplateLoader::new(tmp.path());
        loader
            .register_functions(FuncMap::new().add("one", || 1))
            .unwrap()
            .register_functions(FuncMap::new().add("two", || 2))
            .unwrap();
        assert!(loader.funcs.contains("one"));
        assert!(loader.funcs.contains("two"));
    }

    #[test]
    fn test_default_dir_name() {
        assert_eq!(TemplateLoader::with_default_dir().root(), Path::new("views"));
    }
}
