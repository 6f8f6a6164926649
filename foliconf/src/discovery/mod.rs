//! Locating and loading section declarations from source files.
//!
//! Discovery runs in two phases, mirroring the generation pipeline's
//! contract with its host: a cheap visitor pass detects whether a file
//! declares any section at all, and only matched files are *loaded* — the
//! step that extracts definitions and writes them into the registry. A
//! logical module path is loaded at most once per run, so a file pulled in
//! earlier by another dependency is never re-registered.

mod extract;
mod visitor;

pub use visitor::SectionVisitor;

use std::collections::HashSet;

use camino::Utf8Path;
use syn::visit::Visit;

use crate::error::FoliconfError;
use crate::registry::SectionRegistry;

use extract::section_defs;

/// Derives the logical module path for a source file relative to the scan
/// root: separators become dots and the extension is dropped.
#[must_use]
pub fn module_path(relative: &Utf8Path) -> String {
    relative
        .with_extension("")
        .components()
        .map(|component| component.as_str().to_owned())
        .collect::<Vec<_>>()
        .join(".")
}

/// Loads matched declaration files into the registry, at most once per
/// logical module path.
#[derive(Debug, Default)]
pub struct ModuleLoader {
    loaded: HashSet<String>,
}

impl ModuleLoader {
    /// Creates a loader with no modules loaded yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans `file` for section markers and, when any are present, loads the
    /// module's definitions into `registry`.
    ///
    /// Returns whether this call performed the load. Loading is skipped when
    /// `module` was already loaded or when the file declares no sections.
    ///
    /// # Errors
    ///
    /// [`FoliconfError::DuplicateSection`] when a definition's dotted path is
    /// already registered.
    pub fn scan(
        &mut self,
        module: &str,
        file: &syn::File,
        registry: &mut SectionRegistry,
    ) -> Result<bool, FoliconfError> {
        let mut visitor = SectionVisitor::new();
        visitor.visit_file(file);
        if !visitor.found_sections() {
            return Ok(false);
        }
        if !self.loaded.insert(module.to_owned()) {
            tracing::debug!(module, "module already loaded, skipping");
            return Ok(false);
        }
        tracing::debug!(module, sections = visitor.paths().len(), "loading module");
        for (path, def) in section_defs(module, file) {
            registry.register(&path, def)?;
        }
        Ok(true)
    }

    /// Parses `source` and scans it, tying parse failures to `origin`.
    ///
    /// # Errors
    ///
    /// [`FoliconfError::Parse`] when the file is not valid syntax, plus the
    /// registration errors of [`ModuleLoader::scan`].
    pub fn scan_source(
        &mut self,
        module: &str,
        origin: &Utf8Path,
        source: &str,
        registry: &mut SectionRegistry,
    ) -> Result<bool, FoliconfError> {
        let file = syn::parse_file(source).map_err(|parse_err| FoliconfError::Parse {
            path: origin.to_path_buf(),
            message: parse_err.to_string(),
        })?;
        self.scan(module, &file, registry)
    }
}

#[cfg(test)]
mod tests;
