//! The single source of truth for registered configuration sections.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::error::FoliconfError;
use crate::type_expr::TypeExpr;
use crate::value::Value;

/// The reserved path for top-level attributes not nested under any section.
pub const ROOT_SECTION: &str = "@base";

/// A configuration section extracted from one marked declaration.
#[derive(Debug, Clone)]
pub struct SectionDef {
    /// Name of the struct the section was declared on.
    pub name: String,
    /// Logical module path of the declaring file.
    pub module: String,
    /// Raw documentation text attached to the declaration.
    pub doc: String,
    /// Attributes with default values, keyed by attribute name.
    pub defaults: BTreeMap<String, Value>,
    /// Explicitly annotated attributes, keyed by attribute name.
    pub annotations: BTreeMap<String, TypeExpr>,
}

impl SectionDef {
    /// Creates an empty definition for `name` declared in `module`.
    #[must_use]
    pub fn new(name: &str, module: &str) -> Self {
        Self {
            name: name.to_owned(),
            module: module.to_owned(),
            doc: String::new(),
            defaults: BTreeMap::new(),
            annotations: BTreeMap::new(),
        }
    }

    /// Human-readable identity used in duplicate-registration errors.
    #[must_use]
    pub fn describe(&self) -> String {
        format!("{} (module {})", self.name, self.module)
    }
}

/// Ordered table mapping dotted section paths to their definitions.
///
/// Populated once during discovery and treated as read-only for the rest of
/// the run; the builder and the runtime helpers receive it by reference.
#[derive(Debug, Default)]
pub struct SectionRegistry {
    sections: BTreeMap<String, SectionDef>,
}

impl SectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `def` under `path`.
    ///
    /// # Errors
    ///
    /// [`FoliconfError::DuplicateSection`] when the path is already taken;
    /// the error names both the prior and the rejected definition.
    pub fn register(&mut self, path: &str, def: SectionDef) -> Result<(), FoliconfError> {
        match self.sections.entry(path.to_owned()) {
            Entry::Occupied(existing) => Err(FoliconfError::DuplicateSection {
                path: path.to_owned(),
                existing: existing.get().describe(),
                incoming: def.describe(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(def);
                Ok(())
            }
        }
    }

    /// Sections ordered by dotted path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SectionDef)> {
        self.sections.iter().map(|(path, def)| (path.as_str(), def))
    }

    /// Looks up a single section by dotted path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&SectionDef> {
        self.sections.get(path)
    }

    /// Number of registered sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no sections are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{ROOT_SECTION, SectionDef, SectionRegistry};
    use crate::error::FoliconfError;

    #[test]
    fn rejects_duplicate_paths_naming_both_owners() {
        let mut registry = SectionRegistry::new();
        registry
            .register("db", SectionDef::new("DbConfig", "storage.db_decl"))
            .expect("first registration succeeds");

        let err = registry
            .register("db", SectionDef::new("Database", "storage.alt_decl"))
            .expect_err("duplicate registration must fail");
        assert!(matches!(err, FoliconfError::DuplicateSection { .. }));
        let message = err.to_string();
        assert!(message.contains("DbConfig"), "prior owner named: {message}");
        assert!(message.contains("Database"), "new owner named: {message}");
    }

    #[test]
    fn iterates_in_path_order() {
        let mut registry = SectionRegistry::new();
        registry
            .register("net.http", SectionDef::new("Http", "net_decl"))
            .expect("register net.http");
        registry
            .register(ROOT_SECTION, SectionDef::new("Base", "config_decl"))
            .expect("register root");
        registry
            .register("db", SectionDef::new("Db", "db_decl"))
            .expect("register db");

        let paths: Vec<&str> = registry.iter().map(|(path, _)| path).collect();
        assert_eq!(paths, [ROOT_SECTION, "db", "net.http"]);
    }
}
