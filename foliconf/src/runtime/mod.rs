//! Construction and manipulation of live configuration trees.
//!
//! A [`Config`] mirrors the schema's shape at runtime: sections nest, leaves
//! hold [`Value`]s. The helpers here build a tree from the registry's
//! defaults, merge dotted-path updates into it, flatten it back out and
//! verify it against the declared annotations.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::de::Error as _;

use crate::error::FoliconfError;
use crate::registry::{ROOT_SECTION, SectionDef, SectionRegistry};
use crate::value::Value;

/// One slot in a configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEntry {
    /// A nested section.
    Section(Config),
    /// A leaf value.
    Value(Value),
}

/// A live configuration tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    entries: BTreeMap<String, ConfigEntry>,
}

impl Config {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn instantiate(def: &SectionDef) -> Self {
        let entries = def
            .defaults
            .iter()
            .map(|(name, value)| (name.clone(), ConfigEntry::Value(value.clone())))
            .collect();
        Self { entries }
    }

    /// Looks up a direct child by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConfigEntry> {
        self.entries.get(name)
    }

    /// Resolves a dotted path to a leaf value, walking nested sections.
    #[must_use]
    pub fn value(&self, path: &str) -> Option<&Value> {
        let mut node = self;
        let mut segments = path.split('.').peekable();
        while let Some(segment) = segments.next() {
            match node.entries.get(segment)? {
                ConfigEntry::Section(section) => node = section,
                ConfigEntry::Value(value) => {
                    return segments.peek().is_none().then_some(value);
                }
            }
        }
        None
    }

    /// Whether the tree holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct children in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Sets the leaf at a dotted path, creating intermediate sections.
    ///
    /// # Errors
    ///
    /// [`FoliconfError::NodeConflict`] when the path runs through an existing
    /// leaf or terminates on an existing section.
    pub fn set_value(&mut self, path: &str, value: Value) -> Result<(), FoliconfError> {
        let (parent, name) = path.rsplit_once('.').unwrap_or(("", path));
        let node = self.vivify(parent, path)?;
        match node.entries.entry(name.to_owned()) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                ConfigEntry::Section(_) => Err(FoliconfError::NodeConflict {
                    path: path.to_owned(),
                }),
                ConfigEntry::Value(existing) => {
                    *existing = value;
                    Ok(())
                }
            },
            Entry::Vacant(slot) => {
                slot.insert(ConfigEntry::Value(value));
                Ok(())
            }
        }
    }

    /// Attaches a section's defaults at a dotted path, merging into any
    /// section already there.
    fn attach_section(&mut self, path: &str, section: Self) -> Result<(), FoliconfError> {
        let (parent, name) = path.rsplit_once('.').unwrap_or(("", path));
        let node = self.vivify(parent, path)?;
        match node.entries.entry(name.to_owned()) {
            Entry::Occupied(mut slot) => match slot.get_mut() {
                ConfigEntry::Section(existing) => {
                    existing.entries.extend(section.entries);
                    Ok(())
                }
                ConfigEntry::Value(_) => Err(FoliconfError::NodeConflict {
                    path: path.to_owned(),
                }),
            },
            Entry::Vacant(slot) => {
                slot.insert(ConfigEntry::Section(section));
                Ok(())
            }
        }
    }

    /// Walks `parent`, creating empty sections on demand.
    fn vivify(&mut self, parent: &str, full_path: &str) -> Result<&mut Self, FoliconfError> {
        let mut node = self;
        if parent.is_empty() {
            return Ok(node);
        }
        for segment in parent.split('.') {
            let entry = node
                .entries
                .entry(segment.to_owned())
                .or_insert_with(|| ConfigEntry::Section(Self::new()));
            match entry {
                ConfigEntry::Section(section) => node = section,
                ConfigEntry::Value(_) => {
                    return Err(FoliconfError::NodeConflict {
                        path: full_path.to_owned(),
                    });
                }
            }
        }
        Ok(node)
    }
}

/// Builds a configuration tree populated with every registered default.
///
/// Root-section defaults attach at the top level; every other section
/// attaches under its dotted path.
///
/// # Errors
///
/// [`FoliconfError::NodeConflict`] when section paths collide with leaves.
pub fn make_config(registry: &SectionRegistry) -> Result<Config, FoliconfError> {
    let mut config = registry
        .get(ROOT_SECTION)
        .map_or_else(Config::new, Config::instantiate);
    for (path, def) in registry.iter() {
        if path == ROOT_SECTION {
            continue;
        }
        config.attach_section(path, Config::instantiate(def))?;
    }
    Ok(config)
}

/// Merges dotted-path updates into an existing tree, in path order.
///
/// # Errors
///
/// [`FoliconfError::NodeConflict`] when an update path crosses a leaf or
/// lands on a section.
pub fn update_config(
    config: &mut Config,
    updates: &BTreeMap<String, Value>,
) -> Result<(), FoliconfError> {
    for (path, value) in updates {
        config.set_value(path, value.clone())?;
    }
    Ok(())
}

/// Builds a defaults tree and merges `updates` into it.
///
/// Fields that the annotations declare but the result does not carry are
/// logged, not fatal; [`check_config`] exposes them directly.
///
/// # Errors
///
/// The conflict errors of [`make_config`] and [`update_config`].
pub fn config_from_dict(
    registry: &SectionRegistry,
    updates: &BTreeMap<String, Value>,
) -> Result<Config, FoliconfError> {
    let mut config = make_config(registry)?;
    update_config(&mut config, updates)?;
    check_config(registry, &config);
    Ok(config)
}

/// Reports every annotated field the tree does not carry, as dotted paths
/// in sorted order. Each missing field is also logged.
pub fn check_config(registry: &SectionRegistry, config: &Config) -> Vec<String> {
    let mut missing = Vec::new();
    for (path, def) in registry.iter() {
        for name in def.annotations.keys() {
            let dotted = if path == ROOT_SECTION {
                name.clone()
            } else {
                format!("{path}.{name}")
            };
            if config.value(&dotted).is_none() {
                tracing::warn!(field = %dotted, "declared field missing from configuration");
                missing.push(dotted);
            }
        }
    }
    missing
}

/// Flattens a tree into a dotted-path map of its leaves.
///
/// Sections are traversed, never emitted; the output feeds straight back
/// into [`update_config`] and [`config_from_dict`].
#[must_use]
pub fn config_to_dict(config: &Config) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    flatten_into(config, "", &mut flat);
    flat
}

fn flatten_into(config: &Config, prefix: &str, out: &mut BTreeMap<String, Value>) {
    for (name, entry) in config.iter() {
        let path = if prefix.is_empty() {
            name.to_owned()
        } else {
            format!("{prefix}.{name}")
        };
        match entry {
            ConfigEntry::Section(section) => flatten_into(section, &path, out),
            ConfigEntry::Value(value) => {
                out.insert(path, value.clone());
            }
        }
    }
}

/// Parses a JSON object of dotted-path updates.
///
/// # Errors
///
/// [`FoliconfError::Json`] when the text is not valid JSON or its top level
/// is not an object.
pub fn updates_from_json(text: &str) -> Result<BTreeMap<String, Value>, FoliconfError> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    let serde_json::Value::Object(entries) = json else {
        return Err(FoliconfError::Json(serde_json::Error::custom(
            "expected a JSON object keyed by dotted paths",
        )));
    };
    Ok(entries
        .iter()
        .map(|(path, value)| (path.clone(), Value::from_json(value)))
        .collect())
}

/// Serializes a flattened tree as JSON.
#[must_use]
pub fn dict_to_json(dict: &BTreeMap<String, Value>) -> serde_json::Value {
    serde_json::Value::Object(
        dict.iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect(),
    )
}
