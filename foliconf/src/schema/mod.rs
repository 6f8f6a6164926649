//! Schema tree assembly from the section registry.
//!
//! Every registered section contributes its inferred and declared fields to
//! one recursive namespace tree. Intermediate nodes are namespaces, leaves
//! are fields; a dotted path can never be both.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use serde::Serialize;

use crate::docs::attribute_docs;
use crate::error::FoliconfError;
use crate::registry::{ROOT_SECTION, SectionDef, SectionRegistry};
use crate::type_expr::ImportSet;

/// A single configuration attribute: rendered type plus documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Canonical textual type expression.
    pub ty: String,
    /// Documentation for the attribute; empty when none was declared.
    pub doc: String,
}

/// One level of the schema: namespaces nest, fields terminate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SchemaNode {
    /// An intermediate namespace keyed by path segment.
    Namespace(BTreeMap<String, SchemaNode>),
    /// A leaf attribute.
    Leaf(Field),
}

/// The fully assembled schema plus its accumulated imports.
#[derive(Debug, Default)]
pub struct Schema {
    /// Root namespace; `@base` attributes attach directly here.
    pub root: BTreeMap<String, SchemaNode>,
    /// Imports required by the rendered field types.
    pub imports: ImportSet,
}

/// Builds the schema tree for every registered section.
///
/// # Errors
///
/// [`FoliconfError::NodeConflict`] when a dotted path is used both as a
/// namespace and as an attribute.
pub fn build_schema(registry: &SectionRegistry) -> Result<Schema, FoliconfError> {
    let mut schema = Schema::default();
    for (path, def) in registry.iter() {
        let fields = section_fields(def, &mut schema.imports);
        let target = if path == ROOT_SECTION {
            &mut schema.root
        } else {
            namespace_at(&mut schema.root, path)?
        };
        for (name, field) in fields {
            insert_leaf(target, path, &name, field)?;
        }
    }
    Ok(schema)
}

/// Inferred fields from default values, overridden by declared annotations.
fn section_fields(def: &SectionDef, imports: &mut ImportSet) -> BTreeMap<String, Field> {
    let docs = attribute_docs(&def.doc);
    let mut fields = BTreeMap::new();
    for (name, value) in &def.defaults {
        let ty = value.type_expr();
        ty.collect_imports(imports);
        fields.insert(
            name.clone(),
            Field {
                ty: ty.render(),
                doc: docs.get(name).cloned().unwrap_or_default(),
            },
        );
    }
    for (name, ty) in &def.annotations {
        ty.collect_imports(imports);
        fields.insert(
            name.clone(),
            Field {
                ty: ty.render(),
                doc: docs.get(name).cloned().unwrap_or_default(),
            },
        );
    }
    fields
}

/// Walks `path`, creating namespace nodes on demand, and returns the final
/// namespace's children.
fn namespace_at<'tree>(
    root: &'tree mut BTreeMap<String, SchemaNode>,
    path: &str,
) -> Result<&'tree mut BTreeMap<String, SchemaNode>, FoliconfError> {
    let mut node = root;
    let mut walked: Vec<&str> = Vec::new();
    for segment in path.split('.') {
        walked.push(segment);
        let entry = node
            .entry(segment.to_owned())
            .or_insert_with(|| SchemaNode::Namespace(BTreeMap::new()));
        match entry {
            SchemaNode::Namespace(children) => node = children,
            SchemaNode::Leaf(_) => {
                return Err(FoliconfError::NodeConflict {
                    path: walked.join("."),
                });
            }
        }
    }
    Ok(node)
}

fn insert_leaf(
    target: &mut BTreeMap<String, SchemaNode>,
    section: &str,
    name: &str,
    field: Field,
) -> Result<(), FoliconfError> {
    match target.entry(name.to_owned()) {
        Entry::Occupied(mut slot) => match slot.get_mut() {
            SchemaNode::Namespace(_) => Err(FoliconfError::NodeConflict {
                path: dotted(section, name),
            }),
            SchemaNode::Leaf(existing) => {
                *existing = field;
                Ok(())
            }
        },
        Entry::Vacant(slot) => {
            slot.insert(SchemaNode::Leaf(field));
            Ok(())
        }
    }
}

fn dotted(section: &str, name: &str) -> String {
    if section == ROOT_SECTION {
        name.to_owned()
    } else {
        format!("{section}.{name}")
    }
}
