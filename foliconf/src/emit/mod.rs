//! Rendering and writing of the generated artifacts.
//!
//! The stub is rendered from the schema tree with a stable field order and a
//! stable import block, so regeneration over an unchanged registry produces
//! byte-identical output. The runtime module is a fixed template; both files
//! are whole-file overwrites.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::{Dir, OpenOptions};

use crate::error::FoliconfError;
use crate::schema::{Schema, SchemaNode};

const INDENT: &str = "    ";

/// Trailer declaring the generation API surface, signatures only.
const STUB_TRAILER: &str = "\
def make_config() -> Config: ...
def config_from_dict(config_dict: dict[str, Any]) -> Config: ...
def update_config(config: Config, config_dict: dict[str, Any]) -> Config: ...
def config_to_dict(config: Config) -> dict[str, Any]: ...
";

/// Fixed body of the runtime module artifact: re-exports plus the trivial
/// base class wired to the generation API.
const RUNTIME_MODULE: &str = "\
from foliconf.runtime import (
    config_from_dict,
    config_to_dict,
    make_config,
    set_config_base,
    update_config,
)

__all__ = [
    \"Config\",
    \"config_from_dict\",
    \"config_to_dict\",
    \"make_config\",
    \"update_config\",
]


class Config:
    pass


set_config_base(Config)
";

fn disclaimer(base: &Utf8Path) -> String {
    format!(
        "# This file was generated automatically\n# Do not edit by hand, your changes will be lost\n# Regenerate by running `foliconf gen {base}`\n"
    )
}

/// Renders the stub artifact for `schema`.
///
/// `base` is the runtime-module path named in the regeneration banner.
#[must_use]
pub fn render_stub(schema: &Schema, base: &Utf8Path) -> String {
    let mut out = disclaimer(base);

    // The trailer's signatures reference `Any`, so the typing line always
    // carries it even when no field does.
    let mut typing: BTreeSet<&str> = schema.imports.typing().collect();
    typing.insert("Any");
    let typing: Vec<&str> = typing.into_iter().collect();
    out.push_str(&format!("from typing import {}\n", typing.join(", ")));

    let classes: Vec<&str> = schema.imports.classes().collect();
    out.push_str(&classes.join("\n"));
    out.push_str("\n\n");

    render_class(&mut out, "Config", &schema.root, 0);
    out.push_str(STUB_TRAILER);
    out
}

/// Renders one namespace block and its children.
///
/// Leaf fields sort by name before nested namespaces, which sort by name
/// among themselves; the `_` tiebreak marker on leaf names implements the
/// two tiers and is stripped for display.
fn render_class(
    out: &mut String,
    name: &str,
    children: &BTreeMap<String, SchemaNode>,
    level: usize,
) {
    indent(out, level);
    out.push_str("class ");
    out.push_str(name);
    out.push_str(":\n");

    let mut entries: Vec<(&String, &SchemaNode)> = children.iter().collect();
    entries.sort_by_key(|(child, node)| sort_key(child, node));
    for (child, node) in entries {
        match node {
            SchemaNode::Namespace(grandchildren) => {
                render_class(out, child, grandchildren, level + 1);
            }
            SchemaNode::Leaf(field) => {
                indent(out, level + 1);
                out.push_str(child);
                out.push_str(": ");
                out.push_str(&field.ty);
                out.push('\n');
                if !field.doc.is_empty() {
                    indent(out, level + 1);
                    out.push_str("\"\"\"");
                    out.push_str(&field.doc);
                    out.push_str("\"\"\"\n");
                }
            }
        }
    }
    if children.is_empty() {
        tracing::warn!(class = name, "empty configuration section");
        indent(out, level + 1);
        out.push_str("...\n");
    }
}

fn sort_key(name: &str, node: &SchemaNode) -> String {
    match node {
        SchemaNode::Leaf(_) => format!("_{name}"),
        SchemaNode::Namespace(_) => name.to_owned(),
    }
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

/// Writes both artifacts, overwriting any previous generation.
///
/// The stub lands next to `base` with the `pyi` extension; the runtime
/// module is written to `base` itself. Returns the stub path.
///
/// # Errors
///
/// [`FoliconfError::Io`] when either file cannot be created or written.
pub fn write_artifacts(base: &Utf8Path, stub: &str) -> Result<Utf8PathBuf, FoliconfError> {
    let parent = match base.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let module_name = base.file_name().ok_or_else(|| FoliconfError::Io {
        path: base.to_path_buf(),
        source: std::io::Error::other("output base path has no file name"),
    })?;
    let stub_path = base.with_extension("pyi");
    let stub_name = stub_path.file_name().ok_or_else(|| FoliconfError::Io {
        path: stub_path.clone(),
        source: std::io::Error::other("stub path has no file name"),
    })?;

    let dir = ensure_dir(parent)?;
    write_file(&dir, parent, stub_name, stub)?;
    let module = format!("{}{RUNTIME_MODULE}", disclaimer(base));
    write_file(&dir, parent, module_name, &module)?;
    Ok(stub_path)
}

fn write_file(dir: &Dir, parent: &Utf8Path, name: &str, content: &str) -> Result<(), FoliconfError> {
    let mut file = dir
        .open_with(
            name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|io_err| FoliconfError::Io {
            path: parent.join(name),
            source: io_err,
        })?;
    file.write_all(content.as_bytes())
        .map_err(|io_err| FoliconfError::Io {
            path: parent.join(name),
            source: io_err,
        })
}

fn ensure_dir(path: &Utf8Path) -> Result<Dir, FoliconfError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(dir),
        Err(open_err) if open_err.kind() == std::io::ErrorKind::NotFound => {
            Dir::create_ambient_dir_all(path, ambient_authority()).map_err(|io_err| {
                FoliconfError::Io {
                    path: path.to_path_buf(),
                    source: io_err,
                }
            })?;
            Dir::open_ambient_dir(path, ambient_authority()).map_err(|io_err| FoliconfError::Io {
                path: path.to_path_buf(),
                source: io_err,
            })
        }
        Err(open_err) => Err(FoliconfError::Io {
            path: path.to_path_buf(),
            source: open_err,
        }),
    }
}
