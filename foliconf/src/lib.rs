//! Configuration-schema generation from marked section declarations.
//!
//! `foliconf` scans a source tree for struct declarations annotated with
//! `#[config_section("dotted.path")]`, merges every marked section into one
//! hierarchical schema, and emits two artifacts: a typing stub describing the
//! full nested configuration shape and a small runtime module exposing the
//! construction API. The [`runtime`] helpers construct, merge, flatten and
//! presence-check configuration instances against the same registry at
//! program-run time.
//!
//! The pipeline is deterministic: for a fixed set of registered sections, two
//! generation runs produce byte-identical stub output.

pub mod discovery;
pub mod docs;
pub mod emit;
pub mod error;
pub mod registry;
pub mod runtime;
pub mod schema;
pub mod type_expr;
pub mod value;

pub use error::FoliconfError;
pub use registry::{ROOT_SECTION, SectionDef, SectionRegistry};
pub use runtime::{
    Config, ConfigEntry, check_config, config_from_dict, config_to_dict, make_config,
    update_config,
};
pub use schema::{Field, Schema, SchemaNode, build_schema};
pub use type_expr::{ImportSet, TypeExpr, TypeName};
pub use value::{Instance, Value};
