//! Runtime values carried by configuration defaults and instances.

use std::collections::BTreeMap;

use crate::type_expr::{TypeExpr, TypeName};

/// A runtime configuration value.
///
/// Defaults extracted during discovery and the leaves of a constructed
/// [`Config`](crate::runtime::Config) share this representation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence value.
    None,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(String),
    /// An ordered sequence of values.
    List(Vec<Value>),
    /// A string-keyed mapping of values.
    Map(BTreeMap<String, Value>),
    /// An opaque default-constructed instance of a named class.
    Instance(Instance),
}

/// An opaque instance of a non-built-in class, known only by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// The class name.
    pub class: String,
    /// Dotted module path the class is imported from.
    pub module: String,
}

impl Value {
    /// Returns the descriptor for this value's runtime type.
    #[must_use]
    pub fn type_expr(&self) -> TypeExpr {
        match self {
            Self::None => TypeExpr::Name(TypeName::builtin("NoneType")),
            Self::Bool(_) => TypeExpr::Name(TypeName::builtin("bool")),
            Self::Int(_) => TypeExpr::Name(TypeName::builtin("int")),
            Self::Float(_) => TypeExpr::Name(TypeName::builtin("float")),
            Self::Str(_) => TypeExpr::Name(TypeName::builtin("str")),
            Self::List(_) => TypeExpr::Name(TypeName::builtin("list")),
            Self::Map(_) => TypeExpr::Name(TypeName::builtin("dict")),
            Self::Instance(instance) => {
                TypeExpr::Name(TypeName::imported(&instance.class, &instance.module))
            }
        }
    }

    /// Converts the value into its JSON representation.
    ///
    /// Instances serialize as their dotted class path, since they carry no
    /// runtime state of their own.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::None => serde_json::Value::Null,
            Self::Bool(value) => serde_json::Value::Bool(*value),
            Self::Int(value) => serde_json::Value::from(*value),
            Self::Float(value) => serde_json::Number::from_f64(*value)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Str(value) => serde_json::Value::String(value.clone()),
            Self::List(values) => {
                serde_json::Value::Array(values.iter().map(Self::to_json).collect())
            }
            Self::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), value.to_json()))
                    .collect(),
            ),
            Self::Instance(instance) => {
                serde_json::Value::String(format!("{}.{}", instance.module, instance.class))
            }
        }
    }

    /// Builds a value from parsed JSON.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(value) => Self::Bool(*value),
            serde_json::Value::Number(number) => number
                .as_i64()
                .map_or_else(|| Self::Float(number.as_f64().unwrap_or(0.0)), Self::Int),
            serde_json::Value::String(value) => Self::Str(value.clone()),
            serde_json::Value::Array(values) => {
                Self::List(values.iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(entries) => Self::Map(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Self::from_json(value)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{Instance, Value};

    #[rstest]
    #[case::boolean(Value::Bool(true), "bool")]
    #[case::integer(Value::Int(1), "int")]
    #[case::float(Value::Float(0.5), "float")]
    #[case::string(Value::Str("x".to_owned()), "str")]
    #[case::list(Value::List(vec![]), "list")]
    #[case::absence(Value::None, "NoneType")]
    fn infers_runtime_type_names(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(value.type_expr().render(), expected);
    }

    #[test]
    fn instance_type_records_its_module() {
        let value = Value::Instance(Instance {
            class: "Timeout".to_owned(),
            module: "net.util".to_owned(),
        });
        let ty = value.type_expr();
        assert_eq!(ty.render(), "Timeout");

        let mut imports = crate::type_expr::ImportSet::default();
        ty.collect_imports(&mut imports);
        let classes: Vec<&str> = imports.classes().collect();
        assert_eq!(classes, ["from net.util import Timeout"]);
    }

    #[test]
    fn json_round_trip_preserves_scalars() {
        let source = serde_json::json!({
            "flag": true,
            "port": 8080,
            "ratio": 0.25,
            "name": "svc",
            "tags": ["a", "b"],
        });
        let value = Value::from_json(&source);
        assert_eq!(value.to_json(), source);
    }
}
