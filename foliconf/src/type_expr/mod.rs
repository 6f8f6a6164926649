//! Type descriptors and their canonical textual rendering.
//!
//! Annotations extracted during discovery are represented as explicit
//! [`TypeExpr`] values rather than host-language reflection handles. The
//! renderer is pure: identical descriptors always produce identical strings
//! and import requirements, independent of rendering order. Import
//! aggregation via [`ImportSet`] relies on that stability.

use std::collections::BTreeSet;

/// A named type together with its defining module, when not built in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    name: String,
    module: Option<String>,
}

impl TypeName {
    /// A type from the language's built-in namespace; needs no import.
    #[must_use]
    pub fn builtin(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            module: None,
        }
    }

    /// A type imported from a dotted module path.
    #[must_use]
    pub fn imported(name: &str, module: &str) -> Self {
        Self {
            name: name.to_owned(),
            module: Some(module.to_owned()),
        }
    }

    /// The bare type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The defining module, when the type is not built in.
    #[must_use]
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    /// The `from <module> import <name>` line for this type, if any.
    #[must_use]
    pub fn import_line(&self) -> Option<String> {
        self.module
            .as_ref()
            .map(|module| format!("from {module} import {}", self.name))
    }
}

/// Descriptor for a configuration attribute's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// A bare class or primitive.
    Name(TypeName),
    /// The absence type, rendered as the literal `None`.
    None,
    /// The wildcard type, rendered as `Any`.
    Any,
    /// A union of variants. Exactly two variants including the absence type
    /// render as `Optional[..]` with the absence elided.
    Union(Vec<TypeExpr>),
    /// A mapping from keys to values.
    Dict(Box<TypeExpr>, Box<TypeExpr>),
    /// Any other parameterized type.
    Generic {
        /// The parameterized type's origin.
        origin: TypeName,
        /// Type arguments, in declaration order.
        args: Vec<TypeExpr>,
    },
}

impl TypeExpr {
    /// Builds the two-variant union that `Optional[inner]` denotes.
    #[must_use]
    pub fn optional(inner: Self) -> Self {
        Self::Union(vec![inner, Self::None])
    }

    fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The optional pattern: a union of exactly two variants, one of which
    /// is the absence type.
    fn is_optional(variants: &[Self]) -> bool {
        variants.len() == 2 && variants.iter().any(Self::is_none)
    }

    /// Renders the canonical textual form of this descriptor.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Name(name) => name.name().to_owned(),
            Self::None => "None".to_owned(),
            Self::Any => "Any".to_owned(),
            Self::Union(variants) => {
                if Self::is_optional(variants) {
                    variants
                        .iter()
                        .find(|variant| !variant.is_none())
                        .map_or_else(|| "None".to_owned(), |inner| {
                            format!("Optional[{}]", inner.render())
                        })
                } else {
                    let parts: Vec<String> = variants.iter().map(Self::render).collect();
                    format!("Union[{}]", parts.join(", "))
                }
            }
            Self::Dict(key, value) => format!("Dict[{}, {}]", key.render(), value.render()),
            Self::Generic { origin, args } => {
                let parts: Vec<String> = args.iter().map(Self::render).collect();
                format!("{}[{}]", origin.name(), parts.join(", "))
            }
        }
    }

    /// Records every import this descriptor requires.
    pub fn collect_imports(&self, imports: &mut ImportSet) {
        match self {
            Self::Name(name) => imports.add_class(name),
            Self::None => {}
            Self::Any => imports.add_typing("Any"),
            Self::Union(variants) => {
                imports.add_typing(if Self::is_optional(variants) {
                    "Optional"
                } else {
                    "Union"
                });
                for variant in variants {
                    variant.collect_imports(imports);
                }
            }
            Self::Dict(key, value) => {
                imports.add_typing("Dict");
                key.collect_imports(imports);
                value.collect_imports(imports);
            }
            Self::Generic { origin, args } => {
                // Non-built-in generic origins travel on the typing import
                // line, matching the generated artifact's historical layout.
                if origin.module().is_some() {
                    imports.add_typing(origin.name());
                }
                for arg in args {
                    arg.collect_imports(imports);
                }
            }
        }
    }
}

/// Import requirements accumulated while rendering type expressions.
///
/// Both sets are ordered and de-duplicated, so the emitted import block is
/// identical across generation runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    typing: BTreeSet<String>,
    classes: BTreeSet<String>,
}

impl ImportSet {
    /// Records a name for the typing import line.
    pub fn add_typing(&mut self, name: &str) {
        self.typing.insert(name.to_owned());
    }

    /// Records the class import line for `name`, when it needs one.
    pub fn add_class(&mut self, name: &TypeName) {
        if let Some(line) = name.import_line() {
            self.classes.insert(line);
        }
    }

    /// Typing names in sorted order.
    pub fn typing(&self) -> impl Iterator<Item = &str> {
        self.typing.iter().map(String::as_str)
    }

    /// Class import lines in sorted order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }
}
