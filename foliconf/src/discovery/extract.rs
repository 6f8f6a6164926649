//! Conversion of marked struct declarations into section definitions.
//!
//! Extraction is deliberately permissive: default expressions or annotation
//! syntax the generator does not understand are skipped, in the same spirit
//! as malformed markers being treated as non-matches.

use syn::visit::Visit;
use syn::{
    Attribute, Expr, ExprCall, ExprLit, Fields, File, GenericArgument, ItemStruct, Lit, Meta,
    PathArguments, Type, UnOp,
};

use crate::registry::SectionDef;
use crate::type_expr::{TypeExpr, TypeName};
use crate::value::{Instance, Value};

use super::visitor::marker_path;

/// Extracts `(path, definition)` pairs from every marked struct in `file`,
/// in declaration order.
pub(crate) fn section_defs(module: &str, file: &File) -> Vec<(String, SectionDef)> {
    let mut collector = DefCollector {
        module,
        defs: Vec::new(),
    };
    collector.visit_file(file);
    collector.defs
}

struct DefCollector<'src> {
    module: &'src str,
    defs: Vec<(String, SectionDef)>,
}

impl<'ast> Visit<'ast> for DefCollector<'_> {
    fn visit_item_struct(&mut self, item: &'ast ItemStruct) {
        if let Some(path) = marker_path(&item.attrs) {
            self.defs.push((path, section_def(item, self.module)));
        }
        syn::visit::visit_item_struct(self, item);
    }
}

fn section_def(item: &ItemStruct, module: &str) -> SectionDef {
    let mut def = SectionDef::new(&item.ident.to_string(), module);
    def.doc = doc_text(&item.attrs);
    if let Fields::Named(fields) = &item.fields {
        for field in &fields.named {
            let Some(ident) = &field.ident else { continue };
            let name = ident.to_string();
            // Name-mangled attributes never become schema fields.
            if name.starts_with("__") {
                continue;
            }
            if let Some(value) = default_value(&field.attrs) {
                def.defaults.insert(name.clone(), value);
            }
            if let Some(ty) = annotation(&field.ty) {
                def.annotations.insert(name, ty);
            }
        }
    }
    def
}

fn doc_text(attrs: &[Attribute]) -> String {
    let mut lines = Vec::new();
    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let Meta::NameValue(meta) = &attr.meta {
            if let Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) = &meta.value
            {
                lines.push(lit.value().trim_start().to_owned());
            }
        }
    }
    lines.join("\n")
}

/// Reads the default value from a `#[config(default = <expr>)]` attribute.
fn default_value(attrs: &[Attribute]) -> Option<Value> {
    for attr in attrs {
        if !attr.path().is_ident("config") {
            continue;
        }
        let mut found = None;
        let outcome = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("default") {
                let expr: Expr = meta.value()?.parse()?;
                found = value_from_expr(&expr);
                Ok(())
            } else {
                Err(meta.error("unsupported config key"))
            }
        });
        if outcome.is_ok() {
            if let Some(value) = found {
                return Some(value);
            }
        }
    }
    None
}

fn value_from_expr(expr: &Expr) -> Option<Value> {
    match expr {
        Expr::Lit(ExprLit { lit, .. }) => value_from_lit(lit),
        Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
            match value_from_expr(&unary.expr)? {
                Value::Int(value) => Some(Value::Int(-value)),
                Value::Float(value) => Some(Value::Float(-value)),
                _ => None,
            }
        }
        Expr::Call(call) => instance_from_call(call),
        _ => None,
    }
}

fn value_from_lit(lit: &Lit) -> Option<Value> {
    match lit {
        Lit::Bool(value) => Some(Value::Bool(value.value())),
        Lit::Int(value) => value.base10_parse::<i64>().ok().map(Value::Int),
        Lit::Float(value) => value.base10_parse::<f64>().ok().map(Value::Float),
        Lit::Str(value) => Some(Value::Str(value.value())),
        _ => None,
    }
}

/// `path::to::Class::new()` or `path::to::Class::default()` defaults infer
/// an opaque instance of `Class` imported from module `path.to`.
fn instance_from_call(call: &ExprCall) -> Option<Value> {
    if !call.args.is_empty() {
        return None;
    }
    let Expr::Path(path) = call.func.as_ref() else {
        return None;
    };
    let segments: Vec<String> = path
        .path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();
    let [module_segments @ .., class, ctor] = segments.as_slice() else {
        return None;
    };
    if !matches!(ctor.as_str(), "new" | "default") || module_segments.is_empty() {
        return None;
    }
    Some(Value::Instance(Instance {
        class: class.clone(),
        module: module_segments.join("."),
    }))
}

/// Maps a written field type onto a type descriptor.
///
/// The infer placeholder `_` yields no declared entry; unsupported syntax is
/// skipped the same way.
fn annotation(ty: &Type) -> Option<TypeExpr> {
    match ty {
        Type::Infer(_) => None,
        Type::Paren(inner) => annotation(&inner.elem),
        Type::Path(path) => type_from_path(&path.path),
        _ => None,
    }
}

fn type_from_path(path: &syn::Path) -> Option<TypeExpr> {
    let last = path.segments.last()?;
    let name = last.ident.to_string();
    if let Some(primitive) = primitive_name(&name) {
        if !last.arguments.is_empty() {
            return None;
        }
        return Some(TypeExpr::Name(TypeName::builtin(primitive)));
    }
    match name.as_str() {
        "Option" => {
            let mut args = generic_args(&last.arguments)?;
            if args.len() != 1 {
                return None;
            }
            Some(TypeExpr::optional(args.remove(0)))
        }
        "Union" => {
            let args = generic_args(&last.arguments)?;
            if args.len() < 2 {
                return None;
            }
            Some(TypeExpr::Union(args))
        }
        "HashMap" | "BTreeMap" | "Dict" => {
            let mut args = generic_args(&last.arguments)?;
            if args.len() != 2 {
                return None;
            }
            let value = args.pop()?;
            let key = args.pop()?;
            Some(TypeExpr::Dict(Box::new(key), Box::new(value)))
        }
        "Vec" => {
            let args = generic_args(&last.arguments)?;
            if args.len() != 1 {
                return None;
            }
            Some(TypeExpr::Generic {
                origin: TypeName::builtin("list"),
                args,
            })
        }
        "Any" => last.arguments.is_empty().then_some(TypeExpr::Any),
        "None" | "NoneType" => last.arguments.is_empty().then_some(TypeExpr::None),
        _ => match &last.arguments {
            PathArguments::None => Some(TypeExpr::Name(named(&name, path))),
            PathArguments::AngleBracketed(_) => Some(TypeExpr::Generic {
                origin: named(&name, path),
                args: generic_args(&last.arguments)?,
            }),
            PathArguments::Parenthesized(_) => None,
        },
    }
}

fn named(name: &str, path: &syn::Path) -> TypeName {
    let prefix: Vec<String> = path
        .segments
        .iter()
        .take(path.segments.len().saturating_sub(1))
        .map(|segment| segment.ident.to_string())
        .collect();
    if prefix.is_empty() {
        TypeName::builtin(name)
    } else {
        TypeName::imported(name, &prefix.join("."))
    }
}

fn primitive_name(name: &str) -> Option<&'static str> {
    match name {
        "bool" => Some("bool"),
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => Some("int"),
        "f32" | "f64" => Some("float"),
        "str" | "String" => Some("str"),
        _ => None,
    }
}

fn generic_args(arguments: &PathArguments) -> Option<Vec<TypeExpr>> {
    let PathArguments::AngleBracketed(generics) = arguments else {
        return None;
    };
    let mut args = Vec::new();
    for arg in &generics.args {
        let GenericArgument::Type(ty) = arg else {
            return None;
        };
        args.push(annotation(ty)?);
    }
    Some(args)
}
