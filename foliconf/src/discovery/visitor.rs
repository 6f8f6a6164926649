//! Syntax-tree visitor that detects section markers.

use syn::visit::Visit;
use syn::{Attribute, ItemStruct, LitStr};

/// Attribute name marking a struct as a configuration section.
pub(crate) const MARKER: &str = "config_section";

/// Visitor that records which struct declarations carry a well-formed
/// section marker.
#[derive(Debug, Default)]
pub struct SectionVisitor {
    matches: Vec<String>,
}

impl SectionVisitor {
    /// Creates a visitor with no matches recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any well-formed marker was seen.
    #[must_use]
    pub fn found_sections(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Dotted section paths found, in declaration order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.matches
    }
}

impl<'ast> Visit<'ast> for SectionVisitor {
    fn visit_item_struct(&mut self, item: &'ast ItemStruct) {
        if let Some(path) = marker_path(&item.attrs) {
            self.matches.push(path);
        }
        syn::visit::visit_item_struct(self, item);
    }
}

/// Extracts the dotted path from a well-formed section marker.
///
/// Markers with the wrong arity or a non-literal argument are treated as
/// non-matches, never as errors.
pub(crate) fn marker_path(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().find_map(|attr| {
        if !attr.path().is_ident(MARKER) {
            return None;
        }
        attr.parse_args::<LitStr>().ok().map(|lit| lit.value())
    })
}
