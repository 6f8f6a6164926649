//! Unit tests for marker detection, definition extraction and loading.

use camino::Utf8Path;
use rstest::rstest;
use syn::visit::Visit;

use super::{ModuleLoader, SectionVisitor, module_path};
use crate::error::FoliconfError;
use crate::registry::SectionRegistry;
use crate::type_expr::{TypeExpr, TypeName};
use crate::value::{Instance, Value};

fn parse(source: &str) -> syn::File {
    syn::parse_file(source).expect("fixture parses")
}

const HTTP_SECTION: &str = r#"
/// Settings for the HTTP listener.
///
/// # Attributes
///
/// * `port` - TCP port the server binds.
#[config_section("net.http")]
struct HttpConfig {
    #[config(default = 8080)]
    port: _,
    timeout: Option<f64>,
}
"#;

#[test]
fn detects_marked_structs() {
    let file = parse(HTTP_SECTION);
    let mut visitor = SectionVisitor::new();
    visitor.visit_file(&file);
    assert_eq!(visitor.paths(), ["net.http"]);
}

#[rstest]
#[case::wrong_arity("#[config_section(\"a\", \"b\")]\nstruct S { x: i64 }")]
#[case::non_literal("#[config_section(name)]\nstruct S { x: i64 }")]
#[case::no_arguments("#[config_section]\nstruct S { x: i64 }")]
fn malformed_markers_are_not_matches(#[case] source: &str) {
    let file = parse(source);
    let mut visitor = SectionVisitor::new();
    visitor.visit_file(&file);
    assert!(!visitor.found_sections());
}

#[test]
fn loads_definitions_with_defaults_and_annotations() {
    let file = parse(HTTP_SECTION);
    let mut registry = SectionRegistry::new();
    let mut loader = ModuleLoader::new();
    let loaded = loader
        .scan("net.http_decl", &file, &mut registry)
        .expect("scan succeeds");
    assert!(loaded);

    let def = registry.get("net.http").expect("section registered");
    assert_eq!(def.name, "HttpConfig");
    assert_eq!(def.module, "net.http_decl");
    assert_eq!(def.defaults.get("port"), Some(&Value::Int(8080)));
    assert!(def.annotations.get("port").is_none(), "placeholder type declares nothing");
    assert_eq!(
        def.annotations.get("timeout"),
        Some(&TypeExpr::optional(TypeExpr::Name(TypeName::builtin(
            "float"
        ))))
    );
    assert!(def.doc.contains("# Attributes"));
}

#[test]
fn loading_is_idempotent_per_module_path() {
    let file = parse(HTTP_SECTION);
    let mut registry = SectionRegistry::new();
    let mut loader = ModuleLoader::new();
    assert!(loader.scan("net.http_decl", &file, &mut registry).expect("first scan"));
    assert!(!loader.scan("net.http_decl", &file, &mut registry).expect("second scan"));
    assert_eq!(registry.len(), 1);
}

#[test]
fn files_without_markers_are_never_loaded() {
    let file = parse("struct Plain { x: i64 }\nfn helper() {}");
    let mut registry = SectionRegistry::new();
    let mut loader = ModuleLoader::new();
    assert!(!loader.scan("plain", &file, &mut registry).expect("scan succeeds"));
    assert!(registry.is_empty());
}

#[test]
fn duplicate_paths_across_modules_fail() {
    let first = parse("#[config_section(\"db\")]\nstruct DbConfig { url: String }");
    let second = parse("#[config_section(\"db\")]\nstruct Database { url: String }");
    let mut registry = SectionRegistry::new();
    let mut loader = ModuleLoader::new();
    loader.scan("storage.db_decl", &first, &mut registry).expect("first scan");
    let err = loader
        .scan("storage.alt_decl", &second, &mut registry)
        .expect_err("duplicate path must fail");
    assert!(matches!(err, FoliconfError::DuplicateSection { .. }));
}

#[test]
fn constructor_defaults_infer_instances() {
    let file = parse(
        "#[config_section(\"jobs\")]\nstruct Jobs {\n    #[config(default = net::util::Timeout::new())]\n    timeout: _,\n}",
    );
    let mut registry = SectionRegistry::new();
    let mut loader = ModuleLoader::new();
    loader.scan("jobs_decl", &file, &mut registry).expect("scan");

    let def = registry.get("jobs").expect("section registered");
    assert_eq!(
        def.defaults.get("timeout"),
        Some(&Value::Instance(Instance {
            class: "Timeout".to_owned(),
            module: "net.util".to_owned(),
        }))
    );
}

#[test]
fn annotation_mapping_handles_containers() {
    let file = parse(
        "#[config_section(\"db\")]\nstruct DbConfig {\n    labels: HashMap<String, i64>,\n    hosts: Vec<String>,\n    extra: Any,\n    mode: Union<i64, str, None>,\n    handle: storage::Pool,\n}",
    );
    let mut registry = SectionRegistry::new();
    let mut loader = ModuleLoader::new();
    loader.scan("db_decl", &file, &mut registry).expect("scan");

    let def = registry.get("db").expect("section registered");
    let rendered: Vec<(String, String)> = def
        .annotations
        .iter()
        .map(|(name, ty)| (name.clone(), ty.render()))
        .collect();
    assert_eq!(
        rendered,
        [
            ("extra".to_owned(), "Any".to_owned()),
            ("handle".to_owned(), "Pool".to_owned()),
            ("hosts".to_owned(), "list[str]".to_owned()),
            ("labels".to_owned(), "Dict[str, int]".to_owned()),
            ("mode".to_owned(), "Union[int, str, None]".to_owned()),
        ]
    );
}

#[test]
fn negated_defaults_keep_their_sign() {
    let file = parse(
        "#[config_section(\"limits\")]\nstruct Limits {\n    #[config(default = -1)]\n    cap: _,\n}",
    );
    let mut registry = SectionRegistry::new();
    let mut loader = ModuleLoader::new();
    loader.scan("limits_decl", &file, &mut registry).expect("scan");
    let def = registry.get("limits").expect("section registered");
    assert_eq!(def.defaults.get("cap"), Some(&Value::Int(-1)));
}

#[rstest]
#[case("net/http_decl.rs", "net.http_decl")]
#[case("top.rs", "top")]
#[case("a/b/c.rs", "a.b.c")]
fn module_paths_join_segments_with_dots(#[case] relative: &str, #[case] expected: &str) {
    assert_eq!(module_path(Utf8Path::new(relative)), expected);
}

#[test]
fn parse_failures_name_the_file() {
    let mut registry = SectionRegistry::new();
    let mut loader = ModuleLoader::new();
    let err = loader
        .scan_source(
            "broken",
            Utf8Path::new("src/broken.rs"),
            "struct {",
            &mut registry,
        )
        .expect_err("invalid syntax must fail");
    assert!(matches!(err, FoliconfError::Parse { .. }));
    assert!(err.to_string().contains("src/broken.rs"));
}
