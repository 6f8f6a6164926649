//! CLI entrypoint for `foliconf`.

mod cli;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use foliconf::discovery::{ModuleLoader, module_path};
use foliconf::emit::{render_stub, write_artifacts};
use foliconf::error::FoliconfError;
use foliconf::registry::SectionRegistry;
use foliconf::schema::build_schema;

use crate::cli::{Args, Command, GenArgs};

fn main() -> Result<(), FoliconfError> {
    let args = Args::parse();
    match args.command {
        Command::Gen(gen_args) => run_gen(&gen_args),
    }
}

fn run_gen(args: &GenArgs) -> Result<(), FoliconfError> {
    init_tracing(args.verbose);

    let root = match &args.root {
        Some(root) => root.clone(),
        None => parent_of(&args.base),
    };
    tracing::info!(root = %root, base = %args.base, "scanning for section declarations");

    let mut registry = SectionRegistry::new();
    let mut loader = ModuleLoader::new();
    let mut scanned = 0_usize;
    for path in collect_sources(&root) {
        scanned += 1;
        let source = std::fs::read_to_string(&path).map_err(|io_err| FoliconfError::Io {
            path: path.clone(),
            source: io_err,
        })?;
        let relative = path.strip_prefix(&root).unwrap_or(&path);
        let module = module_path(relative);
        if loader.scan_source(&module, &path, &source, &mut registry)? {
            tracing::debug!(module, file = %path, "registered sections");
        }
    }
    tracing::info!(
        scanned,
        sections = registry.len(),
        "discovery complete"
    );

    let schema = build_schema(&registry)?;
    let stub = render_stub(&schema, &args.base);
    let stub_path = write_artifacts(&args.base, &stub)?;
    tracing::info!(stub = %stub_path, module = %args.base, "artifacts written");
    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose {
        "foliconf=debug"
    } else {
        "foliconf=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parent_of(base: &Utf8Path) -> Utf8PathBuf {
    match base.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    }
}

/// Declaration candidates under `root` in sorted order, honouring ignore
/// files the way the surrounding tooling does.
fn collect_sources(root: &Utf8Path) -> Vec<Utf8PathBuf> {
    let mut sources: Vec<Utf8PathBuf> = ignore::WalkBuilder::new(root)
        .build()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_some_and(|kind| kind.is_file()))
        .filter_map(|entry| Utf8PathBuf::from_path_buf(entry.into_path()).ok())
        .filter(|path| path.extension() == Some("rs"))
        .collect();
    sources.sort();
    sources
}
