mod cli;

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sg_gir::{builtins, Diagnostics, Registry};
use sg_gir_generator::swift::GeneratorContext;
use sg_gir_generator::{output, pipeline};

/// Loads a plain name set: one name per line, `#` starts a comment.
fn read_name_set(path: Option<&Path>) -> anyhow::Result<HashSet<String>> {
    let Some(path) = path else {
        return Ok(HashSet::new());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();
    let diags = Diagnostics::new();
    let mut registry = Registry::new();
    builtins::register_builtins(&mut registry, &diags);

    // Preload phase: dependency documents populate the registry first, in
    // the order the caller supplied. A document that fails to load is fatal
    // for that document only.
    for path in &cli.preload {
        let loaded = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|text| {
                sg_gir::read_gir(&text, &mut registry, &diags).map_err(anyhow::Error::from)
            });
        if let Err(error) = loaded {
            diags.report(
                path.display().to_string(),
                format!("dependency document failed to load: {error:#}"),
            );
        }
    }

    let text = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let namespace = sg_gir::read_gir(&text, &mut registry, &diags)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;

    // Preload barrier: from here on the registry is read-only.
    let snapshot = registry.freeze();

    let exclusions = read_name_set(cli.exclusions.as_deref())?;
    let verbatim_constants = read_name_set(cli.verbatim_constants.as_deref())?;
    let ctx = GeneratorContext {
        snapshot: &snapshot,
        namespace: &namespace,
        diags: &diags,
        exclusions: &exclusions,
        verbatim_constants: &verbatim_constants,
    };

    let chunks = pipeline::generate(&ctx, cli.jobs);
    output::route(&chunks, &namespace.name, cli.output_dir.as_deref())?;

    for diagnostic in diags.entries() {
        eprintln!("warning: {diagnostic}");
    }
    Ok(())
}
