mod manifest;
mod serve;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use prax_core::{DependencyKind, Fragment, SystemId};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Prax systems-analysis toolchain.
#[derive(Parser)]
#[command(name = "prax", version, about = "Prax systems-analysis toolchain")]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a model bundle against the formal JSON Schema
    Validate {
        /// Path to the model bundle JSON file
        bundle: PathBuf,
    },

    /// Run the consistency checker over a model bundle
    Check {
        /// Path to the model bundle JSON file
        bundle: PathBuf,
        /// Comma-separated list of checks to run (refs,trees,loops,components). Default: all.
        #[arg(long)]
        checks: Option<String>,
        /// Exit 0 when only Warning diagnostics remain
        #[arg(long)]
        accept_warnings: bool,
    },

    /// Show the documentation filed under one system
    Fragments {
        /// Path to the model bundle JSON file
        bundle: PathBuf,
        /// System id to collect fragments for
        system: String,
    },

    /// Show the support-system dependency graph and its loops
    Graph {
        /// Path to the model bundle JSON file
        bundle: PathBuf,
    },

    /// Wrap a model bundle in a manifest envelope with a revision etag
    Manifest {
        /// Path to the model bundle JSON file
        bundle: PathBuf,
    },

    /// Start the Prax HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
        /// Path to TLS certificate PEM file (requires --tls-key)
        #[arg(long)]
        tls_cert: Option<PathBuf>,
        /// Path to TLS private key PEM file (requires --tls-cert)
        #[arg(long)]
        tls_key: Option<PathBuf>,
        /// Model bundle JSON files to pre-load
        #[arg()]
        models: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { bundle } => {
            cmd_validate(&bundle, cli.output, cli.quiet);
        }
        Commands::Check {
            bundle,
            checks,
            accept_warnings,
        } => {
            cmd_check(&bundle, checks.as_deref(), accept_warnings, cli.output, cli.quiet);
        }
        Commands::Fragments { bundle, system } => {
            cmd_fragments(&bundle, &system, cli.output, cli.quiet);
        }
        Commands::Graph { bundle } => {
            cmd_graph(&bundle, cli.output, cli.quiet);
        }
        Commands::Manifest { bundle } => {
            cmd_manifest(&bundle, cli.output, cli.quiet);
        }
        Commands::Serve {
            port,
            tls_cert,
            tls_key,
            models,
        } => {
            // Validate TLS flags: both must be provided or neither
            if tls_cert.is_some() != tls_key.is_some() {
                eprintln!("error: --tls-cert and --tls-key must both be provided");
                process::exit(1);
            }
            let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
            if let Err(e) = rt.block_on(serve::start_server(port, models, tls_cert, tls_key)) {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
    }
}

static MODEL_SCHEMA_STR: &str = include_str!("../../../schema/model-schema.json");

fn cmd_validate(bundle_path: &Path, output: OutputFormat, quiet: bool) {
    // Parse the embedded bundle schema
    let model_schema: serde_json::Value = match serde_json::from_str(MODEL_SCHEMA_STR) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("internal error: failed to parse embedded schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    // Read and parse the document file
    let doc_str = match std::fs::read_to_string(bundle_path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading '{}': {}", bundle_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc: serde_json::Value = match serde_json::from_str(&doc_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", bundle_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    // Auto-detect manifest envelopes via etag field presence
    let is_manifest = doc.get("etag").is_some();
    let doc_type = if is_manifest { "manifest" } else { "bundle" };

    let bundle_doc = if is_manifest {
        match doc.get("bundle") {
            Some(inner) => inner.clone(),
            None => {
                report_error("manifest missing 'bundle' field", output, quiet);
                process::exit(1);
            }
        }
    } else {
        doc.clone()
    };

    let validator = match jsonschema::validator_for(&model_schema) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("internal error: failed to compile schema: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let errors: Vec<String> = validator
        .iter_errors(&bundle_doc)
        .map(|e| format!("{}", e))
        .collect();

    if !errors.is_empty() {
        match output {
            OutputFormat::Text => {
                if !quiet {
                    eprintln!("invalid {}", doc_type);
                    for err in &errors {
                        eprintln!("  - {}", err);
                    }
                }
            }
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": false,
                    "type": doc_type,
                    "errors": errors
                });
                eprintln!(
                    "{}",
                    serde_json::to_string_pretty(&json).unwrap_or_default()
                );
            }
        }
        process::exit(1);
    }

    // Schema-valid: run the typed load, which enforces the construction
    // rules (duplicate ids, self-dependencies, tree top-node rules)
    let model = match prax_interchange::from_bundle(&bundle_doc) {
        Ok(m) => m,
        Err(e) => {
            let msg = format!("invalid {}: {}", doc_type, e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    // For manifests, the stored etag must match the canonical content
    if is_manifest {
        let canonical = match prax_interchange::to_bundle(&model.registry, &model.id) {
            Ok(v) => v,
            Err(e) => {
                let msg = format!("serialization error: {}", e);
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        };
        let expected = manifest::compute_etag(&canonical);
        let stored = doc.get("etag").and_then(|v| v.as_str()).unwrap_or("");
        if stored != expected {
            let msg = format!(
                "invalid manifest: etag '{}' does not match bundle content (expected '{}')",
                stored, expected
            );
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }

    if !quiet {
        match output {
            OutputFormat::Text => {
                if is_manifest {
                    println!("valid manifest");
                } else {
                    println!("valid");
                }
            }
            OutputFormat::Json => {
                if is_manifest {
                    println!("{{\"valid\": true, \"type\": \"manifest\"}}");
                } else {
                    println!("{{\"valid\": true}}");
                }
            }
        }
    }
}

fn cmd_check(
    bundle_path: &Path,
    checks: Option<&str>,
    accept_warnings: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let model = load_bundle(bundle_path, output, quiet);

    // Parse check selection
    let selected: Option<Vec<&str>> = checks.map(|c| {
        let selected: Vec<&str> = c.split(',').map(|s| s.trim()).collect();
        for s in &selected {
            if !prax_check::CHECKS.contains(s) {
                let msg = format!(
                    "invalid check '{}'. Valid: {}",
                    s,
                    prax_check::CHECKS.join(", ")
                );
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        }
        selected
    });

    let report = match &selected {
        None => prax_check::check(&model.registry),
        Some(names) => prax_check::check_selected(&model.registry, names),
    };

    if !quiet {
        match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|e| format!("{{\"error\": \"serialization: {}\"}}", e));
                println!("{}", json);
            }
            OutputFormat::Text => {
                println!("Consistency Report");
                println!("==================");
                println!();

                if let Some(ref refs) = report.refs {
                    println!(
                        "  References: {} resolved, {} dangling",
                        refs.resolved,
                        refs.dangling.len()
                    );
                }

                if let Some(ref trees) = report.trees {
                    let violations: usize = trees
                        .trees
                        .values()
                        .map(|t| t.dangling_children.len() + t.cut_set_violations.len())
                        .sum();
                    println!(
                        "  Fault Trees: {} tree(s), {} violation(s)",
                        trees.trees.len(),
                        violations
                    );
                }

                if let Some(ref loops) = report.loops {
                    let unresolved = loops
                        .cycles
                        .iter()
                        .filter(|c| c.resolved_by.is_none())
                        .count();
                    println!(
                        "  Dependency Loops: {} cycle(s), {} unresolved",
                        loops.cycles.len(),
                        unresolved
                    );
                }

                if let Some(ref components) = report.components {
                    let unjustified = components.shared.iter().filter(|s| !s.justified).count();
                    println!(
                        "  Shared Components: {} shared, {} without a common group tag",
                        components.shared.len(),
                        unjustified
                    );
                }

                println!();
                println!("Diagnostics:");

                if report.diagnostics.is_empty() {
                    println!("  No diagnostics.");
                } else {
                    for diag in &report.diagnostics {
                        let severity = match diag.severity {
                            prax_check::Severity::Error => "ERROR",
                            prax_check::Severity::Warning => "WARNING",
                        };
                        println!(
                            "  [{}/{}] {} ({}): {}",
                            diag.check, severity, diag.id, diag.rule, diag.message
                        );
                    }
                }
            }
        }
    }

    if report.has_errors() || (report.has_warnings() && !accept_warnings) {
        process::exit(1);
    }
}

fn cmd_fragments(bundle_path: &Path, system: &str, output: OutputFormat, quiet: bool) {
    let model = load_bundle(bundle_path, output, quiet);

    let system_id = SystemId::from(system);
    if model.registry.system(&system_id).is_none() {
        let msg = format!("unknown system '{}'", system);
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    let fragments = model.registry.fragments_for_system(&system_id);

    if quiet {
        return;
    }

    match output {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = fragments
                .iter()
                .map(|(category, fragment)| {
                    serde_json::json!({
                        "category": category.key(),
                        "fragment": fragment,
                    })
                })
                .collect();
            let json = serde_json::json!({
                "system": system,
                "fragments": entries,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            println!(
                "Documentation for {} ({} fragment(s)):",
                system,
                fragments.len()
            );
            for (category, fragment) in &fragments {
                println!("  [{}] {}", category.key(), fragment_display(fragment));
            }
        }
    }
}

/// Render a fragment on one line: prose as-is, structured as compact JSON.
fn fragment_display(fragment: &Fragment) -> String {
    match fragment {
        Fragment::Text(text) => text.clone(),
        Fragment::Structured(map) => serde_json::to_string(map).unwrap_or_default(),
    }
}

fn cmd_graph(bundle_path: &Path, output: OutputFormat, quiet: bool) {
    let model = load_bundle(bundle_path, output, quiet);

    let report = prax_check::check_selected(&model.registry, &["loops"]);
    let cycles = report.loops.map(|l| l.cycles).unwrap_or_default();

    if quiet {
        return;
    }

    match output {
        OutputFormat::Json => {
            let edges: Vec<serde_json::Value> = model
                .registry
                .dependencies()
                .map(|dep| {
                    serde_json::json!({
                        "id": dep.id,
                        "dependent": dep.dependent_system,
                        "supporting": dep.supporting_system,
                        "kind": kind_label(dep.kind),
                    })
                })
                .collect();
            let json = serde_json::json!({
                "edges": edges,
                "cycles": cycles,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            let edge_count = model.registry.dependencies().count();
            println!("Dependency graph ({} edge(s)):", edge_count);
            for dep in model.registry.dependencies() {
                println!(
                    "  {} -> {}  [{}]  ({})",
                    dep.dependent_system,
                    dep.supporting_system,
                    kind_label(dep.kind),
                    dep.id
                );
            }
            println!();
            println!("Loops:");
            if cycles.is_empty() {
                println!("  No loops.");
            } else {
                for cycle in &cycles {
                    let path = cycle.systems.join(" -> ");
                    match &cycle.resolved_by {
                        Some(resolution) => {
                            println!("  {}  (resolved by {})", path, resolution)
                        }
                        None => println!("  {}  (unresolved)", path),
                    }
                }
            }
        }
    }
}

/// Wire-format label for a dependency kind.
fn kind_label(kind: DependencyKind) -> &'static str {
    match kind {
        DependencyKind::Functional => "functional",
        DependencyKind::Spatial => "spatial",
        DependencyKind::Human => "human",
        DependencyKind::Other => "other",
    }
}

fn cmd_manifest(bundle_path: &Path, output: OutputFormat, quiet: bool) {
    let model = load_bundle(bundle_path, output, quiet);

    let canonical = match prax_interchange::to_bundle(&model.registry, &model.id) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("serialization error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let manifest_value = manifest::build_manifest(canonical);
    let pretty = serde_json::to_string_pretty(&manifest_value)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

/// Read, parse, and construct a model bundle from disk.
///
/// Exits with code 1 on read, parse, or construction failure, reporting
/// through `report_error` so `--output json` and `--quiet` are honored.
fn load_bundle(bundle_path: &Path, output: OutputFormat, quiet: bool) -> prax_interchange::ModelBundle {
    let bundle_str = match std::fs::read_to_string(bundle_path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading '{}': {}", bundle_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let doc: serde_json::Value = match serde_json::from_str(&bundle_str) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", bundle_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    match prax_interchange::from_bundle(&doc) {
        Ok(model) => model,
        Err(e) => {
            let msg = format!("error loading '{}': {}", bundle_path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
