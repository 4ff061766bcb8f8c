use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use phasegen_codegen::{CodegenOptions, Emitter, ProjectGenerator};
use phasegen_core::{Config, Diagnostic, Report, Severity, StaticIdentityTables};
use phasegen_engine::{PhaseInputs, PipelineOutput, TableStatus};
use phasegen_incremental::{PhaseChain, PhasegenDatabase};

/// phasegen - phased schema transformation and record binding generator
#[derive(Parser)]
#[command(name = "phasegen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: phasegen.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every phase and write bindings, registries and copy scripts
    Build {
        /// Output file for the build report (default: project.report)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render everything but write neither sources nor the report
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the pass-through copy plan of each transition
    Plan {
        /// Only the transition into this phase
        #[arg(short, long)]
        phase: Option<u32>,

        /// Print plans as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show what changed between adjacent phases
    Diff {
        /// Only the transition into this phase
        #[arg(short, long)]
        phase: Option<u32>,
    },

    /// Show the tables and columns of one phase
    Show {
        /// Phase ordinal
        #[arg(short, long, default_value_t = 0)]
        phase: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_env("PHASEGEN_LOG").unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if Path::new("phasegen.toml").exists() {
        Config::from_file(Path::new("phasegen.toml")).context("Failed to load phasegen.toml")?
    } else {
        if cli.verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    tracing::debug!(
        project = %config.project.name,
        root = %config.project_root.display(),
        "loaded config"
    );

    if cli.verbose {
        eprintln!(
            "{} {} ({} phases)",
            "Using project".cyan(),
            config.project.name,
            config.phases.len()
        );
    }

    match cli.command {
        Commands::Build { output, dry_run } => build_command(&config, output.as_deref(), dry_run, cli.verbose),
        Commands::Plan { phase, json } => plan_command(&config, phase, json),
        Commands::Diff { phase } => diff_command(&config, phase),
        Commands::Show { phase } => show_command(&config, phase),
    }
}

/// Build command - pipeline, code generation and emission
fn build_command(config: &Config, output: Option<&Path>, dry_run: bool, verbose: bool) -> Result<()> {
    let report_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.resolve(&config.project.report));

    if verbose {
        eprintln!("{}", "Building phases...".cyan());
    }

    let pipeline = PhaseInputs::from_config(config).and_then(|inputs| inputs.build());
    let pipeline = match pipeline {
        Ok(pipeline) => pipeline,
        Err(err) => {
            let Some(diagnostic) = err.to_diagnostic() else {
                return Err(err).context("Phase pipeline failed");
            };
            return fail(report_path.as_path(), dry_run, diagnostic);
        }
    };

    let identity = StaticIdentityTables::new(config.identity_tables.clone());
    let generator = ProjectGenerator::new(CodegenOptions::from_config(config), &identity)?;

    if verbose {
        eprintln!("{}", "Generating bindings...".cyan());
    }

    let files = match generator.generate(&pipeline) {
        Ok(files) => files,
        Err(err) => return fail(report_path.as_path(), dry_run, err.to_diagnostic()),
    };

    let mut report = Report::from_diagnostics(pipeline.diagnostics());
    fill_summary(&mut report, &pipeline);

    if dry_run {
        println!("{}", "Dry run, nothing written:".yellow());
        for file in &files {
            println!("  {}", file.path.display());
        }
    } else {
        let output_dir = config.output_dir();
        let emitted = match Emitter::open(&output_dir).emit(&files) {
            Ok(emitted) => emitted,
            Err(err) => return fail(report_path.as_path(), dry_run, err.to_diagnostic()),
        };
        report.extend(emitted.to_diagnostics());
        report.summary.files_written = emitted.written.len();
        report.summary.files_unchanged = emitted.unchanged.len();

        if verbose {
            eprintln!("{} {}", "Wrote sources to:".cyan(), output_dir.display());
        }
    }

    if let Ok(previous) = Report::load_from_file(&report_path) {
        let changed = report.changed_phases(&previous);
        if changed.is_empty() {
            println!("{}", "No phase schema changed since the last build".dimmed());
        } else {
            let names: Vec<String> = changed.iter().map(|p| format!("phase{}", p)).collect();
            println!("{} {}", "Changed since the last build:".yellow(), names.join(", "));
        }
    }

    print_report_summary(&report, verbose);
    if !dry_run {
        report
            .save_to_file(&report_path)
            .with_context(|| format!("Failed to write report {}", report_path.display()))?;
        println!("\n{} {}", "Report saved to:".green(), report_path.display());
    }

    if report.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

fn fill_summary(report: &mut Report, pipeline: &PipelineOutput) {
    let summary = &mut report.summary;
    summary.phases_built = pipeline.phases.len();
    summary.tables_regenerated = pipeline.phases.first().map(|p| p.schema.len()).unwrap_or(0)
        + pipeline.diffs.iter().map(|d| d.regenerated().len()).sum::<usize>();
    summary.tables_copied = pipeline.copy_plans.iter().map(|p| p.len()).sum();
    report.fingerprints = pipeline.phases.iter().map(|p| p.schema.fingerprint()).collect();
}

/// Report holding one fatal diagnostic, saved when `report_path` is given
fn failure_report(report_path: Option<&Path>, diagnostic: Diagnostic) -> Result<Report> {
    let report = Report::from_diagnostics(vec![diagnostic]);
    if let Some(path) = report_path {
        report
            .save_to_file(path)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
    }
    Ok(report)
}

/// Print a fatal diagnostic and exit non-zero; a dry run writes no report
fn fail(report_path: &Path, dry_run: bool, diagnostic: Diagnostic) -> Result<()> {
    let report = failure_report((!dry_run).then_some(report_path), diagnostic)?;
    print_report_summary(&report, true);
    std::process::exit(1);
}

fn build_pipeline(config: &Config) -> Result<PipelineOutput> {
    let inputs = PhaseInputs::from_config(config).context("Failed to load phase inputs")?;
    inputs.build().context("Phase pipeline failed")
}

/// Plan command - tables copied unchanged into each phase
fn plan_command(config: &Config, phase: Option<u32>, json: bool) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let plans: Vec<_> = pipeline
        .copy_plans
        .iter()
        .filter(|plan| phase.map_or(true, |p| plan.to_phase == p))
        .collect();

    if plans.is_empty() {
        if let Some(p) = phase {
            anyhow::bail!("No transition into phase{}", p);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
        return Ok(());
    }

    for plan in plans {
        println!(
            "{}",
            format!("phase{} -> phase{}", plan.from_phase, plan.to_phase).bold().bright_blue()
        );
        if plan.is_empty() {
            println!("  {}", "nothing to copy".dimmed());
        }
        for instruction in &plan.instructions {
            println!(
                "  {} {} -> {}",
                instruction.table.green(),
                instruction.source,
                instruction.destination
            );
        }
        println!();
    }

    Ok(())
}

/// Diff command - added, dropped and reshaped tables per transition
fn diff_command(config: &Config, phase: Option<u32>) -> Result<()> {
    let pipeline = build_pipeline(config)?;
    let diffs: Vec<_> = match phase {
        Some(p) => vec![pipeline
            .diff_into(p)
            .with_context(|| format!("No transition into phase{}", p))?],
        None => pipeline.diffs.iter().collect(),
    };

    for diff in diffs {
        println!(
            "{}",
            format!("phase{} -> phase{}", diff.from_phase, diff.to_phase).bold().bright_blue()
        );
        for change in &diff.changes {
            let status = match change.status {
                TableStatus::Added => "added".green(),
                TableStatus::Dropped => "dropped".red(),
                TableStatus::Reshaped => "reshaped".yellow(),
                TableStatus::Unchanged => "unchanged".normal(),
            };
            let action = if change.regenerate {
                "regenerate".cyan()
            } else if change.status == TableStatus::Dropped {
                "".normal()
            } else {
                "copy".dimmed()
            };
            println!("  {:<32} {:<10} {}", change.table, status, action);
            for column in &change.columns {
                println!("      {}", column);
            }
        }
        println!();
    }

    Ok(())
}

/// Show command - one phase's schema, computed incrementally
fn show_command(config: &Config, ordinal: u32) -> Result<()> {
    let inputs = PhaseInputs::from_config(config).context("Failed to load phase inputs")?;
    let schema_path = config.resolve(&config.schema.path);
    let schema_json = std::fs::read_to_string(&schema_path)
        .with_context(|| format!("Failed to read {}", schema_path.display()))?;

    let db = PhasegenDatabase::default();
    let rules = inputs.transitions.into_iter().map(|(_, rules)| rules).collect();
    let chain = PhaseChain::new(&db, schema_json, rules);

    let schema = chain
        .schema(&db, ordinal)
        .with_context(|| format!("No phase{} (project has {} phases)", ordinal, chain.len()))?
        .map_err(anyhow::Error::msg)?;

    println!(
        "{} {} {}",
        format!("phase{}", ordinal).bold().bright_blue(),
        schema.name,
        schema.version
    );
    for table in schema.tables() {
        let marker = if table.newly_generated() { "*".yellow() } else { " ".normal() };
        println!("{} {} ({}, {})", marker, table.name.bold(), table.owner, table.provenance);
        for column in &table.columns {
            let marker = if column.newly_generated { "*".yellow() } else { " ".normal() };
            println!("    {} {:<32} {}", marker, column.name, column.data_type);
        }
    }

    Ok(())
}

fn colored_count(count: usize, severity: Severity) -> ColoredString {
    let text = count.to_string();
    match (count, severity) {
        (0, _) => text.green(),
        (_, Severity::Error) => text.red().bold(),
        (_, Severity::Warn) => text.yellow(),
        (_, Severity::Info) => text.normal(),
    }
}

/// Print the build report; info diagnostics only when verbose
fn print_report_summary(report: &Report, verbose: bool) {
    let rule = "=".repeat(60);
    println!("\n{}", rule.bright_blue());
    println!("{}", format!("phasegen build report v{}", report.version).bold().bright_blue());
    println!("{}", rule.bright_blue());
    println!("{}\n", report.timestamp.dimmed());

    let summary = &report.summary;
    println!("{}", "Phases:".bold());
    println!("  built         {}", summary.phases_built);
    println!("  regenerate    {} tables", summary.tables_regenerated);
    println!("  copy through  {} tables", summary.tables_copied);
    println!(
        "  files         {} written, {} unchanged",
        summary.files_written, summary.files_unchanged
    );
    println!();

    println!("{}", "Diagnostics:".bold());
    println!(
        "  {} errors, {} warnings, {} info",
        colored_count(summary.errors, Severity::Error),
        colored_count(summary.warnings, Severity::Warn),
        colored_count(summary.info, Severity::Info)
    );

    let shown = report
        .diagnostics
        .iter()
        .filter(|d| verbose || d.severity > Severity::Info);

    for diag in shown {
        let tag = match diag.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warn => "warn".yellow().bold(),
            Severity::Info => "info".cyan(),
        };
        println!("  [{}] {}: {}", tag, diag.code, diag.message);
        if let Some(location) = diag.location() {
            println!("      at {}", location.dimmed());
        }
    }

    if !report.has_errors() && summary.warnings == 0 {
        println!("\n{}", "✓ Build is clean".green().bold());
    }
}
