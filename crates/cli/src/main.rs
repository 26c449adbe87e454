use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use prefix_audit_core::{
    render_files, render_issues, render_markdown, render_summary, run_audit, AuditReport,
    NamingConvention, ScanOptions,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "prefix-audit",
    version,
    about = "Audit a folder tree of PDF documents against filename-prefix naming conventions (read-only)."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan a folder tree and report naming-convention issues.
    Audit(AuditArgs),
    /// Re-render a saved JSON report.
    Render(RenderArgs),
    /// Print or write the built-in naming convention as JSON.
    Convention(ConventionArgs),
}

#[derive(Debug, Copy, Clone, ValueEnum)]
enum View {
    Summary,
    Files,
    Issues,
    All,
    Markdown,
}

#[derive(Debug, Args)]
struct AuditArgs {
    /// Root folder to audit.
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Only look at documents directly inside PATH.
    #[arg(long)]
    no_recursive: bool,

    /// Naming convention JSON file. Defaults to the built-in convention.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the JSON report to this file.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Write a markdown report to this file.
    #[arg(long, value_name = "FILE")]
    md: Option<PathBuf>,

    /// What to print to stdout.
    #[arg(long, value_enum, default_value = "summary")]
    view: View,

    /// Log progress every N documents found.
    #[arg(long, default_value_t = 0, value_name = "N")]
    progress_every: usize,

    /// Exit with status 2 when issues are found.
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Args)]
struct RenderArgs {
    /// Input report file.
    #[arg(long, value_name = "FILE")]
    report: PathBuf,

    #[arg(long, value_enum, default_value = "all")]
    view: View,
}

#[derive(Debug, Args)]
struct ConventionArgs {
    /// Write to this file instead of stdout.
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Validate an existing convention file instead of printing the default.
    #[arg(long, value_name = "FILE", conflicts_with = "output")]
    check: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Audit(args) => run_audit_command(args),
        Commands::Render(args) => run_render_command(args),
        Commands::Convention(args) => run_convention_command(args),
    }
}

fn run_audit_command(args: AuditArgs) -> Result<()> {
    let convention = match &args.config {
        Some(path) => NamingConvention::load(path)
            .with_context(|| format!("failed to load naming convention {}", path.display()))?,
        None => NamingConvention::default(),
    };

    let options = ScanOptions {
        root: args.path.clone(),
        recursive: !args.no_recursive,
        convention,
        progress_every: args.progress_every,
    };
    let report = run_audit(&options)
        .with_context(|| format!("audit failed for {}", args.path.display()))?;

    print!("{}", render_view(&report, args.view));

    if let Some(output) = &args.output {
        let payload =
            serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        fs::write(output, payload)
            .with_context(|| format!("failed to write report to {}", output.display()))?;
        println!("Report written to {}", output.display());
    }

    if let Some(md_path) = &args.md {
        write_markdown(&report, md_path)?;
        println!("Markdown report written to {}", md_path.display());
    }

    if args.strict && !report.is_compliant() {
        info!("strict mode: issues found, exiting with status 2");
        std::process::exit(2);
    }
    Ok(())
}

fn run_render_command(args: RenderArgs) -> Result<()> {
    let data = fs::read_to_string(&args.report)
        .with_context(|| format!("failed to read {}", args.report.display()))?;
    let report: AuditReport = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", args.report.display()))?;
    print!("{}", render_view(&report, args.view));
    Ok(())
}

fn run_convention_command(args: ConventionArgs) -> Result<()> {
    if let Some(path) = args.check {
        let convention = NamingConvention::load(&path)
            .with_context(|| format!("invalid naming convention {}", path.display()))?;
        println!(
            "{} is valid: {} categories, {} prefixes, {} requirements.",
            path.display(),
            convention.categories.len(),
            convention.prefixes().count(),
            convention.requirements.len()
        );
        return Ok(());
    }

    let convention = NamingConvention::default();
    match args.output {
        Some(output) => {
            convention
                .save(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Naming convention written to {}", output.display());
        }
        None => {
            let payload = serde_json::to_string_pretty(&convention)
                .context("failed to serialize naming convention")?;
            println!("{payload}");
        }
    }
    Ok(())
}

fn render_view(report: &AuditReport, view: View) -> String {
    match view {
        View::Summary => render_summary(report),
        View::Files => render_files(report),
        View::Issues => render_issues(report),
        View::All => format!(
            "{}\n{}\n{}",
            render_summary(report),
            render_files(report),
            render_issues(report)
        ),
        View::Markdown => render_markdown(report),
    }
}

fn write_markdown(report: &AuditReport, path: &Path) -> Result<()> {
    fs::write(path, render_markdown(report))
        .with_context(|| format!("failed to write markdown report to {}", path.display()))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
