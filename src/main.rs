use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use chatlens::dashboard::build_dashboard;
use chatlens::labels::Labels;
use chatlens::renderer;
use chatlens::timerange::RangeSelector;
use chatlens::{logging, snapshot};

#[derive(Parser)]
#[command(name = "chatlens")]
#[command(about = "Build summaries and chart specs from a conversation analytics snapshot", long_about = None)]
struct Cli {
    /// Path to the snapshot JSON produced by the analysis backend
    #[arg(long)]
    snapshot: PathBuf,

    /// Rolling time window for the messages-per-day chart (7d, 30d, 3m, 6m, 1y, all)
    #[arg(long, default_value = "all")]
    range: String,

    /// Comma-separated output formats (md, json)
    #[arg(long, default_value = "md")]
    render: String,

    /// Optional JSON file with label overrides (string-to-string map)
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Output directory (defaults to current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Optional directory for log files
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.log_dir.as_deref())?;

    let content = std::fs::read_to_string(&cli.snapshot)
        .with_context(|| format!("Failed to read snapshot file: {}", cli.snapshot.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from: {}", cli.snapshot.display()))?;

    let mut labels = Labels::english();
    if let Some(ref path) = cli.labels {
        labels.merge(Labels::from_file(path)?);
    }

    let range = RangeSelector::parse(&cli.range);
    if !snapshot::is_valid_stats(&raw) {
        tracing::warn!("snapshot is empty or not an object, output will be the empty state");
    }

    let dashboard = build_dashboard(&raw, range, &labels);
    tracing::info!(
        charts = dashboard.charts.len(),
        range = range.as_str(),
        "dashboard built"
    );

    let output_dir = cli.output.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            output_dir.display()
        )
    })?;

    for format in cli.render.split(',').map(str::trim) {
        match format {
            "md" => {
                let markdown = renderer::md::render(&dashboard, &labels)?;
                let path = output_dir.join("chatlens-report.md");
                std::fs::write(&path, markdown)
                    .with_context(|| format!("Failed to write report: {}", path.display()))?;
                eprintln!("Markdown report written to: {}", path.display());
            }
            "json" => {
                let json = serde_json::to_string_pretty(&dashboard)?;
                let path = output_dir.join("chatlens-dashboard.json");
                std::fs::write(&path, json)
                    .with_context(|| format!("Failed to write dashboard: {}", path.display()))?;
                eprintln!("Dashboard JSON written to: {}", path.display());
            }
            "" => {}
            other => {
                eprintln!("Warning: Unknown format '{}', skipping", other);
            }
        }
    }

    Ok(())
}
