//! perfilar CLI - dataset profiling commands.
//!
//! Thin wrapper over the profiling modules: loads a dataset by file
//! extension, runs the requested analysis, and prints text or JSON.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};

use crate::{
    correlate::{correlation_matrix, top_categories},
    dataset::{ArrowDataset, Dataset},
    flags::QualityRules,
    missing::{missing_table, problematic_columns, MissingTable},
    summary::{flatten_summary, summarize_dataset},
};

/// perfilar - Tabular Dataset Profiling and Quality Assessment in Pure Rust
#[derive(Parser)]
#[command(name = "perfilar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-column summary statistics
    Summary {
        /// Path to dataset file
        path: PathBuf,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Missing-value table
    Missing {
        /// Path to dataset file
        path: PathBuf,
        /// Only show columns with missing share above this threshold
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Heuristic quality flags and score
    Quality {
        /// Path to dataset file
        path: PathBuf,
        /// Zero-share cutoff for numeric columns (0.0 to 1.0)
        #[arg(long)]
        zero_share_cutoff: Option<f64>,
        /// High-cardinality distinct-to-count ratio (0.0 to 1.0)
        #[arg(long)]
        high_cardinality_ratio: Option<f64>,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Pearson correlation among numeric columns
    Corr {
        /// Path to dataset file
        path: PathBuf,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Top categories of categorical columns
    Categories {
        /// Path to dataset file
        path: PathBuf,
        /// Maximum number of categorical columns to report
        #[arg(long, default_value = "5")]
        max_columns: usize,
        /// Number of top values per column
        #[arg(long, default_value = "10")]
        top_k: usize,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Full profiling report (summary, missing, quality, correlation,
    /// categories)
    Report {
        /// Path to dataset file
        path: PathBuf,
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

/// Parse arguments and run the requested command.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Summary { path, format } => cmd_summary(&path, &format),
        Commands::Missing {
            path,
            threshold,
            format,
        } => cmd_missing(&path, threshold, &format),
        Commands::Quality {
            path,
            zero_share_cutoff,
            high_cardinality_ratio,
            format,
        } => cmd_quality(&path, zero_share_cutoff, high_cardinality_ratio, &format),
        Commands::Corr { path, format } => cmd_corr(&path, &format),
        Commands::Categories {
            path,
            max_columns,
            top_k,
            format,
        } => cmd_categories(&path, max_columns, top_k, &format),
        Commands::Report { path, format } => cmd_report(&path, &format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load a dataset from a file path based on extension.
fn load_dataset(path: &Path) -> crate::Result<ArrowDataset> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match ext {
        "parquet" => ArrowDataset::from_parquet(path),
        "csv" => ArrowDataset::from_csv(path),
        "json" | "jsonl" => ArrowDataset::from_json(path),
        ext => Err(crate::Error::unsupported_format(ext)),
    }
}

fn cmd_summary(path: &Path, format: &str) -> crate::Result<()> {
    let dataset = load_dataset(path)?;
    let summary = summarize_dataset(&dataset)?;

    if format == "json" {
        println!("{}", to_json(&summary)?);
        return Ok(());
    }

    println!("Dataset Summary");
    println!("===============");
    println!("File: {}", path.display());
    println!("Rows: {}", summary.n_rows);
    println!("Columns: {}", summary.n_cols);
    println!();

    let table = flatten_summary(&summary);
    print_table(&table.columns, &table.rows);

    Ok(())
}

fn cmd_missing(path: &Path, threshold: Option<f64>, format: &str) -> crate::Result<()> {
    let dataset = load_dataset(path)?;
    let table = missing_table(&dataset);

    let table = match threshold {
        Some(t) => problematic_columns(&table, t)?,
        None => table,
    };

    if format == "json" {
        println!("{}", to_json(&table)?);
        return Ok(());
    }

    if table.is_empty() {
        println!("No columns to report");
        return Ok(());
    }

    print_missing(&table);
    Ok(())
}

fn cmd_quality(
    path: &Path,
    zero_share_cutoff: Option<f64>,
    high_cardinality_ratio: Option<f64>,
    format: &str,
) -> crate::Result<()> {
    let dataset = load_dataset(path)?;
    let summary = summarize_dataset(&dataset)?;
    let missing = missing_table(&dataset);

    let mut rules = QualityRules::new();
    if let Some(cutoff) = zero_share_cutoff {
        rules = rules.zero_share_cutoff(cutoff);
    }
    if let Some(ratio) = high_cardinality_ratio {
        rules = rules.high_cardinality_ratio(ratio);
    }

    let flags = rules.evaluate(&summary, &missing, &dataset)?;

    if format == "json" {
        println!("{}", to_json(&flags)?);
        return Ok(());
    }

    println!("Data Quality Report");
    println!("===================");
    println!("File: {}", path.display());
    println!("Rows: {}", summary.n_rows);
    println!("Columns: {}", summary.n_cols);
    println!();
    println!("Quality Score: {:.2}", flags.quality_score);
    println!();

    if flags.any_fired() {
        println!("Flags:");
        for name in flags.fired() {
            println!("  - {}", name);
        }
    } else {
        println!("\u{2713} No quality flags fired");
    }

    Ok(())
}

fn cmd_corr(path: &Path, format: &str) -> crate::Result<()> {
    let dataset = load_dataset(path)?;
    let matrix = correlation_matrix(&dataset)?;

    if format == "json" {
        println!("{}", to_json(&matrix)?);
        return Ok(());
    }

    if matrix.is_empty() {
        println!("Fewer than two numeric columns; nothing to correlate");
        return Ok(());
    }

    let mut headers: Vec<String> = vec![String::new()];
    headers.extend(matrix.columns().iter().cloned());

    let rows: Vec<Vec<String>> = matrix
        .columns()
        .iter()
        .zip(matrix.values())
        .map(|(name, row)| {
            let mut cells = vec![name.clone()];
            cells.extend(row.iter().map(|v| format!("{:.4}", v)));
            cells
        })
        .collect();

    print_table(&headers, &rows);
    Ok(())
}

fn cmd_categories(
    path: &Path,
    max_columns: usize,
    top_k: usize,
    format: &str,
) -> crate::Result<()> {
    let dataset = load_dataset(path)?;
    let report = top_categories(&dataset, max_columns, top_k)?;

    if format == "json" {
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    if report.is_empty() {
        println!("No categorical columns");
        return Ok(());
    }

    for table in report.tables() {
        println!("{}:", table.column);
        for row in &table.rows {
            println!("  {} ({})", row.value, row.count);
        }
        println!();
    }

    Ok(())
}

fn cmd_report(path: &Path, format: &str) -> crate::Result<()> {
    let dataset = load_dataset(path)?;
    let summary = summarize_dataset(&dataset)?;
    let missing = missing_table(&dataset);
    let flags = QualityRules::new().evaluate(&summary, &missing, &dataset)?;
    let matrix = correlation_matrix(&dataset)?;
    let categories = top_categories(&dataset, 5, 10)?;

    if format == "json" {
        let payload = serde_json::json!({
            "path": path.display().to_string(),
            "summary": summary,
            "missing": missing,
            "flags": flags,
            "correlation": matrix,
            "top_categories": categories,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload)
                .map_err(|e| crate::Error::invalid_config(e.to_string()))?
        );
        return Ok(());
    }

    println!("Profiling Report");
    println!("================");
    println!("File: {}", path.display());
    println!("Rows: {}", dataset.len());
    println!("Columns: {}", summary.n_cols);
    println!();

    let table = flatten_summary(&summary);
    print_table(&table.columns, &table.rows);
    println!();

    println!("Missing values");
    println!("--------------");
    print_missing(&missing);
    println!();

    println!("Quality Score: {:.2}", flags.quality_score);
    if flags.any_fired() {
        for name in flags.fired() {
            println!("  - {}", name);
        }
    }
    println!();

    if !matrix.is_empty() {
        println!("Correlation");
        println!("-----------");
        for (name, row) in matrix.columns().iter().zip(matrix.values()) {
            let cells: Vec<String> = row.iter().map(|v| format!("{:.4}", v)).collect();
            println!("  {}  {}", name, cells.join("  "));
        }
        println!();
    }

    for table in categories.tables() {
        println!("Top categories in {}:", table.column);
        for row in &table.rows {
            println!("  {} ({})", row.value, row.count);
        }
    }

    Ok(())
}

fn print_missing(table: &MissingTable) {
    let headers: Vec<String> = ["column", "missing_count", "missing_share"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();

    let rows: Vec<Vec<String>> = table
        .entries()
        .iter()
        .map(|e| {
            vec![
                e.column.clone(),
                e.missing_count.to_string(),
                format!("{:.4}", e.missing_share),
            ]
        })
        .collect();

    print_table(&headers, &rows);
}

/// Print rows as left-aligned columns padded to the widest cell.
fn print_table(headers: &[String], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if cell.len() > widths[i] {
                widths[i] = cell.len();
            }
        }
    }

    let render = |cells: &[String]| {
        cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{:<width$}", c, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", render(headers).trim_end());
    for row in rows {
        println!("{}", render(row).trim_end());
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> crate::Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| crate::Error::invalid_config(e.to_string()))
}
