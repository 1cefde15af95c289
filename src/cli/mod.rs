//! Command-line interface for the cancellation analysis

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::analysis::{self, ColumnType};
use crate::pipeline::{
    load_csv, run_on_frame, AnalysisSummary, LogitReport, PipelineConfig, PipelineReport, TreeReport, TreeSummary,
};
use crate::preprocessing::validate_bookings;
use crate::report::{render_confusion, VifTable};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

/// Print a multi-line table indented, with its first line muted
fn table(text: &str) {
    let mut lines = text.lines();
    if let Some(header) = lines.next() {
        println!("  {}", muted(header));
    }
    for line in lines {
        println!("  {}", line);
    }
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "hotel-cancel")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hotel booking cancellation modeling: stepwise logit and pruned decision trees")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full analysis
    Run {
        /// Booking CSV (overrides the config file)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// JSON pipeline configuration
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the JSON report here
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show schema, summary statistics and duplicates
    Info {
        /// Booking CSV
        #[arg(short, long)]
        data: PathBuf,
    },

    /// Logistic regression section only
    Logit {
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decision tree section only
    Tree {
        #[arg(short, long)]
        data: Option<PathBuf>,

        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the rules of the post-pruned tree down to this depth
        #[arg(long)]
        rules: Option<usize>,
    },
}

/// Config file (if any) with the data flag applied on top
pub fn resolve_config(data: Option<&Path>, config: Option<&Path>) -> anyhow::Result<PipelineConfig> {
    let mut resolved = match config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(path) = data {
        resolved.data_path = Some(path.to_path_buf());
    }
    if resolved.data_path.is_none() {
        anyhow::bail!("no data file given; pass --data or set data_path in the config");
    }
    Ok(resolved)
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run { data, config, output } => {
            let config = resolve_config(data.as_deref(), config.as_deref())?;
            cmd_run(&config, output.as_deref(), false)
        }
        Commands::Info { data } => cmd_info(&data),
        Commands::Logit { data, config, output } => {
            let config = resolve_config(data.as_deref(), config.as_deref())?.with_sections(true, false);
            cmd_run(&config, output.as_deref(), false)
        }
        Commands::Tree { data, config, output, rules } => {
            let mut config = resolve_config(data.as_deref(), config.as_deref())?.with_sections(false, true);
            if let Some(depth) = rules {
                config.rules_depth = depth;
            }
            cmd_run(&config, output.as_deref(), rules.is_some())
        }
    }
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_run(config: &PipelineConfig, output: Option<&Path>, show_rules: bool) -> anyhow::Result<()> {
    let Some(path) = config.data_path.as_deref() else {
        anyhow::bail!("no data file configured");
    };

    section("Cancellation analysis");

    step_run("Loading data");
    let start = Instant::now();
    let df = load_csv(path)?;
    step_done(&format!("{} rows × {} cols in {:?}", df.height(), df.width(), start.elapsed()));

    step_run("Running pipeline");
    let start = Instant::now();
    let report = run_on_frame(&df, config)?;
    step_done(&format!("{:?}", start.elapsed()));

    print_overview(&report);
    if let Some(logit) = &report.logit {
        print_logit(logit);
    }
    if let Some(trees) = &report.trees {
        print_trees(trees, show_rules);
    }

    if let Some(output) = output {
        report.save(output)?;
        println!();
        println!("  {} report written to {}", ok("✓"), output.display());
    }

    println!();
    Ok(())
}

pub fn cmd_info(data_path: &Path) -> anyhow::Result<()> {
    section("Data Info");

    let df = load_csv(data_path)?;

    println!("  {:<12} {}", muted("File"), data_path.display());
    println!("  {:<12} {}", muted("Rows"), df.height());
    println!("  {:<12} {}", muted("Columns"), df.width());
    println!("  {:<12} {}", muted("Duplicates"), analysis::duplicate_rows(&df)?);
    match validate_bookings(&df) {
        Ok(()) => println!("  {:<12} {}", muted("Schema"), ok("complete")),
        Err(e) => println!("  {:<12} {}", muted("Schema"), e.to_string().yellow()),
    }
    println!();

    println!(
        "  {:<38} {:>6} {:>10} {:>10} {:>10} {:>10}",
        muted("Column"),
        muted("Nulls"),
        muted("Mean"),
        muted("Std"),
        muted("Min"),
        muted("Max")
    );
    println!("  {}", dim(&"─".repeat(90)));

    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v));
    for col in analysis::describe(&df)? {
        match col.dtype {
            ColumnType::Numeric => println!(
                "  {:<38} {:>6} {:>10} {:>10} {:>10} {:>10}",
                col.name,
                col.null_count,
                fmt(col.mean),
                fmt(col.std),
                fmt(col.min),
                fmt(col.max)
            ),
            ColumnType::Categorical => {
                let top = col
                    .top
                    .as_ref()
                    .map_or_else(String::new, |(level, n)| format!("top {} ({})", level, n));
                println!(
                    "  {:<38} {:>6} {}",
                    col.name,
                    col.null_count,
                    muted(&format!("{} levels, {}", col.unique_count.unwrap_or(0), top))
                );
            }
        }
    }

    println!();
    Ok(())
}

// ─── Report printing ───────────────────────────────────────────────────────────

fn print_overview(report: &PipelineReport) {
    section("Data");
    let AnalysisSummary { rows, duplicates, .. } = &report.analysis;
    println!("  {:<20} {}", muted("Rows"), rows);
    println!("  {:<20} {}", muted("Duplicates"), duplicates);
    println!("  {:<20} {}", muted("Remapped values"), report.cleaning.remapped_values);
    if let Some(bounds) = &report.cleaning.price_bounds {
        println!(
            "  {:<20} {} {}",
            muted("Price whisker"),
            format!("{:.2}", bounds.upper),
            dim(&format!("({} capped)", report.cleaning.capped_values))
        );
    }
    println!("  {:<20} {:.2}%", muted("Cancellation rate"), report.cleaning.positive_rate * 100.0);
    println!("  {:<20} {}", muted("Features"), report.features.len());
    println!("  {:<20} {} / {}", muted("Train / test"), report.n_train, report.n_test);

    for tab in &report.analysis.crosstabs {
        section(&format!("{} × {}", tab.predictor, tab.target));
        println!("  {:<24} {:>8} {:>8} {:>8} {:>8}", muted("level"), muted("0"), muted("1"), muted("All"), muted("% 1"));
        for row in tab.rows.iter().chain(std::iter::once(&tab.totals)) {
            println!(
                "  {:<24} {:>8} {:>8} {:>8} {:>8.2}",
                row.level,
                row.counts[0],
                row.counts[1],
                row.total,
                row.proportions[1] * 100.0
            );
        }
    }
}

fn print_logit(logit: &LogitReport) {
    section("Logistic regression, all predictors");
    table(&logit.full_model.to_string());

    section("Variance inflation factors");
    table(&VifTable { rows: logit.vif.clone() }.to_string());

    section("Stepwise elimination");
    for step in &logit.eliminated {
        println!("  {} {:<40} {}", dim("−"), step.feature, muted(&format!("p = {:.4}", step.p_value)));
    }
    println!("  {} {} predictors kept", ok("✓"), logit.selected.len());

    section("Logistic regression, selected predictors");
    table(&logit.final_model.to_string());

    section("Odds");
    table(&logit.odds.to_string());

    section("Thresholds");
    for choice in &logit.thresholds {
        println!("  {:<16} {:.4}", muted(&choice.rule.to_string()), choice.threshold);
    }
    println!("  {:<16} {:.4} / {:.4}", muted("ROC AUC"), logit.roc_auc_train, logit.roc_auc_test);

    section("Comparison");
    table(&logit.train.to_string());
    println!();
    table(&logit.test.to_string());
    if let Some(best) = logit.test.best_by_f1() {
        println!();
        println!("  {}", muted("Test confusion matrix, best F1"));
        table(&render_confusion(&best.metrics.confusion));
    }
}

fn print_tree_summary(name: &str, tree: &TreeSummary) {
    println!(
        "  {:<30} {:>6} nodes {:>6} leaves  depth {:>3}",
        name, tree.node_count, tree.n_leaves, tree.depth
    );
}

fn print_trees(trees: &TreeReport, show_rules: bool) {
    section("Decision trees");
    print_tree_summary("Baseline", &trees.baseline);
    print_tree_summary("Pre-pruned", &trees.pre_pruned);
    print_tree_summary("Post-pruned", &trees.post_pruned);
    println!();
    println!(
        "  {:<30} depth {:?}, leaves {:?}, split {}  {}",
        muted("Grid best"),
        trees.best_params.max_depth,
        trees.best_params.max_leaf_nodes,
        trees.best_params.min_samples_split,
        dim(&format!("cv F1 {:.4} in {:.1}s", trees.best_cv_f1, trees.grid_secs))
    );
    println!("  {:<30} {:.6}", muted("Best alpha"), trees.best_alpha);

    section("Importances, post-pruned");
    for (name, importance) in trees.post_pruned.importances.iter().filter(|(_, v)| *v > 0.0) {
        println!("  {:<40} {:.4}", name, importance);
    }

    section("Comparison");
    table(&trees.train.to_string());
    println!();
    table(&trees.test.to_string());

    if show_rules {
        section("Post-pruned tree rules");
        for line in trees.rules.lines() {
            println!("  {}", line);
        }
    }
}
