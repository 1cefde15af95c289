//! End-to-end run: load, clean, encode, split, model, compare

use crate::analysis::{self, ColumnSummary, CorrelationMatrix, Crosstab};
use crate::error::{CancelError, Result};
use crate::metrics::{evaluate, roc_auc};
use crate::preprocessing::{
    validate_bookings, CleaningSummary, DataPreparer, OneHotEncoder, TrainTestSplit, train_test_split,
};
use crate::report::{CoefficientTable, ComparisonTable, OddsTable};
use crate::threshold::{pr_crossover_threshold, youden_threshold, ThresholdChoice};
use crate::training::{
    grid_search, post_prune, select_features, variance_inflation_factors, AlphaScore, Classifier, DecisionTree,
    EliminationStep, LogitModel, TreeConfig, VifRow,
};
use super::config::PipelineConfig;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Exploratory tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub duplicates: usize,
    pub crosstabs: Vec<Crosstab>,
    /// Pearson correlations of the cleaned numeric columns
    pub correlation: CorrelationMatrix,
}

/// Logistic regression section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogitReport {
    pub full_model: CoefficientTable,
    pub vif: Vec<VifRow>,
    pub selected: Vec<String>,
    pub eliminated: Vec<EliminationStep>,
    pub final_model: CoefficientTable,
    pub odds: OddsTable,
    pub thresholds: Vec<ThresholdChoice>,
    pub roc_auc_train: f64,
    pub roc_auc_test: f64,
    pub train: ComparisonTable,
    pub test: ComparisonTable,
}

/// Size and importances of one fitted tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSummary {
    pub node_count: usize,
    pub n_leaves: usize,
    pub depth: usize,
    pub importances: Vec<(String, f64)>,
}

impl TreeSummary {
    pub fn from_tree(tree: &DecisionTree) -> Self {
        Self {
            node_count: tree.node_count(),
            n_leaves: tree.n_leaves(),
            depth: tree.depth(),
            importances: tree.ranked_importances(),
        }
    }
}

/// Decision tree section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeReport {
    pub baseline: TreeSummary,
    pub pre_pruned: TreeSummary,
    pub best_params: TreeConfig,
    pub best_cv_f1: f64,
    pub grid_secs: f64,
    pub post_pruned: TreeSummary,
    pub best_alpha: f64,
    pub alpha_scores: Vec<AlphaScore>,
    /// Text rules of the post-pruned tree
    pub rules: String,
    pub train: ComparisonTable,
    pub test: ComparisonTable,
}

/// Everything a run produces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport {
    pub analysis: AnalysisSummary,
    pub cleaning: CleaningSummary,
    pub features: Vec<String>,
    pub n_train: usize,
    pub n_test: usize,
    pub logit: Option<LogitReport>,
    pub trees: Option<TreeReport>,
    pub duration_secs: f64,
}

impl PipelineReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// Read a booking CSV with a header row
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CancelError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(1000))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    info!(path = %path.display(), rows = df.height(), cols = df.width(), "Loaded data");
    Ok(df)
}

/// Summaries of the raw frame plus outcome crosstabs of the cleaned one
pub fn analyze(raw: &DataFrame, cleaned: &DataFrame, config: &PipelineConfig) -> Result<AnalysisSummary> {
    let target = &config.cleaning.target_column;
    let mut crosstabs = Vec::with_capacity(config.crosstab_columns.len());
    for predictor in &config.crosstab_columns {
        if cleaned.column(predictor).is_err() {
            warn!(%predictor, "Crosstab column missing, skipped");
            continue;
        }
        crosstabs.push(analysis::crosstab(cleaned, predictor, target)?);
    }

    Ok(AnalysisSummary {
        rows: raw.height(),
        columns: analysis::describe(raw)?,
        duplicates: analysis::duplicate_rows(raw)?,
        crosstabs,
        correlation: analysis::correlation_matrix(cleaned)?,
    })
}

/// Full logit, VIF, stepwise selection, thresholds and their comparison
pub fn run_logit(split: &TrainTestSplit, config: &PipelineConfig) -> Result<LogitReport> {
    let split = split.map_features(|x| x.with_intercept());

    let full = LogitModel::fit(&split.x_train, &split.y_train, &config.selection.logit)?;
    let vif = variance_inflation_factors(&split.x_train)?;
    info!(
        features = full.n_params(),
        pseudo_r2 = full.pseudo_r2(),
        "Fitted full logit"
    );

    let selection = select_features(&split.x_train, &split.y_train, &config.selection)?;
    let model = selection
        .model
        .ok_or_else(|| CancelError::ValidationError("stepwise selection eliminated every predictor".to_string()))?;

    let proba_train = model.predict_proba(&split.x_train)?;
    let proba_test = model.predict_proba(&split.x_test)?;
    let thresholds = vec![
        ThresholdChoice::default_cutoff(),
        youden_threshold(&proba_train, &split.y_train)?,
        pr_crossover_threshold(&proba_train, &split.y_train)?,
    ];
    for choice in &thresholds[1..] {
        info!(rule = %choice.rule, threshold = choice.threshold, "Selected threshold");
    }

    let mut train = ComparisonTable::new("Logistic regression, training performance");
    let mut test = ComparisonTable::new("Logistic regression, test performance");
    for choice in &thresholds {
        let name = format!("Logit-{:.2} ({})", choice.threshold, choice.rule);
        train.push(name.clone(), evaluate(&model, &split.x_train, &split.y_train, choice.threshold)?);
        test.push(name, evaluate(&model, &split.x_test, &split.y_test, choice.threshold)?);
    }

    Ok(LogitReport {
        full_model: CoefficientTable::from_model(&full),
        vif,
        selected: selection.selected,
        eliminated: selection.eliminated,
        final_model: CoefficientTable::from_model(&model),
        odds: OddsTable::from_model(&model),
        thresholds,
        roc_auc_train: roc_auc(&proba_train, &split.y_train)?,
        roc_auc_test: roc_auc(&proba_test, &split.y_test)?,
        train,
        test,
    })
}

/// Baseline, grid-searched and cost-complexity pruned trees
pub fn run_trees(split: &TrainTestSplit, config: &PipelineConfig) -> Result<TreeReport> {
    let threshold = config.pruning.threshold;

    let baseline = DecisionTree::fit(&TreeConfig::default(), &split.x_train, &split.y_train)?;
    info!(nodes = baseline.node_count(), depth = baseline.depth(), "Fitted baseline tree");

    let grid = grid_search(&split.x_train, &split.y_train, &config.grid)?;
    let post = post_prune(split, &config.pruning)?;

    let models: [(&str, &DecisionTree); 3] = [
        ("Decision Tree", &baseline),
        ("Decision Tree (Pre-Pruning)", &grid.model),
        ("Decision Tree (Post-Pruning)", &post.best.tree),
    ];
    let mut train = ComparisonTable::new("Decision trees, training performance");
    let mut test = ComparisonTable::new("Decision trees, test performance");
    for (name, tree) in models {
        train.push(name, evaluate(tree, &split.x_train, &split.y_train, threshold)?);
        test.push(name, evaluate(tree, &split.x_test, &split.y_test, threshold)?);
    }

    Ok(TreeReport {
        baseline: TreeSummary::from_tree(&baseline),
        pre_pruned: TreeSummary::from_tree(&grid.model),
        best_params: grid.best().config,
        best_cv_f1: grid.best().mean_f1,
        grid_secs: grid.duration_secs,
        post_pruned: TreeSummary::from_tree(&post.best.tree),
        best_alpha: post.best.alpha,
        rules: post.best.tree.export_text(config.rules_depth),
        alpha_scores: post.scores,
        train,
        test,
    })
}

/// Run every configured stage on an in-memory frame
pub fn run_on_frame(raw: &DataFrame, config: &PipelineConfig) -> Result<PipelineReport> {
    let start = Instant::now();
    if config.require_schema {
        validate_bookings(raw)?;
    }

    let (cleaned, cleaning) = DataPreparer::new(config.cleaning.clone()).prepare(raw)?;
    let analysis = analyze(raw, &cleaned, config)?;

    let mut encoder = OneHotEncoder::new();
    let (x, y) = encoder.fit_transform(&cleaned, &config.cleaning.target_column)?;
    let split = train_test_split(&x, &y, &config.split)?;
    info!(
        features = x.ncols(),
        train = split.y_train.len(),
        test = split.y_test.len(),
        "Encoded and split"
    );

    let logit = if config.run_logit {
        Some(run_logit(&split, config)?)
    } else {
        None
    };
    let trees = if config.run_trees {
        Some(run_trees(&split, config)?)
    } else {
        None
    };

    let duration_secs = start.elapsed().as_secs_f64();
    info!(duration_secs, "Pipeline finished");

    Ok(PipelineReport {
        analysis,
        cleaning,
        features: x.columns,
        n_train: split.y_train.len(),
        n_test: split.y_test.len(),
        logit,
        trees,
        duration_secs,
    })
}

/// Load the configured CSV and run every configured stage
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    let path = config
        .data_path
        .as_ref()
        .ok_or_else(|| CancelError::ConfigError("no data path configured".to_string()))?;
    let raw = load_csv(path)?;
    run_on_frame(&raw, config)
}
