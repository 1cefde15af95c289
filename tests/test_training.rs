//! Integration tests: stepwise logit, thresholds and pruned trees

use hotel_cancel::metrics::{evaluate, ClassificationMetrics};
use hotel_cancel::preprocessing::{DesignMatrix, Partition, TrainTestSplit};
use hotel_cancel::threshold::{pr_crossover_threshold, youden_threshold};
use hotel_cancel::training::{
    grid_search, post_prune, select_features, ClassWeight, Classifier, DecisionTree, GridSearchConfig, PruningConfig,
    SelectionConfig, TreeConfig,
};
use ndarray::{Array1, Array2};

/// 100 bookings, 20 cancellations. The 70 training rows overlap in
/// 40..60; the 30 held-out rows sit well on either side.
fn cancellation_split() -> TrainTestSplit {
    let mut x: Vec<f64> = Vec::new();
    let mut y: Vec<f64> = Vec::new();

    for v in 0..46 {
        x.push(v as f64);
        y.push(0.0);
    }
    for v in (41..60).step_by(2) {
        x.push(v as f64);
        y.push(0.0);
    }
    for v in (40..59).step_by(2) {
        x.push(v as f64);
        y.push(1.0);
    }
    for v in [70, 80, 90, 100] {
        x.push(v as f64);
        y.push(1.0);
    }
    for v in 0..24 {
        x.push(v as f64);
        y.push(0.0);
    }
    for v in (75..=100).step_by(5) {
        x.push(v as f64);
        y.push(1.0);
    }
    assert_eq!(x.len(), 100);

    let n = x.len();
    let data = Array2::from_shape_fn((n, 3), |(i, j)| match j {
        0 => 1.0,
        1 => x[i],
        _ => ((i * 7) % 5) as f64,
    });
    let design = DesignMatrix::new(vec!["const".into(), "lead_time".into(), "noise".into()], data).unwrap();
    let labels = Array1::from(y);

    let partition = Partition::from_indices(n, (0..70).collect(), (70..100).collect()).unwrap();
    TrainTestSplit::apply(&design, &labels, partition).unwrap()
}

#[test]
fn test_stepwise_keeps_predictive_feature() {
    let split = cancellation_split();
    assert_eq!(split.y_train.sum(), 14.0);
    assert_eq!(split.y_train.sum() + split.y_test.sum(), 20.0);

    let selection = select_features(&split.x_train, &split.y_train, &SelectionConfig::default()).unwrap();
    assert!(selection.selected.contains(&"lead_time".to_string()));
    assert!(selection.eliminated.len() <= 3);

    let model = selection.model.unwrap();
    assert!(model.p_values().iter().all(|&p| p <= 0.05));

    let metrics = evaluate(&model, &split.x_test, &split.y_test, 0.5).unwrap();
    assert!(metrics.f1 > 0.95, "held-out F1 = {}", metrics.f1);
}

#[test]
fn test_thresholds_from_training_probabilities() {
    let split = cancellation_split();
    let model = select_features(&split.x_train, &split.y_train, &SelectionConfig::default())
        .unwrap()
        .model
        .unwrap();
    let proba = model.predict_proba(&split.x_train).unwrap();

    let youden = youden_threshold(&proba, &split.y_train).unwrap();
    let crossover = pr_crossover_threshold(&proba, &split.y_train).unwrap();
    for t in [youden.threshold, crossover.threshold] {
        assert!(t > 0.0 && t < 1.0);
        // Every chosen cut-off is one of the scores
        assert!(proba.iter().any(|&p| p == t));
    }
    assert!(youden.criterion > 0.5);
}

#[test]
fn test_raising_threshold_trades_recall_for_precision() {
    let proba = Array1::from(vec![0.95, 0.8, 0.65, 0.55, 0.45, 0.35, 0.25, 0.6, 0.4, 0.2]);
    let y = Array1::from(vec![1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);

    let low = ClassificationMetrics::from_probabilities(&y, &proba, 0.3).unwrap();
    let high = ClassificationMetrics::from_probabilities(&y, &proba, 0.7).unwrap();
    assert!(high.recall < low.recall);
    assert!(high.precision >= low.precision);
}

#[test]
fn test_tree_variants_on_cancellation_data() {
    let split = cancellation_split().map_features(|x| x.select(&["lead_time".to_string(), "noise".to_string()]).unwrap());

    let baseline = DecisionTree::fit(&TreeConfig::default(), &split.x_train, &split.y_train).unwrap();
    let train_fit = evaluate(&baseline, &split.x_train, &split.y_train, 0.5).unwrap();
    // Only the three lead times shared by both classes can be misfit
    assert!(train_fit.accuracy > 0.9);

    let grid = GridSearchConfig {
        max_depth: vec![2, 4],
        max_leaf_nodes: vec![4, 8],
        min_samples_split: vec![2, 10],
        ..GridSearchConfig::default()
    };
    let searched = grid_search(&split.x_train, &split.y_train, &grid).unwrap();
    assert!(searched.model.depth() <= 4);
    assert!(searched.model.n_leaves() <= 8);

    let post = post_prune(&split, &PruningConfig::default()).unwrap();
    let balanced = TreeConfig::default().with_class_weight(ClassWeight::Balanced);
    let full = DecisionTree::fit(&balanced, &split.x_train, &split.y_train).unwrap();
    assert!(post.best.tree.node_count() <= full.node_count());
    let held_out = evaluate(&post.best.tree, &split.x_test, &split.y_test, 0.5).unwrap();
    assert_eq!(held_out.f1, post.scores[post.best_index].test_f1);
}
