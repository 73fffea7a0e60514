//! End-to-end decision tree training tests.

use foresters::testing::{clustered_classes, uniform_noise};
use foresters::{DecisionTreeClassifier, Error, InputError, Parallelism, TreeParams, ROOT};
use ndarray::array;
use rstest::rstest;

#[test]
fn fits_a_fully_separable_four_class_problem() {
    let x = array![[5.0, 3.0], [2.0, 4.0], [9.0, 7.0], [1.0, 8.0]];
    let y = array![0usize, 1, 2, 3];

    let model = DecisionTreeClassifier::fit(
        x.view(),
        y.view(),
        &TreeParams::default(),
        Parallelism::Sequential,
    )
    .unwrap();

    model.tree().validate().unwrap();
    assert_eq!(model.tree().n_leaves(), 4);
    assert_eq!(model.predict(x.view()).unwrap(), y);
    assert_eq!(model.score(x.view(), y.view()).unwrap(), 1.0);
}

#[test]
fn identical_rows_with_conflicting_labels_become_one_leaf() {
    // No threshold can tell these rows apart; training must terminate with
    // a single leaf holding the mixed histogram.
    let x = array![[1.0, 1.0], [1.0, 1.0]];
    let y = array![0usize, 1];

    let model = DecisionTreeClassifier::fit(
        x.view(),
        y.view(),
        &TreeParams::default(),
        Parallelism::Sequential,
    )
    .unwrap();

    let tree = model.tree();
    assert_eq!(tree.n_nodes(), 1);
    assert_eq!(tree.leaf_histogram(ROOT), Some(&[1u32, 1][..]));
    assert_eq!(tree.leaf_prediction(ROOT), Some(0));
}

#[test]
fn a_single_sample_fits_to_one_leaf() {
    let x = array![[3.0, 1.0]];
    let y = array![2usize];

    let model = DecisionTreeClassifier::fit(
        x.view(),
        y.view(),
        &TreeParams::default(),
        Parallelism::Sequential,
    )
    .unwrap();

    assert_eq!(model.tree().n_nodes(), 1);
    assert_eq!(model.predict_row(x.row(0)).unwrap(), 2);
    assert_eq!(model.n_classes(), 3);
}

#[rstest]
#[case::sequential(Parallelism::Sequential)]
#[case::parallel(Parallelism::Parallel)]
fn refitting_reproduces_the_same_tree(#[case] parallelism: Parallelism) {
    let (x, y) = uniform_noise(600, 6, 3, 19);
    let params = TreeParams::default();

    let a = DecisionTreeClassifier::fit(x.view(), y.view(), &params, parallelism).unwrap();
    let b = DecisionTreeClassifier::fit(x.view(), y.view(), &params, parallelism).unwrap();

    assert_eq!(a, b);
}

#[test]
fn parallel_and_sequential_fits_are_identical() {
    // Wide enough to cross the parallel split-search and subtree cutoffs.
    let (x, y) = uniform_noise(2000, 8, 4, 23);
    let params = TreeParams::default();

    let seq =
        DecisionTreeClassifier::fit(x.view(), y.view(), &params, Parallelism::Sequential).unwrap();
    let par =
        DecisionTreeClassifier::fit(x.view(), y.view(), &params, Parallelism::Parallel).unwrap();

    assert_eq!(seq, par);
    seq.tree().validate().unwrap();
}

#[test]
fn stored_leaf_histograms_match_the_routed_training_samples() {
    let (x, y) = uniform_noise(300, 4, 3, 5);

    let model = DecisionTreeClassifier::fit(
        x.view(),
        y.view(),
        &TreeParams::default(),
        Parallelism::Sequential,
    )
    .unwrap();
    let tree = model.tree();

    // Replay every training row through the fitted tree and rebuild each
    // leaf's histogram from scratch.
    let mut routed: std::collections::HashMap<_, Vec<u32>> = std::collections::HashMap::new();
    for (row, &label) in y.iter().enumerate() {
        let leaf = tree.traverse_to_leaf(x.row(row));
        routed
            .entry(leaf)
            .or_insert_with(|| vec![0; model.n_classes()])[label] += 1;
    }

    for (leaf, counts) in routed {
        assert_eq!(tree.leaf_histogram(leaf), Some(&counts[..]));
    }
}

#[test]
fn unlimited_training_leaves_are_pure_or_inseparable() {
    let (x, y) = clustered_classes(4, 20, 3, 13);

    let model = DecisionTreeClassifier::fit(
        x.view(),
        y.view(),
        &TreeParams::default(),
        Parallelism::Sequential,
    )
    .unwrap();

    // Separable clusters: every leaf must be pure and the fit exact.
    let tree = model.tree();
    for node in 0..tree.n_nodes() as u32 {
        if let Some(histogram) = tree.leaf_histogram(node) {
            let nonzero = histogram.iter().filter(|&&c| c > 0).count();
            assert_eq!(nonzero, 1);
        }
    }
    assert_eq!(model.score(x.view(), y.view()).unwrap(), 1.0);
}

#[test]
fn depth_limit_aborts_training_with_resource_exceeded() {
    let (x, y) = uniform_noise(100, 3, 2, 3);
    let params = TreeParams {
        depth_limit: Some(1),
        ..TreeParams::default()
    };

    let err = DecisionTreeClassifier::fit(x.view(), y.view(), &params, Parallelism::Sequential)
        .unwrap_err();
    assert_eq!(err, Error::ResourceExceeded { limit: 1 });
}

#[test]
fn generous_depth_limit_does_not_trip() {
    let x = array![[0.0], [1.0], [10.0], [11.0]];
    let y = array![0usize, 0, 1, 1];
    let params = TreeParams {
        depth_limit: Some(8),
        ..TreeParams::default()
    };

    let model =
        DecisionTreeClassifier::fit(x.view(), y.view(), &params, Parallelism::Sequential).unwrap();
    assert_eq!(model.score(x.view(), y.view()).unwrap(), 1.0);
}

#[test]
fn fit_accepts_views_with_different_borrow_scopes() {
    // The fitted model owns its tree outright: it must outlive both input
    // borrows, even when the feature and label arrays live in different
    // scopes.
    let y = array![0usize, 1];
    let model = {
        let x = array![[0.0], [5.0]];
        DecisionTreeClassifier::fit(
            x.view(),
            y.view(),
            &TreeParams::default(),
            Parallelism::Sequential,
        )
        .unwrap()
    };
    assert_eq!(model.predict_row(array![4.0].view()).unwrap(), 1);
}

#[test]
fn rejects_empty_and_mismatched_inputs() {
    let empty_x = ndarray::Array2::<f64>::zeros((0, 2));
    let empty_y = ndarray::Array1::<usize>::zeros(0);
    assert_eq!(
        DecisionTreeClassifier::fit(
            empty_x.view(),
            empty_y.view(),
            &TreeParams::default(),
            Parallelism::Sequential
        )
        .unwrap_err(),
        Error::InvalidInput(InputError::NoSamples)
    );

    let x = array![[1.0], [2.0]];
    let y = array![0usize];
    assert_eq!(
        DecisionTreeClassifier::fit(
            x.view(),
            y.view(),
            &TreeParams::default(),
            Parallelism::Sequential
        )
        .unwrap_err(),
        Error::InvalidInput(InputError::LabelCountMismatch {
            labels: 1,
            samples: 2
        })
    );
}
