//! Single decision tree classifier.

use ndarray::{Array1, ArrayView1, ArrayView2};

use crate::data::TrainingSet;
use crate::error::{Error, InputError};
use crate::repr::Tree;
use crate::training::grower::TreeGrower;
use crate::training::TreeParams;
use crate::utils::Parallelism;

/// A fitted axis-aligned decision tree.
///
/// Fitting grows a binary tree by recursively partitioning the training
/// samples on the `(feature, threshold)` cut that minimizes weighted child
/// Gini impurity. A node becomes a leaf when its range is pure, has a single
/// sample, or no cut strictly improves on its impurity; the leaf predicts
/// the majority class of its range.
///
/// Refitting with the same data, parameters, and seed yields an identical
/// tree regardless of [`Parallelism`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTreeClassifier {
    tree: Tree,
    n_features: usize,
    n_classes: usize,
}

impl DecisionTreeClassifier {
    /// Fit a tree to a sample-major feature matrix and label vector.
    ///
    /// # Errors
    ///
    /// Fails on empty or mismatched input, when a configured `depth_limit`
    /// is exceeded, or (indicating a library defect) on an internal
    /// invariant violation.
    pub fn fit<'a>(
        features: ArrayView2<'a, f64>,
        labels: ArrayView1<'a, usize>,
        params: &TreeParams,
        parallelism: Parallelism,
    ) -> Result<Self, Error> {
        let data = TrainingSet::new(features, labels)?;
        let grower = TreeGrower::new(data, params, parallelism);

        let mut samples: Vec<usize> = (0..data.n_samples()).collect();
        let tree = grower.grow(&mut samples, params.seed)?;

        Ok(Self {
            tree,
            n_features: data.n_features(),
            n_classes: data.n_classes(),
        })
    }

    /// Predict a class id for each row.
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<usize>, Error> {
        self.check_width(features.ncols())?;
        Ok(features
            .rows()
            .into_iter()
            .map(|row| self.tree.predict_row(row))
            .collect())
    }

    /// Predict the class id for a single row.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> Result<usize, Error> {
        self.check_width(row.len())?;
        Ok(self.tree.predict_row(row))
    }

    /// Fraction of rows predicted correctly.
    pub fn score(
        &self,
        features: ArrayView2<'_, f64>,
        labels: ArrayView1<'_, usize>,
    ) -> Result<f64, Error> {
        if features.nrows() == 0 {
            return Err(InputError::EmptyEvaluationSet.into());
        }
        if labels.len() != features.nrows() {
            return Err(InputError::LabelCountMismatch {
                labels: labels.len(),
                samples: features.nrows(),
            }
            .into());
        }
        let predictions = self.predict(features)?;
        let correct = predictions
            .iter()
            .zip(labels.iter())
            .filter(|(p, l)| p == l)
            .count();
        Ok(correct as f64 / features.nrows() as f64)
    }

    /// The underlying tree structure.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Feature count the model was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Class count the model was trained on.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn check_width(&self, got: usize) -> Result<(), Error> {
        if got != self.n_features {
            return Err(InputError::FeatureCountMismatch {
                expected: self.n_features,
                got,
            }
            .into());
        }
        Ok(())
    }
}
