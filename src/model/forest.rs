//! Random subspace forest classifier.

use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::{RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::data::TrainingSet;
use crate::error::{Error, InputError};
use crate::repr::Tree;
use crate::training::grower::TreeGrower;
use crate::training::split::majority_class;
use crate::training::{FeatureSubset, ForestParams, TreeParams};
use crate::utils::Parallelism;

/// An ensemble of decision trees decorrelated by random feature subspaces.
///
/// Every member trains on the full sample set (there is no bootstrap
/// resampling); diversity comes solely from each member restricting every
/// split search to a fresh random draw of `max(1, floor(sqrt(n_features)))`
/// features. Prediction is a per-row majority vote over the members, ties
/// breaking to the lowest class id.
///
/// Member seeds are drawn up front from a single stream seeded by the forest
/// seed, so the ensemble is identical whether members are fitted
/// sequentially or in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestClassifier {
    members: Vec<Tree>,
    n_features: usize,
    n_classes: usize,
}

impl RandomForestClassifier {
    /// Fit `n_estimators` trees to the same training data.
    ///
    /// # Errors
    ///
    /// Fails on empty or mismatched input, on `n_estimators == 0`, or when
    /// a configured `depth_limit` trips in any member.
    pub fn fit<'a>(
        features: ArrayView2<'a, f64>,
        labels: ArrayView1<'a, usize>,
        params: &ForestParams,
        parallelism: Parallelism,
    ) -> Result<Self, Error> {
        params.validate()?;
        let data = TrainingSet::new(features, labels)?;

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(params.seed);
        let seeds: Vec<u64> = (0..params.n_estimators).map(|_| rng.next_u64()).collect();

        // Parallelism is spent across members; each member builds its tree
        // sequentially so per-member determinism is trivial.
        let tree_params = TreeParams {
            feature_subset: FeatureSubset::Sqrt,
            depth_limit: params.depth_limit,
            seed: 0,
        };
        let members = parallelism
            .maybe_par_map(seeds, move |seed| {
                let grower = TreeGrower::new(data, &tree_params, Parallelism::Sequential);
                let mut samples: Vec<usize> = (0..data.n_samples()).collect();
                grower.grow(&mut samples, seed)
            })
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            members,
            n_features: data.n_features(),
            n_classes: data.n_classes(),
        })
    }

    /// Predict a class id for each row by majority vote over the members.
    pub fn predict(&self, features: ArrayView2<'_, f64>) -> Result<Array1<usize>, Error> {
        self.check_width(features.ncols())?;
        Ok(features
            .rows()
            .into_iter()
            .map(|row| self.vote(row))
            .collect())
    }

    /// Predict the class id for a single row.
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> Result<usize, Error> {
        self.check_width(row.len())?;
        Ok(self.vote(row))
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

    /// Number of member trees.
    pub fn n_estimators(&self) -> usize {
        self.members.len()
    }

    /// The fitted member trees.
    pub fn members(&self) -> &[Tree] {
        &self.members
    }

    /// Feature count the ensemble was trained on.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Class count the ensemble was trained on.
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn vote(&self, row: ArrayView1<'_, f64>) -> usize {
        let mut votes = vec![0u32; self.n_classes];
        for tree in &self.members {
            votes[tree.predict_row(row)] += 1;
        }
        majority_class(&votes)
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
