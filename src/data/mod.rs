//! Validated feature/label store for training.
//!
//! A [`TrainingSet`] borrows the caller's feature matrix and label vector for
//! the duration of a fit. The matrix is sample-major (`[n_samples,
//! n_features]`) and never mutated; all training-time reordering happens in a
//! separate sample permutation (see the `training` module).

use ndarray::{ArrayView1, ArrayView2};

use crate::error::InputError;

/// Immutable training input plus derived metadata.
///
/// # Label convention
///
/// Labels are class ids assumed densely numbered `0..n_classes` where
/// `n_classes = max(label) + 1`. Ids that never occur simply widen the class
/// histograms and can never be predicted; they are not rejected.
#[derive(Debug, Clone, Copy)]
pub struct TrainingSet<'a> {
    features: ArrayView2<'a, f64>,
    labels: ArrayView1<'a, usize>,
    n_classes: usize,
}

impl<'a> TrainingSet<'a> {
    /// Validate shapes and derive the class count.
    ///
    /// # Errors
    ///
    /// Returns an [`InputError`] if the matrix has zero samples or zero
    /// features, or if the label count does not match the sample count.
    pub fn new(
        features: ArrayView2<'a, f64>,
        labels: ArrayView1<'a, usize>,
    ) -> Result<Self, InputError> {
        let n_samples = features.nrows();
        let n_features = features.ncols();

        if n_samples == 0 {
            return Err(InputError::NoSamples);
        }
        if n_features == 0 {
            return Err(InputError::NoFeatures);
        }
        if labels.len() != n_samples {
            return Err(InputError::LabelCountMismatch {
                labels: labels.len(),
                samples: n_samples,
            });
        }

        let n_classes = labels.iter().copied().max().unwrap_or(0) + 1;

        Ok(Self {
            features,
            labels,
            n_classes,
        })
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of features per sample.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Number of classes, `max(label) + 1`.
    #[inline]
    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Feature value for one sample.
    #[inline]
    pub fn feature(&self, sample: usize, feature: usize) -> f64 {
        self.features[[sample, feature]]
    }

    /// Class label for one sample.
    #[inline]
    pub fn label(&self, sample: usize) -> usize {
        self.labels[sample]
    }

    /// Count class occurrences over a set of sample ids.
    ///
    /// The returned histogram has length `n_classes`.
    pub fn class_histogram(&self, samples: &[usize]) -> Vec<u32> {
        let mut counts = vec![0u32; self.n_classes];
        for &s in samples {
            counts[self.labels[s]] += 1;
        }
        counts
    }
}
