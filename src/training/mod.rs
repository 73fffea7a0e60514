//! Training configuration and the tree-induction machinery.

pub(crate) mod grower;
pub(crate) mod split;

use crate::error::InputError;

/// Which features a split search may consider.
///
/// `Sqrt` is the random-subspace policy: at every split search,
/// `max(1, floor(sqrt(n_features)))` features are sampled without
/// replacement. `All` considers every feature in index order and draws no
/// randomness at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureSubset {
    #[default]
    All,
    Sqrt,
}

impl FeatureSubset {
    /// Parse a policy name. Unrecognized names fall back to `All`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "sqrt" => FeatureSubset::Sqrt,
            _ => FeatureSubset::All,
        }
    }

    /// Number of features a split search considers under this policy.
    pub fn max_features(self, n_features: usize) -> usize {
        match self {
            FeatureSubset::All => n_features,
            FeatureSubset::Sqrt => ((n_features as f64).sqrt().floor() as usize).max(1),
        }
    }
}

/// Parameters for fitting a single decision tree.
#[derive(Debug, Clone, Copy)]
pub struct TreeParams {
    /// Feature-subset policy applied at every split search.
    pub feature_subset: FeatureSubset,
    /// Safety guard on recursion depth. `None` (the default) grows trees of
    /// unbounded, data-dependent depth; when set, exceeding it fails the fit
    /// with `Error::ResourceExceeded` instead of recursing further.
    pub depth_limit: Option<u32>,
    /// Seed for feature subsampling. Fits are deterministic for a fixed seed.
    pub seed: u64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            feature_subset: FeatureSubset::All,
            depth_limit: None,
            seed: 42,
        }
    }
}

/// Parameters for fitting a random-subspace forest.
///
/// Members always use [`FeatureSubset::Sqrt`]; every member trains on the
/// full sample set (there is no bootstrap resampling in this variant, only
/// per-split feature subsampling differs between members).
#[derive(Debug, Clone, Copy)]
pub struct ForestParams {
    /// Number of member trees. Must be positive.
    pub n_estimators: usize,
    /// Depth guard applied to every member, see [`TreeParams::depth_limit`].
    pub depth_limit: Option<u32>,
    /// Seed for the per-member RNG streams.
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            depth_limit: None,
            seed: 42,
        }
    }
}

impl ForestParams {
    /// Validate the parameter set.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.n_estimators == 0 {
            return Err(InputError::NoEstimators);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_falls_back_to_all() {
        assert_eq!(FeatureSubset::from_name("sqrt"), FeatureSubset::Sqrt);
        assert_eq!(FeatureSubset::from_name("all"), FeatureSubset::All);
        assert_eq!(FeatureSubset::from_name("log2"), FeatureSubset::All);
        assert_eq!(FeatureSubset::from_name(""), FeatureSubset::All);
    }

    #[test]
    fn sqrt_policy_floors_and_clamps() {
        assert_eq!(FeatureSubset::Sqrt.max_features(1), 1);
        assert_eq!(FeatureSubset::Sqrt.max_features(2), 1);
        assert_eq!(FeatureSubset::Sqrt.max_features(9), 3);
        assert_eq!(FeatureSubset::Sqrt.max_features(10), 3);
        assert_eq!(FeatureSubset::Sqrt.max_features(16), 4);
        assert_eq!(FeatureSubset::All.max_features(10), 10);
    }

    #[test]
    fn forest_params_reject_zero_estimators() {
        let params = ForestParams {
            n_estimators: 0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(InputError::NoEstimators));
        assert!(ForestParams::default().validate().is_ok());
    }
}
