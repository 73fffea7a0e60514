//! Decision tree and random forest classifiers.
//!
//! `foresters` trains axis-aligned CART-style classification trees with a
//! sort-accelerated Gini split search, and combines them into random
//! subspace forests. The library is built around three guarantees:
//!
//! - **Determinism**: fitting with the same data, parameters, and seed
//!   produces an identical model, sequentially or in parallel.
//! - **Minimal allocation during training**: the feature matrix is never
//!   copied; nodes work on disjoint ranges of one sample permutation,
//!   reordered in place.
//! - **Explicit failure**: every invalid input, tripped resource guard, and
//!   internal inconsistency surfaces as a typed [`Error`], never a panic.
//!
//! # Example
//!
//! ```
//! use foresters::{DecisionTreeClassifier, Parallelism, TreeParams};
//! use ndarray::array;
//!
//! let x = array![[5.0, 3.0], [2.0, 4.0], [9.0, 7.0], [1.0, 8.0]];
//! let y = array![0usize, 1, 2, 3];
//!
//! let model = DecisionTreeClassifier::fit(
//!     x.view(),
//!     y.view(),
//!     &TreeParams::default(),
//!     Parallelism::Sequential,
//! )?;
//! assert_eq!(model.score(x.view(), y.view())?, 1.0);
//! # Ok::<(), foresters::Error>(())
//! ```

pub mod data;
pub mod error;
pub mod model;
pub mod repr;
pub mod testing;
pub mod training;
pub mod utils;

pub use data::TrainingSet;
pub use error::{Error, InputError};
pub use model::{DecisionTreeClassifier, RandomForestClassifier};
pub use repr::{NodeId, Tree, TreeValidationError, ROOT};
pub use training::{FeatureSubset, ForestParams, TreeParams};
pub use utils::{run_with_threads, Parallelism};
