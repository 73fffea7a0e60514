//! Fitted classifiers.

mod forest;
mod tree;

pub use forest::RandomForestClassifier;
pub use tree::DecisionTreeClassifier;
