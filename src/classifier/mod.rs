pub mod classify;
mod classifier_error;
pub mod dataset;
pub mod model;
pub mod train;

pub use classifier_error::ClassifierError;
pub use classify::{changed_predictions, classify, push_classifications};
pub use dataset::build_samples;
pub use model::ModelArtifact;
pub use train::{train_classifier, TrainingOptions};
