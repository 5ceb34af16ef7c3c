// src/classifier/train.rs

use crate::classifier::dataset::Sample;
use crate::classifier::model::{Logit, ModelArtifact, Scaler};
use crate::classifier::ClassifierError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::LogisticRegressionParameters;
use std::fmt;
use tracing::{info, warn};

/// Smallest train or test partition worth splitting for.
const MIN_PARTITION: usize = 4;

#[derive(Debug, Clone, Copy)]
pub struct TrainingOptions {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            test_fraction: 0.25,
            seed: 0,
        }
    }
}

/// Rows are actual, columns predicted: `[[tn, fp], [fn, tp]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(actual: &[bool], predicted: &[bool]) -> Self {
        let mut m = ConfusionMatrix::default();
        for (a, p) in actual.iter().zip(predicted) {
            match (a, p) {
                (false, false) => m.true_negative += 1,
                (false, true) => m.false_positive += 1,
                (true, false) => m.false_negative += 1,
                (true, true) => m.true_positive += 1,
            }
        }
        m
    }

    fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.true_positive + self.true_negative, self.total())
    }

    /// Zero when nothing was predicted positive.
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// Zero when there are no actual positives.
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }
}

impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[[{} {}]\n [{} {}]]",
            self.true_negative, self.false_positive, self.false_negative, self.true_positive
        )
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub samples: usize,
    pub train_size: usize,
    pub test_size: usize,
    /// False when the data was too small to hold anything out and the
    /// metrics describe the training set.
    pub held_out: bool,
    pub confusion: ConfusionMatrix,
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "samples: {} (train {}, test {}{})",
            self.samples,
            self.train_size,
            self.test_size,
            if self.held_out { "" } else { ", evaluated on training data" }
        )?;
        writeln!(f, "accuracy:  {:.3}", self.confusion.accuracy())?;
        writeln!(f, "precision: {:.3}", self.confusion.precision())?;
        writeln!(f, "recall:    {:.3}", self.confusion.recall())?;
        write!(f, "confusion matrix:\n{}", self.confusion)
    }
}

/// Shuffled (train, test) index split. Deterministic for a given seed.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_size = ((n as f64) * test_fraction.clamp(0.0, 1.0)).round() as usize;
    let train = indices.split_off(test_size);
    (train, indices)
}

fn has_both_classes(samples: &[&Sample]) -> bool {
    samples.iter().any(|s| s.label) && samples.iter().any(|s| !s.label)
}

fn fit(samples: &[&Sample]) -> Result<(Scaler, Logit), ClassifierError> {
    let rows: Vec<Vec<f64>> = samples.iter().map(|s| s.features.clone()).collect();
    let labels: Vec<i32> = samples.iter().map(|s| i32::from(s.label)).collect();

    let scaler = Scaler::fit(&rows);
    let x = DenseMatrix::from_2d_vec(&scaler.transform_all(&rows));
    let model = Logit::fit(&x, &labels, LogisticRegressionParameters::default())
        .map_err(|e| ClassifierError::Model(e.to_string()))?;
    Ok((scaler, model))
}

/// Fits a logistic regression on the samples and evaluates it on a held-out
/// split, or on the training data when there is too little to split.
pub fn train_classifier(
    samples: &[Sample],
    options: TrainingOptions,
) -> Result<(ModelArtifact, TrainingReport), ClassifierError> {
    if samples.len() < 2 {
        return Err(ClassifierError::NotEnoughData(samples.len()));
    }
    let all: Vec<&Sample> = samples.iter().collect();
    if !has_both_classes(&all) {
        return Err(ClassifierError::SingleClass);
    }

    let (train_idx, test_idx) = split_indices(samples.len(), options.test_fraction, options.seed);
    let train: Vec<&Sample> = train_idx.iter().map(|&i| &samples[i]).collect();
    let test: Vec<&Sample> = test_idx.iter().map(|&i| &samples[i]).collect();

    let held_out =
        train.len() >= MIN_PARTITION && test.len() >= MIN_PARTITION && has_both_classes(&train);

    let (train, test) = if held_out {
        (train, test)
    } else {
        warn!(
            samples = samples.len(),
            "Too little data for a held-out split, evaluating on training data"
        );
        (all.clone(), all)
    };

    info!(train = train.len(), test = test.len(), "Fitting logistic regression");
    let (scaler, model) = fit(&train)?;
    let artifact = ModelArtifact::new(scaler, model);

    let rows: Vec<Vec<f64>> = test.iter().map(|s| s.features.clone()).collect();
    let actual: Vec<bool> = test.iter().map(|s| s.label).collect();
    let predicted = artifact.predict(&rows)?;

    let report = TrainingReport {
        samples: samples.len(),
        train_size: train.len(),
        test_size: test.len(),
        held_out,
        confusion: ConfusionMatrix::from_predictions(&actual, &predicted),
    };
    info!(
        accuracy = report.confusion.accuracy(),
        precision = report.confusion.precision(),
        recall = report.confusion.recall(),
        "Training finished"
    );

    Ok((artifact, report))
}
