use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum ClassifierError {
    NotEnoughData(usize),
    SingleClass,
    FeatureMismatch { expected: Vec<String>, found: Vec<String> },
    Model(String),
    Io(String),
    Serde(String),
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierError::NotEnoughData(n) => {
                write!(f, "Not enough labelled listings to train on ({n})")
            }
            ClassifierError::SingleClass => {
                write!(f, "Training data needs both liked and not-liked listings")
            }
            ClassifierError::FeatureMismatch { expected, found } => write!(
                f,
                "Model was trained on [{}] but this build uses [{}]",
                found.join(", "),
                expected.join(", ")
            ),
            ClassifierError::Model(msg) => write!(f, "Model error: {msg}"),
            ClassifierError::Io(msg) => write!(f, "I/O error: {msg}"),
            ClassifierError::Serde(msg) => write!(f, "Model file error: {msg}"),
        }
    }
}

impl Error for ClassifierError {}
