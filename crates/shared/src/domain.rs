use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! seq_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

seq_newtype!(RequestSeq);

/// Label the classifier reports for an infected cell. Drives the positive accent.
pub const POSITIVE_LABEL: &str = "Parasitized";
pub const NEGATIVE_LABEL: &str = "Uninfected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosisLabel {
    Parasitized,
    Uninfected,
}

impl DiagnosisLabel {
    pub const ALL: [DiagnosisLabel; 2] = [DiagnosisLabel::Parasitized, DiagnosisLabel::Uninfected];

    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosisLabel::Parasitized => POSITIVE_LABEL,
            DiagnosisLabel::Uninfected => NEGATIVE_LABEL,
        }
    }
}

impl fmt::Display for DiagnosisLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Positive,
    Negative,
}

impl Accent {
    /// Binary split: anything other than the positive sentinel is styled clean.
    pub fn for_label(label: &str) -> Self {
        if label == POSITIVE_LABEL {
            Accent::Positive
        } else {
            Accent::Negative
        }
    }
}
