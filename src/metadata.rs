use itertools::{Either, Itertools};

use crate::error::{PathwayError, Result};

/// Group assignment of every sample
///
/// Sample ids are unique and keep the order in which they were supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleMetadata {
    samples: Vec<(String, String)>,
}
impl SampleMetadata {
    /// Create metadata from `(sample_id, group_label)` pairs
    pub fn new(samples: Vec<(String, String)>) -> Result<Self> {
        if let Some(duplicate) = samples.iter().map(|(id, _)| id).duplicates().next() {
            return Err(PathwayError::DuplicateLabel(duplicate.clone()));
        }
        if samples.iter().any(|(id, _)| id.is_empty()) {
            return Err(PathwayError::InvalidValue("empty sample id".to_string()));
        }
        Ok(Self { samples })
    }

    pub fn from_pairs<I, S, L>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(s, l)| (s.into(), l.into()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.samples.iter().map(|(s, l)| (s.as_str(), l.as_str()))
    }

    pub fn label_of(&self, sample_id: &str) -> Option<&str> {
        self.iter()
            .find(|(s, _)| *s == sample_id)
            .map(|(_, l)| l)
    }

    /// Split the samples into `(reference, treatment)` ids
    ///
    /// Reference samples carry `reference_label`; every other label is a
    /// treatment sample. Both lists keep metadata order.
    pub fn partition(&self, reference_label: &str) -> (Vec<&str>, Vec<&str>) {
        self.iter().partition_map(|(sample, label)| {
            if label == reference_label {
                Either::Left(sample)
            } else {
                Either::Right(sample)
            }
        })
    }
}
