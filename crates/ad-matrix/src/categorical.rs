//! Dictionary-encoded categorical vectors.
//!
//! A categorical stores integer codes into a label dictionary. Code
//! assignment is an implementation detail of whichever container wrote the
//! data, so only the decoded label at each position is semantically
//! meaningful. Some container formats return the dictionary as raw byte
//! strings rather than text; the `Labels` enum keeps both representations
//! so the comparator can reconcile them explicitly.

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// The label dictionary of a categorical, in whichever representation the
/// producing backend yields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Labels {
    /// Decoded text labels (text-native backends, and freshly generated data).
    Text(Vec<String>),
    /// Raw byte-string labels (byte-native backends).
    Bytes(Vec<Vec<u8>>),
}

impl Labels {
    pub fn len(&self) -> usize {
        match self {
            Labels::Text(v) => v.len(),
            Labels::Bytes(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A dictionary-encoded categorical vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorical {
    codes: Vec<u32>,
    dictionary: Labels,
}

/// A single resolved label, borrowed from the dictionary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LabelRef<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
}

impl Categorical {
    /// Build from codes and a dictionary; every code must index into the
    /// dictionary.
    pub fn new(codes: Vec<u32>, dictionary: Labels) -> Result<Self, MatrixError> {
        let categorical = Self { codes, dictionary };
        categorical.validate()?;
        Ok(categorical)
    }

    /// Build a text categorical directly from per-position labels, deriving
    /// the dictionary from first occurrence order.
    pub fn from_labels(labels: &[&str]) -> Self {
        let mut dictionary: Vec<String> = Vec::new();
        let mut codes = Vec::with_capacity(labels.len());
        for &label in labels {
            let code = match dictionary.iter().position(|d| d == label) {
                Some(i) => i,
                None => {
                    dictionary.push(label.to_string());
                    dictionary.len() - 1
                }
            };
            codes.push(code as u32);
        }
        Self {
            codes,
            dictionary: Labels::Text(dictionary),
        }
    }

    /// Re-check that every code indexes into the dictionary. Used after
    /// deserialization, which bypasses [`Categorical::new`].
    pub fn validate(&self) -> Result<(), MatrixError> {
        let dictionary_len = self.dictionary.len();
        for &code in &self.codes {
            if code as usize >= dictionary_len {
                return Err(MatrixError::CodeOutOfRange {
                    code,
                    dictionary_len,
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[u32] {
        &self.codes
    }

    pub fn dictionary(&self) -> &Labels {
        &self.dictionary
    }

    /// Resolve the label at position `i`.
    pub fn label_at(&self, i: usize) -> LabelRef<'_> {
        let code = self.codes[i] as usize;
        match &self.dictionary {
            Labels::Text(v) => LabelRef::Text(&v[code]),
            Labels::Bytes(v) => LabelRef::Bytes(&v[code]),
        }
    }

    /// Re-encode the dictionary as raw byte strings through `encode`.
    /// Byte dictionaries are returned unchanged.
    pub fn to_byte_dictionary(&self, encode: fn(&str) -> Vec<u8>) -> Self {
        let dictionary = match &self.dictionary {
            Labels::Text(v) => Labels::Bytes(v.iter().map(|s| encode(s)).collect()),
            Labels::Bytes(v) => Labels::Bytes(v.clone()),
        };
        Self {
            codes: self.codes.clone(),
            dictionary,
        }
    }
}
