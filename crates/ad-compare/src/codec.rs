//! Label encoding reconciliation.
//!
//! Byte-native containers hand categorical labels back as raw byte strings,
//! text-native containers as decoded text. The codec is a strategy pair
//! supplied at the comparison call site: `to_canonical_text` turns a byte
//! label into canonical text, `from_canonical_text` re-encodes canonical
//! text into the byte representation for the reverse direction. The
//! identity codec carries neither function, so byte labels stay opaque and
//! fail to reconcile against text. That surfaces the mistake of validating
//! a byte-native backend without a codec as an explicit mismatch.

/// Strategy pair for reconciling label encodings.
#[derive(Debug, Clone, Copy)]
pub struct LabelCodec {
    /// Decode a byte label into canonical text. `None` in the decoded
    /// function's return means the bytes are not valid for the encoding.
    pub to_canonical_text: Option<fn(&[u8]) -> Option<String>>,
    /// Encode canonical text into the byte representation.
    pub from_canonical_text: Option<fn(&str) -> Vec<u8>>,
}

impl LabelCodec {
    /// No reconciliation: suits text-native backends, where labels already
    /// arrive as text and byte labels are treated as a mismatch.
    pub fn identity() -> Self {
        Self {
            to_canonical_text: None,
            from_canonical_text: None,
        }
    }

    /// UTF-8 reconciliation for byte-native backends.
    pub fn utf8() -> Self {
        Self {
            to_canonical_text: Some(|bytes| String::from_utf8(bytes.to_vec()).ok()),
            from_canonical_text: Some(|text| text.as_bytes().to_vec()),
        }
    }
}

impl Default for LabelCodec {
    fn default() -> Self {
        Self::identity()
    }
}
