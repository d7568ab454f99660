use std::ops::Deref;

// Labels are opaque to the classifier; the decoder renders label bytes as decimal
pub type Label = String;

/// An immutable, fixed-length sequence of byte-valued features (e.g. pixel intensities).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureVector(Box<[u8]>);

impl FeatureVector {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for FeatureVector {
    fn from(bytes: Vec<u8>) -> Self {
        FeatureVector(bytes.into_boxed_slice())
    }
}

impl From<&[u8]> for FeatureVector {
    fn from(bytes: &[u8]) -> Self {
        FeatureVector(bytes.into())
    }
}

impl Deref for FeatureVector {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledFeatures {
    pub features: FeatureVector,
    pub label: Label,
}

impl LabeledFeatures {
    pub fn new(features: impl Into<FeatureVector>, label: impl Into<Label>) -> Self {
        LabeledFeatures {
            features: features.into(),
            label: label.into(),
        }
    }
}
