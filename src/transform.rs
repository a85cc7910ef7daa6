use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::{Error, Result};
use crate::geometry::AffineTransform;


/// Largest allowed distance between the probability sum and 1.
pub const PROBABILITY_TOLERANCE: f64 = 1.0e-7;


const BARNSLEY: [(AffineTransform, f64); 4] = [
    // stem
    (AffineTransform::new(0.0, 0.0, 0.0, 0.16, 0.0, 0.0), 0.01),
    // successively smaller leaflets
    (AffineTransform::new(0.85, 0.04, -0.04, 0.85, 0.0, 1.6), 0.85),
    // largest left-hand leaflet
    (AffineTransform::new(0.20, -0.26, 0.23, 0.22, 0.0, 1.6), 0.07),
    // largest right-hand leaflet
    (AffineTransform::new(-0.15, 0.28, 0.26, 0.24, 0.0, 0.44), 0.07),
];


const LEAF_FIRST: [(AffineTransform, f64); 4] = [
    BARNSLEY[1],
    BARNSLEY[2],
    BARNSLEY[3],
    BARNSLEY[0],
];


const FISHBONE: [(AffineTransform, f64); 4] = [
    (AffineTransform::new(0.95, 0.002, -0.002, 0.93, -0.002, 0.5), 0.84),
    (AffineTransform::new(0.035, -0.11, 0.27, 0.01, -0.05, 0.005), 0.07),
    (AffineTransform::new(-0.04, 0.11, 0.27, 0.01, 0.047, 0.06), 0.07),
    (AffineTransform::new(0.0, 0.0, 0.0, 0.25, 0.0, -0.4), 0.02),
];


/// Built-in transform tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// The classical fern, stem map first.
    #[default]
    Barnsley,
    /// The classical maps with the stem map moved last.
    LeafFirst,
    Fishbone,
}


impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Barnsley, Preset::LeafFirst, Preset::Fishbone];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Barnsley => "barnsley",
            Preset::LeafFirst => "leaf-first",
            Preset::Fishbone => "fishbone",
        }
    }

    fn table(&self) -> &'static [(AffineTransform, f64)] {
        match self {
            Preset::Barnsley => &BARNSLEY,
            Preset::LeafFirst => &LEAF_FIRST,
            Preset::Fishbone => &FISHBONE,
        }
    }
}


impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}


#[derive(Error, Debug)]
#[error("unknown preset {0:?}, expected one of: barnsley, leaf-first, fishbone")]
pub struct UnknownPreset(pub String);


impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> std::result::Result<Preset, UnknownPreset> {
        Preset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownPreset(s.to_owned()))
    }
}


/// An ordered table of affine maps and their selection probabilities.
///
/// Construction does not check the distribution; call [`TransformSet::validate`]
/// (the engine always does) before driving generation with it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformSet {
    transforms: Vec<AffineTransform>,
    probabilities: Vec<f64>,
}


impl TransformSet {
    pub fn new(entries: Vec<(AffineTransform, f64)>) -> TransformSet {
        let (transforms, probabilities) = entries.into_iter().unzip();

        TransformSet {
            transforms,
            probabilities,
        }
    }

    pub fn preset(preset: Preset) -> TransformSet {
        TransformSet::new(preset.table().to_vec())
    }

    pub fn validate(&self) -> Result<()> {
        for (index, &probability) in self.probabilities.iter().enumerate() {
            if probability < 0.0 {
                return Err(Error::NegativeProbability { index, probability });
            }
        }

        let sum: f64 = self.probabilities.iter().sum();

        // written so that a NaN sum is rejected too
        if !((sum - 1.0).abs() <= PROBABILITY_TOLERANCE) {
            return Err(Error::InvalidDistribution { sum });
        }

        Ok(())
    }
}


impl TransformSet {
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transform(&self, index: usize) -> Option<&AffineTransform> {
        self.transforms.get(index)
    }

    pub fn probability(&self, index: usize) -> Option<f64> {
        self.probabilities.get(index).copied()
    }

    pub fn transforms(&self) -> &[AffineTransform] {
        &self.transforms
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn iter(&self) -> impl Iterator<Item = (&AffineTransform, f64)> + '_ {
        self.transforms.iter().zip(self.probabilities.iter().copied())
    }
}


impl Default for TransformSet {
    fn default() -> TransformSet {
        TransformSet::preset(Preset::Barnsley)
    }
}


#[cfg(test)]
mod tests {
    use super::{Preset, TransformSet};
    use crate::error::Error;
    use crate::geometry::AffineTransform;

    fn with_probabilities(probabilities: &[f64]) -> TransformSet {
        let identity = AffineTransform::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        TransformSet::new(probabilities.iter().map(|&p| (identity, p)).collect())
    }

    #[test]
    pub fn validate_sum_test() {
        assert!(with_probabilities(&[0.01, 0.85, 0.07, 0.07]).validate().is_ok());
        assert!(with_probabilities(&[1.0]).validate().is_ok());

        match with_probabilities(&[0.25, 0.25, 0.25, 0.2500001]).validate() {
            Err(Error::InvalidDistribution { sum }) => assert!(sum > 1.0),
            other => panic!("expected InvalidDistribution, got {:?}", other),
        }

        match with_probabilities(&[0.25, 0.25]).validate() {
            Err(Error::InvalidDistribution { sum }) => assert_eq!(sum, 0.5),
            other => panic!("expected InvalidDistribution, got {:?}", other),
        }
    }

    #[test]
    pub fn validate_rejects_negative_and_nan_test() {
        match with_probabilities(&[0.5, 0.7, -0.2]).validate() {
            Err(Error::NegativeProbability { index, probability }) => {
                assert_eq!(index, 2);
                assert_eq!(probability, -0.2);
            },
            other => panic!("expected NegativeProbability, got {:?}", other),
        }

        assert!(matches!(
            with_probabilities(&[0.5, f64::NAN, 0.5]).validate(),
            Err(Error::InvalidDistribution { .. })
        ));
        assert!(matches!(
            with_probabilities(&[]).validate(),
            Err(Error::InvalidDistribution { .. })
        ));
    }

    #[test]
    pub fn presets_are_valid_test() {
        for preset in Preset::ALL {
            let set = TransformSet::preset(preset);
            assert_eq!(set.len(), 4);
            set.validate().unwrap_or_else(|e| panic!("{preset} is invalid: {e}"));
        }
    }

    #[test]
    pub fn barnsley_order_test() {
        let set = TransformSet::default();
        assert_eq!(set.probabilities(), &[0.01, 0.85, 0.07, 0.07]);
        assert_eq!(set.transform(0).map(|t| t.d), Some(0.16));
        assert_eq!(set.transform(4), None);
        assert_eq!(set.probability(1), Some(0.85));
        assert_eq!(set.iter().map(|(_, p)| p).sum::<f64>(), 1.0);

        let leaf_first = TransformSet::preset(Preset::LeafFirst);
        assert_eq!(leaf_first.probabilities(), &[0.85, 0.07, 0.07, 0.01]);
        assert_eq!(leaf_first.transform(3), set.transform(0));
    }

    #[test]
    pub fn preset_names_test() {
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>().ok(), Some(preset));
        }
        assert_eq!(" Fishbone ".parse::<Preset>().ok(), Some(Preset::Fishbone));
        assert!("maple".parse::<Preset>().is_err());
    }
}
