use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

/// Numeric training set: one row of `records` per sample, one target each.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Array2<f64>,
    targets: Array1<f64>,
    feature_names: Vec<String>,
}

impl Dataset {
    pub fn new(records: Array2<f64>, targets: Array1<f64>) -> Result<Dataset> {
        if records.nrows() != targets.len() {
            return Err(Error::ShapeMismatch {
                expected: records.nrows(),
                actual: targets.len(),
            });
        }
        let feature_names = (0..records.ncols()).map(|i| format!("feature-{}", i)).collect();
        Ok(Dataset {
            records,
            targets,
            feature_names,
        })
    }

    pub fn with_feature_names<S: Into<String>>(mut self, names: Vec<S>) -> Result<Dataset> {
        if names.len() != self.records.ncols() {
            return Err(Error::ShapeMismatch {
                expected: self.records.ncols(),
                actual: names.len(),
            });
        }
        self.feature_names = names.into_iter().map(Into::into).collect();
        Ok(self)
    }

    pub fn records(&self) -> &Array2<f64> {
        &self.records
    }

    pub fn targets(&self) -> &Array1<f64> {
        &self.targets
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    pub fn nfeatures(&self) -> usize {
        self.records.ncols()
    }

    /// Shuffle the samples with a seeded generator and split them in two.
    /// The first part holds `ratio` of the samples, rounded to the nearest row.
    pub fn split_with_ratio(&self, ratio: f64, seed: u64) -> Result<(Dataset, Dataset)> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(Error::InvalidParameter(format!(
                "split ratio must lie in [0, 1], got {}",
                ratio
            )));
        }
        let mut idx: Vec<usize> = (0..self.nsamples()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        idx.shuffle(&mut rng);

        let n_first = (self.nsamples() as f64 * ratio).round() as usize;
        let (first, second) = idx.split_at(n_first);
        Ok((self.select(first), self.select(second)))
    }

    fn select(&self, idx: &[usize]) -> Dataset {
        Dataset {
            records: self.records.select(Axis(0), idx),
            targets: self.targets.select(Axis(0), idx),
            feature_names: self.feature_names.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sample() -> Dataset {
        let records = Array2::from_shape_fn((10, 2), |(i, j)| (i * 2 + j) as f64);
        let targets = Array1::from_shape_fn(10, |i| i as f64);
        Dataset::new(records, targets)
            .unwrap()
            .with_feature_names(vec!["departure", "arrival"])
            .unwrap()
    }

    #[test]
    fn new_rejects_mismatched_targets() {
        let err = Dataset::new(array![[1.0], [2.0]], array![1.0]).unwrap_err();

        assert!(matches!(err, Error::ShapeMismatch { expected: 2, actual: 1 }));
    }

    #[test]
    fn split_with_ratio_partitions_samples() {
        let dataset = sample();
        let (train, test) = dataset.split_with_ratio(0.7, 24).unwrap();

        assert_eq!(train.nsamples(), 7);
        assert_eq!(test.nsamples(), 3);
        assert_eq!(train.feature_names(), dataset.feature_names());

        let mut seen: Vec<f64> = train.targets().iter().chain(test.targets()).cloned().collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(seen, dataset.targets().to_vec());

        // records stay aligned with their targets
        for (row, target) in train.records().outer_iter().zip(train.targets()) {
            assert_eq!(row[0], target * 2.0);
        }
    }

    #[test]
    fn split_with_ratio_is_deterministic() {
        let dataset = sample();
        let (a, _) = dataset.split_with_ratio(0.5, 7).unwrap();
        let (b, _) = dataset.split_with_ratio(0.5, 7).unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn split_with_ratio_rejects_out_of_range() {
        assert!(sample().split_with_ratio(1.5, 0).is_err());
    }
}
