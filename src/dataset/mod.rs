//! Bundled Iris dataset.
//!
//! The CSV is compiled into the binary so training never touches the
//! filesystem.

use csv::ReaderBuilder;
use log::debug;
use ndarray::{Array1, Array2};

use crate::{Error, Result};

/// Number of input features per sample
pub const N_FEATURES: usize = 4;

/// Number of target classes
pub const N_CLASSES: usize = 3;

pub const CLASS_NAMES: [&str; N_CLASSES] = ["setosa", "versicolor", "virginica"];

const IRIS_CSV: &str = include_str!("iris.csv");

/// Labelled samples with a feature matrix of shape `(n_samples, N_FEATURES)`.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub features: Array2<f64>,
    pub targets: Array1<usize>,
}

impl Dataset {
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }
}

/// Load the bundled Iris dataset.
pub fn load_iris() -> Result<Dataset> {
    parse_csv(IRIS_CSV)
}

/// Parse a headered CSV of four numeric feature columns followed by an
/// integer class label.
pub fn parse_csv(source: &str) -> Result<Dataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(source.as_bytes());

    let mut values = Vec::new();
    let mut targets = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != N_FEATURES + 1 {
            return Err(Error::dataset(format!(
                "row {}: expected {} columns, found {}",
                row,
                N_FEATURES + 1,
                record.len()
            )));
        }

        for field in record.iter().take(N_FEATURES) {
            let value: f64 = field
                .parse()
                .map_err(|_| Error::dataset(format!("row {}: invalid feature '{}'", row, field)))?;
            values.push(value);
        }

        let label = &record[N_FEATURES];
        let target: usize = label
            .parse()
            .map_err(|_| Error::dataset(format!("row {}: invalid label '{}'", row, label)))?;
        if target >= N_CLASSES {
            return Err(Error::dataset(format!(
                "row {}: label {} out of range 0..{}",
                row, target, N_CLASSES
            )));
        }
        targets.push(target);
    }

    if targets.is_empty() {
        return Err(Error::dataset("dataset is empty"));
    }

    let features = Array2::from_shape_vec((targets.len(), N_FEATURES), values)?;
    debug!("loaded {} samples with {} features", targets.len(), N_FEATURES);

    Ok(Dataset {
        features,
        targets: Array1::from(targets),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Axis;

    #[test]
    fn test_load_iris_shape() {
        let data = load_iris().unwrap();
        assert_eq!(data.features.dim(), (150, N_FEATURES));
        assert_eq!(data.targets.len(), 150);

        for class in 0..N_CLASSES {
            let count = data.targets.iter().filter(|&&t| t == class).count();
            assert_eq!(count, 50, "class {} should have 50 samples", CLASS_NAMES[class]);
        }
    }

    #[test]
    fn test_load_iris_column_means() {
        let data = load_iris().unwrap();
        let means = data.features.mean_axis(Axis(0)).unwrap();
        let expected = [5.8433, 3.0573, 3.758, 1.1993];
        for (m, e) in means.iter().zip(expected.iter()) {
            assert!((m - e).abs() < 1e-3, "mean {} != {}", m, e);
        }
        assert_eq!(data.features.row(0).to_vec(), vec![5.1, 3.5, 1.4, 0.2]);
    }

    #[test]
    fn test_parse_csv_rejects_bad_rows() {
        let wrong_width = "a,b,c,d,y\n1,2,3,0\n";
        assert!(matches!(parse_csv(wrong_width), Err(Error::Dataset(_))));

        let bad_feature = "a,b,c,d,y\n1,x,3,4,0\n";
        assert!(matches!(parse_csv(bad_feature), Err(Error::Dataset(_))));

        let bad_label = "a,b,c,d,y\n1,2,3,4,7\n";
        assert!(matches!(parse_csv(bad_label), Err(Error::Dataset(_))));

        assert!(matches!(parse_csv("a,b,c,d,y\n"), Err(Error::Dataset(_))));
    }
}
