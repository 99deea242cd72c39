//! Turns the raw survey columns into the study variables
//!
//! Composites are derived first, then the normalization list is applied.
//! Both steps mutate the dataset in place.

pub mod derive;
pub mod normalize;

pub use derive::{derive_composite, Composite};
pub use normalize::{min_max_normalize, normalize_column, round_one_decimal, Normalization};

use super::constants::{COMPOSITES, NORMALIZATIONS};
use crate::common::{Dataset, DatasetError};
use thiserror::Error;

/// Errors that can occur while deriving or normalizing columns
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("Column {0} cannot be normalized: it has a single distinct value")]
    DegenerateColumn(String),

    #[error("Weights of {column} sum to {sum}, expected 1")]
    InvalidWeights { column: String, sum: f64 },
}

type Result<T> = core::result::Result<T, TransformError>;

/// Applies every composite and normalization of the study.
pub fn prepare_dataset(dataset: &mut Dataset) -> Result<()> {
    for composite in COMPOSITES {
        derive_composite(dataset, composite)?;
        tracing::debug!(column = composite.target, "Derived composite column");
    }

    for normalization in NORMALIZATIONS {
        normalize_column(dataset, normalization)?;
        tracing::debug!(
            source = normalization.source,
            target = normalization.target,
            "Normalized column"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> Dataset {
        Dataset::from_numeric(&[
            ("PROG_EXP", [1.0, 1.0, 2.0, 3.0]),
            ("PROG_EXP_YEAR", [0.0, 2.0, 2.0, 2.0]),
            ("PROG_EXP_HOUR", [1.0, 1.0, 2.0, 2.0]),
            ("GAME_EXP", [1.0, 2.0, 3.0, 4.0]),
            ("GAME_EXP_HOUR", [4.0, 3.0, 2.0, 1.0]),
            ("MOT_MEAN", [2.0, 3.5, 4.0, 5.0]),
            ("USE_FREQ", [1.0, 2.0, 3.0, 5.0]),
            ("CONTRIB_DIFF", [1.0, 1.0, 2.0, 4.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_prepare_dataset() {
        let mut dataset = survey();
        prepare_dataset(&mut dataset).unwrap();

        // PROG_EXP_COMP before normalization: [0.75, 1.25, 2.0, 2.5]
        assert_eq!(
            dataset.numeric("PROG_EXP_COMP").unwrap(),
            &[0.0, 0.3, 0.7, 1.0]
        );
        // GAME_EXP_COMP before normalization: [1.75, 2.25, 2.75, 3.25]
        assert_eq!(
            dataset.numeric("GAME_EXP_COMP").unwrap(),
            &[0.0, 0.3, 0.7, 1.0]
        );
        assert_eq!(
            dataset.numeric("MOT_MEAN_NORM").unwrap(),
            &[0.0, 0.5, 0.7, 1.0]
        );
        // The source of a separate target is left untouched.
        assert_eq!(dataset.numeric("MOT_MEAN").unwrap(), &[2.0, 3.5, 4.0, 5.0]);
        assert_eq!(dataset.numeric("USE_FREQ").unwrap(), &[0.0, 0.2, 0.5, 1.0]);
        assert_eq!(
            dataset.numeric("CONTRIB_DIFF").unwrap(),
            &[0.0, 0.0, 0.3, 1.0]
        );
    }

    #[test]
    fn test_prepare_dataset_missing_column() {
        let mut dataset = Dataset::from_numeric(&[("GAME_EXP", [1.0, 2.0])]).unwrap();
        let result = prepare_dataset(&mut dataset);

        assert_eq!(
            result,
            Err(TransformError::Dataset(DatasetError::MissingColumn(
                "GAME_EXP_HOUR".to_string()
            )))
        );
    }
}
