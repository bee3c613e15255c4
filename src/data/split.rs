use rand::Rng;
use serde::{Deserialize, Serialize};

use super::model::Table;
use crate::error::{DoraError, Result};

// ---------------------------------------------------------------------------
// Training / validation partition
// ---------------------------------------------------------------------------

/// Parameters for a random row partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Probability that a row lands in the training table.
    pub ratio: f64,
    /// Seed for a reproducible split; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            ratio: 0.8,
            seed: None,
        }
    }
}

/// Two derived tables; the source table is left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainValidationSplit {
    pub training: Table,
    pub validation: Table,
}

/// Assign each of `n_rows` rows to training independently with probability
/// `ratio`. Returns `(training_rows, validation_rows)`, both ascending.
pub fn partition_indices<R: Rng>(
    n_rows: usize,
    ratio: f64,
    rng: &mut R,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(DoraError::NumericOperation(format!(
            "split ratio must be within [0, 1], got {ratio}"
        )));
    }

    let mut training = Vec::with_capacity((n_rows as f64 * ratio) as usize);
    let mut validation = Vec::new();
    for row in 0..n_rows {
        if rng.gen::<f64>() < ratio {
            training.push(row);
        } else {
            validation.push(row);
        }
    }
    Ok((training, validation))
}

/// Split `table` row-wise into training and validation tables.
pub fn split_table<R: Rng>(
    table: &Table,
    ratio: f64,
    rng: &mut R,
) -> Result<TrainValidationSplit> {
    let (training, validation) = partition_indices(table.height(), ratio, rng)?;
    Ok(TrainValidationSplit {
        training: table.take_rows(&training),
        validation: table.take_rows(&validation),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Value};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_partition_covers_every_row_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let (train, valid) = partition_indices(100, 0.8, &mut rng).unwrap();
        let mut all: Vec<usize> = train.iter().chain(valid.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
        assert!(train.len() > valid.len());
    }

    #[test]
    fn test_extreme_ratios() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (train, valid) = partition_indices(20, 1.0, &mut rng).unwrap();
        assert_eq!((train.len(), valid.len()), (20, 0));
        let (train, valid) = partition_indices(20, 0.0, &mut rng).unwrap();
        assert_eq!((train.len(), valid.len()), (0, 20));
    }

    #[test]
    fn test_invalid_ratio() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            partition_indices(5, 1.5, &mut rng),
            Err(DoraError::NumericOperation(_))
        ));
    }

    #[test]
    fn test_same_seed_same_split() {
        let table = Table::new(vec![Column::new(
            "a",
            (0..50i64).map(Value::Integer).collect(),
        )])
        .unwrap();
        let a = split_table(&table, 0.5, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        let b = split_table(&table, 0.5, &mut ChaCha8Rng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.training.height() + a.validation.height(), 50);
    }
}
