//! Scatter + fit data behind `plot_feature` and `explore`.
//!
//! Nothing here draws; the explorer window turns a [`FeaturePlot`] into
//! `egui_plot` items.

use crate::data::model::Table;
use crate::error::{DoraError, Result};
use crate::stats::{self, LinearFit};

/// One input feature against the output column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeaturePlot {
    pub feature: String,
    pub output: String,
    /// `[feature, output]` pairs; rows missing either value are skipped.
    pub points: Vec<[f64; 2]>,
    pub fit: LinearFit,
}

impl FeaturePlot {
    pub fn build(table: &Table, feature: &str, output: &str) -> Result<Self> {
        let xs = stats::numeric_values(table.column(feature)?)?;
        let ys = stats::numeric_values(table.column(output)?)?;

        let points: Vec<[f64; 2]> = xs
            .iter()
            .zip(&ys)
            .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
            .collect();

        let (px, py): (Vec<f64>, Vec<f64>) = points.iter().map(|p| (p[0], p[1])).unzip();
        let fit = stats::linear_fit(&px, &py).map_err(|e| match e {
            DoraError::NumericOperation(msg) => {
                DoraError::NumericOperation(format!("{feature} vs. {output}: {msg}"))
            }
            other => other,
        })?;

        Ok(Self {
            feature: feature.to_string(),
            output: output.to_string(),
            points,
            fit,
        })
    }

    pub fn title(&self) -> String {
        format!("{} vs. {}", self.feature, self.output)
    }

    /// End points of the fitted line across the observed feature range.
    pub fn fit_line(&self) -> [[f64; 2]; 2] {
        let (lo, hi) = self
            .points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[0]), hi.max(p[0]))
            });
        [[lo, self.fit.predict(lo)], [hi, self.fit.predict(hi)]]
    }
}

/// Rows and columns of the explore grid for `n` plots:
/// `rows = floor(sqrt(n))`, `cols = ceil(n / rows)`.
pub fn grid_shape(n: usize) -> (usize, usize) {
    if n == 0 {
        return (0, 0);
    }
    let rows = ((n as f64).sqrt().floor() as usize).max(1);
    let cols = n.div_ceil(rows);
    (rows, cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Column, Value};

    fn table() -> Table {
        Table::new(vec![
            Column::new("A", vec![3i64.into(), 5i64.into(), 7i64.into(), 9i64.into()]),
            Column::new("x", vec![1i64.into(), 2i64.into(), Value::Null, 4i64.into()]),
            Column::new("label", vec![Value::from("a"); 4]),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_skips_missing_rows() {
        let plot = FeaturePlot::build(&table(), "x", "A").unwrap();
        assert_eq!(plot.points, vec![[1.0, 3.0], [2.0, 5.0], [4.0, 9.0]]);
        assert!((plot.fit.slope - 2.0).abs() < 1e-9);
        assert_eq!(plot.title(), "x vs. A");
        let [start, end] = plot.fit_line();
        assert_eq!((start[0], end[0]), (1.0, 4.0));
        assert!((start[1] - 3.0).abs() < 1e-9);
        assert!((end[1] - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(
            FeaturePlot::build(&table(), "nope", "A"),
            Err(DoraError::UnknownColumn(_))
        ));
        assert!(matches!(
            FeaturePlot::build(&table(), "label", "A"),
            Err(DoraError::NumericOperation(_))
        ));
    }

    #[test]
    fn test_grid_shape() {
        assert_eq!(grid_shape(0), (0, 0));
        assert_eq!(grid_shape(1), (1, 1));
        assert_eq!(grid_shape(3), (1, 3));
        assert_eq!(grid_shape(4), (2, 2));
        assert_eq!(grid_shape(5), (2, 3));
        assert_eq!(grid_shape(10), (3, 4));
    }
}
