//! Training Matrix
//!
//! Dense `n_samples x n_features` matrix with median imputation.
//! Medians are computed once over the full matrix, before any CV folding.

use ndarray::Array2;

use crate::logic::observation::Observation;
use super::layout::FeatureLayout;

#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    pub data: Array2<f64>,
    /// Per-column fill value used for missing cells
    pub medians: Vec<f64>,
}

impl FeatureMatrix {
    pub fn from_observations(rows: &[Observation], layout: &FeatureLayout) -> Self {
        let n_features = layout.len();
        let medians: Vec<f64> = layout
            .names()
            .iter()
            .map(|name| {
                let present: Vec<f64> = rows.iter().filter_map(|r| r.get(name)).collect();
                median(present).unwrap_or(0.0)
            })
            .collect();

        let mut data = Array2::<f64>::zeros((rows.len(), n_features));
        for (i, row) in rows.iter().enumerate() {
            for (j, name) in layout.names().iter().enumerate() {
                data[[i, j]] = row.get(name).unwrap_or(medians[j]);
            }
        }

        Self { data, medians }
    }

    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.data.ncols()
    }
}

/// Median of the values; mean of the two middle values for even counts
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median() {
        assert_eq!(median(vec![]), None);
        assert_eq!(median(vec![3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(vec![4.0, 1.0, 2.0, 3.0]), Some(2.5));
    }

    #[test]
    fn test_imputes_missing_with_column_median() {
        let layout = FeatureLayout::from_columns(["hour", "cloud"]);
        let rows = vec![
            Observation::from_pairs(vec![("hour", 1.0), ("cloud", 10.0)]),
            Observation::from_pairs(vec![("hour", 2.0)]),
            Observation::from_pairs(vec![("hour", 3.0), ("cloud", 30.0)]),
        ];
        let matrix = FeatureMatrix::from_observations(&rows, &layout);
        assert_eq!(matrix.n_samples(), 3);
        assert_eq!(matrix.n_features(), 2);
        assert_eq!(matrix.medians, vec![2.0, 20.0]);
        assert_eq!(matrix.data[[1, 1]], 20.0);
    }

    #[test]
    fn test_all_missing_column_imputes_zero() {
        let layout = FeatureLayout::from_columns(["hour", "humidity"]);
        let rows = vec![Observation::from_pairs(vec![("hour", 1.0)])];
        let matrix = FeatureMatrix::from_observations(&rows, &layout);
        assert_eq!(matrix.data[[0, 1]], 0.0);
    }
}
