//! Integration Tests for Feature Projection
//!
//! Layout selection → matrix (training) và vector (inference) phải khớp nhau.

#[cfg(test)]
mod integration_tests {
    use crate::logic::features::{build, FeatureLayout, FeatureMatrix};
    use crate::logic::observation::Observation;

    fn sample() -> Observation {
        Observation::from_pairs(vec![
            ("hour", 14.0),
            ("month", 6.0),
            ("cloud", 20.0),
            ("precipitation_mm", 0.0),
            ("visibility_km", 15.0),
            ("power_consumption_watts", 150.0),
            ("latitude", 18.52),
        ])
    }

    /// Same observation + layout → bit-identical vector
    #[test]
    fn test_build_is_deterministic() {
        let layout = FeatureLayout::from_columns([
            "hour", "month", "cloud", "precipitation_mm", "visibility_km", "humidity", "latitude",
        ]);
        let a = build(&sample(), &layout);
        let b = build(&sample(), &layout);

        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(a.as_slice()), bits(b.as_slice()));
        assert_eq!(serde_json::to_vec(&a).unwrap(), serde_json::to_vec(&b).unwrap());
    }

    /// Training row with every field present matches its inference vector
    #[test]
    fn test_matrix_row_matches_vector() {
        let layout = FeatureLayout::from_columns(["hour", "month", "cloud", "visibility_km"]);
        let rows = vec![sample(), sample().with("hour", 2.0)];
        let matrix = FeatureMatrix::from_observations(&rows, &layout);

        let vector = build(&rows[1], &layout);
        let row: Vec<f64> = matrix.data.row(1).to_vec();
        assert_eq!(row, vector.values);
    }

    /// Missing members: median at training, zero at inference
    #[test]
    fn test_missing_value_policy_differs_by_phase() {
        let layout = FeatureLayout::from_columns(["hour", "humidity"]);
        let rows = vec![
            Observation::from_pairs(vec![("hour", 1.0), ("humidity", 60.0)]),
            Observation::from_pairs(vec![("hour", 2.0), ("humidity", 80.0)]),
            Observation::from_pairs(vec![("hour", 3.0)]),
        ];
        let matrix = FeatureMatrix::from_observations(&rows, &layout);
        assert_eq!(matrix.data[[2, 1]], 70.0);

        let vector = build(&rows[2], &layout);
        assert_eq!(vector.values[1], 0.0);
    }
}
