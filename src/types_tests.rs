//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::types::*;
    use chrono::Utc;

    #[test]
    fn test_series_to_examples_pairs_with_next_value() {
        let examples = series_to_examples(&[10.0, 12.0, 11.0, 13.0]);
        assert_eq!(
            examples,
            vec![
                TrainingExample::new(10.0, 12.0),
                TrainingExample::new(12.0, 11.0),
                TrainingExample::new(11.0, 13.0),
                TrainingExample::new(13.0, 13.0),
            ]
        );
    }

    #[test]
    fn test_series_to_examples_last_label_is_self() {
        let series = [3.5, 4.25, 9.0, 1.0, 2.0];
        let examples = series_to_examples(&series);

        assert_eq!(examples.len(), series.len());
        for i in 0..series.len() - 1 {
            assert_eq!(examples[i].value, series[i]);
            assert_eq!(examples[i].label, series[i + 1]);
        }
        let last = examples.last().unwrap();
        assert_eq!(last.label, last.value);
    }

    #[test]
    fn test_series_to_examples_single_and_empty() {
        assert_eq!(series_to_examples(&[7.0]), vec![TrainingExample::new(7.0, 7.0)]);
        assert!(series_to_examples(&[]).is_empty());
    }

    #[test]
    fn test_training_example_json_shape() {
        let json = serde_json::to_string(&TrainingExample::new(1.5, 2.0)).unwrap();
        assert_eq!(json, r#"{"value":1.5,"label":2.0}"#);
    }

    #[test]
    fn test_log_entry_keeps_nulls() {
        let entry = PredictionLogEntry {
            timestamp: Utc::now(),
            input_series: vec![1.0, 2.0],
            predictions: vec![2.0],
            actual: None,
            error: None,
        };
        let value = serde_json::to_value(&entry).unwrap();

        assert!(value["actual"].is_null());
        assert!(value["error"].is_null());
        assert_eq!(value["inputSeries"], serde_json::json!([1.0, 2.0]));

        let back: PredictionLogEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_forecast_outcome_serialization() {
        let outcome = ForecastOutcome {
            predictions: vec![14.0, 14.5],
            actual: Some(15.0),
            error: Some(0.5),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["predictions"], serde_json::json!([14.0, 14.5]));
        assert_eq!(value["actual"], serde_json::json!(15.0));
        assert_eq!(value["error"], serde_json::json!(0.5));
    }
}
