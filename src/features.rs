//! Feature assembly
//!
//! Projects a dataset record onto the ordered feature list a model was
//! trained with. Values are passed through untouched; turning them into
//! numbers is the predictor's job.

use crate::error::{QcoError, QcoResult};
use crate::models::{DatasetRecord, FeatureVector, ModelSpec};

/// Cut the features `spec` requires out of `record`, in training order.
///
/// Every absent field is reported, not just the first one.
pub fn assemble(record: &DatasetRecord, spec: &ModelSpec) -> QcoResult<FeatureVector> {
    let mut values = Vec::with_capacity(spec.required_features.len());
    let mut missing = Vec::new();

    for &name in spec.required_features {
        match record.get(name) {
            Some(value) => values.push(value.clone()),
            None => missing.push(name.to_string()),
        }
    }

    if !missing.is_empty() {
        return Err(QcoError::MissingFeature {
            model: spec.id,
            fields: missing,
        });
    }

    Ok(FeatureVector {
        model: spec.id,
        names: spec.required_features,
        values,
    })
}

/// Features whose value is numerically zero.
///
/// For the critical-path checklist a zero marks an activity that was not
/// completed before the changeover.
pub fn incomplete_activities(features: &FeatureVector) -> Vec<&'static str> {
    features
        .iter()
        .filter(|(_, v)| v.as_f64() == Some(0.0))
        .map(|(name, _)| name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::row;
    use crate::dataset::Dataset;
    use crate::models::{FieldValue, ModelId, CRITICAL_PATH_FEATURES};

    fn record(extra: &[(&str, FieldValue)]) -> DatasetRecord {
        Dataset::from_rows(vec![row("M1", "S1", extra)])
            .unwrap()
            .records()[0]
            .clone()
    }

    #[test]
    fn test_assemble_preserves_training_order() {
        // Columns deliberately out of order in the record
        let rec = record(&[
            ("Skill", FieldValue::Number(4.0)),
            ("Unrelated", FieldValue::Text("x".into())),
            ("Priority", FieldValue::Text("High".into())),
        ]);
        let fv = assemble(&rec, ModelSpec::for_id(ModelId::Talento)).unwrap();
        assert_eq!(fv.model, ModelId::Talento);
        assert_eq!(fv.names, &["Priority", "Skill"]);
        assert_eq!(
            fv.values,
            vec![FieldValue::Text("High".into()), FieldValue::Number(4.0)]
        );
    }

    #[test]
    fn test_assemble_reports_all_missing_fields() {
        let rec = record(&[("Priority", FieldValue::Number(1.0))]);
        let err = assemble(&rec, ModelSpec::for_id(ModelId::Historia)).unwrap_err();
        match err {
            QcoError::MissingFeature { model, fields } => {
                assert_eq!(model, ModelId::Historia);
                assert_eq!(
                    fields,
                    vec!["Tier", "Module Repeatability", "Efficiency", "Module Achievement"]
                );
            }
            other => panic!("expected MissingFeature, got {other:?}"),
        }
    }

    #[test]
    fn test_null_value_is_passed_through() {
        let rec = record(&[
            ("Priority", FieldValue::Null),
            ("Skill", FieldValue::Number(1.0)),
        ]);
        let fv = assemble(&rec, ModelSpec::for_id(ModelId::Talento)).unwrap();
        assert!(fv.values[0].is_null());
    }

    #[test]
    fn test_incomplete_activities() {
        let extra: Vec<(&str, FieldValue)> = CRITICAL_PATH_FEATURES
            .iter()
            .enumerate()
            .map(|(i, &name)| {
                let v = if i == 2 || i == 6 { 0.0 } else { 1.0 };
                (name, FieldValue::Number(v))
            })
            .collect();
        let rec = record(&extra);
        let fv = assemble(&rec, ModelSpec::for_id(ModelId::CriticalPath)).unwrap();
        assert_eq!(fv.len(), 21);
        assert_eq!(
            incomplete_activities(&fv),
            vec!["Team Member Allocation for Layout", "Feeding Plan Ready"]
        );
    }
}
