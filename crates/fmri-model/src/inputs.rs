//! Per-run input bundle resolved by the dataset orchestrator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Files and acquisition parameters for one (subject, run) unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunInputs {
    /// Preprocessed BOLD series.
    pub bold: PathBuf,
    /// Brain mask in the same space as `bold`.
    #[serde(default)]
    pub mask: Option<PathBuf>,
    pub events: PathBuf,
    pub regressors: PathBuf,
    /// Repetition time in seconds.
    #[serde(default, alias = "tr")]
    pub repetition_time: Option<f64>,
    /// Trial isolated by an LSS model.
    #[serde(default, rename = "trial_ID", alias = "trial_id")]
    pub trial_id: Option<i64>,
}

impl RunInputs {
    /// Fills in a missing repetition time from a BIDS JSON sidecar.
    ///
    /// An already known TR is kept.
    pub fn with_sidecar(mut self, sidecar: &serde_json::Value) -> Self {
        if self.repetition_time.is_none() {
            self.repetition_time = repetition_time_from_sidecar(sidecar);
        }
        self
    }
}

/// Reads `RepetitionTime` (seconds) from a BIDS JSON sidecar.
pub fn repetition_time_from_sidecar(sidecar: &serde_json::Value) -> Option<f64> {
    sidecar
        .get("RepetitionTime")
        .and_then(serde_json::Value::as_f64)
        .filter(|tr| tr.is_finite() && *tr > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_repetition_time() {
        assert_eq!(
            repetition_time_from_sidecar(&json!({"RepetitionTime": 2.0, "TaskName": "phase2"})),
            Some(2.0)
        );
        assert_eq!(repetition_time_from_sidecar(&json!({"TaskName": "phase2"})), None);
        assert_eq!(repetition_time_from_sidecar(&json!({"RepetitionTime": "2"})), None);
        assert_eq!(repetition_time_from_sidecar(&json!({"RepetitionTime": 0.0})), None);
    }

    #[test]
    fn sidecar_does_not_override_known_tr() {
        let inputs = RunInputs {
            bold: "bold.nii.gz".into(),
            mask: None,
            events: "events.tsv".into(),
            regressors: "confounds.tsv".into(),
            repetition_time: Some(1.5),
            trial_id: None,
        };
        let merged = inputs.with_sidecar(&json!({"RepetitionTime": 2.0}));
        assert_eq!(merged.repetition_time, Some(1.5));
    }
}
