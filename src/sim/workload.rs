use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::core::{ProcessSpec, Ticks};
use crate::error::WorkloadError;
use crate::scheduler::{Algorithm, Policy};

/// The structured input document: policy selection plus the process list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub algorithm: Algorithm,
    #[serde(default)]
    pub quantum: Option<Ticks>,
    #[serde(default)]
    pub overhead: Ticks,
    pub processes: Vec<ProcessSpec>,
}

impl Workload {
    pub fn from_json_str(doc: &str) -> Result<Self, WorkloadError> {
        let workload: Workload = serde_json::from_str(doc)?;
        workload.validate()?;
        Ok(workload)
    }

    pub fn from_path(path: &Path) -> Result<Self, WorkloadError> {
        let doc = fs::read_to_string(path).map_err(|source| WorkloadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&doc)
    }

    pub fn validate(&self) -> Result<(), WorkloadError> {
        if self.processes.is_empty() {
            return Err(WorkloadError::Empty);
        }

        if self.algorithm.needs_quantum() && !self.quantum.is_some_and(|q| q > 0) {
            return Err(WorkloadError::MissingQuantum(self.algorithm));
        }

        let mut seen = FxHashSet::default();
        for spec in &self.processes {
            if spec.burst == 0 {
                return Err(WorkloadError::ZeroBurst {
                    id: spec.id.clone(),
                });
            }
            if !seen.insert(spec.id.as_str()) {
                return Err(WorkloadError::DuplicateId(spec.id.clone()));
            }
        }

        Ok(())
    }

    pub fn policy(&self) -> Policy {
        Policy::new(self.algorithm, self.quantum)
    }

    pub fn with_algorithm(&self, algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DOC: &str = r#"{
        "algorithm": "RR",
        "quantum": 2,
        "overhead": 1,
        "processes": [
            { "id": "P1", "chegada": 0, "execucao": 4, "deadline": 7, "prioridade": 2 },
            { "id": "P2", "arrival": 1, "burst": 3, "deadline": 9, "priority": 1 }
        ]
    }"#;

    #[test]
    fn accepts_both_field_spellings() {
        let workload = Workload::from_json_str(DOC).unwrap();
        assert_eq!(workload.algorithm, Algorithm::Rr);
        assert_eq!(workload.quantum, Some(2));
        assert_eq!(workload.overhead, 1);
        assert_eq!(workload.processes[0].arrival, 0);
        assert_eq!(workload.processes[0].burst, 4);
        assert_eq!(workload.processes[0].priority, 2);
        assert_eq!(workload.processes[1].arrival, 1);
        assert_eq!(workload.policy(), Policy::RoundRobin { quantum: 2 });
    }

    #[test]
    fn overhead_and_quantum_default() {
        let doc = r#"{ "algorithm": "FIFO",
            "processes": [{ "id": "P1", "arrival": 0, "burst": 1, "deadline": 1 }] }"#;
        let workload = Workload::from_json_str(doc).unwrap();
        assert_eq!(workload.overhead, 0);
        assert_eq!(workload.quantum, None);
        assert_eq!(workload.processes[0].priority, 0);
    }

    #[test]
    fn rejects_empty_workload() {
        let doc = r#"{ "algorithm": "FIFO", "processes": [] }"#;
        assert!(matches!(
            Workload::from_json_str(doc),
            Err(WorkloadError::Empty)
        ));
    }

    #[test]
    fn rejects_missing_quantum() {
        let doc = r#"{ "algorithm": "CFS",
            "processes": [{ "id": "P1", "arrival": 0, "burst": 1, "deadline": 1 }] }"#;
        assert!(matches!(
            Workload::from_json_str(doc),
            Err(WorkloadError::MissingQuantum(Algorithm::Cfs))
        ));
    }

    #[test]
    fn rejects_zero_burst_and_duplicates() {
        let zero = r#"{ "algorithm": "FIFO",
            "processes": [{ "id": "P1", "arrival": 0, "burst": 0, "deadline": 1 }] }"#;
        assert!(matches!(
            Workload::from_json_str(zero),
            Err(WorkloadError::ZeroBurst { .. })
        ));

        let dup = r#"{ "algorithm": "FIFO", "processes": [
            { "id": "P1", "arrival": 0, "burst": 1, "deadline": 1 },
            { "id": "P1", "arrival": 2, "burst": 1, "deadline": 5 }] }"#;
        assert!(matches!(
            Workload::from_json_str(dup),
            Err(WorkloadError::DuplicateId(id)) if id == "P1"
        ));
    }

    #[test]
    fn rejects_negative_arrival_and_unknown_algorithm() {
        let negative = r#"{ "algorithm": "FIFO",
            "processes": [{ "id": "P1", "arrival": -1, "burst": 1, "deadline": 1 }] }"#;
        assert!(matches!(
            Workload::from_json_str(negative),
            Err(WorkloadError::Json(_))
        ));

        let unknown = r#"{ "algorithm": "LOTTERY", "processes": [] }"#;
        assert!(matches!(
            Workload::from_json_str(unknown),
            Err(WorkloadError::Json(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DOC.as_bytes()).unwrap();
        let workload = Workload::from_path(file.path()).unwrap();
        assert_eq!(workload.processes.len(), 2);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            Workload::from_path(&missing),
            Err(WorkloadError::Io { .. })
        ));
    }
}
