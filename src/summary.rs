use std::fmt;

use crate::sop_class::SopClassTable;
use crate::source::PatientRoot;

/// Per-series counts shown by the `summary` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesSummary {
    pub patient_name: String,
    pub study_uid: String,
    pub series_uid: String,
    pub series_number: i32,
    pub modality: Option<String>,
    pub instances: usize,
    pub multi_frame: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeSummary {
    pub patients: usize,
    pub studies: usize,
    pub series: Vec<SeriesSummary>,
}

impl TreeSummary {
    pub fn new(root: &PatientRoot, table: &SopClassTable) -> Self {
        let series = root
            .studies()
            .flat_map(|(patient, study)| {
                study.series.iter().map(move |series| SeriesSummary {
                    patient_name: patient.name.clone(),
                    study_uid: study.uid.clone(),
                    series_uid: series.uid.clone(),
                    series_number: series.number,
                    modality: series.modality.clone(),
                    instances: series.instances.len(),
                    multi_frame: series
                        .instances
                        .iter()
                        .filter(|i| table.is_multi_frame(&i.sop_class_uid))
                        .count(),
                })
            })
            .collect();

        Self {
            patients: root.patients.len(),
            studies: root.study_count(),
            series,
        }
    }

    pub fn kept_instances(&self) -> usize {
        self.series.iter().map(|s| s.instances - s.multi_frame).sum()
    }
}

impl fmt::Display for TreeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(80))?;
        writeln!(
            f,
            "Patients: {} | Studies: {} | Series: {} | Viewable instances: {}",
            self.patients,
            self.studies,
            self.series.len(),
            self.kept_instances()
        )?;
        writeln!(f, "{}", "=".repeat(80))?;

        for series in &self.series {
            writeln!(
                f,
                "{} | {} | #{} {} ({})",
                series.patient_name,
                series.study_uid,
                series.series_number,
                series.series_uid,
                series.modality.as_deref().unwrap_or("N/A")
            )?;
            write!(f, "  Instances: {}", series.instances)?;
            if series.multi_frame > 0 {
                write!(f, " ({} multi-frame, not viewable)", series.multi_frame)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{SourceInstance, SourcePatient, SourceSeries, SourceStudy};

    #[test]
    fn counts_multi_frame_instances_per_series() {
        let root = PatientRoot {
            patients: vec![SourcePatient {
                id: "1".into(),
                name: "CASE_1".into(),
                studies: vec![SourceStudy {
                    uid: "STUDY_A".into(),
                    series: vec![SourceSeries {
                        uid: "SER_1".into(),
                        number: 3,
                        instances: vec![
                            SourceInstance {
                                sop_class_uid: "1.2.840.10008.5.1.4.1.1.7.1".into(),
                                ..Default::default()
                            },
                            SourceInstance {
                                sop_class_uid: "1.2.840.10008.5.1.4.1.1.4".into(),
                                ..Default::default()
                            },
                        ],
                        ..Default::default()
                    }],
                    ..Default::default()
                }],
            }],
        };

        let summary = TreeSummary::new(&root, &SopClassTable::default());
        assert_eq!(summary.patients, 1);
        assert_eq!(summary.studies, 1);
        assert_eq!(summary.series[0].instances, 2);
        assert_eq!(summary.series[0].multi_frame, 1);
        assert_eq!(summary.kept_instances(), 1);

        let text = summary.to_string();
        assert!(text.contains("Viewable instances: 1"));
        assert!(text.contains("1 multi-frame, not viewable"));
    }
}
