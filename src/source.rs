//
// source.rs
// Ohif-Viewer-Input-rs
//
// In-memory patient/study/series/instance tree produced by the scanner and consumed by the builder.
//
// Thales Matheus Mendonça Santos - November 2025

/// Root of a scanned directory: every patient found, in discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientRoot {
    pub patients: Vec<SourcePatient>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourcePatient {
    pub id: String,
    pub name: String,
    pub studies: Vec<SourceStudy>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceStudy {
    pub uid: String,
    pub description: Option<String>,
    pub date: Option<String>,
    pub series: Vec<SourceSeries>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceSeries {
    pub uid: String,
    pub number: i32,
    pub description: Option<String>,
    pub modality: Option<String>,
    pub instances: Vec<SourceInstance>,
}

/// One SOP instance (one file on disk).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceInstance {
    pub uid: String,
    pub sop_class_uid: String,
    pub instance_number: i32,
    /// Location below the scan root, `/`-separated.
    pub relative_path: String,
    pub rows: Option<u16>,
    pub columns: Option<u16>,
    pub frame_of_reference_uid: Option<String>,
    pub image_position_patient: Option<[f64; 3]>,
    pub image_orientation_patient: Option<[f64; 6]>,
    pub pixel_spacing: Option<[f64; 2]>,
}

impl PatientRoot {
    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    pub fn study_count(&self) -> usize {
        self.patients.iter().map(|p| p.studies.len()).sum()
    }

    pub fn series_count(&self) -> usize {
        self.studies().map(|(_, s)| s.series.len()).sum()
    }

    pub fn instance_count(&self) -> usize {
        self.studies()
            .flat_map(|(_, study)| &study.series)
            .map(|series| series.instances.len())
            .sum()
    }

    /// Studies of every patient, flattened in source order alongside their owner.
    pub fn studies(&self) -> impl Iterator<Item = (&SourcePatient, &SourceStudy)> {
        self.patients
            .iter()
            .flat_map(|patient| patient.studies.iter().map(move |study| (patient, study)))
    }
}
