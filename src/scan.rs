//
// scan.rs
// Ohif-Viewer-Input-rs
//
// Walks a directory, reads DICOM headers in parallel, and assembles the patient/study/series/instance tree.
//
// Thales Matheus Mendonça Santos - November 2025

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use dicom::object::OpenFileOptions;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::dicom_access::*;
use crate::error::ScanError;
use crate::source::{PatientRoot, SourceInstance, SourcePatient, SourceSeries, SourceStudy};

/// Header fields of one file, flattened before grouping into the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedFile {
    pub patient_id: String,
    pub patient_name: String,
    pub study_uid: String,
    pub study_description: Option<String>,
    pub study_date: Option<String>,
    pub series_uid: String,
    pub series_number: i32,
    pub series_description: Option<String>,
    pub modality: Option<String>,
    pub instance: SourceInstance,
}

/// Scan `root` recursively and build the source tree from every readable DICOM file.
///
/// Files that cannot be parsed, or lack the study/series/instance UIDs, are skipped with a warning.
pub fn scan_path(root: &Path) -> Result<PatientRoot, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    info!("DICOM search: {:?}", root);

    let files = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(err) => Some(Err(err)),
        })
        .collect::<Result<Vec<PathBuf>, walkdir::Error>>()?;

    debug!("Found {} candidate file(s)", files.len());

    // collect keeps the walk order.
    let scanned: Vec<ScannedFile> = files
        .par_iter()
        .filter_map(|path| match read_file(root, path) {
            Ok(file) => Some(file),
            Err(err) => {
                warn!("Skipping {:?}: {:#}", path, err);
                None
            }
        })
        .collect();

    let tree = assemble(scanned);
    info!(
        "Scan complete: {} patient(s), {} study(ies), {} series, {} instance(s)",
        tree.patients.len(),
        tree.study_count(),
        tree.series_count(),
        tree.instance_count()
    );
    Ok(tree)
}

/// Read the header of a single file; pixel data is never loaded.
pub fn read_file(root: &Path, path: &Path) -> anyhow::Result<ScannedFile> {
    let obj = OpenFileOptions::new()
        .read_until(dicom::dictionary_std::tags::PIXEL_DATA)
        .open_file(path)
        .context("Failed to open DICOM file")?;

    let required = |tag, name: &str| {
        obj.element_text(tag)
            .ok_or_else(|| anyhow!("missing {name}"))
    };

    let instance = SourceInstance {
        uid: required(SOP_INSTANCE_UID, "SOP Instance UID")?,
        sop_class_uid: required(SOP_CLASS_UID, "SOP Class UID")?,
        instance_number: obj
            .element_int(INSTANCE_NUMBER)
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0),
        relative_path: relative_path(root, path),
        rows: obj.element_int(ROWS).and_then(|n| u16::try_from(n).ok()),
        columns: obj.element_int(COLUMNS).and_then(|n| u16::try_from(n).ok()),
        frame_of_reference_uid: obj.element_text(FRAME_OF_REFERENCE_UID),
        image_position_patient: obj.element_array(IMAGE_POSITION_PATIENT),
        image_orientation_patient: obj.element_array(IMAGE_ORIENTATION_PATIENT),
        pixel_spacing: obj.element_array(PIXEL_SPACING),
    };

    Ok(ScannedFile {
        patient_id: obj.element_text(PATIENT_ID).unwrap_or_default(),
        patient_name: obj.element_text(PATIENT_NAME).unwrap_or_default(),
        study_uid: required(STUDY_INSTANCE_UID, "Study Instance UID")?,
        study_description: obj.element_text(STUDY_DESCRIPTION),
        study_date: obj.element_text(STUDY_DATE),
        series_uid: required(SERIES_INSTANCE_UID, "Series Instance UID")?,
        series_number: obj
            .element_int(SERIES_NUMBER)
            .and_then(|n| i32::try_from(n).ok())
            .unwrap_or(0),
        series_description: obj.element_text(SERIES_DESCRIPTION),
        modality: obj.element_text(MODALITY),
        instance,
    })
}

/// Group flat file records into the patient tree.
///
/// Patients, studies, and series appear in the order their first file was seen; instances
/// within a series are ordered by instance number, ties keeping file order.
pub fn assemble(files: impl IntoIterator<Item = ScannedFile>) -> PatientRoot {
    let mut root = PatientRoot::default();
    let mut patients: HashMap<(String, String), usize> = HashMap::new();
    let mut studies: HashMap<String, (usize, usize)> = HashMap::new();
    let mut series: HashMap<(String, String), (usize, usize, usize)> = HashMap::new();

    for file in files {
        // Anonymized files often share an empty PatientID, so the name is part of the key.
        let patient_key = (file.patient_id.clone(), file.patient_name.clone());
        let p = *patients.entry(patient_key).or_insert_with(|| {
            root.patients.push(SourcePatient {
                id: file.patient_id.clone(),
                name: file.patient_name.clone(),
                studies: Vec::new(),
            });
            root.patients.len() - 1
        });

        let (sp, s) = *studies.entry(file.study_uid.clone()).or_insert_with(|| {
            let patient = &mut root.patients[p];
            patient.studies.push(SourceStudy {
                uid: file.study_uid.clone(),
                description: file.study_description.clone(),
                date: file.study_date.clone(),
                series: Vec::new(),
            });
            (p, patient.studies.len() - 1)
        });

        let key = (file.study_uid.clone(), file.series_uid.clone());
        let (ep, es, se) = *series.entry(key).or_insert_with(|| {
            let study = &mut root.patients[sp].studies[s];
            study.series.push(SourceSeries {
                uid: file.series_uid.clone(),
                number: file.series_number,
                description: file.series_description.clone(),
                modality: file.modality.clone(),
                instances: Vec::new(),
            });
            (sp, s, study.series.len() - 1)
        });

        root.patients[ep].studies[es].series[se]
            .instances
            .push(file.instance);
    }

    for series in root
        .patients
        .iter_mut()
        .flat_map(|p| p.studies.iter_mut())
        .flat_map(|s| s.series.iter_mut())
    {
        series.instances.sort_by_key(|i| i.instance_number);
    }

    root
}

fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(patient: &str, study: &str, series: &str, instance: &str, number: i32) -> ScannedFile {
        ScannedFile {
            patient_id: patient.to_string(),
            patient_name: format!("{patient}^NAME"),
            study_uid: study.to_string(),
            study_description: None,
            study_date: None,
            series_uid: series.to_string(),
            series_number: 1,
            series_description: None,
            modality: Some("MR".to_string()),
            instance: SourceInstance {
                uid: instance.to_string(),
                sop_class_uid: "1.2.840.10008.5.1.4.1.1.4".to_string(),
                instance_number: number,
                ..Default::default()
            },
        }
    }

    #[test]
    fn groups_in_first_seen_order() {
        let root = assemble(vec![
            file("P2", "ST_B", "SE_2", "i4", 1),
            file("P1", "ST_A", "SE_1", "i1", 1),
            file("P2", "ST_B", "SE_3", "i5", 1),
            file("P1", "ST_A", "SE_1", "i2", 2),
            file("P2", "ST_C", "SE_4", "i6", 1),
        ]);

        let patients: Vec<_> = root.patients.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(patients, vec!["P2", "P1"]);
        assert_eq!(root.patients[0].name, "P2^NAME");

        let studies: Vec<_> = root.studies().map(|(_, s)| s.uid.as_str()).collect();
        assert_eq!(studies, vec!["ST_B", "ST_C", "ST_A"]);

        let st_b = &root.patients[0].studies[0];
        let series: Vec<_> = st_b.series.iter().map(|s| s.uid.as_str()).collect();
        assert_eq!(series, vec!["SE_2", "SE_3"]);
        assert_eq!(root.instance_count(), 5);
    }

    #[test]
    fn patients_without_id_are_told_apart_by_name() {
        let mut first = file("", "ST_A", "SE_1", "i1", 1);
        first.patient_name = "CASE_1".to_string();
        let mut second = file("", "ST_B", "SE_2", "i2", 1);
        second.patient_name = "CASE_2".to_string();

        let root = assemble(vec![first, second]);
        assert_eq!(root.patients.len(), 2);
        let names: Vec<_> = root
            .studies()
            .map(|(patient, study)| (patient.name.as_str(), study.uid.as_str()))
            .collect();
        assert_eq!(names, vec![("CASE_1", "ST_A"), ("CASE_2", "ST_B")]);
    }

    #[test]
    fn instances_sorted_by_number_with_stable_ties() {
        let root = assemble(vec![
            file("P", "ST", "SE", "third", 3),
            file("P", "ST", "SE", "first-a", 1),
            file("P", "ST", "SE", "second", 2),
            file("P", "ST", "SE", "first-b", 1),
        ]);
        let order: Vec<_> = root.patients[0].studies[0].series[0]
            .instances
            .iter()
            .map(|i| i.uid.as_str())
            .collect();
        assert_eq!(order, vec!["first-a", "first-b", "second", "third"]);
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/data/scans");
        let path = root.join("3").join("DICOM").join("a.dcm");
        assert_eq!(relative_path(root, &path), "3/DICOM/a.dcm");
    }

    #[test]
    fn missing_directory_is_reported() {
        let err = scan_path(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }
}
