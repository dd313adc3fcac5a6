//
// builder.rs
// Ohif-Viewer-Input-rs
//
// Walks a scanned patient tree and produces the viewer document: multi-frame instances are left out,
// series get their scan id, and every kept instance gets an access URL.
//
// Thales Matheus Mendonça Santos - November 2025

use rayon::prelude::*;
use tracing::debug;

use crate::error::BuildError;
use crate::models::{ScanId, ViewerDocument, ViewerInstance, ViewerSeries, ViewerStudy};
use crate::resolver::ScanIdResolver;
use crate::sop_class::{FrameKind, SopClassTable};
use crate::source::{PatientRoot, SourceInstance, SourcePatient, SourceSeries, SourceStudy};

/// Build a document with the default multi-frame table.
pub fn build<R>(
    transaction_id: &str,
    root: Option<&PatientRoot>,
    resolver: &R,
    base_url: &str,
) -> Result<ViewerDocument, BuildError>
where
    R: ScanIdResolver + ?Sized,
{
    MetadataBuilder::default().build(transaction_id, root, resolver, base_url)
}

/// Joins the base URL and an instance's relative path with exactly one `/`.
pub fn instance_url(base_url: &str, relative_path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        relative_path.trim_start_matches('/')
    )
}

#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    classification: SopClassTable,
}

impl MetadataBuilder {
    pub fn new(classification: SopClassTable) -> Self {
        Self { classification }
    }

    pub fn classification(&self) -> &SopClassTable {
        &self.classification
    }

    pub fn build<R>(
        &self,
        transaction_id: &str,
        root: Option<&PatientRoot>,
        resolver: &R,
        base_url: &str,
    ) -> Result<ViewerDocument, BuildError>
    where
        R: ScanIdResolver + ?Sized,
    {
        let root = check_input(transaction_id, root)?;
        let studies = root
            .studies()
            .map(|(patient, study)| self.study(patient, study, resolver, base_url))
            .collect();
        Ok(self.finish(transaction_id, studies))
    }

    /// Same output as [`MetadataBuilder::build`], with studies mapped on the rayon pool.
    pub fn build_parallel<R>(
        &self,
        transaction_id: &str,
        root: Option<&PatientRoot>,
        resolver: &R,
        base_url: &str,
    ) -> Result<ViewerDocument, BuildError>
    where
        R: ScanIdResolver + Sync + ?Sized,
    {
        let root = check_input(transaction_id, root)?;
        let pairs: Vec<_> = root.studies().collect();
        // Indexed collect keeps the source order of studies.
        let studies = pairs
            .par_iter()
            .map(|(patient, study)| self.study(patient, study, resolver, base_url))
            .collect();
        Ok(self.finish(transaction_id, studies))
    }

    fn finish(&self, transaction_id: &str, studies: Vec<ViewerStudy>) -> ViewerDocument {
        let document = ViewerDocument {
            transaction_id: transaction_id.to_string(),
            studies,
        };
        debug!(
            "Built viewer document {}: {} studies, {} series, {} instances",
            document.transaction_id,
            document.studies.len(),
            document.series().count(),
            document.instances().count()
        );
        document
    }

    fn study<R>(
        &self,
        patient: &SourcePatient,
        study: &SourceStudy,
        resolver: &R,
        base_url: &str,
    ) -> ViewerStudy
    where
        R: ScanIdResolver + ?Sized,
    {
        ViewerStudy {
            study_instance_uid: study.uid.clone(),
            patient_name: patient.name.clone(),
            study_description: study.description.clone(),
            study_date: study.date.clone(),
            series_list: study
                .series
                .iter()
                .map(|series| self.series(series, resolver, base_url))
                .collect(),
        }
    }

    fn series<R>(&self, series: &SourceSeries, resolver: &R, base_url: &str) -> ViewerSeries
    where
        R: ScanIdResolver + ?Sized,
    {
        let scan_id = resolver.resolve(&series.uid);
        if scan_id == ScanId::Unresolved {
            debug!("No scan id mapped for series {}", series.uid);
        }

        ViewerSeries {
            series_instance_uid: series.uid.clone(),
            series_number: series.number,
            series_description: series.description.clone(),
            modality: series.modality.clone(),
            scan_id,
            instances: series
                .instances
                .iter()
                .filter_map(|instance| self.instance(instance, base_url))
                .collect(),
        }
    }

    fn instance(&self, instance: &SourceInstance, base_url: &str) -> Option<ViewerInstance> {
        match self.classification.classify(&instance.sop_class_uid) {
            // The viewer cannot display multi-frame objects yet.
            FrameKind::Multi => {
                debug!(
                    "Skipping multi-frame instance {} ({})",
                    instance.uid, instance.sop_class_uid
                );
                None
            }
            FrameKind::Single => Some(ViewerInstance {
                sop_instance_uid: instance.uid.clone(),
                instance_number: instance.instance_number,
                url: instance_url(base_url, &instance.relative_path),
                rows: instance.rows,
                columns: instance.columns,
                frame_of_reference_uid: instance.frame_of_reference_uid.clone(),
                image_position_patient: instance.image_position_patient,
                image_orientation_patient: instance.image_orientation_patient,
                pixel_spacing: instance.pixel_spacing,
            }),
        }
    }
}

fn check_input<'a>(
    transaction_id: &str,
    root: Option<&'a PatientRoot>,
) -> Result<&'a PatientRoot, BuildError> {
    if transaction_id.is_empty() {
        return Err(BuildError::MissingTransactionId);
    }
    root.ok_or(BuildError::NoInput)
}
