//
// models.rs
// Ohif-Viewer-Input-rs
//
// Defines the serializable document handed to the OHIF viewer: studies, series, and instances.
//
// Thales Matheus Mendonça Santos - November 2025

use serde::{Deserialize, Serialize};

/// Top-level viewer input for one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerDocument {
    pub transaction_id: String,
    pub studies: Vec<ViewerStudy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerStudy {
    pub study_instance_uid: String,
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_date: Option<String>,
    pub series_list: Vec<ViewerSeries>,
}

/// A series keeps its `instances` key even when every instance was filtered out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerSeries {
    pub series_instance_uid: String,
    pub series_number: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modality: Option<String>,
    pub scan_id: ScanId,
    pub instances: Vec<ViewerInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerInstance {
    pub sop_instance_uid: String,
    pub instance_number: i32,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_of_reference_uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_position_patient: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_orientation_patient: Option<[f64; 6]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pixel_spacing: Option<[f64; 2]>,
}

/// External scan identifier of a series. Serialized as a string, or `null` when unresolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum ScanId {
    Resolved(String),
    Unresolved,
}

impl ScanId {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            ScanId::Resolved(id) => Some(id),
            ScanId::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, ScanId::Resolved(_))
    }
}

impl From<Option<String>> for ScanId {
    fn from(value: Option<String>) -> Self {
        value.map_or(ScanId::Unresolved, ScanId::Resolved)
    }
}

impl From<ScanId> for Option<String> {
    fn from(value: ScanId) -> Self {
        match value {
            ScanId::Resolved(id) => Some(id),
            ScanId::Unresolved => None,
        }
    }
}

impl ViewerDocument {
    pub fn series(&self) -> impl Iterator<Item = &ViewerSeries> {
        self.studies.iter().flat_map(|study| &study.series_list)
    }

    pub fn instances(&self) -> impl Iterator<Item = &ViewerInstance> {
        self.series().flat_map(|series| &series.instances)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(scan_id: ScanId) -> ViewerSeries {
        ViewerSeries {
            series_instance_uid: "1.2.3".into(),
            series_number: 4,
            series_description: None,
            modality: None,
            scan_id,
            instances: Vec::new(),
        }
    }

    #[test]
    fn unresolved_scan_id_serializes_as_null() {
        let value = serde_json::to_value(series(ScanId::Unresolved)).unwrap();
        assert_eq!(value["scanId"], serde_json::Value::Null);
        assert!(value.as_object().unwrap().contains_key("scanId"));
    }

    #[test]
    fn empty_series_keeps_instances_key() {
        let value = serde_json::to_value(series(ScanId::Resolved("7".into()))).unwrap();
        assert_eq!(
            value,
            json!({
                "seriesInstanceUid": "1.2.3",
                "seriesNumber": 4,
                "scanId": "7",
                "instances": []
            })
        );
    }

    #[test]
    fn instance_omits_absent_position_fields() {
        let instance = ViewerInstance {
            sop_instance_uid: "9.9".into(),
            instance_number: 1,
            url: "dicomweb:http://host/files/a.dcm".into(),
            rows: Some(512),
            columns: Some(512),
            frame_of_reference_uid: None,
            image_position_patient: Some([0.0, -10.5, 3.0]),
            image_orientation_patient: None,
            pixel_spacing: None,
        };
        let value = serde_json::to_value(&instance).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object["imagePositionPatient"], json!([0.0, -10.5, 3.0]));
        assert!(!object.contains_key("pixelSpacing"));
        assert!(!object.contains_key("frameOfReferenceUid"));
    }

    #[test]
    fn scan_id_reads_back_from_null_and_string() {
        let resolved: ScanId = serde_json::from_value(json!("scan-1")).unwrap();
        let unresolved: ScanId = serde_json::from_value(json!(null)).unwrap();
        assert_eq!(resolved.as_deref(), Some("scan-1"));
        assert!(!unresolved.is_resolved());
    }
}
