use dicom::core::Tag;
use dicom::dictionary_std::StandardDataDictionary;
use dicom::object::{DefaultDicomObject, InMemDicomObject};

// Patient / study / series identification
pub const PATIENT_NAME: Tag = Tag(0x0010, 0x0010);
pub const PATIENT_ID: Tag = Tag(0x0010, 0x0020);
pub const STUDY_INSTANCE_UID: Tag = Tag(0x0020, 0x000D);
pub const STUDY_DATE: Tag = Tag(0x0008, 0x0020);
pub const STUDY_DESCRIPTION: Tag = Tag(0x0008, 0x1030);
pub const SERIES_INSTANCE_UID: Tag = Tag(0x0020, 0x000E);
pub const SERIES_NUMBER: Tag = Tag(0x0020, 0x0011);
pub const SERIES_DESCRIPTION: Tag = Tag(0x0008, 0x103E);
pub const MODALITY: Tag = Tag(0x0008, 0x0060);

// Instance
pub const SOP_CLASS_UID: Tag = Tag(0x0008, 0x0016);
pub const SOP_INSTANCE_UID: Tag = Tag(0x0008, 0x0018);
pub const INSTANCE_NUMBER: Tag = Tag(0x0020, 0x0013);
pub const ROWS: Tag = Tag(0x0028, 0x0010);
pub const COLUMNS: Tag = Tag(0x0028, 0x0011);
pub const FRAME_OF_REFERENCE_UID: Tag = Tag(0x0020, 0x0052);
pub const IMAGE_POSITION_PATIENT: Tag = Tag(0x0020, 0x0032);
pub const IMAGE_ORIENTATION_PATIENT: Tag = Tag(0x0020, 0x0037);
pub const PIXEL_SPACING: Tag = Tag(0x0028, 0x0030);

/// Small helper trait to pull typed values from different DICOM object shapes.
pub trait ElementAccess {
    fn element_str(&self, tag: Tag) -> Option<String>;
    fn element_int(&self, tag: Tag) -> Option<i64>;
    fn element_floats(&self, tag: Tag) -> Option<Vec<f64>>;

    /// Like [`ElementAccess::element_str`], but blank values count as missing.
    fn element_text(&self, tag: Tag) -> Option<String> {
        self.element_str(tag)
            .map(|s| s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).to_string())
            .filter(|s| !s.is_empty())
    }

    /// Fixed-size numeric vector, e.g. the 3 components of Image Position (Patient).
    fn element_array<const N: usize>(&self, tag: Tag) -> Option<[f64; N]> {
        self.element_floats(tag)
            .and_then(|values| <[f64; N]>::try_from(values).ok())
    }
}

impl ElementAccess for DefaultDicomObject {
    fn element_str(&self, tag: Tag) -> Option<String> {
        self.element(tag)
            .ok()
            .and_then(|e| e.to_str().ok())
            .map(|s| s.into_owned())
    }

    fn element_int(&self, tag: Tag) -> Option<i64> {
        self.element(tag).ok().and_then(|e| e.to_int::<i64>().ok())
    }

    fn element_floats(&self, tag: Tag) -> Option<Vec<f64>> {
        let element = self.element(tag).ok()?;
        element
            .to_multi_float64()
            .ok()
            .or_else(|| split_decimals(&element.to_str().ok()?))
    }
}

impl ElementAccess for InMemDicomObject<StandardDataDictionary> {
    fn element_str(&self, tag: Tag) -> Option<String> {
        self.element(tag)
            .ok()
            .and_then(|e| e.to_str().ok())
            .map(|s| s.into_owned())
    }

    fn element_int(&self, tag: Tag) -> Option<i64> {
        self.element(tag).ok().and_then(|e| e.to_int::<i64>().ok())
    }

    fn element_floats(&self, tag: Tag) -> Option<Vec<f64>> {
        let element = self.element(tag).ok()?;
        element
            .to_multi_float64()
            .ok()
            .or_else(|| split_decimals(&element.to_str().ok()?))
    }
}

// Decimal strings may arrive as one backslash-joined text value.
fn split_decimals(text: &str) -> Option<Vec<f64>> {
    text.split('\\')
        .map(|part| part.trim().parse::<f64>().ok())
        .collect()
}
