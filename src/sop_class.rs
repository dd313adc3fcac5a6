//
// sop_class.rs
// Ohif-Viewer-Input-rs
//
// Classifies SOP class UIDs into single-frame and multi-frame encodings using a fixed lookup table.
//
// Thales Matheus Mendonça Santos - November 2025

use std::collections::BTreeSet;

/// SOP classes whose instances carry several frames in one object.
pub const MULTI_FRAME_SOP_CLASS_UIDS: [&str; 7] = [
    "1.2.840.10008.5.1.4.1.1.3",    // Ultrasound Multi-frame Image (retired)
    "1.2.840.10008.5.1.4.1.1.3.1",  // Ultrasound Multi-frame Image
    "1.2.840.10008.5.1.4.1.1.7.1",  // Multi-frame Single Bit Secondary Capture
    "1.2.840.10008.5.1.4.1.1.7.2",  // Multi-frame Grayscale Byte Secondary Capture
    "1.2.840.10008.5.1.4.1.1.7.3",  // Multi-frame Grayscale Word Secondary Capture
    "1.2.840.10008.5.1.4.1.1.7.4",  // Multi-frame True Color Secondary Capture
    "1.2.840.10008.5.1.4.1.1.77.2", // Multi-frame Video Photographic Image
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Single,
    Multi,
}

/// Set of SOP class UIDs treated as multi-frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SopClassTable {
    multi_frame: BTreeSet<String>,
}

impl Default for SopClassTable {
    fn default() -> Self {
        MULTI_FRAME_SOP_CLASS_UIDS.iter().copied().collect()
    }
}

impl SopClassTable {
    /// A table with no multi-frame entries; every instance classifies as single-frame.
    pub fn empty() -> Self {
        Self {
            multi_frame: BTreeSet::new(),
        }
    }

    pub fn with_uid(mut self, uid: impl AsRef<str>) -> Self {
        self.multi_frame.insert(normalize_uid(uid.as_ref()).to_string());
        self
    }

    pub fn is_multi_frame(&self, sop_class_uid: &str) -> bool {
        self.multi_frame.contains(normalize_uid(sop_class_uid))
    }

    pub fn classify(&self, sop_class_uid: &str) -> FrameKind {
        if self.is_multi_frame(sop_class_uid) {
            FrameKind::Multi
        } else {
            FrameKind::Single
        }
    }

    pub fn len(&self) -> usize {
        self.multi_frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.multi_frame.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SopClassTable {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::empty(), |table, uid| table.with_uid(uid))
    }
}

// UI values are padded to even length with NUL, and some writers add spaces.
fn normalize_uid(uid: &str) -> &str {
    uid.trim_matches(|c: char| c == '\0' || c.is_whitespace())
}
