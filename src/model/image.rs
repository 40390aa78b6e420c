//! Image references and capture metadata.
//!
//! The crate never touches pixel data. An image is an opaque reference the
//! hosting application knows how to display, plus the capture metadata the
//! workspace routes on.

use serde::{Deserialize, Serialize};

/// Capture technique of a displayed image.
///
/// Serialized with the clinical spellings the rest of the system uses
/// ("CFP", "FFA", "OCT", "other").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Modality {
    /// Color fundus photography
    #[serde(rename = "CFP")]
    Cfp,
    /// Fundus fluorescein angiography
    #[serde(rename = "FFA")]
    Ffa,
    /// Optical coherence tomography
    #[serde(rename = "OCT")]
    Oct,
    /// Unrecognized modality; also the compare slot in the quadrant layout
    #[default]
    #[serde(rename = "other")]
    Other,
}

impl Modality {
    /// All modalities in quadrant order.
    pub const ALL: [Modality; 4] = [
        Modality::Cfp,
        Modality::Ffa,
        Modality::Oct,
        Modality::Other,
    ];

    /// Stable quadrant index for the four-view layout.
    pub fn quadrant(self) -> usize {
        match self {
            Modality::Cfp => 0,
            Modality::Ffa => 1,
            Modality::Oct => 2,
            Modality::Other => 3,
        }
    }

    /// Display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Modality::Cfp => "CFP",
            Modality::Ffa => "FFA",
            Modality::Oct => "OCT",
            Modality::Other => "other",
        }
    }
}

/// Which eye an image was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eye {
    /// Oculus dexter, the right eye
    #[serde(rename = "OD")]
    Od,
    /// Oculus sinister, the left eye
    #[serde(rename = "OS")]
    Os,
}

impl Eye {
    pub fn as_str(self) -> &'static str {
        match self {
            Eye::Od => "OD",
            Eye::Os => "OS",
        }
    }
}

/// A displayable image owned by the hosting application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Opaque identity; canvases compare ids to detect an image change
    pub id: String,
    /// Opaque displayable location, resolved by the host only
    pub url: String,
    /// Capture technique; unknown intakes fall back to `Other`
    #[serde(default)]
    pub modality: Modality,
    /// Eye laterality, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye: Option<Eye>,
}

impl ImageRef {
    pub fn new(id: impl Into<String>, url: impl Into<String>, modality: Modality) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            modality,
            eye: None,
        }
    }

    pub fn with_eye(mut self, eye: Eye) -> Self {
        self.eye = Some(eye);
        self
    }
}
