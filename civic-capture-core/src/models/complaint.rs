use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::artifact::{CaptureArtifact, MediaKind};
use super::error::ValidationError;
use super::location::LocationResult;

/// Label stored when the citizen did not pick a location.
pub const NO_LOCATION_LABEL: &str = "Location not provided";

/// Complaint category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Potholes,
    Garbage,
    Streetlights,
    Drainage,
    WaterSupply,
    Sewage,
    RoadDamage,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Potholes,
        Self::Garbage,
        Self::Streetlights,
        Self::Drainage,
        Self::WaterSupply,
        Self::Sewage,
        Self::RoadDamage,
        Self::Other,
    ];

    /// Identifier stored in the complaints table.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Potholes => "potholes",
            Self::Garbage => "garbage",
            Self::Streetlights => "streetlights",
            Self::Drainage => "drainage",
            Self::WaterSupply => "water_supply",
            Self::Sewage => "sewage",
            Self::RoadDamage => "road_damage",
            Self::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Potholes => "Potholes",
            Self::Garbage => "Garbage",
            Self::Streetlights => "Street Lights",
            Self::Drainage => "Drainage",
            Self::WaterSupply => "Water Supply",
            Self::Sewage => "Sewage",
            Self::RoadDamage => "Road Damage",
            Self::Other => "Other",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.id() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// Review status of a stored complaint. New complaints always start `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

/// Identifier assigned by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintId(pub String);

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An in-progress complaint with its optional evidence.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComplaintDraft {
    pub title: String,
    pub description: String,
    pub category: Option<Category>,
    pub priority: Priority,
    pub image: Option<CaptureArtifact>,
    pub voice: Option<CaptureArtifact>,
    pub location: Option<LocationResult>,
}

impl ComplaintDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: Some(category),
            ..Default::default()
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_image(mut self, image: CaptureArtifact) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_voice(mut self, voice: CaptureArtifact) -> Self {
        self.voice = Some(voice);
        self
    }

    pub fn with_location(mut self, location: LocationResult) -> Self {
        self.location = Some(location);
        self
    }

    /// Checks the required text fields and that each attachment sits in the right slot.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError { field: "title" });
        }
        if self.category.is_none() {
            return Err(ValidationError { field: "category" });
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError { field: "description" });
        }
        if self.image.as_ref().is_some_and(|a| a.kind() != MediaKind::Image) {
            return Err(ValidationError { field: "image" });
        }
        if self.voice.as_ref().is_some_and(|a| a.kind() != MediaKind::Voice) {
            return Err(ValidationError { field: "voice" });
        }
        Ok(())
    }

    /// Attachments present on the draft, image first.
    pub fn attachments(&self) -> impl Iterator<Item = &CaptureArtifact> {
        self.image.iter().chain(self.voice.iter())
    }
}

/// The row handed to the persistence collaborator.
///
/// Field names follow the columns of the complaints table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplaintRow {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    #[serde(rename = "image_url")]
    pub image_key: Option<String>,
    #[serde(rename = "voice_url")]
    pub voice_key: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "location")]
    pub location_label: String,
    pub status: ComplaintStatus,
}
