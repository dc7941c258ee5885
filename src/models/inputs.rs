use crate::error::{AdvisorError, Result};
use serde::{Deserialize, Serialize};

/// Maximum crop name length accepted from callers.
pub const MAX_CROP_LEN: usize = 100;

/// Crops offered as suggestions; any crop name is accepted.
pub const COMMON_CROPS: [&str; 15] = [
    "Rice", "Wheat", "Maize", "Cotton", "Sugarcane", "Groundnut", "Soybean", "Barley", "Millets",
    "Pulses", "Tomato", "Onion", "Potato", "Chili", "Brinjal",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilType {
    Sandy,
    Clay,
    Loamy,
    Black,
    Red,
    Alluvial,
}

impl SoilType {
    pub const ALL: [SoilType; 6] = [
        SoilType::Sandy,
        SoilType::Clay,
        SoilType::Loamy,
        SoilType::Black,
        SoilType::Red,
        SoilType::Alluvial,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilType::Sandy => "Sandy",
            SoilType::Clay => "Clay",
            SoilType::Loamy => "Loamy",
            SoilType::Black => "Black",
            SoilType::Red => "Red",
            SoilType::Alluvial => "Alluvial",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sandy" => Some(SoilType::Sandy),
            "clay" => Some(SoilType::Clay),
            "loamy" => Some(SoilType::Loamy),
            "black" => Some(SoilType::Black),
            "red" => Some(SoilType::Red),
            "alluvial" => Some(SoilType::Alluvial),
            _ => None,
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Kharif,
    Rabi,
    Summer,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Kharif, Season::Rabi, Season::Summer, Season::Winter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "Kharif",
            Season::Rabi => "Rabi",
            Season::Summer => "Summer",
            Season::Winter => "Winter",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kharif" => Some(Season::Kharif),
            "rabi" => Some(Season::Rabi),
            "summer" => Some(Season::Summer),
            "winter" => Some(Season::Winter),
            _ => None,
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw advisory request as received from a caller, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRequest {
    pub crop: Option<String>,
    pub soil_type: String,
    pub season: String,
}

impl AdvisoryRequest {
    pub fn new(crop: Option<&str>, soil_type: &str, season: &str) -> Self {
        Self {
            crop: crop.map(str::to_string),
            soil_type: soil_type.to_string(),
            season: season.to_string(),
        }
    }

    /// Reject requests outside the supported soil/season enumerations.
    pub fn validate(&self) -> Result<AdvisoryInputs> {
        if self.soil_type.trim().is_empty() {
            return Err(AdvisorError::InvalidInput("Soil type is required".into()));
        }
        if self.season.trim().is_empty() {
            return Err(AdvisorError::InvalidInput("Season is required".into()));
        }

        let soil = SoilType::from_str(&self.soil_type).ok_or_else(|| {
            AdvisorError::InvalidInput(format!(
                "Invalid soil type '{}'. Must be one of: {}",
                self.soil_type.trim(),
                join_names(SoilType::ALL.iter().map(|s| s.as_str()))
            ))
        })?;

        let season = Season::from_str(&self.season).ok_or_else(|| {
            AdvisorError::InvalidInput(format!(
                "Invalid season '{}'. Must be one of: {}",
                self.season.trim(),
                join_names(Season::ALL.iter().map(|s| s.as_str()))
            ))
        })?;

        if let Some(crop) = &self.crop {
            if crop.trim().chars().count() > MAX_CROP_LEN {
                return Err(AdvisorError::InvalidInput(format!(
                    "Crop name cannot exceed {} characters",
                    MAX_CROP_LEN
                )));
            }
        }

        Ok(AdvisoryInputs::normalize(
            self.crop.as_deref(),
            soil.as_str(),
            season.as_str(),
        ))
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// Normalized inputs consumed by the resolvers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryInputs {
    pub crop: Option<String>,
    pub soil_type: String,
    pub season: String,
}

impl AdvisoryInputs {
    /// Trim every field; a blank crop counts as absent.
    pub fn normalize(crop: Option<&str>, soil_type: &str, season: &str) -> Self {
        Self {
            crop: crop
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            soil_type: soil_type.trim().to_string(),
            season: season.trim().to_string(),
        }
    }

    /// The crop, unless absent or the literal "unknown".
    pub fn known_crop(&self) -> Option<&str> {
        self.crop
            .as_deref()
            .filter(|c| !c.eq_ignore_ascii_case("unknown"))
    }
}
