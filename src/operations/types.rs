//! Operation inputs and typed results.

use serde::{Deserialize, Serialize};

use crate::error_code::ErrorKind;
use crate::provider::GroundingSource;
use crate::{Error, Result};

fn require_text(value: &str, message: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        Err(Error::with_message(ErrorKind::Validation, message))
    } else {
        Ok(())
    }
}

fn require_range(value: u32, min: u32, max: u32, message: &'static str) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(Error::with_message(ErrorKind::Validation, message))
    }
}

pub const MAX_TRIP_DAYS: u32 = 30;
pub const MAX_TRAVELERS: u32 = 20;

// ---- Itinerary ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryParams {
    pub destination: String,
    pub days: u32,
    #[serde(default = "one")]
    pub travelers: u32,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub budget: Option<String>,
    /// ISO date, e.g. `2026-05-01`.
    #[serde(default)]
    pub start_date: Option<String>,
}

fn one() -> u32 {
    1
}

impl ItineraryParams {
    pub fn new(destination: impl Into<String>, days: u32) -> Self {
        Self {
            destination: destination.into(),
            days,
            travelers: 1,
            interests: Vec::new(),
            budget: None,
            start_date: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text(&self.destination, "Please enter a destination.")?;
        require_range(self.days, 1, MAX_TRIP_DAYS, "Trips can be planned for 1 to 30 days.")?;
        require_range(
            self.travelers,
            1,
            MAX_TRAVELERS,
            "Trips can be planned for 1 to 20 travelers.",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub time: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub estimated_cost: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: u32,
    pub title: String,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub destination: String,
    pub summary: String,
    pub days: Vec<ItineraryDay>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

// ---- Packing checklist ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistParams {
    pub destination: String,
    pub days: u32,
    /// Month or season of travel.
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
}

impl ChecklistParams {
    pub fn new(destination: impl Into<String>, days: u32) -> Self {
        Self {
            destination: destination.into(),
            days,
            season: None,
            activities: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text(&self.destination, "Please enter a destination.")?;
        require_range(self.days, 1, MAX_TRIP_DAYS, "Trips can be planned for 1 to 30 days.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub name: String,
    pub quantity: u32,
    pub essential: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistCategory {
    pub name: String,
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingChecklist {
    pub destination: String,
    pub categories: Vec<ChecklistCategory>,
}

impl PackingChecklist {
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }
}

// ---- Price quote ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuoteParams {
    pub origin: String,
    pub destination: String,
    pub days: u32,
    #[serde(default = "one")]
    pub travelers: u32,
    /// e.g. `budget`, `mid-range`, `luxury`.
    #[serde(default)]
    pub travel_style: Option<String>,
    /// ISO 4217 code the quote should use.
    #[serde(default)]
    pub currency: Option<String>,
}

impl PriceQuoteParams {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>, days: u32) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            days,
            travelers: 1,
            travel_style: None,
            currency: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text(&self.origin, "Please enter where you are travelling from.")?;
        require_text(&self.destination, "Please enter a destination.")?;
        require_range(self.days, 1, MAX_TRIP_DAYS, "Trips can be planned for 1 to 30 days.")?;
        require_range(
            self.travelers,
            1,
            MAX_TRAVELERS,
            "Trips can be planned for 1 to 20 travelers.",
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceCategory {
    Flights,
    Accommodation,
    Food,
    Transport,
    Activities,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLine {
    pub category: PriceCategory,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub currency: String,
    pub total_estimate: f64,
    pub breakdown: Vec<PriceLine>,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

impl PriceQuote {
    pub fn breakdown_total(&self) -> f64 {
        self.breakdown.iter().map(|l| l.amount).sum()
    }
}

// ---- Destination suggestions ----

pub const MAX_SUGGESTIONS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationParams {
    /// Free-form likes, e.g. `beaches`, `street food`.
    pub preferences: Vec<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default = "default_suggestion_count")]
    pub count: u32,
}

fn default_suggestion_count() -> u32 {
    5
}

impl DestinationParams {
    pub fn new(preferences: Vec<String>) -> Self {
        Self {
            preferences,
            origin: None,
            month: None,
            budget: None,
            count: default_suggestion_count(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.preferences.iter().all(|p| p.trim().is_empty()) {
            return Err(Error::with_message(
                ErrorKind::Validation,
                "Tell us at least one thing you'd like from the trip.",
            ));
        }
        require_range(
            self.count,
            1,
            MAX_SUGGESTIONS,
            "You can ask for 1 to 10 suggestions.",
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationSuggestion {
    pub name: String,
    pub country: String,
    pub reason: String,
    #[serde(default)]
    pub best_time_to_visit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationSuggestions {
    pub suggestions: Vec<DestinationSuggestion>,
}

// ---- Travel advisory ----

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryParams {
    pub destination: String,
    /// Passport country, for entry requirements.
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub travel_date: Option<String>,
}

impl AdvisoryParams {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            nationality: None,
            travel_date: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text(&self.destination, "Please enter a destination.")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Extreme,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelAdvisory {
    pub destination: String,
    pub risk_level: RiskLevel,
    pub summary: String,
    pub entry_requirements: Vec<String>,
    #[serde(default)]
    pub health: Vec<String>,
    #[serde(default)]
    pub safety: Vec<String>,
    #[serde(default)]
    pub sources: Vec<GroundingSource>,
}

// ---- Phrase sheet ----

pub const MAX_PHRASES: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSheetParams {
    pub destination: String,
    /// Target language; inferred from the destination when absent.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_phrase_count")]
    pub count: u32,
}

fn default_phrase_count() -> u32 {
    15
}

impl PhraseSheetParams {
    pub fn new(destination: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            language: None,
            count: default_phrase_count(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_text(&self.destination, "Please enter a destination.")?;
        require_range(self.count, 1, MAX_PHRASES, "You can ask for 1 to 50 phrases.")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub english: String,
    pub translation: String,
    #[serde(default)]
    pub pronunciation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhraseSheet {
    pub language: String,
    pub phrases: Vec<Phrase>,
}
