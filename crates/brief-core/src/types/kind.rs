//! Entity kind labels.
//!
//! Extractors use their own taxonomies ("PERSON", "org", "geo", ...). This
//! module folds the common ones onto a fixed set of canonical kinds and lets
//! everything else through untouched.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Canonical entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// A person (e.g., "Jane Doe").
    Person,
    /// An organization (e.g., "Acme Corp", "FBI").
    Organization,
    /// A place (e.g., "Chicago").
    Location,
    /// A named event.
    Event,
    /// A date or time expression.
    Date,
    /// A creative work.
    WorkOfArt,
    /// A product.
    ConsumerGood,
    /// A street address.
    Address,
    /// A phone number.
    PhoneNumber,
    /// A bare number.
    Number,
    /// A monetary amount.
    Price,
    /// Sentinel for missing or empty labels.
    Other,
    /// A non-empty label outside the synonym table, original casing kept.
    Custom(String),
}

impl EntityKind {
    /// Parse a kind label with flexible matching.
    ///
    /// Handles variations like "PERSON", "per", "org", "company", "geo",
    /// "place", "time". Empty or missing labels become `Other`; unknown
    /// labels pass through as `Custom` with their original casing.
    pub fn from_label(raw: Option<&str>) -> Self {
        let trimmed = raw.map(str::trim).unwrap_or("");
        if trimmed.is_empty() {
            return Self::Other;
        }

        let normalized = trimmed.to_lowercase().replace(['-', ' '], "_");

        match normalized.as_str() {
            "person" | "per" | "people" | "individual" => Self::Person,

            "organization" | "organisation" | "org" | "company" | "corporation"
            | "institution" | "agency" => Self::Organization,

            "location" | "loc" | "geo" | "gpe" | "place" | "city" | "country"
            | "region" => Self::Location,

            "event" | "evt" => Self::Event,

            "date" | "time" | "datetime" => Self::Date,

            "work_of_art" | "artwork" => Self::WorkOfArt,

            "consumer_good" | "product" => Self::ConsumerGood,

            "address" => Self::Address,

            "phone_number" | "phone" => Self::PhoneNumber,

            "number" | "num" | "quantity" => Self::Number,

            "price" | "money" => Self::Price,

            "other" | "misc" | "unknown" => Self::Other,

            _ => Self::Custom(trimmed.to_string()),
        }
    }

    /// Label for display and serialization.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Person => "Person",
            Self::Organization => "Organization",
            Self::Location => "Location",
            Self::Event => "Event",
            Self::Date => "Date",
            Self::WorkOfArt => "Work of Art",
            Self::ConsumerGood => "Consumer Good",
            Self::Address => "Address",
            Self::PhoneNumber => "Phone Number",
            Self::Number => "Number",
            Self::Price => "Price",
            Self::Other => "Other",
            Self::Custom(label) => label,
        }
    }
}

impl Default for EntityKind {
    fn default() -> Self {
        Self::Other
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntityKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EntityKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Self::from_label(Some(&label)))
    }
}
