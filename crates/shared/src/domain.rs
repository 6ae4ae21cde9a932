use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Sentinel value of the site selector meaning "every known site".
pub const ALL_SITES: &str = "ALL";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaunchSite(pub String);

impl LaunchSite {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LaunchSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum OutcomeClass {
    Failure,
    Success,
}

impl OutcomeClass {
    /// Both classes in chart order.
    pub const ALL: [OutcomeClass; 2] = [OutcomeClass::Failure, OutcomeClass::Success];

    pub fn label(self) -> &'static str {
        match self {
            Self::Failure => "0",
            Self::Success => "1",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Self::Failure => 0,
            Self::Success => 1,
        }
    }
}

impl TryFrom<i64> for OutcomeClass {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Failure),
            1 => Ok(Self::Success),
            other => Err(DomainError::InvalidOutcomeClass(other)),
        }
    }
}

impl From<OutcomeClass> for i64 {
    fn from(value: OutcomeClass) -> Self {
        value.index() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub flight_number: u32,
    pub site: LaunchSite,
    pub outcome_class: OutcomeClass,
    pub payload_mass_kg: f64,
    pub booster_version: String,
    pub booster_version_category: String,
}

impl LaunchRecord {
    pub fn has_valid_payload(&self) -> bool {
        self.payload_mass_kg.is_finite() && self.payload_mass_kg >= 0.0
    }
}

/// Value of the site selector: the `ALL` sentinel or one concrete site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SiteSelection {
    #[default]
    All,
    Site(LaunchSite),
}

impl SiteSelection {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw == ALL_SITES {
            Self::All
        } else {
            Self::Site(LaunchSite::new(raw))
        }
    }

    /// The site-scoping predicate shared by every projection.
    pub fn admits(&self, site: &LaunchSite) -> bool {
        match self {
            Self::All => true,
            Self::Site(selected) => selected == site,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_SITES,
            Self::Site(site) => site.as_str(),
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for SiteSelection {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<SiteSelection> for String {
    fn from(value: SiteSelection) -> Self {
        value.as_str().to_string()
    }
}

/// The fixed, ordered set of launch sites known once the dataset is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnownSites(Vec<LaunchSite>);

impl KnownSites {
    /// Builds the set keeping first-seen order and dropping repeats.
    pub fn new(sites: impl IntoIterator<Item = LaunchSite>) -> Self {
        let mut ordered: Vec<LaunchSite> = Vec::new();
        for site in sites {
            if !ordered.contains(&site) {
                ordered.push(site);
            }
        }
        Self(ordered)
    }

    pub fn contains(&self, site: &LaunchSite) -> bool {
        self.0.contains(site)
    }

    pub fn position(&self, site: &LaunchSite) -> Option<usize> {
        self.0.iter().position(|known| known == site)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LaunchSite> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses raw selector input, rejecting anything outside known sites and `ALL`.
    pub fn resolve(&self, raw: &str) -> Result<SiteSelection, DomainError> {
        let selection = SiteSelection::parse(raw);
        self.validate(&selection)?;
        Ok(selection)
    }

    pub fn validate(&self, selection: &SiteSelection) -> Result<(), DomainError> {
        match selection {
            SiteSelection::All => Ok(()),
            SiteSelection::Site(site) if self.contains(site) => Ok(()),
            SiteSelection::Site(site) => Err(DomainError::InvalidSelection(site.0.clone())),
        }
    }
}

/// Closed payload interval `[low, high]`; construction guarantees `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPayloadRange")]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

#[derive(Deserialize)]
struct RawPayloadRange {
    low: f64,
    high: f64,
}

impl TryFrom<RawPayloadRange> for PayloadRange {
    type Error = DomainError;

    fn try_from(value: RawPayloadRange) -> Result<Self, Self::Error> {
        Self::new(value.low, value.high)
    }
}

impl PayloadRange {
    pub fn new(low: f64, high: f64) -> Result<Self, DomainError> {
        let range = Self { low, high };
        if range.is_well_formed() {
            Ok(range)
        } else {
            Err(DomainError::InvalidRange { low, high })
        }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn is_well_formed(&self) -> bool {
        !self.low.is_nan() && !self.high.is_nan() && self.low <= self.high
    }

    /// Inclusive on both ends.
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        payload_mass_kg >= self.low && payload_mass_kg <= self.high
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlState {
    pub selected_site: SiteSelection,
    pub payload_range: PayloadRange,
}

impl ControlState {
    pub fn new(selected_site: SiteSelection, payload_range: PayloadRange) -> Self {
        Self {
            selected_site,
            payload_range,
        }
    }
}
