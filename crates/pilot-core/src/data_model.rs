//! Data Model: StayLength, Category, CategoryBudget, Selection, StageProof
use crate::error::PlannerError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Longest stay the planner offers
pub const MAX_NIGHTS: u8 = 5;

static NIGHTS_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*(?:박|-?\s*nights?)?\s*(?:\d+\s*일)?$").expect("valid nights pattern")
});

/// How long the trip lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StayLength {
    /// Same-day trip, no lodging
    DayTrip,
    /// Overnight trip of 1..=5 nights
    Nights(u8),
}

impl StayLength {
    pub fn nights(&self) -> u8 {
        match self {
            StayLength::DayTrip => 0,
            StayLength::Nights(n) => *n,
        }
    }

    /// Number of calendar days the itinerary covers
    pub fn days(&self) -> u8 {
        self.nights() + 1
    }

    pub fn is_day_trip(&self) -> bool {
        matches!(self, StayLength::DayTrip)
    }

    /// Build from a night count, rejecting anything past [`MAX_NIGHTS`]
    pub fn from_nights(nights: u8) -> Result<Self, PlannerError> {
        match nights {
            0 => Ok(StayLength::DayTrip),
            n if n <= MAX_NIGHTS => Ok(StayLength::Nights(n)),
            n => Err(PlannerError::InvalidState(format!(
                "stay of {} nights exceeds the {} night maximum",
                n, MAX_NIGHTS
            ))),
        }
    }
}

impl fmt::Display for StayLength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StayLength::DayTrip => write!(f, "day-trip"),
            StayLength::Nights(n) => write!(f, "{}-night", n),
        }
    }
}

impl FromStr for StayLength {
    type Err = PlannerError;

    /// Accepts `day-trip`, `당일치기`, `2-night`, `2 nights`, `2박3일` and bare counts.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_lowercase();
        if matches!(text.as_str(), "day-trip" | "daytrip" | "day trip" | "당일치기" | "당일") {
            return Ok(StayLength::DayTrip);
        }

        let captures = NIGHTS_PATTERN
            .captures(&text)
            .ok_or_else(|| PlannerError::InvalidState(format!("unrecognized stay length '{}'", s)))?;
        let nights: u8 = captures[1]
            .parse()
            .map_err(|_| PlannerError::InvalidState(format!("unrecognized stay length '{}'", s)))?;

        StayLength::from_nights(nights)
    }
}

impl TryFrom<String> for StayLength {
    type Error = PlannerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StayLength> for String {
    fn from(value: StayLength) -> Self {
        value.to_string()
    }
}

/// Budget category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Lodging,
    Food,
    Sightseeing,
    Other,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Lodging,
        Category::Food,
        Category::Sightseeing,
        Category::Other,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Category::Lodging => "lodging",
            Category::Food => "food",
            Category::Sightseeing => "sightseeing",
            Category::Other => "other",
        }
    }

    /// Key used in the carried `breakdown` parameter
    pub fn legacy_key(&self) -> &'static str {
        match self {
            Category::Lodging => "숙소",
            Category::Food => "식비",
            Category::Sightseeing => "관광",
            Category::Other => "기타",
        }
    }

    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL
            .into_iter()
            .find(|c| c.key() == key || c.legacy_key() == key)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One value per budget category (percentages or currency amounts)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBudget {
    pub lodging: u64,
    pub food: u64,
    pub sightseeing: u64,
    pub other: u64,
}

impl CategoryBudget {
    pub fn new(lodging: u64, food: u64, sightseeing: u64, other: u64) -> Self {
        Self {
            lodging,
            food,
            sightseeing,
            other,
        }
    }

    /// The default 25/25/25/25 split (lodging 0 on a day trip)
    pub fn even_split(stay: StayLength) -> Self {
        if stay.is_day_trip() {
            // 34 + 33 + 33
            Self::new(0, 34, 33, 33)
        } else {
            Self::new(25, 25, 25, 25)
        }
    }

    pub fn get(&self, category: Category) -> u64 {
        match category {
            Category::Lodging => self.lodging,
            Category::Food => self.food,
            Category::Sightseeing => self.sightseeing,
            Category::Other => self.other,
        }
    }

    pub fn with(mut self, category: Category, value: u64) -> Self {
        match category {
            Category::Lodging => self.lodging = value,
            Category::Food => self.food = value,
            Category::Sightseeing => self.sightseeing = value,
            Category::Other => self.other = value,
        }
        self
    }

    /// Sum of all four values, saturating at `u64::MAX`
    pub fn sum(&self) -> u64 {
        self.checked_sum().unwrap_or(u64::MAX)
    }

    /// Sum of all four values, or `None` when it does not fit in a `u64`
    pub fn checked_sum(&self) -> Option<u64> {
        self.lodging
            .checked_add(self.food)?
            .checked_add(self.sightseeing)?
            .checked_add(self.other)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u64)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// A selected dining or sightseeing item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub id: String,
    pub name: String,
    pub price: u64,
}

impl Selection {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
        }
    }
}

/// The chosen place to stay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LodgingSelection {
    pub id: String,
    pub name: String,
    pub price_per_night: u64,
}

impl LodgingSelection {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_per_night: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_per_night,
        }
    }

    pub fn total_for(&self, stay: StayLength) -> u64 {
        self.price_per_night
            .saturating_mul(u64::from(stay.nights().max(1)))
    }
}

/// Trace entry recorded by the runner for every executed step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProof {
    pub id: String,
    pub in_hash: String,
    pub out_hash: String,
    pub deterministic: bool,
    pub latency_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stay_lengths() {
        assert_eq!("당일치기".parse::<StayLength>().unwrap(), StayLength::DayTrip);
        assert_eq!("day-trip".parse::<StayLength>().unwrap(), StayLength::DayTrip);
        assert_eq!("2박3일".parse::<StayLength>().unwrap(), StayLength::Nights(2));
        assert_eq!("1박 2일".parse::<StayLength>().unwrap(), StayLength::Nights(1));
        assert_eq!("3-night".parse::<StayLength>().unwrap(), StayLength::Nights(3));
        assert_eq!("4 nights".parse::<StayLength>().unwrap(), StayLength::Nights(4));
        assert_eq!("0".parse::<StayLength>().unwrap(), StayLength::DayTrip);
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert!("6박7일".parse::<StayLength>().is_err());
        assert!("weekend".parse::<StayLength>().is_err());
    }

    #[test]
    fn test_stay_length_serde_roundtrip_label() {
        let json = serde_json::to_string(&StayLength::Nights(2)).unwrap();
        assert_eq!(json, "\"2-night\"");
        let back: StayLength = serde_json::from_str("\"2박3일\"").unwrap();
        assert_eq!(back, StayLength::Nights(2));
    }

    #[test]
    fn test_days() {
        assert_eq!(StayLength::DayTrip.days(), 1);
        assert_eq!(StayLength::Nights(2).days(), 3);
    }

    #[test]
    fn test_category_keys() {
        assert_eq!(Category::from_key("식비"), Some(Category::Food));
        assert_eq!(Category::from_key("sightseeing"), Some(Category::Sightseeing));
        assert_eq!(Category::from_key("shopping"), None);
    }

    #[test]
    fn test_even_split() {
        assert_eq!(CategoryBudget::even_split(StayLength::Nights(1)).sum(), 100);
        let day = CategoryBudget::even_split(StayLength::DayTrip);
        assert_eq!(day.lodging, 0);
        assert_eq!(day.sum(), 100);
    }

    #[test]
    fn test_lodging_total() {
        let lodging = LodgingSelection::new("r-1", "Seaside Guesthouse", 45_000);
        assert_eq!(lodging.total_for(StayLength::Nights(2)), 90_000);

        let pricey = LodgingSelection::new("r-9", "Penthouse", u64::MAX / 2);
        assert_eq!(pricey.total_for(StayLength::Nights(3)), u64::MAX);
    }

    #[test]
    fn test_sum_overflow() {
        let huge = CategoryBudget::new(u64::MAX, 101, 0, 0);
        assert_eq!(huge.checked_sum(), None);
        assert_eq!(huge.sum(), u64::MAX);
        assert_eq!(CategoryBudget::new(1, 2, 3, 4).checked_sum(), Some(10));
    }
}
