//! Carried parameters: the flat string map each step reads and writes.
//!
//! The front end serializes this map into the URL between pages. The core
//! only needs `get`/`set` plus JSON encoding for structured fields.

use crate::data_model::{Category, CategoryBudget, LodgingSelection, Selection, StayLength};
use crate::error::PlannerError;
use crate::trip_state::TripState;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const KEY_SESSION: &str = "sessionId";
pub const KEY_STARTED: &str = "startedAt";
pub const KEY_REGION: &str = "region";
pub const KEY_REGION_ALIAS: &str = "regionIds";
pub const KEY_PERIOD: &str = "period";
pub const KEY_WHO: &str = "who";
pub const KEY_STYLE: &str = "style";
pub const KEY_TOTAL: &str = "totalAmount";
pub const KEY_BREAKDOWN: &str = "breakdown";
pub const KEY_HOTEL_ID: &str = "hotelId";
pub const KEY_HOTEL_NAME: &str = "hotelName";
pub const KEY_HOTEL_PRICE: &str = "hotelPrice";
pub const KEY_RESTAURANTS: &str = "selectedRestaurants";
pub const KEY_TOURISTS: &str = "selectedTourists";
pub const KEY_RESTAURANT_TOTAL: &str = "restaurantTotalPrice";
pub const KEY_TOURIST_TOTAL: &str = "touristTotalPrice";

/// Flat string-keyed parameter set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet {
    values: BTreeMap<String, String>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// First non-empty value among `keys`
    pub fn get_any(&self, keys: &[&str]) -> Option<&str> {
        keys.iter()
            .filter_map(|k| self.get(k))
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), PlannerError> {
        let encoded = serde_json::to_string(value)
            .map_err(|e| PlannerError::InvalidState(format!("cannot encode `{}`: {}", key, e)))?;
        self.set(key, encoded);
        Ok(())
    }

    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PlannerError> {
        match self.get(key) {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| PlannerError::InvalidState(format!("malformed `{}`: {}", key, e))),
        }
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, PlannerError> {
        match self.get(key).map(|v| v.trim().replace(',', "")) {
            None => Ok(None),
            Some(v) if v.is_empty() => Ok(None),
            Some(v) => v
                .parse()
                .map(Some)
                .map_err(|_| PlannerError::InvalidState(format!("`{}` is not a whole number: '{}'", key, v))),
        }
    }

    /// Comma-separated list, trimmed, empties dropped
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl FromIterator<(String, String)> for ParamSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl TripState {
    /// Write every set field into a parameter map
    pub fn to_params(&self) -> Result<ParamSet, PlannerError> {
        let mut params = ParamSet::new();
        params.set(KEY_SESSION, self.session_id.clone());
        params.set(KEY_STARTED, self.started_at.to_rfc3339());

        if let Some(region) = &self.region {
            params.set(KEY_REGION, region.clone());
        }
        if let Some(stay) = self.stay_length {
            params.set(KEY_PERIOD, stay.to_string());
        }
        if !self.companions.is_empty() {
            params.set(KEY_WHO, join(&self.companions));
        }
        if !self.style.is_empty() {
            params.set(KEY_STYLE, join(&self.style));
        }
        if let Some(total) = self.total_budget {
            params.set(KEY_TOTAL, total.to_string());
        }
        if let Some(budget) = &self.category_budget {
            let breakdown: BTreeMap<&str, u64> = budget
                .iter()
                .map(|(category, amount)| (category.legacy_key(), amount))
                .collect();
            params.set_json(KEY_BREAKDOWN, &breakdown)?;
        }
        if let Some(lodging) = &self.lodging_selection {
            params.set(KEY_HOTEL_ID, lodging.id.clone());
            params.set(KEY_HOTEL_NAME, lodging.name.clone());
            params.set(KEY_HOTEL_PRICE, lodging.price_per_night.to_string());
        }
        if !self.dining_selections.is_empty() {
            params.set_json(KEY_RESTAURANTS, &self.dining_selections)?;
            params.set(KEY_RESTAURANT_TOTAL, self.dining_spent().to_string());
        }
        if !self.attraction_selections.is_empty() {
            params.set_json(KEY_TOURISTS, &self.attraction_selections)?;
            params.set(KEY_TOURIST_TOTAL, self.attraction_spent().to_string());
        }

        Ok(params)
    }

    /// Rebuild a state from carried parameters.
    ///
    /// Derived totals (`restaurantTotalPrice`, `touristTotalPrice`) are
    /// recomputed from the selections rather than trusted.
    pub fn from_params(params: &ParamSet) -> Result<TripState, PlannerError> {
        let mut state = TripState::new();

        if let Some(session) = params.get_any(&[KEY_SESSION]) {
            state.session_id = session.to_string();
        }
        if let Some(started) = params.get_any(&[KEY_STARTED]) {
            state.started_at = DateTime::parse_from_rfc3339(started)
                .map_err(|e| PlannerError::InvalidState(format!("malformed `{}`: {}", KEY_STARTED, e)))?
                .with_timezone(&Utc);
        }
        state.region = params
            .get_any(&[KEY_REGION, KEY_REGION_ALIAS])
            .map(str::to_string);
        state.stay_length = params
            .get_any(&[KEY_PERIOD])
            .map(str::parse::<StayLength>)
            .transpose()?;
        state.companions = params.get_list(KEY_WHO).into_iter().collect();
        state.style = params.get_list(KEY_STYLE).into_iter().collect();
        state.total_budget = params.get_u64(KEY_TOTAL)?;
        state.category_budget = params
            .get_json::<BTreeMap<String, f64>>(KEY_BREAKDOWN)?
            .map(|raw| breakdown_from_map(&raw))
            .transpose()?;

        let hotel_id = params.get_any(&[KEY_HOTEL_ID]);
        let hotel_name = params.get_any(&[KEY_HOTEL_NAME]);
        if hotel_id.is_some() || hotel_name.is_some() {
            state.lodging_selection = Some(LodgingSelection::new(
                hotel_id.unwrap_or_default(),
                hotel_name.unwrap_or_default(),
                params.get_u64(KEY_HOTEL_PRICE)?.unwrap_or(0),
            ));
        }

        state.dining_selections = params
            .get_json::<Vec<Selection>>(KEY_RESTAURANTS)?
            .unwrap_or_default();
        state.attraction_selections = params
            .get_json::<Vec<Selection>>(KEY_TOURISTS)?
            .unwrap_or_default();

        state.validate()?;
        Ok(state)
    }
}

fn join(values: &std::collections::BTreeSet<String>) -> String {
    values.iter().cloned().collect::<Vec<_>>().join(",")
}

fn breakdown_from_map(raw: &BTreeMap<String, f64>) -> Result<CategoryBudget, PlannerError> {
    let mut budget = CategoryBudget::default();
    for (key, value) in raw {
        let category = Category::from_key(key)
            .ok_or_else(|| PlannerError::InvalidState(format!("unknown budget category '{}'", key)))?;
        if !value.is_finite() || *value < 0.0 {
            return Err(PlannerError::InvalidState(format!(
                "budget for '{}' must be a non-negative number",
                key
            )));
        }
        budget = budget.with(category, value.round() as u64);
    }
    Ok(budget)
}
