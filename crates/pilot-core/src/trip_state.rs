//! Trip State: decisions accumulated while the pipeline runs
use crate::data_model::{CategoryBudget, LodgingSelection, Selection, StayLength};
use crate::error::PlannerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Everything decided so far in one planning session.
///
/// Steps never edit a state in place: each one clones the prior state,
/// sets its own fields and hands the new value forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripState {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stay_length: Option<StayLength>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub companions: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub style: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_budget: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_budget: Option<CategoryBudget>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lodging_selection: Option<LodgingSelection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dining_selections: Vec<Selection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attraction_selections: Vec<Selection>,
}

impl Default for TripState {
    fn default() -> Self {
        Self::new()
    }
}

impl TripState {
    /// Empty state at pipeline start
    pub fn new() -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            region: None,
            stay_length: None,
            companions: BTreeSet::new(),
            style: BTreeSet::new(),
            total_budget: None,
            category_budget: None,
            lodging_selection: None,
            dining_selections: Vec::new(),
            attraction_selections: Vec::new(),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_stay_length(mut self, stay: StayLength) -> Self {
        self.stay_length = Some(stay);
        self
    }

    pub fn with_companions<I, S>(mut self, companions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.companions = companions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_style<I, S>(mut self, style: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.style = style.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_budget(mut self, total: u64, categories: CategoryBudget) -> Self {
        self.total_budget = Some(total);
        self.category_budget = Some(categories);
        self
    }

    pub fn with_lodging(mut self, lodging: LodgingSelection) -> Self {
        self.lodging_selection = Some(lodging);
        self
    }

    pub fn with_dining(mut self, selections: Vec<Selection>) -> Self {
        self.dining_selections = selections;
        self
    }

    pub fn with_attractions(mut self, selections: Vec<Selection>) -> Self {
        self.attraction_selections = selections;
        self
    }

    /// Night count, 0 while the stay length is unset
    pub fn nights(&self) -> u8 {
        self.stay_length.map(|s| s.nights()).unwrap_or(0)
    }

    pub fn require_region(&self) -> Result<&str, PlannerError> {
        self.region
            .as_deref()
            .ok_or_else(|| missing("region"))
    }

    pub fn require_stay_length(&self) -> Result<StayLength, PlannerError> {
        self.stay_length.ok_or_else(|| missing("stayLength"))
    }

    pub fn require_category_budget(&self) -> Result<&CategoryBudget, PlannerError> {
        self.category_budget
            .as_ref()
            .ok_or_else(|| missing("categoryBudget"))
    }

    pub fn dining_spent(&self) -> u64 {
        self.dining_selections
            .iter()
            .fold(0, |acc: u64, s| acc.saturating_add(s.price))
    }

    pub fn attraction_spent(&self) -> u64 {
        self.attraction_selections
            .iter()
            .fold(0, |acc: u64, s| acc.saturating_add(s.price))
    }

    /// Check the cross-field invariants
    pub fn validate(&self) -> Result<(), PlannerError> {
        if let (Some(StayLength::DayTrip), Some(budget)) = (self.stay_length, &self.category_budget) {
            if budget.lodging != 0 {
                return Err(PlannerError::InvalidState(format!(
                    "day trip carries a lodging budget of {}",
                    budget.lodging
                )));
            }
        }
        if let (Some(StayLength::DayTrip), Some(lodging)) = (self.stay_length, &self.lodging_selection) {
            return Err(PlannerError::InvalidState(format!(
                "day trip cannot hold lodging '{}'",
                lodging.name
            )));
        }
        Ok(())
    }

    /// Names of fields that were set in `prior` but differ here.
    ///
    /// A forward step must leave this empty.
    pub fn changed_fields(&self, prior: &TripState) -> Vec<&'static str> {
        let mut changed = Vec::new();

        if self.session_id != prior.session_id {
            changed.push("sessionId");
        }
        if prior.region.is_some() && self.region != prior.region {
            changed.push("region");
        }
        if prior.stay_length.is_some() && self.stay_length != prior.stay_length {
            changed.push("stayLength");
        }
        if !prior.companions.is_empty() && self.companions != prior.companions {
            changed.push("companions");
        }
        if !prior.style.is_empty() && self.style != prior.style {
            changed.push("style");
        }
        if prior.total_budget.is_some() && self.total_budget != prior.total_budget {
            changed.push("totalBudget");
        }
        if prior.category_budget.is_some() && self.category_budget != prior.category_budget {
            changed.push("categoryBudget");
        }
        if prior.lodging_selection.is_some() && self.lodging_selection != prior.lodging_selection {
            changed.push("lodgingSelection");
        }
        if !prior.dining_selections.is_empty() && self.dining_selections != prior.dining_selections {
            changed.push("diningSelections");
        }
        if !prior.attraction_selections.is_empty()
            && self.attraction_selections != prior.attraction_selections
        {
            changed.push("attractionSelections");
        }

        changed
    }
}

fn missing(field: &str) -> PlannerError {
    PlannerError::InvalidState(format!("`{}` has not been set yet", field))
}
