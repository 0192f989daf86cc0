//! Trip report: summary, schedule and closing tips for a finished plan

use crate::synthesizer::{ItinerarySynthesizer, ScheduleDay};
use pilot_core::{PlannerError, StayLength, TripState};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripSummary {
    pub region: String,
    pub stay_label: String,
    pub nights: u8,
    pub companions: Vec<String>,
    pub style: Vec<String>,
    pub total_budget: u64,
    /// Lodging budget plus what was actually picked for dining and sightseeing
    pub used_budget: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripReport {
    pub summary: TripSummary,
    pub days: Vec<ScheduleDay>,
    pub recommendations: Vec<String>,
}

/// Human label for a stay: "day trip" or "2 nights, 3 days"
pub fn stay_label(stay: StayLength) -> String {
    match stay {
        StayLength::DayTrip => "day trip".to_string(),
        StayLength::Nights(1) => "1 night, 2 days".to_string(),
        StayLength::Nights(n) => format!("{} nights, {} days", n, n + 1),
    }
}

/// Build the final report from a completed state.
///
/// Needs region and stay length; everything else may be missing.
pub fn build_report(state: &TripState) -> Result<TripReport, PlannerError> {
    let region = state.require_region()?;
    let stay = state.require_stay_length()?;
    let label = stay_label(stay);

    let days = ItinerarySynthesizer::new(region).synthesize(
        stay,
        state.lodging_selection.as_ref().map(|l| l.name.as_str()),
        &state.dining_selections,
        &state.attraction_selections,
    );

    let lodging_budget = state.category_budget.map(|b| b.lodging).unwrap_or(0);
    let summary = TripSummary {
        region: region.to_string(),
        stay_label: label.clone(),
        nights: stay.nights(),
        companions: state.companions.iter().cloned().collect(),
        style: state.style.iter().cloned().collect(),
        total_budget: state.total_budget.unwrap_or(0),
        used_budget: lodging_budget
            .saturating_add(state.dining_spent())
            .saturating_add(state.attraction_spent()),
    };

    let recommendations = vec![
        format!("Enjoy your {} in {}!", label, region),
        "The schedule is built around the stay, restaurants and attractions you picked.".to_string(),
        "Check the weather before you leave and pack comfortable clothes.".to_string(),
    ];

    Ok(TripReport {
        summary,
        days,
        recommendations,
    })
}
