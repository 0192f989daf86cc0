//! Schedule synthesis: spreads the chosen stay, restaurants and attractions over the trip's days

use pilot_core::{Selection, StayLength};
use serde::{Deserialize, Serialize};

pub const CHECK_IN_TIME: &str = "09:00";
pub const CHECK_OUT_TIME: &str = "11:00";
pub const LUNCH_TIME: &str = "12:00";
pub const SIGHTSEEING_TIME: &str = "14:00";
pub const DINNER_TIME: &str = "18:00";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Lodging,
    Dining,
    Sightseeing,
}

/// One scheduled slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// "HH:MM"
    pub time: String,
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    /// 1-based
    pub day_index: u8,
    /// "Day N"
    pub label: String,
    pub activities: Vec<Activity>,
}

/// Builds the day-by-day schedule for one region
#[derive(Debug, Clone)]
pub struct ItinerarySynthesizer {
    region: String,
}

impl ItinerarySynthesizer {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    /// Lay out `nights + 1` days.
    ///
    /// Day 1 opens with check-in when a stay was chosen and the last day
    /// adds check-out at 11:00. Each day's activities are in time order. Lunch and the day's attraction cycle through
    /// their lists from the first item; dinner, which needs at least two
    /// restaurants, starts from the second.
    pub fn synthesize(
        &self,
        stay: StayLength,
        lodging_name: Option<&str>,
        dining: &[Selection],
        attractions: &[Selection],
    ) -> Vec<ScheduleDay> {
        let day_count = stay.days();
        let lodging_name = lodging_name.map(str::trim).filter(|n| !n.is_empty());

        (1..=day_count)
            .map(|day| {
                let offset = usize::from(day - 1);
                let mut activities = Vec::new();

                if day == 1 {
                    if let Some(name) = lodging_name {
                        activities.push(self.lodging(
                            CHECK_IN_TIME,
                            "Check in",
                            format!("Check in at {} and drop off your bags.", name),
                            name,
                        ));
                    }
                }

                if let Some(lunch) = cycle(dining, offset) {
                    activities.push(self.local(
                        LUNCH_TIME,
                        ActivityKind::Dining,
                        &lunch.name,
                        "Lunch at one of your picked restaurants.",
                    ));
                }

                if let Some(sight) = cycle(attractions, offset) {
                    activities.push(self.local(
                        SIGHTSEEING_TIME,
                        ActivityKind::Sightseeing,
                        &sight.name,
                        "Look around one of your picked attractions.",
                    ));
                }

                if dining.len() >= 2 {
                    if let Some(dinner) = cycle(dining, offset + 1) {
                        activities.push(self.local(
                            DINNER_TIME,
                            ActivityKind::Dining,
                            &dinner.name,
                            "Dinner at one of your picked restaurants.",
                        ));
                    }
                }

                if day == day_count {
                    if let Some(name) = lodging_name {
                        activities.push(self.lodging(
                            CHECK_OUT_TIME,
                            "Check out",
                            format!("Check out of {} and wrap up the trip.", name),
                            name,
                        ));
                    }
                }

                // "HH:MM" sorts lexically; ties keep insertion order
                activities.sort_by(|a, b| a.time.cmp(&b.time));

                ScheduleDay {
                    day_index: day,
                    label: format!("Day {}", day),
                    activities,
                }
            })
            .collect()
    }

    fn lodging(&self, time: &str, title: &str, description: String, name: &str) -> Activity {
        Activity {
            time: time.to_string(),
            kind: ActivityKind::Lodging,
            title: title.to_string(),
            description,
            location: name.to_string(),
        }
    }

    fn local(&self, time: &str, kind: ActivityKind, title: &str, description: &str) -> Activity {
        Activity {
            time: time.to_string(),
            kind,
            title: title.to_string(),
            description: description.to_string(),
            location: self.region.clone(),
        }
    }
}

fn cycle(items: &[Selection], index: usize) -> Option<&Selection> {
    if items.is_empty() {
        None
    } else {
        items.get(index % items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(id: &str, name: &str) -> Selection {
        Selection::new(id, name, 10_000)
    }

    fn slots(day: &ScheduleDay) -> Vec<(&str, &str)> {
        day.activities
            .iter()
            .map(|a| (a.time.as_str(), a.title.as_str()))
            .collect()
    }

    #[test]
    fn test_two_nights_two_restaurants_one_attraction() {
        let days = ItinerarySynthesizer::new("Gangneung").synthesize(
            StayLength::Nights(2),
            Some("Seaside Guesthouse"),
            &[sel("a", "A"), sel("b", "B")],
            &[sel("x", "X")],
        );

        assert_eq!(days.len(), 3);
        assert_eq!(
            slots(&days[0]),
            vec![("09:00", "Check in"), ("12:00", "A"), ("14:00", "X"), ("18:00", "B")]
        );
        assert_eq!(
            slots(&days[1]),
            vec![("12:00", "B"), ("14:00", "X"), ("18:00", "A")]
        );
        assert_eq!(
            slots(&days[2]),
            vec![("11:00", "Check out"), ("12:00", "A"), ("14:00", "X"), ("18:00", "B")]
        );
        assert_eq!(days[2].label, "Day 3");
    }

    #[test]
    fn test_single_restaurant_has_no_dinner() {
        let days = ItinerarySynthesizer::new("Busan").synthesize(
            StayLength::Nights(1),
            None,
            &[sel("a", "A")],
            &[],
        );
        assert_eq!(days.len(), 2);
        for day in &days {
            assert_eq!(slots(day), vec![("12:00", "A")]);
        }
    }

    #[test]
    fn test_day_trip_without_selections() {
        let days = ItinerarySynthesizer::new("Jeonju").synthesize(StayLength::DayTrip, None, &[], &[]);
        assert_eq!(days.len(), 1);
        assert!(days[0].activities.is_empty());
        assert_eq!(days[0].day_index, 1);
    }

    #[test]
    fn test_locations() {
        let days = ItinerarySynthesizer::new("Gangneung").synthesize(
            StayLength::Nights(1),
            Some("Seaside Guesthouse"),
            &[sel("a", "A")],
            &[],
        );
        assert_eq!(days[0].activities[0].kind, ActivityKind::Lodging);
        assert_eq!(days[0].activities[0].location, "Seaside Guesthouse");
        assert_eq!(days[0].activities[1].location, "Gangneung");
    }

    #[test]
    fn test_is_deterministic() {
        let synth = ItinerarySynthesizer::new("Gangneung");
        let dining = [sel("a", "A"), sel("b", "B"), sel("c", "C")];
        let sights = [sel("x", "X"), sel("y", "Y")];
        assert_eq!(
            synth.synthesize(StayLength::Nights(4), Some("Inn"), &dining, &sights),
            synth.synthesize(StayLength::Nights(4), Some("Inn"), &dining, &sights)
        );
    }
}
