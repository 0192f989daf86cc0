use pilot_core::{PlannerError, Stage, StayLength, TripState};

/// Where the trip goes
pub struct RegionStage {
    region: String,
}

impl RegionStage {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }
}

impl Stage for RegionStage {
    fn id(&self) -> &'static str {
        "region.select.v1"
    }

    fn apply(&self, state: &TripState) -> Result<TripState, PlannerError> {
        let region = self.region.trim();
        if region.is_empty() {
            return Err(PlannerError::InvalidState("region must not be empty".to_string()));
        }
        Ok(state.clone().with_region(region))
    }
}

/// How long the trip lasts
pub struct PeriodStage {
    stay: StayLength,
}

impl PeriodStage {
    pub fn new(stay: StayLength) -> Self {
        Self { stay }
    }
}

impl Stage for PeriodStage {
    fn id(&self) -> &'static str {
        "period.select.v1"
    }

    fn apply(&self, state: &TripState) -> Result<TripState, PlannerError> {
        state.require_region()?;
        Ok(state.clone().with_stay_length(self.stay))
    }
}

/// Who is coming along
pub struct CompanionsStage {
    companions: Vec<String>,
}

impl CompanionsStage {
    pub fn new(companions: Vec<String>) -> Self {
        Self { companions }
    }
}

impl Stage for CompanionsStage {
    fn id(&self) -> &'static str {
        "companions.select.v1"
    }

    fn apply(&self, state: &TripState) -> Result<TripState, PlannerError> {
        Ok(state.clone().with_companions(trimmed(&self.companions)))
    }
}

/// Travel style tags
pub struct StyleStage {
    style: Vec<String>,
}

impl StyleStage {
    pub fn new(style: Vec<String>) -> Self {
        Self { style }
    }
}

impl Stage for StyleStage {
    fn id(&self) -> &'static str {
        "style.select.v1"
    }

    fn apply(&self, state: &TripState) -> Result<TripState, PlannerError> {
        Ok(state.clone().with_style(trimmed(&self.style)))
    }
}

fn trimmed(values: &[String]) -> impl Iterator<Item = String> + '_ {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
