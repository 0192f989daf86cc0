//! Pipeline Runner: chains stages, checks forward-only state, records proofs
use crate::data_model::StageProof;
use crate::error::PlannerError;
use crate::stage::Stage;
use crate::trip_state::TripState;
use std::time::Instant;
use tracing::{debug, info};

pub struct PipelineRunner {
    stages: Vec<Box<dyn Stage>>,
    pipeline_id: String,
}

impl PipelineRunner {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        let pipeline_id = stages
            .iter()
            .map(|s| s.id().split('.').next().unwrap_or("?"))
            .collect::<Vec<_>>()
            .join("→");

        Self { stages, pipeline_id }
    }

    /// Run every stage in order starting from `initial`.
    ///
    /// Stops at the first failing stage. A stage that changes a field some
    /// earlier stage set fails the run with `RetroactiveMutation`.
    pub fn run(&self, initial: TripState) -> Result<(TripState, Vec<StageProof>), PlannerError> {
        let mut current = initial;
        let mut proofs = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            let start = Instant::now();
            let in_hash = hash_state(&current)?;

            let next = stage.apply(&current)?;

            if let Some(field) = next.changed_fields(&current).first() {
                return Err(PlannerError::RetroactiveMutation {
                    stage: stage.id().to_string(),
                    field: (*field).to_string(),
                });
            }
            next.validate()?;

            let out_hash = hash_state(&next)?;
            let latency_ms = start.elapsed().as_millis() as u64;
            debug!(stage = stage.id(), %in_hash, %out_hash, "stage applied");

            proofs.push(StageProof {
                id: stage.id().to_string(),
                in_hash,
                out_hash,
                deterministic: stage.deterministic(),
                latency_ms,
            });

            current = next;
        }

        info!(
            pipeline = %self.pipeline_id,
            session = %current.session_id,
            stages = proofs.len(),
            "pipeline completed"
        );
        Ok((current, proofs))
    }

    pub fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

fn hash_state(state: &TripState) -> Result<String, PlannerError> {
    let bytes = serde_json::to_vec(state)
        .map_err(|e| PlannerError::InvalidState(format!("cannot snapshot state: {}", e)))?;
    Ok(format!("blake3:{}", blake3::hash(&bytes)))
}
