//! Simulation submission recorder
//!
//! Validates a submitted simulation and persists it with exactly one insert.
//! Validation failures and storage failures stay distinct so callers can tell
//! "your input was wrong" from "we couldn't save it right now". No retries.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{SubmitSimulationRequest, ValidationErrors};
use crate::estimation::SimulatorVariant;
use crate::services::storage::{Storage, StorageError};

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid simulation: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("could not save simulation")]
    Storage(#[from] StorageError),
}

#[derive(Clone)]
pub struct SubmissionRecorder {
    storage: Arc<dyn Storage>,
    variant: SimulatorVariant,
}

impl SubmissionRecorder {
    pub fn new(storage: Arc<dyn Storage>, variant: SimulatorVariant) -> Self {
        Self { storage, variant }
    }

    /// Validate then insert. `client_id` links the record to an authenticated caller.
    pub async fn record(
        &self,
        request: &SubmitSimulationRequest,
        client_id: Option<Uuid>,
    ) -> Result<Uuid, SubmissionError> {
        let mut simulation = request.validate(self.variant).map_err(|errors| {
            tracing::info!(
                fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
                "Simulation rejected by validation"
            );
            errors
        })?;
        simulation.client_id = client_id;

        let id = self
            .storage
            .insert_simulation(&simulation)
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, "Failed to persist simulation");
                e
            })?;

        tracing::info!(
            simulation_id = %id,
            project_type = %simulation.project_type,
            quality_level = %simulation.quality_level,
            surface_area = simulation.surface_area,
            client_id = ?client_id,
            "Simulation recorded"
        );

        Ok(id)
    }
}
