//! Virtual assistant routes
//!
//! The client holds the draft and sends it back with each answer; the server
//! is stateless between steps and only writes once the wizard completes.

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::assistant::{advance, prompt, AssistantStep, LeadDraft, Prompt};
use crate::domain::FieldError;
use crate::error::{ApiError, ApiResult};
use crate::services::notifications::{dispatch, NotificationKind};

#[derive(Debug, Deserialize)]
pub struct AssistantStepRequest {
    /// Step being answered; absent to start the conversation
    #[serde(default)]
    pub step: Option<AssistantStep>,
    #[serde(default)]
    pub draft: LeadDraft,
    #[serde(default)]
    pub input: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssistantStepResponse {
    pub step: AssistantStep,
    pub draft: LeadDraft,
    pub prompt: Prompt,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<Uuid>,
}

impl AssistantStepResponse {
    fn at(step: AssistantStep, draft: LeadDraft) -> Self {
        Self {
            prompt: prompt(step, &draft),
            step,
            draft,
            error: None,
            lead_id: None,
        }
    }
}

/// POST /assistant/step
pub async fn assistant_step(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<AssistantStepRequest>, ApiError>,
) -> ApiResult<DataResponse<AssistantStepResponse>> {
    let mut draft = req.draft;

    let current = match req.step {
        None => return Ok(DataResponse::new(AssistantStepResponse::at(AssistantStep::Welcome, draft))),
        Some(AssistantStep::Complete) => {
            return Ok(DataResponse::new(AssistantStepResponse::at(AssistantStep::Complete, draft)))
        }
        Some(step) => step,
    };

    let next = match advance(current, &mut draft, req.input.as_deref()) {
        Ok(next) => next,
        Err(error) => {
            tracing::debug!(step = ?current, field = %error.field, "Assistant answer rejected");
            let mut response = AssistantStepResponse::at(current, draft);
            response.error = Some(error);
            return Ok(DataResponse::new(response));
        }
    };

    let mut response = AssistantStepResponse::at(next, draft);

    if next == AssistantStep::Complete {
        let lead = response.draft.clone().into_lead()?;
        let id = state.storage.insert_lead(&lead).await?;
        tracing::info!(lead_id = %id, region = %lead.region, "Lead captured by assistant");

        dispatch(state.notifier.clone(), NotificationKind::Lead, (&lead).into());
        response.lead_id = Some(id);
    }

    Ok(DataResponse::new(response))
}
