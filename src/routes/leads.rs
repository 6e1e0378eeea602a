use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::api::{Created, DataResponse, RecordId};
use crate::app::AppState;
use crate::domain::CreateLeadRequest;
use crate::error::{ApiError, ApiResult};
use crate::services::notifications::{dispatch, NotificationKind};

/// POST /leads
///
/// Direct lead capture; same rules as the assistant, source defaults to `website`.
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    WithRejection(Json(req), _): WithRejection<Json<CreateLeadRequest>, ApiError>,
) -> ApiResult<Created<DataResponse<RecordId>>> {
    let lead = req.validate()?;

    let id = state.storage.insert_lead(&lead).await?;
    tracing::info!(lead_id = %id, source = ?lead.source, region = %lead.region, "Lead captured");

    dispatch(state.notifier.clone(), NotificationKind::Lead, (&lead).into());

    Ok(Created(DataResponse::new(RecordId { id })))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::TestApp;
    use crate::services::notifications::NotificationKind;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn stores_lead_and_notifies() {
        let app = TestApp::new();
        let (status, body) = app
            .post(
                "/leads",
                None,
                json!({
                    "first_name": "Yao",
                    "last_name": "Kouassi",
                    "email": "Yao@Example.CI",
                    "phone": "0707070707",
                    "region": "Bouaké"
                }),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(body["data"]["id"].is_string());

        let leads = app.storage.leads();
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].email, "yao@example.ci");
        assert_eq!(leads[0].country, "Côte d'Ivoire");
        assert_eq!(leads[0].source.as_deref(), Some("website"));

        let sent = app.notifications(1).await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, NotificationKind::Lead);
    }

    #[tokio::test]
    async fn invalid_lead_is_not_stored() {
        let app = TestApp::new();
        let (status, body) = app
            .post("/leads", None, json!({ "first_name": "Yao", "email": "nope" }))
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(app.storage.leads().is_empty());
        assert!(app.notifier.sent().is_empty());
    }

    #[tokio::test]
    async fn region_outside_the_list_is_refused() {
        let app = TestApp::new();
        let (status, body) = app
            .post(
                "/leads",
                None,
                json!({
                    "first_name": "Yao",
                    "last_name": "Kouassi",
                    "email": "yao@example.ci",
                    "phone": "0707070707",
                    "region": "Paris"
                }),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0]["field"], "region");
        assert_eq!(body["errors"][0]["message"], "Veuillez choisir une région");
        assert!(app.storage.leads().is_empty());
    }

    #[tokio::test]
    async fn wrong_json_type_names_the_field() {
        let app = TestApp::new();
        let (status, body) = app
            .post("/leads", None, json!({ "first_name": "Yao", "phone": 707070707 }))
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["errors"][0]["field"], "phone");
    }
}
