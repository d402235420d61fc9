use axum::{
    body::Body,
    extract::{Path, Query, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use rest_types::{AgendaTO, GenerateAgendaRequestTO, GeneratedAgendaTO};
use serde::Deserialize;
use service::{agenda::AgendaGeneratorService, OptimizationStrategy};
use uuid::Uuid;

use crate::{error_handler, RestError, RestStateDef};

pub fn generate_route<RestState: RestStateDef>() -> Router<RestState> {
    Router::new()
        .route("/generate", post(generate_agenda::<RestState>))
        .route("/{id}", get(get_agenda::<RestState>))
        .route("/", get(list_agendas::<RestState>))
}

async fn generate_agenda<RestState: RestStateDef>(
    State(rest_state): State<RestState>,
    Json(request): Json<GenerateAgendaRequestTO>,
) -> Response {
    error_handler(
        (async {
            if !OptimizationStrategy::is_recognized(&request.optimization_strategy) {
                return Err(RestError::UnknownStrategy(request.optimization_strategy));
            }
            let generated = rest_state
                .agenda_generator_service()
                .generate_draft_agenda(
                    request.role_id,
                    &request.weeks,
                    request.year,
                    &request.optimization_strategy,
                )
                .await?;
            let body = GeneratedAgendaTO::from(&generated);
            Ok(Response::builder()
                .status(201)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap())
        })
        .await,
    )
}

async fn get_agenda<RestState: RestStateDef>(
    State(rest_state): State<RestState>,
    Path(agenda_id): Path<Uuid>,
) -> Response {
    error_handler(
        (async {
            let generated = rest_state
                .agenda_generator_service()
                .get_agenda(agenda_id)
                .await?;
            let body = GeneratedAgendaTO::from(&generated);
            Ok(Response::builder()
                .status(200)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap())
        })
        .await,
    )
}

#[derive(Debug, Deserialize)]
pub struct AgendaListQuery {
    pub role_id: Option<Uuid>,
    pub status: Option<String>,
}

async fn list_agendas<RestState: RestStateDef>(
    State(rest_state): State<RestState>,
    Query(query): Query<AgendaListQuery>,
) -> Response {
    error_handler(
        (async {
            let role_id = query
                .role_id
                .ok_or(RestError::MissingQueryParam("role_id"))?;
            let agendas = rest_state
                .agenda_generator_service()
                .list_agendas_by_role(role_id, query.status.as_deref())
                .await?
                .iter()
                .map(AgendaTO::from)
                .collect::<Vec<_>>();
            Ok(Response::builder()
                .status(200)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&agendas).unwrap()))
                .unwrap())
        })
        .await,
    )
}
