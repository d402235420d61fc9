use std::sync::Arc;

use axum::{body::Body, response::Response, Router};
use thiserror::Error;

pub mod agenda;

/// Per-application wiring: one concrete `AgendaGeneratorService` behind an
/// `Arc`, shared across handlers via axum's `State`.
pub trait RestStateDef: Clone + Send + Sync + 'static {
    type AgendaGeneratorService: service::agenda::AgendaGeneratorService + Send + Sync + 'static;

    fn agenda_generator_service(&self) -> Arc<Self::AgendaGeneratorService>;
}

#[derive(Debug, Error)]
pub enum RestError {
    #[error("unknown optimization strategy '{0}'")]
    UnknownStrategy(String),

    #[error("missing required query parameter '{0}'")]
    MissingQueryParam(&'static str),

    #[error(transparent)]
    Service(#[from] service::ServiceError),
}

fn error_handler(result: Result<Response, RestError>) -> Response {
    match result {
        Ok(response) => response,
        Err(err @ RestError::UnknownStrategy(_)) => Response::builder()
            .status(400)
            .body(Body::from(err.to_string()))
            .unwrap(),
        Err(err @ RestError::MissingQueryParam(_)) => Response::builder()
            .status(400)
            .body(Body::from(err.to_string()))
            .unwrap(),
        Err(RestError::Service(service::ServiceError::NotFound)) => {
            Response::builder().status(404).body(Body::empty()).unwrap()
        }
        Err(RestError::Service(err @ service::ServiceError::NoData(_))) => Response::builder()
            .status(404)
            .body(Body::from(err.to_string()))
            .unwrap(),
        Err(RestError::Service(err @ service::ServiceError::InvalidRequest(_))) => {
            Response::builder()
                .status(400)
                .body(Body::from(err.to_string()))
                .unwrap()
        }
        Err(RestError::Service(service::ServiceError::DatabaseQueryError(err))) => {
            Response::builder()
                .status(500)
                .body(Body::from(err.to_string()))
                .unwrap()
        }
    }
}

pub fn build_app<RestState: RestStateDef>(rest_state: RestState) -> Router {
    Router::new()
        .nest("/agendas", agenda::generate_route::<RestState>())
        .with_state(rest_state)
}

pub async fn start_server<RestState>(rest_state: RestState, bind_addr: &str)
where
    RestState: RestStateDef,
{
    let app = build_app(rest_state);
    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .expect("Could not bind server");
    tracing::info!("listening on {bind_addr}");
    axum::serve(listener, app)
        .await
        .expect("Could not start server");
}
