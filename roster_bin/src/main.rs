use std::{env, sync::Arc, time::Duration};

use dao_impl_sqlite::{
    agenda::AgendaDaoImpl, hour_rule::AvailabilityRuleDaoImpl, hour_rule::BusinessRuleDaoImpl,
    role::RoleDaoImpl, TransactionDaoImpl,
};
use service_impl::agenda::AgendaGeneratorServiceImpl;
use sqlx::SqlitePool;
#[cfg(feature = "json_logging")]
use tracing_subscriber::fmt::format::FmtSpan;

type TransactionDao = TransactionDaoImpl;
type RoleDao = RoleDaoImpl;
type AvailabilityRuleDao = AvailabilityRuleDaoImpl;
type BusinessRuleDao = BusinessRuleDaoImpl;
type AgendaDao = AgendaDaoImpl;

type AgendaGeneratorService =
    AgendaGeneratorServiceImpl<RoleDao, AvailabilityRuleDao, BusinessRuleDao, AgendaDao, TransactionDao>;

#[derive(Clone)]
pub struct RestStateImpl {
    agenda_generator_service: Arc<AgendaGeneratorService>,
}
impl rest::RestStateDef for RestStateImpl {
    type AgendaGeneratorService = AgendaGeneratorService;

    fn agenda_generator_service(&self) -> Arc<Self::AgendaGeneratorService> {
        self.agenda_generator_service.clone()
    }
}
impl RestStateImpl {
    pub fn new(pool: Arc<SqlitePool>, solver_time_budget: Duration) -> Self {
        let transaction_dao = Arc::new(TransactionDao::new(pool.clone()));
        let role_dao = Arc::new(RoleDao::new(pool.clone()));
        let availability_rule_dao = Arc::new(AvailabilityRuleDao::new(pool.clone()));
        let business_rule_dao = Arc::new(BusinessRuleDao::new(pool.clone()));
        let agenda_dao = Arc::new(AgendaDao::new(pool.clone()));

        let agenda_generator_service = Arc::new(AgendaGeneratorService::new(
            role_dao,
            availability_rule_dao,
            business_rule_dao,
            agenda_dao,
            transaction_dao,
            solver_time_budget,
        ));

        Self {
            agenda_generator_service,
        }
    }
}

fn solver_time_budget() -> Duration {
    env::var("SOLVER_TIME_BUDGET_SECS")
        .ok()
        .and_then(|value| value.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(Duration::from_secs(30))
}

#[tokio::main]
async fn main() {
    let version = env!("CARGO_PKG_VERSION");

    #[cfg(feature = "local_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::TRACE)
        .pretty()
        .with_file(true)
        .finish();

    #[cfg(feature = "json_logging")]
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .with_span_list(true)
        .with_file(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    tracing::info!("roster backend version: {}", version);
    dotenvy::dotenv().ok();

    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:./roster.sqlite3".into());
    let pool = Arc::new(
        SqlitePool::connect(&database_url)
            .await
            .expect("Could not connect to database"),
    );

    sqlx::migrate!("../migrations/sqlite")
        .run(pool.as_ref())
        .await
        .expect("Failed to run migrations");

    let rest_state = RestStateImpl::new(pool.clone(), solver_time_budget());
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into());

    rest::start_server(rest_state, &bind_addr).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use rest_types::GeneratedAgendaTO;
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    async fn seeded_pool() -> Arc<SqlitePool> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite connects");
        sqlx::migrate!("../migrations/sqlite")
            .run(&pool)
            .await
            .expect("migrations run against a fresh database");
        Arc::new(pool)
    }

    /// Seeds one role, one person, and a Monday 09-17 availability/business
    /// rule pair, mirroring service_impl's "single match" scenario.
    async fn seed_single_match(pool: &SqlitePool, role_id: Uuid, person_id: Uuid) {
        sqlx::query("INSERT INTO roles (id, name, description) VALUES (?, 'Nurse', NULL)")
            .bind(role_id.as_bytes().to_vec())
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO people (id, name, email) VALUES (?, 'Alex', 'alex@example.com')")
            .bind(person_id.as_bytes().to_vec())
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO availability_rules (id, person_id, role_id, start_time, end_time, is_recurring, day_of_week) \
             VALUES (?, ?, ?, '09:00:00', '17:00:00', 1, 0)",
        )
        .bind(Uuid::new_v4().as_bytes().to_vec())
        .bind(person_id.as_bytes().to_vec())
        .bind(role_id.as_bytes().to_vec())
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO business_rules (id, role_id, start_time, end_time, is_recurring, day_of_week) \
             VALUES (?, ?, '09:00:00', '17:00:00', 1, 0)",
        )
        .bind(Uuid::new_v4().as_bytes().to_vec())
        .bind(role_id.as_bytes().to_vec())
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn generate_then_fetch_agenda_over_http() {
        let role_id = Uuid::new_v4();
        let person_id = Uuid::new_v4();
        let pool = seeded_pool().await;
        seed_single_match(&pool, role_id, person_id).await;

        let rest_state = RestStateImpl::new(pool, Duration::from_secs(1));
        let app = rest::build_app(rest_state);

        let request_body = serde_json::json!({
            "role_id": role_id,
            "weeks": [1],
            "year": 2024,
            "optimization_strategy": "maximize_coverage",
        });
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/agendas/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&request_body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 201);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let generated: GeneratedAgendaTO = serde_json::from_slice(&body).unwrap();
        assert_eq!(generated.entries.len(), 1);
        assert_eq!(generated.entries[0].person_id, person_id);

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(format!("/agendas/{}", generated.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let fetched: GeneratedAgendaTO = serde_json::from_slice(&body).unwrap();
        assert_eq!(fetched.id, generated.id);
        assert_eq!(fetched.entries.len(), 1);
    }

    #[tokio::test]
    async fn unrecognized_strategy_is_rejected_with_400() {
        let role_id = Uuid::new_v4();
        let person_id = Uuid::new_v4();
        let pool = seeded_pool().await;
        seed_single_match(&pool, role_id, person_id).await;

        let rest_state = RestStateImpl::new(pool, Duration::from_secs(1));
        let app = rest::build_app(rest_state);

        let request_body = serde_json::json!({
            "role_id": role_id,
            "weeks": [1],
            "year": 2024,
            "optimization_strategy": "fastest_first",
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/agendas/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&request_body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn unknown_role_is_rejected_with_404() {
        let pool = seeded_pool().await;
        let rest_state = RestStateImpl::new(pool, Duration::from_secs(1));
        let app = rest::build_app(rest_state);

        let request_body = serde_json::json!({
            "role_id": Uuid::new_v4(),
            "weeks": [1],
            "year": 2024,
            "optimization_strategy": "maximize_coverage",
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/agendas/generate")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&request_body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }
}
