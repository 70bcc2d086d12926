//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! The HTTP surface splits into three areas, each with its own
//! principal class and guard:
//!
//! - `/auth` and `/dashboard` - super-admins operating the dashboard
//! - `/userapi` - editors authoring catalog content
//! - `/clientapi` - public customers
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod admin_auth;
mod catalog;
mod customer_auth;
mod customer_profile;
mod dashboard_admins;
mod dashboard_editors;
mod editor_auth;
mod error;
mod response;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::ErrorResponse;
use crate::middleware::{require_admin, require_customer, require_editor};
use crate::service::ServiceState;

#[inline]
async fn fallback() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with every route the service exposes.
///
/// Guarded subtrees carry a middleware gate in addition to the session
/// extractors in their handlers; the extractors cache their result in
/// request extensions, so the account row is still fetched once.
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    let dashboard = Router::new()
        .merge(dashboard_admins::routes())
        .merge(dashboard_editors::routes())
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let catalog = catalog::routes() //
        .route_layer(from_fn_with_state(state.clone(), require_editor));

    let profile = customer_profile::routes()
        .route_layer(from_fn_with_state(state, require_customer));

    Router::new()
        .merge(admin_auth::routes())
        .merge(editor_auth::routes())
        .merge(customer_auth::routes())
        .merge(dashboard)
        .merge(catalog)
        .merge(profile)
        .fallback(fallback)
}

#[cfg(test)]
pub(crate) mod test {
    use axum::Router;
    use axum_test::TestServer;

    use crate::handler::routes;
    use crate::service::{ServiceConfig, ServiceState};

    /// Builds the configuration for handler tests from the environment.
    ///
    /// Returns `None` when no database is configured, in which case
    /// database-backed tests pass without exercising anything.
    fn test_config() -> Option<ServiceConfig> {
        dotenvy::dotenv().ok();
        let postgres_endpoint = std::env::var("POSTGRES_URL").ok()?;

        Some(ServiceConfig {
            postgres_endpoint,
            ..ServiceConfig::default()
        })
    }

    /// Returns a new [`TestServer`] with the given routes, or `None`
    /// when no database is configured.
    pub async fn create_test_server_with_router(
        router: impl Fn() -> Router<ServiceState>,
    ) -> anyhow::Result<Option<TestServer>> {
        let Some(config) = test_config() else {
            return Ok(None);
        };

        let state = ServiceState::from_config(&config).await?;
        let app = router().with_state(state);
        Ok(Some(TestServer::new(app)?))
    }

    /// Returns a new [`TestServer`] with the full route set, or `None`
    /// when no database is configured.
    pub async fn create_test_server() -> anyhow::Result<Option<TestServer>> {
        Ok(create_test_server_with_state().await?.map(|(server, _)| server))
    }

    /// Returns a new [`TestServer`] with the full route set plus the state
    /// behind it, for tests that seed rows directly. `None` when no
    /// database is configured.
    pub async fn create_test_server_with_state()
    -> anyhow::Result<Option<(TestServer, ServiceState)>> {
        let Some(config) = test_config() else {
            return Ok(None);
        };

        let state = ServiceState::from_config(&config).await?;
        let app = routes(state.clone()).with_state(state.clone());
        Ok(Some((TestServer::new(app)?, state)))
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let Some(server) = create_test_server().await? else {
            return Ok(());
        };

        let response = server.get("/no/such/route").await;
        response.assert_status(axum::http::StatusCode::NOT_FOUND);
        Ok(())
    }
}
