//! Application state and dependency injection.

use infomatic_postgres::PgClient;

use crate::service::{GoogleSignIn, PasswordHasher, Result, ServiceConfig, TokenKeys};

/// Cookie and session settings shared with handlers.
///
/// Split out of [`ServiceConfig`] so handlers can extract just the values
/// they need to build session cookies.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Session lifetime in seconds.
    pub ttl_secs: i64,
    /// Whether session cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pg_client: PgClient,

    password_hasher: PasswordHasher,
    token_keys: TokenKeys,
    session_settings: SessionSettings,
    google_sign_in: GoogleSignIn,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Connects to the database, applies pending migrations, and prepares
    /// the security services.
    pub async fn from_config(config: &ServiceConfig) -> Result<Self> {
        let service_state = Self {
            pg_client: config.connect_postgres().await?,

            password_hasher: config.create_password_hasher(),
            token_keys: config.create_token_keys()?,
            session_settings: SessionSettings {
                ttl_secs: config.session_ttl_secs,
                cookie_secure: config.cookie_secure,
            },
            google_sign_in: GoogleSignIn::new(config.create_google_verifier()),
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(pg_client: PgClient);

impl_di!(password_hasher: PasswordHasher);
impl_di!(token_keys: TokenKeys);
impl_di!(session_settings: SessionSettings);
impl_di!(google_sign_in: GoogleSignIn);
