use leihwerk::config::{AppConfig, LendingConfig};
use leihwerk::models::user::UserContext;
use leihwerk::AppState;
use once_cell::sync::Lazy;

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "leihwerk=debug".into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init()
        .ok();
});

/// Fresh application state over an in-memory store, default policies.
pub fn setup() -> AppState {
    Lazy::force(&TRACING);
    AppState::in_memory(AppConfig::default())
}

/// Fresh application state with specific lending policies.
#[allow(dead_code)]
pub fn setup_with(lending: LendingConfig) -> AppState {
    Lazy::force(&TRACING);
    let config = AppConfig {
        lending,
        ..AppConfig::default()
    };
    AppState::in_memory(config)
}

/// A regular lab member.
#[allow(dead_code)]
pub fn member() -> UserContext {
    UserContext::new("Mara Steinbach", "ab12cdef", false)
}

/// A lab admin working the front desk.
#[allow(dead_code)]
pub fn admin() -> UserContext {
    UserContext::new("Jonas Reinhardt", "zz99admn", true)
}
