//! Market Server - multi-role port-services marketplace API
//!
//! # Architecture
//!
//! - **HTTP API** (`api`): registration/login, catalog, order lifecycle,
//!   admin moderation
//! - **Order engine** (`orders`): cart validation, stock reservation, status
//!   transitions, access policy
//! - **Auth** (`auth`): JWT + Argon2, per-request account resolution
//! - **Database** (`db`): embedded SurrealDB, repository layer
//!
//! # Module layout
//!
//! ```text
//! market-server/src/
//! ├── core/          # configuration, state, server
//! ├── auth/          # JWT, middleware, extractor
//! ├── api/           # HTTP routes and handlers
//! ├── orders/        # order engine and authorization policy
//! ├── db/            # models and repositories
//! └── utils/         # errors, logging, validation
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod orders;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderEngine, PricingPolicy, TrustClientPricing};
pub use utils::{ApiResponse, AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - structured events with a fixed target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
   __  ___           __        __
  /  |/  /___ ______/ /_____  / /_
 / /|_/ / __ `/ ___/ //_/ _ \/ __/
/ /  / / /_/ / /  / ,< /  __/ /_
/_/  /_/\__,_/_/  /_/|_|\___/\__/
    "#
    );
}
