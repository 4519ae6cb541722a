use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::orders::{PricingPolicy, TrustClientPricing};
use crate::utils::AppError;

/// Server state - shared handles for every request
///
/// Cheap to clone (Arc-backed); axum clones it per request.
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | immutable configuration |
/// | db | embedded SurrealDB handle |
/// | jwt_service | token issue/validation |
/// | pricing | order pricing collaborator |
#[derive(Debug, Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub jwt_service: Arc<JwtService>,
    pub pricing: Arc<dyn PricingPolicy>,
}

impl ServerState {
    /// Assemble state around an already-open database (tests use an
    /// in-memory engine here)
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            db,
            jwt_service,
            pricing: Arc::new(TrustClientPricing),
        }
    }

    /// Initialize state for production use:
    /// 1. ensure the work directory layout
    /// 2. open the embedded database (work_dir/database/market.db)
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::internal(format!("Failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("market.db");
        let db_service = DbService::new(&db_path.to_string_lossy()).await?;

        Ok(Self::new(config.clone(), db_service.db))
    }

    /// Substitute the pricing collaborator (e.g. a server-side calculator)
    pub fn with_pricing(mut self, pricing: Arc<dyn PricingPolicy>) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
