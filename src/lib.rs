//! AIGuidebook - AI usage logging and declaration review service.
//!
//! Students log which AI tools they used on assignments and declare tool
//! usage up front; reviewers see discrepancies and high-risk cases.
//!
//! ## Architecture
//!
//! 1. **Model** (`model`): closed tool/task-type enumerations and the
//!    immutable log, declaration, classification, and alert entities.
//!
//! 2. **Engine** (`engine`): pure reconciliation of logged usage against a
//!    declaration, producing a risk tier and two discrepancy lists. No
//!    storage access.
//!
//! 3. **Store** (`store`): embedded sled persistence. Declaration
//!    uniqueness per (student, assignment) is enforced at insert time, and
//!    the declaration/classification/alert write is one transaction.
//!
//! 4. **Service** (`service`): request-level orchestration - validation,
//!    classification, persistence, and alerting.
//!
//! 5. **Handler** (`handler`): axum routes, middleware, and the JSON
//!    request/response shapes.
//!
//! 6. **Auth** (`auth`): bearer-token verification; token issuance lives in
//!    an external identity service.
//!
//! 7. **Telemetry** (`telemetry`): Prometheus metrics.

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod handler;
pub mod model;
pub mod service;
pub mod store;
pub mod telemetry;

pub use auth::{AuthStudent, Claims, TokenVerifier};
pub use config::ServerConfig;
pub use engine::{classify, Reconciliation};
pub use error::ApiError;
pub use handler::{create_router, AppState};
pub use model::{
    Alert, Assignment, Classification, Declaration, LogEntry, RiskTier, TaskType, Tool,
};
pub use service::AppService;
pub use store::{LogFilter, Store, StoreError};
pub use telemetry::AppMetrics;

/// Service version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
