//! HTTP middleware components.

pub mod logging;
pub mod metrics;
pub mod security_headers;
pub mod trace_id;
pub mod user_auth;

pub use metrics::{init_metrics, metrics_handler, metrics_middleware, record_task_mutation};
pub use security_headers::security_headers_middleware;
pub use trace_id::{trace_id, REQUEST_ID_HEADER};
pub use user_auth::require_user_auth;
