mod init_tracing;
mod request_id;
mod tracing_config;

pub use init_tracing::{DEFAULT_LOG_DIRECTIVES, init_tracing};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use tracing_config::TracingConfig;
