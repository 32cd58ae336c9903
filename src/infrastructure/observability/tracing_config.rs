use super::init_tracing::DEFAULT_LOG_DIRECTIVES;

/// Configuration for tracing initialization.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub directives: String,
}

impl TracingConfig {
    /// Settings-driven values; `LOG_FORMAT=json` still forces JSON output.
    pub fn new(environment: impl Into<String>, level: Option<&str>, enable_json: bool) -> Self {
        Self {
            environment: environment.into(),
            json_format: enable_json || log_format_is_json(),
            directives: level
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| DEFAULT_LOG_DIRECTIVES.to_string()),
        }
    }
}

fn log_format_is_json() -> bool {
    std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            json_format: log_format_is_json(),
            directives: DEFAULT_LOG_DIRECTIVES.to_string(),
        }
    }
}
