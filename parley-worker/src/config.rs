use std::env;
use std::time::Duration;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";
const DEFAULT_POLL_SECONDS: u64 = 5;

/// Worker process settings, environment-driven.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub redis_url: String,
    pub poll_interval: Duration,
    pub environment: String,
}

impl WorkerConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.into()),
            poll_interval: Duration::from_secs(parse_poll_seconds(
                env::var("WORKER_POLL_SECONDS").ok(),
            )),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }
}

fn parse_poll_seconds(raw: Option<String>) -> u64 {
    raw.and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_POLL_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_seconds_parse_with_a_default() {
        assert_eq!(parse_poll_seconds(Some("12".into())), 12);
        assert_eq!(parse_poll_seconds(Some("soon".into())), 5);
        assert_eq!(parse_poll_seconds(None), 5);
    }
}
