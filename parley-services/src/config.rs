use std::env;

const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1/";
const DEFAULT_GENERATION_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_CHARACTER_MODEL: &str = "anthropic/claude-3-haiku";
const DEFAULT_FEEDBACK_MODEL: &str = "anthropic/claude-3-sonnet";

/// Application settings, environment-driven with development defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    pub redis_url: String,
    pub generation_base_url: String,
    pub generation_api_key: Option<String>,
    pub character_model: String,
    pub feedback_model: String,
    pub rate_limit_requests: i64,
    pub rate_limit_window_seconds: i64,
    pub session_ttl_seconds: u64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.into()),
            generation_base_url: env::var("GENERATION_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GENERATION_BASE_URL.into()),
            generation_api_key: env::var("GENERATION_API_KEY").ok(),
            character_model: env::var("GENERATION_CHARACTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHARACTER_MODEL.into()),
            feedback_model: env::var("GENERATION_FEEDBACK_MODEL")
                .unwrap_or_else(|_| DEFAULT_FEEDBACK_MODEL.into()),
            rate_limit_requests: parse_or(env::var("RATE_LIMIT_REQUESTS").ok(), 100),
            rate_limit_window_seconds: parse_or(env::var("RATE_LIMIT_WINDOW").ok(), 60),
            session_ttl_seconds: parse_or(env::var("SESSION_TTL_SECONDS").ok(), 3600),
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, default: T) -> T {
    raw.and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_reads_well_formed_values() {
        assert_eq!(parse_or(Some("250".into()), 100), 250);
    }

    #[test]
    fn parse_or_falls_back_on_absent_or_garbled_input() {
        assert_eq!(parse_or::<i64>(None, 100), 100);
        assert_eq!(parse_or(Some("ten".into()), 100), 100);
    }
}
