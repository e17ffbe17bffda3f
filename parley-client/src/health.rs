use crate::client::StoreClient;
use redis::RedisResult;

/// Best-effort store health report. An unreachable store is a report, not
/// an error; the introspection fields stay `None` when INFO is unavailable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHealth {
    pub connected: bool,
    pub memory_usage: Option<String>,
    pub connected_clients: Option<i64>,
}

impl StoreClient {
    pub async fn health_check(&mut self) -> StoreHealth {
        let ping: RedisResult<String> = redis::cmd("PING").query_async(&mut self.manager).await;

        if let Err(err) = ping {
            tracing::error!("store health check failed: {err}");
            return StoreHealth {
                connected: false,
                memory_usage: None,
                connected_clients: None,
            };
        }

        StoreHealth {
            connected: true,
            memory_usage: self.info_field("memory", "used_memory_human").await,
            connected_clients: self
                .info_field("clients", "connected_clients")
                .await
                .and_then(|v| v.parse().ok()),
        }
    }

    async fn info_field(&mut self, section: &str, field: &str) -> Option<String> {
        let info: RedisResult<String> = redis::cmd("INFO")
            .arg(section)
            .query_async(&mut self.manager)
            .await;

        match info {
            Ok(info) => parse_info_field(&info, field),
            Err(_) => None,
        }
    }
}

fn parse_info_field(info: &str, field: &str) -> Option<String> {
    info.lines().find_map(|line| {
        line.strip_prefix(field)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|value| value.trim_end_matches('\r').to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO_MEMORY: &str =
        "# Memory\r\nused_memory:1048576\r\nused_memory_human:1.00M\r\nused_memory_rss:2097152\r\n";

    #[test]
    fn finds_a_field_in_an_info_section() {
        assert_eq!(
            parse_info_field(INFO_MEMORY, "used_memory_human"),
            Some("1.00M".to_string())
        );
    }

    #[test]
    fn exact_field_name_is_required() {
        // `used_memory` must not match the `used_memory_human` line.
        assert_eq!(
            parse_info_field(INFO_MEMORY, "used_memory"),
            Some("1048576".to_string())
        );
        assert_eq!(parse_info_field(INFO_MEMORY, "connected_clients"), None);
    }
}
