// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reverie status` command implementation.
//!
//! Probes every configured adapter's health check and displays the
//! results. Unconfigured adapters are listed as such rather than
//! omitted, so a missing tier is visible at a glance.

use std::io::IsTerminal;
use std::time::Duration;

use serde::Serialize;

use reverie_auth::MongoAuth;
use reverie_config::model::ReverieConfig;
use reverie_core::types::HealthStatus;
use reverie_core::{Adapter, ReverieError};
use reverie_groq::GroqProvider;
use reverie_memory::{MongoDurable, RedisCache};
use reverie_sentiment::LexiconClassifier;

/// One row in the status report.
#[derive(Debug, Serialize)]
pub struct AdapterStatus {
    pub name: String,
    pub kind: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl AdapterStatus {
    fn not_configured(name: &str, kind: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: kind.to_string(),
            state: "not configured".to_string(),
            detail: None,
        }
    }

    async fn probe(adapter: &dyn Adapter) -> Self {
        let (state, detail) = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => ("healthy".to_string(), None),
            Ok(HealthStatus::Degraded(reason)) => ("degraded".to_string(), Some(reason)),
            Ok(HealthStatus::Unhealthy(reason)) => ("unhealthy".to_string(), Some(reason)),
            Err(err) => ("unhealthy".to_string(), Some(err.to_string())),
        };
        Self {
            name: adapter.name().to_string(),
            kind: adapter.adapter_type().to_string(),
            state,
            detail,
        }
    }
}

/// Run the `reverie status` command.
///
/// If `--json` is passed, outputs structured JSON for scripting.
/// If `--plain` is passed or stdout is not a TTY, disables colors.
pub async fn run_status(
    config: &ReverieConfig,
    json: bool,
    plain: bool,
) -> Result<(), ReverieError> {
    let timeout = Duration::from_secs(config.memory.connect_timeout_secs);
    let mut rows: Vec<AdapterStatus> = Vec::new();

    match config.memory.cache_url.as_deref() {
        Some(url) => match RedisCache::new(url, timeout) {
            Ok(cache) => rows.push(AdapterStatus::probe(&cache).await),
            Err(err) => rows.push(AdapterStatus {
                name: "redis-cache".to_string(),
                kind: "Cache".to_string(),
                state: "unhealthy".to_string(),
                detail: Some(err.to_string()),
            }),
        },
        None => rows.push(AdapterStatus::not_configured("redis-cache", "Cache")),
    }

    match config.memory.durable_uri.as_deref() {
        Some(uri) => {
            let durable =
                MongoDurable::new(uri, &config.memory.database, &config.memory.collection, timeout);
            rows.push(AdapterStatus::probe(&durable).await);

            let auth = MongoAuth::new(
                uri,
                &config.memory.database,
                &config.auth.users_collection,
                timeout,
            );
            rows.push(AdapterStatus::probe(&auth).await);
        }
        None => {
            rows.push(AdapterStatus::not_configured("mongo-durable", "Durable"));
            rows.push(AdapterStatus::not_configured("mongo-auth", "Auth"));
        }
    }

    match GroqProvider::new(&config.groq) {
        Ok(provider) => rows.push(AdapterStatus::probe(&provider).await),
        Err(_) => rows.push(AdapterStatus::not_configured("groq", "Provider")),
    }

    rows.push(AdapterStatus::probe(&LexiconClassifier::new()).await);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
        );
    } else {
        let use_color = !plain && std::io::stdout().is_terminal();
        print_rows(&rows, use_color);
    }

    Ok(())
}

/// Print the status rows with optional colors.
fn print_rows(rows: &[AdapterStatus], use_color: bool) {
    println!();
    println!("  reverie status");
    println!("  {}", "-".repeat(35));

    for row in rows {
        let detail = row
            .detail
            .as_deref()
            .map(|d| format!(" ({d})"))
            .unwrap_or_default();

        if use_color {
            use colored::Colorize;
            let state = match row.state.as_str() {
                "healthy" => format!("{} {}", "✓".green(), row.state.green()),
                "degraded" => format!("{} {}", "!".yellow(), row.state.yellow()),
                "not configured" => format!("- {}", row.state.dimmed()),
                _ => format!("{} {}", "✗".red(), row.state.red()),
            };
            println!("    {:<14} {state}{detail}", row.name);
        } else {
            let tag = match row.state.as_str() {
                "healthy" => "[OK]",
                "degraded" => "[WARN]",
                "not configured" => "[--]",
                _ => "[FAIL]",
            };
            println!("    {:<14} {tag} {}{detail}", row.name, row.state);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn probe_reports_a_healthy_adapter() {
        let classifier = LexiconClassifier::new();
        let row = AdapterStatus::probe(&classifier).await;
        assert_eq!(row.name, "lexicon-sentiment");
        assert_eq!(row.kind, "Sentiment");
        assert_eq!(row.state, "healthy");
        assert!(row.detail.is_none());
    }

    #[test]
    fn status_rows_serialize_without_empty_detail() {
        let row = AdapterStatus::not_configured("redis-cache", "Cache");
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"state\":\"not configured\""));
        assert!(!json.contains("detail"));
    }

    #[test]
    fn unhealthy_rows_carry_their_reason() {
        let row = AdapterStatus {
            name: "mongo-durable".to_string(),
            kind: "Durable".to_string(),
            state: "unhealthy".to_string(),
            detail: Some("server selection timed out".to_string()),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("server selection timed out"));
    }
}
