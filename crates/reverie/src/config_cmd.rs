// SPDX-FileCopyrightText: 2026 Reverie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `reverie config show` command implementation.
//!
//! Prints the effective configuration after all layers are merged, as
//! TOML, with secret values redacted.

use reverie_config::model::ReverieConfig;
use reverie_core::ReverieError;

const REDACTED: &str = "[redacted]";

/// Run the `reverie config show` command.
pub fn run_show(config: &ReverieConfig) -> Result<(), ReverieError> {
    let rendered = render(config)?;
    println!("{rendered}");
    Ok(())
}

/// Renders the configuration as TOML with the API key redacted.
fn render(config: &ReverieConfig) -> Result<String, ReverieError> {
    let mut shown = config.clone();
    if shown.groq.api_key.is_some() {
        shown.groq.api_key = Some(REDACTED.to_string());
    }
    toml::to_string_pretty(&shown)
        .map_err(|e| ReverieError::Internal(format!("failed to render config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_redacts_the_api_key() {
        let mut config = ReverieConfig::default();
        config.groq.api_key = Some("gsk_super_secret".to_string());

        let rendered = render(&config).expect("default config should render");
        assert!(!rendered.contains("gsk_super_secret"));
        assert!(rendered.contains(REDACTED));
    }

    #[test]
    fn render_keeps_absent_key_absent() {
        let config = ReverieConfig::default();
        let rendered = render(&config).expect("default config should render");
        assert!(!rendered.contains(REDACTED));
        assert!(rendered.contains("[agent]"));
        assert!(rendered.contains("[memory]"));
    }
}
