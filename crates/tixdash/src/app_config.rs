//! 🔧 App Configuration: the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." (every developer at 3am) 🦆
//!
//! 🏗️ Powered by Figment, because manually parsing env vars is a form of
//! self-harm that even the borrow checker wouldn't approve of.

use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use tracing::info;

use crate::dashboard::DashboardConfig;
use crate::sources::SourceConfig;

/// 📦 Everything the app needs to know about itself.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// 🚰 Where the rows come from. Defaults to the built-in demo batch.
    #[serde(default)]
    pub source: SourceConfig,
    /// 🎛️ Dashboard knobs: window length, undated policy.
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

/// 🚀 Load the config from env vars (`TIXDASH_*`) and an optional TOML file.
///
/// 📐 DESIGN NOTE:
///   - `config_file_name` is None  → env vars only.
///   - `config_file_name` is Some  → env vars + TOML file, merged. TOML wins on conflicts.
///   - Nested keys in env vars use a double underscore:
///     `TIXDASH_DASHBOARD__WINDOW_MONTHS=6`.
pub fn load_config(config_file_name: Option<&Path>) -> anyhow::Result<AppConfig> {
    info!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("TIXDASH_").split("__"));

    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to parse configuration from file '{}' and environment variables (TIXDASH_*). \
             Check the TOML, then check the env, then check your coffee.",
            path.display()
        ),
        None => "💀 Failed to parse configuration from environment variables (TIXDASH_*). \
                 No file was provided, so this one's all on the environment."
            .to_string(),
    };

    config.extract().context(context_msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::UndatedPolicy;
    use crate::sources::{FileSourceConfig, RowFormat};
    use std::io::Write;

    fn write_test_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("💀 Failed to create a temp config. The filesystem said 'new phone who dis'.");
        file.write_all(contents.as_bytes())
            .expect("💀 Failed to write test config.");
        file
    }

    #[test]
    fn the_one_where_the_file_source_and_knobs_parse() {
        let config_file = write_test_config(
            r#"
            [source.File]
            file_name = "tickets.ndjson"
            format = "ndjson"

            [dashboard]
            window_months = 6
            undated = "include"
            "#,
        );

        let app_config = load_config(Some(config_file.path()))
            .expect("💀 A valid config should parse. The schema drift goblin does not get this win.");

        assert_eq!(
            app_config.source,
            SourceConfig::File(FileSourceConfig {
                file_name: "tickets.ndjson".to_string(),
                format: RowFormat::Ndjson,
            })
        );
        assert_eq!(app_config.dashboard.window_months, 6);
        assert_eq!(app_config.dashboard.undated, UndatedPolicy::Include);
    }

    #[test]
    fn the_one_where_defaults_show_up_uninvited_but_helpful() {
        let config_file = write_test_config(
            r#"
            [source.File]
            file_name = "tickets.json"
            "#,
        );

        let app_config: AppConfig = Figment::new()
            .merge(Toml::file(config_file.path()))
            .extract()
            .expect("💀 Defaults should fill in the gaps.");

        match app_config.source {
            SourceConfig::File(file_config) => assert_eq!(file_config.format, RowFormat::JsonArray),
            honestly_who_knows => panic!("💀 Expected a File source, serde took us to {:?}", honestly_who_knows),
        }
        assert_eq!(app_config.dashboard, DashboardConfig::default());
    }

    #[test]
    fn the_one_where_an_empty_file_means_the_demo() {
        let config_file = write_test_config("");
        let app_config: AppConfig = Figment::new()
            .merge(Toml::file(config_file.path()))
            .extract()
            .expect("💀 An empty config is still a config.");
        assert_eq!(app_config, AppConfig::default());
        assert_eq!(app_config.source, SourceConfig::InMemory);
    }

    #[test]
    fn the_one_where_a_typo_in_the_policy_is_an_error() {
        let config_file = write_test_config(
            r#"
            [dashboard]
            undated = "sometimes"
            "#,
        );
        assert!(load_config(Some(config_file.path())).is_err());
    }
}
