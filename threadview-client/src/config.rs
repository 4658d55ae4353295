use std::path::Path;

use anyhow::Context;

use crate::{api::SortMode, ControversyRule, Flattener};

pub const CONFIG_ENV_VAR: &str = "THREADVIEW_CONFIG";

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct Config {
    pub sort: SortMode,

    /// Number of requests a bulk download may issue
    pub batch_count: usize,

    pub controversy_threshold: Option<i64>,
    pub show_more: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            sort: SortMode::Top,
            batch_count: 5,
            controversy_threshold: None,
            show_more: true,
        }
    }
}

impl Config {
    pub fn from_json_file(path: &Path) -> anyhow::Result<Config> {
        let data = std::fs::read(path)
            .with_context(|| format!("reading config file {path:?}"))?;
        serde_json::from_slice(&data).with_context(|| format!("parsing config file {path:?}"))
    }

    /// Loads the file `THREADVIEW_CONFIG` points to, if any
    pub fn from_env() -> anyhow::Result<Config> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            None => Ok(Config::default()),
            Some(path) => Config::from_json_file(Path::new(&path)),
        }
    }

    pub fn rule(&self) -> ControversyRule {
        ControversyRule {
            score_threshold: self.controversy_threshold,
        }
    }

    pub fn flattener(&self) -> Flattener {
        Flattener {
            mode: self.sort,
            rule: self.rule(),
            show_more: self.show_more,
        }
    }
}
