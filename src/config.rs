//! Query knobs. Defaults can be overridden from JSON or from the environment:
//!
//! * `KSP_K` — number of ranks to extract (>= 1)
//! * `KSP_MODE` — `ties` or `distinct`
//! * `KSP_RECORD_PATHS` — `1`/`true` to keep sidetrack sequences

use crate::error::{InvalidInput, KspError, Result};
use crate::extract::Mode;
use serde::{Deserialize, Serialize};

pub const ENV_K: &str = "KSP_K";
pub const ENV_MODE: &str = "KSP_MODE";
pub const ENV_RECORD_PATHS: &str = "KSP_RECORD_PATHS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KspConfig {
    pub k: usize,
    pub mode: Mode,
    pub record_paths: bool,
}

impl Default for KspConfig {
    fn default() -> Self { Self { k: 1, mode: Mode::AllowTies, record_paths: false } }
}

impl KspConfig {
    pub fn new(k: usize, mode: Mode) -> Self { Self { k, mode, record_paths: false } }

    pub fn with_paths(mut self) -> Self {
        self.record_paths = true;
        self
    }

    /// Defaults overlaid with whatever `KSP_*` variables are set.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_vars(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(text).map_err(|e| KspError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Applies overrides looked up through `get`; unset keys keep their value.
    pub fn apply_vars<F: Fn(&str) -> Option<String>>(&mut self, get: F) -> Result<()> {
        if let Some(v) = get(ENV_K) {
            self.k = v.trim().parse().map_err(|_| KspError::Config(format!("{ENV_K}={v} is not a count")))?;
        }
        if let Some(v) = get(ENV_MODE) {
            self.mode = v.parse().map_err(|e: String| KspError::Config(format!("{ENV_MODE}: {e}")))?;
        }
        if let Some(v) = get(ENV_RECORD_PATHS) {
            self.record_paths = match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => return Err(KspError::Config(format!("{ENV_RECORD_PATHS}={v} is not a flag"))),
            };
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<()> {
        if self.k == 0 { return Err(InvalidInput::ZeroK.into()); }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn overrides_apply_on_top_of_defaults() {
        let mut cfg = KspConfig::default();
        cfg.apply_vars(vars(&[(ENV_K, "12"), (ENV_MODE, "distinct"), (ENV_RECORD_PATHS, "TRUE")])).unwrap();
        assert_eq!(cfg, KspConfig { k: 12, mode: Mode::DistinctOnly, record_paths: true });

        let mut untouched = KspConfig::new(3, Mode::DistinctOnly);
        untouched.apply_vars(vars(&[])).unwrap();
        assert_eq!(untouched, KspConfig::new(3, Mode::DistinctOnly));
    }

    #[test]
    fn bad_values_are_reported() {
        let mut cfg = KspConfig::default();
        assert!(matches!(cfg.apply_vars(vars(&[(ENV_K, "many")])), Err(KspError::Config(_))));
        assert!(matches!(cfg.apply_vars(vars(&[(ENV_MODE, "fast")])), Err(KspError::Config(_))));
        assert!(matches!(cfg.apply_vars(vars(&[(ENV_RECORD_PATHS, "maybe")])), Err(KspError::Config(_))));
        assert!(matches!(cfg.apply_vars(vars(&[(ENV_K, "0")])), Err(KspError::InvalidInput(InvalidInput::ZeroK))));
    }

    #[test]
    fn json_fills_missing_fields() {
        let cfg = KspConfig::from_json(r#"{"k": 5, "mode": "distinct_only"}"#).unwrap();
        assert_eq!(cfg, KspConfig::new(5, Mode::DistinctOnly));
        assert!(KspConfig::from_json(r#"{"k": 0}"#).is_err());
        assert!(KspConfig::from_json(r#"{"depth": 2}"#).is_err());
    }
}
