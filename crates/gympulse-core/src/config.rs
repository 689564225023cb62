//! Dashboard configuration.
//!
//! Every field has a default matching the opening-day gym, so an empty
//! JSON object is a valid config. Load order is: defaults, then the JSON
//! file (if any), then environment overrides, then validation.
//!
//! | Variable | Field |
//! |----------|-------|
//! | `GYMPULSE_CAPACITY` | `max_capacity` |
//! | `GYMPULSE_INITIAL_MEMBERS` | `initial_members` |
//! | `GYMPULSE_TICK_MS` | `tick_period_ms` |
//! | `GYMPULSE_SEED` | `seed` |

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use gympulse_logic::constants::{DEFAULT_TICK_MS, INITIAL_MEMBERS, MAX_CAPACITY};
use gympulse_logic::equipment::{initial_equipment, EquipmentCategory};
use gympulse_logic::focus::{workout_focus_options, WorkoutFocus};

use crate::error::ConfigError;

pub const ENV_CAPACITY: &str = "GYMPULSE_CAPACITY";
pub const ENV_INITIAL_MEMBERS: &str = "GYMPULSE_INITIAL_MEMBERS";
pub const ENV_TICK_MS: &str = "GYMPULSE_TICK_MS";
pub const ENV_SEED: &str = "GYMPULSE_SEED";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Maximum members admitted at once.
    pub max_capacity: u32,
    /// Live count at startup.
    pub initial_members: u32,
    /// Drift tick period in milliseconds.
    pub tick_period_ms: u64,
    /// Seed for forecast noise and drift. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub equipment: Vec<EquipmentCategory>,
    pub focus_options: Vec<WorkoutFocus>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_capacity: MAX_CAPACITY,
            initial_members: INITIAL_MEMBERS,
            tick_period_ms: DEFAULT_TICK_MS,
            seed: None,
            equipment: initial_equipment(),
            focus_options: workout_focus_options(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Defaults or `path`, then process environment, then validation.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => {
                log::info!("Loading dashboard config from {}", p.display());
                Self::from_file(p)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment in production).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_override(&lookup, ENV_CAPACITY)? {
            self.max_capacity = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_INITIAL_MEMBERS)? {
            self.initial_members = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_TICK_MS)? {
            self.tick_period_ms = v;
        }
        if let Some(v) = parse_override(&lookup, ENV_SEED)? {
            self.seed = Some(v);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_capacity == 0 {
            return Err(ConfigError::Invalid("max_capacity must be positive".into()));
        }
        if self.initial_members > self.max_capacity {
            return Err(ConfigError::Invalid(format!(
                "initial_members {} exceeds max_capacity {}",
                self.initial_members, self.max_capacity
            )));
        }
        if self.tick_period_ms == 0 {
            return Err(ConfigError::Invalid("tick_period_ms must be positive".into()));
        }

        let mut ids = HashSet::new();
        for item in &self.equipment {
            if !ids.insert(item.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate equipment id {:?}",
                    item.id
                )));
            }
            if item.available_units > item.total_units {
                return Err(ConfigError::Invalid(format!(
                    "equipment {:?} has {} available of {} total",
                    item.id, item.available_units, item.total_units
                )));
            }
        }

        let mut focus_ids = HashSet::new();
        for focus in &self.focus_options {
            if !focus_ids.insert(focus.id.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate focus id {:?}",
                    focus.id
                )));
            }
            if let Some(missing) = focus.equipment_ids.iter().find(|id| !ids.contains(id.as_str())) {
                return Err(ConfigError::Invalid(format!(
                    "focus {:?} references unknown equipment {:?}",
                    focus.id, missing
                )));
            }
        }
        Ok(())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_period_ms)
    }
}

fn parse_override<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_capacity, 200);
        assert_eq!(config.tick_period(), Duration::from_secs(5));
        assert_eq!(config.equipment.len(), 5);
    }

    #[test]
    fn test_empty_json_is_default() {
        let config = DashboardConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config =
            DashboardConfig::from_json_str(r#"{"max_capacity": 80, "initial_members": 40, "seed": 9}"#)
                .unwrap();
        assert_eq!(config.max_capacity, 80);
        assert_eq!(config.initial_members, 40);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.tick_period_ms, 5_000);
    }

    #[test]
    fn test_equipment_status_labels_in_json() {
        let json = r#"{
            "equipment": [
                {"id": "rowers", "name": "Rowers", "total_units": 4, "available_units": 4, "status": "Maintenance"}
            ],
            "focus_options": [
                {"id": "all", "label": "Overview", "equipment_ids": []}
            ]
        }"#;
        let config = DashboardConfig::from_json_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.equipment[0].status,
            gympulse_logic::equipment::EquipmentStatus::Maintenance
        );
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            DashboardConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"tick_period_ms": 250}}"#).unwrap();
        let config = DashboardConfig::from_file(file.path()).unwrap();
        assert_eq!(config.tick_period(), Duration::from_millis(250));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = DashboardConfig::from_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_overrides() {
        let mut config = DashboardConfig::default();
        config
            .apply_overrides(lookup(&[
                (ENV_CAPACITY, "150"),
                (ENV_TICK_MS, " 100 "),
                (ENV_SEED, "42"),
            ]))
            .unwrap();
        assert_eq!(config.max_capacity, 150);
        assert_eq!(config.tick_period_ms, 100);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.initial_members, 124);
    }

    #[test]
    fn test_bad_override() {
        let mut config = DashboardConfig::default();
        let err = config
            .apply_overrides(lookup(&[(ENV_CAPACITY, "lots")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                key: ENV_CAPACITY,
                ..
            }
        ));
    }

    #[test]
    fn test_validation_failures() {
        let zero_cap = DashboardConfig {
            max_capacity: 0,
            initial_members: 0,
            ..DashboardConfig::default()
        };
        assert!(zero_cap.validate().is_err());

        let over = DashboardConfig {
            initial_members: 500,
            ..DashboardConfig::default()
        };
        assert!(over.validate().is_err());

        let no_tick = DashboardConfig {
            tick_period_ms: 0,
            ..DashboardConfig::default()
        };
        assert!(no_tick.validate().is_err());

        let mut dup = DashboardConfig::default();
        dup.equipment.push(dup.equipment[0].clone());
        assert!(dup.validate().is_err());

        let mut dangling = DashboardConfig::default();
        dangling.equipment.retain(|e| e.id != "benches");
        assert!(dangling.validate().is_err());
    }
}
