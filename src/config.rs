use crate::dates::{DateDisplay, DisplayFormat, Locale};
use crate::model::{Role, TransitionPolicy};
use eyre::{Result, WrapErr};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG: &str = "projectflow.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub session: SessionConfig,
    pub transitions: TransitionsConfig,
    pub display: DisplayConfig,
    pub team: TeamConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub initial_role: Role,
    pub seed: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            initial_role: Role::Sales,
            seed: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransitionsConfig {
    pub policy: TransitionPolicy,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub locale: String,
    pub date_format: DisplayFormat,
    pub fallback: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            locale: "en-US".to_owned(),
            date_format: DisplayFormat::Short,
            fallback: "--".to_owned(),
        }
    }
}

impl DisplayConfig {
    pub fn date_display(&self) -> DateDisplay {
        DateDisplay {
            format: self.date_format,
            locale: Locale::from_tag(&self.locale),
            fallback: self.fallback.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TeamConfig {
    pub technicians: Vec<String>,
    /// Whose assignments the technician dashboard shows.
    pub current_technician: String,
}

impl Default for TeamConfig {
    fn default() -> Self {
        TeamConfig {
            technicians: [
                "John Doe",
                "Jane Smith",
                "Mike Johnson",
                "Sarah Wilson",
                "David Brown",
                "Lisa Davis",
            ]
            .iter()
            .map(|&name| name.to_owned())
            .collect(),
            current_technician: "John Doe".to_owned(),
        }
    }
}

impl Config {
    pub fn parse(contents: &str) -> Result<Config> {
        toml::from_str(contents).wrap_err("cannot parse configuration file")
    }

    pub fn load(file_name: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(file_name)
            .wrap_err_with(|| format!("cannot load configuration file {}", file_name.display()))?;
        Self::parse(&contents)
    }

    /// Load the configuration file if one was given or the default one
    /// exists, and use built-in defaults otherwise.
    pub fn load_or_default(file_name: Option<&Path>) -> Result<Config> {
        match file_name {
            Some(file_name) => Self::load(file_name),
            None if Path::new(DEFAULT_CONFIG).exists() => Self::load(Path::new(DEFAULT_CONFIG)),
            None => {
                debug!("no configuration file, using defaults");
                Ok(Config::default())
            }
        }
    }
}

#[test]
fn test_defaults() {
    let config = Config::parse("").unwrap();
    assert_eq!(config.session.initial_role, Role::Sales);
    assert!(config.session.seed);
    assert_eq!(config.transitions.policy, TransitionPolicy::Enforced);
    assert_eq!(config.team.technicians.len(), 6);
    assert_eq!(config.team.current_technician, "John Doe");
    assert_eq!(config.display.date_display().locale, Locale::EnUs);
}

#[test]
fn test_parse_full_file() {
    let config = Config::parse(
        r#"
        [session]
        initial_role = "manager"
        seed = false

        [transitions]
        policy = "permissive"

        [display]
        locale = "en-GB"
        date_format = "datetime"

        [team]
        technicians = ["Ana", "Budi"]
        current_technician = "Budi"
        "#,
    )
    .unwrap();
    assert_eq!(config.session.initial_role, Role::Manager);
    assert!(!config.session.seed);
    assert_eq!(config.transitions.policy, TransitionPolicy::Permissive);
    assert_eq!(config.display.date_format, DisplayFormat::DateTime);
    assert_eq!(config.display.date_display().locale, Locale::EnGb);
    assert_eq!(config.display.fallback, "--");
    assert_eq!(config.team.technicians, vec!["Ana", "Budi"]);
}

#[test]
fn test_rejects_unknown_values() {
    assert!(Config::parse("[session]\ninitial_role = \"owner\"").is_err());
    assert!(Config::parse("[transitions]\npolicy = \"lenient\"").is_err());
    assert!(Config::parse("[colors]\nbadge = true").is_err());
}
