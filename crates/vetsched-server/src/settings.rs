//! Runtime configuration, deserialised from `config.toml` and `VETSCHED__*`
//! environment variables.
//!
//! ```toml
//! host       = "0.0.0.0"
//! port       = 8080
//! store_path = "~/.local/share/vetsched/vetsched.db"
//!
//! [clinic]
//! open_hour          = 9
//! close_hour         = 18
//! closed_day         = "sunday"
//! utc_offset_minutes = -180
//!
//! [agent]
//! model = "llama3.1"
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use vetsched_agent::{
  ClinicClock,
  ollama::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
};
use vetsched_core::{BusinessHours, hours::parse_weekday};

use crate::error::{Error, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub clinic:     ClinicConfig,
  /// Without this section the assistant endpoint answers 503.
  #[serde(default)]
  pub agent:      Option<AgentConfig>,
}

fn default_host() -> String { "127.0.0.1".to_owned() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("vetsched.db") }

/// The clinic's operating policy and local time zone.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClinicConfig {
  pub open_hour:          u32,
  pub close_hour:         u32,
  pub closed_day:         String,
  pub utc_offset_minutes: i32,
}

impl Default for ClinicConfig {
  fn default() -> Self {
    let hours = BusinessHours::default();
    Self {
      open_hour:          hours.open_hour(),
      close_hour:         hours.close_hour(),
      closed_day:         hours.closed_day().to_string(),
      utc_offset_minutes: 0,
    }
  }
}

impl ClinicConfig {
  pub fn business_hours(&self) -> Result<BusinessHours> {
    let closed_day = parse_weekday(&self.closed_day)?;
    Ok(BusinessHours::new(self.open_hour, self.close_hour, closed_day)?)
  }

  pub fn clock(&self) -> Result<ClinicClock> {
    ClinicClock::from_offset_minutes(self.utc_offset_minutes)
      .ok_or(Error::UtcOffset(self.utc_offset_minutes))
  }
}

/// Connection to an Ollama-compatible chat endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
  pub model:        String,
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }

#[cfg(test)]
mod tests {
  use chrono::Weekday;
  use config::{Config, File, FileFormat};

  use super::*;

  fn load(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  #[test]
  fn empty_file_gives_defaults() {
    let cfg = load("");
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.store_path, PathBuf::from("vetsched.db"));
    assert!(cfg.agent.is_none());
    assert_eq!(cfg.clinic.business_hours().unwrap(), BusinessHours::default());
  }

  #[test]
  fn clinic_section_overrides_hours() {
    let cfg = load(
      r#"
      [clinic]
      open_hour = 8
      close_hour = 20
      closed_day = "Monday"
      utc_offset_minutes = -180

      [agent]
      model = "llama3.1"
      "#,
    );
    let hours = cfg.clinic.business_hours().unwrap();
    assert_eq!(hours.slot_hours(), 8..20);
    assert_eq!(hours.closed_day(), Weekday::Mon);
    assert_eq!(cfg.clinic.clock().unwrap().utc_offset().local_minus_utc(), -180 * 60);

    let agent = cfg.agent.unwrap();
    assert_eq!(agent.model, "llama3.1");
    assert_eq!(agent.base_url, DEFAULT_BASE_URL);
  }

  #[test]
  fn bad_clinic_values_are_errors() {
    let cfg = load("[clinic]\nclosed_day = \"someday\"");
    assert!(matches!(cfg.clinic.business_hours(), Err(Error::Clinic(_))));

    let cfg = load("[clinic]\nopen_hour = 18\nclose_hour = 9");
    assert!(cfg.clinic.business_hours().is_err());

    let cfg = load("[clinic]\nutc_offset_minutes = 1440");
    assert!(matches!(cfg.clinic.clock(), Err(Error::UtcOffset(1440))));
  }
}
