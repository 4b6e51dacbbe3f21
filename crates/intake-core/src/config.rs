use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// ScoringConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Score at which guidance switches from "add more detail" to "ready".
    #[serde(default = "default_ready_threshold")]
    pub ready_threshold: u8,
    /// Score at which the match reply lists candidate providers.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: u8,
    #[serde(default = "default_attachment_increment")]
    pub attachment_increment: u8,
    #[serde(default = "default_summary_increment")]
    pub summary_increment: u8,
    #[serde(default = "default_default_increment")]
    pub default_increment: u8,
}

fn default_ready_threshold() -> u8 {
    70
}

fn default_match_threshold() -> u8 {
    50
}

fn default_attachment_increment() -> u8 {
    25
}

fn default_summary_increment() -> u8 {
    15
}

fn default_default_increment() -> u8 {
    10
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            ready_threshold: default_ready_threshold(),
            match_threshold: default_match_threshold(),
            attachment_increment: default_attachment_increment(),
            summary_increment: default_summary_increment(),
            default_increment: default_default_increment(),
        }
    }
}

// ---------------------------------------------------------------------------
// ReplyConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyConfig {
    #[serde(default = "default_typing_delay")]
    pub typing_delay_ms: u64,
    #[serde(default = "default_analysis_delay")]
    pub analysis_delay_ms: u64,
    /// Shown in place of a deferred reply that failed to resolve.
    #[serde(default = "default_failure_notice")]
    pub failure_notice: String,
    /// Delay before the other party answers in a conversation thread.
    #[serde(default = "default_counterpart_delay")]
    pub counterpart_delay_ms: u64,
    #[serde(default = "default_suggestion_delay")]
    pub suggestion_delay_ms: u64,
    /// Shown in place of a reply suggestion that could not be produced.
    #[serde(default = "default_suggestion_failure_notice")]
    pub suggestion_failure_notice: String,
}

fn default_typing_delay() -> u64 {
    1500
}

fn default_analysis_delay() -> u64 {
    2000
}

fn default_failure_notice() -> String {
    "Sorry, I couldn't generate a response right now.".to_string()
}

fn default_counterpart_delay() -> u64 {
    2000
}

fn default_suggestion_delay() -> u64 {
    1500
}

fn default_suggestion_failure_notice() -> String {
    "Sorry, I couldn't generate a suggestion right now.".to_string()
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay(),
            analysis_delay_ms: default_analysis_delay(),
            failure_notice: default_failure_notice(),
            counterpart_delay_ms: default_counterpart_delay(),
            suggestion_delay_ms: default_suggestion_delay(),
            suggestion_failure_notice: default_suggestion_failure_notice(),
        }
    }
}

impl ReplyConfig {
    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }

    pub fn counterpart_delay(&self) -> Duration {
        Duration::from_millis(self.counterpart_delay_ms)
    }

    pub fn suggestion_delay(&self) -> Duration {
        Duration::from_millis(self.suggestion_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// EngineConfig (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub replies: ReplyConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            scoring: ScoringConfig::default(),
            replies: ReplyConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let cfg: EngineConfig = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load `path` if it exists, otherwise return the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let s = &self.scoring;

        // 1. Thresholds are percentages
        for (name, value) in [
            ("ready_threshold", s.ready_threshold),
            ("match_threshold", s.match_threshold),
        ] {
            if value > 100 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("scoring.{name}={value} is above 100 and can never be reached"),
                });
            }
        }

        // 2. Increments: zero stalls the chat, >100 saturates in one step
        for (name, value) in [
            ("attachment_increment", s.attachment_increment),
            ("summary_increment", s.summary_increment),
            ("default_increment", s.default_increment),
        ] {
            if value == 0 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("scoring.{name} is 0: that branch never raises the score"),
                });
            } else if value > 100 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("scoring.{name}={value} (>100 always saturates)"),
                });
            }
        }

        // 3. Reply delays over a minute
        for (name, value) in [
            ("typing_delay_ms", self.replies.typing_delay_ms),
            ("analysis_delay_ms", self.replies.analysis_delay_ms),
            ("counterpart_delay_ms", self.replies.counterpart_delay_ms),
            ("suggestion_delay_ms", self.replies.suggestion_delay_ms),
        ] {
            if value > 60_000 {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("replies.{name}={value} (>60s is unusual)"),
                });
            }
        }

        for (name, value) in [
            ("failure_notice", &self.replies.failure_notice),
            ("suggestion_failure_notice", &self.replies.suggestion_failure_notice),
        ] {
            if value.trim().is_empty() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("replies.{name} is empty"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_match_observed_behavior() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.scoring.ready_threshold, 70);
        assert_eq!(cfg.scoring.match_threshold, 50);
        assert_eq!(cfg.scoring.attachment_increment, 25);
        assert_eq!(cfg.scoring.summary_increment, 15);
        assert_eq!(cfg.scoring.default_increment, 10);
        assert_eq!(cfg.replies.typing_delay(), Duration::from_millis(1500));
        assert_eq!(cfg.replies.analysis_delay(), Duration::from_millis(2000));
        assert_eq!(cfg.replies.counterpart_delay(), Duration::from_millis(2000));
        assert_eq!(cfg.replies.suggestion_delay(), Duration::from_millis(1500));
        assert_eq!(
            cfg.replies.suggestion_failure_notice,
            "Sorry, I couldn't generate a suggestion right now."
        );
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml = "scoring:\n  default_increment: 5\n";
        let cfg: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.scoring.default_increment, 5);
        assert_eq!(cfg.scoring.attachment_increment, 25);
        assert_eq!(cfg.replies, ReplyConfig::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        let cfg: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".intake/config.yaml");
        let mut cfg = EngineConfig::default();
        cfg.replies.typing_delay_ms = 0;
        cfg.save(&path).unwrap();
        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn load_or_default_when_missing() {
        let dir = TempDir::new().unwrap();
        let cfg = EngineConfig::load_or_default(&dir.path().join("missing.yaml")).unwrap();
        assert_eq!(cfg, EngineConfig::default());
    }

    #[test]
    fn load_rejects_bad_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "scoring: [1, 2").unwrap();
        assert!(EngineConfig::load(&path).is_err());
    }

    #[test]
    fn validate_default_has_no_warnings() {
        assert!(EngineConfig::default().validate().is_empty());
    }

    #[test]
    fn validate_threshold_above_hundred() {
        let mut cfg = EngineConfig::default();
        cfg.scoring.ready_threshold = 120;
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| {
            w.level == WarnLevel::Error && w.message.contains("ready_threshold=120")
        }));
    }

    #[test]
    fn validate_zero_increment() {
        let mut cfg = EngineConfig::default();
        cfg.scoring.summary_increment = 0;
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("summary_increment is 0")));
    }

    #[test]
    fn validate_long_delay_and_blank_notice() {
        let mut cfg = EngineConfig::default();
        cfg.replies.analysis_delay_ms = 90_000;
        cfg.replies.failure_notice = "  ".to_string();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.message.contains(">60s is unusual")));
        assert!(warnings.iter().any(|w| w.message.contains("failure_notice")));
    }

    #[test]
    fn validate_blank_suggestion_notice() {
        let mut cfg = EngineConfig::default();
        cfg.replies.suggestion_failure_notice = String::new();
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| {
            w.level == WarnLevel::Error
                && w.message == "replies.suggestion_failure_notice is empty"
        }));
    }
}
