//! Runtime settings resolved from the environment.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_ORG: &str = "n-p-x";
pub const DEFAULT_REPO: &str = "e";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// GitHub organisation that shorthand identifiers expand into
    pub org: String,
    /// Repository used for bare script names
    pub default_repo: String,
    pub branch: String,
    /// Upper bound for each interpreter liveness probe
    pub probe_timeout: Duration,
    /// Directory holding staged scripts and ephemeral projects
    pub temp_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            org: DEFAULT_ORG.to_string(),
            default_repo: DEFAULT_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            temp_dir: std::env::temp_dir(),
        }
    }
}

impl Settings {
    /// Read settings from `NIPOX_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup; unset or blank keys keep their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut settings = Self::default();

        if let Some(org) = get("NIPOX_ORG") {
            settings.org = org;
        }
        if let Some(repo) = get("NIPOX_DEFAULT_REPO") {
            settings.default_repo = repo;
        }
        if let Some(branch) = get("NIPOX_BRANCH") {
            settings.branch = branch;
        }
        if let Some(raw) = get("NIPOX_PROBE_TIMEOUT_MS") {
            match raw.trim().parse::<u64>() {
                Ok(ms) if ms > 0 => settings.probe_timeout = Duration::from_millis(ms),
                _ => warn!("Ignoring invalid NIPOX_PROBE_TIMEOUT_MS={raw}"),
            }
        }

        settings
    }

    /// Same settings, staging into `dir`.
    #[must_use]
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let settings = Settings::from_lookup(|_| None);
        assert_eq!(settings.org, "n-p-x");
        assert_eq!(settings.default_repo, "e");
        assert_eq!(settings.branch, "main");
        assert_eq!(settings.probe_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("NIPOX_ORG", "acme"),
            ("NIPOX_DEFAULT_REPO", "scripts"),
            ("NIPOX_BRANCH", "dev"),
            ("NIPOX_PROBE_TIMEOUT_MS", "250"),
        ]));
        assert_eq!(settings.org, "acme");
        assert_eq!(settings.default_repo, "scripts");
        assert_eq!(settings.branch, "dev");
        assert_eq!(settings.probe_timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_invalid_timeout_keeps_default() {
        let settings = Settings::from_lookup(lookup_from(&[("NIPOX_PROBE_TIMEOUT_MS", "soon")]));
        assert_eq!(settings.probe_timeout, DEFAULT_PROBE_TIMEOUT);

        let settings = Settings::from_lookup(lookup_from(&[("NIPOX_PROBE_TIMEOUT_MS", "0")]));
        assert_eq!(settings.probe_timeout, DEFAULT_PROBE_TIMEOUT);
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let settings = Settings::from_lookup(lookup_from(&[("NIPOX_ORG", "  ")]));
        assert_eq!(settings.org, DEFAULT_ORG);
    }
}
