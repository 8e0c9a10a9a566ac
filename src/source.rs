//! Identifier resolution and format classification.

use crate::config::Settings;

const RAW_HOST: &str = "https://raw.githubusercontent.com";

/// Expand an identifier into a download URL.
///
/// - `http://...` / `https://...` is used verbatim
/// - `repo/path/to/file` expands to `<org>/repo/<branch>/path/to/file`
/// - anything else is a file in the default repository
#[must_use]
pub fn resolve(identifier: &str, settings: &Settings) -> String {
    if identifier.starts_with("http://") || identifier.starts_with("https://") {
        return identifier.to_string();
    }

    let (repo, file) = identifier
        .split_once('/')
        .unwrap_or((settings.default_repo.as_str(), identifier));

    format!(
        "{RAW_HOST}/{}/{repo}/{}/{file}",
        settings.org, settings.branch
    )
}

/// Execution strategy chosen from the resolved URL's suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptFormat {
    /// Taskfile YAML, handed to the task runner
    Task,
    /// JavaScript with declared dependencies
    JavaScript,
    /// Anything else runs under a discovered shell
    Shell,
}

impl ScriptFormat {
    #[must_use]
    pub fn classify(url: &str) -> Self {
        let lower = url.to_lowercase();
        if lower.ends_with(".yml") || lower.ends_with(".yaml") {
            Self::Task
        } else if lower.ends_with(".js") {
            Self::JavaScript
        } else {
            Self::Shell
        }
    }

    /// Extension used for the staged copy.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Task => ".yml",
            Self::JavaScript => ".js",
            Self::Shell => ".sh",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_urls_are_verbatim() {
        let settings = Settings::default();
        assert_eq!(
            resolve("https://host/run.sh", &settings),
            "https://host/run.sh"
        );
        assert_eq!(
            resolve("http://host/a/b.yml", &settings),
            "http://host/a/b.yml"
        );
    }

    #[test]
    fn test_bare_name_uses_default_repo() {
        let settings = Settings::default();
        assert_eq!(
            resolve("deploy.yml", &settings),
            "https://raw.githubusercontent.com/n-p-x/e/main/deploy.yml"
        );
        assert_eq!(
            resolve("hello", &settings),
            "https://raw.githubusercontent.com/n-p-x/e/main/hello"
        );
    }

    #[test]
    fn test_repo_shorthand_splits_on_first_slash() {
        let settings = Settings::default();
        assert_eq!(
            resolve("repo/path/to/file", &settings),
            "https://raw.githubusercontent.com/n-p-x/repo/main/path/to/file"
        );
    }

    #[test]
    fn test_resolution_follows_settings() {
        let settings = Settings {
            org: "acme".to_string(),
            default_repo: "tools".to_string(),
            branch: "dev".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            resolve("x.sh", &settings),
            "https://raw.githubusercontent.com/acme/tools/dev/x.sh"
        );
        assert_eq!(
            resolve("ops/x.sh", &settings),
            "https://raw.githubusercontent.com/acme/ops/dev/x.sh"
        );
    }

    #[test]
    fn test_classify_by_suffix() {
        assert_eq!(ScriptFormat::classify("a/deploy.yml"), ScriptFormat::Task);
        assert_eq!(ScriptFormat::classify("a/deploy.YAML"), ScriptFormat::Task);
        assert_eq!(ScriptFormat::classify("a/tool.JS"), ScriptFormat::JavaScript);
        assert_eq!(ScriptFormat::classify("a/setup.sh"), ScriptFormat::Shell);
        assert_eq!(ScriptFormat::classify("a/setup"), ScriptFormat::Shell);
        assert_eq!(ScriptFormat::classify("a/data.json"), ScriptFormat::Shell);
    }

    #[test]
    fn test_extensions() {
        assert_eq!(ScriptFormat::Task.extension(), ".yml");
        assert_eq!(ScriptFormat::JavaScript.extension(), ".js");
        assert_eq!(ScriptFormat::Shell.extension(), ".sh");
    }
}
