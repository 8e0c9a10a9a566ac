//! Dependency declarations, manifests and the argument preamble for JavaScript scripts.
//!
//! A script declares its npm dependencies with a plain array literal:
//!
//! ```js
//! const deps = ["left-pad", "chalk"];
//! ```
//!
//! The literal is read as data only. Anything that is not a flat array of
//! string literals is ignored with a warning.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::warn;

#[allow(clippy::expect_used)]
static DEPS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:const|let|var|export\s+const)\s+deps\s*=\s*(\[[^\]]*\])")
        .expect("deps pattern is valid")
});

#[allow(clippy::expect_used)]
static ESM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(import|export)\s+").expect("module pattern is valid")
});

/// Names used inside the generated `package.json`.
pub const PROJECT_NAME: &str = "nipox-temp-project";
pub const PROJECT_VERSION: &str = "1.0.0";

/// Appended to every staged script: splits argv into positional and named
/// arguments and hands them to a top-level `script` function, if there is one.
const ARGS_PREAMBLE: &str = r"
// Argument handling appended by nipox
const __nipoxArgv = process.argv.slice(2);
const __nipoxPositional = [];
const __nipoxNamed = {};
for (let i = 0; i < __nipoxArgv.length; i++) {
  const arg = __nipoxArgv[i];
  if (arg.startsWith('--')) {
    const key = arg.substring(2);
    const next = __nipoxArgv[i + 1];
    if (next && !next.startsWith('--')) {
      __nipoxNamed[key] = next;
      i++;
    } else {
      __nipoxNamed[key] = true;
    }
  } else {
    __nipoxPositional.push(arg);
  }
}
if (typeof script === 'function') {
  script({ positional: __nipoxPositional, named: __nipoxNamed });
}
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    Module,
    CommonJs,
}

impl ModuleType {
    /// `module` when the source has a line starting with `import` or `export`.
    #[must_use]
    pub fn detect(source: &str) -> Self {
        if ESM_PATTERN.is_match(source) {
            Self::Module
        } else {
            Self::CommonJs
        }
    }
}

/// The `package.json` written into the ephemeral project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub name: &'static str,
    pub version: &'static str,
    #[serde(rename = "type")]
    pub module_type: ModuleType,
    pub dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// Every dependency pinned to `latest`.
    #[must_use]
    pub fn new(dependencies: &[String], module_type: ModuleType) -> Self {
        Self {
            name: PROJECT_NAME,
            version: PROJECT_VERSION,
            module_type,
            dependencies: dependencies
                .iter()
                .map(|dep| (dep.clone(), "latest".to_string()))
                .collect(),
        }
    }

    /// # Errors
    ///
    /// Returns `Err` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Pull the `deps` array out of a script, or an empty list if there is none.
#[must_use]
pub fn extract_dependencies(source: &str) -> Vec<String> {
    let Some(literal) = DEPS_PATTERN
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
    else {
        return Vec::new();
    };

    if let Ok(deps) = serde_json::from_str::<Vec<String>>(literal) {
        return deps;
    }
    if let Some(deps) = parse_string_array(literal) {
        return deps;
    }

    warn!("Ignoring deps declaration that is not a list of strings: {literal}");
    Vec::new()
}

/// Parse a JavaScript array made only of quoted string literals.
///
/// Accepts single, double and backtick quotes (without `${`) and a trailing comma.
fn parse_string_array(literal: &str) -> Option<Vec<String>> {
    let inner = literal.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut chars = inner.chars().peekable();
    let mut items = Vec::new();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let quote = match chars.next() {
            None => return Some(items),
            Some(q @ ('\'' | '"' | '`')) => q,
            Some(_) => return None,
        };

        let mut value = String::new();
        loop {
            match chars.next()? {
                '\\' => value.push(chars.next()?),
                '$' if quote == '`' && chars.peek() == Some(&'{') => return None,
                c if c == quote => break,
                c => value.push(c),
            }
        }
        items.push(value);

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => return Some(items),
            Some(',') => {}
            Some(_) => return None,
        }
    }
}

/// The script as it is written into the project: its source unchanged, then the argument preamble.
#[must_use]
pub fn with_preamble(source: &str) -> String {
    format!("{source}\n{ARGS_PREAMBLE}")
}
