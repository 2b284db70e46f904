use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Toolchain preset used to build the default pipeline and watch patterns.
///
/// - `Java`: compile with `javac`, then run the class with `java`.
/// - `Python`: run the script with the Python interpreter.
/// - `Custom`: stages come entirely from `[[pipeline.stage]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    Python,
    Custom,
}

impl Default for Language {
    fn default() -> Self {
        Language::Java
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "java" => Ok(Language::Java),
            "python" | "py" => Ok(Language::Python),
            "custom" => Ok(Language::Custom),
            other => Err(format!(
                "invalid language: {other} (expected \"java\", \"python\" or \"custom\")"
            )),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Language::Java => "java",
            Language::Python => "python",
            Language::Custom => "custom",
        };
        f.write_str(s)
    }
}

/// How many run coordinators exist.
///
/// - `Global`: one coordinator for every watched file. Edits to different
///   files are serialized and the latest path wins (default).
/// - `PerFile`: one coordinator per changed path, so files never share a
///   pending run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinatorScope {
    Global,
    PerFile,
}

impl Default for CoordinatorScope {
    fn default() -> Self {
        CoordinatorScope::Global
    }
}

impl FromStr for CoordinatorScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "global" => Ok(CoordinatorScope::Global),
            "per_file" => Ok(CoordinatorScope::PerFile),
            other => Err(format!(
                "invalid scope: {other} (expected \"global\" or \"per_file\")"
            )),
        }
    }
}

impl fmt::Display for CoordinatorScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordinatorScope::Global => f.write_str("global"),
            CoordinatorScope::PerFile => f.write_str("per_file"),
        }
    }
}
