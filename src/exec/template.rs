// src/exec/template.rs

//! `{file}` / `{name}` / `{stem}` / `{dir}` placeholder expansion.

use std::path::{Path, PathBuf};

/// Path pieces of the changed file, as substituted into stage commands.
#[derive(Debug, Clone)]
pub struct FileContext {
    pub file: PathBuf,
    pub name: String,
    pub stem: String,
    pub dir: PathBuf,
}

impl FileContext {
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self {
            file: path.to_path_buf(),
            name,
            stem,
            dir,
        }
    }

    /// Substitute known placeholders; anything else is left untouched.
    pub fn expand(&self, template: &str) -> String {
        template
            .replace("{file}", &self.file.to_string_lossy())
            .replace("{name}", &self.name)
            .replace("{stem}", &self.stem)
            .replace("{dir}", &self.dir.to_string_lossy())
    }
}
