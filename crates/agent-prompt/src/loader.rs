//! File-based template overrides
//!
//! Gated behind the `file-loader` feature.

use crate::{JinjaTemplate, PromptError, PromptRegistry, PromptTemplate, Result};
use std::path::{Path, PathBuf};
use tracing::info;

const EXTENSIONS: [&str; 2] = ["jinja", "j2"];

/// Loads templates from a directory
///
/// Each `.jinja` or `.j2` file becomes one template. Template ids contain
/// dots, which are awkward in file names, so `__` in a file stem stands for
/// `.`:
///
/// ```text
/// prompts/
/// ├── news__analyze_headlines.j2   -> news.analyze_headlines
/// └── research__react.jinja        -> research.react
/// ```
#[derive(Debug, Clone)]
pub struct FileLoader {
    base_path: PathBuf,
}

impl FileLoader {
    /// Create a new file loader with the given base path
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Load a single template by id
    pub fn load_template(&self, name: &str) -> Result<JinjaTemplate> {
        let stem = name.replace('.', "__");
        for ext in EXTENSIONS {
            let path = self.base_path.join(format!("{stem}.{ext}"));
            if path.is_file() {
                return JinjaTemplate::new(name, read(&path)?);
            }
        }

        Err(PromptError::FileLoadError {
            path: self.base_path.join(stem).display().to_string(),
            detail: "No template files found".to_string(),
        })
    }

    /// Load every template in the directory
    pub fn load_all(&self) -> Result<Vec<JinjaTemplate>> {
        let entries = std::fs::read_dir(&self.base_path).map_err(|e| PromptError::FileLoadError {
            path: self.base_path.display().to_string(),
            detail: e.to_string(),
        })?;

        let mut templates = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(name) = template_id(&path) {
                templates.push(JinjaTemplate::new(name, read(&path)?)?);
            }
        }
        templates.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(templates)
    }

    /// Load every template in the directory into `registry`, replacing
    /// defaults with the same id. Returns how many were loaded.
    pub fn load_into(&self, registry: &PromptRegistry) -> Result<usize> {
        let templates = self.load_all()?;
        let count = templates.len();
        registry.register_all(templates);
        info!(
            dir = %self.base_path.display(),
            count,
            "Loaded prompt overrides"
        );
        Ok(count)
    }
}

fn template_id(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?;
    if !EXTENSIONS.contains(&ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    Some(stem.replace("__", "."))
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| PromptError::FileLoadError {
        path: path.display().to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn create_test_file(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_template_id() {
        assert_eq!(
            template_id(Path::new("news__analyze_headlines.j2")).as_deref(),
            Some("news.analyze_headlines")
        );
        assert_eq!(
            template_id(Path::new("simple.jinja")).as_deref(),
            Some("simple")
        );
        assert_eq!(template_id(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_load_template() {
        let dir = tempdir().unwrap();
        create_test_file(dir.path(), "news__research_goal.jinja", "Research {{ company }}");

        let loader = FileLoader::new(dir.path());
        let template = loader.load_template("news.research_goal").unwrap();
        assert_eq!(
            template.render(&json!({ "company": "IBM" })).unwrap(),
            "Research IBM"
        );
    }

    #[test]
    fn test_load_not_found() {
        let dir = tempdir().unwrap();
        let loader = FileLoader::new(dir.path());
        assert!(matches!(
            loader.load_template("missing"),
            Err(PromptError::FileLoadError { .. })
        ));
    }

    #[test]
    fn test_load_into_overrides_defaults() {
        let dir = tempdir().unwrap();
        create_test_file(dir.path(), "news__analyze_headlines.j2", "Custom: {{ headlines | length }}");
        create_test_file(dir.path(), "README.md", "ignored");

        let registry = PromptRegistry::new();
        registry.register(JinjaTemplate::new("news.analyze_headlines", "Default").unwrap());
        registry.register(JinjaTemplate::new("news.other", "Untouched").unwrap());

        let loaded = FileLoader::new(dir.path()).load_into(&registry).unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(
            registry
                .render("news.analyze_headlines", &json!({ "headlines": ["a", "b"] }))
                .unwrap(),
            "Custom: 2"
        );
        assert_eq!(registry.render("news.other", &json!({})).unwrap(), "Untouched");
    }

    #[test]
    fn test_broken_override_is_rejected() {
        let dir = tempdir().unwrap();
        create_test_file(dir.path(), "bad.jinja", "{% if %}");
        assert!(matches!(
            FileLoader::new(dir.path()).load_all(),
            Err(PromptError::TemplateParseFailed { .. })
        ));
    }

    #[test]
    fn test_missing_directory() {
        let loader = FileLoader::new("/definitely/not/here");
        assert!(loader.load_all().is_err());
    }
}
