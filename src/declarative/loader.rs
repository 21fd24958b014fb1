//! Reading and writing declarative documents.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::declarative::schema::Content;

/// Errors raised while loading or writing a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Serialization format, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// `.yaml`/`.yml` map to YAML, everything else to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => DocumentFormat::Yaml,
            _ => DocumentFormat::Json,
        }
    }
}

/// Parse a document from text.
pub fn parse_document(text: &str, format: DocumentFormat) -> Result<Content, DocumentError> {
    let content = match format {
        DocumentFormat::Json => serde_json::from_str(text)?,
        DocumentFormat::Yaml => serde_yaml::from_str(text)?,
    };
    Ok(content)
}

/// Render a document to text.
pub fn render_document(content: &Content, format: DocumentFormat) -> Result<String, DocumentError> {
    let text = match format {
        DocumentFormat::Json => serde_json::to_string_pretty(content)?,
        DocumentFormat::Yaml => serde_yaml::to_string(content)?,
    };
    Ok(text)
}

/// Load a declarative document from disk.
pub fn load_document(path: &Path) -> Result<Content, DocumentError> {
    let text = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let content = parse_document(&text, DocumentFormat::from_path(path))?;

    tracing::debug!(
        path = %path.display(),
        services = content.services.len(),
        plugins = content.plugins.len(),
        upstreams = content.upstreams.len(),
        "Declarative document loaded"
    );
    Ok(content)
}

/// Write a declarative document to disk.
pub fn write_document(path: &Path, content: &Content) -> Result<(), DocumentError> {
    let text = render_document(content, DocumentFormat::from_path(path))?;
    fs::write(path, text).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("a.yaml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.yml")), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("a.json")), DocumentFormat::Json);
        assert_eq!(DocumentFormat::from_path(Path::new("a")), DocumentFormat::Json);
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let content = parse_document(
            r#"{"services": [{"name": "svc", "routes": [{"name": "r1"}]}]}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        write_document(&path, &content).unwrap();

        let loaded = load_document(&path).unwrap();
        assert_eq!(loaded, content);
    }

    #[test]
    fn test_missing_file() {
        let err = load_document(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }
}
