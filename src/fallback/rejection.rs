//! Entities reported as rejected by the gateway.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::declarative::loader::DocumentError;
use crate::fallback::error::FallbackError;
use crate::graph::{EntityKey, EntityType};

/// One entity the gateway refused, as parsed by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct FlatEntityError {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
}

impl FlatEntityError {
    pub fn new(entity_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            name: name.into(),
        }
    }

    /// Vertex key of the rejected entity (exact, case sensitive).
    pub fn key(&self) -> EntityKey {
        EntityKey::from_parts(&self.entity_type, &self.name)
    }
}

impl FromStr for FlatEntityError {
    type Err = FallbackError;

    /// Parse `type:name`. The name may itself contain `:` (e.g. targets).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (entity_type, name) = s
            .split_once(':')
            .filter(|(_, name)| !name.is_empty())
            .ok_or_else(|| FallbackError::MalformedRejection(s.to_string()))?;
        let entity_type: EntityType = entity_type.parse()?;
        Ok(Self::new(entity_type.as_str(), name))
    }
}

/// Load a JSON array of `{"type": ..., "name": ...}` objects.
pub fn load_rejections(path: &Path) -> Result<Vec<FlatEntityError>, DocumentError> {
    let text = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphError;

    #[test]
    fn test_parse_type_and_name() {
        let rejection: FlatEntityError = "target:up/192.168.194.9:80".parse().unwrap();
        assert_eq!(rejection, FlatEntityError::new("target", "up/192.168.194.9:80"));
        assert_eq!(rejection.key().as_str(), "target:up/192.168.194.9:80");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "route".parse::<FlatEntityError>(),
            Err(FallbackError::MalformedRejection(_))
        ));
        assert!(matches!(
            "route:".parse::<FlatEntityError>(),
            Err(FallbackError::MalformedRejection(_))
        ));
        assert!(matches!(
            "gateway:x".parse::<FlatEntityError>(),
            Err(FallbackError::Graph(GraphError::UnknownEntityType(_)))
        ));
    }

    #[test]
    fn test_wire_format() {
        let parsed: Vec<FlatEntityError> =
            serde_json::from_str(r#"[{"type": "route", "name": "r1"}]"#).unwrap();
        assert_eq!(parsed, vec![FlatEntityError::new("route", "r1")]);
    }

    #[test]
    fn test_load_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rejected.json");
        fs::write(&path, r#"[{"type": "plugin", "name": "p1"}]"#).unwrap();
        assert_eq!(
            load_rejections(&path).unwrap(),
            vec![FlatEntityError::new("plugin", "p1")]
        );
    }
}
