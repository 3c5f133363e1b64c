use serde::{Deserialize, Serialize};

use crate::core::error::GraphError;
use crate::schema::GraphSchema;

/// Schema settings as read from a TOON document:
///
/// ```text
/// node_class: CourseNode
/// edge_class: CourseEdge
/// edge_table: prerequisites
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub node_class: String,
    pub edge_class: String,
    #[serde(default)]
    pub node_table: Option<String>,
    #[serde(default)]
    pub edge_table: Option<String>,
}

impl SchemaConfig {
    pub fn from_toon(input: &str) -> Result<Self, GraphError> {
        toon_format::decode_default(input).map_err(|e| GraphError::Config(e.to_string()))
    }

    pub fn to_toon(&self) -> Result<String, GraphError> {
        toon_format::encode_default(self).map_err(|e| GraphError::Config(e.to_string()))
    }
}

impl From<SchemaConfig> for GraphSchema {
    fn from(config: SchemaConfig) -> Self {
        let mut schema = GraphSchema::new(config.node_class, config.edge_class);
        if let Some(table) = config.node_table {
            schema = schema.with_node_table(table);
        }
        if let Some(table) = config.edge_table {
            schema = schema.with_edge_table(table);
        }
        schema
    }
}
