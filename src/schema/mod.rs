//! Table layout for a node type and an edge type.
//!
//! A [`GraphSchema`] names the two tables and describes their columns, the
//! foreign keys from the edge table back to the node table, and the join and
//! backref names a persistence adapter wires its relationships with.

pub mod config;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::naming::to_snake_case;
use crate::core::types::{COLOR_LENGTH, Endpoint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Integer,
    /// Text, optionally bounded in characters.
    Unicode(Option<usize>),
    Float,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub primary_key: bool,
    pub nullable: bool,
    /// `table.column` this column references.
    pub foreign_key: Option<String>,
}

impl Column {
    fn plain(name: &str, kind: ColumnKind) -> Self {
        Column {
            name: name.to_string(),
            kind,
            primary_key: false,
            nullable: true,
            foreign_key: None,
        }
    }

    fn primary_key() -> Self {
        Column {
            primary_key: true,
            nullable: false,
            ..Column::plain("id", ColumnKind::Integer)
        }
    }

    fn reference(name: &str, target: String) -> Self {
        Column {
            nullable: false,
            foreign_key: Some(target),
            ..Column::plain(name, ColumnKind::Integer)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphSchema {
    node_type: String,
    edge_type: String,
    node_table: String,
    edge_table: String,
}

impl GraphSchema {
    /// Table names default to the snake_case form of the type names.
    pub fn new(node_type: impl Into<String>, edge_type: impl Into<String>) -> Self {
        let node_type = node_type.into();
        let edge_type = edge_type.into();
        let node_table = to_snake_case(&node_type);
        let edge_table = to_snake_case(&edge_type);
        debug!(%node_table, %edge_table, "derived table names");
        GraphSchema { node_type, edge_type, node_table, edge_table }
    }

    pub fn with_node_table(mut self, table: impl Into<String>) -> Self {
        self.node_table = table.into();
        self
    }

    pub fn with_edge_table(mut self, table: impl Into<String>) -> Self {
        self.edge_table = table.into();
        self
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn edge_type(&self) -> &str {
        &self.edge_type
    }

    pub fn node_table(&self) -> &str {
        &self.node_table
    }

    pub fn edge_table(&self) -> &str {
        &self.edge_table
    }

    /// Column both endpoint ids reference.
    pub fn foreign_key(&self) -> String {
        format!("{}.id", self.node_table)
    }

    /// e.g. `Node.id == Edge.source_id`
    pub fn join_condition(&self, endpoint: Endpoint) -> String {
        format!("{}.id == {}.{}", self.node_type, self.edge_type, endpoint.id_attr())
    }

    /// Collection the endpoint's node sees this edge in.
    pub fn backref(&self, endpoint: Endpoint) -> &'static str {
        endpoint.backref()
    }

    pub fn node_columns(&self) -> Vec<Column> {
        vec![
            Column::primary_key(),
            Column::plain("size", ColumnKind::Integer),
            Column::plain("label", ColumnKind::Unicode(None)),
            Column::plain("color", ColumnKind::Unicode(Some(COLOR_LENGTH))),
        ]
    }

    pub fn edge_columns(&self) -> Vec<Column> {
        vec![
            Column::primary_key(),
            Column::plain("size", ColumnKind::Integer),
            Column::plain("label", ColumnKind::Unicode(None)),
            Column::plain("weight", ColumnKind::Float),
            Column::plain("color", ColumnKind::Unicode(Some(COLOR_LENGTH))),
            Column::plain("directed", ColumnKind::Boolean),
            Column::reference(Endpoint::Source.id_attr(), self.foreign_key()),
            Column::reference(Endpoint::Target.id_attr(), self.foreign_key()),
        ]
    }
}
