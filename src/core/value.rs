use std::collections::BTreeMap;

use crate::core::error::GraphError;
use crate::core::graph::{Edge, Node};
use crate::core::types::NodeId;

/// Dynamically typed attribute value, used where attributes are addressed by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Node(Box<Node>),
}

/// Named constructor arguments. A missing key is a null attribute.
pub type Attrs = BTreeMap<String, Value>;

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
            Value::Node(_) => "node",
        }
    }

    fn mismatch(&self, expected: &'static str) -> GraphError {
        GraphError::TypeMismatch { expected, found: self.kind() }
    }

    pub(crate) fn into_int(self) -> Result<i64, GraphError> {
        match self {
            Value::Int(v) => Ok(v),
            other => Err(other.mismatch("int")),
        }
    }

    //ints widen, the column is a float
    pub(crate) fn into_float(self) -> Result<f64, GraphError> {
        match self {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            other => Err(other.mismatch("float")),
        }
    }

    pub(crate) fn into_text(self) -> Result<String, GraphError> {
        match self {
            Value::Text(v) => Ok(v),
            other => Err(other.mismatch("text")),
        }
    }

    pub(crate) fn into_bool(self) -> Result<bool, GraphError> {
        match self {
            Value::Bool(v) => Ok(v),
            other => Err(other.mismatch("bool")),
        }
    }

    pub(crate) fn into_node(self) -> Result<Node, GraphError> {
        match self {
            Value::Node(node) => Ok(*node),
            other => Err(other.mismatch("node")),
        }
    }

    pub(crate) fn into_node_id(self) -> Result<NodeId, GraphError> {
        match self {
            Value::Int(v) => NodeId::try_from(v).map_err(|_| GraphError::TypeMismatch {
                expected: "node id",
                found: "int",
            }),
            other => Err(other.mismatch("node id")),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Node> for Value {
    fn from(v: Node) -> Self {
        Value::Node(Box::new(v))
    }
}

impl From<&Node> for Value {
    fn from(v: &Node) -> Self {
        Value::Node(Box::new(v.clone()))
    }
}

/// Anything attributes can be read from by name (templates for `Entity::create`).
pub trait AttributeSource {
    /// `None` means the attribute is absent or null.
    fn attr(&self, name: &str) -> Option<Value>;
}

impl AttributeSource for Attrs {
    fn attr(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

impl AttributeSource for Node {
    fn attr(&self, name: &str) -> Option<Value> {
        match name {
            "size" => self.size.map(Value::Int),
            "label" => self.label.clone().map(Value::Text),
            "color" => self.color().map(Value::from),
            _ => None,
        }
    }
}

//edges only hold endpoint ids, so "source"/"target" never resolve to a node here
impl AttributeSource for Edge {
    fn attr(&self, name: &str) -> Option<Value> {
        match name {
            "size" => self.size.map(Value::Int),
            "label" => self.label.clone().map(Value::Text),
            "weight" => self.weight.map(Value::Float),
            "color" => self.color().map(Value::from),
            "directed" => self.directed.map(Value::Bool),
            "source_id" => self.source_id.map(|id| Value::Int(id.into())),
            "target_id" => self.target_id.map(|id| Value::Int(id.into())),
            _ => None,
        }
    }
}

/// Build an `Attrs` map from `name => value` pairs.
#[macro_export]
macro_rules! attrs {
    () => { $crate::core::value::Attrs::new() };
    ($($name:expr => $value:expr),+ $(,)?) => {{
        let mut attrs = $crate::core::value::Attrs::new();
        $( attrs.insert(::std::string::String::from($name), $crate::core::value::Value::from($value)); )+
        attrs
    }};
}
