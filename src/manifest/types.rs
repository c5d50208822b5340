//! Core types for the endpoint manifest.
//!
//! Defines HTTP verbs, endpoint kinds, and the descriptor produced for
//! every discovered endpoint file.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::script::{Node, Value};

/// HTTP verb encoded in an endpoint file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    /// Parse the verb segment of a file name. Only lowercase names match.
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "get" => Some(Verb::Get),
            "post" => Some(Verb::Post),
            "put" => Some(Verb::Put),
            "delete" => Some(Verb::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::Get => "get",
            Verb::Post => "post",
            Verb::Put => "put",
            Verb::Delete => "delete",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic kind of a recognized database-backed endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointKind {
    CrudCreate,
    CrudRead,
    CrudUpdate,
    CrudDelete,
    CrudCount,
    CrudSql,
    CrudStatistics,
}

impl EndpointKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKind::CrudCreate => "crud-create",
            EndpointKind::CrudRead => "crud-read",
            EndpointKind::CrudUpdate => "crud-update",
            EndpointKind::CrudDelete => "crud-delete",
            EndpointKind::CrudCount => "crud-count",
            EndpointKind::CrudSql => "crud-sql",
            EndpointKind::CrudStatistics => "crud-statistics",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (name, type) pair in an endpoint's input or output schema.
///
/// For returned fields of a CRUD read, `value` holds the value of the
/// matching `<name>.eq` argument instead of a declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Flatten a declaration node to its name and value.
    ///
    /// Nested declarations below the node are dropped: a field is a single
    /// `(name, type)` pair in the manifest.
    pub fn from_node(node: &Node) -> Self {
        Self {
            name: node.name.clone(),
            value: node.value.clone(),
        }
    }

    fn to_node(&self) -> Node {
        Node {
            name: self.name.clone(),
            value: self.value.clone(),
            children: Vec::new(),
        }
    }
}

/// Everything statically known about one endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointDescriptor {
    /// Route, prefixed with the namespace segment (e.g. `magic/modules/shop/items`).
    pub path: String,
    pub verb: Verb,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<Vec<Field>>,
    /// Required roles in encounter order, duplicates kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returns: Option<Vec<Field>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub array: Option<bool>,
    /// `None` for plain custom scripts.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EndpointKind>,
}

impl EndpointDescriptor {
    pub fn new(path: impl Into<String>, verb: Verb) -> Self {
        Self {
            path: path.into(),
            verb,
            input: None,
            auth: None,
            description: None,
            returns: None,
            array: None,
            kind: None,
        }
    }

    /// Node form of the descriptor, as handed to script-side consumers.
    pub fn to_node(&self) -> Node {
        let mut node = Node::new("")
            .with_child(Node::with_value("path", self.path.as_str()))
            .with_child(Node::with_value("verb", self.verb.as_str()));

        if let Some(input) = &self.input {
            node.push(fields_node("input", input));
        }
        if let Some(auth) = &self.auth {
            let mut auth_node = Node::new("auth");
            for role in auth {
                auth_node.push(Node::with_value("", role.as_str()));
            }
            node.push(auth_node);
        }
        if let Some(description) = &self.description {
            node.push(Node::with_value("description", description.as_str()));
        }
        if let Some(returns) = &self.returns {
            node.push(fields_node("returns", returns));
        }
        if let Some(array) = self.array {
            node.push(Node::with_value("array", array));
        }
        if let Some(kind) = self.kind {
            node.push(Node::with_value("type", kind.as_str()));
        }
        node
    }
}

fn fields_node(name: &str, fields: &[Field]) -> Node {
    Node {
        name: name.to_string(),
        value: None,
        children: fields.iter().map(Field::to_node).collect(),
    }
}
