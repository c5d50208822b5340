//! Declarative metadata: arguments, authorization and description.

use crate::config::Vocabulary;
use crate::script::Node;

use super::types::Field;

/// Metadata declared at the top level of a script.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub input: Option<Vec<Field>>,
    pub auth: Option<Vec<String>>,
    pub description: Option<String>,
}

pub fn extract(lambda: &Node, vocabulary: &Vocabulary) -> Metadata {
    Metadata {
        input: input_arguments(lambda, vocabulary),
        auth: authorization(lambda, vocabulary),
        description: description(lambda, vocabulary),
    }
}

/// Children of the first arguments node; `None` when absent or empty.
pub fn input_arguments(lambda: &Node, vocabulary: &Vocabulary) -> Option<Vec<Field>> {
    let args = lambda.child(&vocabulary.arguments)?;
    if args.children.is_empty() {
        return None;
    }
    Some(args.children.iter().map(Field::from_node).collect())
}

/// Roles from every ticket-verify directive, in order. Duplicates are kept.
pub fn authorization(lambda: &Node, vocabulary: &Vocabulary) -> Option<Vec<String>> {
    let roles: Vec<String> = lambda
        .children
        .iter()
        .filter(|c| c.name == vocabulary.ticket_verify)
        .filter_map(Node::value_str)
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|role| !role.is_empty())
        .map(String::from)
        .collect();

    if roles.is_empty() {
        None
    } else {
        Some(roles)
    }
}

pub fn description(lambda: &Node, vocabulary: &Vocabulary) -> Option<String> {
    lambda
        .child(&vocabulary.description)
        .and_then(Node::value_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}
