//! Pattern-based classification of database-backed endpoints.
//!
//! Two matchers run in fixed order over the top level of a script:
//!
//! 1. CRUD wrapper: the last invoke-slot instruction carries both a
//!    `database` and a `table` child.
//! 2. Raw SQL: the last SQL connection instruction contains a node whose
//!    name ends in `.select`.
//!
//! The raw SQL matcher only runs when the CRUD wrapper matcher fails.

use tracing::trace;

use crate::config::Vocabulary;
use crate::script::{Node, Value};

use super::types::{EndpointKind, Field, Verb};

/// Instruction shape recognized in a script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pattern<'a> {
    /// A generated CRUD wrapper around one table.
    CrudWrapper { slot: &'a Node },
    /// A raw SQL select, flagged or not as a statistics query.
    RawSql { select: &'a Node, statistics: bool },
}

/// Schema information derived from a recognized pattern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub kind: Option<EndpointKind>,
    pub returns: Option<Vec<Field>>,
    pub array: Option<bool>,
}

type Matcher = for<'a> fn(&'a Node, &Vocabulary) -> Option<Pattern<'a>>;

const MATCHERS: [Matcher; 2] = [match_crud_wrapper, match_raw_sql];

/// First pattern that matches `lambda`, in priority order.
pub fn detect<'a>(lambda: &'a Node, vocabulary: &Vocabulary) -> Option<Pattern<'a>> {
    MATCHERS.iter().find_map(|matcher| matcher(lambda, vocabulary))
}

pub fn match_crud_wrapper<'a>(lambda: &'a Node, vocabulary: &Vocabulary) -> Option<Pattern<'a>> {
    let slot = lambda.last_child_where(|c| vocabulary.is_invoke_slot(&c.name))?;
    if slot.has_child("database") && slot.has_child("table") {
        Some(Pattern::CrudWrapper { slot })
    } else {
        None
    }
}

pub fn match_raw_sql<'a>(lambda: &'a Node, vocabulary: &Vocabulary) -> Option<Pattern<'a>> {
    let connect = lambda.last_child_where(|c| vocabulary.is_sql_connect(&c.name))?;
    let select = connect
        .descendants()
        .into_iter()
        .rev()
        .find(|n| n.name.ends_with(&vocabulary.select_suffix))?;
    let statistics = lambda
        .child(&vocabulary.is_statistics)
        .and_then(|n| n.value.as_ref())
        .and_then(Value::as_bool)
        .unwrap_or(false);
    Some(Pattern::RawSql { select, statistics })
}

/// Derive kind, returned fields and collection flag for a script.
pub fn classify(
    lambda: &Node,
    verb: Verb,
    input: Option<&[Field]>,
    vocabulary: &Vocabulary,
) -> Classification {
    match detect(lambda, vocabulary) {
        Some(Pattern::CrudWrapper { slot }) => crud_wrapper(slot, verb, input, vocabulary),
        Some(Pattern::RawSql { select, statistics }) => {
            trace!(select = %select.name, statistics, "raw SQL endpoint");
            Classification {
                kind: Some(if statistics {
                    EndpointKind::CrudStatistics
                } else {
                    EndpointKind::CrudSql
                }),
                ..Classification::default()
            }
        }
        None => Classification::default(),
    }
}

fn crud_wrapper(
    slot: &Node,
    verb: Verb,
    input: Option<&[Field]>,
    vocabulary: &Vocabulary,
) -> Classification {
    let with_kind = |kind| Classification {
        kind: Some(kind),
        ..Classification::default()
    };
    match verb {
        Verb::Get => match slot.child("columns") {
            Some(columns) => read_columns(columns, input, vocabulary),
            None => Classification::default(),
        },
        Verb::Post => with_kind(EndpointKind::CrudCreate),
        Verb::Put => with_kind(EndpointKind::CrudUpdate),
        Verb::Delete => with_kind(EndpointKind::CrudDelete),
    }
}

fn read_columns(columns: &Node, input: Option<&[Field]>, vocabulary: &Vocabulary) -> Classification {
    if columns.has_child(&vocabulary.count_column) {
        return Classification {
            kind: Some(EndpointKind::CrudCount),
            returns: Some(vec![Field::new("count", Some(Value::from("long")))]),
            array: Some(false),
        };
    }

    let mut returns: Vec<Field> = columns.children.iter().map(Field::from_node).collect();
    if let Some(args) = input {
        for field in &mut returns {
            let filter = format!("{}.eq", field.name);
            field.value = args
                .iter()
                .find(|arg| arg.name == filter)
                .and_then(|arg| arg.value.clone());
        }
    }

    Classification {
        kind: Some(EndpointKind::CrudRead),
        returns: Some(returns),
        array: Some(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::metadata::input_arguments;
    use crate::script::parse;

    fn run(source: &str, verb: Verb) -> Classification {
        let vocabulary = Vocabulary::default();
        let lambda = parse(source).unwrap();
        let input = input_arguments(&lambda, &vocabulary);
        classify(&lambda, verb, input.as_deref(), &vocabulary)
    }

    const READ: &str = r#"
.arguments
   id.eq:long
   limit:long
wait.signal:magic.db.read
   database:shop
   table:items
   columns
      id
      name
"#;

    #[test]
    fn test_crud_read_propagates_eq_filters() {
        let result = run(READ, Verb::Get);
        assert_eq!(result.kind, Some(EndpointKind::CrudRead));
        assert_eq!(result.array, Some(true));
        assert_eq!(
            result.returns,
            Some(vec![
                Field::new("id", Some(Value::from("long"))),
                Field::new("name", None),
            ])
        );
    }

    #[test]
    fn test_crud_read_without_arguments_keeps_column_values() {
        let source = "wait.signal\n   database:shop\n   table:items\n   columns\n      id:long\n";
        let result = run(source, Verb::Get);
        assert_eq!(result.kind, Some(EndpointKind::CrudRead));
        assert_eq!(
            result.returns,
            Some(vec![Field::new("id", Some(Value::from("long")))])
        );
    }

    #[test]
    fn test_count_takes_precedence() {
        let source = r#"
wait.signal:magic.db.read
   database:shop
   table:items
   columns
      id
      "count(*) as count"
      name
"#;
        let result = run(source, Verb::Get);
        assert_eq!(result.kind, Some(EndpointKind::CrudCount));
        assert_eq!(result.array, Some(false));
        assert_eq!(
            result.returns,
            Some(vec![Field::new("count", Some(Value::from("long")))])
        );
    }

    #[test]
    fn test_get_without_columns_derives_nothing() {
        let source = "wait.signal\n   database:shop\n   table:items\n";
        assert_eq!(run(source, Verb::Get), Classification::default());
    }

    #[test]
    fn test_write_verbs() {
        let source = "wait.signal\n   database:shop\n   table:items\n";
        assert_eq!(run(source, Verb::Post).kind, Some(EndpointKind::CrudCreate));
        assert_eq!(run(source, Verb::Put).kind, Some(EndpointKind::CrudUpdate));
        assert_eq!(run(source, Verb::Delete).kind, Some(EndpointKind::CrudDelete));
        assert_eq!(run(source, Verb::Delete).returns, None);
    }

    #[test]
    fn test_slot_synonyms_and_last_wins() {
        let source = "signal\n   database:shop\n   table:items\n";
        assert_eq!(run(source, Verb::Post).kind, Some(EndpointKind::CrudCreate));

        // Only the last invoke-slot instruction counts.
        let source = "wait.signal\n   database:shop\n   table:items\nwait.signal:log\n";
        assert_eq!(run(source, Verb::Post), Classification::default());
    }

    #[test]
    fn test_missing_table_is_not_crud() {
        let source = "wait.signal\n   database:shop\n";
        assert_eq!(run(source, Verb::Post), Classification::default());
    }

    #[test]
    fn test_raw_sql_classification() {
        let plain = "wait.mysql.connect:shop\n   mysql.select:select * from items\n";
        assert_eq!(run(plain, Verb::Get).kind, Some(EndpointKind::CrudSql));

        let flagged_off = format!(".is-statistics:bool:false\n{}", plain);
        assert_eq!(run(&flagged_off, Verb::Get).kind, Some(EndpointKind::CrudSql));

        let stats = format!(".is-statistics:bool:true\n{}", plain);
        let result = run(&stats, Verb::Get);
        assert_eq!(result.kind, Some(EndpointKind::CrudStatistics));
        assert_eq!(result.returns, None);
        assert_eq!(result.array, None);
    }

    #[test]
    fn test_raw_sql_select_may_be_nested() {
        let source = "wait.mssql.connect:shop\n   .sql\n      mssql.select:select 1\n";
        assert_eq!(run(source, Verb::Get).kind, Some(EndpointKind::CrudSql));
    }

    #[test]
    fn test_raw_sql_without_select() {
        let source = "wait.mysql.connect:shop\n   mysql.execute:delete from items\n";
        assert_eq!(run(source, Verb::Delete), Classification::default());
    }

    #[test]
    fn test_crud_match_blocks_sql_check() {
        let source = r#"
wait.signal
   database:shop
   table:items
wait.mysql.connect:shop
   mysql.select:select 1
"#;
        assert_eq!(run(source, Verb::Get), Classification::default());
    }

    #[test]
    fn test_detect_priority() {
        let vocabulary = Vocabulary::default();
        let lambda = parse("wait.signal\n   database:a\n   table:b\nwait.mysql.connect\n   mysql.select\n").unwrap();
        assert!(matches!(
            detect(&lambda, &vocabulary),
            Some(Pattern::CrudWrapper { .. })
        ));
    }
}
