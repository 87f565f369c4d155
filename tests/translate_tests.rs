// tests/translate_tests.rs

use pretty_assertions::assert_eq;
use rql::translate::{OpFn, is_valid_field};
use rql::{Arg, Config, FieldDef, FieldType, Node, OpTable, Parser, Resource, TranslateError, Value};

/// A clause and its parameters.
type Sql = (String, Vec<Value>);

/// A small SQL-flavored translator.
fn sql_table() -> OpTable<Sql> {
    let mut table = OpTable::new();
    for (op, sql) in [("eq", "="), ("ne", "<>"), ("lt", "<"), ("gt", ">")] {
        table.set_op(op, compare(sql));
    }
    table.set_op("and", join(" AND "));
    table.set_op("or", join(" OR "));
    table
}

fn compare(sql: &'static str) -> OpFn<Sql> {
    Box::new(move |_: &OpTable<Sql>, node: &Node| {
        let field = node
            .field()
            .filter(|f| is_valid_field(f))
            .ok_or_else(|| TranslateError::InvalidField(node.to_string()))?;
        let value = node
            .args
            .get(1)
            .and_then(Arg::as_value)
            .ok_or_else(|| TranslateError::Invalid {
                op: node.op.clone(),
                message: "expects a value".to_string(),
            })?;
        Ok((format!("{} {} ?", field, sql), vec![value.clone()]))
    })
}

fn join(sep: &'static str) -> OpFn<Sql> {
    Box::new(move |table: &OpTable<Sql>, node: &Node| {
        let mut clauses = vec![];
        let mut params = vec![];
        for arg in &node.args {
            let child = arg.as_node().ok_or_else(|| TranslateError::Invalid {
                op: node.op.clone(),
                message: "expects nested nodes".to_string(),
            })?;
            let (clause, values) = table.translate(child)?;
            clauses.push(clause);
            params.extend(values);
        }
        Ok((format!("({})", clauses.join(sep)), params))
    })
}

fn parser() -> Parser {
    let resource = Resource::new("Product")
        .field(FieldDef::new("Name", FieldType::String).rql("filter"))
        .field(FieldDef::new("Price", FieldType::F64).rql("filter,replacewith=unit_price"));
    Parser::with_schema(Config::default(), &resource).unwrap()
}

// ============================================================================
// Dispatch
// ============================================================================

#[test]
fn test_translate_nested_tree() {
    let root = parser().parse("(name=pen|name=ink)&price=lt=10").unwrap();
    let (clause, params) = sql_table().translate_root(&root).unwrap().unwrap();

    assert_eq!(clause, "((name = ? OR name = ?) AND unit_price < ?)");
    assert_eq!(
        params,
        vec![
            Value::String("pen".to_string()),
            Value::String("ink".to_string()),
            Value::Float(10.0),
        ]
    );
}

#[test]
fn test_operator_lookup_ignores_case() {
    let root = parser().parse("and(name=a,price=gt=1)").unwrap();
    let (clause, _) = sql_table().translate_root(&root).unwrap().unwrap();
    assert_eq!(clause, "(name = ? AND unit_price > ?)");
}

#[test]
fn test_missing_handler() {
    let root = parser().parse("name=like=pe*").unwrap();
    assert_eq!(
        sql_table().translate_root(&root).unwrap_err(),
        TranslateError::NoHandler("like".to_string())
    );
}

#[test]
fn test_delete_op() {
    let mut table = sql_table();
    assert!(table.has_op("EQ"));
    assert!(table.delete_op("eq"));
    assert!(!table.delete_op("eq"));
    let root = parser().parse("name=pen").unwrap();
    assert!(matches!(
        table.translate_root(&root),
        Err(TranslateError::NoHandler(_))
    ));
}

#[test]
fn test_empty_predicate_translates_to_nothing() {
    let root = parser().parse("limit(5)").unwrap();
    assert_eq!(sql_table().translate_root(&root).unwrap(), None);
}

#[test]
fn test_unsafe_field_is_rejected() {
    let node = Node::new("eq", vec![Arg::literal("name;drop table"), Arg::literal("x")]);
    assert!(matches!(
        sql_table().translate(&node),
        Err(TranslateError::InvalidField(_))
    ));
}

// ============================================================================
// Field Names
// ============================================================================

#[test]
fn test_is_valid_field() {
    assert!(is_valid_field("address.city"));
    assert!(is_valid_field("created_at"));
    assert!(is_valid_field("x-1"));
    assert!(!is_valid_field("name; drop"));
    assert!(!is_valid_field("a'b"));
    assert!(!is_valid_field("naïve"));
}
