// tests/validation_tests.rs

use chrono::{Datelike, Timelike};
use pretty_assertions::assert_eq;
use rql::ast::{Arg, Node, Sort};
use rql::{
    Config, FieldDef, FieldError, FieldType, Parser, RangeError, Resource, RqlError, SchemaError,
    Value,
};
use rust_decimal::Decimal;

fn product() -> Resource {
    Resource::new("Product")
        .field(FieldDef::new("Foo", FieldType::String).rql("filter"))
        .field(FieldDef::new("Price", FieldType::F64).rql("filter,sort"))
        .field(FieldDef::new("Stock", FieldType::U16).rql("filter"))
        .field(FieldDef::new("Rank", FieldType::I8).rql("filter,sort"))
        .field(FieldDef::new("Active", FieldType::Bool).rql("filter"))
        .field(FieldDef::new("Cost", FieldType::Decimal).rql("filter"))
        .field(FieldDef::new("Color", FieldType::String).rql("filter,replacewith=colour"))
        .field(FieldDef::new("Tags", FieldType::Slice(Box::new(FieldType::String))).rql("filter"))
        .field(FieldDef::new("Discount", FieldType::Nullable(Box::new(FieldType::F64))).rql("filter"))
        .field(FieldDef::new("Released", FieldType::Time).rql("filter,sort,layout=2006-01-02"))
        .field(FieldDef::new("Secret", FieldType::String).rql("sort"))
}

fn parser() -> Parser {
    Parser::with_schema(Config::default(), &product()).unwrap()
}

fn s(v: &str) -> Arg {
    Arg::Value(Value::String(v.to_string()))
}

fn f(v: f64) -> Arg {
    Arg::Value(Value::Float(v))
}

fn node(op: &str, args: Vec<Arg>) -> Node {
    Node::new(op, args)
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_function_query_with_special_ops() {
    let root = parser()
        .parse("and(eq(foo,3),lt(price,10))&sort(+price)&limit(10,20)")
        .unwrap();

    assert_eq!(
        root.node,
        Some(node(
            "and",
            vec![
                Arg::Node(node("eq", vec![s("foo"), s("3")])),
                Arg::Node(node("lt", vec![s("price"), f(10.0)])),
            ]
        ))
    );
    assert_eq!(
        root.sort(),
        &[Sort {
            field: "price".to_string(),
            descending: false
        }]
    );
    assert_eq!(root.limit(), Some(10));
    assert_eq!(root.offset(), Some(20));
}

#[test]
fn test_simple_equal_query() {
    let root = parser().parse("foo=42&price=10").unwrap();
    assert_eq!(
        root.node,
        Some(node(
            "AND",
            vec![
                Arg::Node(node("eq", vec![s("foo"), s("42")])),
                Arg::Node(node("eq", vec![s("price"), f(10.0)])),
            ]
        ))
    );
}

#[test]
fn test_unknown_field() {
    let err = parser().parse("unknown=1").unwrap_err();
    assert_eq!(err, RqlError::Field(FieldError::NotFilterable("unknown".to_string())));
}

#[test]
fn test_filterable_int_slice_fails_construction() {
    let resource = Resource::new("User")
        .field(FieldDef::new("Ids", FieldType::Slice(Box::new(FieldType::I64))).rql("filter"));
    assert!(matches!(
        Parser::with_schema(Config::default(), &resource),
        Err(SchemaError::UnsupportedType { .. })
    ));
}

#[test]
fn test_three_syntaxes_validate_the_same() {
    let expected = Some(node("eq", vec![s("price"), f(1.0)]));
    for query in ["eq(price,1)", "price=1", "price=eq=1"] {
        assert_eq!(parser().parse(query).unwrap().node, expected, "query: {}", query);
    }
}

// ============================================================================
// Field Checks
// ============================================================================

#[test]
fn test_nested_special_op_is_rejected_whatever_its_siblings() {
    for query in ["(limit(10)&foo=1)&sort(price)", "(limit(10)&foo=1)&price=2"] {
        assert_eq!(
            parser().parse(query).unwrap_err(),
            RqlError::Field(FieldError::NotFilterable("10".to_string())),
            "query: {}",
            query
        );
    }
}

#[test]
fn test_non_filterable_field() {
    assert!(matches!(
        parser().parse("secret=x"),
        Err(RqlError::Field(FieldError::NotFilterable(_)))
    ));
}

#[test]
fn test_replacewith_renames_field() {
    let root = parser().parse("color=red").unwrap();
    assert_eq!(root.node, Some(node("eq", vec![s("colour"), s("red")])));
}

#[test]
fn test_value_without_field() {
    assert_eq!(
        parser().parse("and(eq(foo,1),bar)").unwrap_err(),
        RqlError::Field(FieldError::NoField("bar".to_string()))
    );
}

#[test]
fn test_conversion_failure_names_field_and_literal() {
    let err = parser().parse("price=cheap").unwrap_err();
    match err {
        RqlError::Field(FieldError::Conversion { field, value, .. }) => {
            assert_eq!(field, "price");
            assert_eq!(value, "cheap");
        }
        other => panic!("expected a conversion error, got {:?}", other),
    }
}

#[test]
fn test_integer_bounds() {
    assert!(parser().parse("rank=127").is_ok());
    assert!(parser().parse("rank=-128").is_ok());
    assert!(parser().parse("rank=128").is_err());
    assert!(parser().parse("stock=65535").is_ok());
    assert!(parser().parse("stock=-1").is_err());
    assert!(parser().parse("stock=1.5").is_err());
}

#[test]
fn test_typed_values() {
    let root = parser().parse("active=true&cost=19.99&stock=7").unwrap();
    let args: Vec<_> = root
        .node
        .unwrap()
        .args
        .into_iter()
        .map(|a| match a {
            Arg::Node(n) => n.args[1].clone(),
            other => other,
        })
        .collect();
    assert_eq!(
        args,
        vec![
            Arg::Value(Value::Bool(true)),
            Arg::Value(Value::Decimal(Decimal::new(1999, 2))),
            Arg::Value(Value::Uint(7)),
        ]
    );
}

#[test]
fn test_time_field_uses_layout() {
    let root = parser().parse("released=gt=2021-06-30").unwrap();
    let node = root.node.unwrap();
    match &node.args[1] {
        Arg::Value(Value::Time(t)) => {
            assert_eq!((t.year(), t.month(), t.day()), (2021, 6, 30));
            assert_eq!(t.hour(), 0);
        }
        other => panic!("expected a time value, got {:?}", other),
    }
    assert!(parser().parse("released=2021-06-30T00:00:00Z").is_err());
}

#[test]
fn test_nullable_field_accepts_null() {
    let root = parser().parse("discount=null").unwrap();
    assert_eq!(root.node, Some(node("eq", vec![s("discount"), Arg::Value(Value::Null)])));
    assert!(parser().parse("price=null").is_err());
}

#[test]
fn test_group_members_use_parent_field() {
    let root = parser().parse("in(color,[red,blue])").unwrap();
    assert_eq!(
        root.node,
        Some(node(
            "in",
            vec![
                s("colour"),
                Arg::Node(node("group", vec![s("colour"), s("red"), s("blue")])),
            ]
        ))
    );

    let root = parser().parse("in(price,[1,2])").unwrap();
    assert_eq!(
        root.node.unwrap().args[1],
        Arg::Node(node("group", vec![s("price"), f(1.0), f(2.0)]))
    );
    assert!(parser().parse("in(price,[1,x])").is_err());
}

#[test]
fn test_string_slice_field() {
    let root = parser().parse("tags=in=(new,sale)").unwrap();
    assert_eq!(root.node, Some(node("in", vec![s("tags"), s("new"), s("sale")])));
}

// ============================================================================
// Special Operators
// ============================================================================

#[test]
fn test_default_limit_with_schema() {
    let root = parser().parse("foo=1").unwrap();
    assert_eq!(root.limit(), Some(25));
    assert_eq!(root.offset(), None);
}

#[test]
fn test_no_default_limit_without_schema() {
    assert_eq!(Parser::new().parse("foo=1").unwrap().limit(), None);
}

#[test]
fn test_limit_range() {
    assert!(parser().parse("limit(0)").is_ok());
    assert!(parser().parse("limit(100)").is_ok());
    assert_eq!(
        parser().parse("limit(101)").unwrap_err(),
        RqlError::Range(RangeError::LimitTooLarge { limit: 101, max: 100 })
    );
    assert_eq!(
        parser().parse("limit(-1)").unwrap_err(),
        RqlError::Range(RangeError::NegativeLimit)
    );
    assert!(matches!(
        parser().parse("limit(ten)"),
        Err(RqlError::Range(RangeError::InvalidLimit(_)))
    ));
}

#[test]
fn test_limit_max_from_config() {
    let parser = Parser::with_config(Config::default().with_limit_max_value(1000));
    assert_eq!(parser.parse("limit(500)").unwrap().limit(), Some(500));
    assert!(Parser::new().parse("limit(500)").is_err());
}

#[test]
fn test_offset_range() {
    assert_eq!(parser().parse("offset(5)").unwrap().offset(), Some(5));
    assert_eq!(
        parser().parse("offset(-1)").unwrap_err(),
        RqlError::Range(RangeError::NegativeOffset)
    );
    assert!(matches!(
        parser().parse("limit(10,x)"),
        Err(RqlError::Range(RangeError::InvalidOffset(_)))
    ));
}

#[test]
fn test_sort_fields_must_be_sortable() {
    assert!(parser().parse("sort(-rank,+released)").is_ok());
    assert_eq!(
        parser().parse("sort(foo)").unwrap_err(),
        RqlError::Field(FieldError::NotSortable("foo".to_string()))
    );
    assert!(Parser::new().parse("sort(anything)").is_ok());
}

#[test]
fn test_select_fields_must_exist() {
    let root = parser().parse("select(foo,color)").unwrap();
    assert_eq!(root.select(), &["foo".to_string(), "colour".to_string()]);
    assert_eq!(
        parser().parse("select(nope)").unwrap_err(),
        RqlError::Field(FieldError::NotSelectable("nope".to_string()))
    );
}

#[test]
fn test_sort_field_is_renamed() {
    let resource = Resource::new("User")
        .field(FieldDef::new("Name", FieldType::String).rql("sort,replacewith=user_name"));
    let parser = Parser::with_schema(Config::default(), &resource).unwrap();
    let root = parser.parse("sort(-name)").unwrap();
    assert_eq!(root.sort()[0].field, "user_name");
    assert!(root.sort()[0].descending);
}

#[test]
fn test_parser_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Parser>();

    let parser = std::sync::Arc::new(parser());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = std::sync::Arc::clone(&parser);
            std::thread::spawn(move || parser.parse(&format!("stock={}", i)).is_ok())
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap());
    }
}
