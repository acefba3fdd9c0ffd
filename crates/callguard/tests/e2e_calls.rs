//! End-to-end tests for guarded calls
//!
//! Tests the full lifecycle: declaration -> locked contract -> checked
//! invocation, through the public surface only.

use callguard::{
    decorate, CallArgs, CallError, FnSignature, Param, TypeExpr, ValidationError, Value, ValueType,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("callguard=debug")),
        )
        .with_test_writer()
        .try_init();
}

fn as_int(value: &Value) -> i64 {
    match value {
        Value::Int(v) => *v,
        other => panic!("expected int, got {other}"),
    }
}

/// Positional-if-present, else keyword - hosts do their own binding.
fn bound<'a>(args: &'a CallArgs, index: usize, name: &str) -> Option<&'a Value> {
    args.positional_args()
        .get(index)
        .or_else(|| args.keyword_args().get(name))
}

// =============================================================================
// BASIC ARGUMENT AND RETURN CHECKING
// =============================================================================

/// add(a: int, b: int) -> int
#[test]
fn test_add_accepts_ints_and_rejects_strings() {
    init_tracing();
    let sig = FnSignature::new("add")
        .param(Param::typed("a", ValueType::Int))
        .param(Param::typed("b", ValueType::Int))
        .returns(ValueType::Int);
    let add = decorate(&sig, |args| {
        let a = as_int(&args.positional_args()[0]);
        let b = as_int(&args.positional_args()[1]);
        Ok(Value::from(a + b))
    })
    .unwrap();

    assert_eq!(add.call(CallArgs::new().arg(2).arg(3)).unwrap(), Value::from(5));

    let err = add.call(CallArgs::new().arg(2).arg("3")).unwrap_err();
    match err {
        CallError::Rejected(ValidationError::Argument { parameter, .. }) => {
            assert_eq!(parameter, "b");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// double(x: int | float) -> int | float
#[test]
fn test_union_parameter_accepts_each_member() {
    let number = TypeExpr::union([ValueType::Int.into(), ValueType::Float.into()]);
    let sig = FnSignature::new("double")
        .param(Param::typed("x", number.clone()))
        .returns(number);
    let double = decorate(&sig, |args| {
        Ok(match &args.positional_args()[0] {
            Value::Int(v) => Value::from(v * 2),
            Value::Float(v) => Value::from(v * 2.0),
            other => panic!("unreachable under contract: {other}"),
        })
    })
    .unwrap();

    assert_eq!(double.call(CallArgs::new().arg(2)).unwrap(), Value::from(4));
    assert_eq!(double.call(CallArgs::new().arg(2.5)).unwrap(), Value::from(5.0));

    let err = double.call(CallArgs::new().arg("s")).unwrap_err();
    assert!(matches!(
        err,
        CallError::Rejected(ValidationError::Argument { .. })
    ));
}

// =============================================================================
// KEYWORD VARIATIONS
// =============================================================================

/// foo(a: int, aa, b: int, c: int, *, d: str | null) -> int
///
/// The unannotated `aa` accepts anything; everything named can also be
/// supplied by keyword, in any order.
fn foo() -> callguard::Guarded<impl Fn(&CallArgs) -> anyhow::Result<Value>> {
    let sig = FnSignature::new("foo")
        .param(Param::typed("a", ValueType::Int))
        .param(Param::untyped("aa"))
        .param(Param::typed("b", ValueType::Int))
        .param(Param::typed("c", ValueType::Int))
        .param(Param::keyword_only("d", TypeExpr::optional(ValueType::Str.into())))
        .returns(ValueType::Int);
    decorate(&sig, |args| {
        let mut float_sum = 0.0;
        let mut saw_float = false;
        let mut int_sum = 0i64;
        for slot in [(0, "a"), (1, "aa"), (2, "b"), (3, "c")] {
            match bound(args, slot.0, slot.1) {
                Some(Value::Int(v)) => int_sum += v,
                Some(Value::Float(v)) => {
                    saw_float = true;
                    float_sum += v;
                }
                _ => {}
            }
        }
        let d = match args.keyword_args().get("d") {
            Some(Value::Str(s)) => s.parse::<i64>().unwrap_or(0),
            _ => 0,
        };
        if saw_float {
            Ok(Value::from(float_sum + int_sum as f64 + d as f64))
        } else {
            Ok(Value::from(int_sum + d))
        }
    })
    .unwrap()
}

#[test]
fn test_named_parameters_accept_keywords_in_any_order() {
    let foo = foo();
    let expected = Value::from(10);
    let calls = [
        CallArgs::new().arg(0).arg(1).arg(2).arg(3).keyword("d", "4"),
        CallArgs::new().arg(0).arg(1).arg(2).keyword("c", 3).keyword("d", "4"),
        CallArgs::new().arg(0).arg(1).keyword("b", 2).keyword("c", 3).keyword("d", "4"),
        CallArgs::new().arg(0).arg(1).keyword("c", 3).keyword("b", 2).keyword("d", "4"),
    ];
    for call in calls {
        assert_eq!(foo.call(call).unwrap(), expected);
    }
}

#[test]
fn test_keyword_only_mismatch_is_a_keyword_violation() {
    let foo = foo();
    let err = foo
        .call(CallArgs::new().arg(0).arg(1).arg(2).arg(3).keyword("d", 0))
        .unwrap_err();
    match err {
        CallError::Rejected(ValidationError::Keyword { parameter, .. }) => {
            assert_eq!(parameter, "d");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_keyword_only_accepts_null_member() {
    let foo = foo();
    let result = foo
        .call(CallArgs::new().arg(0).arg(1).arg(2).arg(3).keyword("d", Value::Null))
        .unwrap();
    assert_eq!(result, Value::from(6));
}

#[test]
fn test_unannotated_parameter_never_rejects() {
    let foo = foo();
    for aa in [Value::from("str"), Value::Null, Value::List(vec![])] {
        let call = CallArgs::new()
            .arg(0)
            .arg(aa)
            .arg(2)
            .arg(3)
            .keyword("d", "4");
        assert_eq!(foo.call(call).unwrap(), Value::from(9));
    }
}

#[test]
fn test_unknown_keyword_is_rejected_with_its_name() {
    let foo = foo();
    let err = foo
        .call(CallArgs::new().arg(0).arg(1).arg(2).arg(3).keyword("q", 1))
        .unwrap_err();
    assert!(matches!(
        err,
        CallError::Rejected(ValidationError::UnknownKeyword { parameter, .. }) if parameter == "q"
    ));
}

/// An unannotated float flows through the body and trips the declared
/// return type instead.
#[test]
fn test_return_violation_surfaces_after_the_body() {
    let foo = foo();
    let err = foo
        .call(CallArgs::new().arg(0).arg(5.0).arg(2).keyword("d", "0"))
        .unwrap_err();
    assert!(matches!(
        err,
        CallError::Rejected(ValidationError::Return { .. })
    ));
}

// =============================================================================
// SHALLOW CONTAINER CHECKING
// =============================================================================

/// find_max(nums: list[int]) -> int
///
/// The declared element type is not enforced: only the container is.
#[test]
fn test_container_contents_are_not_checked() {
    let sig = FnSignature::new("find_max")
        .param(Param::typed(
            "nums",
            TypeExpr::generic("list", vec![ValueType::Int.into()]),
        ))
        .returns(ValueType::Int);
    let find_max = decorate(&sig, |args| {
        let Value::List(items) = &args.positional_args()[0] else {
            unreachable!("contract guarantees a list");
        };
        let max = items
            .iter()
            .filter_map(|v| match v {
                Value::Int(i) => Some(*i),
                _ => None,
            })
            .max()
            .unwrap_or(0);
        Ok(Value::from(max))
    })
    .unwrap();

    let clean = Value::List(vec![7.into(), 2.into(), 5.into(), 9.into(), 3.into()]);
    assert_eq!(find_max.call(CallArgs::new().arg(clean)).unwrap(), Value::from(9));

    // Mixed element types still pass the shallow check.
    let mixed = Value::List(vec![7.into(), 2.into(), Value::from("9000")]);
    assert_eq!(find_max.call(CallArgs::new().arg(mixed)).unwrap(), Value::from(7));

    // A non-list does not.
    let err = find_max.call(CallArgs::new().arg(7)).unwrap_err();
    assert!(matches!(
        err,
        CallError::Rejected(ValidationError::Argument { .. })
    ));
}

// =============================================================================
// NOMINAL RECORD CLASSES
// =============================================================================

/// scale_point(point: Point, factor: int | float)
#[test]
fn test_record_classes_in_declarations() {
    let number = TypeExpr::union([ValueType::Int.into(), ValueType::Float.into()]);
    let sig = FnSignature::new("scale_point")
        .param(Param::typed("point", TypeExpr::class("Point")))
        .param(Param::typed("factor", number));
    let scale_point = decorate(&sig, |args| Ok(args.positional_args()[0].clone())).unwrap();

    let point = Value::record(
        "Point",
        [
            ("x".to_string(), Value::from(42.0)),
            ("y".to_string(), Value::from(1701.0)),
        ],
    );
    assert!(scale_point
        .call(CallArgs::new().arg(point.clone()).arg(3.14))
        .is_ok());
    assert!(scale_point.call(CallArgs::new().arg(point).arg(3)).is_ok());

    // A list is not a Point.
    let err = scale_point
        .call(CallArgs::new().arg(Value::List(vec![1.into(), 5.into()])).arg(7))
        .unwrap_err();
    assert!(matches!(
        err,
        CallError::Rejected(ValidationError::Argument { .. })
    ));

    // Neither is a record of a different class.
    let vector = Value::record("Vector", []);
    let err = scale_point.call(CallArgs::new().arg(vector).arg(7)).unwrap_err();
    assert!(matches!(
        err,
        CallError::Rejected(ValidationError::Argument { .. })
    ));
}

// =============================================================================
// DECORATION FAILURES
// =============================================================================

/// Unsupported generics are refused when the contract is locked, before
/// any call happens.
#[test]
fn test_unsupported_generic_fails_at_decoration() {
    let sig = FnSignature::new("g").param(Param::typed(
        "items",
        TypeExpr::generic("frozenset", vec![ValueType::Int.into()]),
    ));
    let result = decorate(&sig, |_| Ok(Value::Null));
    let err = result.err().expect("decoration must fail");
    assert!(err.to_string().contains("frozenset[int]"));
}
