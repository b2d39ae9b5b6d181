//! Negative cases: every one of spec.md §8's "must error" scenarios,
//! plus a check that the caller's destination still holds whatever was
//! produced before the failing directive (spec.md §7).

use tsfmt::{fstring, sprintf, Argument, FormatErrorKind};

#[test]
fn tuple_destructure_on_a_non_tuple_argument_is_an_argument_shape_error() {
    let err = fstring("%<%s%>", &[Argument::Str("not a tuple")]).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::ArgumentShape);
}

#[test]
fn mismatched_closer_is_a_parse_error() {
    let err = fstring("%[ %d %}", &[Argument::Signed(1)]).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::Parse);
}

#[test]
fn dynamic_width_with_only_one_argument_is_an_arity_error() {
    // The `*` consumes the sole argument for the width; nothing is left
    // for the `%d` itself.
    let err = fstring("%*d", &[Argument::Signed(5)]).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::Arity);
}

#[test]
fn mixing_sequential_then_positional_is_a_scope_error() {
    let err = fstring("%d %1$d", &[Argument::Signed(1), Argument::Signed(2)]).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::Scope);
}

#[test]
fn positional_index_out_of_range_is_an_arity_error() {
    let err = fstring("%2$d %1$d", &[Argument::Signed(1)]).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::Arity);
}

#[test]
fn sprintf_retains_output_produced_before_the_failing_directive() {
    let mut dst = String::new();
    let err = sprintf(&mut dst, "a=%d b=%d", &[Argument::Signed(1)]).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::Arity);
    assert_eq!(dst, "a=1 b=");
}

#[test]
fn unterminated_structural_group_is_a_parse_error() {
    let err = fstring("%{%d", &[Argument::Signed(1)]).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::Parse);
}

#[test]
fn float_specifier_on_a_string_argument_is_an_argument_shape_error() {
    let err = fstring("%f", &[Argument::Str("nope")]).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::ArgumentShape);
}

#[test]
fn n_used_outside_any_iteration_is_a_scope_error() {
    let err = fstring("%N", &[]).unwrap_err();
    assert_eq!(err.kind, FormatErrorKind::Scope);
}
