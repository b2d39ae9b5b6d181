//! Literal input -> literal output scenarios (spec.md §8).

use tsfmt::{fstring, Argument, IntoArgument};

#[test]
fn repeat_group_between_two_leaves() {
    let args = [Argument::Signed(1), Argument::Str("two")];
    assert_eq!(fstring("%5d %2{**%} %s", &args).unwrap(), "    1 **** two");
}

#[test]
fn container_iteration_has_trailing_separator_by_default() {
    let values = vec![9i32, 8, 7, 6];
    let args = [values.to_argument()];
    assert_eq!(fstring("%[v=%d, %]", &args).unwrap(), "v=9, v=8, v=7, v=6, ");
}

#[test]
fn container_alternative_flag_suppresses_the_trailing_separator() {
    let values = vec![9i32, 8, 7, 6];
    let args = [values.to_argument()];
    assert_eq!(fstring("{ %#[v=%d, %] }", &args).unwrap(), "{ v=9, v=8, v=7, v=6 }");
}

#[test]
fn tuple_destructuring_formats_each_field_with_its_own_spec() {
    let tuple = (1i32, 2.3f64, "four");
    let args = [tuple.to_argument()];
    assert_eq!(fstring("%<%5d %5.2f %10s%>", &args).unwrap(), "    1  2.30       four");
}

#[test]
fn tab_stops_interleave_with_plain_leaves() {
    let args = [Argument::Signed(1), Argument::Signed(1234), Argument::Signed(123456)];
    assert_eq!(fstring("%d%5T%d%5T%d", &args).unwrap(), "1    1234 123456");
}

#[test]
fn empty_repeat_body_still_repeats_the_closer_prefix() {
    assert_eq!(fstring("%72{-%}", &[]).unwrap(), "-".repeat(72));
}
