//! Extra structural/kernel fixtures ported from
//! `original_source/test/tsioTest.cpp`'s `extensions()`/`testPositional()`
//! helpers: binary radix, element-wise nice-mode escaping over a
//! container, center-justify with a custom fill character, and a
//! positional directive with a dynamic, also-positional width.

use tsfmt::{fstring, Argument, IntoArgument};

#[test]
fn binary_with_alternate_form_prefix() {
    assert_eq!(fstring("%#b", &[Argument::Unsigned(5)]).unwrap(), "0b101");
    assert_eq!(fstring("%#B", &[Argument::Unsigned(5)]).unwrap(), "0B101");
}

#[test]
fn binary_without_alternate_form_has_no_prefix() {
    assert_eq!(fstring("%b", &[Argument::Unsigned(5)]).unwrap(), "101");
}

#[test]
fn nice_char_escaping_applied_element_wise_over_a_container() {
    let values = vec!['a', '\n', 'b'];
    let args = [values.to_argument()];
    assert_eq!(fstring("%[%C%]", &args).unwrap(), "a.b");
    assert_eq!(fstring("%[%#C%]", &args).unwrap(), "a\\nb");
}

#[test]
fn center_justify_with_a_custom_alfa_fill_character() {
    assert_eq!(fstring("%\"*^10s", &[Argument::Str("hi")]).unwrap(), "****hi****");
}

#[test]
fn positional_directive_with_a_positional_dynamic_width() {
    // arg 1 supplies the width, arg 2 the value being formatted.
    let args = [Argument::Unsigned(6), Argument::Signed(42)];
    assert_eq!(fstring("%2$*1$d", &args).unwrap(), "    42");
}

#[test]
fn repeat_group_dynamic_count_reads_one_body_argument_per_iteration() {
    // Unlike `%[...%]`, the repeat body is not scoped to a single
    // argument: each pass of `%s` below consumes the next sequential one.
    let args = [
        Argument::Unsigned(3),
        Argument::Str("x"),
        Argument::Str("x"),
        Argument::Str("x"),
    ];
    assert_eq!(fstring("%*{%s%}", &args).unwrap(), "xxx");
}
