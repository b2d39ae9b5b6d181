//! `%n`: write the current output length back to the caller
//! (spec.md §4.6, Open Question 1 in DESIGN.md).
//!
//! `original_source/tsio.h`'s `printfDetail(T* value)` writes through a
//! raw pointer picked by the template's `case 'n'` branch. This crate
//! keeps the same idea type-safe: the argument must be a
//! [`crate::value::Argument::WriteBack`] cell, never a bare pointer, so
//! there is no unchecked write.

use crate::error::FormatError;
use crate::value::Argument;

pub fn format(arg: &Argument<'_>, length_so_far: usize, source: &str, offset: usize) -> Result<(), FormatError> {
    match arg {
        Argument::WriteBack(cell) => {
            cell.set(length_so_far as i64);
            Ok(())
        }
        other => Err(FormatError::argument_shape(
            source,
            offset,
            format!(
                "%n requires a writeback argument, found a {}",
                other.type_name()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn writes_length_into_cell() {
        let cell = Cell::new(-1i64);
        let arg = Argument::WriteBack(&cell);
        format(&arg, 12, "%n", 0).unwrap();
        assert_eq!(cell.get(), 12);
    }

    #[test]
    fn rejects_non_writeback_argument() {
        let arg = Argument::Signed(3);
        let err = format(&arg, 5, "%n", 0).unwrap_err();
        assert_eq!(err.kind, crate::error::FormatErrorKind::ArgumentShape);
    }
}
