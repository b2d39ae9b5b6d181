//! Integer conversions: `d i o u x X b B` (spec.md §4.6).
//!
//! The base-10 path ports `original_source/tsio.cpp`'s `outputNumber`
//! digit-pair table so two digits are peeled off per division instead
//! of one; the other radices fall back to a plain per-digit loop since
//! the original only special-cases decimal.

use crate::buffer::Buffer;
use crate::error::FormatError;
use crate::kernels::{effective_numeric_fill, emit_numeric};
use crate::spec::{Flags, FormatSpec};
use crate::value::Argument;

const DIGIT_PAIRS: &[u8; 200] = b"00010203040506070809\
10111213141516171819\
20212223242526272829\
30313233343536373839\
40414243444546474849\
50515253545556575859\
60616263646566676869\
70717273747576777879\
80818283848586878889\
90919293949596979899";

fn as_i64(arg: &Argument<'_>, source: &str, offset: usize) -> Result<i64, FormatError> {
    match arg {
        Argument::Signed(v) => Ok(*v),
        Argument::Unsigned(v) => Ok(*v as i64),
        Argument::Bool(b) => Ok(*b as i64),
        Argument::Char(c) => Ok(*c as i64),
        other => Err(FormatError::argument_shape(
            source,
            offset,
            format!("expected an integer argument, found a {}", other.type_name()),
        )),
    }
}

fn as_u64(arg: &Argument<'_>, source: &str, offset: usize) -> Result<u64, FormatError> {
    match arg {
        Argument::Unsigned(v) => Ok(*v),
        Argument::Signed(v) => Ok(*v as u64),
        Argument::Bool(b) => Ok(*b as u64),
        Argument::Char(c) => Ok(*c as u64),
        other => Err(FormatError::argument_shape(
            source,
            offset,
            format!("expected an integer argument, found a {}", other.type_name()),
        )),
    }
}

fn decimal_digits(mut value: u64) -> Vec<u8> {
    if value == 0 {
        return vec![b'0'];
    }

    let mut out = Vec::with_capacity(20);

    while value >= 100 {
        let pair = (value % 100) as usize;
        out.push(DIGIT_PAIRS[pair * 2 + 1]);
        out.push(DIGIT_PAIRS[pair * 2]);
        value /= 100;
    }

    if value >= 10 {
        let pair = value as usize;
        out.push(DIGIT_PAIRS[pair * 2 + 1]);
        out.push(DIGIT_PAIRS[pair * 2]);
    } else {
        out.push(b'0' + value as u8);
    }

    out.reverse();
    out
}

fn radix_digits(mut value: u64, radix: u64, upcase: bool) -> Vec<u8> {
    if value == 0 {
        return vec![b'0'];
    }

    let table: &[u8] = if upcase {
        b"0123456789ABCDEF"
    } else {
        b"0123456789abcdef"
    };

    let mut out = Vec::new();
    while value > 0 {
        out.push(table[(value % radix) as usize]);
        value /= radix;
    }
    out.reverse();
    out
}

fn apply_precision(mut digits: Vec<u8>, precision_given: bool, precision: u32, value_is_zero: bool) -> Vec<u8> {
    if precision_given && precision == 0 && value_is_zero {
        return Vec::new();
    }

    if precision_given && (precision as usize) > digits.len() {
        let pad = precision as usize - digits.len();
        let mut padded = vec![b'0'; pad];
        padded.append(&mut digits);
        return padded;
    }

    digits
}

pub fn format(
    spec: &FormatSpec,
    arg: &Argument<'_>,
    width: usize,
    source: &str,
    offset: usize,
    buf: &mut Buffer,
) -> Result<(), FormatError> {
    let precision_given = spec.flags.contains(Flags::PRECISION_GIVEN);
    let numeric_fill = effective_numeric_fill(spec);

    match spec.specifier {
        b'd' | b'i' => {
            let value = as_i64(arg, source, offset)?;
            let magnitude = value.unsigned_abs();
            let digits = apply_precision(decimal_digits(magnitude), precision_given, spec.precision, magnitude == 0);

            let sign = if value < 0 {
                Some(b'-')
            } else if spec.flags.contains(Flags::PLUS_IF_POSITIVE) {
                Some(b'+')
            } else if spec.flags.contains(Flags::SPACE_IF_POSITIVE) {
                Some(b' ')
            } else {
                None
            };

            emit_numeric(buf, spec, width, sign, &[], &digits, numeric_fill);
        }
        b'u' => {
            let value = as_u64(arg, source, offset)?;
            let digits = apply_precision(decimal_digits(value), precision_given, spec.precision, value == 0);
            emit_numeric(buf, spec, width, None, &[], &digits, numeric_fill);
        }
        b'o' => {
            let value = as_u64(arg, source, offset)?;
            let mut digits = apply_precision(radix_digits(value, 8, false), precision_given, spec.precision, value == 0);
            if spec.flags.contains(Flags::ALTERNATIVE) && digits.first() != Some(&b'0') {
                digits.insert(0, b'0');
            }
            emit_numeric(buf, spec, width, None, &[], &digits, numeric_fill);
        }
        b'x' | b'X' => {
            let value = as_u64(arg, source, offset)?;
            let upcase = spec.specifier == b'X';
            let digits = apply_precision(radix_digits(value, 16, upcase), precision_given, spec.precision, value == 0);
            let prefix: &[u8] = if spec.flags.contains(Flags::ALTERNATIVE) && value != 0 {
                if upcase {
                    b"0X"
                } else {
                    b"0x"
                }
            } else {
                b""
            };
            emit_numeric(buf, spec, width, None, prefix, &digits, numeric_fill);
        }
        b'b' | b'B' => {
            let value = as_u64(arg, source, offset)?;
            let digits = apply_precision(radix_digits(value, 2, false), precision_given, spec.precision, value == 0);
            let prefix: &[u8] = if spec.flags.contains(Flags::ALTERNATIVE) && value != 0 {
                if spec.specifier == b'B' {
                    b"0B"
                } else {
                    b"0b"
                }
            } else {
                b""
            };
            emit_numeric(buf, spec, width, None, prefix, &digits, numeric_fill);
        }
        other => unreachable!("kernels::integer dispatched for non-integer specifier '{}'", other as char),
    }

    Ok(())
}

/// `%p`: forces base-16 on the pointer's bit pattern, `#` adds the `0x`
/// prefix the same way it does for `%x` (spec.md §4.6).
pub fn format_pointer(spec: &FormatSpec, addr: usize, width: usize, buf: &mut Buffer) {
    let value = addr as u64;
    let digits = radix_digits(value, 16, false);
    let prefix: &[u8] = if spec.flags.contains(Flags::ALTERNATIVE) && value != 0 {
        b"0x"
    } else {
        b""
    };
    let numeric_fill = effective_numeric_fill(spec);
    emit_numeric(buf, spec, width, None, prefix, &digits, numeric_fill);
}
