//! Floating-point conversions: `e E f F g G a A` (spec.md §4.6).
//!
//! Digit generation is delegated to the host C runtime's `snprintf`,
//! exactly as `original_source/tsio.cpp`'s `printfDetail(double)` does:
//! build a minimal inner format string, let the platform's float
//! formatter produce the digits, then apply this engine's own
//! sign/fill/justify rules on top rather than trusting `snprintf`'s
//! own width handling.

use std::ffi::CString;

use crate::buffer::Buffer;
use crate::error::FormatError;
use crate::kernels::{effective_numeric_fill, emit_numeric};
use crate::spec::{Flags, FormatSpec};
use crate::value::Argument;

const SCRATCH_LEN: usize = 1536;
const MAX_PRECISION: u32 = 1100;

fn as_f64(arg: &Argument<'_>, source: &str, offset: usize) -> Result<f64, FormatError> {
    match arg {
        Argument::Float(v) => Ok(*v),
        Argument::Signed(v) => Ok(*v as f64),
        Argument::Unsigned(v) => Ok(*v as f64),
        other => Err(FormatError::argument_shape(
            source,
            offset,
            format!("expected a floating-point argument, found a {}", other.type_name()),
        )),
    }
}

pub fn format(
    spec: &FormatSpec,
    arg: &Argument<'_>,
    width: usize,
    source: &str,
    offset: usize,
    buf: &mut Buffer,
) -> Result<(), FormatError> {
    let value = as_f64(arg, source, offset)?;
    let precision_given = spec.flags.contains(Flags::PRECISION_GIVEN);
    // A precision-driven numeric fill demotes to space fill, the same
    // rule the integer kernel applies (Open Question 2, DESIGN.md).
    let numeric_fill = effective_numeric_fill(spec);

    let mut inner = String::from("%");
    if spec.flags.contains(Flags::ALTERNATIVE) {
        inner.push('#');
    }
    if spec.flags.contains(Flags::PLUS_IF_POSITIVE) {
        inner.push('+');
    } else if spec.flags.contains(Flags::SPACE_IF_POSITIVE) {
        inner.push(' ');
    }
    if precision_given {
        inner.push('.');
        inner.push_str(&spec.precision.min(MAX_PRECISION).to_string());
    }
    inner.push(spec.specifier as char);

    let c_format = CString::new(inner).expect("inner float format is ASCII and NUL-free by construction");
    let mut scratch = [0u8; SCRATCH_LEN];

    // SAFETY: `c_format` is a valid NUL-terminated C string matching a
    // single `%...` float conversion, `scratch` is large enough for any
    // double at the clamped precision above, and `value` is the lone
    // vararg `snprintf` expects for that conversion.
    let written = unsafe {
        libc::snprintf(
            scratch.as_mut_ptr() as *mut libc::c_char,
            scratch.len(),
            c_format.as_ptr(),
            value,
        )
    };

    let len = written.max(0) as usize;
    let len = len.min(scratch.len() - 1);
    let rendered = &scratch[..len];

    let (sign, rest) = match rendered.first() {
        Some(b'-') => (Some(b'-'), &rendered[1..]),
        Some(b'+') => (Some(b'+'), &rendered[1..]),
        Some(b' ') => (Some(b' '), &rendered[1..]),
        _ => (None, rendered),
    };

    emit_numeric(buf, spec, width, sign, &[], rest, numeric_fill);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{parse_spec, Scanner};

    fn spec_for(text: &str) -> FormatSpec {
        let bytes = text.as_bytes();
        let mut scanner = Scanner::new(bytes);
        parse_spec(&mut scanner, text).unwrap()
    }

    fn run(text: &str, value: f64) -> String {
        let spec = spec_for(text);
        let width = spec.width as usize;
        let mut buf = Buffer::new();
        format(&spec, &Argument::Float(value), width, text, 0, &mut buf).unwrap();
        buf.as_bytes().iter().map(|&b| b as char).collect()
    }

    #[test]
    fn fixed_precision() {
        assert_eq!(run(".2f", 3.14159), "3.14");
    }

    #[test]
    fn negative_zero_padded_keeps_sign_before_fill() {
        // No precision given, so zero-fill is not demoted.
        assert_eq!(run("012f", -3.5), "-0003.500000");
    }

    #[test]
    fn precision_given_demotes_zero_fill() {
        assert_eq!(run("010.2f", 3.5), "      3.50");
    }

    #[test]
    fn plus_sign_on_positive() {
        assert_eq!(run("+.1f", 2.0), "+2.0");
    }
}
