//! Text conversions: `s S c C` (spec.md §4.6).
//!
//! The nice/escape mode (`S`, `C`) ports the byte-escaping table from
//! `original_source/tsio.cpp`'s `outputString`, exercised there over a
//! full 256-byte array in `test/tsioTest.cpp`'s `extensions()`.

use crate::buffer::Buffer;
use crate::error::FormatError;
use crate::kernels::{emit_text, float, integer};
use crate::spec::{Flags, FormatSpec};
use crate::value::Argument;

fn string_bytes<'a>(arg: &'a Argument<'_>, source: &str, offset: usize) -> Result<&'a [u8], FormatError> {
    match arg {
        Argument::Str(s) => Ok(s.as_bytes()),
        Argument::Bytes(b) => Ok(b),
        Argument::Bool(true) => Ok(b"true"),
        Argument::Bool(false) => Ok(b"false"),
        other => Err(FormatError::argument_shape(
            source,
            offset,
            format!("expected a string argument, found a {}", other.type_name()),
        )),
    }
}

fn char_bytes(arg: &Argument<'_>, source: &str, offset: usize) -> Result<Vec<u8>, FormatError> {
    match arg {
        Argument::Char(c) => {
            let mut scratch = [0u8; 4];
            Ok(c.encode_utf8(&mut scratch).as_bytes().to_vec())
        }
        Argument::Signed(v) => Ok(vec![*v as u8]),
        Argument::Unsigned(v) => Ok(vec![*v as u8]),
        other => Err(FormatError::argument_shape(
            source,
            offset,
            format!("expected a char argument, found a {}", other.type_name()),
        )),
    }
}

/// Nice mode (spec.md §4.6/GLOSSARY): by default every non-printable
/// byte is replaced with `.`. The alternative flag switches to full
/// C-style backslash escapes, falling back to octal (not hex) for
/// anything without a short mnemonic.
fn nice_escape(bytes: &[u8], alternative: bool) -> Vec<u8> {
    if !alternative {
        return bytes
            .iter()
            .map(|&b| if (0x20..=0x7e).contains(&b) { b } else { b'.' })
            .collect();
    }

    let mut out = Vec::with_capacity(bytes.len());

    for &b in bytes {
        match b {
            0x07 => out.extend_from_slice(b"\\a"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0c => out.extend_from_slice(b"\\f"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x0b => out.extend_from_slice(b"\\v"),
            b'\\' => out.extend_from_slice(b"\\\\"),
            b'"' => out.extend_from_slice(b"\\\""),
            b'\'' => out.extend_from_slice(b"\\'"),
            0x20..=0x7e => out.push(b),
            _ => out.extend_from_slice(format!("\\{b:03o}").as_bytes()),
        }
    }

    out
}

/// `s`/`S` is polymorphic over numeric arguments (spec.md §4.6: "default
/// `g`" for floats): `printfDetail(double)` rebuilds the `FormatState`
/// with `formatSpecifier = 'g'` before re-dispatching, and the integral
/// overload falls through to the decimal path in `outputNumber`. Only
/// string/bytes/bool arguments are handled here directly.
pub fn format_string(
    spec: &FormatSpec,
    arg: &Argument<'_>,
    width: usize,
    source: &str,
    offset: usize,
    buf: &mut Buffer,
) -> Result<(), FormatError> {
    match arg {
        Argument::Float(_) => {
            let mut numeric_spec = spec.clone();
            numeric_spec.specifier = b'g';
            return float::format(&numeric_spec, arg, width, source, offset, buf);
        }
        Argument::Signed(_) | Argument::Unsigned(_) => {
            let mut numeric_spec = spec.clone();
            numeric_spec.specifier = b'd';
            return integer::format(&numeric_spec, arg, width, source, offset, buf);
        }
        _ => {}
    }

    let bytes = string_bytes(arg, source, offset)?;

    let truncated = if spec.flags.contains(Flags::PRECISION_GIVEN) {
        &bytes[..bytes.len().min(spec.precision as usize)]
    } else {
        bytes
    };

    let body = if spec.flags.contains(Flags::NICE) {
        nice_escape(truncated, spec.flags.contains(Flags::ALTERNATIVE))
    } else {
        truncated.to_vec()
    };

    emit_text(buf, spec, width, &body);
    Ok(())
}

pub fn format_char(
    spec: &FormatSpec,
    arg: &Argument<'_>,
    width: usize,
    source: &str,
    offset: usize,
    buf: &mut Buffer,
) -> Result<(), FormatError> {
    let bytes = char_bytes(arg, source, offset)?;

    let body = if spec.flags.contains(Flags::NICE) {
        nice_escape(&bytes, spec.flags.contains(Flags::ALTERNATIVE))
    } else {
        bytes
    };

    emit_text(buf, spec, width, &body);
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

    fn run_string(text: &str, value: &str) -> String {
        let spec = spec_for(text);
        let width = spec.width as usize;
        let mut buf = Buffer::new();
        format_string(&spec, &Argument::Str(value), width, text, 0, &mut buf).unwrap();
        buf.as_bytes().iter().map(|&b| b as char).collect()
    }

    #[test]
    fn plain_string_left_justified() {
        assert_eq!(run_string("-10s", "hi"), "hi        ");
    }

    #[test]
    fn precision_truncates() {
        assert_eq!(run_string(".3s", "hello"), "hel");
    }

    #[test]
    fn nice_mode_replaces_control_bytes_with_dots() {
        assert_eq!(run_string("S", "a\nb"), "a.b");
    }

    #[test]
    fn nice_mode_with_alternative_uses_octal_escapes() {
        assert_eq!(run_string("#S", "a\tb\x01"), "a\\tb\\001");
    }

    #[test]
    fn char_from_integer() {
        let spec = spec_for("c");
        let mut buf = Buffer::new();
        format_char(&spec, &Argument::Unsigned(65), 0, "c", 0, &mut buf).unwrap();
        assert_eq!(buf.as_bytes(), b"A");
    }

    #[test]
    fn bool_prints_as_true_or_false() {
        assert_eq!(run_string("s", "unused"), "unused");
        let spec = spec_for("s");
        let mut buf = Buffer::new();
        format_string(&spec, &Argument::Bool(true), 0, "s", 0, &mut buf).unwrap();
        assert_eq!(buf.as_bytes(), b"true");
    }

    #[test]
    fn s_on_a_float_argument_defaults_to_g() {
        let spec = spec_for("s");
        let mut buf = Buffer::new();
        format_string(&spec, &Argument::Float(3.5), 0, "s", 0, &mut buf).unwrap();
        assert_eq!(buf.as_bytes(), b"3.5");
    }

    #[test]
    fn s_on_an_integer_argument_prints_decimal() {
        let spec = spec_for("s");
        let mut buf = Buffer::new();
        format_string(&spec, &Argument::Signed(-7), 0, "s", 0, &mut buf).unwrap();
        assert_eq!(buf.as_bytes(), b"-7");
    }
}
