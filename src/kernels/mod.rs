//! Conversion kernels: turn one argument plus a decoded `FormatSpec`
//! into bytes appended to the output buffer.
//!
//! Each kernel owns its own digit/character generation; padding and
//! justification are shared here since every kernel agrees on the same
//! rules (spec.md §4.6).

pub mod float;
pub mod integer;
pub mod text;
pub mod writeback;

use crate::buffer::Buffer;
use crate::spec::{Flags, FormatSpec};

/// Pad and justify `sign` (if any) + `prefix` + `digits` to `width`,
/// appending the result to `buf`. `numeric_fill` controls whether the
/// fill character is inserted between the sign/prefix and the digits
/// (the classic zero-padding placement, e.g. `-007`) or in front of
/// everything (space/alfa padding, e.g. `   -7`).
pub fn emit_numeric(
    buf: &mut Buffer,
    spec: &FormatSpec,
    width: usize,
    sign: Option<u8>,
    prefix: &[u8],
    digits: &[u8],
    numeric_fill: bool,
) {
    let content_len = sign.is_some() as usize + prefix.len() + digits.len();

    if content_len >= width {
        if let Some(s) = sign {
            buf.append_byte(s);
        }
        buf.append(prefix);
        buf.append(digits);
        return;
    }

    let pad = width - content_len;

    // One fill byte for the whole call, exactly like `outputNumber`'s
    // `(type & (alfafill|numericfill)) ? fillCharacter : ' '`: a custom
    // alfa or (non-demoted) numeric fill character applies to every
    // justification mode, not only the internal zero-pad placement.
    let fill = if spec.flags.contains(Flags::ALFA_FILL) || numeric_fill {
        spec.fill_character
    } else {
        b' '
    };

    if spec.flags.contains(Flags::LEFT_JUSTIFY) {
        if let Some(s) = sign {
            buf.append_byte(s);
        }
        buf.append(prefix);
        buf.append(digits);
        buf.append_fill(fill, pad);
    } else if spec.flags.contains(Flags::CENTER_JUSTIFY) {
        let left = pad / 2;
        let right = pad - left;
        buf.append_fill(fill, left);
        if let Some(s) = sign {
            buf.append_byte(s);
        }
        buf.append(prefix);
        buf.append(digits);
        buf.append_fill(fill, right);
    } else if numeric_fill {
        if let Some(s) = sign {
            buf.append_byte(s);
        }
        buf.append(prefix);
        buf.append_fill(fill, pad);
        buf.append(digits);
    } else {
        buf.append_fill(fill, pad);
        if let Some(s) = sign {
            buf.append_byte(s);
        }
        buf.append(prefix);
        buf.append(digits);
    }
}

/// Pad and justify a plain byte run (text/char kernels: no sign, no
/// digit/prefix split).
pub fn emit_text(buf: &mut Buffer, spec: &FormatSpec, width: usize, body: &[u8]) {
    if body.len() >= width {
        buf.append(body);
        return;
    }

    let pad = width - body.len();

    if spec.flags.contains(Flags::LEFT_JUSTIFY) {
        buf.append(body);
        buf.append_fill(spec.fill_character, pad);
    } else if spec.flags.contains(Flags::CENTER_JUSTIFY) {
        let left = pad / 2;
        let right = pad - left;
        buf.append_fill(spec.fill_character, left);
        buf.append(body);
        buf.append_fill(spec.fill_character, right);
    } else {
        buf.append_fill(spec.fill_character, pad);
        buf.append(body);
    }
}

/// Whether zero-fill should actually apply for this spec, per spec.md
/// §4.6: `numericFill` demotes to space-fill once a precision was
/// given (the precision already controls the minimum digit count).
pub fn effective_numeric_fill(spec: &FormatSpec) -> bool {
    spec.flags.contains(Flags::NUMERIC_FILL) && !spec.flags.contains(Flags::PRECISION_GIVEN)
}
