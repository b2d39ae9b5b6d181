//! Walks a compiled [`crate::tree::FormatTree`] against an argument
//! list, producing bytes in a [`Buffer`] (spec.md §4.2–§4.5).
//!
//! Grounded on `original_source/tsio.cpp`'s `Format::copyToFormat`
//! (repeat-stack bookkeeping via `StackElement`) and `tsio.h`'s
//! `printfOne`/`printfPositionalOne` (sequential vs. positional
//! consumption, dynamic width/precision re-entry on the same node).

use crate::buffer::Buffer;
use crate::error::FormatError;
use crate::kernels::{float, integer, text, writeback};
use crate::spec::{Flags, FormatSpec};
use crate::tree::{FormatNode, FormatTree};
use crate::value::Argument;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Sequential,
    Positional,
}

struct LocalFrame<'a> {
    values: Vec<Argument<'a>>,
    index: usize,
}

struct ExecCtx<'a> {
    args: &'a [Argument<'a>],
    sequential_cursor: usize,
    mode: Option<Mode>,
    local_stack: Vec<LocalFrame<'a>>,
    index_stack: Vec<usize>,
}

impl<'a> ExecCtx<'a> {
    fn fetch(&mut self, position: u32, source: &str, offset: usize) -> Result<Argument<'a>, FormatError> {
        if let Some(frame) = self.local_stack.last_mut() {
            return match frame.values.get(frame.index) {
                Some(v) => {
                    frame.index += 1;
                    Ok(*v)
                }
                None => Err(FormatError::arity(
                    source,
                    offset,
                    "not enough values for this container/tuple scope",
                )),
            };
        }

        if position != 0 {
            match self.mode {
                Some(Mode::Sequential) => {
                    return Err(FormatError::scope(
                        source,
                        offset,
                        "cannot mix positional and sequential argument references",
                    ))
                }
                _ => self.mode = Some(Mode::Positional),
            }

            let idx = position as usize - 1;
            self.args.get(idx).copied().ok_or_else(|| {
                FormatError::arity(source, offset, format!("positional argument {position} is out of range"))
            })
        } else {
            match self.mode {
                Some(Mode::Positional) => {
                    return Err(FormatError::scope(
                        source,
                        offset,
                        "cannot mix positional and sequential argument references",
                    ))
                }
                _ => self.mode = Some(Mode::Sequential),
            }

            let idx = self.sequential_cursor;
            let v = self
                .args
                .get(idx)
                .copied()
                .ok_or_else(|| FormatError::arity(source, offset, "not enough arguments supplied"))?;
            self.sequential_cursor += 1;
            Ok(v)
        }
    }
}

fn as_i64_loose(arg: &Argument<'_>, source: &str, offset: usize) -> Result<i64, FormatError> {
    match arg {
        Argument::Signed(v) => Ok(*v),
        Argument::Unsigned(v) => Ok(*v as i64),
        other => Err(FormatError::argument_shape(
            source,
            offset,
            format!("expected an integer width/precision/count argument, found a {}", other.type_name()),
        )),
    }
}

/// Resolves width, returning `(width, force_left_justify)` — a negative
/// dynamic width (`%*d` with a negative argument) means "left-justify
/// at the absolute value", matching classic printf's `*` convention.
fn resolve_width<'a>(ctx: &mut ExecCtx<'a>, spec: &FormatSpec, source: &str, offset: usize) -> Result<(usize, bool), FormatError> {
    if spec.flags.contains(Flags::WIDTH_DYNAMIC) {
        let arg = ctx.fetch(spec.width_position, source, offset)?;
        let raw = as_i64_loose(&arg, source, offset)?;
        if raw < 0 {
            Ok(((-raw) as usize, true))
        } else {
            Ok((raw as usize, false))
        }
    } else if spec.flags.contains(Flags::WIDTH_GIVEN) {
        Ok((spec.width as usize, false))
    } else {
        Ok((0, false))
    }
}

/// Resolves precision; `None` means "no precision", which a negative
/// dynamic precision (`%.*f` with a negative argument) also produces.
fn resolve_precision<'a>(ctx: &mut ExecCtx<'a>, spec: &FormatSpec, source: &str, offset: usize) -> Result<Option<u32>, FormatError> {
    if spec.flags.contains(Flags::PRECISION_DYNAMIC) {
        let arg = ctx.fetch(spec.precision_position, source, offset)?;
        let raw = as_i64_loose(&arg, source, offset)?;
        if raw < 0 {
            Ok(None)
        } else {
            Ok(Some(raw as u32))
        }
    } else if spec.flags.contains(Flags::PRECISION_GIVEN) {
        Ok(Some(spec.precision))
    } else {
        Ok(None)
    }
}

/// Builds the effective per-call spec: dynamic width/precision resolved
/// into concrete values, with the left-justify override from a
/// negative dynamic width applied.
fn effective_spec<'a>(
    ctx: &mut ExecCtx<'a>,
    spec: &FormatSpec,
    source: &str,
    offset: usize,
) -> Result<(FormatSpec, usize), FormatError> {
    let (width, force_left) = resolve_width(ctx, spec, source, offset)?;
    let precision = resolve_precision(ctx, spec, source, offset)?;

    let mut out = spec.clone();
    if force_left {
        out.flags.insert(Flags::LEFT_JUSTIFY);
        out.flags.remove(Flags::NUMERIC_FILL);
    }

    match precision {
        Some(p) => {
            out.precision = p;
            out.flags.insert(Flags::PRECISION_GIVEN);
        }
        None => out.flags.remove(Flags::PRECISION_GIVEN),
    }

    Ok((out, width))
}

fn execute_node<'a>(node: &FormatNode, ctx: &mut ExecCtx<'a>, buf: &mut Buffer, source: &str) -> Result<(), FormatError> {
    buf.append(&node.prefix);

    match node.spec.specifier {
        0 => Ok(()),
        b'%' => {
            buf.append_byte(b'%');
            Ok(())
        }
        b'T' => {
            let (spec, width) = effective_spec(ctx, &node.spec, source, node.offset)?;
            if spec.flags.contains(Flags::ALTERNATIVE) {
                // Absolute column: move to column `width`, inserting a
                // newline first if already past it.
                let col = buf.column();
                if col > width {
                    buf.append_byte(b'\n');
                    buf.append_fill(b' ', width);
                } else if col < width {
                    buf.append_fill(b' ', width - col);
                }
            } else if width > 0 {
                // Tab stops every `width` columns: always advance to the
                // next stop strictly past the current column.
                let col = buf.column();
                let next_stop = (col / width + 1) * width;
                buf.append_fill(b' ', next_stop - col);
            }
            Ok(())
        }
        b'N' => {
            let index = *ctx
                .index_stack
                .last()
                .ok_or_else(|| FormatError::scope(source, node.offset, "%N used outside an iteration scope"))?;
            let (spec, width) = effective_spec(ctx, &node.spec, source, node.offset)?;
            let reported = if spec.flags.contains(Flags::ALTERNATIVE) { index + 1 } else { index };
            integer::format(&spec, &Argument::Unsigned(reported as u64), width, source, node.offset, buf)
        }
        b'{' => execute_repeat(node, ctx, buf, source),
        b'[' => execute_container(node, ctx, buf, source),
        b'<' => execute_tuple(node, ctx, buf, source),
        b'n' => {
            let arg = ctx.fetch(node.spec.position, source, node.offset)?;
            writeback::format(&arg, buf.len(), source, node.offset)
        }
        b'p' => {
            let (spec, width) = effective_spec(ctx, &node.spec, source, node.offset)?;
            let arg = ctx.fetch(node.spec.position, source, node.offset)?;
            let addr = match arg {
                Argument::Pointer(p) => p,
                other => {
                    return Err(FormatError::argument_shape(
                        source,
                        node.offset,
                        format!("%p requires a pointer argument, found a {}", other.type_name()),
                    ))
                }
            };
            integer::format_pointer(&spec, addr, width, buf);
            Ok(())
        }
        b'd' | b'i' | b'o' | b'u' | b'x' | b'X' | b'b' | b'B' => {
            // Dynamic width/precision arguments (if any) precede the value
            // argument in sequential mode, so resolve the spec first.
            let (spec, width) = effective_spec(ctx, &node.spec, source, node.offset)?;
            let arg = ctx.fetch(node.spec.position, source, node.offset)?;
            integer::format(&spec, &arg, width, source, node.offset, buf)
        }
        b'a' | b'A' | b'e' | b'E' | b'f' | b'F' | b'g' | b'G' => {
            let (spec, width) = effective_spec(ctx, &node.spec, source, node.offset)?;
            let arg = ctx.fetch(node.spec.position, source, node.offset)?;
            float::format(&spec, &arg, width, source, node.offset, buf)
        }
        b's' | b'S' => {
            let (spec, width) = effective_spec(ctx, &node.spec, source, node.offset)?;
            let arg = ctx.fetch(node.spec.position, source, node.offset)?;
            text::format_string(&spec, &arg, width, source, node.offset, buf)
        }
        b'c' | b'C' => {
            let (spec, width) = effective_spec(ctx, &node.spec, source, node.offset)?;
            let arg = ctx.fetch(node.spec.position, source, node.offset)?;
            text::format_char(&spec, &arg, width, source, node.offset, buf)
        }
        other => unreachable!("tree compiler admitted an unhandled specifier '{}'", other as char),
    }
}

/// Splits a structural child chain into its repeatable/destructurable
/// body (everything but the last node) and the closer (the last node).
/// The closer is itself an ordinary node in the chain and is visited on
/// every pass; its `prefix` is whatever literal text follows the body
/// inside the group.
fn body_and_closer(head: &FormatNode) -> (Vec<&FormatNode>, &FormatNode) {
    let mut body = Vec::new();
    let mut cur = head;

    loop {
        match &cur.next {
            Some(next) => {
                body.push(cur);
                cur = next;
            }
            None => return (body, cur),
        }
    }
}

fn run_body<'a>(body: &[&FormatNode], ctx: &mut ExecCtx<'a>, buf: &mut Buffer, source: &str) -> Result<(), FormatError> {
    for node in body {
        execute_node(node, ctx, buf, source)?;
    }
    Ok(())
}

fn execute_repeat<'a>(node: &FormatNode, ctx: &mut ExecCtx<'a>, buf: &mut Buffer, source: &str) -> Result<(), FormatError> {
    let (_, count) = effective_spec(ctx, &node.spec, source, node.offset)?;

    let child = node
        .child
        .as_deref()
        .expect("tree compiler always attaches a child to a structural opener");
    let (body, closer) = body_and_closer(child);

    // The closer is visited on every pass, so its prefix is emitted
    // unconditionally each iteration — it is not a last-element-suppressed
    // separator the way the container closer is.
    for i in 0..count {
        ctx.index_stack.push(i);
        let result = run_body(&body, ctx, buf, source).and_then(|_| {
            buf.append(&closer.prefix);
            Ok(())
        });
        ctx.index_stack.pop();
        result?;
    }

    Ok(())
}

/// Resolves the three argument shapes `%[...%]` accepts (spec.md §4.4):
/// an iterable container, a tuple (one iteration per field), or a bare
/// scalar (treated as a single-element sequence of itself).
fn container_elements<'a>(arg: Argument<'a>) -> Vec<Argument<'a>> {
    match arg {
        Argument::Container(c) => c.iter_arguments().collect(),
        Argument::Tuple(t) => t.elements(),
        scalar => vec![scalar],
    }
}

fn execute_container<'a>(node: &FormatNode, ctx: &mut ExecCtx<'a>, buf: &mut Buffer, source: &str) -> Result<(), FormatError> {
    let arg = ctx.fetch(node.spec.position, source, node.offset)?;
    let elements = container_elements(arg);

    let child = node
        .child
        .as_deref()
        .expect("tree compiler always attaches a child to a structural opener");
    let (body, closer) = body_and_closer(child);

    // Default: the closer's prefix (the separator) appears N times, once
    // after every element including the last. `%#[...%]` suppresses the
    // trailing occurrence, leaving N-1 separators between elements.
    let suppress_trailing = node.spec.flags.contains(Flags::ALTERNATIVE);
    let last = elements.len().saturating_sub(1);

    for (i, element) in elements.into_iter().enumerate() {
        ctx.local_stack.push(LocalFrame {
            values: vec![element],
            index: 0,
        });
        ctx.index_stack.push(i);
        let result = run_body(&body, ctx, buf, source);
        ctx.index_stack.pop();
        ctx.local_stack.pop();
        result?;

        if i < last || !suppress_trailing {
            buf.append(&closer.prefix);
        }
    }

    Ok(())
}

fn execute_tuple<'a>(node: &FormatNode, ctx: &mut ExecCtx<'a>, buf: &mut Buffer, source: &str) -> Result<(), FormatError> {
    let arg = ctx.fetch(node.spec.position, source, node.offset)?;
    let tuple = match arg {
        Argument::Tuple(t) => t,
        other => {
            return Err(FormatError::argument_shape(
                source,
                node.offset,
                format!("%< requires a tuple argument, found a {}", other.type_name()),
            ))
        }
    };

    let child = node
        .child
        .as_deref()
        .expect("tree compiler always attaches a child to a structural opener");
    let (body, closer) = body_and_closer(child);

    let elements = tuple.elements();
    let expected = elements.len();

    let result = if node.spec.flags.contains(Flags::POSITIONAL_CHILDREN) {
        run_tuple_positional(&body, &elements, ctx, buf, source, node.offset)
    } else {
        ctx.local_stack.push(LocalFrame { values: elements.clone(), index: 0 });
        let result = run_body(&body, ctx, buf, source);
        let consumed = ctx.local_stack.last().map(|f| f.index).unwrap_or(0);
        ctx.local_stack.pop();
        result.and_then(|_| {
            if consumed != expected {
                Err(FormatError::arity(
                    source,
                    node.offset,
                    format!("tuple destructure expected {expected} leaves, the format consumed {consumed}"),
                ))
            } else {
                Ok(())
            }
        })
    };

    result?;
    buf.append(&closer.prefix);
    Ok(())
}

/// Positional-children sub-mode: each body node's own `$`-index picks
/// which tuple field it formats, instead of consuming fields in order.
fn run_tuple_positional<'a>(
    body: &[&FormatNode],
    elements: &[Argument<'a>],
    ctx: &mut ExecCtx<'a>,
    buf: &mut Buffer,
    source: &str,
    tuple_offset: usize,
) -> Result<(), FormatError> {
    for node in body {
        if node.spec.position == 0 {
            return Err(FormatError::scope(
                source,
                node.offset,
                "cannot mix positional and sequential references inside a positional tuple destructure",
            ));
        }

        let idx = node.spec.position as usize - 1;
        let field = elements.get(idx).copied().ok_or_else(|| {
            FormatError::arity(source, tuple_offset, format!("tuple field {} is out of range", node.spec.position))
        })?;

        ctx.local_stack.push(LocalFrame { values: vec![field], index: 0 });
        let result = execute_node(node, ctx, buf, source);
        ctx.local_stack.pop();
        result?;
    }

    Ok(())
}

/// Walk `tree` against `args`, appending into `buf`. On error, whatever
/// was already written before the failing node stays in `buf` (spec.md
/// §7: "already-produced output up to the error is retained"); no
/// further nodes run once the first error occurs.
pub fn execute<'a>(tree: &FormatTree, args: &[Argument<'a>], source: &str, buf: &mut Buffer) -> Result<(), FormatError> {
    let mut ctx = ExecCtx {
        args,
        sequential_cursor: 0,
        mode: None,
        local_stack: Vec::new(),
        index_stack: Vec::new(),
    };

    let mut node = Some(&tree.root);
    while let Some(n) = node {
        execute_node(n, &mut ctx, buf, source)?;
        node = n.next.as_deref();
    }

    Ok(())
}
