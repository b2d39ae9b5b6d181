//! Convenience adapters (spec.md §4.7) plus the `Directive` wrapper
//! (SPEC_FULL.md §5, ported from `original_source/tsio.h`'s `tsio::fmt`).
//!
//! Grounded on `original_source/tsio.h`'s free functions `tsio::{sprintf,
//! addsprintf, fprintf, oprintf, eprintf, fstring}`: same names, same
//! "byte count on success" shape, reworked onto `Result` instead of a
//! negative-count return since that is how this crate reports failure
//! everywhere else. Per spec.md §7, a failing execution still writes its
//! diagnostic to standard error once, and whatever output was produced
//! before the failing node is retained in the caller's destination.

use std::cell::Cell;

use once_cell::unsync::OnceCell;

use crate::buffer::Buffer;
use crate::error::FormatError;
use crate::sink::{self, Sink};
use crate::tree::{self, FormatTree};
use crate::value::{Argument, IntoArgument};
use crate::executor;

/// Runs one compile-and-execute pass, returning whatever was produced
/// even on failure. Writes the error's `Display` to stderr exactly once
/// per call, matching spec.md §7's "once per execution" diagnostic.
fn run_once(fmt: &str, args: &[Argument<'_>]) -> (Buffer, Result<(), FormatError>) {
    let mut buf = Buffer::new();

    let result = match tree::compile(fmt) {
        Ok(t) => executor::execute(&t, args, fmt, &mut buf),
        Err(e) => Err(e),
    };

    if let Err(ref e) = result {
        eprintln!("{e}");
    }

    (buf, result)
}

/// Builds and returns a new string. Whatever was formatted before a
/// failing directive is discarded along with the `Err` — callers who
/// need the partial output on failure should use [`sprintf`] instead,
/// which writes into a destination they already own.
pub fn fstring(fmt: &str, args: &[Argument<'_>]) -> Result<String, FormatError> {
    let (buf, result) = run_once(fmt, args);
    result.map(|()| buf.into())
}

/// Replaces `dst`'s contents with the formatted output, returning the
/// byte count on success. On error, `dst` still holds whatever was
/// produced before the failing directive.
pub fn sprintf(dst: &mut String, fmt: &str, args: &[Argument<'_>]) -> Result<usize, FormatError> {
    dst.clear();
    let (buf, result) = run_once(fmt, args);
    let written = buf.len();
    dst.push_str(&String::from_utf8_lossy(buf.as_bytes()));
    result?;
    Ok(written)
}

/// Appends the formatted output to `dst`, returning the number of bytes
/// appended by this call (not `dst`'s new total length).
pub fn addsprintf(dst: &mut String, fmt: &str, args: &[Argument<'_>]) -> Result<usize, FormatError> {
    let (buf, result) = run_once(fmt, args);
    let written = buf.len();
    dst.push_str(&String::from_utf8_lossy(buf.as_bytes()));
    result?;
    Ok(written)
}

/// Writes the formatted output through an arbitrary byte [`Sink`].
///
/// I/O failures from the sink itself are outside this crate's error
/// taxonomy (spec.md §7 only models parse/argument-shape/arity/scope
/// errors) and are silently dropped here; a caller who needs to observe
/// them should write to the sink directly instead of going through this
/// adapter.
pub fn fprintf<S: Sink>(sink: &mut S, fmt: &str, args: &[Argument<'_>]) -> Result<usize, FormatError> {
    let (buf, result) = run_once(fmt, args);
    let written = buf.len();
    let _ = sink.write_bytes(buf.as_bytes());
    result?;
    Ok(written)
}

/// Writes to standard output.
pub fn oprintf(fmt: &str, args: &[Argument<'_>]) -> Result<usize, FormatError> {
    fprintf(&mut sink::stdout_sink(), fmt, args)
}

/// Writes to standard error.
pub fn eprintf(fmt: &str, args: &[Argument<'_>]) -> Result<usize, FormatError> {
    fprintf(&mut sink::stderr_sink(), fmt, args)
}

/// Construction-time knobs for a [`CompiledFormat`] (SPEC_FULL.md §2,
/// "Configuration"). The engine has no persisted state and no on-disk
/// config format; this is the entire configuration surface.
#[derive(Debug, Clone, Copy)]
pub struct FormatOptions {
    /// Pre-size the buffer each execution allocates, skipping the
    /// inline-to-heap copy for formats known to produce large output.
    /// `0` (the default) uses the buffer's ordinary inline-first growth.
    pub inline_capacity_hint: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions { inline_capacity_hint: 0 }
    }
}

/// A format string compiled once and reused across many executions
/// (spec.md §9, "Tree reuse"). Compilation is lazy: the first call that
/// actually executes the format triggers it, cached behind a `once_cell`
/// the same way the teacher caches its own lazily-initialized statics.
///
/// Not `Sync`: spec.md §5 explicitly leaves cross-thread sharing of a
/// compiled-format handle to the caller's own synchronization.
pub struct CompiledFormat {
    source: String,
    tree: OnceCell<FormatTree>,
    error_given: Cell<bool>,
    options: FormatOptions,
}

impl CompiledFormat {
    pub fn new(source: impl Into<String>) -> Self {
        Self::with_options(source, FormatOptions::default())
    }

    pub fn with_options(source: impl Into<String>, options: FormatOptions) -> Self {
        CompiledFormat {
            source: source.into(),
            tree: OnceCell::new(),
            error_given: Cell::new(false),
            options,
        }
    }

    fn tree(&self) -> Result<&FormatTree, FormatError> {
        self.tree.get_or_try_init(|| tree::compile(&self.source))
    }

    /// Clears the sticky error flag, re-enabling diagnostic output for
    /// the handle's next execution (spec.md §3, executor state's
    /// `errorGiven`). Does not recompile the cached tree.
    pub fn reset(&self) {
        self.error_given.set(false);
    }

    /// Executes against `args`, appending into `buf`.
    pub fn execute_into(&self, args: &[Argument<'_>], buf: &mut Buffer) -> Result<(), FormatError> {
        let tree = self.tree()?;
        let result = executor::execute(tree, args, &self.source, buf);

        if let Err(ref e) = result {
            if !self.error_given.get() {
                eprintln!("{e}");
                self.error_given.set(true);
            }
        }

        result
    }

    /// Executes against `args`, returning a fresh string.
    pub fn fstring(&self, args: &[Argument<'_>]) -> Result<String, FormatError> {
        let mut buf = Buffer::with_capacity_hint(self.options.inline_capacity_hint);
        self.execute_into(args, &mut buf)?;
        Ok(buf.into())
    }
}

/// A single non-structural `%`-directive bound to one value, for
/// `format!("{}", tsio_fmt("%05d").of(value))`-style call sites that
/// want `std::fmt::Display` instead of the byte-sink adapters above
/// (SPEC_FULL.md §5; ported from `original_source/tsio.h`'s `tsio::fmt`
/// + `operator<<`).
pub struct Directive<'a>(&'a str);

pub fn tsio_fmt(spec: &str) -> Directive<'_> {
    Directive(spec)
}

impl<'a> Directive<'a> {
    pub fn of<T: IntoArgument>(self, value: T) -> DirectiveValue<'a, T> {
        DirectiveValue { spec: self.0, value }
    }
}

pub struct DirectiveValue<'a, T> {
    spec: &'a str,
    value: T,
}

impl<'a, T: IntoArgument> std::fmt::Display for DirectiveValue<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tree = tree::compile(self.spec).map_err(|_| std::fmt::Error)?;
        let mut buf = Buffer::new();
        executor::execute(&tree, &[self.value.to_argument()], self.spec, &mut buf).map_err(|_| std::fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(buf.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fstring_builds_a_string() {
        assert_eq!(fstring("a=%d", &[Argument::Signed(3)]).unwrap(), "a=3");
    }

    #[test]
    fn sprintf_replaces_and_returns_byte_count() {
        let mut s = String::from("stale");
        let n = sprintf(&mut s, "x=%d", &[Argument::Signed(5)]).unwrap();
        assert_eq!(s, "x=5");
        assert_eq!(n, 3);
    }

    #[test]
    fn sprintf_retains_partial_output_on_error() {
        let mut s = String::new();
        let err = sprintf(&mut s, "a=%d b=%d", &[Argument::Signed(1)]).unwrap_err();
        assert_eq!(err.kind, crate::error::FormatErrorKind::Arity);
        assert_eq!(s, "a=1 b=");
    }

    #[test]
    fn addsprintf_appends() {
        let mut s = String::from("x=");
        let n = addsprintf(&mut s, "%d", &[Argument::Signed(9)]).unwrap();
        assert_eq!(s, "x=9");
        assert_eq!(n, 1);
    }

    #[test]
    fn fprintf_writes_through_a_sink() {
        let mut s = String::new();
        fprintf(&mut s, "n=%d", &[Argument::Signed(7)]).unwrap();
        assert_eq!(s, "n=7");
    }

    #[test]
    fn compiled_format_reuses_its_tree_across_executions() {
        let handle = CompiledFormat::new("v=%d");
        assert_eq!(handle.fstring(&[Argument::Signed(1)]).unwrap(), "v=1");
        assert_eq!(handle.fstring(&[Argument::Signed(2)]).unwrap(), "v=2");
    }

    #[test]
    fn compiled_format_reset_clears_the_sticky_error_flag() {
        let handle = CompiledFormat::new("%d");
        assert!(handle.fstring(&[]).is_err());
        assert!(handle.error_given.get());
        handle.reset();
        assert!(!handle.error_given.get());
    }

    #[test]
    fn with_options_honors_the_capacity_hint() {
        let handle = CompiledFormat::with_options(
            "v=%d",
            FormatOptions { inline_capacity_hint: crate::buffer::INLINE_CAPACITY * 2 },
        );
        assert_eq!(handle.fstring(&[Argument::Signed(1)]).unwrap(), "v=1");
    }

    #[test]
    fn directive_formats_a_single_value() {
        let rendered = format!("{}", tsio_fmt("%05d").of(42i32));
        assert_eq!(rendered, "00042");
    }
}
