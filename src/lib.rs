//! A type-safe, extended formatted-output engine.
//!
//! A format string is compiled once into a [`tree::FormatTree`] and then
//! walked by [`executor::execute`] against a slice of [`value::Argument`]s.
//! Most callers want the adapters in [`adapters`] (`fstring`, `sprintf`,
//! `fprintf`, ...) rather than the lower-level pieces directly.

pub mod adapters;
pub mod buffer;
pub mod error;
pub mod executor;
pub mod kernels;
pub mod sink;
pub mod spec;
pub mod tree;
pub mod value;

pub use adapters::{
    addsprintf, eprintf, fprintf, fstring, oprintf, sprintf, tsio_fmt, CompiledFormat, Directive, FormatOptions,
};
pub use error::{FormatError, FormatErrorKind};
pub use sink::Sink;
pub use value::{Argument, IntoArgument};
