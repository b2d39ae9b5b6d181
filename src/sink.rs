//! Output sinks (spec.md §6): "append N bytes", nothing more.
//!
//! The core engine never touches `std::io` or process-wide streams
//! directly (spec.md §9, "Global state") — everything goes through this
//! one trait. Shape follows the teacher's small single-purpose traits
//! (e.g. `FromTokens<T>` in `crates/why_lib/src/parser/mod.rs`): one
//! method, implemented for whatever the caller already owns.

use std::io;

/// A byte-oriented destination. `fprintf`/`oprintf`/`eprintf` write
/// through this instead of assuming a `String` or a file.
pub trait Sink {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;
}

impl Sink for String {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.push_str(&String::from_utf8_lossy(bytes));
        Ok(())
    }
}

impl Sink for Vec<u8> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Wraps any `std::io::Write` as a [`Sink`], for `fprintf`-style writes
/// to files or other arbitrary writable byte streams.
pub struct WriteSink<W>(pub W);

impl<W: io::Write> Sink for WriteSink<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.0.write_all(bytes)
    }
}

/// Standard output, for `oprintf`.
pub fn stdout_sink() -> WriteSink<io::Stdout> {
    WriteSink(io::stdout())
}

/// Standard error, for `eprintf`.
pub fn stderr_sink() -> WriteSink<io::Stderr> {
    WriteSink(io::stderr())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_sink_appends_utf8() {
        let mut s = String::from("a=");
        s.write_bytes(b"1").unwrap();
        assert_eq!(s, "a=1");
    }

    #[test]
    fn vec_sink_appends_raw_bytes() {
        let mut v: Vec<u8> = vec![b'x'];
        v.write_bytes(b"yz").unwrap();
        assert_eq!(v, b"xyz");
    }

    #[test]
    fn write_sink_wraps_an_io_write() {
        let mut buf: Vec<u8> = Vec::new();
        {
            let mut sink = WriteSink(&mut buf);
            sink.write_bytes(b"hello").unwrap();
        }
        assert_eq!(buf, b"hello");
    }
}
