//! Growable output buffer with small-buffer optimization.
//!
//! Mirrors the append-only `std::string` destination of the original
//! engine, but tracks the inline/heap boundary explicitly instead of
//! relying on the host allocator's own small-string optimization.

/// Bytes held inline before a buffer promotes to a heap allocation.
pub const INLINE_CAPACITY: usize = 1024;

enum Storage {
    Inline([u8; INLINE_CAPACITY]),
    Heap(Vec<u8>),
}

pub struct Buffer {
    storage: Storage,
    len: usize,
    /// Bytes written since the last `\n`, tracked incrementally for `%T`.
    column: usize,
}

impl Buffer {
    pub fn new() -> Self {
        Buffer {
            storage: Storage::Inline([0; INLINE_CAPACITY]),
            len: 0,
            column: 0,
        }
    }

    /// Like [`Buffer::new`], but pre-promotes straight to a heap
    /// allocation of at least `hint` bytes when `hint` exceeds the
    /// inline capacity, so a caller who knows roughly how large their
    /// output will be can skip the inline-to-heap copy entirely.
    pub fn with_capacity_hint(hint: usize) -> Self {
        if hint <= INLINE_CAPACITY {
            return Self::new();
        }

        Buffer {
            storage: Storage::Heap(Vec::with_capacity(hint)),
            len: 0,
            column: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Inline(_) => INLINE_CAPACITY,
            Storage::Heap(v) => v.capacity(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match &self.storage {
            Storage::Inline(data) => &data[..self.len],
            Storage::Heap(v) => v.as_slice(),
        }
    }

    /// Current 0-based column, i.e. bytes written since the last `\n`
    /// (or since the start of the buffer if no `\n` has been written).
    pub fn column(&self) -> usize {
        self.column
    }

    pub fn append(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }

        self.reserve(bytes.len());

        match &mut self.storage {
            Storage::Inline(data) => {
                data[self.len..self.len + bytes.len()].copy_from_slice(bytes);
            }
            Storage::Heap(v) => v.extend_from_slice(bytes),
        }

        self.len += bytes.len();
        self.track_column(bytes);
    }

    pub fn append_byte(&mut self, byte: u8) {
        self.append(std::slice::from_ref(&byte));
    }

    /// Append `byte`, repeated `count` times.
    pub fn append_fill(&mut self, byte: u8, count: usize) {
        if count == 0 {
            return;
        }

        self.reserve(count);

        match &mut self.storage {
            Storage::Inline(data) => {
                data[self.len..self.len + count].fill(byte);
            }
            Storage::Heap(v) => v.resize(v.len() + count, byte),
        }

        self.len += count;
        if byte == b'\n' {
            self.column = 0;
        } else {
            self.column += count;
        }
    }

    /// Grow the buffer by `additional` zero bytes and return a mutable
    /// view over the newly reserved region for the caller to fill in.
    pub fn reserve_widen(&mut self, additional: usize) -> &mut [u8] {
        self.reserve(additional);
        let start = self.len;

        match &mut self.storage {
            Storage::Inline(data) => {
                data[start..start + additional].fill(0);
            }
            Storage::Heap(v) => v.resize(v.len() + additional, 0),
        }

        self.len += additional;

        match &mut self.storage {
            Storage::Inline(data) => &mut data[start..start + additional],
            Storage::Heap(v) => &mut v[start..start + additional],
        }
    }

    fn reserve(&mut self, additional: usize) {
        if self.len + additional <= self.capacity() {
            return;
        }

        if let Storage::Inline(data) = &self.storage {
            let mut heap = Vec::with_capacity((self.len + additional).max(self.capacity() * 2));
            heap.extend_from_slice(&data[..self.len]);
            self.storage = Storage::Heap(heap);
        } else if let Storage::Heap(v) = &mut self.storage {
            v.reserve((self.len + additional).saturating_sub(v.capacity()));
        }
    }

    fn track_column(&mut self, bytes: &[u8]) {
        match bytes.iter().rposition(|&b| b == b'\n') {
            Some(pos) => self.column = bytes.len() - pos - 1,
            None => self.column += bytes.len(),
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Buffer> for String {
    fn from(buf: Buffer) -> Self {
        // The engine only ever appends bytes produced by its own kernels,
        // all of which emit ASCII/UTF-8-safe output (see spec.md Non-goals:
        // the engine itself does not decode multi-byte input).
        String::from_utf8_lossy(buf.as_bytes()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_inline_under_capacity() {
        let mut buf = Buffer::new();
        buf.append(b"hello");
        assert_eq!(buf.as_bytes(), b"hello");
        assert!(matches!(buf.storage, Storage::Inline(_)));
    }

    #[test]
    fn promotes_to_heap_when_exceeding_inline_capacity() {
        let mut buf = Buffer::new();
        buf.append_fill(b'x', INLINE_CAPACITY + 16);
        assert_eq!(buf.len(), INLINE_CAPACITY + 16);
        assert!(matches!(buf.storage, Storage::Heap(_)));
    }

    #[test]
    fn tracks_column_across_newlines() {
        let mut buf = Buffer::new();
        buf.append(b"abc\ndef");
        assert_eq!(buf.column(), 3);
        buf.append_byte(b'\n');
        assert_eq!(buf.column(), 0);
        buf.append(b"xy");
        assert_eq!(buf.column(), 2);
    }

    #[test]
    fn capacity_hint_pre_promotes_to_heap() {
        let buf = Buffer::with_capacity_hint(INLINE_CAPACITY * 4);
        assert!(matches!(buf.storage, Storage::Heap(_)));
        assert!(buf.capacity() >= INLINE_CAPACITY * 4);
    }

    #[test]
    fn reserve_widen_fills_caller_region() {
        let mut buf = Buffer::new();
        buf.append(b"ab");
        let region = buf.reserve_widen(3);
        region.copy_from_slice(b"CDE");
        assert_eq!(buf.as_bytes(), b"abCDE");
    }
}
