// src/rewind.rs

//! Replayable wrapper for a one-shot body stream.
//!
//! [`Rewinder`] caches everything that is read through it, and starts over
//! when [`rewind`](Rewinder::rewind) is called, answering read requests
//! from its cache until the cache is exhausted and then pulling live data
//! from the underlying reader. Each source byte is fetched at most once no
//! matter how many times the stream is rewound.

use std::fmt;
use std::io;

/// A reader that can be rewound to its first byte.
///
/// The negotiation loop installs one of these around the request body so
/// the same bytes can be resent on every authentication round trip.
pub struct Rewinder {
    buffer: Vec<u8>,
    reader: Box<dyn io::Read + Send>,
    read: usize,
}

impl Rewinder {
    /// Wraps a one-shot reader so its output can be replayed.
    pub fn new(reader: impl io::Read + Send + 'static) -> Rewinder {
        Rewinder {
            buffer: Vec::new(),
            reader: Box::new(reader),
            read: 0,
        }
    }

    /// Rewinds the stream, so that the next read attempt will return data
    /// starting at the first byte that was ever read.
    ///
    /// The cache is kept; previously-read bytes are replayed rather than
    /// fetched again from the possibly-exhausted source.
    pub fn rewind(&mut self) {
        self.read = 0;
    }
}

impl io::Read for Rewinder {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // Wholly within the cache: serve it and advance the cursor.
        if self.read + buf.len() < self.buffer.len() {
            let end = self.read + buf.len();
            buf.copy_from_slice(&self.buffer[self.read..end]);
            self.read = end;
            return Ok(buf.len());
        }

        // Not enough cached data. Serve what is still cached first.
        let cached = (self.buffer.len() - self.read).min(buf.len());
        buf[..cached].copy_from_slice(&self.buffer[self.read..self.read + cached]);
        self.read += cached;

        // Top up from the live source, remembering every byte pulled.
        match self.reader.read(&mut buf[cached..]) {
            Ok(pulled) => {
                self.buffer.extend_from_slice(&buf[cached..cached + pulled]);
                self.read += pulled;
                Ok(cached + pulled)
            }
            Err(err) if cached == 0 => Err(err),
            // Cached bytes were already delivered this call; the source
            // failure surfaces on the next read.
            Err(_) => Ok(cached),
        }
    }
}

impl fmt::Debug for Rewinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rewinder")
            .field("buffered", &self.buffer.len())
            .field("read", &self.read)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

    struct CountingReader<R> {
        inner: R,
        fetched: Arc<AtomicUsize>,
    }

    impl<R: Read> Read for CountingReader<R> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.inner.read(buf)?;
            self.fetched.fetch_add(n, Ordering::SeqCst);
            Ok(n)
        }
    }

    fn read_to_end_in_chunks(rewinder: &mut Rewinder, chunk: usize) -> Vec<u8> {
        let mut collected = Vec::new();
        loop {
            let mut p = vec![0u8; chunk];
            let n = rewinder.read(&mut p).unwrap();
            if n == 0 {
                break;
            }
            collected.extend_from_slice(&p[..n]);
        }
        collected
    }

    #[test]
    fn replays_identically_across_chunk_sizes() {
        let mut rewinder = Rewinder::new(io::Cursor::new(ALPHABET.to_vec()));
        for chunk in 1..ALPHABET.len() {
            let collected = read_to_end_in_chunks(&mut rewinder, chunk);
            assert_eq!(collected, ALPHABET, "mismatch at chunk size {chunk}");
            rewinder.rewind();
        }
    }

    #[test]
    fn fetches_each_source_byte_at_most_once() {
        let fetched = Arc::new(AtomicUsize::new(0));
        let source = CountingReader {
            inner: io::Cursor::new(ALPHABET.to_vec()),
            fetched: fetched.clone(),
        };
        let mut rewinder = Rewinder::new(source);
        for _ in 0..3 {
            let collected = read_to_end_in_chunks(&mut rewinder, 7);
            assert_eq!(collected, ALPHABET);
            rewinder.rewind();
        }
        assert_eq!(fetched.load(Ordering::SeqCst), ALPHABET.len());
    }

    #[test]
    fn partial_read_then_rewind_replays_from_start() {
        let fetched = Arc::new(AtomicUsize::new(0));
        let source = CountingReader {
            inner: io::Cursor::new(ALPHABET.to_vec()),
            fetched: fetched.clone(),
        };
        let mut rewinder = Rewinder::new(source);

        let mut head = [0u8; 10];
        rewinder.read_exact(&mut head).unwrap();
        assert_eq!(&head, b"abcdefghij");

        rewinder.rewind();
        let collected = read_to_end_in_chunks(&mut rewinder, 4);
        assert_eq!(collected, ALPHABET);
        assert_eq!(fetched.load(Ordering::SeqCst), ALPHABET.len());
    }

    #[test]
    fn empty_source_reads_nothing() {
        let mut rewinder = Rewinder::new(io::Cursor::new(Vec::new()));
        let mut buf = [0u8; 8];
        assert_eq!(rewinder.read(&mut buf).unwrap(), 0);
        rewinder.rewind();
        assert_eq!(rewinder.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn bytes_buffered_before_a_source_failure_stay_replayable() {
        struct FailAfter {
            data: io::Cursor<Vec<u8>>,
            done: bool,
        }

        impl Read for FailAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                let n = self.data.read(buf)?;
                if n > 0 {
                    return Ok(n);
                }
                if self.done {
                    return Ok(0);
                }
                self.done = true;
                Err(io::Error::new(io::ErrorKind::Other, "connection reset"))
            }
        }

        let mut rewinder = Rewinder::new(FailAfter {
            data: io::Cursor::new(b"hello".to_vec()),
            done: false,
        });

        let mut buf = [0u8; 16];
        assert_eq!(rewinder.read(&mut buf).unwrap(), 5);
        assert!(rewinder.read(&mut buf).is_err());

        rewinder.rewind();
        assert_eq!(rewinder.read(&mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"hello");
    }
}
