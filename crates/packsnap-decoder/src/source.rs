use std::io::{self, Read};

/// A pull-based supplier of raw bytes.
///
/// The buffer calls [`fill`](Self::fill) only when it runs out of bytes in
/// the middle of a value. Implementations may block until at least one byte
/// is available.
///
/// Contract:
///
/// ```text
/// ┌───────────────┬─────────────────────────────────────────────────┐
/// │ Return        │ Meaning                                         │
/// ├───────────────┼─────────────────────────────────────────────────┤
/// │ Ok(n), n > 0  │ n bytes were written to the front of `dst`      │
/// │ Ok(0)         │ end of data: nothing more will arrive right now │
/// │ Err(e)        │ genuine I/O failure, surfaced to the caller     │
/// └───────────────┴─────────────────────────────────────────────────┘
/// ```
///
/// Ordinary end of data must be `Ok(0)`, never an error.
pub trait ByteSource {
    /// Fill up to `dst.len()` bytes.
    ///
    /// # Errors
    ///
    /// Any I/O error of the underlying supplier.
    fn fill(&mut self, dst: &mut [u8]) -> io::Result<usize>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn fill(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        (**self).fill(dst)
    }
}

impl<S: ByteSource + ?Sized> ByteSource for Box<S> {
    fn fill(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        (**self).fill(dst)
    }
}

/// Adapts any [`Read`] into a [`ByteSource`].
///
/// `Interrupted` reads are retried; `UnexpectedEof` from readers that
/// report it for a short read is mapped to end of data.
#[derive(Debug)]
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    #[must_use]
    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn fill(&mut self, dst: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.reader.read(dst) {
                Ok(n) => return Ok(n),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(0),
                Err(e) => return Err(e),
            }
        }
    }
}
