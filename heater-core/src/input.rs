//! Byte source trait and error types.

/// Error type for input operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// UART/communication I/O error.
    Io,
    /// Receive buffer overrun, bytes were lost.
    Overrun,
    /// UART framing or parity error.
    Framing,
}

/// Polled source of raw bytes from the heater link.
///
/// The monitor only reads after [`available`](Self::available) reports a
/// byte, so implementations never need to block.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap allocation.
pub trait ByteSource {
    /// Check whether at least one byte can be read right now.
    fn available(&mut self) -> bool;

    /// Read and consume the next byte.
    fn read(&mut self) -> Result<u8, InputError>;
}

impl<T: ByteSource + ?Sized> ByteSource for &mut T {
    fn available(&mut self) -> bool {
        (**self).available()
    }

    fn read(&mut self) -> Result<u8, InputError> {
        (**self).read()
    }
}

/// Byte source over an in-memory buffer, e.g. a captured log replayed on
/// the host.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Create a source that yields `bytes` in order.
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Bytes not yet read.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> &'a [u8] {
        self.bytes
    }
}

impl ByteSource for SliceSource<'_> {
    fn available(&mut self) -> bool {
        !self.bytes.is_empty()
    }

    fn read(&mut self) -> Result<u8, InputError> {
        let (&first, rest) = self.bytes.split_first().ok_or(InputError::Io)?;
        self.bytes = rest;
        Ok(first)
    }
}

/// Adapter from a non-blocking `embedded-io` reader, such as a buffered
/// UART receiver.
#[cfg(feature = "embedded-io")]
pub struct IoByteSource<R> {
    reader: R,
}

#[cfg(feature = "embedded-io")]
impl<R> IoByteSource<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Get a mutable reference to the wrapped reader.
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Unwrap the reader.
    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(feature = "embedded-io")]
impl<R: embedded_io::Read + embedded_io::ReadReady> ByteSource for IoByteSource<R> {
    fn available(&mut self) -> bool {
        match self.reader.read_ready() {
            Ok(ready) => ready,
            Err(_) => {
                warn!("byte source readiness check failed");
                false
            }
        }
    }

    fn read(&mut self) -> Result<u8, InputError> {
        use embedded_io::Error as _;

        let mut byte = [0u8; 1];
        match self.reader.read(&mut byte) {
            Ok(1) => Ok(byte[0]),
            Ok(_) => Err(InputError::Io),
            Err(e) => Err(match e.kind() {
                embedded_io::ErrorKind::InvalidData => InputError::Framing,
                _ => InputError::Io,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_source_yields_in_order() {
        let mut source = SliceSource::new(&[0x76, 0x16]);
        assert!(source.available());
        assert_eq!(source.read(), Ok(0x76));
        assert_eq!(source.read(), Ok(0x16));
        assert!(!source.available());
        assert_eq!(source.read(), Err(InputError::Io));
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut source = SliceSource::new(&[1, 2, 3]);
        {
            let mut by_ref = &mut source;
            assert_eq!(ByteSource::read(&mut by_ref), Ok(1));
        }
        assert_eq!(source.remaining(), &[2, 3]);
    }
}
