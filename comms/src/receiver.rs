use std::io;

use tokio::io::{AsyncRead, AsyncReadExt};

use crate::{Deserialize, LEN_TYPE_SIZE, LenType};

/// The receiving end handle of the communication.
pub struct OnoReceiver<R: AsyncRead + Unpin> {
    rx: R,
    buf: Vec<u8>,
    limit: usize,
}

impl<R: AsyncRead + Unpin> OnoReceiver<R> {
    /// Creates a new `OnoReceiver` instance.
    ///
    /// # Arguments
    /// * `rx` - The underlying reader.
    /// * `limit` - The maximum payload size in bytes to accept.
    pub(super) fn new(rx: R, limit: usize) -> Self {
        Self {
            rx,
            buf: Vec::new(),
            limit,
        }
    }

    /// Waits to receive a new message from the inner receiver.
    ///
    /// A stream that ends before the whole frame arrived yields `UnexpectedEof`,
    /// a length prefix above the limit yields `InvalidData` without reading the payload.
    ///
    /// # Returns
    /// A result object that returns `T` on success or `io::Error` on failure.
    pub async fn recv<T>(&mut self) -> io::Result<T>
    where
        T: for<'buf> Deserialize<'buf>,
    {
        let mut size_buf = [0; LEN_TYPE_SIZE];
        self.rx.read_exact(&mut size_buf).await?;
        let len = LenType::from_be_bytes(size_buf);

        let len = match usize::try_from(len) {
            Ok(len) if len <= self.limit => len,
            _ => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("frame of {len} bytes exceeds the limit of {}", self.limit),
                ));
            }
        };

        self.buf.resize(len, 0);
        self.rx.read_exact(&mut self.buf).await?;

        T::deserialize(&self.buf)
    }
}
