//! Writing side of a framed value stream.

use std::io;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{LEN_TYPE_SIZE, LenType, Serialize};

/// Writes values as length prefixed frames.
pub struct OnoSender<W>
where
    W: AsyncWrite + Unpin,
{
    tx: W,
    frame: Vec<u8>,
}

impl<W: AsyncWrite + Unpin> OnoSender<W> {
    pub(super) fn new(tx: W) -> Self {
        Self {
            tx,
            frame: Vec::new(),
        }
    }

    /// Writes `value` as a single frame and flushes it.
    ///
    /// The frame is the big-endian payload length followed by the payload. A value
    /// may hand out its bulk data as a borrowed tail (a matrix's elements), which
    /// is written straight from the value's own memory after the buffered head.
    ///
    /// # Errors
    /// Any error of the underlying writer.
    pub async fn send<'a, T: Serialize<'a>>(&mut self, value: &'a T) -> io::Result<()> {
        self.frame.clear();
        self.frame.extend_from_slice(&[0; LEN_TYPE_SIZE]);

        let tail = value.serialize(&mut self.frame).unwrap_or_default();
        let payload_len = self.frame.len() - LEN_TYPE_SIZE + tail.len();
        let prefix = LenType::try_from(payload_len).map_err(io::Error::other)?;
        self.frame[..LEN_TYPE_SIZE].copy_from_slice(&prefix.to_be_bytes());

        self.tx.write_all(&self.frame).await?;
        if !tail.is_empty() {
            self.tx.write_all(tail).await?;
        }

        self.tx.flush().await
    }

    /// Flushes and shuts down the writing half, signaling the peer there's nothing else to read.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.tx.shutdown().await
    }
}
