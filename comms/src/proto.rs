//! The multiplication exchange built on top of the framed channel.
//!
//! A request is exactly two frames written back to back, the row partition of `A`
//! and then the full `B`. A response is exactly one frame, the partial product.

use std::io;

use matrix::Matrix;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{OnoReceiver, OnoSender};

/// Writes the `(partition, b)` request.
pub async fn send_request<W>(tx: &mut OnoSender<W>, partition: &Matrix, b: &Matrix) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    tx.send(partition).await?;
    tx.send(b).await
}

/// Reads a `(partition, b)` request.
pub async fn recv_request<R>(rx: &mut OnoReceiver<R>) -> io::Result<(Matrix, Matrix)>
where
    R: AsyncRead + Unpin,
{
    let partition = rx.recv().await?;
    let b = rx.recv().await?;
    Ok((partition, b))
}

/// Writes the partial product.
pub async fn send_response<W>(tx: &mut OnoSender<W>, product: &Matrix) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    tx.send(product).await
}

/// Reads the partial product.
pub async fn recv_response<R>(rx: &mut OnoReceiver<R>) -> io::Result<Matrix>
where
    R: AsyncRead + Unpin,
{
    rx.recv().await
}
