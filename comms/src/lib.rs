mod codec;
mod deserialize;
pub mod proto;
mod receiver;
mod sender;
mod serialize;

use tokio::io::{AsyncRead, AsyncWrite};

pub use deserialize::Deserialize;
pub use receiver::OnoReceiver;
pub use sender::OnoSender;
pub use serialize::Serialize;

type LenType = u64;
const LEN_TYPE_SIZE: usize = size_of::<LenType>();

/// The largest frame a receiver accepts unless told otherwise, 256 MiB.
pub const DEFAULT_FRAME_LIMIT: usize = 256 * 1024 * 1024;

/// Creates both `OnoReceiver` and `OnoSender` network channel parts.
///
/// Given a writer and reader creates and returns both ends of the communication.
///
/// # Arguments
/// * `rx` - An async readable.
/// * `tx` - An async writable.
///
/// # Returns
/// A communication stream in the form of an ono receiver and sender.
pub fn channel<R, W>(rx: R, tx: W) -> (OnoReceiver<R>, OnoSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    channel_with_limit(rx, tx, DEFAULT_FRAME_LIMIT)
}

/// Same as `channel` but with a custom upper bound for incoming frames.
///
/// # Arguments
/// * `rx` - An async readable.
/// * `tx` - An async writable.
/// * `limit` - The maximum payload size in bytes the receiver will accept.
pub fn channel_with_limit<R, W>(rx: R, tx: W, limit: usize) -> (OnoReceiver<R>, OnoSender<W>)
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    (OnoReceiver::new(rx, limit), OnoSender::new(tx))
}
