//! The lifecycle of one accepted connection.
//!
//! `Connected -> AwaitingRequest -> Computing -> Responding -> Closed`. Any failure
//! jumps straight to `Closed` without writing a response, no state outlives the
//! connection.

use std::{
    fmt,
    time::{Duration, Instant},
};

use comms::{OnoReceiver, OnoSender, proto};
use log::debug;
use tokio::{
    io::{AsyncRead, AsyncWrite},
    task, time,
};

use crate::{Result, WorkerErr, metrics::ConnMetrics};

/// The states a connection walks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connected,
    AwaitingRequest,
    Computing,
    Responding,
    Closed,
}

impl fmt::Display for ConnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnState::Connected => "connected",
            ConnState::AwaitingRequest => "awaiting request",
            ConnState::Computing => "computing",
            ConnState::Responding => "responding",
            ConnState::Closed => "closed",
        };

        f.write_str(s)
    }
}

fn enter(conn_id: u64, state: &mut ConnState, next: ConnState) {
    debug!("connection {conn_id}: {state} -> {next}");
    *state = next;
}

/// Services one request/response cycle over the given channel.
///
/// Reads the partition of `A` and then `B`, multiplies them and writes the partial
/// product back. The writing half is shut down whether or not the response made it
/// through.
///
/// # Args
/// * `conn_id` - Identifier used for observability.
/// * `rx` - Receiving end of the connection.
/// * `tx` - Sending end of the connection.
/// * `io_timeout` - Bound applied to reading the request and to writing the response.
///
/// # Returns
/// The timings of each phase on success.
///
/// # Errors
/// Returns `WorkerErr` on I/O failures, malformed requests or timeouts.
pub async fn serve_connection<R, W>(
    conn_id: u64,
    mut rx: OnoReceiver<R>,
    mut tx: OnoSender<W>,
    io_timeout: Duration,
) -> Result<ConnMetrics>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut state = ConnState::Connected;
    let res = run_cycle(conn_id, &mut state, &mut rx, &mut tx, io_timeout).await;

    if let Err(e) = tx.shutdown().await {
        debug!("connection {conn_id}: shutdown failed: {e}");
    }

    enter(conn_id, &mut state, ConnState::Closed);
    res
}

async fn run_cycle<R, W>(
    conn_id: u64,
    state: &mut ConnState,
    rx: &mut OnoReceiver<R>,
    tx: &mut OnoSender<W>,
    io_timeout: Duration,
) -> Result<ConnMetrics>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut metrics = ConnMetrics::default();

    enter(conn_id, state, ConnState::AwaitingRequest);
    let start = Instant::now();
    let (partition, b) = time::timeout(io_timeout, proto::recv_request(rx))
        .await
        .map_err(|_| WorkerErr::Timeout { state: *state })??;
    metrics.recv_time = start.elapsed();

    if partition.cols() != b.rows() {
        return Err(WorkerErr::ShapeMismatch {
            partition: partition.shape(),
            b: b.shape(),
        });
    }

    (metrics.rows, metrics.cols) = (partition.rows(), b.cols());

    enter(conn_id, state, ConnState::Computing);
    let start = Instant::now();
    let product = task::spawn_blocking(move || matrix::multiply(&partition, &b)).await??;
    metrics.compute_time = start.elapsed();

    enter(conn_id, state, ConnState::Responding);
    let start = Instant::now();
    time::timeout(io_timeout, proto::send_response(tx, &product))
        .await
        .map_err(|_| WorkerErr::Timeout { state: *state })??;
    metrics.send_time = start.elapsed();

    Ok(metrics)
}
