use std::{future::Future, io, net::SocketAddr, sync::Arc, time::Duration};

use log::{debug, info, warn};
use tokio::{net::TcpListener, sync::Semaphore, task::JoinSet, time};

use crate::{WorkerConfig, connection::serve_connection};

/// A bound listener that computes one partial product per accepted connection.
pub struct WorkerService {
    listener: TcpListener,
    config: WorkerConfig,
    permits: Arc<Semaphore>,
}

impl WorkerService {
    /// Binds the listening socket described by `config`.
    ///
    /// # Errors
    /// Returns `io::Error` if the address can't be bound.
    pub async fn bind(config: WorkerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(config.addr()).await?;
        let permits = Arc::new(Semaphore::new(config.max_connections()));

        Ok(Self {
            listener,
            config,
            permits,
        })
    }

    /// The address the service is actually listening at.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever.
    pub async fn run(self) -> io::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Accepts connections until `shutdown` resolves, then waits for the in flight ones.
    ///
    /// Connections are accepted one at a time but each one is serviced on its own
    /// task, at most `max_connections` of them at once.
    ///
    /// # Errors
    /// Returns `io::Error` if the listener itself fails.
    pub async fn run_until<F>(self, shutdown: F) -> io::Result<()>
    where
        F: Future<Output = ()>,
    {
        let Self {
            listener,
            config,
            permits,
        } = self;

        info!("listening at {}", listener.local_addr()?);

        let mut conns = JoinSet::new();
        let mut next_id: u64 = 0;
        let mut backoff = Duration::ZERO;
        tokio::pin!(shutdown);

        loop {
            let permit = tokio::select! {
                _ = &mut shutdown => break,
                permit = permits.clone().acquire_owned() => permit.map_err(io::Error::other)?,
            };

            let (stream, peer) = tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        backoff = next_backoff(backoff);
                        warn!("failed to accept a connection, retrying in {backoff:?}: {e}");
                        drop(permit);
                        time::sleep(backoff).await;
                        continue;
                    }
                },
            };
            backoff = Duration::ZERO;

            let conn_id = next_id;
            next_id += 1;
            info!("connection {conn_id}: accepted from {peer}");

            let (rx, tx) = stream.into_split();
            let (rx, tx) = comms::channel_with_limit(rx, tx, config.frame_limit());
            let io_timeout = config.io_timeout();

            conns.spawn(async move {
                match serve_connection(conn_id, rx, tx, io_timeout).await {
                    Ok(metrics) => info!(
                        conn_id = conn_id,
                        rows = metrics.rows,
                        cols = metrics.cols,
                        recv_ms = metrics.recv_time.as_millis() as u64,
                        compute_ms = metrics.compute_time.as_millis() as u64,
                        send_ms = metrics.send_time.as_millis() as u64,
                        total_ms = metrics.total().as_millis() as u64;
                        "partial product sent"
                    ),
                    Err(e) => warn!("connection {conn_id}: closed without response: {e}"),
                }

                drop(permit);
            });

            while let Some(joined) = conns.try_join_next() {
                if let Err(e) = joined {
                    warn!("connection task failed to join: {e}");
                }
            }
        }

        info!("shutting down, waiting for {} connection(s)", conns.len());
        while let Some(joined) = conns.join_next().await {
            if let Err(e) = joined {
                warn!("connection task failed to join: {e}");
            }
        }

        debug!("worker service stopped");
        Ok(())
    }
}

const MIN_ACCEPT_BACKOFF: Duration = Duration::from_millis(10);
const MAX_ACCEPT_BACKOFF: Duration = Duration::from_secs(1);

/// Doubles the pause between failed accepts, within `[MIN, MAX]_ACCEPT_BACKOFF`.
fn next_backoff(current: Duration) -> Duration {
    (current * 2).clamp(MIN_ACCEPT_BACKOFF, MAX_ACCEPT_BACKOFF)
}
