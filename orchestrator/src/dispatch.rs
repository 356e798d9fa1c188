//! One task per partition, each owning a single connection to its worker.

use std::{collections::HashMap, future::Future, io, sync::Arc, time::Duration};

use comms::proto;
use log::{debug, info, warn};
use matrix::Matrix;
use tokio::{net::TcpStream, sync::Semaphore, task::JoinSet, time};

use crate::{
    configs::RunConfig,
    error::{Stage, TaskError, TaskFailure},
    partition::Partition,
};

/// The outcome of a single dispatch task.
#[derive(Debug)]
pub enum TaskResult {
    Done { index: usize, product: Matrix },
    Failed(TaskFailure),
}

impl TaskResult {
    /// The partition index this result belongs to.
    pub fn index(&self) -> usize {
        match self {
            TaskResult::Done { index, .. } => *index,
            TaskResult::Failed(failure) => failure.index,
        }
    }
}

/// Sends every block to its worker concurrently and waits for all of them.
///
/// No more than `config.max_in_flight()` connections are open at once. Failures are
/// captured per partition, nothing is retried.
///
/// # Arguments
/// * `config` - The run configuration, `workers[i]` serves partition `i`.
/// * `blocks` - The partitions of `A` together with their rows.
/// * `b` - The right operand, shared read-only by every task.
///
/// Block `i` must carry partition index `i`, its result lands in slot `i`.
///
/// # Returns
/// One result per block, in ascending partition index order.
pub async fn dispatch(
    config: &RunConfig,
    blocks: Vec<(Partition, Matrix)>,
    b: Arc<Matrix>,
) -> Vec<TaskResult> {
    let permits = Arc::new(Semaphore::new(config.max_in_flight()));
    let io_timeout = config.io_timeout();
    let frame_limit = config.frame_limit;

    let mut tasks = JoinSet::new();
    let mut indices = HashMap::new();
    let mut slots: Vec<Option<TaskResult>> = blocks.iter().map(|_| None).collect();

    for (partition, block) in blocks {
        let index = partition.index;
        let addr = config.workers[index].clone();

        let permits = Arc::clone(&permits);
        let b = Arc::clone(&b);

        let handle = tasks.spawn(async move {
            let _permit = permits.acquire_owned().await.ok();
            run_task(index, addr, block, b, io_timeout, frame_limit).await
        });

        indices.insert(handle.id(), index);
    }

    while let Some(joined) = tasks.join_next_with_id().await {
        let result = match joined {
            Ok((_, result)) => result,
            Err(e) => {
                let Some(&index) = indices.get(&e.id()) else {
                    warn!("a dispatch task of unknown partition failed: {e}");
                    continue;
                };

                TaskResult::Failed(TaskFailure {
                    index,
                    addr: config.workers[index].clone(),
                    error: TaskError::Aborted(e),
                })
            }
        };

        match slots.get_mut(result.index()) {
            Some(slot) => *slot = Some(result),
            None => warn!("partition {} has no slot, dropping its result", result.index()),
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.unwrap_or_else(|| {
                TaskResult::Failed(TaskFailure {
                    index,
                    addr: config.workers.get(index).cloned().unwrap_or_default(),
                    error: TaskError::Lost,
                })
            })
        })
        .collect()
}

async fn run_task(
    index: usize,
    addr: String,
    block: Matrix,
    b: Arc<Matrix>,
    io_timeout: Duration,
    frame_limit: usize,
) -> TaskResult {
    let expected = (block.rows(), b.cols());
    debug!("partition {index}: sending {}x{} block to {addr}", expected.0, block.cols());

    let error = match exchange(&addr, &block, &b, io_timeout, frame_limit).await {
        Ok(product) if product.shape() == expected => {
            info!(partition = index; "partial product received from {addr}");
            return TaskResult::Done { index, product };
        }
        Ok(product) => TaskError::Shape {
            expected,
            got: product.shape(),
        },
        Err(e) => e,
    };

    warn!("partition {index} failed at {addr}: {error}");
    TaskResult::Failed(TaskFailure { index, addr, error })
}

/// Runs one full request/response cycle on a fresh connection.
async fn exchange(
    addr: &str,
    block: &Matrix,
    b: &Matrix,
    io_timeout: Duration,
    frame_limit: usize,
) -> Result<Matrix, TaskError> {
    let stream = bounded(Stage::Connect, io_timeout, TcpStream::connect(addr)).await?;
    let (rx, tx) = stream.into_split();
    let (mut rx, mut tx) = comms::channel_with_limit(rx, tx, frame_limit);

    bounded(Stage::Send, io_timeout, proto::send_request(&mut tx, block, b)).await?;
    bounded(Stage::Receive, io_timeout, proto::recv_response(&mut rx)).await
}

/// Applies `after` to a blocking point and classifies its failure.
async fn bounded<T, F>(stage: Stage, after: Duration, fut: F) -> Result<T, TaskError>
where
    F: Future<Output = io::Result<T>>,
{
    match time::timeout(after, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) if stage == Stage::Receive && e.kind() == io::ErrorKind::InvalidData => {
            Err(TaskError::Decode(e))
        }
        Ok(Err(source)) => Err(TaskError::Connection { stage, source }),
        Err(_) => Err(TaskError::Timeout { stage, after }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFTER: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn invalid_response_is_a_decode_error() {
        let fut = async { Err::<(), _>(io::Error::new(io::ErrorKind::InvalidData, "bad")) };
        let res = bounded(Stage::Receive, AFTER, fut).await;

        assert!(matches!(res, Err(TaskError::Decode(_))));
    }

    #[tokio::test]
    async fn early_close_is_a_connection_error() {
        let fut = async { Err::<(), _>(io::Error::from(io::ErrorKind::UnexpectedEof)) };
        let res = bounded(Stage::Receive, AFTER, fut).await;

        assert!(matches!(
            res,
            Err(TaskError::Connection {
                stage: Stage::Receive,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn invalid_data_while_sending_is_not_a_decode_error() {
        let fut = async { Err::<(), _>(io::Error::new(io::ErrorKind::InvalidData, "bad")) };
        let res = bounded(Stage::Send, AFTER, fut).await;

        assert!(matches!(res, Err(TaskError::Connection { .. })));
    }

    #[tokio::test]
    async fn pending_point_times_out() {
        let fut = std::future::pending::<io::Result<()>>();
        let res = bounded(Stage::Connect, AFTER, fut).await;

        assert!(matches!(
            res,
            Err(TaskError::Timeout {
                stage: Stage::Connect,
                after: AFTER
            })
        ));
    }
}
