use std::{io, num::NonZeroUsize, time::Duration};

use comms::proto;
use matrix::Matrix;
use tokio::{
    net::TcpStream,
    sync::oneshot,
    time::timeout,
};

use worker::{WorkerConfig, WorkerService};

async fn start(max_connections: usize) -> io::Result<(std::net::SocketAddr, oneshot::Sender<()>)> {
    let config = WorkerConfig::new("127.0.0.1:0")
        .with_max_connections(NonZeroUsize::new(max_connections).unwrap())
        .with_io_timeout(Duration::from_secs(5));

    let service = WorkerService::bind(config).await?;
    let addr = service.local_addr()?;

    let (stop_tx, stop_rx) = oneshot::channel();
    tokio::spawn(service.run_until(async move {
        let _ = stop_rx.await;
    }));

    Ok((addr, stop_tx))
}

async fn multiply_remote(addr: std::net::SocketAddr, a: &Matrix, b: &Matrix) -> io::Result<Matrix> {
    let stream = TcpStream::connect(addr).await?;
    let (rx, tx) = stream.into_split();
    let (mut rx, mut tx) = comms::channel(rx, tx);

    proto::send_request(&mut tx, a, b).await?;
    proto::recv_response(&mut rx).await
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn serves_consecutive_connections() -> io::Result<()> {
    let (addr, _stop) = start(4).await?;

    let a = Matrix::from_rows(&[[1, 2], [3, 4]]).unwrap();
    let b = Matrix::from_rows(&[[0, 1], [1, 0]]).unwrap();

    for _ in 0..3 {
        let c = multiply_remote(addr, &a, &b).await?;
        assert_eq!(c, Matrix::from_rows(&[[2, 1], [4, 3]]).unwrap());
    }

    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stalled_connection_does_not_block_the_next() -> io::Result<()> {
    let (addr, _stop) = start(4).await?;

    // Connects and never sends anything.
    let _stalled = TcpStream::connect(addr).await?;

    let a = Matrix::from_rows(&[[2]]).unwrap();
    let b = Matrix::from_rows(&[[21]]).unwrap();

    let c = timeout(Duration::from_secs(2), multiply_remote(addr, &a, &b))
        .await
        .expect("second connection was blocked")?;

    assert_eq!(c, Matrix::from_rows(&[[42]]).unwrap());
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn stops_accepting_after_shutdown() -> io::Result<()> {
    let (addr, stop) = start(1).await?;
    stop.send(()).unwrap();

    tokio::time::sleep(Duration::from_millis(100)).await;

    let a = Matrix::from_rows(&[[1]]).unwrap();
    assert!(multiply_remote(addr, &a, &a).await.is_err());
    Ok(())
}
