use std::io::ErrorKind;

use comms::proto;
use matrix::Matrix;
use tokio::io::{self, AsyncWriteExt};

#[tokio::test]
async fn send_recv() {
    const SIZE: usize = 128;

    let m = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();

    let (one, two) = io::duplex(SIZE);
    let (one_rx, one_tx) = io::split(one);
    let (_, mut tx) = comms::channel(one_rx, one_tx);

    let (two_rx, two_tx) = io::split(two);
    let (mut rx, _) = comms::channel(two_rx, two_tx);

    let (sent, received) = tokio::join!(tx.send(&m), rx.recv::<Matrix>());
    sent.unwrap();

    assert_eq!(received.unwrap(), m);
}

#[tokio::test]
async fn two_values_on_one_stream() {
    let a = Matrix::from_rows(&[[1, 2, 3], [4, 5, 6]]).unwrap();
    let b = Matrix::from_rows(&[[1, 0], [0, 1], [1, 1]]).unwrap();

    // A tiny pipe forces every frame to be split over many partial reads.
    let (one, two) = io::duplex(7);
    let (one_rx, one_tx) = io::split(one);
    let (_, mut tx) = comms::channel(one_rx, one_tx);

    let (two_rx, two_tx) = io::split(two);
    let (mut rx, _) = comms::channel(two_rx, two_tx);

    let (sent, received) = tokio::join!(
        proto::send_request(&mut tx, &a, &b),
        proto::recv_request(&mut rx)
    );
    sent.unwrap();

    let (got_a, got_b) = received.unwrap();
    assert_eq!(got_a, a);
    assert_eq!(got_b, b);
}

#[tokio::test]
async fn truncated_stream_is_an_eof() {
    let m = Matrix::from_rows(&[[1, 2], [3, 4]]).unwrap();

    let (one, mut two) = io::duplex(1024);
    let (rx, tx) = io::split(one);
    let (mut rx, _) = comms::channel(rx, tx);

    let mut frame = Vec::new();
    let (_, mut tx) = comms::channel(io::empty(), &mut frame);
    tx.send(&m).await.unwrap();
    drop(tx);

    two.write_all(&frame[..frame.len() - 3]).await.unwrap();
    drop(two);

    let err = rx.recv::<Matrix>().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
}

#[tokio::test]
async fn oversized_frame_is_rejected() {
    let m = Matrix::from_rows(&[[1, 2], [3, 4]]).unwrap();

    let (one, two) = io::duplex(1024);
    let (one_rx, one_tx) = io::split(one);
    let (_, mut tx) = comms::channel(one_rx, one_tx);

    let (two_rx, two_tx) = io::split(two);
    let (mut rx, _) = comms::channel_with_limit(two_rx, two_tx, 16);

    tx.send(&m).await.unwrap();

    let err = rx.recv::<Matrix>().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
}
