use std::time::Duration;

/// Time spent on each phase of a single connection.
#[derive(Debug, Default, Clone)]
pub struct ConnMetrics {
    pub recv_time: Duration,
    pub compute_time: Duration,
    pub send_time: Duration,

    pub rows: usize,
    pub cols: usize,
}

impl ConnMetrics {
    #[inline]
    pub fn total(&self) -> Duration {
        self.recv_time + self.compute_time + self.send_time
    }
}
