use std::{io, num::NonZeroUsize, time::Duration};

use comms::DEFAULT_FRAME_LIMIT;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_MAX_CONNECTIONS: usize = 64;
const DEFAULT_IO_TIMEOUT_MS: u64 = 30_000;

/// Immutable settings for a worker instance.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    addr: String,
    max_connections: NonZeroUsize,
    io_timeout: Duration,
    frame_limit: usize,
}

impl WorkerConfig {
    /// Creates a new worker configuration with default bounds.
    ///
    /// # Args
    /// * `addr` - The `host:port` to listen at.
    ///
    /// # Returns
    /// A `WorkerConfig` instance.
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            max_connections: NonZeroUsize::new(DEFAULT_MAX_CONNECTIONS)
                .unwrap_or(NonZeroUsize::MIN),
            io_timeout: Duration::from_millis(DEFAULT_IO_TIMEOUT_MS),
            frame_limit: DEFAULT_FRAME_LIMIT,
        }
    }

    /// Builds the configuration out of the process environment.
    ///
    /// # Args
    /// * `port_arg` - A port given on the command line, takes precedence over `PORT`.
    ///
    /// # Errors
    /// Returns `io::Error` if no port was given or some variable fails to parse.
    pub fn from_env(port_arg: Option<String>) -> io::Result<Self> {
        Self::from_lookup(port_arg, |key| std::env::var(key).ok())
    }

    /// Builds the configuration reading every variable through `lookup`.
    ///
    /// Recognized keys: `HOST`, `PORT`, `MAX_CONNECTIONS`, `IO_TIMEOUT_MS` and `FRAME_LIMIT`.
    pub fn from_lookup<F>(port_arg: Option<String>, lookup: F) -> io::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = port_arg
            .or_else(|| lookup("PORT"))
            .ok_or_else(|| io::Error::other("a port must be given as argument or through PORT"))?;
        let port: u16 = parse("PORT", &port)?;

        let mut cfg = Self::new(format!("{host}:{port}"));

        if let Some(raw) = lookup("MAX_CONNECTIONS") {
            cfg = cfg.with_max_connections(parse("MAX_CONNECTIONS", &raw)?);
        }

        if let Some(raw) = lookup("IO_TIMEOUT_MS") {
            cfg = cfg.with_io_timeout(Duration::from_millis(parse("IO_TIMEOUT_MS", &raw)?));
        }

        if let Some(raw) = lookup("FRAME_LIMIT") {
            let limit: NonZeroUsize = parse("FRAME_LIMIT", &raw)?;
            cfg = cfg.with_frame_limit(limit.get());
        }

        Ok(cfg)
    }

    pub fn with_max_connections(mut self, max_connections: NonZeroUsize) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn with_io_timeout(mut self, io_timeout: Duration) -> Self {
        self.io_timeout = io_timeout;
        self
    }

    pub fn with_frame_limit(mut self, frame_limit: usize) -> Self {
        self.frame_limit = frame_limit;
        self
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Returns the maximum amount of connections serviced at the same time.
    pub fn max_connections(&self) -> usize {
        self.max_connections.get()
    }

    /// Returns the bound applied to every read and write of a connection.
    pub fn io_timeout(&self) -> Duration {
        self.io_timeout
    }

    pub fn frame_limit(&self) -> usize {
        self.frame_limit
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> io::Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| io::Error::other(format!("invalid {key} '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn port_is_required() {
        assert!(WorkerConfig::from_lookup(None, lookup_in(&[])).is_err());
    }

    #[test]
    fn argument_overrides_env_port() {
        let cfg = WorkerConfig::from_lookup(
            Some("9999".into()),
            lookup_in(&[("PORT", "9998"), ("HOST", "0.0.0.0")]),
        )
        .unwrap();

        assert_eq!(cfg.addr(), "0.0.0.0:9999");
        assert_eq!(cfg.max_connections(), DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn bounds_from_env() {
        let cfg = WorkerConfig::from_lookup(
            None,
            lookup_in(&[
                ("PORT", "9998"),
                ("MAX_CONNECTIONS", "2"),
                ("IO_TIMEOUT_MS", "150"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.addr(), "127.0.0.1:9998");
        assert_eq!(cfg.max_connections(), 2);
        assert_eq!(cfg.io_timeout(), Duration::from_millis(150));
        assert_eq!(cfg.frame_limit(), DEFAULT_FRAME_LIMIT);
    }

    #[test]
    fn frame_limit_from_env() {
        let cfg =
            WorkerConfig::from_lookup(None, lookup_in(&[("PORT", "1"), ("FRAME_LIMIT", "4096")]))
                .unwrap();
        assert_eq!(cfg.frame_limit(), 4096);

        let zero = WorkerConfig::from_lookup(None, lookup_in(&[("PORT", "1"), ("FRAME_LIMIT", "0")]));
        assert!(zero.is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(WorkerConfig::from_lookup(Some("port".into()), lookup_in(&[])).is_err());
        assert!(
            WorkerConfig::from_lookup(
                Some("1".into()),
                lookup_in(&[("MAX_CONNECTIONS", "0")])
            )
            .is_err()
        );
    }
}
