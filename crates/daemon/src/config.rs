use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub listen: SocketAddr,

    /// Max request body bytes.
    pub max_body_bytes: usize,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_body_bytes: 64 * 1024,
        }
    }
}
