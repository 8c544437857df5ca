use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 23;
pub const DEFAULT_LOG_FILE: &str = "./stat.txt";
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(1);
pub const DEFAULT_EXPECTED_DEVICES: usize = 1;

pub struct Config {
    /// Network interface the discovery socket is bound to.
    pub interface: String,
    /// TCP port of the PDU command channel.
    pub port: u16,
    /// File that `log_usage_in_kw` appends readings to.
    pub log_file: PathBuf,
    /// Total time budget for one discovery pass.
    pub max_wait: Duration,
    /// Stops discovery early once this many devices have answered.
    ///
    /// `None` always waits for the full `max_wait`.
    pub expected_devices: Option<usize>,
    /// Where the search probe goes. `None` broadcasts on the GBL port.
    pub discovery_target: Option<SocketAddr>,
}

impl Config {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
            port: DEFAULT_PORT,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            max_wait: DEFAULT_MAX_WAIT,
            expected_devices: Some(DEFAULT_EXPECTED_DEVICES),
            discovery_target: None,
        }
    }
}
