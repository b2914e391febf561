use std::path::PathBuf;
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Driver-wide tuning knobs (spec §4.11). Constructed with the builder so
/// callers only need to name the options they want to change; everything
/// else falls back to the serial API's own defaults.
#[derive(Debug, Clone, TypedBuilder)]
pub struct DriverOptions {
    /// `/dev/ttyUSB0`-style path or `tcp://host:port` for a Z-Wave-over-IP
    /// stick.
    #[builder(setter(into))]
    pub transport_uri: String,

    /// Directory the persisted network cache (spec §4.10/§4.13) is read
    /// from and written to.
    #[builder(default, setter(strip_option, into))]
    pub config_dir: Option<PathBuf>,

    /// Directory for anything user-editable that should survive a cache
    /// wipe. Defaults to `config_dir` when unset.
    #[builder(default, setter(strip_option, into))]
    pub user_dir: Option<PathBuf>,

    #[builder(default = Duration::from_millis(1000))]
    pub ack_timeout: Duration,

    #[builder(default = Duration::from_millis(1600))]
    pub response_timeout: Duration,

    #[builder(default = Duration::from_millis(10000))]
    pub callback_timeout: Duration,

    /// How many times a single interview stage retries its request before
    /// the driver gives up on it and advances anyway (spec §4.4).
    #[builder(default = 3)]
    pub stage_retries: u8,

    #[builder(default = Duration::from_secs(1))]
    pub poll_interval: Duration,

    #[builder(default = true)]
    pub enable_dns: bool,
}

impl DriverOptions {
    pub fn user_dir_or_config(&self) -> Option<&PathBuf> {
        self.user_dir.as_ref().or(self.config_dir.as_ref())
    }
}
