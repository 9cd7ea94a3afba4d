//! Store configuration.

use bon::Builder;
use tokio_util::sync::CancellationToken;

/// Environment variable read by [`StoreOptions::from_env`].
pub const LOCATION_ENV: &str = "RUNLOOP_STORE_LOCATION";

/// Options shared by every store backend.
///
/// ```
/// use runloop::eventstore::StoreOptions;
///
/// let options = StoreOptions::builder().location("/var/lib/runloop").build();
/// assert_eq!(options.location, "/var/lib/runloop");
/// assert!(!options.cancel.is_cancelled());
/// ```
#[derive(Debug, Clone, Default, Builder)]
pub struct StoreOptions {
    /// Backend-specific address (path, URL, ...). Empty by default; the
    /// memory store ignores it.
    #[builder(default, into)]
    pub location: String,
    /// Cancels in-flight backend I/O. Defaults to a token nobody cancels.
    #[builder(default)]
    pub cancel: CancellationToken,
}

impl StoreOptions {
    /// Load from `RUNLOOP_STORE_LOCATION`, reading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            location: std::env::var(LOCATION_ENV).unwrap_or_default(),
            cancel: CancellationToken::new(),
        }
    }
}
