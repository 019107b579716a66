//! Diagnostics
//!
//! The engine reports through `tracing`. Which diagnostics it emits is
//! governed by the configured [`DebugLevel`]; what reaches the output is
//! governed by the subscriber installed with [`init`].

use std::io;

use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Diagnostic verbosity. Never changes terminal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugLevel {
    #[default]
    None,
    /// Bounds violations, malformed and unrecognized sequences
    ErrorsOnly,
    /// Additionally every dispatched sequence and unknown mode
    AllSequences,
    /// Additionally every byte received
    AllBytes,
}

impl DebugLevel {
    pub fn errors(self) -> bool {
        self >= DebugLevel::ErrorsOnly
    }

    pub fn sequences(self) -> bool {
        self >= DebugLevel::AllSequences
    }

    pub fn bytes(self) -> bool {
        self >= DebugLevel::AllBytes
    }

    /// Filter directive that lets this level's diagnostics through
    pub fn directive(self) -> &'static str {
        match self {
            DebugLevel::None | DebugLevel::ErrorsOnly => "warn",
            DebugLevel::AllSequences => "debug",
            DebugLevel::AllBytes => "trace",
        }
    }
}

/// Install a stderr fmt subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the filter follows `level`.
pub fn init(level: DebugLevel) {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive())))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}
