//! Pipeline verbosity control.
//!
//! Distinct from ordinary `log` usage elsewhere in the crate: this is a
//! user-selectable verbosity tier (`--debug-level` on the CLI) that gates
//! extra tracing the resolver and tree builder emit about overrides and
//! silently-dropped references, on top of whatever `RUST_LOG` has env_logger
//! print. Adapted from this crate's ancestor debug module, trimmed down from
//! Earley-specific position tracing to the handful of pipeline stages FHiCL
//! actually has.

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DebugLevel {
    Off,
    Basic,
    Detailed,
    Trace,
}

impl DebugLevel {
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "off" => Ok(DebugLevel::Off),
            "basic" => Ok(DebugLevel::Basic),
            "detailed" => Ok(DebugLevel::Detailed),
            "trace" => Ok(DebugLevel::Trace),
            _ => Err(format!("invalid debug level: {s}")),
        }
    }

    pub fn includes(&self, level: DebugLevel) -> bool {
        *self >= level
    }
}

static DEBUG_LEVEL: OnceLock<DebugLevel> = OnceLock::new();

pub fn set_debug_level(level: DebugLevel) {
    if DEBUG_LEVEL.set(level).is_err() {
        log::warn!("debug level already set; ignoring second call");
    }
}

pub fn get_debug_level() -> DebugLevel {
    *DEBUG_LEVEL.get().unwrap_or(&DebugLevel::Off)
}

/// Log a resolver/tree-builder tracing message at `level`, routed through
/// the `log` crate so it respects the normal `RUST_LOG` filter as well as
/// the `--debug-level` gate.
pub fn trace_pipeline(level: DebugLevel, msg: &str) {
    if get_debug_level().includes(level) {
        log::debug!("{msg}");
    }
}

#[macro_export]
macro_rules! pipeline_trace {
    ($level:expr, $($arg:tt)*) => {
        $crate::debug::trace_pipeline($level, &format!($($arg)*))
    };
}
