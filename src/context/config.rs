//! Configuration of a [`Context`](crate::Context).
//!
//! Settings resolve in this order (highest priority first):
//!
//! 1. **Programmatic**: values set through the `with_*` builder methods
//! 2. **Environment variables**: `PEX_*` overrides read by [`ContextConfig::from_env`]
//! 3. **Defaults**: [`ContextConfig::default()`]
//!
//! | Variable | Type | Maps to |
//! |----------|------|---------|
//! | `PEX_THREAD_NAME` | `String` | `thread_name` |
//! | `PEX_THREAD_STACK_SIZE` | `usize` | `stack_size` |
//! | `PEX_PIN_CORE` | `usize` | `pin.core_id` |

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::util::affinity::PinConfig;

/// Environment variable name for the loop thread name.
pub const ENV_THREAD_NAME: &str = "PEX_THREAD_NAME";
/// Environment variable name for the loop thread stack size in bytes.
pub const ENV_THREAD_STACK_SIZE: &str = "PEX_THREAD_STACK_SIZE";
/// Environment variable name for the core the loop thread is pinned to.
pub const ENV_PIN_CORE: &str = "PEX_PIN_CORE";

const DEFAULT_THREAD_NAME: &str = "pex-context";

/// Settings for the dedicated thread of a context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Name given to the OS thread.
    pub thread_name: String,
    /// Stack size in bytes; the platform default when `None`.
    pub stack_size: Option<usize>,
    /// Optional pinning applied by the thread before it starts draining.
    pub pin: Option<PinConfig>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_owned(),
            stack_size: None,
            pin: None,
        }
    }
}

impl ContextConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults with overrides taken from `lookup` instead of the process
    /// environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    /// Apply every override `lookup` knows about.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(name) = lookup(ENV_THREAD_NAME) {
            if name.trim().is_empty() {
                return Err(Error::InvalidConfig {
                    var: ENV_THREAD_NAME,
                    value: name,
                });
            }
            self.thread_name = name;
        }
        if let Some(val) = lookup(ENV_THREAD_STACK_SIZE) {
            self.stack_size = Some(parse_usize(ENV_THREAD_STACK_SIZE, val)?);
        }
        if let Some(val) = lookup(ENV_PIN_CORE) {
            let core = parse_usize(ENV_PIN_CORE, val)?;
            let mut pin = self.pin.unwrap_or_default();
            pin.core_id = Some(core);
            self.pin = Some(pin);
        }
        Ok(())
    }

    /// Set the thread name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Set the thread stack size in bytes.
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Pin the loop thread.
    pub fn with_pin(mut self, pin: PinConfig) -> Self {
        self.pin = Some(pin);
        self
    }
}

fn parse_usize(var: &'static str, value: String) -> Result<usize> {
    match value.trim().parse() {
        Ok(n) => Ok(n),
        Err(_) => Err(Error::InvalidConfig { var, value }),
    }
}
