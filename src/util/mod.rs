/// Thread-to-core pinning.
pub mod affinity;
/// Run-loop membership of the current thread.
pub mod scope;

pub use affinity::{PinConfig, pin_current_thread};
pub use scope::in_run_loop;
