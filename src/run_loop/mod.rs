/// Run loop draining intrusive tasks in FIFO order.
pub mod run_loop;
/// Intrusive task nodes.
pub mod task;

pub use run_loop::{RunLoop, RunLoopHandle};
pub use task::TaskNode;
