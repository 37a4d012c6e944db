use std::thread::{self, JoinHandle, ThreadId};

use crate::context::config::ContextConfig;
use crate::context::scheduler::Scheduler;
use crate::error::{Error, Result};
use crate::run_loop::RunLoop;
use crate::util::affinity::pin_current_thread;

/// A run loop driven by its own dedicated OS thread.
///
/// Dropping the context stops the loop, lets it drain what is already queued,
/// and joins the thread.
pub struct Context {
    run_loop: RunLoop,
    thread: Option<JoinHandle<()>>,
    thread_id: ThreadId,
    name: String,
}

/// Create a context configured from defaults and `PEX_*` environment overrides.
pub fn make_context() -> Result<Context> {
    Context::with_config(ContextConfig::from_env()?)
}

impl Context {
    /// Spawn a context with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(ContextConfig::default())
    }

    /// Spawn a context thread configured by `config`.
    pub fn with_config(config: ContextConfig) -> Result<Self> {
        let run_loop = RunLoop::new();
        let shared = run_loop.shared().clone();

        let mut builder = thread::Builder::new().name(config.thread_name.clone());
        if let Some(bytes) = config.stack_size {
            builder = builder.stack_size(bytes);
        }
        let pin = config.pin;
        let thread = builder
            .spawn(move || {
                if let Some(cfg) = pin {
                    pin_current_thread(&cfg);
                }
                let executed = shared.run();
                tracing::debug!(executed, "context loop finished");
            })
            .map_err(Error::Spawn)?;

        tracing::debug!(name = %config.thread_name, "context thread launched");
        Ok(Self {
            run_loop,
            thread_id: thread.thread().id(),
            thread: Some(thread),
            name: config.thread_name,
        })
    }

    /// Scheduler bound to this context's loop.
    pub fn scheduler(&self) -> Scheduler {
        self.run_loop.scheduler()
    }

    /// Id of the dedicated thread.
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Thread name the context was spawned with.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of queued tasks not yet executed.
    pub fn pending(&self) -> usize {
        self.run_loop.pending()
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        tracing::debug!(name = %self.name, "stopping context");
        self.run_loop.stop();
        let Some(thread) = self.thread.take() else {
            return;
        };
        if thread::current().id() == self.thread_id {
            // Dropped from one of its own tasks; the loop exits after this task.
            tracing::warn!(name = %self.name, "context dropped on its own thread; not joining");
            return;
        }
        match thread.join() {
            Ok(()) => tracing::debug!(name = %self.name, "context thread joined"),
            Err(_) => tracing::error!(name = %self.name, "context thread panicked"),
        }
    }
}
