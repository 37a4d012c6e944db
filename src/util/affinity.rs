//! Best-effort pinning of a context thread.
//!
//! Linux:
//!   - CPU pin: `sched_setaffinity` on the calling thread.
//! macOS:
//!   - Affinity tag: `thread_policy_set(THREAD_AFFINITY_POLICY)`.
//!
//! Other targets ignore the configuration.

use serde::{Deserialize, Serialize};

/// Pinning request for the dedicated thread of a [`Context`](crate::Context).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfig {
    /// Logical core the loop thread should run on (Linux only).
    #[serde(default)]
    pub core_id: Option<usize>,
    /// Mach thread affinity tag (macOS only).
    #[serde(default)]
    pub mac_affinity_tag: Option<i32>,
}

impl PinConfig {
    /// Pin to a single logical core.
    pub fn core(core_id: usize) -> Self {
        Self {
            core_id: Some(core_id),
            mac_affinity_tag: None,
        }
    }
}

/// Apply `cfg` to the calling thread. Returns whether any setting took effect.
pub fn pin_current_thread(cfg: &PinConfig) -> bool {
    let mut applied = false;

    #[cfg(target_os = "linux")]
    if let Some(core) = cfg.core_id {
        if core >= libc::CPU_SETSIZE as usize {
            tracing::warn!(core, "core id exceeds CPU_SETSIZE; not pinning");
        } else {
            // SAFETY: cpu_set_t is plain data; CPU_SET is bounds-checked above.
            let rc = unsafe {
                let mut set: libc::cpu_set_t = core::mem::zeroed();
                libc::CPU_ZERO(&mut set);
                libc::CPU_SET(core, &mut set);
                libc::sched_setaffinity(0, core::mem::size_of::<libc::cpu_set_t>(), &set)
            };
            if rc == 0 {
                applied = true;
            } else {
                tracing::warn!(
                    core,
                    error = %std::io::Error::last_os_error(),
                    "sched_setaffinity failed"
                );
            }
        }
    }

    #[cfg(target_os = "macos")]
    if let Some(tag) = cfg.mac_affinity_tag {
        type ThreadT = libc::mach_port_t;
        #[repr(C)]
        struct ThreadAffinityPolicy {
            affinity_tag: libc::integer_t,
        }
        unsafe extern "C" {
            fn mach_thread_self() -> ThreadT;
            fn thread_policy_set(
                thread: ThreadT,
                flavor: libc::c_int,
                policy_info: *const libc::integer_t,
                count: libc::mach_msg_type_number_t,
            ) -> libc::kern_return_t;
        }
        const THREAD_AFFINITY_POLICY: libc::c_int = 4;
        let policy = ThreadAffinityPolicy {
            affinity_tag: tag as libc::integer_t,
        };
        let count = (core::mem::size_of::<ThreadAffinityPolicy>()
            / core::mem::size_of::<libc::integer_t>())
            as libc::mach_msg_type_number_t;
        // SAFETY: policy is a valid THREAD_AFFINITY_POLICY record of `count` words.
        let kr = unsafe {
            thread_policy_set(
                mach_thread_self(),
                THREAD_AFFINITY_POLICY,
                (&policy as *const ThreadAffinityPolicy).cast(),
                count,
            )
        };
        if kr == 0 {
            applied = true;
        } else {
            tracing::warn!(tag, kr, "thread_policy_set failed");
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos")))]
    let _ = cfg;

    applied
}
