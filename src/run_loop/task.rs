//! Intrusive task nodes and the FIFO they are linked into.
//!
//! A node is embedded as the first field of a `#[repr(C)]` operation state, so
//! the execute callback can cast the node pointer back to its owner. Queuing a
//! node never allocates.

use core::ptr::NonNull;

/// One unit of queued work with a single execute entry point.
pub struct TaskNode {
    next: Option<NonNull<TaskNode>>,
    execute: unsafe fn(NonNull<TaskNode>),
}

// SAFETY: `next` is only read or written by the owning loop under its mutex,
// and `execute` is a plain fn pointer.
unsafe impl Send for TaskNode {}

impl TaskNode {
    /// Create an unlinked node.
    ///
    /// `execute` receives the node pointer it was enqueued with and may treat
    /// it as a pointer to the enclosing `#[repr(C)]` owner.
    #[inline]
    pub const fn new(execute: unsafe fn(NonNull<TaskNode>)) -> Self {
        Self {
            next: None,
            execute,
        }
    }

    /// Whether the node is currently linked behind another node.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.next.is_some()
    }

    /// Run the node's callback.
    ///
    /// # Safety
    /// `node` must point to a live, unlinked node whose owner is still valid.
    #[inline]
    pub(crate) unsafe fn execute(node: NonNull<TaskNode>) {
        let f = unsafe { (*node.as_ptr()).execute };
        unsafe { f(node) }
    }
}

/// Head/tail FIFO of intrusive nodes. Callers serialize access with a lock.
pub(crate) struct TaskQueue {
    head: Option<NonNull<TaskNode>>,
    tail: Option<NonNull<TaskNode>>,
    len: usize,
}

// SAFETY: the queue only stores pointers; the nodes themselves are owned by
// pinned operation states whose owners guarantee they outlive execution. All
// access goes through the run loop mutex.
unsafe impl Send for TaskQueue {}

impl TaskQueue {
    pub(crate) const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Append at the tail in O(1).
    ///
    /// # Safety
    /// `node` must be valid, pinned and not linked into any queue.
    pub(crate) unsafe fn push(&mut self, node: NonNull<TaskNode>) {
        unsafe {
            debug_assert!(
                !(*node.as_ptr()).is_linked() && self.tail != Some(node),
                "task node enqueued while already linked"
            );
            (*node.as_ptr()).next = None;
            match self.tail {
                Some(tail) => (*tail.as_ptr()).next = Some(node),
                None => self.head = Some(node),
            }
        }
        self.tail = Some(node);
        self.len += 1;
    }

    /// Unlink the head node; its `next` is cleared before it is returned.
    pub(crate) fn pop(&mut self) -> Option<NonNull<TaskNode>> {
        let node = self.head?;
        // SAFETY: linked nodes stay valid until they are executed.
        self.head = unsafe { (*node.as_ptr()).next.take() };
        if self.head.is_none() {
            self.tail = None;
        }
        self.len -= 1;
        Some(node)
    }
}
