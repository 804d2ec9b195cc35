//! Typed update channel between background tasks and the owning thread.
//!
//! Background work never touches owned state directly. It hands results to an
//! [`Updater`], and the owner drains them through the paired [`UpdateReceiver`]
//! when it is ready (once per frame in the UI). Once the receiver is dropped every
//! `set` becomes a silent no-op, which is what makes completions arriving after a
//! page unmounts harmless.

use flume::{Receiver, Sender};

/// Sending half. Cheap to clone; one clone per spawned task.
#[derive(Debug)]
pub struct Updater<T> {
    send: Sender<T>,
}

impl<T> Clone for Updater<T> {
    fn clone(&self) -> Self {
        Self {
            send: self.send.clone(),
        }
    }
}

impl<T> Updater<T> {
    /// Publish a value. Returns `false` when nobody is listening anymore.
    pub fn set(&self, value: T) -> bool {
        if self.send.send(value).is_ok() {
            true
        } else {
            log::debug!("update dropped: receiver is gone");
            false
        }
    }
}

/// Receiving half, owned by whoever owns the state being updated.
#[derive(Debug)]
pub struct UpdateReceiver<T> {
    recv: Receiver<T>,
}

impl<T> UpdateReceiver<T> {
    /// Non-blocking read of the next queued update.
    pub fn try_read(&self) -> Option<T> {
        self.recv.try_recv().ok()
    }

    /// Wait for the next update. `None` once every updater is dropped.
    pub async fn read(&self) -> Option<T> {
        self.recv.recv_async().await.ok()
    }

    /// Everything queued right now, in arrival order.
    pub fn drain(&self) -> Vec<T> {
        self.recv.try_iter().collect()
    }

    pub fn pending(&self) -> usize {
        self.recv.len()
    }
}

/// Create a connected updater/receiver pair.
pub fn update_channel<T>() -> (Updater<T>, UpdateReceiver<T>) {
    let (send, recv) = flume::unbounded();
    (Updater { send }, UpdateReceiver { recv })
}
