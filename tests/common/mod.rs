#![allow(dead_code)]

use std::sync::mpsc;
use std::sync::{Arc, Mutex, Once};

use pex::{Completion, Receiver};

static LOGGING: Once = Once::new();

pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Appends every delivered value to a shared log.
pub struct Recorder<V> {
    pub log: Arc<Mutex<Vec<V>>>,
}

impl<V> Recorder<V> {
    pub fn new(log: &Arc<Mutex<Vec<V>>>) -> Self {
        Self { log: log.clone() }
    }
}

impl<V: Send + 'static> Receiver<V> for Recorder<V> {
    fn complete(self, completion: Completion<V>) {
        match completion {
            Completion::Value(v) => self.log.lock().unwrap().push(v),
            Completion::Error(e) => panic!("unexpected error: {e}"),
            Completion::Stopped => panic!("unexpected stop"),
        }
    }
}

/// Forwards the completion over a channel.
pub struct ChannelReceiver<V> {
    pub tx: mpsc::Sender<Completion<V>>,
}

impl<V: Send + 'static> Receiver<V> for ChannelReceiver<V> {
    fn complete(self, completion: Completion<V>) {
        let _ = self.tx.send(completion);
    }
}
