//! In-process bus
//!
//! Records every published message in memory. Used by the test suite in
//! place of a broker; readiness is settable so the disconnected-backend
//! path can be exercised.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::bus::{MessageBus, PublishedMessage};
use crate::error::PublishError;

pub struct MemoryBus {
    ready: AtomicBool,
    messages: Mutex<Vec<PublishedMessage>>,
}

impl MemoryBus {
    /// A bus that is ready from the start.
    pub fn new() -> Self {
        Self {
            ready: AtomicBool::new(true),
            messages: Mutex::new(Vec::new()),
        }
    }

    /// A bus that never came up.
    pub fn disconnected() -> Self {
        Self {
            ready: AtomicBool::new(false),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Everything published so far, in dispatch order.
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.lock().unwrap().clone()
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageBus for MemoryBus {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn publish(&self, message: PublishedMessage) -> Result<(), PublishError> {
        self.messages.lock().unwrap().push(message);
        Ok(())
    }
}
