use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::transport::{LineFramer, LineTransport};

/// One end of a connected in-memory byte link.
pub struct InMemoryLink {
    rx: Arc<Mutex<VecDeque<u8>>>,
    tx: Arc<Mutex<VecDeque<u8>>>,
    framer: LineFramer,
}

impl InMemoryLink {
    pub fn pair() -> (Self, Self) {
        let q1 = Arc::new(Mutex::new(VecDeque::new()));
        let q2 = Arc::new(Mutex::new(VecDeque::new()));
        (
            Self {
                rx: q1.clone(),
                tx: q2.clone(),
                framer: LineFramer::new(),
            },
            Self {
                rx: q2,
                tx: q1,
                framer: LineFramer::new(),
            },
        )
    }

    /// Push raw bytes into this end's outgoing queue, bypassing line
    /// encoding. Useful for feeding partial or malformed input.
    pub fn send_raw(&mut self, bytes: &[u8]) -> anyhow::Result<()> {
        let mut queue = self
            .tx
            .lock()
            .map_err(|_| anyhow::anyhow!("link queue poisoned"))?;
        queue.extend(bytes.iter().copied());
        Ok(())
    }
}

#[async_trait::async_trait]
impl LineTransport for InMemoryLink {
    fn try_receive_line(&mut self) -> Option<String> {
        if let Some(line) = self.framer.next_line() {
            return Some(line);
        }
        if let Ok(mut queue) = self.rx.lock() {
            let bytes: Vec<u8> = queue.drain(..).collect();
            self.framer.push_bytes(&bytes);
        }
        self.framer.next_line()
    }

    async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        self.send_raw(line.as_bytes())
    }

    fn is_closed(&self) -> bool {
        let drained = self.rx.lock().map(|q| q.is_empty()).unwrap_or(true);
        Arc::strong_count(&self.rx) == 1 && drained && !self.framer.has_line()
    }
}
