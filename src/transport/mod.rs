//! Line-oriented links between the device and the host.
//!
//! Receiving is polled: [`LineTransport::try_receive_line`] returns at once,
//! with either a complete line (terminator stripped) or `None`.

pub mod framer;
pub mod in_memory;
pub mod tcp;

pub use framer::LineFramer;

#[async_trait::async_trait]
pub trait LineTransport: Send {
    /// Next complete received line, if one is available.
    fn try_receive_line(&mut self) -> Option<String>;

    /// Send `line` as is. Bytes are never reordered or dropped.
    async fn send(&mut self, line: &str) -> anyhow::Result<()>;

    /// True once the peer is gone and no buffered line remains.
    fn is_closed(&self) -> bool {
        false
    }
}
