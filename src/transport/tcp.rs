use log::{debug, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

use crate::transport::{LineFramer, LineTransport};

/// Default timeout for a single send (5 seconds).
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Received chunks buffered between the reader task and the poll loop. A
/// full queue stalls the reader, which in turn back-pressures the peer.
const RX_QUEUE_DEPTH: usize = 64;

const READ_CHUNK: usize = 64;

/// Serial line carried over TCP (for example a serial-to-network bridge).
///
/// A background task reads the socket into a bounded single-producer,
/// single-consumer queue that [`LineTransport::try_receive_line`] drains
/// without blocking.
pub struct TcpLink {
    rx: mpsc::Receiver<Vec<u8>>,
    writer: OwnedWriteHalf,
    reader: JoinHandle<()>,
    framer: LineFramer,
    send_timeout: Duration,
    disconnected: bool,
}

impl TcpLink {
    pub fn new(stream: TcpStream) -> Self {
        Self::with_timeout(stream, DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_timeout(stream: TcpStream, send_timeout: Duration) -> Self {
        let (read_half, writer) = stream.into_split();
        let (tx, rx) = mpsc::channel(RX_QUEUE_DEPTH);
        let reader = tokio::spawn(read_loop(read_half, tx));
        Self {
            rx,
            writer,
            reader,
            framer: LineFramer::new(),
            send_timeout,
            disconnected: false,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self::new(stream))
    }
}

async fn read_loop(mut read_half: OwnedReadHalf, tx: mpsc::Sender<Vec<u8>>) {
    let mut buf = [0u8; READ_CHUNK];
    loop {
        match read_half.read(&mut buf).await {
            Ok(0) => {
                debug!("peer closed the connection");
                break;
            }
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).await.is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("read error: {}", e);
                break;
            }
        }
    }
}

#[async_trait::async_trait]
impl LineTransport for TcpLink {
    fn try_receive_line(&mut self) -> Option<String> {
        loop {
            if let Some(line) = self.framer.next_line() {
                return Some(line);
            }
            match self.rx.try_recv() {
                Ok(chunk) => self.framer.push_bytes(&chunk),
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => {
                    self.disconnected = true;
                    return None;
                }
            }
        }
    }

    async fn send(&mut self, line: &str) -> anyhow::Result<()> {
        let write_op = async {
            self.writer.write_all(line.as_bytes()).await.map_err(|e| {
                if e.kind() == std::io::ErrorKind::BrokenPipe
                    || e.kind() == std::io::ErrorKind::ConnectionReset
                {
                    anyhow::anyhow!("Connection closed by peer")
                } else {
                    anyhow::anyhow!("Write error: {}", e)
                }
            })?;
            self.writer.flush().await?;
            anyhow::Ok(())
        };
        timeout(self.send_timeout, write_op)
            .await
            .map_err(|_| anyhow::anyhow!("Send timeout after {:?}", self.send_timeout))?
    }

    fn is_closed(&self) -> bool {
        self.disconnected && !self.framer.has_line()
    }
}

impl Drop for TcpLink {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
