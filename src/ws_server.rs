// WebSocket server: accepts participant connections and bridges them to the
// session coordinator.
//
// Each connection gets a reader task (inbound frames -> coordinator channel)
// and a writer task (outbound channel -> frames). The coordinator never
// touches a socket; it sees connection ids and text frames only.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, Stream, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

/// Identifies one live connection. Ids are never reused within a process.
pub type ConnId = u64;

static NEXT_CONN_ID: AtomicU64 = AtomicU64::new(1);

/// Capacity of each connection's outbound queue. Broadcast uses `try_send`,
/// so a participant this far behind starts losing pushes instead of
/// stalling the coordinator; the next snapshot catches them up.
pub const OUTBOUND_QUEUE: usize = 64;

/// Events emitted by the transport to the coordinator.
#[derive(Debug)]
pub enum ConnEvent {
    /// A participant connected. `outbound` is where the coordinator queues
    /// text frames for this connection.
    Connected {
        conn_id: ConnId,
        addr: String,
        outbound: mpsc::Sender<String>,
    },
    /// A text frame arrived from this connection (raw JSON).
    Command { conn_id: ConnId, text: String },
    /// The connection went away (close frame, error, or EOF).
    Disconnected { conn_id: ConnId },
}

/// Bind the listener on `127.0.0.1:{port}`.
pub async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(format!("127.0.0.1:{port}")).await?;
    info!("WebSocket server listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Accept connections forever, spawning a handler per connection. Returns
/// when the coordinator side of `tx` is gone.
pub async fn run(listener: TcpListener, tx: mpsc::Sender<ConnEvent>) -> anyhow::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        if tx.is_closed() {
            return Ok(());
        }
        let tx = tx.clone();
        tokio::spawn(async move {
            handle_connection(stream, addr.to_string(), tx).await;
        });
    }
}

/// Serve one connection: handshake, register with the coordinator, pump
/// frames both ways, deregister on exit.
async fn handle_connection(stream: TcpStream, addr: String, tx: mpsc::Sender<ConnEvent>) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed for {addr}: {e}");
            return;
        }
    };

    let conn_id = NEXT_CONN_ID.fetch_add(1, Ordering::Relaxed);
    info!("Connection {conn_id} established from {addr}");

    let (mut write, read) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::channel::<String>(OUTBOUND_QUEUE);

    if tx
        .send(ConnEvent::Connected {
            conn_id,
            addr: addr.clone(),
            outbound: out_tx,
        })
        .await
        .is_err()
    {
        return;
    }

    // Writer: drains the outbound queue into the socket. Ends when the
    // coordinator drops the sender or the socket dies.
    let writer = tokio::spawn(async move {
        while let Some(text) = out_rx.recv().await {
            if write.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = write.close().await;
    });

    // Reader: forwards inbound text frames until close/error.
    let _ = pump_messages(read, &tx, conn_id, &addr).await;

    let _ = tx.send(ConnEvent::Disconnected { conn_id }).await;
    writer.abort();
    info!("Connection {conn_id} closed");
}

/// Forward text frames from any message stream as `Command` events.
/// Generic over the stream so tests can drive it with in-memory frames.
/// Returns `Err(())` when the coordinator channel is closed.
pub async fn pump_messages<St>(
    mut stream: St,
    tx: &mpsc::Sender<ConnEvent>,
    conn_id: ConnId,
    addr: &str,
) -> Result<(), ()>
where
    St: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                if tx
                    .send(ConnEvent::Command {
                        conn_id,
                        text: text.to_string(),
                    })
                    .await
                    .is_err()
                {
                    return Err(());
                }
            }
            Ok(Message::Close(_)) => {
                info!("Connection {conn_id} ({addr}) sent close frame");
                break;
            }
            Err(e) => {
                warn!("WebSocket error on connection {conn_id} ({addr}): {e}");
                break;
            }
            _ => {
                // Ignore Binary, Ping, Pong, Frame variants.
            }
        }
    }
    Ok(())
}
