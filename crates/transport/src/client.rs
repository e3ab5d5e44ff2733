use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::codec::{write_packet, FramedReader};
use crate::error::TransportError;
use crate::packet::{RequestPacket, ResponsePacket};
use crate::pattern::normalize_pattern;

type Reply = Result<Value, TransportError>;

struct Pending {
    tx: oneshot::Sender<Reply>,
    /// Last non-final value, kept in case the final packet carries none.
    last: Option<Value>,
}

type PendingMap = DashMap<String, Pending>;

struct Connection {
    writer: OwnedWriteHalf,
    pending: Arc<PendingMap>,
    closed: Arc<AtomicBool>,
}

/// Client side of the message transport. Connects on first use, correlates
/// replies by request id and reconnects on the next call after the peer
/// went away. Calls have no timeout.
pub struct ClientProxy {
    addr: String,
    conn: Mutex<Option<Connection>>,
}

impl ClientProxy {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into(), conn: Mutex::new(None) }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send `data` under `pattern` and wait for the reply.
    pub async fn send(&self, pattern: &Value, data: Value) -> Result<Value, TransportError> {
        let id = Uuid::new_v4().to_string();
        let packet = RequestPacket {
            pattern: Value::String(normalize_pattern(pattern)),
            data,
            id: Some(id.clone()),
        };
        let (tx, rx) = oneshot::channel();

        {
            let mut guard = self.conn.lock().await;
            let conn = self.ensure_connected(&mut guard).await?;
            register(&conn.pending, &conn.closed, id.clone(), tx)?;
            if let Err(err) = write_packet(&mut conn.writer, &packet).await {
                conn.pending.remove(&id);
                *guard = None;
                return Err(err);
            }
        }
        debug!(%id, pattern = %packet.pattern, "request sent");

        rx.await.unwrap_or(Err(TransportError::Disconnected))
    }

    /// Fire-and-forget: the packet carries no id and nothing is awaited.
    pub async fn emit(&self, pattern: &Value, data: Value) -> Result<(), TransportError> {
        let packet = RequestPacket { pattern: Value::String(normalize_pattern(pattern)), data, id: None };
        let mut guard = self.conn.lock().await;
        let conn = self.ensure_connected(&mut guard).await?;
        if let Err(err) = write_packet(&mut conn.writer, &packet).await {
            *guard = None;
            return Err(err);
        }
        Ok(())
    }

    /// Drop the current connection; calls still waiting fail with
    /// [`TransportError::Disconnected`].
    pub async fn close(&self) {
        if let Some(conn) = self.conn.lock().await.take() {
            conn.closed.store(true, Ordering::SeqCst);
            fail_pending(&conn.pending);
        }
    }

    async fn ensure_connected<'a>(
        &self,
        slot: &'a mut Option<Connection>,
    ) -> Result<&'a mut Connection, TransportError> {
        let stale = slot.as_ref().map_or(true, |c| c.closed.load(Ordering::SeqCst));
        if stale {
            let stream = TcpStream::connect(&self.addr).await?;
            info!(addr = %self.addr, "connected to message server");
            let (read, writer) = stream.into_split();
            let pending = Arc::new(PendingMap::new());
            let closed = Arc::new(AtomicBool::new(false));
            tokio::spawn(read_replies(read, Arc::clone(&pending), Arc::clone(&closed)));
            *slot = Some(Connection { writer, pending, closed });
        }
        slot.as_mut().ok_or(TransportError::Disconnected)
    }
}

async fn read_replies(read: OwnedReadHalf, pending: Arc<PendingMap>, closed: Arc<AtomicBool>) {
    let mut reader = FramedReader::new(read);
    loop {
        match reader.next::<ResponsePacket>().await {
            Ok(Some(packet)) => deliver(&pending, packet),
            Ok(None) => {
                debug!("message server closed the connection");
                break;
            }
            Err(err) => {
                warn!(error = %err, "reply stream failed");
                break;
            }
        }
    }
    closed.store(true, Ordering::SeqCst);
    fail_pending(&pending);
}

fn deliver(pending: &PendingMap, packet: ResponsePacket) {
    if let Some(message) = packet.error_message() {
        if let Some((_, p)) = pending.remove(&packet.id) {
            let _ = p.tx.send(Err(TransportError::Remote(message)));
        }
        return;
    }
    if !packet.is_disposed {
        if let Some(mut p) = pending.get_mut(&packet.id) {
            p.last = packet.response;
        }
        return;
    }
    match pending.remove(&packet.id) {
        Some((_, p)) => {
            let value = packet.response.or(p.last).unwrap_or(Value::Null);
            let _ = p.tx.send(Ok(value));
        }
        None => debug!(id = %packet.id, "reply for unknown request"),
    }
}

/// Park `tx` under `id`. The reader sets `closed` before draining the map, so
/// a close observed after the insert may have missed this entry.
fn register(
    pending: &PendingMap,
    closed: &AtomicBool,
    id: String,
    tx: oneshot::Sender<Reply>,
) -> Result<(), TransportError> {
    pending.insert(id.clone(), Pending { tx, last: None });
    if closed.load(Ordering::SeqCst) {
        pending.remove(&id);
        return Err(TransportError::Disconnected);
    }
    Ok(())
}

fn fail_pending(pending: &PendingMap) {
    let ids: Vec<String> = pending.iter().map(|e| e.key().clone()).collect();
    for id in ids {
        if let Some((_, p)) = pending.remove(&id) {
            let _ = p.tx.send(Err(TransportError::Disconnected));
        }
    }
}
