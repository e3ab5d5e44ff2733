use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::select;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::codec::{write_packet, FramedReader};
use crate::error::TransportError;
use crate::packet::{RequestPacket, ResponsePacket};
use crate::pattern::normalize_pattern;
use crate::router::MessageRouter;

/// TCP endpoint answering request packets through a [`MessageRouter`].
pub struct MessageServer {
    listener: TcpListener,
    router: Arc<MessageRouter>,
}

impl MessageServer {
    pub fn new(listener: TcpListener, router: MessageRouter) -> Self {
        Self { listener, router: Arc::new(router) }
    }

    pub async fn bind<A: ToSocketAddrs>(addr: A, router: MessageRouter) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::new(listener, router))
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections until `shutdown` resolves. Open connections keep
    /// running on their own tasks.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), TransportError>
    where
        F: Future<Output = ()> + Send,
    {
        let MessageServer { listener, router } = self;
        tokio::pin!(shutdown);
        info!(
            addr = %listener.local_addr()?,
            patterns = ?router.patterns().collect::<Vec<_>>(),
            "message server listening"
        );

        loop {
            select! {
                _ = &mut shutdown => {
                    info!("message server shutting down");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => spawn_connection(stream, peer, &router),
                    Err(err) => warn!(error = ?err, "failed to accept connection"),
                },
            }
        }
        Ok(())
    }
}

fn spawn_connection(stream: TcpStream, peer: SocketAddr, router: &Arc<MessageRouter>) {
    let router = Arc::clone(router);
    tokio::spawn(async move {
        debug!(%peer, "connection opened");
        match handle_connection(stream, router).await {
            Ok(()) => debug!(%peer, "connection closed"),
            Err(err) => warn!(%peer, error = %err, "connection dropped"),
        }
    });
}

async fn handle_connection(stream: TcpStream, router: Arc<MessageRouter>) -> Result<(), TransportError> {
    let (read, mut write) = stream.into_split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ResponsePacket>();

    let writer = tokio::spawn(async move {
        while let Some(packet) = rx.recv().await {
            write_packet(&mut write, &packet).await?;
        }
        Ok::<_, TransportError>(())
    });

    let mut reader = FramedReader::new(read);
    let result = loop {
        match reader.next::<RequestPacket>().await {
            Ok(Some(packet)) => spawn_dispatch(packet, &router, &tx),
            Ok(None) => break Ok(()),
            Err(err) => break Err(err),
        }
    };

    // The writer drains once every in-flight handler has replied.
    drop(tx);
    match writer.await {
        Ok(Err(err)) => warn!(error = %err, "failed to write reply"),
        Err(err) => warn!(error = %err, "reply writer task failed"),
        Ok(Ok(())) => {}
    }
    result
}

fn spawn_dispatch(packet: RequestPacket, router: &Arc<MessageRouter>, tx: &mpsc::UnboundedSender<ResponsePacket>) {
    let router = Arc::clone(router);
    let tx = tx.clone();
    tokio::spawn(async move {
        let pattern = normalize_pattern(&packet.pattern);
        let outcome = router.dispatch(&pattern, packet.data).await;
        let reply = match (packet.id, outcome) {
            (Some(id), Ok(response)) => ResponsePacket::reply(id, response),
            (Some(id), Err(message)) => {
                warn!(%pattern, error = %message, "message handler failed");
                ResponsePacket::error(id, message)
            }
            (None, Err(message)) => {
                warn!(%pattern, error = %message, "event handler failed");
                return;
            }
            (None, Ok(_)) => return,
        };
        if tx.send(reply).is_err() {
            debug!(%pattern, "connection gone before reply");
        }
    });
}
