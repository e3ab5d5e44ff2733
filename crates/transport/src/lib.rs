//! Request/reply messaging over TCP, keyed by message patterns.
//!
//! Frames are `<byte-length>#<json>`. A client sends
//! `{pattern, data, id}` and the server answers
//! `{id, response | err, isDisposed}`; replies are correlated by `id`.

pub mod client;
pub mod codec;
pub mod error;
pub mod packet;
pub mod pattern;
pub mod router;
pub mod server;

pub use client::ClientProxy;
pub use error::TransportError;
pub use packet::{RequestPacket, ResponsePacket};
pub use pattern::normalize_pattern;
pub use router::{MessageRouter, NO_MATCHING_HANDLER};
pub use server::MessageServer;
