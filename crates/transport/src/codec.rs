//! `<byte-length>#<json>` framing.

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::TransportError;

const DELIMITER: u8 = b'#';
/// Longest accepted length prefix, in digits.
const MAX_PREFIX_DIGITS: usize = 20;
/// Largest accepted frame body, in bytes.
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;
const READ_CHUNK: usize = 8 * 1024;

pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, TransportError> {
    let json = serde_json::to_vec(message)?;
    let mut out = format!("{}{}", json.len(), DELIMITER as char).into_bytes();
    out.extend_from_slice(&json);
    Ok(out)
}

pub async fn write_packet<W, T>(writer: &mut W, message: &T) -> Result<(), TransportError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let encoded = encode(message)?;
    writer.write_all(&encoded).await?;
    writer.flush().await?;
    Ok(())
}

/// Incremental decoder; bytes may arrive in arbitrary chunks.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Next complete frame body, `None` when more bytes are needed.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, TransportError> {
        let Some(hash) = self.buffer.iter().position(|b| *b == DELIMITER) else {
            if self.buffer.len() > MAX_PREFIX_DIGITS || !self.buffer.iter().all(u8::is_ascii_digit) {
                return Err(self.corrupted(self.buffer.len()));
            }
            return Ok(None);
        };

        let prefix = &self.buffer[..hash];
        if prefix.is_empty() || prefix.len() > MAX_PREFIX_DIGITS || !prefix.iter().all(u8::is_ascii_digit) {
            return Err(self.corrupted(hash));
        }
        let len: usize = std::str::from_utf8(prefix)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| self.corrupted(hash))?;
        if len > MAX_FRAME_LEN {
            return Err(TransportError::CorruptedFrame(format!(
                "frame of {len} bytes exceeds the {MAX_FRAME_LEN} byte limit"
            )));
        }

        let start = hash + 1;
        let end = start
            .checked_add(len)
            .ok_or_else(|| self.corrupted(hash))?;
        if self.buffer.len() < end {
            return Ok(None);
        }
        let frame = self.buffer[start..end].to_vec();
        self.buffer.drain(..end);
        Ok(Some(frame))
    }

    fn corrupted(&self, upto: usize) -> TransportError {
        let shown = &self.buffer[..upto.min(MAX_PREFIX_DIGITS + 1)];
        TransportError::CorruptedFrame(format!(
            "invalid length prefix {:?}",
            String::from_utf8_lossy(shown)
        ))
    }
}

/// Typed packet reader over any byte stream.
pub struct FramedReader<R> {
    reader: R,
    decoder: FrameDecoder,
}

impl<R: AsyncRead + Unpin> FramedReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, decoder: FrameDecoder::new() }
    }

    /// Next packet, or `None` once the peer closed the stream. A trailing
    /// partial frame at EOF is discarded.
    pub async fn next<T: DeserializeOwned>(&mut self) -> Result<Option<T>, TransportError> {
        let mut chunk = vec![0u8; READ_CHUNK];
        loop {
            if let Some(frame) = self.decoder.next_frame()? {
                return Ok(Some(serde_json::from_slice(&frame)?));
            }
            let n = self.reader.read(&mut chunk).await?;
            if n == 0 {
                return Ok(None);
            }
            self.decoder.extend(&chunk[..n]);
        }
    }
}
