//! Minecraft server status probe
//!
//! Speaks the Java edition "Server List Ping" exchange:
//!
//! ```text
//! client -> [len][0x00][proto][host][port][1]   handshake, next state = status
//! client -> [len][0x00]                         status request
//! server -> [len][0x00][json]                   status response
//! ```
//!
//! `len`, packet ids and string lengths are VarInts. Only the player
//! counts and the version name are read from the JSON reply.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use mcpilot_core::{GameProbe, GameStatus};
use serde::Deserialize;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// Default timeout for one status exchange
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Protocol version sent in the handshake; -1 is accepted for status pings
const PROTOCOL_VERSION: i32 = -1;

const PACKET_ID_STATUS: i32 = 0x00;
const NEXT_STATE_STATUS: i32 = 1;

/// Upper bound for a status response frame
const MAX_PACKET_LEN: i32 = 1 << 21;

/// Status JSON sent by the server
#[derive(Debug, Deserialize)]
struct StatusResponse {
    version: Option<VersionInfo>,
    players: PlayersInfo,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlayersInfo {
    max: u32,
    online: u32,
}

impl From<StatusResponse> for GameStatus {
    fn from(response: StatusResponse) -> Self {
        Self {
            players_online: response.players.online,
            players_max: response.players.max,
            version: response.version.map(|v| v.name),
        }
    }
}

/// Append a VarInt (7 bits per byte, little-endian groups)
pub fn write_varint(buf: &mut Vec<u8>, value: i32) {
    let mut value = value as u32;
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

/// Consume a VarInt from the front of `buf`
pub fn decode_varint(buf: &mut &[u8]) -> Result<i32> {
    let mut value: u32 = 0;
    for i in 0..5 {
        let (&byte, rest) = buf
            .split_first()
            .ok_or_else(|| AppError::protocol("truncated VarInt"))?;
        *buf = rest;
        value |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(AppError::protocol("VarInt longer than 5 bytes"))
}

async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32> {
    let mut value: u32 = 0;
    for i in 0..5 {
        let byte = reader.read_u8().await?;
        value |= ((byte & 0x7F) as u32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(value as i32);
        }
    }
    Err(AppError::protocol("VarInt longer than 5 bytes"))
}

fn write_string(buf: &mut Vec<u8>, value: &str) {
    write_varint(buf, value.len() as i32);
    buf.extend_from_slice(value.as_bytes());
}

fn frame(body: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(body.len() + 5);
    write_varint(&mut packet, body.len() as i32);
    packet.extend_from_slice(body);
    packet
}

/// Handshake followed by status request, ready to be written in one go
pub fn status_request(host: &str, port: u16) -> Vec<u8> {
    let mut handshake = Vec::new();
    write_varint(&mut handshake, PACKET_ID_STATUS);
    write_varint(&mut handshake, PROTOCOL_VERSION);
    write_string(&mut handshake, host);
    handshake.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut handshake, NEXT_STATE_STATUS);

    let mut request = Vec::new();
    write_varint(&mut request, PACKET_ID_STATUS);

    let mut out = frame(&handshake);
    out.extend(frame(&request));
    out
}

/// Run one status exchange over an established stream
pub async fn exchange<S>(stream: &mut S, host: &str, port: u16) -> Result<GameStatus>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream.write_all(&status_request(host, port)).await?;
    stream.flush().await?;

    let len = read_varint(stream).await?;
    if len <= 0 || len > MAX_PACKET_LEN {
        return Err(AppError::protocol(format!("invalid packet length {}", len)));
    }
    let mut body = vec![0u8; len as usize];
    stream.read_exact(&mut body).await?;

    let mut cursor = body.as_slice();
    let packet_id = decode_varint(&mut cursor)?;
    if packet_id != PACKET_ID_STATUS {
        return Err(AppError::protocol(format!("unexpected packet id {:#04x}", packet_id)));
    }
    let json_len = decode_varint(&mut cursor)?;
    let json = usize::try_from(json_len)
        .ok()
        .and_then(|n| cursor.get(..n))
        .ok_or_else(|| AppError::protocol("status string exceeds packet"))?;

    let response: StatusResponse = serde_json::from_slice(json)?;
    Ok(response.into())
}

/// TCP status probe with a bounded exchange time
#[derive(Debug, Clone)]
pub struct MinecraftProbe {
    timeout: Duration,
}

impl MinecraftProbe {
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn status(&self, host: &str, port: u16) -> Result<GameStatus> {
        let ping = async {
            let mut stream = TcpStream::connect((host, port)).await?;
            exchange(&mut stream, host, port).await
        };

        let status = tokio::time::timeout(self.timeout, ping)
            .await
            .map_err(|_| AppError::Timeout(self.timeout))??;

        debug!(
            host = %host,
            port,
            online = status.players_online,
            max = status.players_max,
            "Status ping answered"
        );
        Ok(status)
    }
}

impl Default for MinecraftProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GameProbe for MinecraftProbe {
    async fn query(&self, host: &str, port: u16) -> mcpilot_core::Result<GameStatus> {
        Ok(self.status(host, port).await?)
    }
}
