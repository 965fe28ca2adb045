//! Discord Rich Presence over local IPC
//!
//! The Discord desktop client listens on a Unix domain socket
//! (`$XDG_RUNTIME_DIR/discord-ipc-N`) or a Windows named pipe
//! (`\\.\pipe\discord-ipc-N`) for N in `0..10`.
//!
//! ## Wire format
//!
//! ```text
//! +-----------+-----------+---------------------+
//! | opcode    | length    | JSON payload        |
//! | u32 LE    | u32 LE    | `length` bytes      |
//! +-----------+-----------+---------------------+
//! ```
//!
//! A session starts with a `HANDSHAKE` frame carrying the application ID and
//! is ready once the client dispatches `READY`. Activity updates are
//! `SET_ACTIVITY` commands correlated by nonce.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    presence::{Activity, PresenceTransport},
};
use core_async::sync::Mutex;
use core_async::time::{self, Duration};
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Frame header size: opcode + length
pub const HEADER_LEN: usize = 8;

/// Upper bound on a single inbound payload
const MAX_FRAME_LEN: usize = 1 << 20;

const RPC_VERSION: u32 = 1;
const PIPE_COUNT: u32 = 10;

/// IPC frame opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Handshake,
    Frame,
    Close,
    Ping,
    Pong,
}

impl Opcode {
    pub fn code(self) -> u32 {
        match self {
            Opcode::Handshake => 0,
            Opcode::Frame => 1,
            Opcode::Close => 2,
            Opcode::Ping => 3,
            Opcode::Pong => 4,
        }
    }

    pub fn from_code(code: u32) -> Result<Self> {
        match code {
            0 => Ok(Opcode::Handshake),
            1 => Ok(Opcode::Frame),
            2 => Ok(Opcode::Close),
            3 => Ok(Opcode::Ping),
            4 => Ok(Opcode::Pong),
            other => Err(BridgeError::OperationFailed(format!(
                "Unknown IPC opcode {}",
                other
            ))),
        }
    }
}

/// Serialize one frame
pub fn encode_frame(opcode: Opcode, payload: &Value) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(payload)
        .map_err(|e| BridgeError::OperationFailed(format!("Failed to encode payload: {}", e)))?;
    let len = u32::try_from(body.len())
        .map_err(|_| BridgeError::OperationFailed("Payload too large".to_string()))?;

    let mut frame = Vec::with_capacity(HEADER_LEN + body.len());
    frame.extend_from_slice(&opcode.code().to_le_bytes());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Parse a frame header into opcode and payload length
pub fn decode_header(header: [u8; HEADER_LEN]) -> Result<(Opcode, usize)> {
    let opcode = Opcode::from_code(u32::from_le_bytes([
        header[0], header[1], header[2], header[3],
    ]))?;
    let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]) as usize;

    if len > MAX_FRAME_LEN {
        return Err(BridgeError::OperationFailed(format!(
            "IPC frame of {} bytes exceeds limit",
            len
        )));
    }

    Ok((opcode, len))
}

/// Write one frame and flush
pub async fn write_frame<W>(writer: &mut W, opcode: Opcode, payload: &Value) -> Result<()>
where
    W: AsyncWrite + Unpin + ?Sized,
{
    let frame = encode_frame(opcode, payload)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one complete frame
pub async fn read_frame<R>(reader: &mut R) -> Result<(Opcode, Value)>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).await?;
    let (opcode, len) = decode_header(header)?;

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;

    let payload = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| BridgeError::OperationFailed(format!("Malformed IPC payload: {}", e)))?
    };

    Ok((opcode, payload))
}

/// Byte stream to the Discord client
pub trait IpcStream: AsyncRead + AsyncWrite + Send + Unpin {}

impl<T> IpcStream for T where T: AsyncRead + AsyncWrite + Send + Unpin {}

#[derive(Debug, Default, Deserialize)]
struct RpcMessage {
    #[serde(default)]
    cmd: Option<String>,
    #[serde(default)]
    evt: Option<String>,
    #[serde(default)]
    nonce: Option<String>,
    #[serde(default)]
    data: Value,
    /// CLOSE frames carry their reason at the top level
    #[serde(default)]
    message: Option<String>,
}

impl RpcMessage {
    fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }

    fn error_message(&self) -> String {
        self.data
            .get("message")
            .and_then(Value::as_str)
            .or(self.message.as_deref())
            .unwrap_or("unknown error")
            .to_string()
    }
}

/// An established, handshaken IPC session
pub struct IpcConnection {
    stream: Box<dyn IpcStream>,
}

impl IpcConnection {
    /// Perform the handshake and wait for `READY`
    pub async fn handshake(stream: Box<dyn IpcStream>, client_id: &str) -> Result<Self> {
        let mut conn = Self { stream };
        conn.send(
            Opcode::Handshake,
            &json!({ "v": RPC_VERSION, "client_id": client_id }),
        )
        .await?;

        loop {
            let (opcode, payload) = conn.recv().await?;
            let message = RpcMessage::from_value(&payload);
            match opcode {
                Opcode::Frame if message.evt.as_deref() == Some("READY") => {
                    trace!("IPC handshake complete");
                    return Ok(conn);
                }
                Opcode::Frame if message.evt.as_deref() == Some("ERROR") => {
                    return Err(BridgeError::OperationFailed(message.error_message()));
                }
                Opcode::Close => {
                    return Err(BridgeError::NotAvailable(format!(
                        "Discord closed the connection: {}",
                        message.error_message()
                    )));
                }
                Opcode::Ping => conn.send(Opcode::Pong, &payload).await?,
                _ => trace!(?opcode, "Ignoring frame before READY"),
            }
        }
    }

    /// Send `SET_ACTIVITY` and wait for the matching reply
    pub async fn set_activity(&mut self, activity: &Activity) -> Result<()> {
        let nonce = Uuid::new_v4().to_string();
        let payload = json!({
            "cmd": "SET_ACTIVITY",
            "args": {
                "pid": std::process::id(),
                "activity": activity,
            },
            "nonce": nonce,
        });

        self.send(Opcode::Frame, &payload).await?;

        loop {
            let (opcode, payload) = self.recv().await?;
            let message = RpcMessage::from_value(&payload);
            match opcode {
                Opcode::Frame if message.evt.as_deref() == Some("ERROR") => {
                    return Err(BridgeError::OperationFailed(message.error_message()));
                }
                Opcode::Frame if message.nonce.as_deref() == Some(nonce.as_str()) => {
                    trace!(cmd = ?message.cmd, "Activity acknowledged");
                    return Ok(());
                }
                Opcode::Close => {
                    return Err(BridgeError::NotAvailable(format!(
                        "Discord closed the connection: {}",
                        message.error_message()
                    )));
                }
                Opcode::Ping => self.send(Opcode::Pong, &payload).await?,
                _ => trace!(?opcode, "Ignoring unrelated frame"),
            }
        }
    }

    /// Send `CLOSE` and shut the stream down
    pub async fn close(mut self) -> Result<()> {
        self.send(Opcode::Close, &json!({})).await?;
        self.stream.shutdown().await?;
        Ok(())
    }

    async fn send(&mut self, opcode: Opcode, payload: &Value) -> Result<()> {
        write_frame(&mut self.stream, opcode, payload).await
    }

    async fn recv(&mut self) -> Result<(Opcode, Value)> {
        read_frame(&mut self.stream).await
    }
}

/// Discord presence transport
///
/// The session is opened by [`PresenceTransport::connect`] and held until
/// [`PresenceTransport::close`] or an I/O failure. Every call is bounded by
/// the configured timeout.
pub struct DiscordIpcTransport {
    client_id: String,
    timeout: Duration,
    #[cfg(unix)]
    socket_dirs: Vec<PathBuf>,
    connection: Mutex<Option<IpcConnection>>,
}

impl DiscordIpcTransport {
    pub fn new(client_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client_id: client_id.into(),
            timeout,
            #[cfg(unix)]
            socket_dirs: default_socket_dirs(),
            connection: Mutex::new(None),
        }
    }

    /// Search these directories for `discord-ipc-N` instead of the defaults
    #[cfg(unix)]
    pub fn with_socket_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.socket_dirs = dirs;
        self
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    async fn bounded<T, F>(&self, operation: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        time::timeout(self.timeout, fut).await.map_err(|_| {
            BridgeError::Timeout(format!(
                "Discord {} timed out after {:?}",
                operation, self.timeout
            ))
        })?
    }

    #[cfg(unix)]
    async fn open_stream(&self) -> Result<Box<dyn IpcStream>> {
        for path in socket_candidates(&self.socket_dirs) {
            match tokio::net::UnixStream::connect(&path).await {
                Ok(stream) => {
                    debug!(path = %path.display(), "Opened Discord IPC socket");
                    return Ok(Box::new(stream));
                }
                Err(e) => trace!(path = %path.display(), error = %e, "IPC socket unavailable"),
            }
        }

        Err(BridgeError::NotAvailable(
            "No Discord IPC socket found (is Discord running?)".to_string(),
        ))
    }

    #[cfg(windows)]
    async fn open_stream(&self) -> Result<Box<dyn IpcStream>> {
        use tokio::net::windows::named_pipe::ClientOptions;

        for index in 0..PIPE_COUNT {
            let name = format!(r"\\.\pipe\discord-ipc-{}", index);
            match ClientOptions::new().open(&name) {
                Ok(pipe) => {
                    debug!(pipe = %name, "Opened Discord IPC pipe");
                    return Ok(Box::new(pipe));
                }
                Err(e) => trace!(pipe = %name, error = %e, "IPC pipe unavailable"),
            }
        }

        Err(BridgeError::NotAvailable(
            "No Discord IPC pipe found (is Discord running?)".to_string(),
        ))
    }

    #[cfg(not(any(unix, windows)))]
    async fn open_stream(&self) -> Result<Box<dyn IpcStream>> {
        Err(BridgeError::NotAvailable(
            "Discord IPC is not supported on this platform".to_string(),
        ))
    }
}

#[async_trait]
impl PresenceTransport for DiscordIpcTransport {
    async fn connect(&self) -> Result<()> {
        let mut guard = self.connection.lock().await;
        if guard.is_some() {
            return Ok(());
        }

        let conn = self
            .bounded("handshake", async {
                let stream = self.open_stream().await?;
                IpcConnection::handshake(stream, &self.client_id).await
            })
            .await?;

        info!(client_id = %self.client_id, "Discord IPC session established");
        *guard = Some(conn);
        Ok(())
    }

    async fn set_activity(&self, activity: &Activity) -> Result<()> {
        let mut guard = self.connection.lock().await;
        let conn = guard
            .as_mut()
            .ok_or_else(|| BridgeError::NotAvailable("Not connected to Discord".to_string()))?;

        let result = self
            .bounded("set activity", conn.set_activity(activity))
            .await;

        // A rejected payload leaves the session usable; anything else does not
        if result.as_ref().is_err_and(BridgeError::is_connection_lost) {
            *guard = None;
        }

        result
    }

    async fn close(&self) -> Result<()> {
        let Some(conn) = self.connection.lock().await.take() else {
            return Ok(());
        };

        self.bounded("close", conn.close()).await
    }
}

/// Directories searched for the IPC socket, in order
#[cfg(unix)]
pub fn default_socket_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"]
        .iter()
        .filter_map(|key| std::env::var_os(key))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .collect();
    dirs.push(PathBuf::from("/tmp"));
    dirs.dedup();
    dirs
}

/// Every candidate socket path under `dirs`, including sandboxed installs
#[cfg(unix)]
pub fn socket_candidates(dirs: &[PathBuf]) -> Vec<PathBuf> {
    const SUBDIRS: &[&str] = &[
        "",
        "app/com.discordapp.Discord",
        "snap.discord",
        "snap.discord-canary",
    ];

    let mut candidates = Vec::new();
    for dir in dirs {
        for sub in SUBDIRS {
            let base = if sub.is_empty() { dir.clone() } else { dir.join(sub) };
            for index in 0..PIPE_COUNT {
                candidates.push(base.join(format!("discord-ipc-{}", index)));
            }
        }
    }
    candidates
}
