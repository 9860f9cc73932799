use std::io::ErrorKind;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::BytesMut;
use tokio::net::{TcpStream, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::{DriverConfig, RetryPolicy};
use crate::error::{NeatoError, Result};
use crate::frame::{split_datagram, write_command, Responses};

/// The two sockets of a Neato session.
///
/// Commands go out as newline-terminated ASCII on the control stream; the
/// robot's responses arrive as datagrams on the telemetry socket. Nothing is
/// ever read back from the control stream.
pub struct Connection {
    control: TcpStream,
    telemetry: UdpSocket,
    telemetry_addr: SocketAddr,
    read_timeout: Duration,
    max_datagram: usize,
    buf: BytesMut,
}

impl Connection {
    /// Connect the control stream, retrying per `config.retry`, then bind telemetry.
    ///
    /// Cancelling `cancel` aborts the connect loop with [`NeatoError::ConnectCancelled`].
    pub async fn open(config: &DriverConfig, cancel: &CancellationToken) -> Result<Self> {
        let addr = config.control_addr();
        info!("Connecting to Neato at {addr}");
        let control = connect_control(&addr, &config.retry, cancel).await?;

        let telemetry = UdpSocket::bind(config.telemetry_addr()).await?;
        let conn = Self::from_parts(control, telemetry, config)?;
        info!(telemetry = %conn.telemetry_addr, "Connected to Neato");
        Ok(conn)
    }

    /// Build a connection from already-established sockets.
    pub fn from_parts(control: TcpStream, telemetry: UdpSocket, config: &DriverConfig) -> Result<Self> {
        control.set_nodelay(true)?;
        let telemetry_addr = telemetry.local_addr()?;
        Ok(Self {
            control,
            telemetry,
            telemetry_addr,
            read_timeout: config.telemetry_timeout(),
            max_datagram: config.max_datagram,
            buf: BytesMut::with_capacity(config.max_datagram),
        })
    }

    /// Local address the telemetry socket is bound to.
    pub fn telemetry_addr(&self) -> SocketAddr {
        self.telemetry_addr
    }

    /// Write one command to the control stream without waiting for any reply.
    pub async fn send_command(&mut self, command: &str) -> Result<()> {
        debug!("Sending {command:?}");
        write_command(&mut self.control, command)
            .await
            .map_err(|e| match e {
                NeatoError::Io(io)
                    if matches!(io.kind(), ErrorKind::BrokenPipe | ErrorKind::ConnectionReset) =>
                {
                    NeatoError::Disconnected(format!("Control channel closed: {io}"))
                }
                other => other,
            })
    }

    /// Wait briefly for one telemetry datagram and split it into responses.
    ///
    /// No datagram within the read timeout is not an error: the result is empty.
    pub async fn poll_telemetry(&mut self) -> Result<Responses> {
        self.buf.clear();
        self.buf.reserve(self.max_datagram);

        let received =
            tokio::time::timeout(self.read_timeout, self.telemetry.recv_buf_from(&mut self.buf)).await;
        match received {
            Ok(Ok((n, src))) => {
                trace!(remote = %src, bytes = n, "Received telemetry datagram");
                Ok(split_datagram(&self.buf[..n]))
            }
            Ok(Err(e)) => Err(NeatoError::Io(e)),
            Err(_) => {
                trace!(timeout_ms = self.read_timeout.as_millis(), "No telemetry this cycle");
                Ok(Responses::new())
            }
        }
    }
}

/// Connect and wait for the control stream to become writable.
async fn connect_control(addr: &str, retry: &RetryPolicy, cancel: &CancellationToken) -> Result<TcpStream> {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        let attempt = async {
            let stream = TcpStream::connect(addr).await?;
            stream.writable().await?;
            Ok::<_, std::io::Error>(stream)
        };

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(NeatoError::ConnectCancelled),
            outcome = attempt => outcome,
        };
        match outcome {
            Ok(stream) => return Ok(stream),
            Err(e) => warn!(addr, attempt = attempts, error = %e, "Control channel not ready"),
        }

        if retry.max_attempts.is_some_and(|max| attempts >= max) {
            return Err(NeatoError::ConnectExhausted { attempts });
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(NeatoError::ConnectCancelled),
            _ = tokio::time::sleep(retry.interval()) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Command;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    fn test_config(port: u16) -> DriverConfig {
        DriverConfig {
            control_port: port,
            telemetry_bind: "127.0.0.1".into(),
            telemetry_port: 0,
            retry: RetryPolicy {
                interval_ms: 10,
                max_attempts: Some(2),
            },
            ..DriverConfig::default()
        }
    }

    /// A port nothing listens on.
    async fn closed_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap().port()
    }

    #[tokio::test]
    async fn test_open_send_and_poll() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = test_config(listener.local_addr().unwrap().port());

        let server = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 12];
            stream.read_exact(&mut buf).await.unwrap();
            buf
        });

        let mut conn = Connection::open(&config, &CancellationToken::new()).await.unwrap();
        conn.send_command("testmode on").await.unwrap();
        assert_eq!(server.await.unwrap(), b"testmode on\n");

        let robot = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        robot
            .send_to(b"getaccel\r\nLabel,Value\r\nXInG,0.1\r\n\x1a", conn.telemetry_addr())
            .await
            .unwrap();

        let mut responses = Responses::new();
        for _ in 0..50 {
            responses = conn.poll_telemetry().await.unwrap();
            if !responses.is_empty() {
                break;
            }
        }
        assert!(responses.get(Command::GetAccel).is_some());
    }

    #[tokio::test]
    async fn test_poll_timeout_is_empty() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = test_config(listener.local_addr().unwrap().port());
        let mut conn = Connection::open(&config, &CancellationToken::new()).await.unwrap();

        let responses = conn.poll_telemetry().await.unwrap();
        assert!(responses.is_empty());
    }

    #[tokio::test]
    async fn test_connect_gives_up() {
        let config = test_config(closed_port().await);
        let result = Connection::open(&config, &CancellationToken::new()).await;
        assert!(matches!(result, Err(NeatoError::ConnectExhausted { attempts: 2 })));
    }

    #[tokio::test]
    async fn test_connect_cancelled() {
        let mut config = test_config(closed_port().await);
        config.retry = RetryPolicy::unbounded();

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let result = Connection::open(&config, &cancel).await;
        assert!(matches!(result, Err(NeatoError::ConnectCancelled)));
    }
}
