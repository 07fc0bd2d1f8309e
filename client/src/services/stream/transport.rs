//! WebSocket transport for the event stream.
//!
//! Each [`WsTransport::open`] spawns one task that owns the socket. The task
//! reports lifecycle and text frames through the sink and takes outbound
//! frames and close requests over an unbounded command channel.

use futures_util::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};
use url::Url;

use crate::core::{Transport, TransportConnection, TransportEvent, TransportSink};

const CLIENT_CLOSE_CODE: u16 = 1000;

#[derive(Debug)]
enum Command {
    Send(String),
    Close,
}

/// [`Transport`] over `tokio-tungstenite`.
#[derive(Debug, Clone)]
pub struct WsTransport {
    runtime: Handle,
}

impl WsTransport {
    pub fn new(runtime: Handle) -> Self {
        Self { runtime }
    }
}

impl Transport for WsTransport {
    fn open(&self, url: &Url, sink: TransportSink) -> Box<dyn TransportConnection> {
        let (commands, receiver) = mpsc::unbounded_channel();
        self.runtime.spawn(run_connection(url.to_string(), sink, receiver));
        Box::new(WsConnection { commands })
    }
}

/// Handle to one spawned socket task. Dropping it closes the socket.
#[derive(Debug)]
pub struct WsConnection {
    commands: UnboundedSender<Command>,
}

impl TransportConnection for WsConnection {
    fn send(&self, text: String) -> bool {
        self.commands.send(Command::Send(text)).is_ok()
    }

    fn close(&self) {
        let _ = self.commands.send(Command::Close);
    }
}

fn closed_by_client() -> TransportEvent {
    TransportEvent::Closed {
        code: Some(CLIENT_CLOSE_CODE),
        reason: "client closed".to_string(),
    }
}

fn failed(sink: &TransportSink, error: String) {
    sink(TransportEvent::Error(error.clone()));
    sink(TransportEvent::Closed {
        code: None,
        reason: error,
    });
}

async fn run_connection(url: String, sink: TransportSink, mut commands: UnboundedReceiver<Command>) {
    // The URL carries the session token; only the host is logged.
    let host = Url::parse(&url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default();
    debug!(host = %host, "WebSocket handshake starting");

    let handshake = connect_async(url.as_str());
    tokio::pin!(handshake);

    let result = loop {
        tokio::select! {
            result = &mut handshake => break result,
            command = commands.recv() => match command {
                Some(Command::Send(_)) => {
                    debug!("Dropping outbound frame queued before handshake completed");
                }
                Some(Command::Close) | None => {
                    debug!(host = %host, "WebSocket closed before handshake completed");
                    sink(closed_by_client());
                    return;
                }
            },
        }
    };

    let ws_stream = match result {
        Ok((ws_stream, response)) => {
            info!(host = %host, status = ?response.status(), "WebSocket connection established");
            ws_stream
        }
        Err(e) => {
            warn!(host = %host, error = %e, "WebSocket handshake failed");
            failed(&sink, e.to_string());
            return;
        }
    };

    sink(TransportEvent::Opened);

    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = read.next() => match frame {
                Some(Ok(Message::Text(text))) => sink(TransportEvent::Message(text)),
                Some(Ok(Message::Ping(payload))) => {
                    if let Err(e) = write.send(Message::Pong(payload)).await {
                        warn!(error = %e, "Failed to answer WebSocket ping");
                    }
                }
                Some(Ok(Message::Close(frame))) => {
                    let (code, reason) = frame
                        .map(|f| (Some(u16::from(f.code)), f.reason.into_owned()))
                        .unwrap_or((None, String::new()));
                    info!(host = %host, code = ?code, reason = %reason, "WebSocket closed by server");
                    sink(TransportEvent::Closed { code, reason });
                    return;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!(host = %host, error = %e, "WebSocket read error");
                    failed(&sink, e.to_string());
                    return;
                }
                None => {
                    info!(host = %host, "WebSocket stream ended");
                    sink(TransportEvent::Closed {
                        code: None,
                        reason: "stream ended".to_string(),
                    });
                    return;
                }
            },
            command = commands.recv() => match command {
                Some(Command::Send(text)) => {
                    if let Err(e) = write.send(Message::Text(text)).await {
                        warn!(host = %host, error = %e, "WebSocket write error");
                        failed(&sink, e.to_string());
                        return;
                    }
                }
                Some(Command::Close) | None => {
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!(error = %e, "Close frame not delivered");
                    }
                    sink(closed_by_client());
                    return;
                }
            },
        }
    }
}
