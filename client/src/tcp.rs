//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Tokio TCP transport and client event loop

use crate::{ClientConfig, ClientResult, SessionHandler, TelnetSession, Transport, TransportEvent};
use bytes::{Bytes, BytesMut};
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

enum WriteCommand {
    Data(Bytes),
    Shutdown,
}

/// TCP [`Transport`] backed by a tokio task
///
/// Must be connected from within a tokio runtime. Progress is delivered on
/// the receiver returned by [`TcpTransport::new`].
pub struct TcpTransport {
    connect_timeout: Duration,
    buffer_size: usize,
    events: mpsc::UnboundedSender<TransportEvent>,
    writer: Option<mpsc::UnboundedSender<WriteCommand>>,
    task: Option<JoinHandle<()>>,
}

impl TcpTransport {
    /// Create an unconnected transport and the receiver for its events
    pub fn new(config: &ClientConfig) -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let transport = Self {
            connect_timeout: config.connect_timeout,
            buffer_size: config.buffer_size.max(1),
            events,
            writer: None,
            task: None,
        };
        (transport, receiver)
    }

    /// True while the connection task is running
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Transport for TcpTransport {
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        if self.writer.is_some() {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "transport already started"));
        }
        let runtime = tokio::runtime::Handle::try_current().map_err(io::Error::other)?;
        let (writer, writes) = mpsc::unbounded_channel();
        let task = runtime.spawn(run_connection(
            host.to_string(),
            port,
            self.connect_timeout,
            self.buffer_size,
            self.events.clone(),
            writes,
        ));
        self.writer = Some(writer);
        self.task = Some(task);
        Ok(())
    }

    fn write(&mut self, data: Bytes) -> io::Result<()> {
        let writer = self
            .writer
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "transport not started"))?;
        writer
            .send(WriteCommand::Data(data))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "connection task has stopped"))
    }

    fn end(&mut self) {
        if let Some(writer) = self.writer.take() {
            if writer.send(WriteCommand::Shutdown).is_err() {
                debug!("Connection task already stopped");
            }
        }
    }
}

fn report(events: &mpsc::UnboundedSender<TransportEvent>, event: TransportEvent) {
    if let Err(err) = events.send(event) {
        debug!("Dropping transport event, receiver is gone: {:?}", err.0);
    }
}

async fn resolve(host: &str, port: u16) -> io::Result<SocketAddr> {
    tokio::net::lookup_host((host, port))
        .await?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no addresses for {host}")))
}

async fn open(host: &str, port: u16, events: &mpsc::UnboundedSender<TransportEvent>) -> io::Result<TcpStream> {
    let address = resolve(host, port).await?;
    report(events, TransportEvent::Lookup(address));
    TcpStream::connect(address).await
}

async fn run_connection(
    host: String,
    port: u16,
    connect_timeout: Duration,
    buffer_size: usize,
    events: mpsc::UnboundedSender<TransportEvent>,
    mut writes: mpsc::UnboundedReceiver<WriteCommand>,
) {
    let stream = match tokio::time::timeout(connect_timeout, open(&host, port, &events)).await {
        Ok(Ok(stream)) => stream,
        Ok(Err(err)) => {
            report(&events, TransportEvent::Error(err.to_string()));
            report(&events, TransportEvent::Closed);
            return;
        }
        Err(_) => {
            report(&events, TransportEvent::Error(format!("connection to {host}:{port} timed out")));
            report(&events, TransportEvent::Closed);
            return;
        }
    };
    report(&events, TransportEvent::Connected);

    let (mut reader, mut writer) = stream.into_split();
    let mut buffer = BytesMut::with_capacity(buffer_size);
    loop {
        tokio::select! {
            read = reader.read_buf(&mut buffer) => match read {
                Ok(0) => {
                    debug!("Peer closed the connection");
                    break;
                }
                Ok(count) => {
                    trace!("Read {} bytes", count);
                    report(&events, TransportEvent::Data(buffer.split().freeze()));
                    buffer.reserve(buffer_size);
                }
                Err(err) => {
                    warn!("Read failed: {}", err);
                    report(&events, TransportEvent::Error(err.to_string()));
                    break;
                }
            },
            command = writes.recv() => match command {
                Some(WriteCommand::Data(data)) => {
                    if let Err(err) = writer.write_all(&data).await {
                        warn!("Write failed: {}", err);
                        report(&events, TransportEvent::Error(err.to_string()));
                        break;
                    }
                }
                Some(WriteCommand::Shutdown) | None => {
                    if let Err(err) = writer.shutdown().await {
                        warn!("Shutdown failed: {}", err);
                    }
                    break;
                }
            },
        }
    }
    report(&events, TransportEvent::Closed);
}

/// Telnet client over TCP
///
/// Pairs a [`TelnetSession`] with a [`TcpTransport`] and pumps transport
/// events into the session.
pub struct TelnetClient<H> {
    config: ClientConfig,
    session: TelnetSession<TcpTransport, H>,
    events: Option<mpsc::UnboundedReceiver<TransportEvent>>,
}

impl<H: SessionHandler> TelnetClient<H> {
    /// Create a client for `config` reporting to `handler`
    pub fn new(config: ClientConfig, handler: H) -> Self {
        Self {
            config,
            session: TelnetSession::new(handler),
            events: None,
        }
    }

    /// Client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying session
    pub fn session(&self) -> &TelnetSession<TcpTransport, H> {
        &self.session
    }

    /// The underlying session, mutably
    pub fn session_mut(&mut self) -> &mut TelnetSession<TcpTransport, H> {
        &mut self.session
    }

    /// Start connecting; must be called within a tokio runtime
    pub fn connect(&mut self) -> ClientResult<()> {
        let (transport, events) = TcpTransport::new(&self.config);
        self.session.connect(&self.config, transport)?;
        self.events = Some(events);
        Ok(())
    }

    /// Wait for the next transport event and apply it to the session
    ///
    /// Returns `Ok(false)` once the connection is gone.
    pub async fn process_next(&mut self) -> ClientResult<bool> {
        let Some(events) = self.events.as_mut() else {
            return Ok(false);
        };
        let Some(event) = events.recv().await else {
            self.events = None;
            return Ok(false);
        };
        let finished = event == TransportEvent::Closed;
        if finished {
            self.events = None;
        }
        self.session.handle_transport_event(event)?;
        Ok(!finished)
    }

    /// Process transport events until the connection is gone
    pub async fn run(&mut self) -> ClientResult<()> {
        while self.process_next().await? {}
        Ok(())
    }
}
