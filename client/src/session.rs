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

//! Telnet session over a [`Transport`]

use crate::{ClientConfig, ClientError, ClientResult, SessionEvent, SessionHandler, Transport, TransportEvent};
use bytes::Bytes;
use telnex_codec::escape::escape;
use telnex_codec::{TelnetEngine, TelnetEvent, TelnetOption};
use tracing::{debug, error, info, warn};

/// A Telnet session
///
/// Owns the protocol engine and at most one transport. Inbound chunks run
/// through the engine and the resulting events reach the handler in wire
/// order. Outbound data is escaped before it reaches the transport.
pub struct TelnetSession<T, H> {
    transport: Option<T>,
    connected: bool,
    engine: TelnetEngine,
    handler: H,
    events: Vec<TelnetEvent>,
}

impl<T: Transport, H: SessionHandler> TelnetSession<T, H> {
    /// Create a detached session reporting to `handler`
    pub fn new(handler: H) -> Self {
        Self {
            transport: None,
            connected: false,
            engine: TelnetEngine::new(),
            handler,
            events: Vec::new(),
        }
    }

    /// The event handler
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// The event handler, mutably
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// The attached transport, if any
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// The protocol engine, for inspecting negotiated options
    pub fn engine(&self) -> &TelnetEngine {
        &self.engine
    }

    /// True once the transport reported [`TransportEvent::Connected`] and
    /// until the session closes
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Attach `transport` and start connecting it to `config.host:config.port`
    pub fn connect(&mut self, config: &ClientConfig, mut transport: T) -> ClientResult<()> {
        if self.transport.is_some() {
            return Err(ClientError::AlreadyConnected);
        }
        if config.host.is_empty() {
            return Err(ClientError::InvalidArgument("host must be a non-empty string"));
        }
        if config.port == 0 {
            return Err(ClientError::InvalidArgument("port must be a positive integer"));
        }
        info!("Connecting to {}", config.address());
        transport.connect(&config.host, config.port)?;
        self.engine.reset();
        self.transport = Some(transport);
        Ok(())
    }

    /// End the transport and detach it
    ///
    /// Valid while connecting or connected. The handler sees exactly one
    /// close; transport events arriving afterwards are ignored.
    pub fn close(&mut self) -> ClientResult<()> {
        let Some(mut transport) = self.transport.take() else {
            return Err(ClientError::NotConnected);
        };
        debug!("Closing session");
        transport.end();
        self.detach();
        Ok(())
    }

    /// Escape `data` and write it to the transport
    pub fn send(&mut self, data: impl Into<Bytes>) -> ClientResult<()> {
        let transport = self.connected_transport()?;
        transport.write(escape(data.into()))?;
        Ok(())
    }

    /// Propose `option` to the peer. Not implemented.
    pub fn request_option(&mut self, option: TelnetOption) -> ClientResult<()> {
        self.connected_transport()?;
        debug!("Option request for {} is not supported", option);
        Err(ClientError::NotImplemented("request_option"))
    }

    /// Refuse `option`. Not implemented.
    pub fn reject_option(&mut self, option: TelnetOption) -> ClientResult<()> {
        self.connected_transport()?;
        debug!("Option rejection for {} is not supported", option);
        Err(ClientError::NotImplemented("reject_option"))
    }

    /// Send a sub-negotiation for `option`. Not implemented.
    pub fn subnegotiate_option(&mut self, option: TelnetOption, _data: Bytes) -> ClientResult<()> {
        self.connected_transport()?;
        debug!("Sub-negotiation for {} is not supported", option);
        Err(ClientError::NotImplemented("subnegotiate_option"))
    }

    /// Apply a progress report from the attached transport
    ///
    /// A fatal protocol error is reported to the handler, closes the session
    /// and is returned.
    pub fn handle_transport_event(&mut self, event: TransportEvent) -> ClientResult<()> {
        if self.transport.is_none() {
            debug!("Ignoring {:?} on a detached session", event);
            return Ok(());
        }
        match event {
            TransportEvent::Lookup(address) => {
                debug!("Resolved peer address {}", address);
            }
            TransportEvent::Connected => {
                info!("Connected");
                self.connected = true;
                self.handler.on_event(SessionEvent::Connect);
            }
            TransportEvent::Data(chunk) => return self.receive(chunk),
            TransportEvent::Error(message) => {
                error!("Transport error: {}", message);
                self.handler.on_event(SessionEvent::Error(message));
            }
            TransportEvent::Closed => {
                info!("Connection closed by transport");
                self.transport = None;
                self.detach();
            }
        }
        Ok(())
    }

    fn receive(&mut self, chunk: Bytes) -> ClientResult<()> {
        let result = self.engine.feed(chunk, &mut self.events);
        for event in self.events.drain(..) {
            self.handler.on_event(event.into());
        }
        if let Err(err) = result {
            warn!("Closing session after protocol error: {}", err);
            self.handler.on_event(SessionEvent::Error(err.to_string()));
            self.close()?;
            return Err(err.into());
        }
        Ok(())
    }

    fn connected_transport(&mut self) -> ClientResult<&mut T> {
        if !self.connected {
            return Err(ClientError::NotConnected);
        }
        self.transport.as_mut().ok_or(ClientError::NotConnected)
    }

    fn detach(&mut self) {
        self.connected = false;
        self.engine.reset();
        self.handler.on_event(SessionEvent::Close);
    }
}
