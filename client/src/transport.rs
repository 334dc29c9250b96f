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

//! Transport abstraction beneath a session

use bytes::Bytes;
use std::io;
use std::net::SocketAddr;

/// Byte-stream transport driven by a [`crate::TelnetSession`]
///
/// Operations start work and return; progress is reported back to the
/// session as [`TransportEvent`] values through
/// [`crate::TelnetSession::handle_transport_event`].
pub trait Transport {
    /// Begin connecting to `host:port`
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()>;

    /// Queue bytes for the peer, exactly as given
    fn write(&mut self, data: Bytes) -> io::Result<()>;

    /// Flush pending writes and close
    fn end(&mut self);
}

/// Progress reports from a [`Transport`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TransportEvent {
    /// Name resolution finished
    Lookup(SocketAddr),
    /// Connection established
    Connected,
    /// Bytes arrived from the peer
    Data(Bytes),
    /// The transport failed; a [`TransportEvent::Closed`] follows
    Error(String),
    /// The transport is closed
    Closed,
}
