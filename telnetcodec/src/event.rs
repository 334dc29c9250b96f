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

use crate::{TelnetCommand, TelnetOption};
use bytes::Bytes;
use thiserror::Error;

///
/// `TelnetEvent` is what the engine reports while classifying the inbound
/// stream. Events come out in the order their bytes appear on the wire.
///
#[derive(Clone, Debug, PartialEq)]
pub enum TelnetEvent {
    /// A run of plain data, already unescaped.
    Data(Bytes),
    /// The peer sent Are You There.
    AreYouThere,
    /// The peer sent Go Ahead.
    GoAhead,
    /// The peer proposed an option with WILL/DO.
    OptionRequested(TelnetOption),
    /// The peer confirmed a proposed option with a second WILL/DO.
    OptionAccepted(TelnetOption),
    /// The peer refused an option with WONT/DONT.
    OptionRejected(TelnetOption),
    /// Subnegotiation Payload, already unescaped, without the option byte.
    Subnegotiation(TelnetOption, Bytes),
    /// A protocol problem the stream recovered from.
    Error(ProtocolWarning),
}

/// Protocol problems that are reported but do not stop the stream.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ProtocolWarning {
    /// A valid single byte command this engine does not act on.
    #[error("command not implemented: {0}")]
    CommandNotImplemented(TelnetCommand),
    /// Subnegotiation arrived before the option finished negotiating.
    #[error("sub-negotiation received before negotiation completed for option {0}")]
    NegotiationIncomplete(TelnetOption),
}
