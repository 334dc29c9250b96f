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

//! # Telnex Telnet Protocol Engine
//!
//! This crate provides an incremental, sans-I/O implementation of the Telnet protocol
//! (RFC 854) receive path. It consumes raw bytes in whatever chunks the transport
//! delivers them and turns them into a well ordered stream of [`TelnetEvent`]s, and it
//! provides the matching escaping for outbound data.
//!
//! ## Core Components
//!
//! ### [`TelnetEngine`]
//!
//! The byte driven state machine. Control sequences split across chunk boundaries are
//! reassembled transparently; plain data is delivered in as few events as possible and
//! without copying when a chunk holds nothing to unescape.
//!
//! ### [`ChunkBuffer`]
//!
//! An append/trim aggregator of [`bytes::Bytes`] chunks used by the engine to hold
//! unclassified bytes across calls without copying them.
//!
//! ### [`escape`]
//!
//! IAC doubling for outbound data and the inverse collapse for inbound data.
//!
//! ### [`OptionTable`]
//!
//! Per-connection record of option negotiation. Options are opaque numbers
//! ([`TelnetOption`]); a WILL/DO proposes, a second WILL/DO confirms, and a WONT/DONT
//! refuses with immediate effect.
//!
//! ### [`TelnetCodec`]
//!
//! The engine wrapped as a `tokio_util` [`Decoder`](tokio_util::codec::Decoder) and
//! [`Encoder`](tokio_util::codec::Encoder).
//!
//! ## Usage Example
//!
//! ```rust
//! use bytes::Bytes;
//! use telnex_codec::{TelnetEngine, TelnetEvent, TelnetOption, escape};
//!
//! let mut engine = TelnetEngine::new();
//! let mut events = Vec::new();
//!
//! // Data, IAC WILL ECHO, then a subnegotiation split over two reads.
//! engine.feed(Bytes::from_static(b"Hi\xFF\xFB\x01\xFF\xFA\x01ab"), &mut events).unwrap();
//! engine.feed(Bytes::from_static(b"\xFF\xF0"), &mut events).unwrap();
//!
//! assert_eq!(events[0], TelnetEvent::Data(Bytes::from_static(b"Hi")));
//! assert_eq!(events[1], TelnetEvent::OptionRequested(TelnetOption::ECHO));
//! assert_eq!(
//!     events.last(),
//!     Some(&TelnetEvent::Subnegotiation(TelnetOption::ECHO, Bytes::from_static(b"ab")))
//! );
//!
//! // Outbound data must be escaped before it is written.
//! assert_eq!(escape::escape(Bytes::from_static(b"\xFF")), Bytes::from_static(b"\xFF\xFF"));
//! ```
//!
//! ## Error Handling
//!
//! Protocol problems the stream can survive (unimplemented commands, subnegotiation of an
//! option that has not finished negotiating) are reported in-band as
//! [`TelnetEvent::Error`]. Broken streams and caller bugs are returned as [`CodecError`];
//! after one the engine refuses further input until it is reset.
//!
//! ## Thread Safety
//!
//! Nothing here is shared. Each connection owns its own engine and serializes calls into it.

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod buffer;
mod codec;
mod command;
pub mod consts;
mod engine;
pub mod escape;
mod event;
mod options;
mod result;

pub use self::buffer::ChunkBuffer;
pub use self::codec::TelnetCodec;
pub use self::command::TelnetCommand;
pub use self::engine::{EngineState, TelnetEngine};
pub use self::event::{ProtocolWarning, TelnetEvent};
pub use self::options::{NegotiationState, OptionEntry, OptionTable, TelnetOption};
pub use self::result::{CodecError, CodecResult};
