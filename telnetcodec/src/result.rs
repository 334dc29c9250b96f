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

use crate::TelnetOption;
use thiserror::Error;

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Fatal errors raised by the codec.
///
/// Every variant signals a broken stream or a caller bug. The engine stops
/// processing the stream after returning one of these; protocol problems the
/// stream can recover from are reported as [`crate::TelnetEvent::Error`]
/// instead.
#[derive(Debug, Error)]
pub enum CodecError {
    /// An I/O error surfaced through the `tokio_util` codec adapter.
    #[error("I/O error: {0}")]
    IOError(#[from] std::io::Error),

    /// `ChunkBuffer::get` was called with an index past the logical end.
    #[error("index {index} out of range for buffer of length {length}")]
    OutOfRange {
        /// Requested logical index
        index: usize,
        /// Logical length of the buffer
        length: usize,
    },

    /// `ChunkBuffer::trim` was asked to remove more bytes than are buffered.
    #[error("cannot trim {requested} bytes from buffer of length {available}")]
    TrimOutOfRange {
        /// Number of bytes requested
        requested: usize,
        /// Number of bytes buffered
        available: usize,
    },

    /// An escape byte reached `unescape` without its doubled partner.
    #[error("unpaired IAC at offset {offset} in escaped data")]
    UnpairedEscape {
        /// Offset of the lone escape byte in the escaped input
        offset: usize,
    },

    /// An unknown or invalid telnet command byte followed IAC.
    #[error("Unknown telnet command: 0x{0:02X}")]
    UnknownCommand(u8),

    /// Something other than IAC or SE followed IAC inside a subnegotiation.
    #[error("expected IAC or SE after IAC in subnegotiation, got 0x{0:02X}")]
    InvalidSubnegotiationEnd(u8),

    /// `IAC SB IAC SE` carried no option byte.
    #[error("subnegotiation carried no option byte")]
    EmptySubnegotiation,

    /// WILL/DO/WONT/DONT arrived for an option whose negotiation already finished.
    #[error("renegotiation of option {0} is not supported")]
    Renegotiation(TelnetOption),

    /// Data was still pending when a WILL/DO option byte was reached.
    #[error("{length} bytes of undelivered data pending at option negotiation")]
    PendingData {
        /// Number of pending bytes
        length: usize,
    },

    /// The engine was fed after a previous fatal error.
    #[error("engine stopped after a previous fatal error")]
    Poisoned,
}
