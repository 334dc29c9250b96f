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

use crate::{
    ChunkBuffer, CodecError, CodecResult, OptionTable, ProtocolWarning, TelnetCommand,
    TelnetEvent, TelnetOption, consts, escape,
};
use bytes::Bytes;
use tracing::{trace, warn};

/// Incremental Telnet stream classifier.
///
/// `TelnetEngine` consumes inbound chunks exactly as the transport delivers
/// them and turns them into [`TelnetEvent`]s. Control sequences may be split
/// at any byte across any number of chunks: unclassified bytes wait in a
/// [`ChunkBuffer`] and the automaton state carries over between calls.
///
/// Plain data preceding a command is always delivered before the command's
/// own event, and no data is delivered while a control sequence is only
/// partially received.
///
/// # Example
/// ```
/// use bytes::Bytes;
/// use telnex_codec::{TelnetEngine, TelnetEvent, TelnetOption};
///
/// let mut engine = TelnetEngine::new();
/// let mut events = Vec::new();
///
/// engine.feed(Bytes::from_static(b"login: \xFF"), &mut events).unwrap();
/// assert!(events.is_empty());
///
/// engine.feed(Bytes::from_static(b"\xFB\x01"), &mut events).unwrap();
/// assert_eq!(
///     events,
///     vec![
///         TelnetEvent::Data(Bytes::from_static(b"login: ")),
///         TelnetEvent::OptionRequested(TelnetOption::ECHO),
///     ]
/// );
/// ```
///
/// # Thread Safety
///
/// The engine is plain owned state. Each connection gets its own instance and
/// calls into it must be serialized by the owner.
#[derive(Clone, Debug, Default)]
pub struct TelnetEngine {
    state: EngineState,
    pending: ChunkBuffer,
    options: OptionTable,
    poisoned: bool,
}

impl TelnetEngine {
    /// Creates an engine in the [`EngineState::Read`] state with no
    /// negotiated options.
    pub fn new() -> TelnetEngine {
        TelnetEngine::default()
    }

    /// Current automaton state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Negotiation state recorded so far.
    pub fn options(&self) -> &OptionTable {
        &self.options
    }

    /// Number of received bytes not yet delivered in an event.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// True once a fatal error stopped the engine.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Discards all pending bytes, negotiation state and any fatal error.
    pub fn reset(&mut self) {
        *self = TelnetEngine::default();
    }

    /// Classifies one inbound chunk, appending the resulting events to `events`.
    ///
    /// The chunk is consumed completely. Bytes belonging to an unfinished
    /// control sequence are retained for the next call.
    ///
    /// # Errors
    ///
    /// Any [`CodecError`] is fatal for the stream: events for bytes preceding
    /// the malformed sequence have already been appended, nothing is emitted
    /// for the sequence itself, and every later call returns
    /// [`CodecError::Poisoned`] until [`TelnetEngine::reset`].
    pub fn feed(&mut self, chunk: Bytes, events: &mut Vec<TelnetEvent>) -> CodecResult<()> {
        if self.poisoned {
            return Err(CodecError::Poisoned);
        }
        let result = self.classify(chunk, events);
        if let Err(error) = &result {
            warn!("Telnet stream aborted: {}", error);
            self.poisoned = true;
            self.pending.clear();
        }
        result
    }

    fn classify(&mut self, chunk: Bytes, events: &mut Vec<TelnetEvent>) -> CodecResult<()> {
        let mut start = 0;
        for (index, &byte) in chunk.iter().enumerate() {
            trace!(state = ?self.state, byte, index, start, "classify");
            match self.state {
                EngineState::Read => {
                    if byte == consts::IAC {
                        self.state = EngineState::Iac;
                    }
                }
                EngineState::Iac => {
                    if byte == consts::IAC {
                        // Escaped data byte; collapsed when the span is flushed.
                        self.state = EngineState::Read;
                        continue;
                    }
                    let command = TelnetCommand::try_from(byte)?;
                    self.close_span(&chunk, start, index)?;
                    self.flush_data(events)?;
                    start = index + 1;
                    self.state = Self::dispatch(command, events);
                }
                EngineState::Will | EngineState::Do => {
                    if !self.pending.is_empty() {
                        return Err(CodecError::PendingData {
                            length: self.pending.len(),
                        });
                    }
                    events.push(self.options.accept(TelnetOption(byte))?);
                    start = index + 1;
                    self.state = EngineState::Read;
                }
                EngineState::Wont | EngineState::Dont => {
                    events.push(self.options.reject(TelnetOption(byte))?);
                    start = index + 1;
                    self.state = EngineState::Read;
                }
                EngineState::Sb => {
                    if byte == consts::IAC {
                        self.state = EngineState::SbIac;
                    }
                }
                EngineState::SbIac => match byte {
                    consts::IAC => self.state = EngineState::Sb,
                    consts::SE => {
                        self.close_span(&chunk, start, index)?;
                        let payload = self.pending.materialize();
                        self.pending.clear();
                        self.emit_subnegotiation(payload, events)?;
                        start = index + 1;
                        self.state = EngineState::Read;
                    }
                    other => return Err(CodecError::InvalidSubnegotiationEnd(other)),
                },
            }
        }

        if start < chunk.len() {
            self.pending.append(chunk.slice(start..));
        }
        if self.state == EngineState::Read {
            self.flush_data(events)?;
        }
        Ok(())
    }

    /// Moves `chunk[start..=end]` into the pending span and drops the two
    /// byte IAC sequence that closed it.
    fn close_span(&mut self, chunk: &Bytes, start: usize, end: usize) -> CodecResult<()> {
        self.pending.append(chunk.slice(start..=end));
        self.pending.trim(2)
    }

    fn flush_data(&mut self, events: &mut Vec<TelnetEvent>) -> CodecResult<()> {
        if self.pending.is_empty() {
            self.pending.clear();
            return Ok(());
        }
        let data = escape::unescape(self.pending.materialize())?;
        self.pending.clear();
        events.push(TelnetEvent::Data(data));
        Ok(())
    }

    fn dispatch(command: TelnetCommand, events: &mut Vec<TelnetEvent>) -> EngineState {
        match command {
            TelnetCommand::NoOperation => EngineState::Read,
            TelnetCommand::Will => EngineState::Will,
            TelnetCommand::Wont => EngineState::Wont,
            TelnetCommand::Do => EngineState::Do,
            TelnetCommand::Dont => EngineState::Dont,
            TelnetCommand::Subnegotiate => EngineState::Sb,
            TelnetCommand::AreYouThere => {
                events.push(TelnetEvent::AreYouThere);
                EngineState::Read
            }
            TelnetCommand::GoAhead => {
                events.push(TelnetEvent::GoAhead);
                EngineState::Read
            }
            TelnetCommand::DataMark
            | TelnetCommand::Break
            | TelnetCommand::InterruptProcess
            | TelnetCommand::AbortOutput
            | TelnetCommand::EraseCharacter
            | TelnetCommand::EraseLine => {
                warn!("Received unimplemented command {}", command);
                events.push(TelnetEvent::Error(ProtocolWarning::CommandNotImplemented(
                    command,
                )));
                EngineState::Read
            }
        }
    }

    fn emit_subnegotiation(
        &mut self,
        payload: Bytes,
        events: &mut Vec<TelnetEvent>,
    ) -> CodecResult<()> {
        let payload = escape::unescape(payload)?;
        let Some(&option) = payload.first() else {
            return Err(CodecError::EmptySubnegotiation);
        };
        let option = TelnetOption(option);
        if !self.options.is_negotiated(option) {
            warn!("Subnegotiation for option {} before negotiation completed", option);
            events.push(TelnetEvent::Error(ProtocolWarning::NegotiationIncomplete(
                option,
            )));
        }
        events.push(TelnetEvent::Subnegotiation(option, payload.slice(1..)));
        Ok(())
    }
}

///
/// Represents the internal state of the Telnet engine between bytes.
///
/// # Variants
///
/// - `Read`: plain data; IAC moves to `Iac`.
/// - `Iac`: an IAC was seen; the next byte is a command or an escaped IAC.
/// - `Will`, `Wont`, `Do`, `Dont`: the next byte names the negotiated option.
/// - `Sb`: inside a subnegotiation payload.
/// - `SbIac`: an IAC was seen inside a subnegotiation; expects IAC or SE.
///
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum EngineState {
    /// Plain data
    #[default]
    Read,
    /// After IAC
    Iac,
    /// After IAC WILL
    Will,
    /// After IAC WONT
    Wont,
    /// After IAC DO
    Do,
    /// After IAC DONT
    Dont,
    /// Inside IAC SB
    Sb,
    /// After IAC inside IAC SB
    SbIac,
}
