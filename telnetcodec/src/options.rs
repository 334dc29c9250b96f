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

use crate::{CodecError, CodecResult, TelnetEvent, consts};
use std::fmt::Formatter;
use tracing::debug;

///
/// A Telnet option number.
///
/// The engine treats options as opaque numbers; the associated constants only
/// name the common ones from the
/// [IANA registry](https://www.iana.org/assignments/telnet-options/telnet-options.xhtml)
/// for readability and logging.
///
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TelnetOption(pub u8);

impl TelnetOption {
    /// [`consts::option::BINARY`] Binary Transmission
    pub const TRANSMIT_BINARY: TelnetOption = TelnetOption(consts::option::BINARY);
    /// [`consts::option::ECHO`] Echo
    pub const ECHO: TelnetOption = TelnetOption(consts::option::ECHO);
    /// [`consts::option::SGA`] Suppress Go Ahead
    pub const SUPPRESS_GO_AHEAD: TelnetOption = TelnetOption(consts::option::SGA);
    /// [`consts::option::STATUS`] Status
    pub const STATUS: TelnetOption = TelnetOption(consts::option::STATUS);
    /// [`consts::option::TM`] Timing Mark
    pub const TIMING_MARK: TelnetOption = TelnetOption(consts::option::TM);
    /// [`consts::option::TTYPE`] Terminal Type
    pub const TERMINAL_TYPE: TelnetOption = TelnetOption(consts::option::TTYPE);
    /// [`consts::option::EOR`] End of Record
    pub const END_OF_RECORD: TelnetOption = TelnetOption(consts::option::EOR);
    /// [`consts::option::NAWS`] Negotiate About Window Size
    pub const NAWS: TelnetOption = TelnetOption(consts::option::NAWS);
    /// [`consts::option::TSPEED`] Terminal Speed
    pub const TERMINAL_SPEED: TelnetOption = TelnetOption(consts::option::TSPEED);
    /// [`consts::option::LFLOW`] Remote Flow Control
    pub const FLOW_CONTROL: TelnetOption = TelnetOption(consts::option::LFLOW);
    /// [`consts::option::LINEMODE`] Linemode
    pub const LINEMODE: TelnetOption = TelnetOption(consts::option::LINEMODE);
    /// [`consts::option::NEW_ENVIRONMENT`] New Environment
    pub const NEW_ENVIRONMENT: TelnetOption = TelnetOption(consts::option::NEW_ENVIRONMENT);
    /// [`consts::option::CHARSET`] Charset
    pub const CHARSET: TelnetOption = TelnetOption(consts::option::CHARSET);
    /// [`consts::option::MSDP`] Mud Server Data Protocol
    pub const MSDP: TelnetOption = TelnetOption(consts::option::MSDP);
    /// [`consts::option::MSSP`] Mud Server Status Protocol
    pub const MSSP: TelnetOption = TelnetOption(consts::option::MSSP);
    /// [`consts::option::COMPRESS2`] Mud Client Compression Protocol v2
    pub const COMPRESS2: TelnetOption = TelnetOption(consts::option::COMPRESS2);
    /// [`consts::option::GMCP`] Generic Mud Communication Protocol
    pub const GMCP: TelnetOption = TelnetOption(consts::option::GMCP);

    /// Raw option number.
    pub const fn to_u8(self) -> u8 {
        self.0
    }

    /// Registry name of a well-known option.
    pub fn name(self) -> Option<&'static str> {
        let name = match self.0 {
            consts::option::BINARY => "TransmitBinary",
            consts::option::ECHO => "Echo",
            consts::option::SGA => "SuppressGoAhead",
            consts::option::STATUS => "Status",
            consts::option::TM => "TimingMark",
            consts::option::TTYPE => "TerminalType",
            consts::option::EOR => "EndOfRecord",
            consts::option::NAWS => "NAWS",
            consts::option::TSPEED => "TerminalSpeed",
            consts::option::LFLOW => "FlowControl",
            consts::option::LINEMODE => "Linemode",
            consts::option::NEW_ENVIRONMENT => "NewEnvironment",
            consts::option::CHARSET => "Charset",
            consts::option::MSDP => "MSDP",
            consts::option::MSSP => "MSSP",
            consts::option::COMPRESS2 => "Compress2",
            consts::option::GMCP => "GMCP",
            _ => return None,
        };
        Some(name)
    }
}

impl std::fmt::Display for TelnetOption {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "Unknown({})", self.0),
        }
    }
}

impl From<u8> for TelnetOption {
    fn from(byte: u8) -> Self {
        TelnetOption(byte)
    }
}

impl From<TelnetOption> for u8 {
    fn from(option: TelnetOption) -> Self {
        option.0
    }
}

/// Negotiation progress of a single option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NegotiationState {
    /// The peer proposed the option with WILL/DO; a confirming WILL/DO finalizes it.
    Proposed,
    /// Negotiation finished. Renegotiation is not supported.
    Done,
}

/// Recorded negotiation outcome for one option.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OptionEntry {
    /// Current negotiation progress
    pub state: NegotiationState,
    /// Whether the option is (or is proposed to be) on
    pub enabled: bool,
}

/// Per-connection negotiation state for all 256 option numbers.
///
/// Entries are created by the first WILL/DO or WONT/DONT seen for an option
/// and live as long as the table. Acceptance takes two steps (proposal, then
/// confirmation) while a refusal is final the moment it is seen.
#[derive(Clone, Debug)]
pub struct OptionTable {
    entries: [Option<OptionEntry>; 256],
}

impl Default for OptionTable {
    fn default() -> Self {
        OptionTable {
            entries: [None; 256],
        }
    }
}

impl OptionTable {
    /// Creates a table with no recorded options.
    pub fn new() -> OptionTable {
        OptionTable::default()
    }

    /// Recorded entry for `option`, if any negotiation has been seen.
    pub fn entry(&self, option: TelnetOption) -> Option<OptionEntry> {
        self.entries[option.0 as usize]
    }

    /// True when negotiation finished with the option on.
    pub fn is_enabled(&self, option: TelnetOption) -> bool {
        matches!(
            self.entry(option),
            Some(OptionEntry {
                state: NegotiationState::Done,
                enabled: true
            })
        )
    }

    /// True when negotiation for `option` has finished, either way.
    pub fn is_negotiated(&self, option: TelnetOption) -> bool {
        matches!(
            self.entry(option),
            Some(OptionEntry {
                state: NegotiationState::Done,
                ..
            })
        )
    }

    /// Iterates over every option with a recorded entry, in option order.
    pub fn iter(&self) -> impl Iterator<Item = (TelnetOption, OptionEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.map(|entry| (TelnetOption(index as u8), entry)))
    }

    /// Forgets every recorded entry.
    pub fn clear(&mut self) {
        self.entries = [None; 256];
    }

    /// Applies a received WILL or DO for `option`.
    pub fn accept(&mut self, option: TelnetOption) -> CodecResult<TelnetEvent> {
        let slot = &mut self.entries[option.0 as usize];
        match slot {
            None => {
                *slot = Some(OptionEntry {
                    state: NegotiationState::Proposed,
                    enabled: true,
                });
                debug!("Option {} requested", option);
                Ok(TelnetEvent::OptionRequested(option))
            }
            Some(entry) if entry.state == NegotiationState::Proposed => {
                entry.state = NegotiationState::Done;
                entry.enabled = true;
                debug!("Option {} accepted", option);
                Ok(TelnetEvent::OptionAccepted(option))
            }
            Some(_) => Err(CodecError::Renegotiation(option)),
        }
    }

    /// Applies a received WONT or DONT for `option`.
    pub fn reject(&mut self, option: TelnetOption) -> CodecResult<TelnetEvent> {
        let slot = &mut self.entries[option.0 as usize];
        match slot {
            Some(entry) if entry.state == NegotiationState::Done => {
                return Err(CodecError::Renegotiation(option));
            }
            _ => {
                *slot = Some(OptionEntry {
                    state: NegotiationState::Done,
                    enabled: false,
                });
            }
        }
        debug!("Option {} rejected", option);
        Ok(TelnetEvent::OptionRejected(option))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPT: TelnetOption = TelnetOption(0x46);

    #[test]
    fn option_display() {
        assert_eq!(TelnetOption::ECHO.to_string(), "Echo");
        assert_eq!(TelnetOption::NAWS.to_string(), "NAWS");
        assert_eq!(TelnetOption(99).to_string(), "Unknown(99)");
    }

    #[test]
    fn option_conversions() {
        assert_eq!(TelnetOption::from(1), TelnetOption::ECHO);
        assert_eq!(u8::from(TelnetOption::SUPPRESS_GO_AHEAD), 3);
        assert_eq!(TelnetOption(255).to_u8(), 255);
    }

    #[test]
    fn accept_proposes_then_confirms() {
        let mut table = OptionTable::new();
        assert_eq!(table.entry(OPT), None);

        assert_eq!(table.accept(OPT).unwrap(), TelnetEvent::OptionRequested(OPT));
        assert_eq!(
            table.entry(OPT),
            Some(OptionEntry {
                state: NegotiationState::Proposed,
                enabled: true
            })
        );
        assert!(!table.is_enabled(OPT));
        assert!(!table.is_negotiated(OPT));

        assert_eq!(table.accept(OPT).unwrap(), TelnetEvent::OptionAccepted(OPT));
        assert!(table.is_enabled(OPT));
        assert!(table.is_negotiated(OPT));
    }

    #[test]
    fn reject_unknown_option_is_final() {
        let mut table = OptionTable::new();
        assert_eq!(table.reject(OPT).unwrap(), TelnetEvent::OptionRejected(OPT));
        assert_eq!(
            table.entry(OPT),
            Some(OptionEntry {
                state: NegotiationState::Done,
                enabled: false
            })
        );
        assert!(table.is_negotiated(OPT));
        assert!(!table.is_enabled(OPT));
    }

    #[test]
    fn reject_after_proposal() {
        let mut table = OptionTable::new();
        table.accept(OPT).unwrap();
        assert_eq!(table.reject(OPT).unwrap(), TelnetEvent::OptionRejected(OPT));
        assert!(table.is_negotiated(OPT));
        assert!(!table.is_enabled(OPT));
    }

    #[test]
    fn renegotiation_is_fatal() {
        let mut table = OptionTable::new();
        table.accept(OPT).unwrap();
        table.accept(OPT).unwrap();
        assert!(matches!(table.accept(OPT), Err(CodecError::Renegotiation(o)) if o == OPT));
        assert!(matches!(table.reject(OPT), Err(CodecError::Renegotiation(o)) if o == OPT));

        let other = TelnetOption::ECHO;
        table.reject(other).unwrap();
        assert!(table.accept(other).is_err());
        assert!(table.reject(other).is_err());
    }

    #[test]
    fn options_are_independent() {
        let mut table = OptionTable::new();
        table.accept(TelnetOption::ECHO).unwrap();
        table.reject(TelnetOption::NAWS).unwrap();
        let recorded: Vec<_> = table.iter().map(|(option, _)| option).collect();
        assert_eq!(recorded, vec![TelnetOption::ECHO, TelnetOption::NAWS]);

        table.clear();
        assert_eq!(table.iter().count(), 0);
    }
}
