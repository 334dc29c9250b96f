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

use crate::{CodecError, consts};

///
/// A command byte that may follow IAC.
///
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TelnetCommand {
    /// No Operation
    NoOperation,
    /// End of urgent Data Stream
    DataMark,
    /// Operator pressed the Break key or the Attention key.
    Break,
    /// Interrupt current process.
    InterruptProcess,
    /// Cancel output from the current process.
    AbortOutput,
    /// Request acknowledgment.
    AreYouThere,
    /// Request that the operator erase the previous character.
    EraseCharacter,
    /// Request that the operator erase the previous line.
    EraseLine,
    /// End of input for half-duplex connections.
    GoAhead,
    /// Begin subnegotiation
    Subnegotiate,
    /// Offer to perform an option
    Will,
    /// Refuse to perform an option
    Wont,
    /// Request the peer perform an option
    Do,
    /// Request the peer stop performing an option
    Dont,
}

impl TelnetCommand {
    /// Wire value of the command.
    pub const fn to_u8(self) -> u8 {
        match self {
            TelnetCommand::NoOperation => consts::NOP,
            TelnetCommand::DataMark => consts::DM,
            TelnetCommand::Break => consts::BRK,
            TelnetCommand::InterruptProcess => consts::IP,
            TelnetCommand::AbortOutput => consts::AO,
            TelnetCommand::AreYouThere => consts::AYT,
            TelnetCommand::EraseCharacter => consts::EC,
            TelnetCommand::EraseLine => consts::EL,
            TelnetCommand::GoAhead => consts::GA,
            TelnetCommand::Subnegotiate => consts::SB,
            TelnetCommand::Will => consts::WILL,
            TelnetCommand::Wont => consts::WONT,
            TelnetCommand::Do => consts::DO,
            TelnetCommand::Dont => consts::DONT,
        }
    }
}

impl TryFrom<u8> for TelnetCommand {
    type Error = CodecError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        let command = match byte {
            consts::NOP => TelnetCommand::NoOperation,
            consts::DM => TelnetCommand::DataMark,
            consts::BRK => TelnetCommand::Break,
            consts::IP => TelnetCommand::InterruptProcess,
            consts::AO => TelnetCommand::AbortOutput,
            consts::AYT => TelnetCommand::AreYouThere,
            consts::EC => TelnetCommand::EraseCharacter,
            consts::EL => TelnetCommand::EraseLine,
            consts::GA => TelnetCommand::GoAhead,
            consts::SB => TelnetCommand::Subnegotiate,
            consts::WILL => TelnetCommand::Will,
            consts::WONT => TelnetCommand::Wont,
            consts::DO => TelnetCommand::Do,
            consts::DONT => TelnetCommand::Dont,
            other => return Err(CodecError::UnknownCommand(other)),
        };
        Ok(command)
    }
}

impl std::fmt::Display for TelnetCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TelnetCommand::NoOperation => "NOP",
            TelnetCommand::DataMark => "DM",
            TelnetCommand::Break => "BRK",
            TelnetCommand::InterruptProcess => "IP",
            TelnetCommand::AbortOutput => "AO",
            TelnetCommand::AreYouThere => "AYT",
            TelnetCommand::EraseCharacter => "EC",
            TelnetCommand::EraseLine => "EL",
            TelnetCommand::GoAhead => "GA",
            TelnetCommand::Subnegotiate => "SB",
            TelnetCommand::Will => "WILL",
            TelnetCommand::Wont => "WONT",
            TelnetCommand::Do => "DO",
            TelnetCommand::Dont => "DONT",
        };
        write!(f, "{} (0x{:02X})", name, self.to_u8())
    }
}
