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

//! Session event handler trait

use bytes::Bytes;
use telnex_codec::{TelnetEvent, TelnetOption};
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Events surfaced by a [`crate::TelnetSession`]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionEvent {
    /// The transport finished connecting
    Connect,
    /// The session closed, locally or remotely
    Close,
    /// A transport error or protocol warning
    Error(String),
    /// Unescaped application data
    Data(Bytes),
    /// Peer sent Are-You-There
    AreYouThere,
    /// Peer sent Go-Ahead
    GoAhead,
    /// Peer proposed an option
    OptionRequested(TelnetOption),
    /// Peer accepted an option we proposed
    OptionAccepted(TelnetOption),
    /// Peer refused an option
    OptionRejected(TelnetOption),
    /// Sub-negotiation payload for an option
    Subnegotiation(TelnetOption, Bytes),
}

impl From<TelnetEvent> for SessionEvent {
    fn from(event: TelnetEvent) -> Self {
        match event {
            TelnetEvent::Data(data) => SessionEvent::Data(data),
            TelnetEvent::AreYouThere => SessionEvent::AreYouThere,
            TelnetEvent::GoAhead => SessionEvent::GoAhead,
            TelnetEvent::OptionRequested(option) => SessionEvent::OptionRequested(option),
            TelnetEvent::OptionAccepted(option) => SessionEvent::OptionAccepted(option),
            TelnetEvent::OptionRejected(option) => SessionEvent::OptionRejected(option),
            TelnetEvent::Subnegotiation(option, data) => SessionEvent::Subnegotiation(option, data),
            TelnetEvent::Error(warning) => SessionEvent::Error(warning.to_string()),
        }
    }
}

/// Session event handler trait
///
/// Callbacks run synchronously, in wire order, while the session processes a
/// transport event. Every method has a default that does nothing; override
/// [`SessionHandler::on_event`] instead to receive everything as
/// [`SessionEvent`] values.
///
/// # Example
///
/// ```
/// use bytes::Bytes;
/// use telnex_client::SessionHandler;
///
/// struct Printer;
///
/// impl SessionHandler for Printer {
///     fn on_data(&mut self, data: Bytes) {
///         print!("{}", String::from_utf8_lossy(&data));
///     }
/// }
/// ```
pub trait SessionHandler {
    /// Called for every session event; routes to the specific callbacks
    fn on_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Connect => self.on_connect(),
            SessionEvent::Close => self.on_close(),
            SessionEvent::Error(message) => self.on_error(&message),
            SessionEvent::Data(data) => self.on_data(data),
            SessionEvent::AreYouThere => self.on_are_you_there(),
            SessionEvent::GoAhead => self.on_go_ahead(),
            SessionEvent::OptionRequested(option) => self.on_option_requested(option),
            SessionEvent::OptionAccepted(option) => self.on_option_accepted(option),
            SessionEvent::OptionRejected(option) => self.on_option_rejected(option),
            SessionEvent::Subnegotiation(option, data) => self.on_subnegotiation(option, data),
        }
    }

    /// Called when the transport has connected
    fn on_connect(&mut self) {}

    /// Called once when the session closes
    fn on_close(&mut self) {}

    /// Called on transport errors and recoverable protocol warnings
    fn on_error(&mut self, _message: &str) {}

    /// Called with each run of application data
    fn on_data(&mut self, _data: Bytes) {}

    /// Called when the peer sends Are-You-There
    fn on_are_you_there(&mut self) {}

    /// Called when the peer sends Go-Ahead
    fn on_go_ahead(&mut self) {}

    /// Called when the peer proposes an option
    fn on_option_requested(&mut self, _option: TelnetOption) {}

    /// Called when the peer accepts an option we proposed
    fn on_option_accepted(&mut self, _option: TelnetOption) {}

    /// Called when the peer refuses an option
    fn on_option_rejected(&mut self, _option: TelnetOption) {}

    /// Called with the payload of a sub-negotiation
    fn on_subnegotiation(&mut self, _option: TelnetOption, _data: Bytes) {}
}

/// Records every event, in order
impl SessionHandler for Vec<SessionEvent> {
    fn on_event(&mut self, event: SessionEvent) {
        self.push(event);
    }
}

/// Forwards every event to a channel
impl SessionHandler for UnboundedSender<SessionEvent> {
    fn on_event(&mut self, event: SessionEvent) {
        if let Err(err) = self.send(event) {
            debug!("Dropping session event, receiver is gone: {:?}", err.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telnex_codec::ProtocolWarning;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Counter {
        data: Vec<u8>,
        options: Vec<TelnetOption>,
        errors: usize,
    }

    impl SessionHandler for Counter {
        fn on_data(&mut self, data: Bytes) {
            self.data.extend_from_slice(&data);
        }

        fn on_option_requested(&mut self, option: TelnetOption) {
            self.options.push(option);
        }

        fn on_error(&mut self, _message: &str) {
            self.errors += 1;
        }
    }

    #[test]
    fn default_routing() {
        let mut counter = Counter::default();
        counter.on_event(SessionEvent::Data(Bytes::from_static(b"ab")));
        counter.on_event(SessionEvent::GoAhead);
        counter.on_event(SessionEvent::Data(Bytes::from_static(b"c")));
        counter.on_event(SessionEvent::OptionRequested(TelnetOption::ECHO));
        counter.on_event(SessionEvent::Error("oops".to_string()));
        assert_eq!(counter.data, b"abc");
        assert_eq!(counter.options, vec![TelnetOption::ECHO]);
        assert_eq!(counter.errors, 1);
    }

    #[test]
    fn warnings_become_messages() {
        let event = SessionEvent::from(TelnetEvent::Error(ProtocolWarning::NegotiationIncomplete(
            TelnetOption::NAWS,
        )));
        let SessionEvent::Error(message) = event else {
            panic!("expected an error event");
        };
        assert!(message.contains("NAWS"));
    }

    #[test]
    #[traced_test]
    fn channel_forwarding() {
        let (mut tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<SessionEvent>();
        tx.on_event(SessionEvent::Connect);
        assert_eq!(rx.try_recv().ok(), Some(SessionEvent::Connect));
        drop(rx);
        tx.on_event(SessionEvent::Close);
        assert!(logs_contain("receiver is gone"));
    }
}
