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

//! Session behaviour against a recording transport

use bytes::Bytes;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use telnex_client::consts::{AYT, IAC, SB, SE, WILL, WONT};
use telnex_client::{
    ClientConfig, ClientError, SessionEvent, TelnetOption, TelnetSession, Transport, TransportEvent,
};

#[derive(Debug, Default)]
struct Wire {
    host: Option<String>,
    port: Option<u16>,
    written: Vec<u8>,
    ended: bool,
}

#[derive(Clone, Default)]
struct MockTransport {
    wire: Rc<RefCell<Wire>>,
    refuse: bool,
}

impl Transport for MockTransport {
    fn connect(&mut self, host: &str, port: u16) -> io::Result<()> {
        if self.refuse {
            return Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        }
        let mut wire = self.wire.borrow_mut();
        wire.host = Some(host.to_string());
        wire.port = Some(port);
        Ok(())
    }

    fn write(&mut self, data: Bytes) -> io::Result<()> {
        self.wire.borrow_mut().written.extend_from_slice(&data);
        Ok(())
    }

    fn end(&mut self) {
        self.wire.borrow_mut().ended = true;
    }
}

type Session = TelnetSession<MockTransport, Vec<SessionEvent>>;

fn config() -> ClientConfig {
    ClientConfig::new("localhost", 23)
}

/// A session attached to a transport that has not finished connecting
fn connecting() -> (Session, Rc<RefCell<Wire>>) {
    let transport = MockTransport::default();
    let wire = transport.wire.clone();
    let mut session = Session::new(Vec::new());
    session.connect(&config(), transport).unwrap();
    (session, wire)
}

fn connected() -> (Session, Rc<RefCell<Wire>>) {
    let (mut session, wire) = connecting();
    session.handle_transport_event(TransportEvent::Connected).unwrap();
    session.handler_mut().clear();
    (session, wire)
}

fn receive(session: &mut Session, bytes: &'static [u8]) -> Result<(), ClientError> {
    session.handle_transport_event(TransportEvent::Data(Bytes::from_static(bytes)))
}

#[test]
fn starts_detached() {
    let session = Session::new(Vec::new());
    assert!(!session.is_connected());
    assert!(session.transport().is_none());
    assert!(session.handler().is_empty());
}

#[test]
fn connect_passes_host_and_port() {
    let (session, wire) = connecting();
    assert_eq!(wire.borrow().host.as_deref(), Some("localhost"));
    assert_eq!(wire.borrow().port, Some(23));
    assert!(!session.is_connected());
}

#[test]
fn connect_rejects_bad_arguments() {
    let mut session = Session::new(Vec::new());
    let result = session.connect(&ClientConfig::new("", 23), MockTransport::default());
    assert!(matches!(result, Err(ClientError::InvalidArgument(_))));
    let result = session.connect(&ClientConfig::new("localhost", 0), MockTransport::default());
    assert!(matches!(result, Err(ClientError::InvalidArgument(_))));
    assert!(session.transport().is_none());
}

#[test]
fn connect_twice_fails() {
    let (mut session, _) = connecting();
    let result = session.connect(&config(), MockTransport::default());
    assert!(matches!(result, Err(ClientError::AlreadyConnected)));
}

#[test]
fn connect_failure_leaves_session_detached() {
    let mut session = Session::new(Vec::new());
    let transport = MockTransport {
        refuse: true,
        ..MockTransport::default()
    };
    let result = session.connect(&config(), transport);
    assert!(matches!(result, Err(ClientError::Io(_))));
    assert!(session.transport().is_none());
}

#[test]
fn connected_after_transport_reports() {
    let (mut session, _) = connecting();
    session.handle_transport_event(TransportEvent::Lookup("127.0.0.1:23".parse().unwrap())).unwrap();
    assert!(session.handler().is_empty());
    session.handle_transport_event(TransportEvent::Connected).unwrap();
    assert!(session.is_connected());
    assert_eq!(session.handler(), &vec![SessionEvent::Connect]);
}

#[test]
fn close_before_connect_fails() {
    let mut session = Session::new(Vec::new());
    assert!(matches!(session.close(), Err(ClientError::NotConnected)));
}

#[test]
fn close_while_connecting() {
    let (mut session, wire) = connecting();
    session.close().unwrap();
    assert!(wire.borrow().ended);
    assert!(!session.is_connected());
    assert_eq!(session.handler(), &vec![SessionEvent::Close]);
}

#[test]
fn close_after_connect() {
    let (mut session, wire) = connected();
    session.close().unwrap();
    assert!(wire.borrow().ended);
    assert!(!session.is_connected());
    assert_eq!(session.handler(), &vec![SessionEvent::Close]);
    assert!(matches!(session.close(), Err(ClientError::NotConnected)));
}

#[test]
fn events_after_close_are_ignored() {
    let (mut session, _) = connected();
    session.close().unwrap();
    receive(&mut session, b"late").unwrap();
    session.handle_transport_event(TransportEvent::Closed).unwrap();
    assert_eq!(session.handler(), &vec![SessionEvent::Close]);
}

#[test]
fn send_requires_connection() {
    let mut session = Session::new(Vec::new());
    assert!(matches!(session.send(Bytes::from_static(b"x")), Err(ClientError::NotConnected)));
    let (mut session, wire) = connecting();
    assert!(matches!(session.send(Bytes::from_static(b"x")), Err(ClientError::NotConnected)));
    assert!(wire.borrow().written.is_empty());
}

#[test]
fn send_writes_plain_data() {
    let (mut session, wire) = connected();
    session.send(vec![1u8, 2]).unwrap();
    assert_eq!(wire.borrow().written, [1, 2]);
}

#[test]
fn send_escapes_iac() {
    let (mut session, wire) = connected();
    session.send(vec![1u8, IAC, 2]).unwrap();
    assert_eq!(wire.borrow().written, [1, IAC, IAC, 2]);
}

#[test]
fn outbound_negotiation_is_not_implemented() {
    let mut session = Session::new(Vec::new());
    assert!(matches!(
        session.request_option(TelnetOption::ECHO),
        Err(ClientError::NotConnected)
    ));

    let (mut session, wire) = connected();
    assert!(matches!(
        session.request_option(TelnetOption::ECHO),
        Err(ClientError::NotImplemented(_))
    ));
    assert!(matches!(
        session.reject_option(TelnetOption::ECHO),
        Err(ClientError::NotImplemented(_))
    ));
    assert!(matches!(
        session.subnegotiate_option(TelnetOption::NAWS, Bytes::from_static(&[0, 80, 0, 24])),
        Err(ClientError::NotImplemented(_))
    ));
    assert!(wire.borrow().written.is_empty());
}

#[test]
fn inbound_traffic_reaches_handler() {
    let (mut session, _) = connected();
    receive(&mut session, &[b'h', b'i', IAC, AYT, IAC, WILL, 1]).unwrap();
    receive(&mut session, &[IAC, WONT, 3, b'!']).unwrap();
    assert_eq!(
        session.handler(),
        &vec![
            SessionEvent::Data(Bytes::from_static(b"hi")),
            SessionEvent::AreYouThere,
            SessionEvent::OptionRequested(TelnetOption::ECHO),
            SessionEvent::OptionRejected(TelnetOption::SUPPRESS_GO_AHEAD),
            SessionEvent::Data(Bytes::from_static(b"!")),
        ]
    );
    assert!(session.engine().options().is_negotiated(TelnetOption::SUPPRESS_GO_AHEAD));
}

#[test]
fn early_subnegotiation_warns() {
    let (mut session, _) = connected();
    receive(&mut session, &[IAC, SB, 24, 0, IAC, SE]).unwrap();
    let events = session.handler();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], SessionEvent::Error(message) if message.contains("TerminalType")));
    assert_eq!(
        events[1],
        SessionEvent::Subnegotiation(TelnetOption::TERMINAL_TYPE, Bytes::from_static(&[0]))
    );
    assert!(session.is_connected());
}

#[test]
fn protocol_error_closes_session() {
    let (mut session, wire) = connected();
    receive(&mut session, &[IAC, WILL, 1]).unwrap();
    let result = receive(&mut session, &[IAC, 0x01]);
    assert!(matches!(result, Err(ClientError::Protocol(_))));
    assert!(!session.is_connected());
    assert!(session.transport().is_none());
    assert!(wire.borrow().ended);

    let events = session.handler();
    assert_eq!(events[0], SessionEvent::OptionRequested(TelnetOption::ECHO));
    assert!(matches!(events[1], SessionEvent::Error(_)));
    assert_eq!(events[2], SessionEvent::Close);
    assert_eq!(events.len(), 3);
}

#[test]
fn transport_error_is_reported() {
    let (mut session, _) = connected();
    session
        .handle_transport_event(TransportEvent::Error("connection reset".to_string()))
        .unwrap();
    assert_eq!(
        session.handler(),
        &vec![SessionEvent::Error("connection reset".to_string())]
    );
    assert!(session.is_connected());
}

#[test]
fn remote_close_allows_reconnect() {
    let (mut session, _) = connected();
    receive(&mut session, &[IAC, WILL, 1]).unwrap();
    session.handle_transport_event(TransportEvent::Closed).unwrap();
    assert!(!session.is_connected());
    assert!(session.transport().is_none());
    assert_eq!(session.handler().last(), Some(&SessionEvent::Close));

    session.connect(&config(), MockTransport::default()).unwrap();
    session.handle_transport_event(TransportEvent::Connected).unwrap();
    assert!(!session.engine().options().is_negotiated(TelnetOption::ECHO));
}
