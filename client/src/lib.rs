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

//! # Telnex Telnet Client
//!
//! Session layer over the [`telnex_codec`] protocol engine.
//!
//! A [`TelnetSession`] owns an engine and a [`Transport`]. Transports report
//! progress as [`TransportEvent`] values; the session turns inbound bytes into
//! [`SessionEvent`] callbacks on a [`SessionHandler`] and escapes outbound
//! data. [`TcpTransport`] and [`TelnetClient`] provide a tokio TCP stack.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bytes::Bytes;
//! use telnex_client::{ClientConfig, SessionHandler, TelnetClient};
//!
//! struct Printer;
//!
//! impl SessionHandler for Printer {
//!     fn on_data(&mut self, data: Bytes) {
//!         print!("{}", String::from_utf8_lossy(&data));
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = TelnetClient::new(ClientConfig::new("localhost", 23), Printer);
//!     client.connect()?;
//!     client.run().await?;
//!     Ok(())
//! }
//! ```
//!
//! Option negotiation from the local side is not available; the session
//! reports what the peer proposes but cannot answer.

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

mod config;
mod error;
mod handler;
mod session;
mod tcp;
mod transport;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use handler::{SessionEvent, SessionHandler};
pub use session::TelnetSession;
pub use tcp::{TcpTransport, TelnetClient};
pub use transport::{Transport, TransportEvent};

// Re-export commonly used types from the engine
pub use telnex_codec::{TelnetOption, consts};
