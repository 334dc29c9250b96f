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

//! # Telnet Dump
//!
//! Connects to a Telnet server, prints application data to stdout and logs
//! every control event the server sends.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p telnex-client --example telnet_dump -- towel.blinkenlights.nl 23
//! ```

use bytes::Bytes;
use std::io::Write;
use telnex_client::{ClientConfig, SessionHandler, TelnetClient, TelnetOption};
use tracing::{info, warn};

struct DumpHandler;

impl SessionHandler for DumpHandler {
    fn on_connect(&mut self) {
        info!("Connected");
    }

    fn on_close(&mut self) {
        info!("Connection closed");
    }

    fn on_error(&mut self, message: &str) {
        warn!("{}", message);
    }

    fn on_data(&mut self, data: Bytes) {
        let mut stdout = std::io::stdout();
        let _ = stdout.write_all(&data);
        let _ = stdout.flush();
    }

    fn on_are_you_there(&mut self) {
        info!("Server asked: are you there?");
    }

    fn on_go_ahead(&mut self) {
        info!("Go ahead");
    }

    fn on_option_requested(&mut self, option: TelnetOption) {
        info!("Server proposed {}", option);
    }

    fn on_option_accepted(&mut self, option: TelnetOption) {
        info!("Server accepted {}", option);
    }

    fn on_option_rejected(&mut self, option: TelnetOption) {
        info!("Server refused {}", option);
    }

    fn on_subnegotiation(&mut self, option: TelnetOption, data: Bytes) {
        info!("Sub-negotiation for {}: {:02X?}", option, data.as_ref());
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let host = args.get(1).map_or("localhost", String::as_str);
    let port: u16 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(23);

    let mut client = TelnetClient::new(ClientConfig::new(host, port), DumpHandler);
    client.connect()?;
    client.run().await?;
    Ok(())
}
