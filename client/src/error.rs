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

//! Client error types

use telnex_codec::CodecError;
use thiserror::Error;

/// Client result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// I/O error from the transport
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Fatal protocol error from the engine; the session has been closed
    #[error("Protocol error: {0}")]
    Protocol(#[from] CodecError),

    /// A connect parameter failed validation
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A transport is already attached
    #[error("Already connected")]
    AlreadyConnected,

    /// No connected transport is attached
    #[error("Not connected")]
    NotConnected,

    /// Outbound negotiation is not available
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}
