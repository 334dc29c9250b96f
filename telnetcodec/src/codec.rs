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

use crate::{CodecError, TelnetEngine, TelnetEvent, escape};
use bytes::{BufMut, Bytes, BytesMut};
use std::collections::VecDeque;
use tokio_util::codec::{Decoder, Encoder};

/// [`TelnetEngine`] adapted to `tokio_util::codec` for use with `FramedRead`
/// and `FramedWrite`.
///
/// Decoding hands the whole read buffer to the engine as one chunk and then
/// yields the resulting events one per `decode` call. Encoding writes data
/// with IAC escaping applied.
///
/// # Example
/// ```
/// use bytes::{Bytes, BytesMut};
/// use telnex_codec::{TelnetCodec, TelnetEvent};
/// use tokio_util::codec::{Decoder, Encoder};
///
/// let mut codec = TelnetCodec::new();
///
/// let mut wire = BytesMut::new();
/// codec.encode(Bytes::from_static(b"\x01\xFF\x02"), &mut wire).unwrap();
/// assert_eq!(&wire[..], b"\x01\xFF\xFF\x02");
///
/// let event = codec.decode(&mut wire).unwrap();
/// assert_eq!(event, Some(TelnetEvent::Data(Bytes::from_static(b"\x01\xFF\x02"))));
/// ```
#[derive(Debug, Default)]
pub struct TelnetCodec {
    engine: TelnetEngine,
    ready: VecDeque<TelnetEvent>,
    scratch: Vec<TelnetEvent>,
}

impl TelnetCodec {
    /// Creates a new instance of `TelnetCodec`.
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }

    /// The engine driving this codec.
    pub fn engine(&self) -> &TelnetEngine {
        &self.engine
    }
}

impl Decoder for TelnetCodec {
    type Item = TelnetEvent;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<TelnetEvent>, Self::Error> {
        if let Some(event) = self.ready.pop_front() {
            return Ok(Some(event));
        }
        if src.is_empty() {
            return Ok(None);
        }

        let chunk = src.split().freeze();
        let fed = self.engine.feed(chunk, &mut self.scratch);
        self.ready.extend(self.scratch.drain(..));
        fed?;
        Ok(self.ready.pop_front())
    }
}

impl Encoder<Bytes> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(escape::escaped_len(&item));
        dst.put(escape::escape(item));
        Ok(())
    }
}

impl Encoder<&[u8]> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        <Self as Encoder<Bytes>>::encode(self, Bytes::copy_from_slice(item), dst)
    }
}
