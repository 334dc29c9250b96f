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

//! IAC escaping for data crossing the wire.
//!
//! Both directions hand back the argument untouched (same allocation) when it
//! holds no IAC byte, so the common case costs one scan and no copy.

use crate::{CodecError, CodecResult, consts};
use bytes::{BufMut, Bytes, BytesMut};

/// Number of bytes `data` occupies on the wire once escaped.
pub fn escaped_len(data: &[u8]) -> usize {
    data.len() + count_iac(data)
}

/// Doubles every IAC byte in `data` for transmission.
pub fn escape(data: Bytes) -> Bytes {
    let iacs = count_iac(&data);
    if iacs == 0 {
        return data;
    }

    let mut escaped = BytesMut::with_capacity(data.len() + iacs);
    for &byte in data.iter() {
        if byte == consts::IAC {
            escaped.put_u8(consts::IAC);
        }
        escaped.put_u8(byte);
    }
    escaped.freeze()
}

/// Collapses every `IAC IAC` pair in `data` back into a single data byte.
///
/// An odd number of IAC bytes, or an IAC not immediately followed by its
/// partner, means a command byte leaked into the data path and is rejected.
pub fn unescape(data: Bytes) -> CodecResult<Bytes> {
    let iacs = count_iac(&data);
    if iacs == 0 {
        return Ok(data);
    }
    if iacs % 2 != 0 {
        let offset = data
            .iter()
            .rposition(|&byte| byte == consts::IAC)
            .unwrap_or_default();
        return Err(CodecError::UnpairedEscape { offset });
    }

    let mut unescaped = BytesMut::with_capacity(data.len() - iacs / 2);
    let mut bytes = data.iter().copied().enumerate();
    while let Some((offset, byte)) = bytes.next() {
        if byte == consts::IAC {
            match bytes.next() {
                Some((_, consts::IAC)) => {}
                _ => return Err(CodecError::UnpairedEscape { offset }),
            }
        }
        unescaped.put_u8(byte);
    }
    Ok(unescaped.freeze())
}

fn count_iac(data: &[u8]) -> usize {
    data.iter().filter(|&&byte| byte == consts::IAC).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_without_iac_is_passthrough() {
        let empty = Bytes::new();
        assert_eq!(escape(empty.clone()).as_ptr(), empty.as_ptr());

        let data = Bytes::from(vec![1u8, 2, 3]);
        let escaped = escape(data.clone());
        assert_eq!(escaped.as_ptr(), data.as_ptr());
        assert_eq!(escaped, data);
    }

    #[test]
    fn escape_doubles_iac() {
        assert_eq!(
            escape(Bytes::from_static(&[0xFF])),
            Bytes::from_static(&[0xFF, 0xFF])
        );
        assert_eq!(
            escape(Bytes::from_static(&[1, 0xFF, 2])),
            Bytes::from_static(&[1, 0xFF, 0xFF, 2])
        );
        assert_eq!(
            escape(Bytes::from_static(&[0xFF, 0xFF, 7, 0xFF])),
            Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF, 7, 0xFF, 0xFF])
        );
    }

    #[test]
    fn escaped_len_counts_doubling() {
        assert_eq!(escaped_len(&[]), 0);
        assert_eq!(escaped_len(&[1, 2]), 2);
        assert_eq!(escaped_len(&[1, 0xFF, 2, 0xFF]), 6);
    }

    #[test]
    fn unescape_without_iac_is_passthrough() {
        let data = Bytes::from(vec![9u8, 8, 7]);
        let unescaped = unescape(data.clone()).unwrap();
        assert_eq!(unescaped.as_ptr(), data.as_ptr());
    }

    #[test]
    fn unescape_collapses_pairs() {
        assert_eq!(
            unescape(Bytes::from_static(&[1, 0xFF, 0xFF, 3])).unwrap(),
            Bytes::from_static(&[1, 0xFF, 3])
        );
        assert_eq!(
            unescape(Bytes::from_static(&[0xFF, 0xFF, 0xFF, 0xFF])).unwrap(),
            Bytes::from_static(&[0xFF, 0xFF])
        );
    }

    #[test]
    fn unescape_rejects_odd_count() {
        assert!(matches!(
            unescape(Bytes::from_static(&[1, 0xFF, 0xFF, 0xFF])),
            Err(CodecError::UnpairedEscape { offset: 3 })
        ));
    }

    #[test]
    fn unescape_rejects_split_pair() {
        assert!(matches!(
            unescape(Bytes::from_static(&[0xFF, 1, 0xFF])),
            Err(CodecError::UnpairedEscape { offset: 0 })
        ));
    }

    #[test]
    fn round_trip() {
        let data = Bytes::from_static(&[0, 0xFF, 0xFE, 0xFF, 0xFF, 42]);
        assert_eq!(unescape(escape(data.clone())).unwrap(), data);
    }
}
