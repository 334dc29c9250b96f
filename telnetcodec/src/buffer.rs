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

use crate::{CodecError, CodecResult};
use bytes::{Bytes, BytesMut};

/// An ordered list of byte chunks presented as one logical buffer.
///
/// Appending never copies: each chunk is a reference counted [`Bytes`] handle
/// and stays untouched until it is trimmed off the tail or the buffer is
/// cleared. Only [`ChunkBuffer::materialize`] copies, and only when more than
/// one chunk is held.
///
/// # Example
/// ```
/// use bytes::Bytes;
/// use telnex_codec::ChunkBuffer;
///
/// let mut buffer = ChunkBuffer::new();
/// buffer.append(Bytes::from_static(&[1, 2]));
/// buffer.append(Bytes::from_static(&[20, 21, 22]));
/// assert_eq!(buffer.len(), 5);
/// assert_eq!(buffer.get(2).unwrap(), 20);
///
/// buffer.trim(4).unwrap();
/// assert_eq!(buffer.materialize(), Bytes::from_static(&[1]));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ChunkBuffer {
    chunks: Vec<Bytes>,
}

impl ChunkBuffer {
    /// Creates an empty buffer.
    pub fn new() -> ChunkBuffer {
        ChunkBuffer::default()
    }

    /// Adds `chunk` to the tail without copying it.
    pub fn append(&mut self, chunk: Bytes) {
        self.chunks.push(chunk);
    }

    /// Logical length: the sum of all chunk lengths.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(Bytes::len).sum()
    }

    /// True when no bytes are buffered.
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(Bytes::is_empty)
    }

    /// Number of chunks currently held, empty ones included.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the byte at logical position `index`.
    pub fn get(&self, index: usize) -> CodecResult<u8> {
        let mut offset = index;
        for chunk in &self.chunks {
            if offset < chunk.len() {
                return Ok(chunk[offset]);
            }
            offset -= chunk.len();
        }
        Err(CodecError::OutOfRange {
            index,
            length: self.len(),
        })
    }

    /// Removes `amount` bytes from the logical tail.
    ///
    /// Walks the chunks back to front. The chunk where the cut lands is
    /// shortened in place with a no-copy truncation; chunks entirely past the
    /// cut are dropped. Chunks in front of the cut are never touched.
    pub fn trim(&mut self, amount: usize) -> CodecResult<()> {
        let available = self.len();
        if amount > available {
            return Err(CodecError::TrimOutOfRange {
                requested: amount,
                available,
            });
        }

        let mut remaining = amount;
        while remaining > 0 {
            let Some(last) = self.chunks.last_mut() else {
                break;
            };
            if remaining < last.len() {
                last.truncate(last.len() - remaining);
                break;
            }
            remaining -= last.len();
            self.chunks.pop();
        }
        Ok(())
    }

    /// Returns the full logical content as one contiguous [`Bytes`].
    ///
    /// A single held chunk is returned as is (same allocation, no copy).
    /// Otherwise the chunks are copied once into a fresh allocation.
    pub fn materialize(&self) -> Bytes {
        if let [single] = self.chunks.as_slice() {
            return single.clone();
        }
        let mut joined = BytesMut::with_capacity(self.len());
        for chunk in &self.chunks {
            joined.extend_from_slice(chunk);
        }
        joined.freeze()
    }

    /// Drops every chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Iterates over the logical bytes in order.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.chunks.iter().flat_map(|chunk| chunk.iter().copied())
    }
}
