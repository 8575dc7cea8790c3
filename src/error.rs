// Copyright (c) 2026 Jai-Debug Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use thiserror::Error;

/// Errors raised while inspecting a value in the target process.
///
/// Everything here is local to a single inspection call: the host displays
/// the message next to the value and moves on. Note that a negative or
/// oversized string length is *not* an error - the summarizer renders a
/// diagnostic string for those instead of reading memory.
#[derive(Debug, Error)]
pub enum InspectError {
    /// The value has no field with this name.
    #[error("no field named '{0}'")]
    MissingField(String),

    /// None of the candidate field names resolved (e.g. neither 'count'
    /// nor 'items' is present on a container).
    #[error("none of the candidate fields {0:?} are present")]
    NoCandidateField(&'static [&'static str]),

    /// The host bridge could not fetch the field's value.
    #[error("field '{field}' could not be read: {reason}")]
    UnreadableField { field: String, reason: String },

    /// A memory transfer from the target failed.
    #[error("failed to read {len} bytes at offset {offset}: {reason}")]
    MemoryRead { offset: u64, len: u64, reason: String },

    /// String bytes were fetched but are not valid UTF-8.
    #[error("string data is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A positional element index is past the container's count.
    #[error("element index {index} out of range for {count} elements")]
    IndexOutOfRange { index: usize, count: usize },

    /// A child name that is neither a known struct field nor an element index.
    #[error("'{0}' is neither a struct field nor an element index")]
    UnknownChild(String),

    /// The bucket chain ended before the requested element was reached.
    /// The container's logical count is inconsistent with its chain.
    #[error("bucket chain ended after {walked} elements while resolving element {index}")]
    ChainTooShort { index: usize, walked: usize },

    /// No formatter matches the value's type, by name or by shape.
    #[error("no formatter registered for type '{0}'")]
    NoFormatter(String),
}
