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

use crate::error::InspectError;

/// Handle to a typed region of the target process's memory.
///
/// The host debugger owns the lifetime of every handle; this crate only
/// reads through them during a single inspection call and never caches
/// them across calls. Implementations exist per host bridge (and an
/// in-memory one lives in [`crate::mock`] for tests).
pub trait ValueHandle: Sized {
    /// Resolve a named struct field on this value.
    fn field(&self, name: &str) -> Result<Self, InspectError>;

    /// Read this value as a signed integer.
    fn as_signed(&self) -> Result<i64, InspectError>;

    /// The value's address in the target. For pointer-typed values this is
    /// the pointer's target address, so a result of 0 means a null pointer.
    fn address(&self) -> Result<u64, InspectError>;

    /// Byte size of one element of this value's pointee/array-element type.
    fn element_byte_size(&self) -> Result<u64, InspectError>;

    /// Transfer `len` bytes from the target, starting `offset` bytes into
    /// this value's pointee.
    fn read_bytes(&self, offset: u64, len: u64) -> Result<Vec<u8>, InspectError>;

    /// Materialize a typed view at `byte_offset` from this value's pointee
    /// base, labelled for display (e.g. `[3]`).
    fn view_at_offset(&self, label: &str, byte_offset: u64) -> Result<Self, InspectError>;

    /// Printed name of the value's type, as the host would show it.
    fn type_name(&self) -> &str;

    /// Largest single memory transfer the host bridge can perform. String
    /// lengths beyond this are reported as diagnostics instead of read.
    fn max_transfer(&self) -> u64 {
        0xFFFF_FFFF
    }
}

/// Candidate names for a container's length field. Two field-naming schemes
/// exist for the same logical concept; `count` is the common one.
pub const COUNT_FIELDS: &[&str] = &["count", "items"];

/// Try candidate field names in order and return the first one present.
pub fn probe_field<V: ValueHandle>(
    value: &V,
    candidates: &'static [&'static str],
) -> Result<(&'static str, V), InspectError> {
    for &name in candidates {
        if let Ok(field) = value.field(name) {
            if name != candidates[0] {
                log::debug!(
                    "type '{}' uses fallback field naming '{}'",
                    value.type_name(),
                    name
                );
            }
            return Ok((name, field));
        }
    }
    Err(InspectError::NoCandidateField(candidates))
}

/// Read a count-like field, defaulting to 0 when it is missing or the
/// bridge cannot fetch it.
pub fn signed_field_or_zero<V: ValueHandle>(value: &V, name: &str) -> i64 {
    value
        .field(name)
        .and_then(|f| f.as_signed())
        .unwrap_or(0)
}
