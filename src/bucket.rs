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

/// Synthetic-children enumerator for bucketed containers: a linked chain
/// of fixed-capacity chunks (`first_bucket` -> `next` -> ...), each with
/// its own local count and element storage.
///
/// Storage is not contiguous, so element resolution walks the chain,
/// consuming each bucket's local count from the requested index until the
/// element's bucket is reached. The container's top-level `count` is the
/// authoritative logical total; it is never recomputed from the chain, and
/// a chain that ends before the requested index resolves is reported as an
/// inconsistency rather than clamped or read past.
use crate::children::parse_element_index;
use crate::error::InspectError;
use crate::value::ValueHandle;

const NATIVE: [&str; 3] = ["count", "first_bucket", "current_bucket"];

#[derive(Debug)]
pub struct BucketChildren<V: ValueHandle> {
    value: V,
    count: i64,
    elem_size: u64,
}

impl<V: ValueHandle> BucketChildren<V> {
    pub fn new(value: V) -> Result<Self, InspectError> {
        let count = value.field("count")?.as_signed()?;
        let elem_size = chain_element_size(&value)?;
        Ok(Self {
            value,
            count,
            elem_size,
        })
    }

    /// Re-read the logical count and element size; always tells the host
    /// to recompute previously handed-out children.
    pub fn update(&mut self) -> Result<bool, InspectError> {
        self.count = self.value.field("count")?.as_signed()?;
        self.elem_size = chain_element_size(&self.value)?;
        Ok(false)
    }

    pub fn has_children(&self) -> bool {
        true
    }

    pub fn num_children(&self) -> usize {
        NATIVE.len() + self.count.max(0) as usize
    }

    pub fn child_index(&self, name: &str) -> Result<usize, InspectError> {
        if let Some(pos) = NATIVE.iter().position(|n| *n == name) {
            return Ok(pos);
        }
        match parse_element_index(name) {
            Some(i) => Ok(NATIVE.len() + i),
            None => Err(InspectError::UnknownChild(name.to_string())),
        }
    }

    pub fn child_at_index(&self, index: usize) -> Result<V, InspectError> {
        if index < NATIVE.len() {
            return self.value.field(NATIVE[index]);
        }
        let i = index - NATIVE.len();

        // Walk the chain until the remaining index falls inside a bucket.
        let mut remaining = i as i64;
        let mut bucket = self.value.field("first_bucket")?;
        loop {
            if bucket.address()? == 0 {
                let walked = (i as i64 - remaining).max(0) as usize;
                log::warn!(
                    "bucket chain of '{}' ended after {} elements (count says {})",
                    self.value.type_name(),
                    walked,
                    self.count
                );
                return Err(InspectError::ChainTooShort { index: i, walked });
            }
            let local = bucket.field("count")?.as_signed()?.max(0);
            if remaining < local {
                break;
            }
            remaining -= local;
            bucket = bucket.field("next")?;
        }

        bucket
            .field("data")?
            .view_at_offset(&format!("[{}]", i), remaining as u64 * self.elem_size)
    }

    /// Display label for the child at `index`.
    pub fn child_label(&self, index: usize) -> String {
        if index < NATIVE.len() {
            NATIVE[index].to_string()
        } else {
            format!("[{}]", index - NATIVE.len())
        }
    }
}

/// Element size from the bucket storage's element type. An empty chain
/// (null `first_bucket`) has no storage to inspect; no element can resolve
/// through it either, so 0 stands in and the named children stay reachable.
fn chain_element_size<V: ValueHandle>(value: &V) -> Result<u64, InspectError> {
    let first = value.field("first_bucket")?;
    if first.address()? == 0 {
        return Ok(0);
    }
    first.field("data")?.element_byte_size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockNode, MockValue};

    fn int_backing(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn bucket(addr: u64, elements: &[i32], next: MockNode) -> MockNode {
        MockNode::strukt(
            "Bucket",
            vec![
                ("count", MockNode::scalar("s64", elements.len() as i64)),
                (
                    "data",
                    MockNode::pointer("int*", addr + 0x10, "int", 4, int_backing(elements)),
                ),
                ("next", next),
            ],
        )
        .at(addr)
    }

    /// Buckets with local counts [4, 4, 2] and logical count 10.
    fn bucketed_value(logical_count: i64) -> MockValue {
        let third = bucket(0x3000, &[80, 90], MockNode::null_pointer("Bucket*"));
        let second = bucket(0x2000, &[40, 50, 60, 70], third);
        let first = bucket(0x1000, &[0, 10, 20, 30], second);
        MockValue::new(MockNode::strukt(
            "Bucket_Array<int>",
            vec![
                ("count", MockNode::scalar("s64", logical_count)),
                ("first_bucket", first.clone()),
                ("current_bucket", first),
            ],
        ))
    }

    #[test]
    fn num_children_uses_logical_count() {
        let c = BucketChildren::new(bucketed_value(10)).unwrap();
        assert_eq!(c.num_children(), 3 + 10);
    }

    #[test]
    fn named_children_resolve_directly() {
        let c = BucketChildren::new(bucketed_value(10)).unwrap();
        assert_eq!(c.child_index("first_bucket").unwrap(), 1);
        let count = c.child_at_index(0).unwrap();
        assert_eq!(count.as_signed().unwrap(), 10);
        assert_eq!(c.child_label(2), "current_bucket");
    }

    #[test]
    fn element_in_first_bucket() {
        let c = BucketChildren::new(bucketed_value(10)).unwrap();
        let elem = c.child_at_index(3 + 2).unwrap();
        assert_eq!(elem.as_signed().unwrap(), 20);
        assert_eq!(elem.byte_offset(), 2 * 4);
    }

    #[test]
    fn element_nine_lands_in_third_bucket_at_local_offset_one() {
        let c = BucketChildren::new(bucketed_value(10)).unwrap();
        let elem = c.child_at_index(3 + 9).unwrap();
        assert_eq!(elem.as_signed().unwrap(), 90);
        // offsets 4 and 4 consumed by the first two buckets, remainder 1
        assert_eq!(elem.byte_offset(), 1 * 4);
        assert_eq!(elem.label(), "[9]");
    }

    #[test]
    fn index_past_chain_reports_inconsistency() {
        let c = BucketChildren::new(bucketed_value(10)).unwrap();
        let err = c.child_at_index(3 + 10).unwrap_err();
        assert!(matches!(
            err,
            InspectError::ChainTooShort {
                index: 10,
                walked: 10
            }
        ));
    }

    #[test]
    fn count_longer_than_chain_is_not_silently_clamped() {
        // The container claims 12 elements but the chain only holds 10.
        let c = BucketChildren::new(bucketed_value(12)).unwrap();
        assert_eq!(c.num_children(), 3 + 12);
        let err = c.child_at_index(3 + 11).unwrap_err();
        assert!(matches!(
            err,
            InspectError::ChainTooShort {
                index: 11,
                walked: 10
            }
        ));
    }

    #[test]
    fn empty_chain_still_enumerates_named_children() {
        let v = MockValue::new(MockNode::strukt(
            "Bucket_Array<int>",
            vec![
                ("count", MockNode::scalar("s64", 0)),
                ("first_bucket", MockNode::null_pointer("Bucket*")),
                ("current_bucket", MockNode::null_pointer("Bucket*")),
            ],
        ));
        let mut c = BucketChildren::new(v).expect("null first_bucket must not fail");
        assert_eq!(c.num_children(), 3);
        let count = c.child_at_index(0).unwrap();
        assert_eq!(count.as_signed().unwrap(), 0);
        assert_eq!(c.child_at_index(1).unwrap().address().unwrap(), 0);
        assert!(!c.update().unwrap());

        // An element request against the empty chain is an inconsistency.
        let err = c.child_at_index(3).unwrap_err();
        assert!(matches!(
            err,
            InspectError::ChainTooShort {
                index: 0,
                walked: 0
            }
        ));
    }

    #[test]
    fn update_is_idempotent() {
        let mut c = BucketChildren::new(bucketed_value(10)).unwrap();
        let first = c.child_at_index(3 + 7).unwrap().as_signed().unwrap();
        assert!(!c.update().unwrap());
        assert!(!c.update().unwrap());
        assert_eq!(c.num_children(), 3 + 10);
        assert_eq!(c.child_at_index(3 + 7).unwrap().as_signed().unwrap(), first);
    }
}
