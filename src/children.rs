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

/// Synthetic-children enumerator for containers with contiguous backing
/// storage (flat views, growable arrays, growable arrays with inline
/// storage).
///
/// The host sees the raw struct fields first, as named children, followed
/// by `count` positional element children materialized at
/// `index * element_byte_size` from the `data` pointer.
use crate::error::InspectError;
use crate::value::{probe_field, ValueHandle, COUNT_FIELDS};

#[derive(Debug)]
pub struct ArrayChildren<V: ValueHandle> {
    value: V,
    native: Vec<String>,
    count: i64,
    data: V,
    elem_size: u64,
}

impl<V: ValueHandle> ArrayChildren<V> {
    /// Enumerator for a flat view: named children `count`, `data`.
    pub fn flat(value: V) -> Result<Self, InspectError> {
        Self::with_native(value, |count_name| {
            vec![count_name.to_string(), "data".to_string()]
        })
    }

    /// Enumerator for a growable array: named children `count`,
    /// `allocated_count`, `data` (or the `items` naming scheme).
    pub fn growable(value: V) -> Result<Self, InspectError> {
        Self::with_native(value, |count_name| {
            vec![
                count_name.to_string(),
                format!("allocated_{}", count_name),
                "data".to_string(),
            ]
        })
    }

    /// Enumerator for a growable array with inline storage: adds the
    /// `local_storage` field as a named child. It is not an element.
    pub fn growable_inline(value: V) -> Result<Self, InspectError> {
        Self::with_native(value, |count_name| {
            vec![
                count_name.to_string(),
                format!("allocated_{}", count_name),
                "data".to_string(),
                "local_storage".to_string(),
            ]
        })
    }

    fn with_native(
        value: V,
        make_native: impl FnOnce(&str) -> Vec<String>,
    ) -> Result<Self, InspectError> {
        let (count_name, count) = probe_field(&value, COUNT_FIELDS)?;
        let count = count.as_signed()?;
        let data = value.field("data")?;
        let elem_size = data.element_byte_size()?;
        let native = make_native(count_name);
        Ok(Self {
            value,
            native,
            count,
            data,
            elem_size,
        })
    }

    /// Re-read count, backing pointer, and element size. Called by the
    /// host before any index/count query; the `false` return tells it that
    /// previously handed-out children must be recomputed.
    pub fn update(&mut self) -> Result<bool, InspectError> {
        let (_, count) = probe_field(&self.value, COUNT_FIELDS)?;
        self.count = count.as_signed()?;
        self.data = self.value.field("data")?;
        self.elem_size = self.data.element_byte_size()?;
        Ok(false)
    }

    pub fn has_children(&self) -> bool {
        true
    }

    /// Named struct fields plus one child per element.
    pub fn num_children(&self) -> usize {
        self.native.len() + self.count.max(0) as usize
    }

    /// Map a child name to its index: named fields keep their fixed
    /// position, anything else must parse as an element index.
    pub fn child_index(&self, name: &str) -> Result<usize, InspectError> {
        if let Some(pos) = self.native.iter().position(|n| n == name) {
            return Ok(pos);
        }
        match parse_element_index(name) {
            Some(i) => Ok(self.native.len() + i),
            None => Err(InspectError::UnknownChild(name.to_string())),
        }
    }

    pub fn child_at_index(&self, index: usize) -> Result<V, InspectError> {
        if index < self.native.len() {
            return self.value.field(&self.native[index]);
        }
        let i = index - self.native.len();
        let count = self.count.max(0) as usize;
        if i >= count {
            return Err(InspectError::IndexOutOfRange { index: i, count });
        }
        self.data
            .view_at_offset(&format!("[{}]", i), i as u64 * self.elem_size)
    }

    /// Display label for the child at `index`.
    pub fn child_label(&self, index: usize) -> String {
        if index < self.native.len() {
            self.native[index].clone()
        } else {
            format!("[{}]", index - self.native.len())
        }
    }
}

/// Parse an element-child name: a bare non-negative integer, or the `[i]`
/// label form the enumerators hand out.
pub(crate) fn parse_element_index(name: &str) -> Option<usize> {
    let bare = name
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(name);
    bare.parse::<usize>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockNode, MockValue};

    fn int_backing(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    fn growable_value() -> MockValue {
        // count=3, allocated_count=8, elements [10, 20, 30]
        MockValue::new(MockNode::strukt(
            "Array<int>",
            vec![
                ("count", MockNode::scalar("s64", 3)),
                ("allocated_count", MockNode::scalar("s64", 8)),
                (
                    "data",
                    MockNode::pointer("int*", 0x6000, "int", 4, int_backing(&[10, 20, 30])),
                ),
            ],
        ))
    }

    #[test]
    fn num_children_is_named_plus_count() {
        let c = ArrayChildren::growable(growable_value()).unwrap();
        assert_eq!(c.num_children(), 3 + 3);
        assert!(c.has_children());
    }

    #[test]
    fn named_children_come_first() {
        let c = ArrayChildren::growable(growable_value()).unwrap();
        assert_eq!(c.child_index("count").unwrap(), 0);
        assert_eq!(c.child_index("allocated_count").unwrap(), 1);
        assert_eq!(c.child_index("data").unwrap(), 2);
        let count = c.child_at_index(0).unwrap();
        assert_eq!(count.as_signed().unwrap(), 3);
    }

    #[test]
    fn element_child_resolves_to_scaled_offset() {
        let c = ArrayChildren::growable(growable_value()).unwrap();
        let elem = c.child_at_index(c.child_index("2").unwrap()).unwrap();
        assert_eq!(elem.byte_offset(), 2 * 4);
        assert_eq!(elem.as_signed().unwrap(), 30);
        assert_eq!(elem.label(), "[2]");
    }

    #[test]
    fn bracketed_element_names_are_accepted() {
        let c = ArrayChildren::growable(growable_value()).unwrap();
        assert_eq!(c.child_index("[1]").unwrap(), c.child_index("1").unwrap());
    }

    #[test]
    fn unknown_child_name_is_an_error() {
        let c = ArrayChildren::growable(growable_value()).unwrap();
        let err = c.child_index("banana").unwrap_err();
        assert!(matches!(err, InspectError::UnknownChild(_)));
    }

    #[test]
    fn element_past_count_is_out_of_range() {
        let c = ArrayChildren::growable(growable_value()).unwrap();
        let err = c.child_at_index(3 + 3).unwrap_err();
        assert!(matches!(
            err,
            InspectError::IndexOutOfRange { index: 3, count: 3 }
        ));
    }

    #[test]
    fn items_naming_scheme_mirrors_through() {
        let v = MockValue::new(MockNode::strukt(
            "Array<int>",
            vec![
                ("items", MockNode::scalar("s64", 2)),
                ("allocated_items", MockNode::scalar("s64", 4)),
                (
                    "data",
                    MockNode::pointer("int*", 0x6000, "int", 4, int_backing(&[5, 6])),
                ),
            ],
        ));
        let c = ArrayChildren::growable(v).unwrap();
        assert_eq!(c.child_index("items").unwrap(), 0);
        assert_eq!(c.child_index("allocated_items").unwrap(), 1);
        assert_eq!(c.num_children(), 3 + 2);
        let elem = c.child_at_index(4).unwrap();
        assert_eq!(elem.as_signed().unwrap(), 6);
    }

    #[test]
    fn inline_storage_is_a_named_child_not_an_element() {
        let v = MockValue::new(MockNode::strukt(
            "Local_Array<int>",
            vec![
                ("count", MockNode::scalar("s64", 1)),
                ("allocated_count", MockNode::scalar("s64", 16)),
                (
                    "data",
                    MockNode::pointer("int*", 0x7000, "int", 4, int_backing(&[42])),
                ),
                ("local_storage", MockNode::scalar("int[16]", 0)),
            ],
        ));
        let c = ArrayChildren::growable_inline(v).unwrap();
        assert_eq!(c.child_index("local_storage").unwrap(), 3);
        assert_eq!(c.num_children(), 4 + 1);
        assert_eq!(c.child_label(3), "local_storage");
        assert_eq!(c.child_label(4), "[0]");
    }

    #[test]
    fn negative_count_yields_no_elements() {
        let v = MockValue::new(MockNode::strukt(
            "Array<int>",
            vec![
                ("count", MockNode::scalar("s64", -4)),
                ("allocated_count", MockNode::scalar("s64", 0)),
                ("data", MockNode::pointer("int*", 0x6000, "int", 4, vec![])),
            ],
        ));
        let c = ArrayChildren::growable(v).unwrap();
        assert_eq!(c.num_children(), 3);
    }

    #[test]
    fn update_is_idempotent() {
        let mut c = ArrayChildren::growable(growable_value()).unwrap();
        let first = (c.num_children(), c.child_at_index(5).unwrap().byte_offset());
        assert!(!c.update().unwrap(), "host must always recompute children");
        assert!(!c.update().unwrap());
        let second = (c.num_children(), c.child_at_index(5).unwrap().byte_offset());
        assert_eq!(first, second);
    }
}
