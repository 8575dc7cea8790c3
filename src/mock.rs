use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::InspectError;
use crate::value::ValueHandle;

// In-memory value handles, used by the test suite and handy when bringing
// up a new host bridge. A MockNode tree stands in for the target process's
// typed memory; MockValue implements ValueHandle over it and counts every
// memory transfer so tests can assert that invalid lengths never read.

#[derive(Debug, Clone, Default)]
pub struct MockNode {
    pub type_name: String,
    pub scalar: i64,
    pub address: u64,
    pub elem_type_name: String,
    pub elem_size: u64,
    pub backing: Vec<u8>,
    pub unreadable: bool,
    pub fields: HashMap<String, Rc<MockNode>>,
}

impl MockNode {
    /// A plain signed scalar.
    pub fn scalar(type_name: &str, value: i64) -> Self {
        Self {
            type_name: type_name.to_string(),
            scalar: value,
            ..Default::default()
        }
    }

    /// A pointer whose pointee holds `backing` bytes of `elem_size`-wide
    /// elements. `address` is the pointer's target address.
    pub fn pointer(
        type_name: &str,
        address: u64,
        elem_type_name: &str,
        elem_size: u64,
        backing: Vec<u8>,
    ) -> Self {
        Self {
            type_name: type_name.to_string(),
            scalar: address as i64,
            address,
            elem_type_name: elem_type_name.to_string(),
            elem_size,
            backing,
            ..Default::default()
        }
    }

    /// A struct with named fields.
    pub fn strukt(type_name: &str, fields: Vec<(&str, MockNode)>) -> Self {
        Self {
            type_name: type_name.to_string(),
            fields: fields
                .into_iter()
                .map(|(name, node)| (name.to_string(), Rc::new(node)))
                .collect(),
            ..Default::default()
        }
    }

    /// A null pointer (address 0).
    pub fn null_pointer(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }

    /// A field the host bridge cannot fetch.
    pub fn unreadable(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            unreadable: true,
            ..Default::default()
        }
    }

    /// Place this node at a target address.
    pub fn at(mut self, address: u64) -> Self {
        self.address = address;
        self
    }
}

#[derive(Debug, Clone)]
pub struct MockValue {
    node: Rc<MockNode>,
    label: String,
    byte_offset: u64,
    reads: Rc<Cell<usize>>,
}

impl MockValue {
    pub fn new(root: MockNode) -> Self {
        Self {
            node: Rc::new(root),
            label: String::new(),
            byte_offset: 0,
            reads: Rc::new(Cell::new(0)),
        }
    }

    /// Number of memory transfers performed through this value tree.
    pub fn reads(&self) -> usize {
        self.reads.get()
    }

    /// Display label this value was handed out under.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Byte offset at which this view was materialized from its base.
    pub fn byte_offset(&self) -> u64 {
        self.byte_offset
    }

    fn wrap(&self, node: Rc<MockNode>, label: &str, byte_offset: u64) -> Self {
        Self {
            node,
            label: label.to_string(),
            byte_offset,
            reads: Rc::clone(&self.reads),
        }
    }
}

impl ValueHandle for MockValue {
    fn field(&self, name: &str) -> Result<Self, InspectError> {
        match self.node.fields.get(name) {
            Some(node) => Ok(self.wrap(Rc::clone(node), name, 0)),
            None => Err(InspectError::MissingField(name.to_string())),
        }
    }

    fn as_signed(&self) -> Result<i64, InspectError> {
        if self.node.unreadable {
            return Err(InspectError::UnreadableField {
                field: self.label.clone(),
                reason: "mock value marked unreadable".to_string(),
            });
        }
        Ok(self.node.scalar)
    }

    fn address(&self) -> Result<u64, InspectError> {
        if self.node.unreadable {
            return Err(InspectError::UnreadableField {
                field: self.label.clone(),
                reason: "mock value marked unreadable".to_string(),
            });
        }
        Ok(self.node.address)
    }

    fn element_byte_size(&self) -> Result<u64, InspectError> {
        Ok(self.node.elem_size)
    }

    fn read_bytes(&self, offset: u64, len: u64) -> Result<Vec<u8>, InspectError> {
        self.reads.set(self.reads.get() + 1);
        let start = offset as usize;
        let end = start + len as usize;
        if end > self.node.backing.len() {
            return Err(InspectError::MemoryRead {
                offset,
                len,
                reason: format!("mock backing holds only {} bytes", self.node.backing.len()),
            });
        }
        Ok(self.node.backing[start..end].to_vec())
    }

    fn view_at_offset(&self, label: &str, byte_offset: u64) -> Result<Self, InspectError> {
        // Decode the element scalar from backing bytes, little-endian,
        // zero when the backing does not cover the element.
        let start = byte_offset as usize;
        let end = start + self.node.elem_size as usize;
        let mut buf = [0u8; 8];
        if end <= self.node.backing.len() {
            for (i, b) in self.node.backing[start..end].iter().take(8).enumerate() {
                buf[i] = *b;
            }
        }
        let elem = MockNode {
            type_name: self.node.elem_type_name.clone(),
            scalar: i64::from_le_bytes(buf),
            address: self.node.address + byte_offset,
            ..Default::default()
        };
        Ok(self.wrap(Rc::new(elem), label, byte_offset))
    }

    fn type_name(&self) -> &str {
        &self.node.type_name
    }
}
