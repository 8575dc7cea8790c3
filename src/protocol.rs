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

/// Serializable display results for hosts that forward them over a JSON
/// bridge to a debug-adapter extension. 64-bit addresses are represented
/// as hex strings in the JSON to avoid issues with JavaScript number
/// precision.
use serde::{Deserialize, Serialize};

use crate::error::InspectError;
use crate::registry::Registry;
use crate::value::ValueHandle;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SummaryDescriptor {
    pub type_name: String,
    pub summary: String,
    pub num_children: u64,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ChildDescriptor {
    pub name: String,
    pub address: String, // hex address
    pub type_name: String,
}

impl ChildDescriptor {
    pub fn from_value<V: ValueHandle>(name: &str, value: &V) -> Result<Self, InspectError> {
        Ok(Self {
            name: name.to_string(),
            address: format!("0x{:x}", value.address()?),
            type_name: value.type_name().to_string(),
        })
    }
}

/// Resolve one container value end to end: summary plus every child,
/// rendered as descriptors the host can serialize as-is.
pub fn describe<V: ValueHandle>(
    registry: &Registry<V>,
    value: V,
) -> Result<(SummaryDescriptor, Vec<ChildDescriptor>), InspectError> {
    let summary = registry.summarize(&value)?;
    let type_name = value.type_name().to_string();
    let provider = registry.children(value)?;
    let mut children = Vec::with_capacity(provider.num_children());
    for index in 0..provider.num_children() {
        let child = provider.child_at_index(index)?;
        children.push(ChildDescriptor::from_value(
            &provider.child_label(index),
            &child,
        )?);
    }
    Ok((
        SummaryDescriptor {
            type_name,
            summary,
            num_children: children.len() as u64,
        },
        children,
    ))
}
