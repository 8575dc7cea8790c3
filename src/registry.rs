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

/// Formatter dispatch: map a value to its {summarizer, enumerator} pair.
///
/// Primary dispatch is by container shape, determined once by probing
/// which fields are present. Type-name rules (exact or regex) sit in front
/// of shape detection for types the probe cannot tell apart - a string and
/// a flat array both carry `count` + `data`.
use anyhow::Context;
use regex::Regex;

use crate::bucket::BucketChildren;
use crate::children::ArrayChildren;
use crate::error::InspectError;
use crate::summary::{
    array_view_summary, bucket_array_summary, local_array_summary,
    resizable_array_summary_checked,
};
use crate::text::quoted_string_summary;
use crate::value::ValueHandle;

/// The container shapes the runtime's array family comes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerShape {
    /// One length field, one contiguous backing pointer.
    Flat,
    /// Length, allocated capacity, contiguous backing pointer.
    Growable,
    /// Growable plus a fixed-size inline storage field.
    GrowableInline,
    /// Linked chain of fixed-capacity chunks.
    Chunked,
}

/// Determine a container's shape by probing which fields are present.
/// Returns `None` for values that match no known container layout.
pub fn detect_shape<V: ValueHandle>(value: &V) -> Option<ContainerShape> {
    if value.field("first_bucket").is_ok() {
        return Some(ContainerShape::Chunked);
    }
    if value.field("local_storage").is_ok() {
        return Some(ContainerShape::GrowableInline);
    }
    if value.field("allocated_count").is_ok() || value.field("allocated_items").is_ok() {
        return Some(ContainerShape::Growable);
    }
    let has_count = value.field("count").is_ok() || value.field("items").is_ok();
    if has_count && value.field("data").is_ok() {
        return Some(ContainerShape::Flat);
    }
    None
}

/// Summarizer for a known shape.
pub fn shape_summary<V: ValueHandle>(
    shape: ContainerShape,
    value: &V,
) -> Result<String, InspectError> {
    match shape {
        ContainerShape::Flat => array_view_summary(value),
        ContainerShape::Growable => resizable_array_summary_checked(value),
        ContainerShape::GrowableInline => local_array_summary(value),
        ContainerShape::Chunked => bucket_array_summary(value),
    }
}

/// Child enumerator for a container, either contiguous or bucketed. Built
/// fresh for every inspection request; the host drives `update` before
/// index/count queries.
#[derive(Debug)]
pub enum Provider<V: ValueHandle> {
    Indexed(ArrayChildren<V>),
    Bucketed(BucketChildren<V>),
}

impl<V: ValueHandle> Provider<V> {
    pub fn for_shape(shape: ContainerShape, value: V) -> Result<Self, InspectError> {
        match shape {
            ContainerShape::Flat => Ok(Provider::Indexed(ArrayChildren::flat(value)?)),
            ContainerShape::Growable => Ok(Provider::Indexed(ArrayChildren::growable(value)?)),
            ContainerShape::GrowableInline => {
                Ok(Provider::Indexed(ArrayChildren::growable_inline(value)?))
            }
            ContainerShape::Chunked => Ok(Provider::Bucketed(BucketChildren::new(value)?)),
        }
    }

    pub fn update(&mut self) -> Result<bool, InspectError> {
        match self {
            Provider::Indexed(c) => c.update(),
            Provider::Bucketed(c) => c.update(),
        }
    }

    pub fn has_children(&self) -> bool {
        true
    }

    pub fn num_children(&self) -> usize {
        match self {
            Provider::Indexed(c) => c.num_children(),
            Provider::Bucketed(c) => c.num_children(),
        }
    }

    pub fn child_index(&self, name: &str) -> Result<usize, InspectError> {
        match self {
            Provider::Indexed(c) => c.child_index(name),
            Provider::Bucketed(c) => c.child_index(name),
        }
    }

    pub fn child_at_index(&self, index: usize) -> Result<V, InspectError> {
        match self {
            Provider::Indexed(c) => c.child_at_index(index),
            Provider::Bucketed(c) => c.child_at_index(index),
        }
    }

    pub fn child_label(&self, index: usize) -> String {
        match self {
            Provider::Indexed(c) => c.child_label(index),
            Provider::Bucketed(c) => c.child_label(index),
        }
    }
}

type SummaryFn<V> = fn(&V) -> Result<String, InspectError>;

enum TypeMatcher {
    Exact(String),
    Pattern(Regex),
}

impl TypeMatcher {
    fn matches(&self, type_name: &str) -> bool {
        match self {
            TypeMatcher::Exact(name) => name == type_name,
            TypeMatcher::Pattern(re) => re.is_match(type_name),
        }
    }
}

struct NameRule<V: ValueHandle> {
    matcher: TypeMatcher,
    summary: SummaryFn<V>,
    /// Enumerator shape; `None` for summary-only types (strings).
    shape: Option<ContainerShape>,
}

/// Session-level formatter table. A host builds one at session start
/// (usually via [`default_registry`]) and resolves every display request
/// through it.
pub struct Registry<V: ValueHandle> {
    rules: Vec<NameRule<V>>,
}

impl<V: ValueHandle> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: ValueHandle> Registry<V> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Bind an exact type name to a summarizer (and enumerator shape).
    pub fn register_exact(
        &mut self,
        type_name: &str,
        summary: SummaryFn<V>,
        shape: Option<ContainerShape>,
    ) {
        self.rules.push(NameRule {
            matcher: TypeMatcher::Exact(type_name.to_string()),
            summary,
            shape,
        });
    }

    /// Bind a type-name regex to a summarizer (and enumerator shape).
    pub fn register_pattern(
        &mut self,
        pattern: &str,
        summary: SummaryFn<V>,
        shape: Option<ContainerShape>,
    ) -> anyhow::Result<()> {
        let re = Regex::new(pattern)
            .with_context(|| format!("invalid type-name pattern '{}'", pattern))?;
        self.rules.push(NameRule {
            matcher: TypeMatcher::Pattern(re),
            summary,
            shape,
        });
        Ok(())
    }

    fn rule_for(&self, type_name: &str) -> Option<&NameRule<V>> {
        self.rules.iter().find(|r| r.matcher.matches(type_name))
    }

    /// Produce the one-line summary for a value, by name rule first, then
    /// by detected shape.
    pub fn summarize(&self, value: &V) -> Result<String, InspectError> {
        if let Some(rule) = self.rule_for(value.type_name()) {
            return (rule.summary)(value);
        }
        match detect_shape(value) {
            Some(shape) => {
                log::debug!(
                    "type '{}' matched no name rule, using shape {:?}",
                    value.type_name(),
                    shape
                );
                shape_summary(shape, value)
            }
            None => Err(InspectError::NoFormatter(value.type_name().to_string())),
        }
    }

    /// Build the child enumerator for a container value. Fails with
    /// `NoFormatter` for values that are neither name-registered with a
    /// shape nor probe as a known container layout. A matching name rule
    /// is authoritative: a summary-only rule (`shape: None`) means the
    /// type gets no enumerator, even if it probes as a container.
    pub fn children(&self, value: V) -> Result<Provider<V>, InspectError> {
        let shape = match self.rule_for(value.type_name()) {
            Some(rule) => rule.shape,
            None => detect_shape(&value),
        };
        match shape {
            Some(shape) => Provider::for_shape(shape, value),
            None => Err(InspectError::NoFormatter(value.type_name().to_string())),
        }
    }
}

/// The formatter table a session registers at start: the runtime's string
/// type plus the array family by type-name pattern.
pub fn default_registry<V: ValueHandle>() -> anyhow::Result<Registry<V>> {
    let mut registry = Registry::new();
    registry.register_exact("Newstring", quoted_string_summary, None);
    registry.register_exact(
        "Array_View64",
        array_view_summary,
        Some(ContainerShape::Flat),
    );
    registry.register_pattern(
        "^Array<.*>$",
        resizable_array_summary_checked,
        Some(ContainerShape::Growable),
    )?;
    registry.register_pattern(
        "^Local_Array<.*>$",
        local_array_summary,
        Some(ContainerShape::GrowableInline),
    )?;
    registry.register_pattern(
        "^Bucket_Array<.*>$",
        bucket_array_summary,
        Some(ContainerShape::Chunked),
    )?;
    Ok(registry)
}
