/// One-line summaries for the container family. Output formats match the
/// runtime's historical debugger rendering exactly, down to field naming.
use crate::error::InspectError;
use crate::value::{probe_field, ValueHandle, COUNT_FIELDS};

/// Flat view summary: `Array_View64(count=<N>)`. Views carry no
/// allocated-capacity field.
pub fn array_view_summary<V: ValueHandle>(value: &V) -> Result<String, InspectError> {
    let count = value.field("count")?.as_signed()?;
    Ok(format!("Array_View64(count={})", count))
}

/// Growable array summary: `Array(count=<N>,allocated_count=<M>)`, using
/// the `items`/`allocated_items` naming when the value carries that scheme
/// instead.
pub fn resizable_array_summary<V: ValueHandle>(value: &V) -> Result<String, InspectError> {
    let (name, count) = probe_field(value, COUNT_FIELDS)?;
    let allocated_name = format!("allocated_{}", name);
    let allocated = value.field(&allocated_name)?;
    Ok(format!(
        "Array({}={},allocated_{}={})",
        name,
        count.as_signed()?,
        name,
        allocated.as_signed()?
    ))
}

/// Growable array summary that reports `Array(uninitialised)` when the
/// backing pointer is null instead of printing counts.
pub fn resizable_array_summary_checked<V: ValueHandle>(value: &V) -> Result<String, InspectError> {
    if value.field("data")?.address()? == 0 {
        return Ok("Array(uninitialised)".to_string());
    }
    resizable_array_summary(value)
}

/// Inline-storage array summary: `Local_Array(count=<N>,allocated_count=<M>)`.
pub fn local_array_summary<V: ValueHandle>(value: &V) -> Result<String, InspectError> {
    let count = value.field("count")?.as_signed()?;
    let allocated = value.field("allocated_count")?.as_signed()?;
    Ok(format!(
        "Local_Array(count={},allocated_count={})",
        count, allocated
    ))
}

/// Bucketed array summary: `Bucket_Array(count=<N>)`. The count is the
/// logical total stored on the container, not a walk of the chain.
pub fn bucket_array_summary<V: ValueHandle>(value: &V) -> Result<String, InspectError> {
    let count = value.field("count")?.as_signed()?;
    Ok(format!("Bucket_Array(count={})", count))
}
