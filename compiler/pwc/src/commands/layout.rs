//! The `layout` command: print the planned slot table.

use std::fmt::Write;
use std::path::Path;

use pw_schema::{ContractSchema, StorageField};

use super::compile_config;
use crate::DriverError;

/// Load the configuration at `path` and format its slot table.
pub fn layout_file(path: &Path) -> Result<String, DriverError> {
    Ok(format_layout(&compile_config(path)?))
}

/// Format the slot table of `schema`.
///
/// One row per field and word it occupies, giving the bit range within
/// that word and, for arrays, the elements stored there. Dynamic fields are
/// listed after the packed words.
pub fn format_layout(schema: &ContractSchema) -> String {
    let layout = &schema.storage;
    let mut out = String::new();
    let _ = writeln!(out, "{}: {} storage words", schema.name, layout.slot_count());

    for (index, slot) in layout.slots().iter().enumerate() {
        let _ = writeln!(out, "slot {index}");
        for field in slot.field_ids.iter().filter_map(|&id| layout.field(id)) {
            let chunks: Vec<_> = field
                .chunks()
                .into_iter()
                .filter(|c| c.slot as usize == index)
                .collect();
            let (Some(first), Some(last)) = (chunks.first(), chunks.last()) else {
                continue;
            };
            let start = chunks.iter().map(|c| c.offset).min().unwrap_or(0);
            let end = chunks.iter().map(|c| c.offset + c.bits).max().unwrap_or(0);
            let _ = write!(
                out,
                "  {:<16}{:<12}{start}..{end}",
                field.key(),
                type_label(field)
            );
            if field.is_array() {
                let _ = write!(out, "  elements {}..={}", first.element, last.element);
            }
            out.push('\n');
        }
    }

    let mut dynamic = layout.dynamic_fields().peekable();
    if dynamic.peek().is_some() {
        out.push_str("dynamic\n");
        for field in dynamic {
            let _ = writeln!(out, "  {:<16}{}[]", field.key(), field.field_type.name());
        }
    }

    out
}

fn type_label(field: &StorageField) -> String {
    if field.is_array() {
        format!("{}[{}]", field.field_type.name(), field.element_count())
    } else {
        field.field_type.name().to_string()
    }
}
