// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reflection registry export.
//!
//! Walks a [`ReflectionRegistry`] and renders its registered type layouts
//! as JSON, for console dumps and offline diffing of menu definitions.

use std::io::Write;

use marquee_core::reflect::{FieldType, ReflectionRegistry};
use serde_json::{Map, Value, json};

fn field_type_value(field_type: &FieldType) -> Value {
    match field_type {
        FieldType::F32 => json!("f32"),
        FieldType::Vec3 => json!("vec3"),
        FieldType::Vec4 => json!("vec4"),
        FieldType::Pose => json!("pose"),
        FieldType::Bounds => json!("bounds"),
        FieldType::Text => json!("text"),
        FieldType::Handle => json!("handle"),
        FieldType::ArrayOf(element, len) => json!({
            "array": field_type_value(element),
            "len": len,
        }),
    }
}

/// Renders every registered type layout as a JSON object keyed by type
/// name, with fields in declaration order.
#[must_use]
pub fn registry_to_json(registry: &ReflectionRegistry) -> Value {
    let mut names: Vec<&'static str> = registry.type_names().collect();
    names.sort_unstable();

    let mut types = Map::new();
    for name in names {
        // Names come straight from the key set, so describe cannot fail.
        let Ok(fields) = registry.describe(name) else {
            continue;
        };
        let fields: Vec<Value> = fields
            .iter()
            .map(|f| {
                json!({
                    "name": f.name,
                    "byte_offset": f.byte_offset,
                    "field_type": field_type_value(&f.field_type),
                })
            })
            .collect();
        types.insert(name.to_owned(), Value::Array(fields));
    }
    Value::Object(types)
}

/// Writes the registry as pretty-printed JSON.
pub fn write_registry_json<W: Write>(
    registry: &ReflectionRegistry,
    writer: W,
) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &registry_to_json(registry))
}
