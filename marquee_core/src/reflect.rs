// Copyright 2026 the Marquee Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime type descriptions for tooling.
//!
//! The registry maps type names to flat field layouts so debug tooling can
//! walk live objects without compile-time knowledge of them, and to
//! component factories so serialized menu definitions can be instantiated
//! by name. It is a plain value, not a global: each tool owns its own.

use core::any::Any;
use std::collections::HashMap;

use crate::component::Component;
use crate::error::UiError;

/// The primitive shape of a reflected field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    /// A single `f32`.
    F32,
    /// A `Vector3<f32>`.
    Vec3,
    /// A `Vector4<f32>` (typically a color).
    Vec4,
    /// A [`Pose`](crate::math::Pose).
    Pose,
    /// A [`Bounds`](crate::math::Bounds).
    Bounds,
    /// An owned string.
    Text,
    /// A [`NodeHandle`](crate::node::NodeHandle).
    Handle,
    /// An array of some element shape and its element count. Dynamically
    /// sized arrays also carry a [`FieldDescriptor::array_resize`] hook.
    ArrayOf(Box<FieldType>, usize),
}

/// Resizes a dynamically sized array field in place. The first argument is
/// the containing object; the second is the new element count.
pub type ArrayResizeFn = fn(&mut dyn Any, usize);

/// One field of a reflected type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The field's name as written in source.
    pub name: &'static str,
    /// Offset from the start of the containing struct, from
    /// [`core::mem::offset_of!`].
    pub byte_offset: usize,
    /// The field's shape.
    pub field_type: FieldType,
    /// For dynamically sized array fields, a callback that resizes the
    /// array through the containing object. `None` for everything else.
    pub array_resize: Option<ArrayResizeFn>,
}

type Factory = fn() -> Box<dyn Component>;

/// A registry of type layouts and component factories, keyed by type name.
#[derive(Default)]
pub struct ReflectionRegistry {
    types: HashMap<&'static str, Vec<FieldDescriptor>>,
    factories: HashMap<&'static str, Factory>,
}

impl core::fmt::Debug for ReflectionRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReflectionRegistry")
            .field("types", &self.types.len())
            .field("factories", &self.factories.len())
            .finish_non_exhaustive()
    }
}

impl ReflectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the field layout for `name`.
    pub fn register_type(&mut self, name: &'static str, fields: Vec<FieldDescriptor>) {
        self.types.insert(name, fields);
    }

    /// Looks up the field layout for `name`.
    pub fn describe(&self, name: &str) -> Result<&[FieldDescriptor], UiError> {
        self.types
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| UiError::UnknownType(name.to_owned()))
    }

    /// Registers (or replaces) a component factory for `name`.
    pub fn register_factory(&mut self, name: &'static str, factory: Factory) {
        self.factories.insert(name, factory);
    }

    /// Instantiates the component registered under `name`.
    pub fn construct(&self, name: &str) -> Result<Box<dyn Component>, UiError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| UiError::UnknownType(name.to_owned()))
    }

    /// The registered type names, in no particular order.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::FadeComponent;
    use crate::easing::EaseFunc;
    use crate::math::Pose;
    use cgmath::{Vector3, Vector4};

    struct Placement {
        pose: Pose,
        scale: Vector3<f32>,
        color: Vector4<f32>,
        opacity: f32,
    }

    fn placement_fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor {
                name: "pose",
                byte_offset: core::mem::offset_of!(Placement, pose),
                field_type: FieldType::Pose,
                array_resize: None,
            },
            FieldDescriptor {
                name: "scale",
                byte_offset: core::mem::offset_of!(Placement, scale),
                field_type: FieldType::Vec3,
                array_resize: None,
            },
            FieldDescriptor {
                name: "color",
                byte_offset: core::mem::offset_of!(Placement, color),
                field_type: FieldType::Vec4,
                array_resize: None,
            },
            FieldDescriptor {
                name: "opacity",
                byte_offset: core::mem::offset_of!(Placement, opacity),
                field_type: FieldType::F32,
                array_resize: None,
            },
        ]
    }

    #[test]
    fn describe_returns_registered_fields() {
        let mut registry = ReflectionRegistry::new();
        registry.register_type("Placement", placement_fields());

        let fields = registry.describe("Placement").unwrap();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].name, "pose");
        assert_eq!(fields[3].field_type, FieldType::F32);
        assert_eq!(
            fields[3].byte_offset,
            core::mem::offset_of!(Placement, opacity)
        );
    }

    #[test]
    fn describe_unknown_type_errors() {
        let registry = ReflectionRegistry::new();
        let err = registry.describe("Nope").unwrap_err();
        assert!(matches!(err, UiError::UnknownType(name) if name == "Nope"));
    }

    #[test]
    fn construct_builds_registered_components() {
        let mut registry = ReflectionRegistry::new();
        registry.register_factory("FadeComponent", || {
            Box::new(FadeComponent::new(4.0, EaseFunc::None))
        });

        let component = registry.construct("FadeComponent").unwrap();
        assert_eq!(component.type_name(), "FadeComponent");
        assert!(registry.construct("Missing").is_err());
    }

    #[test]
    fn array_resize_hook_resizes_through_any() {
        struct Row {
            corners: Vec<Vector3<f32>>,
        }

        fn resize_corners(obj: &mut dyn Any, len: usize) {
            if let Some(row) = obj.downcast_mut::<Row>() {
                row.corners.resize(len, Vector3::new(0.0, 0.0, 0.0));
            }
        }

        let mut registry = ReflectionRegistry::new();
        registry.register_type(
            "Row",
            vec![FieldDescriptor {
                name: "corners",
                byte_offset: core::mem::offset_of!(Row, corners),
                field_type: FieldType::ArrayOf(Box::new(FieldType::Vec3), 1),
                array_resize: Some(resize_corners),
            }],
        );

        let fields = registry.describe("Row").unwrap();
        let resize = fields[0].array_resize.unwrap();
        let mut row = Row {
            corners: vec![Vector3::new(1.0, 2.0, 3.0)],
        };
        resize(&mut row, 4);
        assert_eq!(row.corners.len(), 4);
        assert_eq!(row.corners[0], Vector3::new(1.0, 2.0, 3.0));

        // Scalar fields carry no hook.
        registry.register_type("Placement", placement_fields());
        assert!(registry.describe("Placement").unwrap()[0].array_resize.is_none());
    }

    #[test]
    fn array_field_types_compare_structurally() {
        let inner = FieldType::ArrayOf(Box::new(FieldType::Vec3), 4);
        assert_eq!(inner, FieldType::ArrayOf(Box::new(FieldType::Vec3), 4));
        assert_ne!(inner, FieldType::ArrayOf(Box::new(FieldType::Vec4), 4));
    }
}
