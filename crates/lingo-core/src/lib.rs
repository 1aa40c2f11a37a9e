#![forbid(unsafe_code)]

//! Core vocabulary for the lingo string engine.
//!
//! # Role in lingo
//! `lingo-core` owns the types every other crate speaks: the partitioned
//! [`StringId`] handle, the tagged [`Parameter`] and its fixed-capacity
//! [`ParameterStack`], the private-use [`ControlCode`] characters that the
//! formatter emits for the drawing layer, and [`TextDirection`].
//!
//! # How it fits in the system
//! `lingo-i18n` resolves identifiers to templates, `lingo-format` consumes
//! parameter stacks while rendering, and `lingo-glyph` skips control codes
//! while probing fonts. None of those depend on each other through this
//! crate; it carries no logic beyond the types themselves.

pub mod control;
pub mod direction;
pub mod param;
pub mod property;
pub mod string_id;

pub use control::{Colour, ControlCode, is_control_char, strip_controls};
pub use direction::{TextDirection, is_direction_char};
pub use param::{
    DEFAULT_CAPACITY, GameDate, ParamError, ParamKind, Parameter, ParameterStack,
};
pub use property::{VehicleClass, VehicleProperty};
pub use string_id::{ParseStringIdError, StringId, StringSource};
