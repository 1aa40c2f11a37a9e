#![forbid(unsafe_code)]

//! Typed parameter slots consumed by format templates.
//!
//! # Invariants
//!
//! 1. **Tags are sticky**: a slot keeps the tag it was written with until it
//!    is overwritten or cleared. Reading a slot with the wrong accessor
//!    returns [`ParamError::TypeMismatch`]; nothing is reinterpreted.
//!
//! 2. **Fixed capacity**: a stack never grows past the capacity it was
//!    created with. Writing past it is a caller bug and panics.
//!
//! 3. **Copies never alias**: [`ParameterStack::sub_stack`],
//!    [`ParameterStack::copy_in`] and [`ParameterStack::copy_out`] clone
//!    slot values, so a nested render can never disturb slots outside the
//!    copied range.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Read past capacity | Template references a missing slot | `Err(OutOfRange)` |
//! | Read of unset slot | Caller forgot a parameter | `Err(Unset)` |
//! | Wrong accessor | Tag differs from what the directive needs | `Err(TypeMismatch)` |
//! | Write past capacity | Caller bug | Panic |

use std::fmt;

use crate::string_id::StringId;

/// Capacity of the process-wide parameter stack.
pub const DEFAULT_CAPACITY: usize = 20;

/// A calendar date, counted in days since 0000-01-01 (proleptic Gregorian).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct GameDate(pub i32);

impl GameDate {
    /// Day count since 0000-01-01.
    #[must_use]
    pub const fn days(self) -> i32 {
        self.0
    }
}

/// The tag of a [`Parameter`], or the tag class a directive expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Unsigned,
    Signed,
    /// Either integer tag, as long as the value fits the reader.
    Integer,
    Text,
    StringRef,
    Date,
}

impl ParamKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unsigned => "unsigned integer",
            Self::Signed => "signed integer",
            Self::Integer => "integer",
            Self::Text => "text",
            Self::StringRef => "string reference",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from reading parameter slots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    /// The index lies beyond the stack's capacity.
    #[error("parameter {index} is out of range (capacity {capacity})")]
    OutOfRange { index: usize, capacity: usize },
    /// The slot was never written since the last reset.
    #[error("parameter {index} is unset")]
    Unset { index: usize },
    /// The slot holds a different tag than the reader expects.
    #[error("parameter {index}: expected {expected}, found {found}")]
    TypeMismatch {
        index: usize,
        expected: ParamKind,
        found: ParamKind,
    },
}

/// A single typed parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parameter {
    Unsigned(u64),
    Signed(i64),
    /// Owned text, always inserted verbatim.
    Text(String),
    /// Another string, expanded recursively.
    StringRef(StringId),
    Date(GameDate),
}

impl Parameter {
    /// The tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ParamKind {
        match self {
            Self::Unsigned(_) => ParamKind::Unsigned,
            Self::Signed(_) => ParamKind::Signed,
            Self::Text(_) => ParamKind::Text,
            Self::StringRef(_) => ParamKind::StringRef,
            Self::Date(_) => ParamKind::Date,
        }
    }

    /// Signed view of an integer value, if it has one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::Signed(v) => Some(v),
            Self::Unsigned(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// Unsigned view of an integer value, if it has one.
    #[must_use]
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Self::Unsigned(v) => Some(v),
            Self::Signed(v) => u64::try_from(v).ok(),
            _ => None,
        }
    }
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Parameter {
            fn from(v: $t) -> Self {
                Self::Unsigned(v as u64)
            }
        })*
    };
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Parameter {
            fn from(v: $t) -> Self {
                Self::Signed(v as i64)
            }
        })*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, usize);
impl_from_signed!(i8, i16, i32, i64, isize);

impl From<String> for Parameter {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Parameter {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<StringId> for Parameter {
    fn from(v: StringId) -> Self {
        Self::StringRef(v)
    }
}

impl From<GameDate> for Parameter {
    fn from(v: GameDate) -> Self {
        Self::Date(v)
    }
}

/// An ordered, fixed-capacity array of optional [`Parameter`] slots.
///
/// # Example
///
/// ```
/// use lingo_core::{ParameterStack, ParamError, StringId};
///
/// let mut params = ParameterStack::new(4);
/// params.set(0, 1500u64);
/// params.set_text(1, "Fooville");
///
/// assert_eq!(params.integer(0), Ok(1500));
/// assert_eq!(params.text(1), Ok("Fooville"));
/// assert!(matches!(params.string_id(1), Err(ParamError::TypeMismatch { .. })));
/// assert_eq!(params.integer(2), Err(ParamError::Unset { index: 2 }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterStack {
    slots: Vec<Option<Parameter>>,
}

impl ParameterStack {
    /// Create a stack with `capacity` unset slots.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    /// Create a stack holding exactly the given values.
    #[must_use]
    pub fn from_params(params: impl IntoIterator<Item = Parameter>) -> Self {
        Self {
            slots: params.into_iter().map(Some).collect(),
        }
    }

    /// Maximum number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Store a value at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`capacity`](Self::capacity).
    pub fn set(&mut self, index: usize, value: impl Into<Parameter>) {
        let capacity = self.capacity();
        assert!(
            index < capacity,
            "parameter index {index} exceeds stack capacity {capacity}"
        );
        self.slots[index] = Some(value.into());
    }

    /// Bind owned text to `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`capacity`](Self::capacity).
    pub fn set_text(&mut self, index: usize, text: impl Into<String>) {
        self.set(index, Parameter::Text(text.into()));
    }

    /// Store the number that occupies the widest space among values with
    /// `count` digits, for size estimation. `front` is used as the leading
    /// digit and `next` for the rest (a leading zero would be dropped).
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`capacity`](Self::capacity).
    pub fn set_max_digits(&mut self, index: usize, count: u32, front: u8, next: u8) {
        let mut val = u64::from(if count > 1 { front } else { next });
        for _ in 1..count {
            val = val.saturating_mul(10).saturating_add(u64::from(next));
        }
        self.set(index, val);
    }

    /// Like [`set_max_digits`](Self::set_max_digits), sized for the number
    /// of digits in `max_value` but never fewer than `min_count`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`capacity`](Self::capacity).
    pub fn set_max_value(&mut self, index: usize, max_value: u64, min_count: u32, front: u8, next: u8) {
        let digits = max_value.checked_ilog10().map_or(1, |d| d + 1);
        self.set_max_digits(index, digits.max(min_count), front, next);
    }

    /// Unset a single slot.
    pub fn clear_slot(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = None;
        }
    }

    /// Unset every slot, keeping the capacity.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Move all values out, leaving every slot unset.
    #[must_use]
    pub fn take(&mut self) -> Self {
        let capacity = self.capacity();
        std::mem::replace(self, Self::new(capacity))
    }

    /// Whether `index` holds a value.
    #[must_use]
    pub fn is_set(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(Some(_)))
    }

    /// Raw access to a slot.
    pub fn get(&self, index: usize) -> Result<&Parameter, ParamError> {
        match self.slots.get(index) {
            None => Err(ParamError::OutOfRange {
                index,
                capacity: self.capacity(),
            }),
            Some(None) => Err(ParamError::Unset { index }),
            Some(Some(value)) => Ok(value),
        }
    }

    /// Read a slot as a signed integer. Both integer tags are accepted when
    /// the value fits.
    pub fn integer(&self, index: usize) -> Result<i64, ParamError> {
        let value = self.get(index)?;
        value
            .as_i64()
            .ok_or_else(|| mismatch(index, ParamKind::Integer, value))
    }

    /// Read a slot as an unsigned integer. Both integer tags are accepted
    /// when the value fits.
    pub fn unsigned(&self, index: usize) -> Result<u64, ParamError> {
        let value = self.get(index)?;
        value
            .as_u64()
            .ok_or_else(|| mismatch(index, ParamKind::Unsigned, value))
    }

    /// Read a text slot.
    pub fn text(&self, index: usize) -> Result<&str, ParamError> {
        match self.get(index)? {
            Parameter::Text(text) => Ok(text),
            other => Err(mismatch(index, ParamKind::Text, other)),
        }
    }

    /// Read a string-reference slot.
    pub fn string_id(&self, index: usize) -> Result<StringId, ParamError> {
        match self.get(index)? {
            Parameter::StringRef(id) => Ok(*id),
            other => Err(mismatch(index, ParamKind::StringRef, other)),
        }
    }

    /// Read a date slot.
    pub fn date(&self, index: usize) -> Result<GameDate, ParamError> {
        match self.get(index)? {
            Parameter::Date(date) => Ok(*date),
            other => Err(mismatch(index, ParamKind::Date, other)),
        }
    }

    /// Copy `src` into consecutive slots starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the copied range does not fit in the stack.
    pub fn copy_in(&mut self, offset: usize, src: &[Parameter]) {
        let capacity = self.capacity();
        let end = offset.saturating_add(src.len());
        assert!(
            end <= capacity,
            "copying {} parameters to offset {offset} exceeds stack capacity {capacity}",
            src.len()
        );
        for (slot, value) in self.slots[offset..end].iter_mut().zip(src) {
            *slot = Some(value.clone());
        }
    }

    /// Copy `dest.len()` slots starting at `offset` into `dest`.
    ///
    /// # Panics
    ///
    /// Panics if the copied range does not fit in the stack.
    pub fn copy_out(&self, dest: &mut [Option<Parameter>], offset: usize) {
        let capacity = self.capacity();
        let end = offset.saturating_add(dest.len());
        assert!(
            end <= capacity,
            "copying {} parameters from offset {offset} exceeds stack capacity {capacity}",
            dest.len()
        );
        dest.clone_from_slice(&self.slots[offset..end]);
    }

    /// A fresh stack holding a copy of up to `count` slots from `offset`.
    ///
    /// The range is clamped to the capacity, so this is safe to call with
    /// indices taken from untrusted templates.
    #[must_use]
    pub fn sub_stack(&self, offset: usize, count: usize) -> Self {
        let start = offset.min(self.capacity());
        let end = offset.saturating_add(count).min(self.capacity());
        Self {
            slots: self.slots[start..end].to_vec(),
        }
    }

    /// Shift every slot up by `amount`, making room at the front. Values
    /// pushed past the capacity are dropped; the first `amount` slots are
    /// left unset.
    pub fn shift(&mut self, amount: usize) {
        let amount = amount.min(self.capacity());
        self.slots.rotate_right(amount);
        self.slots[..amount].iter_mut().for_each(|slot| *slot = None);
    }

    /// A copy of this stack with `overrides` written over it. The capacity
    /// grows to fit the highest overridden slot.
    #[must_use]
    pub fn with_overrides(&self, overrides: &[(usize, Parameter)]) -> Self {
        let needed = overrides
            .iter()
            .map(|(index, _)| index.saturating_add(1))
            .max()
            .unwrap_or(0);
        let mut slots = self.slots.clone();
        if slots.len() < needed {
            slots.resize(needed, None);
        }
        for (index, value) in overrides {
            slots[*index] = Some(value.clone());
        }
        Self { slots }
    }

    /// Iterate over all slots in order.
    pub fn iter(&self) -> impl Iterator<Item = Option<&Parameter>> {
        self.slots.iter().map(Option::as_ref)
    }
}

fn mismatch(index: usize, expected: ParamKind, found: &Parameter) -> ParamError {
    ParamError::TypeMismatch {
        index,
        expected,
        found: found.kind(),
    }
}
