//! Non-finite float detection
//!
//! `serde_json` writes NaN and infinities as `null`, which would save a
//! record that can never load again. This serializer walks a value without
//! producing output and stops at the first non-finite float.

use serde::ser::{self, Serialize};
use std::fmt;

/// Field name (innermost struct field or map key) holding the first
/// non-finite float in `value`
pub fn find_non_finite<T: Serialize + ?Sized>(value: &T) -> Option<String> {
    match value.serialize(FiniteCheck) {
        Err(Stop::NonFinite { field }) => Some(field.unwrap_or_default()),
        Ok(()) | Err(Stop::Custom) => None,
    }
}

#[derive(Debug)]
enum Stop {
    NonFinite { field: Option<String> },
    // A Serialize impl failed on its own; the real encoder reports it
    Custom,
}

impl Stop {
    fn within(self, name: &str) -> Self {
        match self {
            Stop::NonFinite { field: None } => Stop::NonFinite {
                field: Some(name.to_string()),
            },
            other => other,
        }
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stop::NonFinite { .. } => write!(f, "non-finite float"),
            Stop::Custom => write!(f, "serialization failed"),
        }
    }
}

impl std::error::Error for Stop {}

impl ser::Error for Stop {
    fn custom<M: fmt::Display>(_msg: M) -> Self {
        Stop::Custom
    }
}

fn check(v: f64) -> Result<(), Stop> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(Stop::NonFinite { field: None })
    }
}

struct FiniteCheck;

type Check = Result<(), Stop>;

impl ser::Serializer for FiniteCheck {
    type Ok = ();
    type Error = Stop;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = MapCheck;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _v: bool) -> Check {
        Ok(())
    }
    fn serialize_i8(self, _v: i8) -> Check {
        Ok(())
    }
    fn serialize_i16(self, _v: i16) -> Check {
        Ok(())
    }
    fn serialize_i32(self, _v: i32) -> Check {
        Ok(())
    }
    fn serialize_i64(self, _v: i64) -> Check {
        Ok(())
    }
    fn serialize_u8(self, _v: u8) -> Check {
        Ok(())
    }
    fn serialize_u16(self, _v: u16) -> Check {
        Ok(())
    }
    fn serialize_u32(self, _v: u32) -> Check {
        Ok(())
    }
    fn serialize_u64(self, _v: u64) -> Check {
        Ok(())
    }
    fn serialize_f32(self, v: f32) -> Check {
        check(f64::from(v))
    }
    fn serialize_f64(self, v: f64) -> Check {
        check(v)
    }
    fn serialize_char(self, _v: char) -> Check {
        Ok(())
    }
    fn serialize_str(self, _v: &str) -> Check {
        Ok(())
    }
    fn serialize_bytes(self, _v: &[u8]) -> Check {
        Ok(())
    }
    fn serialize_none(self) -> Check {
        Ok(())
    }
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Check {
        value.serialize(self)
    }
    fn serialize_unit(self) -> Check {
        Ok(())
    }
    fn serialize_unit_struct(self, _name: &'static str) -> Check {
        Ok(())
    }
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
    ) -> Check {
        Ok(())
    }
    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }
    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }
    fn serialize_seq(self, _len: Option<usize>) -> Result<Self, Stop> {
        Ok(self)
    }
    fn serialize_tuple(self, _len: usize) -> Result<Self, Stop> {
        Ok(self)
    }
    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self, Stop> {
        Ok(self)
    }
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, Stop> {
        Ok(self)
    }
    fn serialize_map(self, _len: Option<usize>) -> Result<MapCheck, Stop> {
        Ok(MapCheck { key: None })
    }
    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self, Stop> {
        Ok(self)
    }
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self, Stop> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = Stop;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = Stop;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = Stop;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = Stop;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(FiniteCheck)
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = Stop;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Check {
        value.serialize(FiniteCheck).map_err(|e| e.within(key))
    }
    fn end(self) -> Check {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = Stop;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, key: &'static str, value: &T) -> Check {
        value.serialize(FiniteCheck).map_err(|e| e.within(key))
    }
    fn end(self) -> Check {
        Ok(())
    }
}

struct MapCheck {
    key: Option<String>,
}

impl ser::SerializeMap for MapCheck {
    type Ok = ();
    type Error = Stop;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Check {
        self.key = serde_json::to_value(key)
            .ok()
            .and_then(|key| key.as_str().map(str::to_string));
        Ok(())
    }
    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Check {
        value.serialize(FiniteCheck).map_err(|e| match &self.key {
            Some(key) => e.within(key),
            None => e,
        })
    }
    fn end(self) -> Check {
        Ok(())
    }
}
