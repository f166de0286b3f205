use serde::Serialize;
use serde::ser::{self, Error as _, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// Compact JSON of `args` with every object's keys sorted, so equal
/// arguments always map to the same key.
pub fn derive_key<A: Serialize + ?Sized>(args: &A) -> serde_json::Result<String> {
    let value = canonicalize(to_value(args)?);
    serde_json::to_string(&value)
}

/// Like [`serde_json::to_value`], but NaN and infinities are an error
/// instead of `null`.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Value> {
    value.serialize(FiniteCheck)?;
    serde_json::to_value(value)
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

type Check = serde_json::Result<()>;

/// Walks a value and fails on the first non-finite float.
#[derive(Clone, Copy)]
struct FiniteCheck;

fn finite(v: f64) -> Check {
    if v.is_finite() {
        Ok(())
    } else {
        Err(serde_json::Error::custom(format!("{v} has no JSON representation")))
    }
}

impl Serializer for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Check { Ok(()) }

    fn serialize_i8(self, _: i8) -> Check { Ok(()) }

    fn serialize_i16(self, _: i16) -> Check { Ok(()) }

    fn serialize_i32(self, _: i32) -> Check { Ok(()) }

    fn serialize_i64(self, _: i64) -> Check { Ok(()) }

    fn serialize_i128(self, _: i128) -> Check { Ok(()) }

    fn serialize_u8(self, _: u8) -> Check { Ok(()) }

    fn serialize_u16(self, _: u16) -> Check { Ok(()) }

    fn serialize_u32(self, _: u32) -> Check { Ok(()) }

    fn serialize_u64(self, _: u64) -> Check { Ok(()) }

    fn serialize_u128(self, _: u128) -> Check { Ok(()) }

    fn serialize_f32(self, v: f32) -> Check { finite(f64::from(v)) }

    fn serialize_f64(self, v: f64) -> Check { finite(v) }

    fn serialize_char(self, _: char) -> Check { Ok(()) }

    fn serialize_str(self, _: &str) -> Check { Ok(()) }

    fn serialize_bytes(self, _: &[u8]) -> Check { Ok(()) }

    fn serialize_none(self) -> Check { Ok(()) }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Check { value.serialize(self) }

    fn serialize_unit(self) -> Check { Ok(()) }

    fn serialize_unit_struct(self, _: &'static str) -> Check { Ok(()) }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Check { Ok(()) }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(self, _: &'static str, value: &T) -> Check {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Check {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> serde_json::Result<Self> { Ok(self) }

    fn serialize_tuple(self, _: usize) -> serde_json::Result<Self> { Ok(self) }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> serde_json::Result<Self> { Ok(self) }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> serde_json::Result<Self> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> serde_json::Result<Self> { Ok(self) }

    fn serialize_struct(self, _: &'static str, _: usize) -> serde_json::Result<Self> { Ok(self) }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> serde_json::Result<Self> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Check { value.serialize(*self) }

    fn end(self) -> Check { Ok(()) }
}

impl ser::SerializeTuple for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Check { value.serialize(*self) }

    fn end(self) -> Check { Ok(()) }
}

impl ser::SerializeTupleStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Check { value.serialize(*self) }

    fn end(self) -> Check { Ok(()) }
}

impl ser::SerializeTupleVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Check { value.serialize(*self) }

    fn end(self) -> Check { Ok(()) }
}

impl ser::SerializeMap for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Check { key.serialize(*self) }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Check { value.serialize(*self) }

    fn end(self) -> Check { Ok(()) }
}

impl ser::SerializeStruct for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _: &'static str, value: &T) -> Check {
        value.serialize(*self)
    }

    fn end(self) -> Check { Ok(()) }
}

impl ser::SerializeStructVariant for FiniteCheck {
    type Ok = ();
    type Error = serde_json::Error;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, _: &'static str, value: &T) -> Check {
        value.serialize(*self)
    }

    fn end(self) -> Check { Ok(()) }
}
