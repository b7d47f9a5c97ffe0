//! Decoding a body into a record that already holds values.
//!
//! Body decoders build a fresh value. To keep what the destination already
//! carries, it is first serialized to a [`serde_json::Value`]; every struct
//! the decoder then visits is completed with the entries the input did not
//! mention, taken from that snapshot. Nested structs are completed the same
//! way, so only the leaves present in the body change.

use serde::de::value::StrDeserializer;
use serde::de::{self, DeserializeSeed, Deserializer, IntoDeserializer, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};
use std::fmt;

/// Deserializes through `inner`, filling struct fields the input lacks from
/// `current`.
pub(crate) struct MergeDeserializer<'a, D> {
	inner: D,
	current: Option<&'a Value>,
}

impl<'a, D> MergeDeserializer<'a, D> {
	pub(crate) fn new(inner: D, current: &'a Value) -> Self {
		Self {
			inner,
			current: Some(current),
		}
	}
}

macro_rules! forward_deserialize {
	($($method:ident)*) => {$(
		fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Self::Error> {
			self.inner.$method(visitor)
		}
	)*};
}

impl<'de, D: Deserializer<'de>> Deserializer<'de> for MergeDeserializer<'_, D> {
	type Error = D::Error;

	forward_deserialize! {
		deserialize_any deserialize_bool
		deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
		deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
		deserialize_f32 deserialize_f64 deserialize_char deserialize_str deserialize_string
		deserialize_bytes deserialize_byte_buf deserialize_option deserialize_unit
		deserialize_seq deserialize_map deserialize_identifier deserialize_ignored_any
	}

	fn deserialize_unit_struct<V: Visitor<'de>>(
		self,
		name: &'static str,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.inner.deserialize_unit_struct(name, visitor)
	}

	fn deserialize_newtype_struct<V: Visitor<'de>>(
		self,
		name: &'static str,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.inner.deserialize_newtype_struct(name, visitor)
	}

	fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value, Self::Error> {
		self.inner.deserialize_tuple(len, visitor)
	}

	fn deserialize_tuple_struct<V: Visitor<'de>>(
		self,
		name: &'static str,
		len: usize,
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.inner.deserialize_tuple_struct(name, len, visitor)
	}

	fn deserialize_enum<V: Visitor<'de>>(
		self,
		name: &'static str,
		variants: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		self.inner.deserialize_enum(name, variants, visitor)
	}

	fn deserialize_struct<V: Visitor<'de>>(
		self,
		name: &'static str,
		fields: &'static [&'static str],
		visitor: V,
	) -> Result<V::Value, Self::Error> {
		let current = self.current.and_then(Value::as_object);
		self.inner.deserialize_struct(
			name,
			fields,
			MergeVisitor {
				visitor,
				current,
				fields,
			},
		)
	}

	fn is_human_readable(&self) -> bool {
		self.inner.is_human_readable()
	}
}

struct MergeVisitor<'a, V> {
	visitor: V,
	current: Option<&'a Map<String, Value>>,
	fields: &'static [&'static str],
}

impl<'de, V: Visitor<'de>> Visitor<'de> for MergeVisitor<'_, V> {
	type Value = V::Value;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.visitor.expecting(f)
	}

	fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
		self.visitor.visit_map(MergeMapAccess {
			inner: map,
			current: self.current,
			fields: self.fields,
			seen: Vec::new(),
			nested: None,
			pending: None,
			remaining: self.current.map(|current| current.iter()),
			input_done: false,
		})
	}

	// Sequence form of a struct (JSON arrays): every field is positional.
	fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
		self.visitor.visit_seq(seq)
	}
}

/// Yields the input entries first, then the snapshot entries for declared
/// fields the input did not carry.
struct MergeMapAccess<'a, A> {
	inner: A,
	current: Option<&'a Map<String, Value>>,
	fields: &'static [&'static str],
	seen: Vec<String>,
	/// Snapshot of the value behind the last input key.
	nested: Option<&'a Value>,
	/// Snapshot value to hand out for the last filled key.
	pending: Option<&'a Value>,
	remaining: Option<serde_json::map::Iter<'a>>,
	input_done: bool,
}

fn key_deserializer<E: de::Error>(key: &str) -> StrDeserializer<'_, E> {
	key.into_deserializer()
}

impl<'de, A: MapAccess<'de>> MapAccess<'de> for MergeMapAccess<'_, A> {
	type Error = A::Error;

	fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error> {
		if !self.input_done {
			if let Some(key) = self.inner.next_key::<String>()? {
				self.nested = self.current.and_then(|current| current.get(&key));
				let value = seed.deserialize(key_deserializer::<A::Error>(&key))?;
				self.seen.push(key);
				return Ok(Some(value));
			}
			self.input_done = true;
		}

		let Some(remaining) = self.remaining.as_mut() else {
			return Ok(None);
		};
		for (key, value) in remaining {
			let declared = self.fields.iter().any(|field| *field == key.as_str());
			if declared && !self.seen.contains(key) {
				self.pending = Some(value);
				return seed.deserialize(key_deserializer::<A::Error>(key)).map(Some);
			}
		}
		Ok(None)
	}

	fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Self::Error> {
		if let Some(value) = self.pending.take() {
			return seed.deserialize(value.clone()).map_err(de::Error::custom);
		}

		let current = self.nested.take();
		self.inner.next_value_seed(MergeSeed { seed, current })
	}
}

struct MergeSeed<'a, S> {
	seed: S,
	current: Option<&'a Value>,
}

impl<'de, S: DeserializeSeed<'de>> DeserializeSeed<'de> for MergeSeed<'_, S> {
	type Value = S::Value;

	fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
		self.seed.deserialize(MergeDeserializer {
			inner: deserializer,
			current: self.current,
		})
	}
}
