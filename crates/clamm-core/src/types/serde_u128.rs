//! Serde helpers for 128-bit integers
//!
//! Q64.64 values, liquidity and growth accumulators are written as decimal
//! strings so JSON hosts without 128-bit numbers can round-trip them.
//! Deserialization also accepts plain JSON integers.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeTuple, Serializer};

struct IntVisitor<T>(std::marker::PhantomData<T>);

impl<'de, T> Visitor<'de> for IntVisitor<T>
where
    T: FromStr + TryFrom<u64> + TryFrom<i64>,
{
    type Value = T;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an integer or a decimal string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<T, E> {
        T::from_str(value.trim()).map_err(|_| E::custom(format!("invalid integer: {}", value)))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<T, E> {
        T::try_from(value).map_err(|_| E::custom(format!("integer out of range: {}", value)))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<T, E> {
        T::try_from(value).map_err(|_| E::custom(format!("integer out of range: {}", value)))
    }
}

fn deserialize_int<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + TryFrom<u64> + TryFrom<i64>,
{
    deserializer.deserialize_any(IntVisitor(std::marker::PhantomData))
}

/// `u128` as a decimal string
pub mod u128_string {
    use super::*;

    pub fn serialize<S>(value: &u128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u128, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_int(deserializer)
    }
}

/// `i128` as a decimal string
pub mod i128_string {
    use super::*;

    pub fn serialize<S>(value: &i128, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<i128, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize_int(deserializer)
    }
}

/// `Option<u128>` as a decimal string or null
pub mod option_u128_string {
    use super::*;
    use serde::Deserialize;

    pub fn serialize<S>(value: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_str(&value.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<u128>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(serde::Deserialize)]
        struct Wrapper(#[serde(with = "super::u128_string")] u128);

        let wrapper = Option::<Wrapper>::deserialize(deserializer)?;
        Ok(wrapper.map(|Wrapper(value)| value))
    }
}

/// `[u128; N]` as an array of decimal strings
pub mod u128_string_array {
    use super::*;

    pub fn serialize<S, const N: usize>(values: &[u128; N], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(N)?;
        for value in values {
            tuple.serialize_element(&value.to_string())?;
        }
        tuple.end()
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<[u128; N], D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ArrayVisitor<const N: usize>;

        impl<'de, const N: usize> Visitor<'de> for ArrayVisitor<N> {
            type Value = [u128; N];

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                write!(formatter, "an array of {} integers", N)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                #[derive(serde::Deserialize)]
                struct Element(#[serde(with = "super::u128_string")] u128);

                let mut values = [0u128; N];
                for (index, slot) in values.iter_mut().enumerate() {
                    let Element(value) = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(index, &self))?;
                    *slot = value;
                }
                Ok(values)
            }
        }

        deserializer.deserialize_tuple(N, ArrayVisitor::<N>)
    }
}
