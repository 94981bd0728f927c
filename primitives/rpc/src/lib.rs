// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! Shared plumbing for the pallet RPC crates.

use std::{
    fmt::{Debug, Display},
    result::Result as StdResult,
    str::FromStr,
};

use jsonrpsee::types::error::{CallError, ErrorObject};
use serde::{de, ser, Deserialize, Serialize};

pub use jsonrpsee::core::RpcResult as Result;

/// The call to runtime failed.
pub const RUNTIME_ERROR: i32 = 1;

/// The referenced entity does not exist on chain.
pub const NOT_FOUND_ERROR: i32 = 2;

/// The bytes failed to be decoded as a permlink.
pub const BAD_PERMLINK_ERROR: i32 = 3;

/// Converts a runtime trap into an RPC error.
pub fn runtime_error_into_rpc_err(err: impl Debug) -> jsonrpsee::core::Error {
    CallError::Custom(ErrorObject::owned(
        RUNTIME_ERROR,
        "Runtime trapped",
        Some(format!("{:?}", err)),
    ))
    .into()
}

/// An RPC error for an entity that is absent on chain.
pub fn not_found_rpc_err(what: &str) -> jsonrpsee::core::Error {
    CallError::Custom(ErrorObject::owned(NOT_FOUND_ERROR, what.to_string(), None::<()>)).into()
}

/// Balance type when interacting with RPC.
pub type RpcBalance<Balance> = RpcNumber<Balance>;

/// Curation/vote weight type when interacting with RPC.
pub type RpcWeight<Weight> = RpcNumber<Weight>;

/// A helper struct serializing wide numbers as decimal strings, since JSON
/// clients lose precision beyond 2^53.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct RpcNumber<T: Display + FromStr>(#[serde(with = "self::serde_num_str")] pub T);

impl<T: Display + FromStr> From<T> for RpcNumber<T> {
    fn from(value: T) -> Self {
        RpcNumber(value)
    }
}

/// Number string serialization/deserialization
pub mod serde_num_str {
    use super::*;

    /// A serializer that encodes the number as a string
    pub fn serialize<S, T>(value: &T, serializer: S) -> StdResult<S::Ok, S::Error>
    where
        S: ser::Serializer,
        T: Display,
    {
        serializer.serialize_str(&value.to_string())
    }

    /// A deserializer that decodes a string to the number.
    pub fn deserialize<'de, D, T>(deserializer: D) -> StdResult<T, D::Error>
    where
        D: de::Deserializer<'de>,
        T: FromStr,
    {
        let data = String::deserialize(deserializer)?;
        data.parse::<T>()
            .map_err(|_| de::Error::custom("Parse from string failed"))
    }
}
