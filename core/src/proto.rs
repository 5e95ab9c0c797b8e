//! Wire records for the transaction core
//!
//! Hand-written prost messages. Field tags and framing are the network
//! protocol: the encoded [`Data`] record feeds the canonical transaction
//! hash, and [`Transaction`] is the gossip/storage format. Renumbering a
//! field is a hard fork.

/// Typed payload carried by a transaction
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Data {
    /// Payload type tag ("binary", "deploy", "call", "candidate", "delegate")
    #[prost(string, tag = "1")]
    pub type_tag: ::prost::alloc::string::String,
    /// Payload bytes; interpretation is fixed by the tag
    #[prost(bytes = "vec", tag = "2")]
    pub payload: ::prost::alloc::vec::Vec<u8>,
}

/// Full transaction wire record
///
/// `value`, `gas_price` and `gas_limit` are the fixed 16-byte big-endian
/// Uint128 encoding; `hash`, `from`, `to` and `sign` are raw bytes.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    #[prost(bytes = "vec", tag = "1")]
    pub hash: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub from: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub to: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "4")]
    pub value: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint64, tag = "5")]
    pub nonce: u64,
    #[prost(int64, tag = "6")]
    pub timestamp: i64,
    #[prost(message, optional, tag = "7")]
    pub data: ::core::option::Option<Data>,
    #[prost(uint32, tag = "8")]
    pub chain_id: u32,
    #[prost(bytes = "vec", tag = "9")]
    pub gas_price: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "10")]
    pub gas_limit: ::prost::alloc::vec::Vec<u8>,
    #[prost(uint32, tag = "11")]
    pub alg: u32,
    #[prost(bytes = "vec", tag = "12")]
    pub sign: ::prost::alloc::vec::Vec<u8>,
}
