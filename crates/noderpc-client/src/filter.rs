//! Event filter queries.
//!
//! A `FilterQuery` describes which contract events to match; it compiles to
//! the wire filter used identically by the one-shot list call and the live
//! event stream.

use std::collections::BTreeMap;

use serde_json::Value;

use noderpc_core::wire;

use crate::address::Address;

/// Argument-equality constraints for event matching.
///
/// Positional constraints match event arguments `0..n` in order; sparse
/// constraints name explicit argument indices. Both compile to the same
/// wire representation, so `[10]` and `{0: 10}` are equivalent queries.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgFilter {
    Positional(Vec<Value>),
    Sparse(BTreeMap<u32, Value>),
}

impl ArgFilter {
    fn to_sparse(&self) -> BTreeMap<u32, Value> {
        match self {
            Self::Sparse(map) => map.clone(),
            Self::Positional(values) => values
                .iter()
                .enumerate()
                .map(|(i, v)| (i as u32, v.clone()))
                .collect(),
        }
    }
}

/// A query for contract events. Constructed fresh per call and never mutated
/// after being turned into a wire request.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterQuery {
    /// Contract address the events were emitted by.
    pub address: Option<Address>,
    /// Exact event name to match.
    pub event_name: Option<String>,
    /// Argument-equality constraints.
    pub args: Option<ArgFilter>,
    /// Inclusive block-range bounds.
    pub block_from: Option<u64>,
    pub block_to: Option<u64>,
    /// Most-recent-first ordering.
    pub desc: bool,
    /// Restrict matching to the most recent N blocks.
    pub recent_block_count: Option<u32>,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            address: None,
            event_name: None,
            args: None,
            block_from: None,
            block_to: None,
            desc: true,
            recent_block_count: None,
        }
    }
}

impl FilterQuery {
    /// Match all events from one contract.
    pub fn for_address(address: Address) -> Self {
        Self {
            address: Some(address),
            ..Self::default()
        }
    }

    /// Compile to the wire filter message.
    pub fn to_wire(&self) -> wire::EventFilter {
        let arg_filter = match &self.args {
            None => String::new(),
            Some(args) => {
                let sparse: serde_json::Map<String, Value> = args
                    .to_sparse()
                    .into_iter()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect();
                Value::Object(sparse).to_string()
            }
        };
        wire::EventFilter {
            contract_address: self
                .address
                .as_ref()
                .map(|a| a.as_bytes().to_vec())
                .unwrap_or_default(),
            event_name: self.event_name.clone().unwrap_or_default(),
            blockfrom: self.block_from.unwrap_or_default(),
            blockto: self.block_to.unwrap_or_default(),
            desc: self.desc,
            arg_filter,
            recent_block_cnt: self.recent_block_count.unwrap_or_default(),
        }
    }
}
