//! noderpc-client — Typed client for a blockchain node's RPC surface.
//!
//! Wraps any [`NodeTransport`](noderpc_core::NodeTransport) in a
//! [`NodeClient`] exposing typed operations: chain status, blocks,
//! transactions, accounts, contracts, events, and live streams. Addresses,
//! hashes, and amounts use domain types with canonical textual forms.
//!
//! # Quick start
//! ```rust,no_run
//! use std::sync::Arc;
//! use noderpc_client::NodeClient;
//! # async fn example(transport: Arc<dyn noderpc_core::NodeTransport>) -> Result<(), noderpc_client::ClientError> {
//! let client = NodeClient::new(transport);
//! let status = client.blockchain().await?;
//! println!("best block {} at height {}", status.best_block_hash, status.best_height);
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod chainid;
pub mod client;
pub mod error;
pub mod filter;
pub mod models;
pub mod stream;
pub mod submit;

mod pipeline;

pub use address::{Address, ACCOUNT_NAME_LENGTH, ADDRESS_BYTE_LENGTH, ADDRESS_PREFIX};
pub use chainid::{ChainIdCache, ChainIdHash};
pub use client::{BlockRef, ClientConfig, NodeClient};
pub use error::{ClientError, TransactionError};
pub use filter::{ArgFilter, FilterQuery};
pub use models::{
    decode_hash, encode_hash, Abi, AbiFunction, AccountState, Amount, Block, BlockHeader,
    BlockMetadata, BlockPosition, BlockchainStatus, ChainInfo, ConsensusInfo, ContractCall,
    ContractStateQuery, Event, NameInfo, Peer, Receipt, ServerInfo, StakingInfo, StateQueryResult,
    StateVar, TxInfo, TxLookup, VoteInfo, HASH_BYTE_LENGTH,
};
pub use stream::{StreamEvent, Subscription, SubscriptionState};
pub use submit::SignedTransaction;
