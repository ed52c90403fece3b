//! Serde mirror of the node's externally-defined wire messages.
//!
//! The schema itself is an opaque transport contract owned by the node;
//! these structs only name the fields the client reads and writes. Byte
//! fields travel hex-encoded, amounts as decimal strings.

use serde::{Deserialize, Serialize};

/// Hex (de)serialization for raw byte fields.
pub mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        hex::decode(text).map_err(serde::de::Error::custom)
    }
}

/// Empty request body for parameterless procedures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Empty {}

/// A single opaque byte payload (hashes, raw addresses, heights).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SingleBytes {
    #[serde(with = "hex_bytes", default)]
    pub value: Vec<u8>,
}

impl SingleBytes {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlockchainStatus {
    #[serde(with = "hex_bytes")]
    pub best_block_hash: Vec<u8>,
    pub best_height: u64,
    pub consensus_info: String,
    #[serde(with = "hex_bytes")]
    pub best_chain_id_hash: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChainId {
    pub magic: String,
    pub public: bool,
    pub mainnet: bool,
    pub consensus: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChainInfo {
    pub id: ChainId,
    pub bp_number: u32,
    pub max_block_size: u64,
    pub max_tokens: String,
    pub staking_minimum: String,
    pub staking_total: String,
}

/// Node-state introspection request. `timeout` here is a node-side option,
/// distinct from the transport pass-through timeout.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NodeReq {
    #[serde(with = "hex_bytes")]
    pub timeout: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub component: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlockHeader {
    #[serde(with = "hex_bytes")]
    pub chain_id: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub prev_block_hash: Vec<u8>,
    pub block_no: u64,
    pub timestamp: i64,
    #[serde(with = "hex_bytes")]
    pub txs_root_hash: Vec<u8>,
    pub confirms: u64,
    #[serde(with = "hex_bytes")]
    pub pub_key: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub coinbase_account: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlockBody {
    pub txs: Vec<Tx>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Block {
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
    pub header: BlockHeader,
    pub body: BlockBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlockMetadata {
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
    pub header: BlockHeader,
    pub tx_count: u32,
}

/// Parameters for block-header listing: anchor by hash or height, plus
/// pagination and ordering.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ListParams {
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
    pub height: u64,
    pub size: u32,
    pub offset: u32,
    pub asc: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlockHeaderList {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TxBody {
    pub nonce: u64,
    #[serde(with = "hex_bytes")]
    pub account: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub recipient: Vec<u8>,
    pub amount: String,
    #[serde(with = "hex_bytes")]
    pub payload: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub chain_id_hash: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub sign: Vec<u8>,
    #[serde(rename = "type")]
    pub tx_type: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Tx {
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
    pub body: TxBody,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TxIdx {
    #[serde(with = "hex_bytes")]
    pub block_hash: Vec<u8>,
    pub idx: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TxInBlock {
    pub tx_idx: TxIdx,
    pub tx: Tx,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TxList {
    pub txs: Vec<Tx>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommitResult {
    #[serde(with = "hex_bytes")]
    pub hash: Vec<u8>,
    pub error: i32,
    pub detail: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommitResultList {
    pub results: Vec<CommitResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AccountState {
    pub nonce: u64,
    pub balance: String,
    #[serde(with = "hex_bytes")]
    pub code_hash: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub storage_root: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Staking {
    pub amount: String,
    pub when: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoteParams {
    pub id: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vote {
    #[serde(with = "hex_bytes")]
    pub candidate: Vec<u8>,
    pub amount: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoteList {
    pub votes: Vec<Vote>,
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Receipt {
    #[serde(with = "hex_bytes")]
    pub contract_address: Vec<u8>,
    pub status: String,
    pub ret: String,
    pub fee_used: String,
    pub cumulative_fee_used: String,
    pub block_no: u64,
    #[serde(with = "hex_bytes")]
    pub block_hash: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AbiFunction {
    pub name: String,
    pub arguments: Vec<AbiArgument>,
    pub view: bool,
    pub payable: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AbiArgument {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StateVar {
    pub name: String,
    #[serde(rename = "type")]
    pub var_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Abi {
    pub version: String,
    pub language: String,
    pub functions: Vec<AbiFunction>,
    pub state_variables: Vec<StateVar>,
}

/// A read-only contract call: ABI-level query info serialized by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContractQuery {
    #[serde(with = "hex_bytes")]
    pub contract_address: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub queryinfo: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StateQuery {
    #[serde(with = "hex_bytes")]
    pub contract_address: Vec<u8>,
    pub storage_keys: Vec<String>,
    #[serde(with = "hex_bytes")]
    pub root: Vec<u8>,
    pub compressed: bool,
}

/// A node-returned value plus an inclusion flag attesting whether the
/// queried key exists in the state tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContractVarProof {
    #[serde(with = "hex_bytes")]
    pub value: Vec<u8>,
    pub inclusion: bool,
    pub key: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StateQueryProof {
    pub var_proofs: Vec<ContractVarProof>,
}

/// Event query filter shared by the one-shot list call and the live stream.
/// `arg_filter` is a JSON object mapping argument index to expected value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventFilter {
    #[serde(with = "hex_bytes")]
    pub contract_address: Vec<u8>,
    pub event_name: String,
    pub blockfrom: u64,
    pub blockto: u64,
    pub desc: bool,
    pub arg_filter: String,
    pub recent_block_cnt: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Event {
    #[serde(with = "hex_bytes")]
    pub contract_address: Vec<u8>,
    pub event_name: String,
    pub json_args: String,
    pub event_idx: u32,
    #[serde(with = "hex_bytes")]
    pub tx_hash: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub block_hash: Vec<u8>,
    pub block_no: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventList {
    pub events: Vec<Event>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PeersParams {
    pub no_hidden: bool,
    pub show_self: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PeerAddress {
    pub address: String,
    pub port: u32,
    #[serde(with = "hex_bytes")]
    pub peer_id: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NewBlockNotice {
    #[serde(with = "hex_bytes")]
    pub block_hash: Vec<u8>,
    pub block_no: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Peer {
    pub address: PeerAddress,
    pub best_block: NewBlockNotice,
    pub state: i32,
    pub hidden: bool,
    pub self_peer: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PeerList {
    pub peers: Vec<Peer>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Name {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NameInfo {
    pub name: Name,
    #[serde(with = "hex_bytes")]
    pub owner: Vec<u8>,
    #[serde(with = "hex_bytes")]
    pub destination: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConsensusInfo {
    #[serde(rename = "type")]
    pub consensus_type: String,
    pub info: String,
    pub bps: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct KeyParams {
    pub key: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfigItem {
    pub props: std::collections::HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerInfo {
    pub status: std::collections::HashMap<String, String>,
    pub config: std::collections::HashMap<String, ConfigItem>,
}
