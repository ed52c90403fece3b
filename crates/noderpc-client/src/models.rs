//! Domain values returned by client operations, with conversions from the
//! wire mirror types. Callers never see wire-level shapes.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use noderpc_core::wire;

use crate::address::Address;
use crate::chainid::ChainIdHash;
use crate::error::ClientError;

/// Expected byte length of block and transaction hashes.
pub const HASH_BYTE_LENGTH: usize = 32;

/// Encode a block or transaction hash in its canonical textual form.
pub fn encode_hash(bytes: &[u8]) -> String {
    bs58::encode(bytes).into_string()
}

/// Decode a textual hash, enforcing the canonical length. Length errors are
/// validation failures: they are caught before any network access.
pub fn decode_hash(text: &str) -> Result<Vec<u8>, ClientError> {
    let bytes = bs58::decode(text)
        .into_vec()
        .map_err(|e| ClientError::validation(format!("invalid hash encoding: {e}")))?;
    if bytes.len() != HASH_BYTE_LENGTH {
        return Err(ClientError::validation(format!(
            "invalid hash length ({}), must be {} bytes",
            bytes.len(),
            HASH_BYTE_LENGTH
        )));
    }
    Ok(bytes)
}

/// A token amount in base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(pub u128);

impl Amount {
    pub(crate) fn from_wire(text: &str) -> Result<Self, ClientError> {
        if text.is_empty() {
            return Ok(Self(0));
        }
        text.parse::<u128>()
            .map(Self)
            .map_err(|e| ClientError::decoding(format!("invalid amount {text:?}: {e}")))
    }

    pub(crate) fn to_wire(self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Amount {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
    }
}

/// A transaction as recorded by the node.
#[derive(Debug, Clone, PartialEq)]
pub struct TxInfo {
    pub hash: String,
    pub nonce: u64,
    pub from: Address,
    pub to: Option<Address>,
    pub amount: Amount,
    pub payload: Vec<u8>,
    pub chain_id_hash: ChainIdHash,
    pub signature: Vec<u8>,
    pub tx_type: u32,
}

impl TxInfo {
    pub(crate) fn from_wire(tx: wire::Tx) -> Result<Self, ClientError> {
        let body = tx.body;
        let to = if body.recipient.is_empty() {
            None
        } else {
            Some(Address::from_bytes(body.recipient))
        };
        Ok(Self {
            hash: encode_hash(&tx.hash),
            nonce: body.nonce,
            from: Address::from_bytes(body.account),
            to,
            amount: Amount::from_wire(&body.amount)?,
            payload: body.payload,
            chain_id_hash: ChainIdHash::from_bytes(body.chain_id_hash),
            signature: body.sign,
            tx_type: body.tx_type,
        })
    }
}

/// Where a transaction sits inside a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPosition {
    pub block_hash: String,
    pub index: u32,
}

/// Result of a transaction lookup. `block` is present when the transaction
/// was found in a block; a pool hit carries only the transaction. Partial
/// success is modeled here, not as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct TxLookup {
    pub block: Option<BlockPosition>,
    pub tx: TxInfo,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockHeader {
    pub chain_id: Vec<u8>,
    pub prev_block_hash: String,
    pub block_no: u64,
    pub timestamp: i64,
    pub confirms: u64,
    pub coinbase_account: Option<Address>,
}

impl BlockHeader {
    fn from_wire(header: wire::BlockHeader) -> Self {
        let coinbase_account = if header.coinbase_account.is_empty() {
            None
        } else {
            Some(Address::from_bytes(header.coinbase_account))
        };
        Self {
            chain_id: header.chain_id,
            prev_block_hash: encode_hash(&header.prev_block_hash),
            block_no: header.block_no,
            timestamp: header.timestamp,
            confirms: header.confirms,
            coinbase_account,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub hash: String,
    pub header: BlockHeader,
    pub txs: Vec<TxInfo>,
}

impl Block {
    pub(crate) fn from_wire(block: wire::Block) -> Result<Self, ClientError> {
        Ok(Self {
            hash: encode_hash(&block.hash),
            header: BlockHeader::from_wire(block.header),
            txs: block
                .body
                .txs
                .into_iter()
                .map(TxInfo::from_wire)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// A block header plus transaction count, without the body.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMetadata {
    pub hash: String,
    pub header: BlockHeader,
    pub tx_count: u32,
}

impl BlockMetadata {
    pub(crate) fn from_wire(meta: wire::BlockMetadata) -> Result<Self, ClientError> {
        Ok(Self {
            hash: encode_hash(&meta.hash),
            header: BlockHeader::from_wire(meta.header),
            tx_count: meta.tx_count,
        })
    }
}

/// Account state: balance and nonce.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountState {
    pub nonce: u64,
    pub balance: Amount,
}

impl AccountState {
    pub(crate) fn from_wire(state: wire::AccountState) -> Result<Self, ClientError> {
        Ok(Self {
            nonce: state.nonce,
            balance: Amount::from_wire(&state.balance)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StakingInfo {
    pub amount: Amount,
    pub when: u64,
}

/// One entry in a governance vote tally. Candidates are opaque identifiers
/// (block producer peer ids) in plain base58.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteInfo {
    pub candidate: String,
    pub amount: Amount,
}

impl VoteInfo {
    pub(crate) fn from_wire(vote: wire::Vote) -> Result<Self, ClientError> {
        Ok(Self {
            candidate: bs58::encode(&vote.candidate).into_string(),
            amount: Amount::from_wire(&vote.amount)?,
        })
    }
}

impl StakingInfo {
    pub(crate) fn from_wire(staking: wire::Staking) -> Result<Self, ClientError> {
        Ok(Self {
            amount: Amount::from_wire(&staking.amount)?,
            when: staking.when,
        })
    }
}

/// Transaction execution receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub contract_address: Address,
    pub status: String,
    pub result: String,
    pub fee_used: Amount,
    pub cumulative_fee_used: Amount,
    pub block_no: u64,
    pub block_hash: String,
}

impl Receipt {
    pub(crate) fn from_wire(receipt: wire::Receipt) -> Result<Self, ClientError> {
        Ok(Self {
            contract_address: Address::from_bytes(receipt.contract_address),
            status: receipt.status,
            result: receipt.ret,
            fee_used: Amount::from_wire(&receipt.fee_used)?,
            cumulative_fee_used: Amount::from_wire(&receipt.cumulative_fee_used)?,
            block_no: receipt.block_no,
            block_hash: encode_hash(&receipt.block_hash),
        })
    }
}

/// A contract event with decoded arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub address: Address,
    pub event_name: String,
    pub args: Vec<Value>,
    pub event_idx: u32,
    pub tx_hash: String,
    pub block_hash: String,
    pub block_no: u64,
}

impl Event {
    pub(crate) fn from_wire(event: wire::Event) -> Result<Self, ClientError> {
        let args = if event.json_args.is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&event.json_args)
                .map_err(|e| ClientError::decoding(format!("invalid event args: {e}")))?
        };
        Ok(Self {
            address: Address::from_bytes(event.contract_address),
            event_name: event.event_name,
            args,
            event_idx: event.event_idx,
            tx_hash: encode_hash(&event.tx_hash),
            block_hash: encode_hash(&event.block_hash),
            block_no: event.block_no,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Peer {
    pub address: String,
    pub port: u32,
    pub peer_id: String,
    pub best_block_hash: String,
    pub best_block_no: u64,
    pub state: i32,
    pub hidden: bool,
    pub self_peer: bool,
}

impl Peer {
    pub(crate) fn from_wire(peer: wire::Peer) -> Self {
        Self {
            address: peer.address.address,
            port: peer.address.port,
            peer_id: bs58::encode(&peer.address.peer_id).into_string(),
            best_block_hash: encode_hash(&peer.best_block.block_hash),
            best_block_no: peer.best_block.block_no,
            state: peer.state,
            hidden: peer.hidden,
            self_peer: peer.self_peer,
        }
    }
}

/// Resolution of a human-readable account name.
#[derive(Debug, Clone, PartialEq)]
pub struct NameInfo {
    pub name: String,
    pub owner: Address,
    pub destination: Address,
}

impl NameInfo {
    pub(crate) fn from_wire(info: wire::NameInfo) -> Self {
        Self {
            name: info.name.name,
            owner: Address::from_bytes(info.owner),
            destination: Address::from_bytes(info.destination),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusInfo {
    pub consensus_type: String,
    pub info: Value,
    pub bps: Vec<Value>,
}

impl ConsensusInfo {
    pub(crate) fn from_wire(info: wire::ConsensusInfo) -> Result<Self, ClientError> {
        let parse = |text: &str| -> Result<Value, ClientError> {
            if text.is_empty() {
                return Ok(Value::Object(Default::default()));
            }
            serde_json::from_str(text)
                .map_err(|e| ClientError::decoding(format!("invalid consensus info: {e}")))
        };
        Ok(Self {
            consensus_type: info.consensus_type,
            info: parse(&info.info)?,
            bps: info
                .bps
                .iter()
                .map(|bp| parse(bp))
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub status: HashMap<String, String>,
    pub config: HashMap<String, HashMap<String, String>>,
}

impl ServerInfo {
    pub(crate) fn from_wire(info: wire::ServerInfo) -> Self {
        Self {
            status: info.status,
            config: info
                .config
                .into_iter()
                .map(|(key, item)| (key, item.props))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainInfo {
    pub magic: String,
    pub public: bool,
    pub mainnet: bool,
    pub consensus: String,
    pub bp_number: u32,
    pub max_block_size: u64,
    pub max_tokens: Amount,
    pub staking_minimum: Amount,
    pub staking_total: Amount,
}

impl ChainInfo {
    pub(crate) fn from_wire(info: wire::ChainInfo) -> Result<Self, ClientError> {
        Ok(Self {
            magic: info.id.magic,
            public: info.id.public,
            mainnet: info.id.mainnet,
            consensus: info.id.consensus,
            bp_number: info.bp_number,
            max_block_size: info.max_block_size,
            max_tokens: Amount::from_wire(&info.max_tokens)?,
            staking_minimum: Amount::from_wire(&info.staking_minimum)?,
            staking_total: Amount::from_wire(&info.staking_total)?,
        })
    }
}

/// Current blockchain status. Hashes are in canonical textual form.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockchainStatus {
    pub best_block_hash: String,
    pub best_height: u64,
    pub best_chain_id_hash: ChainIdHash,
}

/// Contract ABI, as reported by the node.
pub use noderpc_core::wire::{Abi, AbiFunction, StateVar};

/// A read-only contract call descriptor, serialized into the wire query.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractCall {
    pub address: Address,
    pub name: String,
    pub args: Vec<Value>,
}

impl ContractCall {
    pub fn new(address: Address, name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            address,
            name: name.into(),
            args,
        }
    }

    pub(crate) fn to_wire(&self) -> Result<wire::ContractQuery, ClientError> {
        if self.name.is_empty() {
            return Err(ClientError::validation("missing contract function name"));
        }
        let queryinfo = serde_json::json!({
            "Name": self.name,
            "Args": self.args,
        });
        Ok(wire::ContractQuery {
            contract_address: self.address.as_bytes().to_vec(),
            queryinfo: queryinfo.to_string().into_bytes(),
        })
    }
}

/// A contract state-variable query.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractStateQuery {
    pub address: Address,
    pub storage_keys: Vec<String>,
    /// Optional state root to query against; empty means latest.
    pub root: Vec<u8>,
    pub compressed: bool,
}

impl ContractStateQuery {
    pub fn new(address: Address, storage_keys: Vec<String>) -> Self {
        Self {
            address,
            storage_keys,
            root: Vec::new(),
            compressed: false,
        }
    }

    pub(crate) fn to_wire(&self) -> Result<wire::StateQuery, ClientError> {
        if self.storage_keys.is_empty() {
            return Err(ClientError::validation("missing storage keys"));
        }
        Ok(wire::StateQuery {
            contract_address: self.address.as_bytes().to_vec(),
            storage_keys: self.storage_keys.clone(),
            root: self.root.clone(),
            compressed: self.compressed,
        })
    }
}

/// Outcome of a contract state query, tagged by response shape.
///
/// Positional correspondence with the request's key list is preserved in the
/// many-proof branch: absent values appear as explicit `None`s.
#[derive(Debug, Clone, PartialEq)]
pub enum StateQueryResult {
    /// The node returned no proofs.
    Empty,
    /// A single included value.
    Single(Value),
    /// One entry per queried key, `None` where the value is absent.
    Many(Vec<Option<Value>>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip_enforces_length() {
        let bytes = vec![0xabu8; HASH_BYTE_LENGTH];
        let text = encode_hash(&bytes);
        assert_eq!(decode_hash(&text).unwrap(), bytes);

        let short = bs58::encode(vec![1u8; 8]).into_string();
        assert!(matches!(
            decode_hash(&short),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn amount_parses_decimal_strings() {
        assert_eq!(Amount::from_wire("1000000000000000000").unwrap().0, 10u128.pow(18));
        assert_eq!(Amount::from_wire("").unwrap(), Amount(0));
        assert!(Amount::from_wire("12.5").is_err());
    }

    #[test]
    fn tx_without_recipient_has_no_to() {
        let tx = wire::Tx {
            hash: vec![1; 32],
            body: wire::TxBody {
                nonce: 7,
                account: vec![2; 33],
                amount: "10".into(),
                ..Default::default()
            },
        };
        let info = TxInfo::from_wire(tx).unwrap();
        assert!(info.to.is_none());
        assert_eq!(info.nonce, 7);
        assert_eq!(info.amount, Amount(10));
    }

    #[test]
    fn event_args_decode_from_json() {
        let event = wire::Event {
            contract_address: vec![3; 33],
            event_name: "incremented".into(),
            json_args: "[10, 11]".into(),
            tx_hash: vec![4; 32],
            block_hash: vec![5; 32],
            block_no: 12,
            ..Default::default()
        };
        let event = Event::from_wire(event).unwrap();
        assert_eq!(event.args, vec![serde_json::json!(10), serde_json::json!(11)]);
        assert_eq!(event.event_name, "incremented");
    }

    #[test]
    fn contract_call_serializes_query_info() {
        let call = ContractCall::new(Address::from_bytes(vec![9; 33]), "inc", vec![]);
        let wire = call.to_wire().unwrap();
        let text = String::from_utf8(wire.queryinfo).unwrap();
        assert_eq!(text, r#"{"Args":[],"Name":"inc"}"#);
    }

    #[test]
    fn state_query_requires_keys() {
        let query = ContractStateQuery::new(Address::from_bytes(vec![9; 33]), vec![]);
        assert!(matches!(
            query.to_wire(),
            Err(ClientError::Validation(_))
        ));
    }
}
