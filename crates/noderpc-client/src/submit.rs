//! Signed-transaction submission.
//!
//! Signing happens outside this crate; the submitter takes a fully-formed
//! signed transaction, wraps it in a one-element batch (the wire protocol
//! accepts lists) and inspects the single commit result. Node-reported
//! business rejections and transport failures collapse into one
//! [`TransactionError`] channel.

use serde_json::Value;

use noderpc_core::wire;

use crate::address::Address;
use crate::chainid::ChainIdHash;
use crate::error::{ClientError, TransactionError, COMMIT_OK};
use crate::models::{encode_hash, Amount};
use crate::pipeline::decode_reply;

/// A signed transaction ready for submission, as produced by an external
/// signer.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedTransaction {
    /// Transaction hash computed by the signer.
    pub hash: Vec<u8>,
    pub nonce: u64,
    pub from: Address,
    /// Absent for contract deployments.
    pub to: Option<Address>,
    pub amount: Amount,
    pub payload: Vec<u8>,
    /// Identity of the chain this transaction is valid for; prevents replay
    /// across networks.
    pub chain_id_hash: ChainIdHash,
    pub signature: Vec<u8>,
    pub tx_type: u32,
}

impl SignedTransaction {
    /// Pre-submission validation: this is a marshal-stage check, so it runs
    /// before any network access.
    pub(crate) fn validate(&self) -> Result<(), ClientError> {
        if self.signature.is_empty() {
            return Err(ClientError::validation("transaction is not signed"));
        }
        if self.chain_id_hash.is_empty() {
            return Err(ClientError::validation("missing chain id hash"));
        }
        Ok(())
    }

    pub(crate) fn to_wire(&self) -> wire::Tx {
        wire::Tx {
            hash: self.hash.clone(),
            body: wire::TxBody {
                nonce: self.nonce,
                account: self.from.as_bytes().to_vec(),
                recipient: self
                    .to
                    .as_ref()
                    .map(|a| a.as_bytes().to_vec())
                    .unwrap_or_default(),
                amount: self.amount.to_wire(),
                payload: self.payload.clone(),
                chain_id_hash: self.chain_id_hash.as_bytes().to_vec(),
                sign: self.signature.clone(),
                tx_type: self.tx_type,
            },
        }
    }
}

/// Build the singleton batch for one transaction.
pub(crate) fn singleton_batch(tx: &SignedTransaction) -> wire::TxList {
    wire::TxList {
        txs: vec![tx.to_wire()],
    }
}

/// Interpret the commit reply: either the canonical hash of the accepted
/// transaction or a [`TransactionError`] carrying the node's code and detail.
pub(crate) fn unmarshal_commit(reply: Value) -> Result<String, ClientError> {
    let results: wire::CommitResultList = decode_reply(reply)?;
    let first = results
        .results
        .into_iter()
        .next()
        .ok_or_else(|| ClientError::decoding("empty commit result list"))?;
    if first.error != COMMIT_OK {
        return Err(TransactionError::new(first.error, first.detail).into());
    }
    Ok(encode_hash(&first.hash))
}
