//! End-to-end client tests over a scripted transport.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde_json::Value;

use noderpc_client::{
    Address, Amount, ChainIdHash, ClientConfig, ClientError, FilterQuery, NodeClient,
    SignedTransaction, StateQueryResult, Subscription, SubscriptionState,
};
use noderpc_client::{encode_hash, ArgFilter, ContractStateQuery};
use noderpc_core::{wire, NodeTransport, RawStream, RpcMethod, RpcRequest, TransportError};

/// Transport scripted per method: a canned reply, a failure, or stream items.
#[derive(Default)]
struct MockTransport {
    replies: Mutex<HashMap<&'static str, Value>>,
    failures: Mutex<HashMap<&'static str, (i32, String)>>,
    streams: Mutex<HashMap<&'static str, Vec<Value>>>,
    calls: Mutex<Vec<RpcRequest>>,
}

impl MockTransport {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn reply(self: Arc<Self>, method: RpcMethod, value: Value) -> Arc<Self> {
        self.replies.lock().unwrap().insert(method.as_str(), value);
        self
    }

    fn fail(self: Arc<Self>, method: RpcMethod, code: i32, message: &str) -> Arc<Self> {
        self.failures
            .lock()
            .unwrap()
            .insert(method.as_str(), (code, message.to_string()));
        self
    }

    fn stream_items(self: Arc<Self>, method: RpcMethod, items: Vec<Value>) -> Arc<Self> {
        self.streams.lock().unwrap().insert(method.as_str(), items);
        self
    }

    fn recorded(&self) -> Vec<RpcRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn methods_called(&self) -> Vec<&'static str> {
        self.recorded().iter().map(|req| req.method.as_str()).collect()
    }
}

#[async_trait]
impl NodeTransport for MockTransport {
    async fn unary(&self, req: RpcRequest) -> Result<Value, TransportError> {
        let name = req.method.as_str();
        self.calls.lock().unwrap().push(req);
        if let Some((code, message)) = self.failures.lock().unwrap().get(name) {
            return Err(TransportError::Status {
                code: *code,
                message: message.clone(),
            });
        }
        self.replies
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| TransportError::Connection(format!("no scripted reply for {name}")))
    }

    fn open_stream(&self, req: RpcRequest) -> Result<RawStream, TransportError> {
        let name = req.method.as_str();
        self.calls.lock().unwrap().push(req);
        let items = self
            .streams
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default();
        let stream = futures::stream::iter(items.into_iter().map(Ok)).boxed();
        Ok(RawStream::new(stream, Box::new(|| {})))
    }

    fn target(&self) -> &str {
        "mock:0"
    }
}

fn status_reply(chain_id: &[u8]) -> Value {
    serde_json::to_value(wire::BlockchainStatus {
        best_block_hash: vec![1; 32],
        best_height: 100,
        consensus_info: String::new(),
        best_chain_id_hash: chain_id.to_vec(),
    })
    .unwrap()
}

fn wire_tx(nonce: u64) -> wire::Tx {
    wire::Tx {
        hash: vec![0x11; 32],
        body: wire::TxBody {
            nonce,
            account: vec![2; 33],
            recipient: vec![3; 33],
            amount: "500".into(),
            chain_id_hash: vec![9; 32],
            sign: vec![7; 64],
            ..Default::default()
        },
    }
}

fn signed_tx() -> SignedTransaction {
    SignedTransaction {
        hash: vec![0x11; 32],
        nonce: 1,
        from: Address::from_bytes(vec![2; 33]),
        to: Some(Address::from_bytes(vec![3; 33])),
        amount: Amount(500),
        payload: Vec::new(),
        chain_id_hash: ChainIdHash::from_bytes(vec![9; 32]),
        signature: vec![7; 64],
        tx_type: 0,
    }
}

async fn wait_for_state<T>(sub: &Subscription<T>, state: SubscriptionState) {
    for _ in 0..200 {
        if sub.state() == state {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("subscription stuck at {:?}", sub.state());
}

#[tokio::test]
async fn blockchain_status_populates_chain_id_lazily() {
    let mock = MockTransport::new().reply(RpcMethod::Blockchain, status_reply(&[0xaa; 32]));
    let client = NodeClient::new(mock.clone());

    let hash = client.get_chain_id_hash().await.unwrap();
    assert_eq!(hash.as_bytes(), &[0xaa; 32]);
    assert_eq!(mock.methods_called(), vec!["Blockchain"]);

    // Second read is served from the cache.
    let again = client.get_chain_id_hash().await.unwrap();
    assert_eq!(again, hash);
    assert_eq!(mock.methods_called(), vec!["Blockchain"]);
}

#[tokio::test]
async fn switching_transports_invalidates_the_chain_id() {
    let first = MockTransport::new().reply(RpcMethod::Blockchain, status_reply(&[0xaa; 32]));
    let second = MockTransport::new().reply(RpcMethod::Blockchain, status_reply(&[0xbb; 32]));

    let mut client = NodeClient::new(first);
    assert_eq!(client.get_chain_id_hash().await.unwrap().as_bytes(), &[0xaa; 32]);

    client.set_transport(second.clone());
    assert_eq!(client.get_chain_id_hash().await.unwrap().as_bytes(), &[0xbb; 32]);
    assert_eq!(second.methods_called(), vec!["Blockchain"]);
}

#[tokio::test]
async fn manual_chain_id_skips_the_round_trip() {
    let mock = MockTransport::new();
    let client = NodeClient::new(mock.clone());

    client.set_chain_id_hash(ChainIdHash::from_bytes(vec![0xcc; 32]));
    let hash = client.get_chain_id_hash().await.unwrap();
    assert_eq!(hash.as_bytes(), &[0xcc; 32]);
    assert!(mock.recorded().is_empty());
}

#[tokio::test]
async fn transaction_found_in_a_block_carries_its_position() {
    let found = wire::TxInBlock {
        tx_idx: wire::TxIdx {
            block_hash: vec![0x22; 32],
            idx: 4,
        },
        tx: wire_tx(9),
    };
    let mock = MockTransport::new()
        .reply(RpcMethod::GetBlockTx, serde_json::to_value(found).unwrap());
    let client = NodeClient::new(mock.clone());

    let lookup = client.get_transaction(&encode_hash(&[0x11; 32])).await.unwrap();
    let position = lookup.block.expect("block position");
    assert_eq!(position.block_hash, encode_hash(&[0x22; 32]));
    assert_eq!(position.index, 4);
    assert_eq!(lookup.tx.nonce, 9);
    assert_eq!(mock.methods_called(), vec!["GetBlockTX"]);
}

#[tokio::test]
async fn transaction_lookup_falls_back_to_the_pool() {
    let mock = MockTransport::new()
        .fail(RpcMethod::GetBlockTx, 2, "not found")
        .reply(RpcMethod::GetTx, serde_json::to_value(wire_tx(9)).unwrap());
    let client = NodeClient::new(mock.clone());

    let lookup = client.get_transaction(&encode_hash(&[0x11; 32])).await.unwrap();
    assert!(lookup.block.is_none());
    assert_eq!(lookup.tx.nonce, 9);
    assert_eq!(mock.methods_called(), vec!["GetBlockTX", "GetTX"]);
}

#[tokio::test]
async fn missing_transaction_propagates_the_fallback_error() {
    let mock = MockTransport::new()
        .fail(RpcMethod::GetBlockTx, 2, "not in a block")
        .fail(RpcMethod::GetTx, 2, "not in the pool");
    let client = NodeClient::new(mock.clone());

    let err = client
        .get_transaction(&encode_hash(&[0x11; 32]))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("not in the pool"));
    assert_eq!(mock.methods_called(), vec!["GetBlockTX", "GetTX"]);
}

#[tokio::test]
async fn accepted_transaction_returns_its_hash() {
    let reply = serde_json::to_value(wire::CommitResultList {
        results: vec![wire::CommitResult {
            hash: vec![0x11; 32],
            error: 0,
            detail: String::new(),
        }],
    })
    .unwrap();
    let mock = MockTransport::new().reply(RpcMethod::CommitTx, reply);
    let client = NodeClient::new(mock.clone());

    let hash = client.send_signed_transaction(&signed_tx()).await.unwrap();
    assert_eq!(hash, encode_hash(&[0x11; 32]));

    // The wire message is a one-element batch.
    let recorded = mock.recorded();
    let batch: wire::TxList = serde_json::from_value(recorded[0].params.clone()).unwrap();
    assert_eq!(batch.txs.len(), 1);
    assert_eq!(batch.txs[0].body.nonce, 1);
    assert_eq!(batch.txs[0].body.amount, "500");
}

#[tokio::test]
async fn node_rejection_surfaces_as_a_transaction_error() {
    let reply = serde_json::to_value(wire::CommitResultList {
        results: vec![wire::CommitResult {
            hash: Vec::new(),
            error: 1,
            detail: String::new(),
        }],
    })
    .unwrap();
    let mock = MockTransport::new().reply(RpcMethod::CommitTx, reply);
    let client = NodeClient::new(mock);

    let err = client.send_signed_transaction(&signed_tx()).await.unwrap_err();
    match err {
        ClientError::Transaction(tx_err) => {
            assert_eq!(tx_err.code, 1);
            assert!(tx_err.to_string().contains("nonce is too low"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn transport_failure_during_submission_becomes_a_transaction_error() {
    let mock = MockTransport::new().fail(RpcMethod::CommitTx, 14, "unavailable");
    let client = NodeClient::new(mock);

    let err = client.send_signed_transaction(&signed_tx()).await.unwrap_err();
    match err {
        ClientError::Transaction(tx_err) => {
            assert!(tx_err.to_string().contains("unavailable"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unsigned_transaction_never_reaches_the_transport() {
    let mock = MockTransport::new();
    let client = NodeClient::new(mock.clone());

    let mut tx = signed_tx();
    tx.signature.clear();
    let err = client.send_signed_transaction(&tx).await.unwrap_err();
    assert!(matches!(err, ClientError::Validation(_)));
    assert!(mock.recorded().is_empty());
}

#[tokio::test]
async fn absent_state_variable_names_key_and_address() {
    let reply = serde_json::to_value(wire::StateQueryProof {
        var_proofs: vec![wire::ContractVarProof {
            inclusion: false,
            ..Default::default()
        }],
    })
    .unwrap();
    let mock = MockTransport::new().reply(RpcMethod::QueryContractState, reply);
    let client = NodeClient::new(mock);

    let contract = Address::from_bytes(vec![4; 33]);
    let query = ContractStateQuery::new(contract.clone(), vec!["_sv_Value".into()]);
    let err = client.query_contract_state(&query).await.unwrap_err();
    match err {
        ClientError::NotFound { key, address } => {
            assert_eq!(key, "_sv_Value");
            assert_eq!(address, contract.encoded());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn proven_state_value_decodes_as_json() {
    let reply = serde_json::to_value(wire::StateQueryProof {
        var_proofs: vec![wire::ContractVarProof {
            inclusion: true,
            value: br#"{"count": 3}"#.to_vec(),
            ..Default::default()
        }],
    })
    .unwrap();
    let mock = MockTransport::new().reply(RpcMethod::QueryContractState, reply);
    let client = NodeClient::new(mock);

    let query = ContractStateQuery::new(Address::from_bytes(vec![4; 33]), vec!["_sv_Value".into()]);
    let result = client.query_contract_state(&query).await.unwrap();
    assert_eq!(
        result,
        StateQueryResult::Single(serde_json::json!({"count": 3}))
    );
}

#[tokio::test]
async fn event_listing_sends_the_compiled_filter() {
    let contract = Address::from_bytes(vec![5; 33]);
    let event = wire::Event {
        contract_address: contract.as_bytes().to_vec(),
        event_name: "transfer".into(),
        json_args: "[10]".into(),
        ..Default::default()
    };
    let reply = serde_json::to_value(wire::EventList { events: vec![event] }).unwrap();
    let mock = MockTransport::new().reply(RpcMethod::ListEvents, reply);
    let client = NodeClient::new(mock.clone());

    let filter = FilterQuery {
        args: Some(ArgFilter::Positional(vec![serde_json::json!(10)])),
        event_name: Some("transfer".into()),
        ..FilterQuery::for_address(contract.clone())
    };
    let events = client.get_events(&filter).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_name, "transfer");
    assert_eq!(events[0].args, vec![serde_json::json!(10)]);

    let sent: wire::EventFilter =
        serde_json::from_value(mock.recorded()[0].params.clone()).unwrap();
    assert_eq!(sent.contract_address, contract.as_bytes());
    assert_eq!(sent.arg_filter, r#"{"0":10}"#);
    assert!(sent.desc);
}

#[tokio::test]
async fn block_by_height_sends_little_endian_bytes() {
    let block = wire::Block {
        hash: vec![0x33; 32],
        ..Default::default()
    };
    let mock = MockTransport::new()
        .reply(RpcMethod::GetBlock, serde_json::to_value(block).unwrap());
    let client = NodeClient::new(mock.clone());

    let fetched = client.get_block(300u64).await.unwrap();
    assert_eq!(fetched.hash, encode_hash(&[0x33; 32]));

    let sent: wire::SingleBytes =
        serde_json::from_value(mock.recorded()[0].params.clone()).unwrap();
    assert_eq!(sent.value, 300u64.to_le_bytes().to_vec());
}

#[tokio::test]
async fn configured_timeout_reaches_the_transport() {
    let mock = MockTransport::new().reply(RpcMethod::Blockchain, status_reply(&[0xaa; 32]));
    let config = ClientConfig {
        request_timeout: Some(Duration::from_secs(5)),
    };
    let client = NodeClient::with_config(mock.clone(), config);

    client.blockchain().await.unwrap();
    assert_eq!(mock.recorded()[0].timeout, Some(Duration::from_secs(5)));
}

#[tokio::test]
async fn vote_tally_defaults_to_the_producer_election() {
    let reply = serde_json::to_value(wire::VoteList {
        votes: vec![wire::Vote {
            candidate: vec![0x16; 39],
            amount: "7000".into(),
        }],
        id: "voteBP".into(),
    })
    .unwrap();
    let mock = MockTransport::new().reply(RpcMethod::GetVotes, reply);
    let client = NodeClient::new(mock.clone());

    let votes = client.get_top_votes(23, None).await.unwrap();
    assert_eq!(votes.len(), 1);
    assert_eq!(votes[0].amount, Amount(7000));
    assert_eq!(
        votes[0].candidate,
        bs58::encode(vec![0x16u8; 39]).into_string()
    );

    let sent: wire::VoteParams =
        serde_json::from_value(mock.recorded()[0].params.clone()).unwrap();
    assert_eq!(sent.id, "voteBP");
    assert_eq!(sent.count, 23);
}

#[tokio::test]
async fn block_stream_delivers_typed_blocks() {
    let blocks = (1u8..=2)
        .map(|i| {
            serde_json::to_value(wire::Block {
                hash: vec![i; 32],
                ..Default::default()
            })
            .unwrap()
        })
        .collect();
    let mock = MockTransport::new().stream_items(RpcMethod::ListBlockStream, blocks);
    let client = NodeClient::new(mock);

    let sub = client.get_block_stream().unwrap();
    let (seen_tx, mut seen_rx) = tokio::sync::mpsc::unbounded_channel();
    sub.on_data(move |block: &noderpc_client::Block| {
        let _ = seen_tx.send(block.hash.clone());
    });

    assert_eq!(seen_rx.recv().await.unwrap(), encode_hash(&[1; 32]));
    assert_eq!(seen_rx.recv().await.unwrap(), encode_hash(&[2; 32]));
    wait_for_state(&sub, SubscriptionState::Completed).await;
}
