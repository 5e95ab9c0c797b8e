//! Block-scoped execution container
//!
//! The execution state machine takes the block as an explicit parameter
//! instead of holding a back-pointer from transaction to block. The block
//! provides the account state, the coinbase address collecting fees, and
//! the event sink. Events are buffered here and become visible to
//! consumers only at block finalization.

use crate::state::WorldState;
use crate::types::{Address, ChainId, Hash};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Topic of events recording successful transaction execution
pub const TOPIC_EXECUTE_TX_SUCCESS: &str = "chain.executeTxSuccess";

/// Topic of events recording failed transaction execution
pub const TOPIC_EXECUTE_TX_FAILED: &str = "chain.executeTxFailed";

/// An event recorded during block execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event topic string
    pub topic: String,
    /// JSON-encoded event payload
    pub data: String,
}

/// Execution view of a block
#[derive(Debug, Clone)]
pub struct Block {
    chain_id: ChainId,
    coinbase: Address,
    /// Account state the block's transactions mutate
    pub state: WorldState,
    events: BTreeMap<Hash, Vec<Event>>,
}

impl Block {
    /// Create an execution block over an account state
    pub fn new(chain_id: ChainId, coinbase: Address, state: WorldState) -> Self {
        Self {
            chain_id,
            coinbase,
            state,
            events: BTreeMap::new(),
        }
    }

    /// Chain id this block belongs to
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Address receiving block rewards and collected fees
    pub fn coinbase_hash(&self) -> Address {
        self.coinbase
    }

    /// Append an event keyed by the emitting transaction's hash
    pub fn record_event(&mut self, tx_hash: Hash, event: Event) {
        self.events.entry(tx_hash).or_default().push(event);
    }

    /// Events recorded for one transaction, in emission order
    pub fn events_for(&self, tx_hash: &Hash) -> &[Event] {
        self.events.get(tx_hash).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of buffered events
    pub fn event_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    /// Consume the block and hand the buffered events to the caller
    ///
    /// Called once at finalization; the event log is append-only until then.
    pub fn into_events(self) -> BTreeMap<Hash, Vec<Event>> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read_events() {
        let mut block = Block::new(1, Address::repeat_byte(0xcb), WorldState::new());
        let tx_hash = Hash::repeat_byte(0x01);

        assert!(block.events_for(&tx_hash).is_empty());

        block.record_event(
            tx_hash,
            Event {
                topic: TOPIC_EXECUTE_TX_SUCCESS.into(),
                data: "{}".into(),
            },
        );

        let events = block.events_for(&tx_hash);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].topic, TOPIC_EXECUTE_TX_SUCCESS);
        assert_eq!(block.event_count(), 1);
    }

    #[test]
    fn test_events_keyed_by_tx_hash() {
        let mut block = Block::new(1, Address::repeat_byte(0xcb), WorldState::new());
        block.record_event(
            Hash::repeat_byte(0x01),
            Event {
                topic: TOPIC_EXECUTE_TX_FAILED.into(),
                data: "{}".into(),
            },
        );

        assert!(block.events_for(&Hash::repeat_byte(0x02)).is_empty());
    }
}
