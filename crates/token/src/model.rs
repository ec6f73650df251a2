//! Token state and the transfer-application rules.

use alloy_primitives::{Address, TxHash, U256};

/// One observed Transfer event, from the connected account's viewpoint.
///
/// `counterparty` is the other side of the transfer: the recipient for
/// outgoing events, the source for incoming events. A zero-address
/// source marks a mint, a zero-address destination marks a burn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub tx_index: u64,
    pub counterparty: Address,
    pub value: U256,
}

/// Read model for the dashboard token, scoped to one connected address.
///
/// Supply accounting: displayed supply tracks the connected account's
/// perspective. Every outgoing value is treated as leaving supply;
/// incoming value enters supply only when its source is the zero
/// address (a mint). Third-party burns therefore do not move the
/// displayed supply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenState {
    pub name: String,
    pub symbol: String,
    pub total_supply: U256,
    /// Token balance of the connected account
    pub balance: U256,
    /// Transfers sent by the connected account, oldest first
    pub transfers_from: Vec<TransferRecord>,
    /// Transfers received by the connected account, oldest first
    pub transfers_to: Vec<TransferRecord>,
    /// Set once bootstrap (snapshot + subscriptions) has completed
    pub loaded: bool,
}

impl TokenState {
    /// Apply a live transfer sent by the connected account.
    pub fn apply_outgoing(&mut self, record: TransferRecord) {
        self.balance = self.balance.saturating_sub(record.value);
        self.total_supply = self.total_supply.saturating_sub(record.value);
        self.transfers_from.push(record);
    }

    /// Apply a live transfer received by the connected account.
    ///
    /// Supply rises only for mints (zero-address source).
    pub fn apply_incoming(&mut self, record: TransferRecord) {
        self.balance = self.balance.saturating_add(record.value);
        if record.counterparty == Address::ZERO {
            self.total_supply = self.total_supply.saturating_add(record.value);
        }
        self.transfers_to.push(record);
    }

    /// Apply a watcher-delivered outgoing transfer.
    ///
    /// Events at or below the snapshot block are already reflected in
    /// the historical lists and balance snapshot; they are dropped here
    /// so a transfer is never counted twice.
    pub fn apply_live_outgoing(&mut self, record: TransferRecord, snapshot_block: u64) {
        if record.block_number <= snapshot_block {
            return;
        }
        self.apply_outgoing(record);
    }

    /// Apply a watcher-delivered incoming transfer, with the same
    /// snapshot-boundary rule as [`Self::apply_live_outgoing`].
    pub fn apply_live_incoming(&mut self, record: TransferRecord, snapshot_block: u64) {
        if record.block_number <= snapshot_block {
            return;
        }
        self.apply_incoming(record);
    }
}
