//! The node-facing seam.
//!
//! Everything else in this crate is pure. Node state (nonces, gas prices,
//! gas estimates), broadcasting and log delivery are reached through
//! [`NodeClient`], which callers implement over whatever transport they use.
//! Failures from a client surface as [`EthError::Collaborator`]; nothing here
//! retries.

use std::fmt::Display;

use tracing::{debug, warn};

use crate::address::Address;
use crate::error::EthError;
use crate::hash::{hash_to_hex, Hash};
use crate::keys::PrivateKey;
use crate::logs::{LogEntry, LogFilter};
use crate::transaction::{TransactionBuilder, UnsignedTransaction};

/// Access to an Ethereum node.
pub trait NodeClient {
    type Error: Display;

    /// Next nonce for `address`, counting transactions still in the mempool.
    fn pending_nonce(&self, address: &Address) -> Result<u64, Self::Error>;

    /// Suggested legacy gas price in wei.
    fn suggest_gas_price(&self) -> Result<u128, Self::Error>;

    /// Gas needed to execute `data` against `to` (`None` for contract creation).
    fn estimate_gas(&self, to: Option<&Address>, data: &[u8]) -> Result<u64, Self::Error>;

    /// Submits a raw signed transaction and returns the hash the node reports.
    fn broadcast(&self, raw_transaction: &[u8]) -> Result<Hash, Self::Error>;

    /// Logs the node currently holds for `filter`.
    fn filter_logs(&self, filter: &LogFilter) -> Result<Vec<LogEntry>, Self::Error>;
}

fn collaborator<E: Display>(op: &'static str) -> impl FnOnce(E) -> EthError {
    move |e| EthError::Collaborator(format!("{op}: {e}"))
}

/// Fills the nonce, gas price and gas limit a builder is missing from `client`,
/// then builds it. Fields already set are left alone.
pub fn prepare_transaction<C: NodeClient>(
    client: &C,
    from: &Address,
    mut builder: TransactionBuilder,
) -> Result<UnsignedTransaction, EthError> {
    if builder.nonce.is_none() {
        let nonce = client
            .pending_nonce(from)
            .map_err(collaborator("pending nonce"))?;
        debug!(%from, nonce, "fetched pending nonce");
        builder.nonce = Some(nonce);
    }
    if builder.gas_price.is_none() {
        let gas_price = client
            .suggest_gas_price()
            .map_err(collaborator("gas price"))?;
        debug!(gas_price, "fetched gas price");
        builder.gas_price = Some(gas_price);
    }
    if builder.gas_limit.is_none() {
        let gas_limit = client
            .estimate_gas(builder.to.as_ref(), &builder.data)
            .map_err(collaborator("gas estimate"))?;
        debug!(gas_limit, "estimated gas");
        builder.gas_limit = Some(gas_limit);
    }
    builder.build()
}

/// Signs `tx` with `key` and broadcasts it. Returns the locally computed
/// transaction hash.
pub fn send_transaction<C: NodeClient>(
    client: &C,
    key: &PrivateKey,
    tx: UnsignedTransaction,
) -> Result<Hash, EthError> {
    let signed = tx.hash()?.sign(key)?;
    let local = signed.hash();
    let reported = client
        .broadcast(&signed.raw_transaction())
        .map_err(collaborator("broadcast"))?;
    if reported != local {
        warn!(
            local = %hash_to_hex(&local),
            reported = %hash_to_hex(&reported),
            "node reported a different transaction hash"
        );
    }
    debug!(tx_hash = %hash_to_hex(&local), "transaction broadcast");
    Ok(local)
}

/// Logs matching `filter`, in receipt order.
///
/// The filter is re-applied locally so a node that over-delivers cannot leak
/// unrelated logs to the caller.
pub fn fetch_matching_logs<C: NodeClient>(
    client: &C,
    filter: &LogFilter,
) -> Result<Vec<LogEntry>, EthError> {
    let mut logs: Vec<LogEntry> = client
        .filter_logs(filter)
        .map_err(collaborator("filter logs"))?
        .into_iter()
        .filter(|log| filter.matches(log))
        .collect();
    logs.sort_by_key(|log| (log.block_number, log.log_index));
    debug!(count = logs.len(), address = %filter.address, "fetched logs");
    Ok(logs)
}
