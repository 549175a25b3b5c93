use alloy_primitives::U256;
use serde::Serialize;

use crate::units::format_units;

/// Definition of an EVM-compatible network.
///
/// `chain_id` is the EIP-155 value every transaction signed for this network
/// commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvmChain {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
    pub is_testnet: bool,
}

impl EvmChain {
    /// Formats a wei amount in the native token, e.g. `"1.5 ETH"`.
    pub fn format_native(&self, amount_wei: U256) -> String {
        format!("{} {}", format_units(amount_wei, self.decimals), self.symbol)
    }
}

/// Ethereum Mainnet (chain ID 1).
pub const ETHEREUM: EvmChain = EvmChain {
    chain_id: 1,
    name: "Ethereum",
    symbol: "ETH",
    decimals: 18,
    is_testnet: false,
};

/// Sepolia Testnet (chain ID 11155111).
pub const SEPOLIA: EvmChain = EvmChain {
    chain_id: 11_155_111,
    name: "Sepolia",
    symbol: "ETH",
    decimals: 18,
    is_testnet: true,
};

/// Holesky Testnet (chain ID 17000).
pub const HOLESKY: EvmChain = EvmChain {
    chain_id: 17_000,
    name: "Holesky",
    symbol: "ETH",
    decimals: 18,
    is_testnet: true,
};

/// Rinkeby Testnet (chain ID 4). Shut down, kept for signing old fixtures.
pub const RINKEBY: EvmChain = EvmChain {
    chain_id: 4,
    name: "Rinkeby",
    symbol: "ETH",
    decimals: 18,
    is_testnet: true,
};

/// Polygon PoS (chain ID 137).
pub const POLYGON: EvmChain = EvmChain {
    chain_id: 137,
    name: "Polygon",
    symbol: "MATIC",
    decimals: 18,
    is_testnet: false,
};

/// BNB Smart Chain (chain ID 56).
pub const BSC: EvmChain = EvmChain {
    chain_id: 56,
    name: "BNB Smart Chain",
    symbol: "BNB",
    decimals: 18,
    is_testnet: false,
};

/// Optimism (chain ID 10).
pub const OPTIMISM: EvmChain = EvmChain {
    chain_id: 10,
    name: "Optimism",
    symbol: "ETH",
    decimals: 18,
    is_testnet: false,
};

/// Arbitrum One (chain ID 42161).
pub const ARBITRUM: EvmChain = EvmChain {
    chain_id: 42_161,
    name: "Arbitrum One",
    symbol: "ETH",
    decimals: 18,
    is_testnet: false,
};

/// Base (chain ID 8453).
pub const BASE: EvmChain = EvmChain {
    chain_id: 8_453,
    name: "Base",
    symbol: "ETH",
    decimals: 18,
    is_testnet: false,
};

const ALL_CHAINS: &[&EvmChain] = &[
    &ETHEREUM, &SEPOLIA, &HOLESKY, &RINKEBY, &POLYGON, &BSC, &OPTIMISM, &ARBITRUM, &BASE,
];

/// Returns the definition for `chain_id`, or `None` if it is not known.
pub fn chain_by_id(chain_id: u64) -> Option<&'static EvmChain> {
    ALL_CHAINS.iter().find(|c| c.chain_id == chain_id).copied()
}

/// Every known network definition.
pub fn all_chains() -> &'static [&'static EvmChain] {
    ALL_CHAINS
}
