use serde::Serialize;

/// A known EVM-compatible network.
#[derive(Debug, Clone, Serialize)]
pub struct ChainInfo {
    pub chain_id: u64,
    pub name: &'static str,
    pub symbol: &'static str,
    pub is_testnet: bool,
}

const KNOWN_CHAINS: &[ChainInfo] = &[
    ChainInfo { chain_id: 1, name: "Ethereum", symbol: "ETH", is_testnet: false },
    ChainInfo { chain_id: 10, name: "Optimism", symbol: "ETH", is_testnet: false },
    ChainInfo { chain_id: 137, name: "Polygon", symbol: "MATIC", is_testnet: false },
    ChainInfo { chain_id: 8453, name: "Base", symbol: "ETH", is_testnet: false },
    ChainInfo { chain_id: 42161, name: "Arbitrum One", symbol: "ETH", is_testnet: false },
    ChainInfo { chain_id: 11155111, name: "Sepolia", symbol: "ETH", is_testnet: true },
    ChainInfo { chain_id: 31337, name: "Anvil", symbol: "ETH", is_testnet: true },
];

/// Returns the definition of a known network, or `None`.
pub fn chain(chain_id: u64) -> Option<&'static ChainInfo> {
    KNOWN_CHAINS.iter().find(|c| c.chain_id == chain_id)
}

/// Returns the display name of a known network, or `None`.
pub fn name(chain_id: u64) -> Option<&'static str> {
    chain(chain_id).map(|c| c.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_mainnet() {
        let c = chain(1).expect("Ethereum should be known");
        assert_eq!(c.name, "Ethereum");
        assert_eq!(c.symbol, "ETH");
        assert!(!c.is_testnet);
    }

    #[test]
    fn known_testnets() {
        assert!(chain(11155111).unwrap().is_testnet);
        assert!(chain(31337).unwrap().is_testnet);
    }

    #[test]
    fn name_lookup() {
        assert_eq!(name(8453), Some("Base"));
        assert_eq!(name(42161), Some("Arbitrum One"));
    }

    #[test]
    fn unknown_chain_is_none() {
        assert!(chain(999_999).is_none());
        assert!(name(999_999).is_none());
    }
}
