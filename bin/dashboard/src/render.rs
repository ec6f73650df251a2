//! Terminal rendering for the dashboard.
//!
//! Purely derived from the session and token models; holds no state of
//! its own.

use alloy_primitives::utils::format_ether;
use token::TokenState;
use wallet::WalletSession;

/// Shown while no supported chain is active.
pub fn unsupported_banner() -> String {
    let ids: Vec<String> = config::CHAINS
        .iter()
        .map(|c| format!("{} ({})", c.name, c.id))
        .collect();
    format!("Only {} are supported by the app.", ids.join(" & "))
}

/// The connected-wallet block, or `None` while no validated session
/// exists (after logout the dashboard renders nothing).
pub fn session_panel(session: &WalletSession) -> Option<String> {
    let address = session.address?;
    let chain = session.chain?;

    let mut out = String::new();
    out.push_str(&format!("{}\n", chain.name));
    out.push_str(&format!("  Address: {address}\n"));
    if let Some(balance) = session.balance_wei {
        out.push_str(&format!(
            "  Balance: {} {}\n",
            format_ether(balance),
            chain.native_symbol
        ));
    }
    out.push_str(&format!("  ChainId: {}\n", chain.id));

    Some(out)
}

/// The token block: metadata, supply, balance and both transfer lists.
pub fn token_panel(state: &TokenState) -> String {
    if !state.loaded {
        return "Loading ERC20 data & events...".to_string();
    }

    let mut out = String::new();
    out.push_str(&format!("ERC20 {}\n", state.name));
    out.push_str(&format!(
        "  Total supply: {} {}\n",
        state.total_supply, state.symbol
    ));
    out.push_str(&format!(
        "  Connected account balance: {} {}\n",
        state.balance, state.symbol
    ));

    out.push_str("\nTransfers from signer:\n");
    if state.transfers_from.is_empty() {
        out.push_str("  (none)\n");
    }
    for t in &state.transfers_from {
        out.push_str(&format!(
            "  {} block={} index={} to={} value={}\n",
            t.tx_hash, t.block_number, t.tx_index, t.counterparty, t.value
        ));
    }

    out.push_str("\nTransfers to signer:\n");
    if state.transfers_to.is_empty() {
        out.push_str("  (none)\n");
    }
    for t in &state.transfers_to {
        out.push_str(&format!(
            "  {} block={} index={} from={} value={}\n",
            t.tx_hash, t.block_number, t.tx_index, t.counterparty, t.value
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, TxHash, U256};
    use token::TransferRecord;

    #[test]
    fn test_no_panel_without_session() {
        assert_eq!(session_panel(&WalletSession::default()), None);
    }

    #[test]
    fn test_no_panel_without_validated_chain() {
        let session = WalletSession {
            address: Some(Address::from([1u8; 20])),
            balance_wei: Some(U256::from(5u64)),
            chain: None,
        };
        assert_eq!(session_panel(&session), None);
    }

    #[test]
    fn test_session_panel_formats_native_balance() {
        let session = WalletSession {
            address: Some(Address::from([1u8; 20])),
            balance_wei: Some("1000000000000000000".parse().unwrap()),
            chain: Some(&config::GOERLI),
        };

        let panel = session_panel(&session).unwrap();
        assert!(panel.contains("Goerli Testnet"));
        assert!(panel.contains("1.000000000000000000 ETH"));
        assert!(panel.contains("ChainId: 5"));
    }

    #[test]
    fn test_token_panel_shows_loading_until_bootstrap_completes() {
        let state = TokenState::default();
        assert!(token_panel(&state).contains("Loading"));
    }

    #[test]
    fn test_token_panel_lists_transfers() {
        let state = TokenState {
            name: "Demo Token".into(),
            symbol: "DEMO".into(),
            total_supply: U256::from(5000u64),
            balance: U256::from(1200u64),
            transfers_from: vec![TransferRecord {
                tx_hash: TxHash::from([0xaau8; 32]),
                block_number: 7,
                tx_index: 2,
                counterparty: Address::from([9u8; 20]),
                value: U256::from(300u64),
            }],
            transfers_to: vec![],
            loaded: true,
        };

        let panel = token_panel(&state);
        assert!(panel.contains("ERC20 Demo Token"));
        assert!(panel.contains("Total supply: 5000 DEMO"));
        assert!(panel.contains("block=7 index=2"));
        assert!(panel.contains("value=300"));
        assert!(panel.contains("(none)"));
    }

    #[test]
    fn test_banner_names_both_chains() {
        let banner = unsupported_banner();
        assert!(banner.contains("Goerli Testnet (5)"));
        assert!(banner.contains("Polygon Testnet (80001)"));
    }
}
