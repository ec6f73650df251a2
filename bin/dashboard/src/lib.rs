pub mod render;

use alloy_primitives::U256;
use notify::{Notice, Notifier};
use token::{TokenError, TokenFeed};

/// Parse a user-supplied token amount (decimal wei units).
pub fn parse_amount(raw: &str) -> eyre::Result<U256> {
    raw.trim()
        .parse::<U256>()
        .map_err(|e| eyre::eyre!("invalid amount {raw:?}: {e}"))
}

/// Unwrap a token bootstrap outcome, reporting failure as a notice.
///
/// The dashboard keeps running without a token feed; the next wallet
/// event or user retry re-attempts the bootstrap.
pub fn feed_or_notice<N: Notifier>(
    result: Result<TokenFeed, TokenError>,
    notifier: &N,
) -> Option<TokenFeed> {
    match result {
        Ok(feed) => Some(feed),
        Err(e) => {
            notifier.publish(Notice::error(format!("Failed to load token data: {e}")));
            None
        }
    }
}
