use crate::{Action, Sent, TxOutcome};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::token::ERC20;

/// Configuration for a burn action.
#[derive(Debug, Clone)]
pub struct BurnConfig {
    /// Token contract address
    pub token: Address,
    /// Amount of tokens to burn from the caller's balance
    pub value: U256,
}

/// Burn tokens from the connected account's balance.
pub struct BurnAction<P> {
    provider: P,
    config: BurnConfig,
}

impl<P> BurnAction<P>
where
    P: Provider + Clone,
{
    /// `provider` must carry the connected signer's wallet.
    pub const fn new(provider: P, config: BurnConfig) -> Self {
        Self { provider, config }
    }
}

impl<P> Action for BurnAction<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    fn validate(&self) -> eyre::Result<()> {
        if self.config.token == Address::ZERO {
            eyre::bail!("Token address is zero");
        }
        if self.config.value == U256::ZERO {
            eyre::bail!("Burn value is zero");
        }

        Ok(())
    }

    async fn send(&self) -> eyre::Result<Sent> {
        let contract = ERC20::new(self.config.token, self.provider.clone());

        let pending = contract.burn(self.config.value).send().await?;
        let tx_hash = *pending.tx_hash();

        Ok(Sent::new(tx_hash, async move {
            let receipt = pending.get_receipt().await?;
            Ok(TxOutcome {
                tx_hash,
                block_number: receipt.block_number,
                gas_used: receipt.gas_used,
                success: receipt.status(),
            })
        }))
    }

    fn description(&self) -> String {
        format!("Burn {}", self.config.value)
    }
}
