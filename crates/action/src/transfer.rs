use crate::{Action, Sent, TxOutcome};
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::token::ERC20;

/// Configuration for a transfer action.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Token contract address
    pub token: Address,
    /// Recipient of the tokens
    pub recipient: Address,
    /// Amount to transfer (in wei units)
    pub amount: U256,
}

/// Transfer tokens from the connected account to a recipient.
pub struct TransferAction<P> {
    provider: P,
    config: TransferConfig,
}

impl<P> TransferAction<P>
where
    P: Provider + Clone,
{
    /// `provider` must carry the connected signer's wallet.
    pub const fn new(provider: P, config: TransferConfig) -> Self {
        Self { provider, config }
    }
}

impl<P> Action for TransferAction<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    fn validate(&self) -> eyre::Result<()> {
        if self.config.token == Address::ZERO {
            eyre::bail!("Token address is zero");
        }
        if self.config.recipient == Address::ZERO {
            eyre::bail!("Recipient address is zero");
        }
        if self.config.amount == U256::ZERO {
            eyre::bail!("Transfer amount is zero");
        }

        Ok(())
    }

    async fn send(&self) -> eyre::Result<Sent> {
        let contract = ERC20::new(self.config.token, self.provider.clone());

        let pending = contract
            .transfer(self.config.recipient, self.config.amount)
            .send()
            .await?;
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
        format!("Transfer {} to {}", self.config.amount, self.config.recipient)
    }
}
