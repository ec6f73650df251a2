//! The connected-wallet session and its orchestration.

use crate::error::WalletError;
use crate::provider::{WalletEvent, WalletProvider};
use alloy_primitives::{Address, U256};
use config::ChainDescriptor;
use notify::{Notice, Notifier};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

/// Delay between the "switching" notice and the actual switch request,
/// so the notice is visible before the wallet takes over.
const SWITCH_NOTICE_DELAY: Duration = Duration::from_millis(1500);

/// The connected-wallet read model.
///
/// Created empty, populated field-by-field as each connect step
/// resolves, cleared entirely on logout. `chain` is only ever one of
/// the registry descriptors; an unsupported chain id is never stored,
/// leaving the session in a "connected, unsupported chain" sub-state
/// until a switch succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    pub address: Option<Address>,
    /// Native balance in wei
    pub balance_wei: Option<U256>,
    pub chain: Option<&'static ChainDescriptor>,
}

impl WalletSession {
    pub const fn is_connected(&self) -> bool {
        self.address.is_some() && self.chain.is_some()
    }
}

/// Drives wallet connect/disconnect, chain validation and switching,
/// and balance refresh. Failures become notices; none escape as
/// unhandled faults.
pub struct SessionManager<W, N> {
    wallet: Option<W>,
    notifier: N,
    session: WalletSession,
    events: Option<mpsc::UnboundedReceiver<WalletEvent>>,
    switch_delay: Duration,
}

impl<W, N> SessionManager<W, N>
where
    W: WalletProvider,
    N: Notifier,
{
    /// `wallet` is `None` when no wallet is available at all, in which
    /// case every flow fails with [`WalletError::NoWalletDetected`].
    pub fn new(wallet: Option<W>, notifier: N) -> Self {
        Self {
            wallet,
            notifier,
            session: WalletSession::default(),
            events: None,
            switch_delay: SWITCH_NOTICE_DELAY,
        }
    }

    /// Override the pre-switch notice delay (tests use zero).
    pub fn with_switch_delay(mut self, delay: Duration) -> Self {
        self.switch_delay = delay;
        self
    }

    pub const fn session(&self) -> &WalletSession {
        &self.session
    }

    pub const fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// The underlying wallet, if one was detected.
    pub const fn wallet(&self) -> Option<&W> {
        self.wallet.as_ref()
    }

    /// Establish a validated session.
    ///
    /// Strictly sequential: accounts, then native balance, then chain
    /// id. Each failure aborts the remaining steps, surfacing a notice
    /// and leaving only the already-resolved fields on the session.
    /// An unsupported chain triggers exactly one switch attempt
    /// towards the default chain; the session's `chain` stays unset
    /// until a supported chain is confirmed.
    pub async fn connect(&mut self) -> Result<(), WalletError> {
        if self.wallet.is_none() {
            self.notifier.publish(Notice::error("No wallet detected"));
            return Err(WalletError::NoWalletDetected);
        }

        self.notifier.publish(Notice::info("Connecting ..."));

        let mut switched = false;
        loop {
            let Some(wallet) = self.wallet.as_ref() else {
                return Err(WalletError::NoWalletDetected);
            };

            let accounts = match wallet.request_accounts().await {
                Ok(accounts) => accounts,
                Err(_) => {
                    self.notifier
                        .publish(Notice::error("Request wallet accounts failed."));
                    return Err(WalletError::AccountRequestDenied);
                }
            };
            let Some(address) = accounts.first().copied() else {
                self.notifier
                    .publish(Notice::error("Request wallet accounts failed."));
                return Err(WalletError::AccountRequestDenied);
            };
            self.session.address = Some(address);

            match wallet.native_balance(address).await {
                Ok(balance) => self.session.balance_wei = Some(balance),
                Err(e) => {
                    self.notifier
                        .publish(Notice::error("Failed to get balance."));
                    return Err(e);
                }
            }

            let chain_id = match wallet.chain_id().await {
                Ok(id) => id,
                Err(e) => {
                    self.notifier.publish(Notice::error("Get network failed."));
                    return Err(e);
                }
            };

            if let Some(chain) = config::find(chain_id) {
                self.session.chain = Some(chain);
                // Subscribe once per session; resync reuses the
                // existing subscription.
                if self.events.is_none() {
                    self.events = Some(wallet.subscribe_events());
                }
                self.notifier.publish(Notice::success("Connected!"));
                return Ok(());
            }

            if switched {
                // Still unsupported after a successful switch request.
                self.notifier
                    .publish(Notice::error(format!("Chain {chain_id} is not supported.")));
                return Err(WalletError::UnsupportedChain(chain_id));
            }
            switched = true;

            let target = config::default_chain();
            self.notifier.publish(Notice::info(format!(
                "Chain not supported. Switching to {} ...",
                target.name
            )));
            time::sleep(self.switch_delay).await;

            match wallet.switch_chain(target.id).await {
                // Re-run the connect sequence against the new chain.
                Ok(()) => continue,
                Err(WalletError::ChainUnrecognizedByProvider(_)) => {
                    if wallet.add_chain(target).await.is_err() {
                        self.notifier.publish(Notice::error(format!(
                            "Could not add {} chain.",
                            target.name
                        )));
                    } else {
                        self.notifier.publish(Notice::info(format!(
                            "{} added to wallet. Reconnect to finish switching.",
                            target.name
                        )));
                    }
                    return Err(WalletError::UnsupportedChain(chain_id));
                }
                Err(e) => {
                    self.notifier
                        .publish(Notice::error("Chain switch rejected."));
                    return Err(e);
                }
            }
        }
    }

    /// Clear the session synchronously. Dropping the event receiver
    /// unsubscribes from the wallet, so reconnecting later starts with
    /// a fresh, single subscription.
    pub fn disconnect(&mut self) {
        self.session = WalletSession::default();
        self.events = None;
    }

    /// User-initiated switch to a specific supported chain.
    ///
    /// An unrecognized chain falls back to registering the chain
    /// definition with the wallet; the switch is not retried
    /// automatically. On success the session is resynchronized in
    /// place.
    pub async fn switch_to(&mut self, chain: &'static ChainDescriptor) -> Result<(), WalletError> {
        let result = {
            let Some(wallet) = self.wallet.as_ref() else {
                return Err(WalletError::NoWalletDetected);
            };
            wallet.switch_chain(chain.id).await
        };

        match result {
            Ok(()) => self.resync().await,
            Err(WalletError::ChainUnrecognizedByProvider(_)) => {
                let added = {
                    let Some(wallet) = self.wallet.as_ref() else {
                        return Err(WalletError::NoWalletDetected);
                    };
                    wallet.add_chain(chain).await
                };
                if added.is_err() {
                    self.notifier
                        .publish(Notice::error(format!("Could not add {} chain.", chain.name)));
                } else {
                    self.notifier.publish(Notice::info(format!(
                        "{} added to wallet. Reconnect to finish switching.",
                        chain.name
                    )));
                }
                Err(WalletError::ChainUnrecognizedByProvider(chain.id))
            }
            Err(e) => {
                self.notifier
                    .publish(Notice::error("Chain switch rejected."));
                Err(e)
            }
        }
    }

    /// Rebuild the session in place.
    ///
    /// This is the account/chain-change recovery routine: callers must
    /// also rebuild anything scoped to the old address (the token
    /// feed) after a successful resync, so the snapshot-then-subscribe
    /// ordering downstream is preserved.
    pub async fn resync(&mut self) -> Result<(), WalletError> {
        self.session = WalletSession::default();
        self.connect().await
    }

    /// Re-fetch the connected account's native balance.
    ///
    /// Failures are reported but never clear existing state.
    pub async fn refresh_balance(&mut self) {
        let Some(address) = self.session.address else {
            return;
        };
        let result = {
            let Some(wallet) = self.wallet.as_ref() else {
                return;
            };
            wallet.native_balance(address).await
        };

        match result {
            Ok(balance) => self.session.balance_wei = Some(balance),
            Err(_) => self
                .notifier
                .publish(Notice::error("Failed to refresh balance.")),
        }
    }

    /// Ask the wallet to track the dashboard token. Fire-and-forget.
    pub async fn watch_asset(&self, token: Address, symbol: &str) {
        let Some(wallet) = self.wallet.as_ref() else {
            return;
        };
        if wallet.watch_asset(token, symbol, 18).await.is_err() {
            self.notifier
                .publish(Notice::error("Could not add token to wallet."));
        }
    }

    /// Next account/chain change event, if a session is live.
    pub async fn next_event(&mut self) -> Option<WalletEvent> {
        match self.events.as_mut() {
            Some(rx) => rx.recv().await,
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::CaptureNotifier;
    use std::future::Future;
    use std::sync::Mutex;

    #[derive(Clone, Copy, PartialEq, Eq)]
    enum SwitchMode {
        Accept,
        Unrecognized,
        Reject,
    }

    struct MockWallet {
        accounts: Vec<Address>,
        chain: Mutex<u64>,
        switch_mode: SwitchMode,
        switch_calls: Mutex<Vec<u64>>,
        added_chains: Mutex<Vec<u64>>,
        fail_balance: bool,
        subscribers: Mutex<Vec<mpsc::UnboundedSender<WalletEvent>>>,
    }

    impl MockWallet {
        fn on_chain(chain_id: u64) -> Self {
            Self {
                accounts: vec![Address::from([7u8; 20])],
                chain: Mutex::new(chain_id),
                switch_mode: SwitchMode::Accept,
                switch_calls: Mutex::new(Vec::new()),
                added_chains: Mutex::new(Vec::new()),
                fail_balance: false,
                subscribers: Mutex::new(Vec::new()),
            }
        }

        fn switch_calls(&self) -> Vec<u64> {
            self.switch_calls.lock().unwrap().clone()
        }

        fn emit(&self, event: WalletEvent) {
            let mut subs = self.subscribers.lock().unwrap();
            subs.retain(|tx| tx.send(event.clone()).is_ok());
        }

        fn live_subscribers(&self) -> usize {
            let mut subs = self.subscribers.lock().unwrap();
            subs.retain(|tx| !tx.is_closed());
            subs.len()
        }
    }

    impl WalletProvider for MockWallet {
        fn request_accounts(
            &self,
        ) -> impl Future<Output = Result<Vec<Address>, WalletError>> + Send {
            let accounts = self.accounts.clone();
            async move { Ok(accounts) }
        }

        fn native_balance(
            &self,
            _address: Address,
        ) -> impl Future<Output = Result<U256, WalletError>> + Send {
            let result = if self.fail_balance {
                Err(WalletError::BalanceFetchFailed("rpc down".into()))
            } else {
                Ok(U256::from(1_000_000u64))
            };
            async move { result }
        }

        fn chain_id(&self) -> impl Future<Output = Result<u64, WalletError>> + Send {
            let id = *self.chain.lock().unwrap();
            async move { Ok(id) }
        }

        fn switch_chain(
            &self,
            chain_id: u64,
        ) -> impl Future<Output = Result<(), WalletError>> + Send {
            self.switch_calls.lock().unwrap().push(chain_id);
            let result = match self.switch_mode {
                SwitchMode::Accept => {
                    *self.chain.lock().unwrap() = chain_id;
                    Ok(())
                }
                SwitchMode::Unrecognized => {
                    Err(WalletError::ChainUnrecognizedByProvider(chain_id))
                }
                SwitchMode::Reject => Err(WalletError::ChainSwitchRejected("denied".into())),
            };
            async move { result }
        }

        fn add_chain(
            &self,
            chain: &ChainDescriptor,
        ) -> impl Future<Output = Result<(), WalletError>> + Send {
            self.added_chains.lock().unwrap().push(chain.id);
            async move { Ok(()) }
        }

        fn watch_asset(
            &self,
            _token: Address,
            _symbol: &str,
            _decimals: u8,
        ) -> impl Future<Output = Result<(), WalletError>> + Send {
            async move { Ok(()) }
        }

        fn subscribe_events(&self) -> mpsc::UnboundedReceiver<WalletEvent> {
            let (tx, rx) = mpsc::unbounded_channel();
            self.subscribers.lock().unwrap().push(tx);
            rx
        }
    }

    fn manager(wallet: MockWallet) -> SessionManager<MockWallet, CaptureNotifier> {
        SessionManager::new(Some(wallet), CaptureNotifier::new())
            .with_switch_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_connect_on_supported_chain_never_switches() {
        for chain_id in [5u64, 80001] {
            let mut mgr = manager(MockWallet::on_chain(chain_id));

            mgr.connect().await.unwrap();

            assert!(mgr.is_connected());
            assert_eq!(mgr.session().chain.unwrap().id, chain_id);
            assert_eq!(mgr.session().balance_wei, Some(U256::from(1_000_000u64)));
            assert!(mgr.wallet().unwrap().switch_calls().is_empty());
        }
    }

    #[tokio::test]
    async fn test_connect_on_unsupported_chain_switches_once_to_default() {
        let mut mgr = manager(MockWallet::on_chain(1));

        // The mock accepts the switch, so the re-run connects on Goerli.
        mgr.connect().await.unwrap();

        assert_eq!(mgr.wallet().unwrap().switch_calls(), vec![5]);
        assert_eq!(mgr.session().chain.unwrap().id, 5);
    }

    #[tokio::test]
    async fn test_unrecognized_chain_falls_back_to_add_without_retry() {
        let mut wallet = MockWallet::on_chain(1);
        wallet.switch_mode = SwitchMode::Unrecognized;
        let mut mgr = manager(wallet);

        let err = mgr.connect().await.unwrap_err();

        assert!(matches!(err, WalletError::UnsupportedChain(1)));
        assert_eq!(mgr.wallet().unwrap().switch_calls(), vec![5]);
        assert_eq!(*mgr.wallet().unwrap().added_chains.lock().unwrap(), vec![5]);
        // chain never set while unsupported
        assert_eq!(mgr.session().chain, None);
        // the earlier steps did resolve
        assert!(mgr.session().address.is_some());
    }

    #[tokio::test]
    async fn test_rejected_switch_leaves_chain_unset() {
        let mut wallet = MockWallet::on_chain(1);
        wallet.switch_mode = SwitchMode::Reject;
        let mut mgr = manager(wallet);

        let err = mgr.connect().await.unwrap_err();

        assert!(matches!(err, WalletError::ChainSwitchRejected(_)));
        assert_eq!(mgr.session().chain, None);
    }

    #[tokio::test]
    async fn test_missing_wallet_is_detected() {
        let mut mgr: SessionManager<MockWallet, CaptureNotifier> =
            SessionManager::new(None, CaptureNotifier::new());

        let err = mgr.connect().await.unwrap_err();
        assert!(matches!(err, WalletError::NoWalletDetected));
    }

    #[tokio::test]
    async fn test_empty_account_list_is_denied() {
        let mut wallet = MockWallet::on_chain(5);
        wallet.accounts.clear();
        let mut mgr = manager(wallet);

        let err = mgr.connect().await.unwrap_err();
        assert!(matches!(err, WalletError::AccountRequestDenied));
        assert_eq!(mgr.session().address, None);
    }

    #[tokio::test]
    async fn test_balance_failure_aborts_connect() {
        let mut wallet = MockWallet::on_chain(5);
        wallet.fail_balance = true;
        let mut mgr = manager(wallet);

        let err = mgr.connect().await.unwrap_err();

        assert!(matches!(err, WalletError::BalanceFetchFailed(_)));
        // address resolved before the failing step; chain never set
        assert!(mgr.session().address.is_some());
        assert_eq!(mgr.session().chain, None);
    }

    #[tokio::test]
    async fn test_logout_clears_every_field() {
        let mut mgr = manager(MockWallet::on_chain(5));
        mgr.connect().await.unwrap();

        mgr.disconnect();

        assert_eq!(*mgr.session(), WalletSession::default());
        assert!(!mgr.is_connected());
    }

    #[tokio::test]
    async fn test_disconnect_tears_down_event_subscription() {
        let mut mgr = manager(MockWallet::on_chain(5));
        mgr.connect().await.unwrap();
        assert_eq!(mgr.wallet().unwrap().live_subscribers(), 1);

        mgr.disconnect();
        assert_eq!(mgr.wallet().unwrap().live_subscribers(), 0);

        // Reconnecting starts a single fresh subscription.
        mgr.connect().await.unwrap();
        assert_eq!(mgr.wallet().unwrap().live_subscribers(), 1);
    }

    #[tokio::test]
    async fn test_resync_reuses_existing_subscription() {
        let mut mgr = manager(MockWallet::on_chain(5));
        mgr.connect().await.unwrap();

        mgr.resync().await.unwrap();

        assert_eq!(mgr.wallet().unwrap().live_subscribers(), 1);
        assert!(mgr.is_connected());
    }

    #[tokio::test]
    async fn test_wallet_events_reach_the_session() {
        let mut mgr = manager(MockWallet::on_chain(5));
        mgr.connect().await.unwrap();

        mgr.wallet().unwrap().emit(WalletEvent::ChainChanged(80001));

        assert_eq!(
            mgr.next_event().await,
            Some(WalletEvent::ChainChanged(80001))
        );
    }

    #[tokio::test]
    async fn test_refresh_failure_keeps_existing_balance() {
        let mut mgr = manager(MockWallet::on_chain(5));
        mgr.connect().await.unwrap();
        let before = mgr.session().balance_wei;

        // Flip the mock into failure mode, then refresh.
        if let Some(wallet) = mgr.wallet.as_mut() {
            wallet.fail_balance = true;
        }
        mgr.refresh_balance().await;

        assert_eq!(mgr.session().balance_wei, before);
    }

    #[tokio::test]
    async fn test_user_switch_resyncs_session() {
        let mut mgr = manager(MockWallet::on_chain(5));
        mgr.connect().await.unwrap();

        mgr.switch_to(&config::MUMBAI).await.unwrap();

        assert_eq!(mgr.session().chain.unwrap().id, 80001);
    }

    #[tokio::test]
    async fn test_user_switch_to_unknown_chain_adds_it_without_retry() {
        let mut wallet = MockWallet::on_chain(5);
        wallet.switch_mode = SwitchMode::Unrecognized;
        let mut mgr = manager(wallet);
        mgr.connect().await.unwrap();

        let err = mgr.switch_to(&config::MUMBAI).await.unwrap_err();

        assert!(matches!(
            err,
            WalletError::ChainUnrecognizedByProvider(80001)
        ));
        assert_eq!(mgr.wallet().unwrap().switch_calls(), vec![80001]);
        assert_eq!(
            *mgr.wallet().unwrap().added_chains.lock().unwrap(),
            vec![80001]
        );
        // the validated session survives the failed switch
        assert_eq!(mgr.session().chain.unwrap().id, 5);
    }
}
