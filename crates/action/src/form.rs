//! Submission driver shared by the mint, transfer and burn forms.

use crate::{Action, TxOutcome};
use config::ChainDescriptor;
use notify::{Notice, Notifier};
use tracing::debug;

/// Per-form UI state. Each of the three write forms owns its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormState {
    /// The form is currently shown
    pub open: bool,
    /// A submission is in flight
    pub submitting: bool,
}

impl FormState {
    pub const fn opened() -> Self {
        Self {
            open: true,
            submitting: false,
        }
    }
}

/// Drive one submission of `action` through its full notice lifecycle.
///
/// Validation failures leave the form open for correction; any path
/// that reached the network closes the form and clears the submitting
/// flag. On success the caller is expected to refresh the session's
/// native balance independently (the token balance itself updates via
/// the live transfer watchers).
pub async fn submit<A, N>(
    form: &mut FormState,
    action: &A,
    notifier: &N,
    chain: &ChainDescriptor,
) -> eyre::Result<TxOutcome>
where
    A: Action,
    N: Notifier,
{
    if let Err(e) = action.validate() {
        notifier.publish(Notice::error(format!(
            "{} failed: {e}",
            action.description()
        )));
        return Err(e);
    }

    form.submitting = true;

    let sent = match action.send().await {
        Ok(sent) => sent,
        Err(e) => {
            notifier.publish(Notice::error(format!("{} failed!", action.description())));
            form.submitting = false;
            form.open = false;
            return Err(e);
        }
    };

    debug!(tx_hash = %sent.tx_hash(), "{} submitted", action.description());
    notifier.publish(Notice::progress(
        format!("{} in progress ...", action.description()),
        Some(chain.tx_url(sent.tx_hash())),
    ));

    let result = sent.confirmed().await;
    form.submitting = false;
    form.open = false;
    notifier.dismiss_progress();

    match result {
        Ok(outcome) if outcome.success => {
            notifier.publish(Notice::success(format!(
                "{} confirmed!",
                action.description()
            )));
            Ok(outcome)
        }
        Ok(outcome) => {
            notifier.publish(Notice::error(format!("{} reverted!", action.description())));
            Err(eyre::eyre!("transaction {} reverted", outcome.tx_hash))
        }
        Err(e) => {
            notifier.publish(Notice::error(format!("{} failed!", action.description())));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sent;
    use alloy_primitives::TxHash;
    use notify::CaptureNotifier;
    use std::future::Future;

    struct FakeAction {
        fail_validation: bool,
        reject_send: bool,
        revert: bool,
    }

    impl FakeAction {
        const fn succeeding() -> Self {
            Self {
                fail_validation: false,
                reject_send: false,
                revert: false,
            }
        }
    }

    impl Action for FakeAction {
        fn validate(&self) -> eyre::Result<()> {
            if self.fail_validation {
                eyre::bail!("Value is zero");
            }
            Ok(())
        }

        fn send(&self) -> impl Future<Output = eyre::Result<Sent>> + Send {
            let reject = self.reject_send;
            let revert = self.revert;
            async move {
                if reject {
                    eyre::bail!("user rejected the transaction");
                }
                let tx_hash = TxHash::from([0xabu8; 32]);
                Ok(Sent::new(tx_hash, async move {
                    Ok(TxOutcome {
                        tx_hash,
                        block_number: Some(42),
                        gas_used: 21_000,
                        success: !revert,
                    })
                }))
            }
        }

        fn description(&self) -> String {
            "Mint 1000 DEMO".to_string()
        }
    }

    #[tokio::test]
    async fn test_successful_submission_closes_form() {
        let mut form = FormState::opened();
        let capture = CaptureNotifier::new();

        let outcome = submit(&mut form, &FakeAction::succeeding(), &capture, &config::GOERLI)
            .await
            .unwrap();

        assert!(outcome.success);
        assert!(!form.open);
        assert!(!form.submitting);

        // progress notice carried the explorer link before confirmation
        let notices = capture.notices();
        assert!(notices
            .iter()
            .any(|n| n.level == notify::Level::Success && n.text.contains("confirmed")));
        // the sticky progress notice was dismissed
        assert!(notices.iter().all(|n| !n.sticky));
    }

    #[tokio::test]
    async fn test_progress_notice_links_to_explorer() {
        let mut form = FormState::opened();

        // capture before dismissal by confirming lazily: use a notifier
        // that keeps dismissed notices for inspection
        #[derive(Clone, Default)]
        struct KeepAll(CaptureNotifier);
        impl Notifier for KeepAll {
            fn publish(&self, notice: Notice) {
                self.0.publish(notice);
            }
            fn dismiss_progress(&self) {}
        }

        let keep = KeepAll::default();
        submit(&mut form, &FakeAction::succeeding(), &keep, &config::GOERLI)
            .await
            .unwrap();

        let progress = keep
            .0
            .notices()
            .into_iter()
            .find(|n| n.sticky)
            .expect("progress notice published");
        let link = progress.link.expect("progress notice has a link");
        assert!(link.starts_with("https://goerli.etherscan.io/tx/0x"));
        assert!(progress.text.contains("in progress"));
    }

    #[tokio::test]
    async fn test_validation_failure_keeps_form_open() {
        let mut form = FormState::opened();
        let capture = CaptureNotifier::new();
        let action = FakeAction {
            fail_validation: true,
            ..FakeAction::succeeding()
        };

        let result = submit(&mut form, &action, &capture, &config::GOERLI).await;

        assert!(result.is_err());
        assert!(form.open);
        assert!(!form.submitting);
        assert!(capture.contains("Value is zero"));
    }

    #[tokio::test]
    async fn test_rejected_send_clears_submitting() {
        let mut form = FormState::opened();
        let capture = CaptureNotifier::new();
        let action = FakeAction {
            reject_send: true,
            ..FakeAction::succeeding()
        };

        let result = submit(&mut form, &action, &capture, &config::GOERLI).await;

        assert!(result.is_err());
        assert!(!form.submitting);
        assert!(capture.contains("failed"));
    }

    #[tokio::test]
    async fn test_reverted_transaction_reports_failure() {
        let mut form = FormState::opened();
        let capture = CaptureNotifier::new();
        let action = FakeAction {
            revert: true,
            ..FakeAction::succeeding()
        };

        let result = submit(&mut form, &action, &capture, &config::GOERLI).await;

        assert!(result.is_err());
        assert!(!form.submitting);
        assert!(capture.contains("reverted"));
    }
}
