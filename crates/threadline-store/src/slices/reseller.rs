//! # Reseller Slice
//!
//! Wallet summary and withdrawal history. The ledger lives on the server;
//! balances only change there (commission release, payout processing).

use serde::Serialize;
use threadline_api::ApiClient;
use threadline_core::validation::validate_withdrawal_amount;
use threadline_core::{Money, Wallet, Withdrawal};
use tracing::{info, warn};

use crate::error::StoreResult;
use crate::slice::{Slice, SliceCell};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResellerOp {
    Wallet,
    Withdrawals,
    RequestWithdrawal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResellerAction {
    Pending(ResellerOp),
    WalletLoaded(Wallet),
    WithdrawalsLoaded(Vec<Withdrawal>),
    WithdrawalRequested(Withdrawal),
    Rejected(ResellerOp, String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResellerState {
    pub wallet: Option<Wallet>,
    pub withdrawals: Vec<Withdrawal>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Slice for ResellerState {
    type Action = ResellerAction;

    fn reduce(&mut self, action: ResellerAction) {
        match action {
            ResellerAction::Pending(_) => {
                self.loading = true;
                self.error = None;
            }
            ResellerAction::WalletLoaded(wallet) => {
                self.loading = false;
                self.wallet = Some(wallet);
            }
            ResellerAction::WithdrawalsLoaded(items) => {
                self.loading = false;
                self.withdrawals = items;
            }
            ResellerAction::WithdrawalRequested(withdrawal) => {
                self.loading = false;
                self.withdrawals.insert(0, withdrawal);
            }
            ResellerAction::Rejected(_, message) => {
                self.loading = false;
                self.error = Some(message);
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResellerStore {
    state: SliceCell<ResellerState>,
    api: ApiClient,
}

impl ResellerStore {
    pub fn new(api: ApiClient) -> Self {
        ResellerStore {
            state: SliceCell::new(),
            api,
        }
    }

    pub fn snapshot(&self) -> ResellerState {
        self.state.snapshot()
    }

    pub async fn fetch_wallet(&self) -> StoreResult<Wallet> {
        self.state
            .dispatch(ResellerAction::Pending(ResellerOp::Wallet));
        match self.api.reseller().wallet().await {
            Ok(wallet) => {
                self.state
                    .dispatch(ResellerAction::WalletLoaded(wallet.clone()));
                Ok(wallet)
            }
            Err(e) => {
                self.state
                    .dispatch(ResellerAction::Rejected(ResellerOp::Wallet, e.user_message()));
                Err(e.into())
            }
        }
    }

    pub async fn fetch_withdrawals(&self) -> StoreResult<Vec<Withdrawal>> {
        self.state
            .dispatch(ResellerAction::Pending(ResellerOp::Withdrawals));
        match self.api.reseller().withdrawals().await {
            Ok(items) => {
                self.state
                    .dispatch(ResellerAction::WithdrawalsLoaded(items.clone()));
                Ok(items)
            }
            Err(e) => {
                self.state.dispatch(ResellerAction::Rejected(
                    ResellerOp::Withdrawals,
                    e.user_message(),
                ));
                Err(e.into())
            }
        }
    }

    /// Requests a payout after checking it against the available balance.
    ///
    /// Loads the wallet first if it has not been fetched yet, and refreshes
    /// it afterwards since the server moves the amount out of `available`.
    pub async fn request_withdrawal(&self, amount: Money) -> StoreResult<Withdrawal> {
        let wallet = match self.state.with_state(|s| s.wallet.clone()) {
            Some(wallet) => wallet,
            None => self.fetch_wallet().await?,
        };
        validate_withdrawal_amount(amount, wallet.available_balance)?;

        self.state
            .dispatch(ResellerAction::Pending(ResellerOp::RequestWithdrawal));
        let withdrawal = match self.api.reseller().request_withdrawal(amount).await {
            Ok(withdrawal) => withdrawal,
            Err(e) => {
                warn!(%amount, error = %e, "Withdrawal request failed");
                self.state.dispatch(ResellerAction::Rejected(
                    ResellerOp::RequestWithdrawal,
                    e.user_message(),
                ));
                return Err(e.into());
            }
        };

        info!(withdrawal_id = %withdrawal.id, %amount, "Withdrawal requested");
        self.state
            .dispatch(ResellerAction::WithdrawalRequested(withdrawal.clone()));

        if let Err(e) = self.fetch_wallet().await {
            warn!(error = %e, "Wallet refresh after withdrawal failed");
        }
        Ok(withdrawal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use serde_json::json;
    use std::sync::Arc;
    use threadline_api::{Method, MockTransport};

    #[tokio::test]
    async fn test_withdrawal_above_balance_is_rejected_locally() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .once()
            .withf(|r| r.path == "/reseller/wallet")
            .returning(|_| Ok(json!({"availableBalance": 300, "pendingBalance": 900})));
        transport
            .expect_send()
            .withf(|r| r.method == Method::Post)
            .never();

        let store = ResellerStore::new(ApiClient::new(Arc::new(transport)));
        let err = store
            .request_withdrawal(Money::from_rupees(500))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(
            store.snapshot().wallet.map(|w| w.pending_balance),
            Some(Money::from_rupees(900))
        );
    }

    #[tokio::test]
    async fn test_withdrawal_success_refreshes_wallet() {
        let mut transport = MockTransport::new();
        let mut wallet_calls = 0;
        transport
            .expect_send()
            .times(2)
            .withf(|r| r.path == "/reseller/wallet")
            .returning(move |_| {
                wallet_calls += 1;
                let available = if wallet_calls == 1 { 1000 } else { 600 };
                Ok(json!({"availableBalance": available}))
            });
        transport
            .expect_send()
            .once()
            .withf(|r| r.method == Method::Post && r.path == "/reseller/withdrawals")
            .returning(|_| Ok(json!({"_id": "w-1", "amount": 400, "status": "pending"})));

        let store = ResellerStore::new(ApiClient::new(Arc::new(transport)));
        let withdrawal = store
            .request_withdrawal(Money::from_rupees(400))
            .await
            .unwrap();

        assert_eq!(withdrawal.id, "w-1");
        let state = store.snapshot();
        assert_eq!(state.withdrawals.len(), 1);
        assert_eq!(
            state.wallet.map(|w| w.available_balance),
            Some(Money::from_rupees(600))
        );
    }
}
