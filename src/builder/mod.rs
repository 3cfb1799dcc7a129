//! Server side of the fee claim: validates a claim request and returns the
//! unsigned claim transaction for the fee claimer's wallet to sign.

mod guard;

pub use guard::{ClaimBusy, InFlightClaims};

use std::{str::FromStr, sync::Arc};

use solana_sdk::{message::Message, pubkey::Pubkey, transaction::Transaction};

use crate::{
    api::error::ApiError,
    claim_api::schemas::{ClaimFeesBody, ClaimFeesResponse, EchoedParams, NOT_SPECIFIED},
    onchain::{
        dbc::{BondingCurve, ClaimTradingFeeParams},
        ledger::Ledger,
        tx::encode_tx,
    },
    utils::misc::non_empty,
};

const SUCCESS_MESSAGE: &str =
    "Transaction created successfully. Please sign and send using your wallet.";

pub struct TransactionBuilder {
    ledger: Arc<dyn Ledger>,
    curve: Arc<dyn BondingCurve>,
    in_flight: InFlightClaims,
}

fn parse_address(value: &str) -> Result<Pubkey, ApiError> {
    Pubkey::from_str(value).map_err(|_| ApiError::InvalidAddress)
}

fn parse_amount(value: &Option<String>) -> Result<u64, ApiError> {
    match non_empty(value) {
        None => Ok(0),
        Some(raw) => raw
            .parse::<u64>()
            .map_err(|_| ApiError::InvalidAmount(raw.to_string())),
    }
}

/// Checks the body without touching the network.
pub fn validate(body: &ClaimFeesBody) -> Result<ClaimTradingFeeParams, ApiError> {
    let (Some(pool), Some(fee_claimer), Some(payer)) = (
        non_empty(&body.pool),
        non_empty(&body.fee_claimer),
        non_empty(&body.payer),
    ) else {
        return Err(ApiError::MissingFields);
    };

    let pool = parse_address(pool)?;
    let fee_claimer = parse_address(fee_claimer)?;
    let payer = parse_address(payer)?;
    let receiver = non_empty(&body.receiver).map(parse_address).transpose()?;
    let temp_wsol_acc = non_empty(&body.temp_w_sol_acc)
        .map(parse_address)
        .transpose()?;

    Ok(ClaimTradingFeeParams {
        pool,
        fee_claimer,
        payer,
        max_base_amount: parse_amount(&body.max_base_amount)?,
        max_quote_amount: parse_amount(&body.max_quote_amount)?,
        receiver,
        temp_wsol_acc,
    })
}

fn echo(body: &ClaimFeesBody, params: &ClaimTradingFeeParams) -> EchoedParams {
    let or_not_specified = |value: &Option<String>| {
        non_empty(value)
            .map(String::from)
            .unwrap_or_else(|| NOT_SPECIFIED.to_string())
    };

    EchoedParams {
        pool: params.pool.to_string(),
        fee_claimer: params.fee_claimer.to_string(),
        payer: params.payer.to_string(),
        max_base_amount: body.max_base_amount.clone(),
        max_quote_amount: body.max_quote_amount.clone(),
        receiver: or_not_specified(&body.receiver),
        temp_w_sol_acc: or_not_specified(&body.temp_w_sol_acc),
    }
}

impl TransactionBuilder {
    pub fn new(
        ledger: Arc<dyn Ledger>,
        curve: Arc<dyn BondingCurve>,
        in_flight: InFlightClaims,
    ) -> Self {
        Self {
            ledger,
            curve,
            in_flight,
        }
    }

    pub async fn build(&self, body: &ClaimFeesBody) -> Result<ClaimFeesResponse, ApiError> {
        let params = validate(body)?;

        tracing::info!(
            pool = %params.pool,
            fee_claimer = %params.fee_claimer,
            payer = %params.payer,
            max_base_amount = params.max_base_amount,
            max_quote_amount = params.max_quote_amount,
            "Building claim fee transaction"
        );

        let ticket = self
            .in_flight
            .try_acquire(params.pool, params.fee_claimer)?;

        let pool_exists = self
            .ledger
            .account_exists(&params.pool)
            .await
            .map_err(ApiError::PoolLookup)?;

        if !pool_exists {
            return Err(ApiError::PoolNotFound);
        }

        let ixs = self.curve.claim_partner_trading_fee(&params).await?;
        let blockhash = self.ledger.latest_blockhash().await?;

        let message = Message::new_with_blockhash(&ixs, Some(&params.payer), &blockhash);
        let tx = Transaction::new_unsigned(message);
        let transaction = encode_tx(&tx)?;

        ticket.issue();
        tracing::info!(pool = %params.pool, %blockhash, "Claim fee transaction issued");

        Ok(ClaimFeesResponse {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
            transaction: Some(transaction),
            params: echo(body, &params),
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::onchain::{dbc::PoolFees, tx::decode_tx};
    use async_trait::async_trait;
    use solana_sdk::{
        hash::Hash, instruction::Instruction, signature::Signature, system_instruction,
    };
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    pub(crate) const POOL: &str = "11111111111111111111111111111111";
    pub(crate) const CLAIMER: &str = "So11111111111111111111111111111111111111112";

    #[derive(Default)]
    pub(crate) struct MockLedger {
        pub pool_exists: bool,
        pub blockhash: Hash,
        pub fail_lookup: bool,
        pub fail_confirm: bool,
        pub account_calls: AtomicUsize,
        pub blockhash_calls: AtomicUsize,
        pub confirm_calls: AtomicUsize,
    }

    impl MockLedger {
        pub fn with_pool(exists: bool) -> Self {
            Self {
                pool_exists: exists,
                blockhash: Hash::new_unique(),
                ..Default::default()
            }
        }

        pub fn calls(&self) -> usize {
            self.account_calls.load(Ordering::SeqCst)
                + self.blockhash_calls.load(Ordering::SeqCst)
                + self.confirm_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Ledger for MockLedger {
        async fn account_exists(&self, _address: &Pubkey) -> eyre::Result<bool> {
            self.account_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_lookup {
                eyre::bail!("connection refused");
            }
            Ok(self.pool_exists)
        }

        async fn latest_blockhash(&self) -> eyre::Result<Hash> {
            self.blockhash_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.blockhash)
        }

        async fn confirm_transaction(
            &self,
            _signature: &Signature,
            _recent_blockhash: &Hash,
        ) -> eyre::Result<()> {
            self.confirm_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_confirm {
                eyre::bail!("Transaction failed: blockhash expired");
            }
            Ok(())
        }
    }

    #[derive(Default)]
    pub(crate) struct MockCurve {
        pub error: Option<String>,
        pub pools: Vec<PoolFees>,
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl BondingCurve for MockCurve {
        async fn claim_partner_trading_fee(
            &self,
            params: &ClaimTradingFeeParams,
        ) -> eyre::Result<Vec<Instruction>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(error) = &self.error {
                eyre::bail!("{error}");
            }
            Ok(vec![system_instruction::transfer(
                &params.fee_claimer,
                &params.pool,
                params.max_quote_amount,
            )])
        }

        async fn pools_by_creator(&self, _creator: &Pubkey) -> eyre::Result<Vec<PoolFees>> {
            if let Some(error) = &self.error {
                eyre::bail!("{error}");
            }
            Ok(self.pools.clone())
        }
    }

    pub(crate) fn body(pool: Option<&str>) -> ClaimFeesBody {
        ClaimFeesBody {
            pool: pool.map(String::from),
            fee_claimer: Some(CLAIMER.to_string()),
            payer: Some(CLAIMER.to_string()),
            max_base_amount: Some("0".to_string()),
            max_quote_amount: Some("0".to_string()),
            receiver: None,
            temp_w_sol_acc: None,
        }
    }

    fn builder(ledger: Arc<MockLedger>, curve: Arc<MockCurve>) -> TransactionBuilder {
        TransactionBuilder::new(ledger, curve, InFlightClaims::new(Duration::from_secs(30)))
    }

    #[tokio::test]
    async fn missing_fields_make_no_ledger_calls() {
        let ledger = Arc::new(MockLedger::with_pool(true));
        let builder = builder(ledger.clone(), Arc::new(MockCurve::default()));

        for body in [
            body(None),
            ClaimFeesBody {
                fee_claimer: None,
                ..body(Some(POOL))
            },
            ClaimFeesBody {
                payer: Some(String::new()),
                ..body(Some(POOL))
            },
        ] {
            let err = builder.build(&body).await.unwrap_err();
            assert!(matches!(err, ApiError::MissingFields));
        }

        assert_eq!(ledger.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_addresses_make_no_ledger_calls() {
        let ledger = Arc::new(MockLedger::with_pool(true));
        let builder = builder(ledger.clone(), Arc::new(MockCurve::default()));

        for body in [
            body(Some("not-a-key")),
            ClaimFeesBody {
                payer: Some("0OIl".to_string()),
                ..body(Some(POOL))
            },
            ClaimFeesBody {
                receiver: Some("xyz".to_string()),
                ..body(Some(POOL))
            },
            ClaimFeesBody {
                temp_w_sol_acc: Some("abc".to_string()),
                ..body(Some(POOL))
            },
        ] {
            let err = builder.build(&body).await.unwrap_err();
            assert!(matches!(err, ApiError::InvalidAddress));
        }

        assert_eq!(ledger.calls(), 0);
    }

    #[tokio::test]
    async fn missing_pool_account_stops_after_one_query() {
        let ledger = Arc::new(MockLedger::with_pool(false));
        let curve = Arc::new(MockCurve::default());
        let builder = builder(ledger.clone(), curve.clone());

        let err = builder.build(&body(Some(POOL))).await.unwrap_err();

        assert!(matches!(err, ApiError::PoolNotFound));
        assert_eq!(err.to_string(), "Pool account does not exist");
        assert_eq!(ledger.calls(), 1);
        assert_eq!(curve.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn returns_unsigned_transaction_paid_by_payer() {
        let ledger = Arc::new(MockLedger::with_pool(true));
        let builder = builder(ledger.clone(), Arc::new(MockCurve::default()));

        let response = builder.build(&body(Some(POOL))).await.unwrap();
        let tx = decode_tx(response.transaction.as_deref().unwrap()).unwrap();

        let payer = Pubkey::from_str(CLAIMER).unwrap();
        assert!(response.success);
        assert_eq!(tx.message.account_keys[0], payer);
        assert_eq!(tx.message.recent_blockhash, ledger.blockhash);
        assert!(tx.signatures.iter().all(|s| *s == Signature::default()));
        assert_eq!(ledger.account_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ledger.blockhash_calls.load(Ordering::SeqCst), 1);
        assert_eq!(response.params.receiver, NOT_SPECIFIED);
        assert_eq!(response.params.temp_w_sol_acc, NOT_SPECIFIED);
        assert_eq!(response.params.max_base_amount.as_deref(), Some("0"));
    }

    #[tokio::test]
    async fn empty_amounts_default_to_zero() {
        let mut body = body(Some(POOL));
        body.max_base_amount = None;
        body.max_quote_amount = Some(String::new());

        let params = validate(&body).unwrap();

        assert_eq!(params.max_base_amount, 0);
        assert_eq!(params.max_quote_amount, 0);
    }

    #[tokio::test]
    async fn rejects_non_numeric_amount() {
        let mut body = body(Some(POOL));
        body.max_quote_amount = Some("-5".to_string());

        assert!(matches!(validate(&body), Err(ApiError::InvalidAmount(_))));
    }

    #[tokio::test]
    async fn upstream_error_is_passed_through() {
        let ledger = Arc::new(MockLedger::with_pool(true));
        let curve = Arc::new(MockCurve {
            error: Some("Fee claimer does not match".to_string()),
            ..Default::default()
        });
        let builder = builder(ledger, curve);

        let err = builder.build(&body(Some(POOL))).await.unwrap_err();

        assert!(matches!(err, ApiError::Upstream(_)));
        assert_eq!(err.to_string(), "Fee claimer does not match");
    }

    #[tokio::test]
    async fn duplicate_claim_is_refused_until_failure_releases_it() {
        let ledger = Arc::new(MockLedger::with_pool(true));
        let builder = builder(ledger.clone(), Arc::new(MockCurve::default()));

        builder.build(&body(Some(POOL))).await.unwrap();
        let err = builder.build(&body(Some(POOL))).await.unwrap_err();
        assert!(matches!(err, ApiError::ClaimIssuedRecently(secs) if secs > 0 && secs <= 30));
        assert_eq!(ledger.account_calls.load(Ordering::SeqCst), 1);

        let failing = TransactionBuilder::new(
            Arc::new(MockLedger::with_pool(false)),
            Arc::new(MockCurve::default()),
            InFlightClaims::new(Duration::from_secs(30)),
        );
        assert!(failing.build(&body(Some(POOL))).await.is_err());
        assert!(matches!(
            failing.build(&body(Some(POOL))).await,
            Err(ApiError::PoolNotFound)
        ));
    }
}
