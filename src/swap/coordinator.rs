//! Sequential swap workflow: allowance, optional approval, swap

use super::types::{SwapOutcome, SwapStage};
use crate::address::{checksum, parse_address};
use crate::chain::{wait_for_receipt, ChainNode};
use crate::config::{AllowanceFailurePolicy, SwapConfig};
use crate::error::{SwapError, SwapResult};
use crate::quote::{QuoteService, SwapQuery};
use crate::tx::{GasEstimator, GasPolicy, TransactionBuilder, TransactionSender, TransactionSigner};

use ethers::types::{Address, H256, U256};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Highest slippage the aggregator accepts, in percent
const MAX_SLIPPAGE_PERCENT: f64 = 50.0;

/// Runs one swap for one wallet on one chain
pub struct SwapCoordinator {
    chain_id: u64,
    wallet: Address,
    quote: Arc<dyn QuoteService>,
    node: Arc<dyn ChainNode>,
    signer: TransactionSigner,
    builder: TransactionBuilder,
    sender: TransactionSender,
    config: SwapConfig,
}

impl SwapCoordinator {
    /// Create a coordinator for a wallet. Fails before any network call when the
    /// wallet address is malformed or does not belong to the private key.
    pub fn new(
        wallet_address: &str,
        signer: TransactionSigner,
        quote: Arc<dyn QuoteService>,
        node: Arc<dyn ChainNode>,
        config: SwapConfig,
    ) -> SwapResult<Self> {
        let wallet = parse_address(wallet_address)?;
        if signer.address() != wallet {
            return Err(SwapError::Wallet(format!(
                "Private key does not control wallet {}",
                checksum(&wallet)
            )));
        }

        let chain_id = node.chain_id();
        let builder = TransactionBuilder::new(
            wallet,
            chain_id,
            GasEstimator::new(config.fallback_gas_limit),
        );
        let sender = TransactionSender::new(node.clone());

        Ok(Self {
            chain_id,
            wallet,
            quote,
            node,
            signer,
            builder,
            sender,
            config,
        })
    }

    /// Perform the complete swap.
    ///
    /// Invalid inputs are returned as errors. Everything that goes wrong once the
    /// workflow has started is reported in the returned outcome instead.
    pub async fn perform_swap(
        &self,
        src_token: &str,
        dst_token: &str,
        amount: &str,
        slippage: f64,
    ) -> SwapResult<SwapOutcome> {
        let src = parse_address(src_token)?;
        let dst = parse_address(dst_token)?;
        let amount = parse_amount(amount)?;
        if !slippage.is_finite() || !(0.0..=MAX_SLIPPAGE_PERCENT).contains(&slippage) {
            return Err(SwapError::InvalidAmount(format!(
                "slippage must be between 0 and {} percent, got {}",
                MAX_SLIPPAGE_PERCENT, slippage
            )));
        }

        let started = Instant::now();
        let outcome = self.run(src, dst, amount, slippage).await;

        let result = if outcome.success { "succeeded" } else { "failed" };
        crate::metrics::record_swap(self.chain_id, result, started.elapsed().as_secs_f64());

        Ok(outcome)
    }

    async fn run(&self, src: Address, dst: Address, amount: U256, slippage: f64) -> SwapOutcome {
        let mut outcome = SwapOutcome::default();

        let mut stage = self.enter(SwapStage::CheckAllowance, None);
        let allowance = match self.check_allowance(src).await {
            Ok(allowance) => allowance,
            Err(e) => return self.fail(stage, outcome, e),
        };
        info!("Current allowance: {}", allowance);

        if allowance < amount {
            info!("Insufficient allowance. An approval transaction is required.");

            if !self.config.auto_approve {
                self.enter(SwapStage::Failed, Some(stage));
                return outcome.failed("Insufficient allowance and auto-approve is disabled");
            }

            stage = self.enter(SwapStage::ApproveBuild, Some(stage));
            let approve_amount = self.config.approve_exact_amount.then_some(amount);
            let approval = match self.build_approval(src, approve_amount).await {
                Ok(tx) => tx,
                Err(e) => return self.fail(stage, outcome, e),
            };

            stage = self.enter(SwapStage::ApproveSignSend, Some(stage));
            let approval_hash = match self.sender.sign_and_send(&self.signer, &approval).await {
                Ok(hash) => hash,
                Err(e) => return self.fail(stage, outcome, e),
            };
            info!("Approval transaction hash: {:?}", approval_hash);
            crate::metrics::record_approval_sent(self.chain_id);
            outcome.approval_tx_hash = Some(format_hash(approval_hash));

            stage = self.enter(SwapStage::ApproveConfirm, Some(stage));
            if let Err(e) = self.confirm(approval_hash).await {
                return self.fail(stage, outcome, e);
            }
            info!("Approval transaction confirmed");
        }

        stage = self.enter(SwapStage::SwapBuild, Some(stage));
        let query = SwapQuery {
            src,
            dst,
            amount,
            from: self.wallet,
            slippage,
        };
        let swap_tx = match self.build_swap(&query).await {
            Ok(tx) => tx,
            Err(e) => return self.fail(stage, outcome, e),
        };

        stage = self.enter(SwapStage::SwapSignSend, Some(stage));
        match self.sender.sign_and_send(&self.signer, &swap_tx).await {
            Ok(hash) => {
                info!("Swap transaction hash: {:?}", hash);
                self.enter(SwapStage::Succeeded, Some(stage));
                outcome.succeeded(format_hash(hash))
            }
            Err(e) => self.fail(stage, outcome, e),
        }
    }

    /// Allowance, with the configured policy applied to lookup failures
    async fn check_allowance(&self, token: Address) -> SwapResult<U256> {
        match self.quote.allowance(self.chain_id, token, self.wallet).await {
            Ok(allowance) => Ok(allowance),
            Err(e) => match self.config.allowance_failure_policy {
                AllowanceFailurePolicy::AssumeZero => {
                    error!("Error checking allowance: {}. Assuming zero allowance", e);
                    Ok(U256::zero())
                }
                AllowanceFailurePolicy::Abort => Err(e),
            },
        }
    }

    async fn build_approval(
        &self,
        token: Address,
        amount: Option<U256>,
    ) -> SwapResult<crate::tx::UnsignedTransaction> {
        let quoted = self
            .quote
            .approve_transaction(self.chain_id, token, amount)
            .await?;
        self.builder
            .build(self.node.as_ref(), &quoted, GasPolicy::Estimate)
            .await
    }

    async fn build_swap(&self, query: &SwapQuery) -> SwapResult<crate::tx::UnsignedTransaction> {
        let quote = self.quote.swap_transaction(self.chain_id, query).await?;
        if let Some(dst_amount) = &quote.dst_amount {
            info!("Quoted destination amount: {}", dst_amount);
        }
        self.builder
            .build(self.node.as_ref(), &quote.tx, GasPolicy::PreferHint)
            .await
    }

    async fn confirm(&self, tx_hash: H256) -> SwapResult<()> {
        wait_for_receipt(
            self.node.as_ref(),
            tx_hash,
            self.config.receipt_poll_interval(),
            self.config.confirmation_timeout(),
        )
        .await
        .map(|_| ())
    }

    fn enter(&self, next: SwapStage, previous: Option<SwapStage>) -> SwapStage {
        match previous {
            Some(previous) if next.is_terminal() => info!("Swap stage {} -> {}", previous, next),
            Some(previous) => debug!("Swap stage {} -> {}", previous, next),
            None => debug!("Swap stage {}", next),
        }
        next
    }

    fn fail(&self, stage: SwapStage, outcome: SwapOutcome, e: SwapError) -> SwapOutcome {
        warn!(transient = e.is_transient(), "Swap failed at {}: {}", stage, e);
        self.enter(SwapStage::Failed, Some(stage));
        outcome.failed(format!("{}: {}", stage.failure_message(), e))
    }
}

/// Parse a positive decimal amount of smallest token units
pub fn parse_amount(amount: &str) -> SwapResult<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SwapError::InvalidAmount(format!(
            "{:?} is not a decimal integer",
            amount
        )));
    }

    let value = U256::from_dec_str(trimmed)
        .map_err(|e| SwapError::InvalidAmount(format!("{:?}: {}", amount, e)))?;
    if value.is_zero() {
        return Err(SwapError::InvalidAmount("amount must be positive".to_string()));
    }
    Ok(value)
}

fn format_hash(hash: H256) -> String {
    format!("{:?}", hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockChainNode;
    use crate::quote::{MockQuoteService, QuotedTransaction, SwapQuote};
    use ethers::types::transaction::eip2718::TypedTransaction;
    use ethers::types::{Bytes, TransactionReceipt, U64};
    use ethers::utils::keccak256;
    use ethers::utils::rlp::Rlp;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const WALLET: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const WALLET_CHECKSUM: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
    const WETH: &str = "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2";
    const ROUTER: &str = "0x111111125421cA6dc452d289314280a0f8842A65";
    const ONE_ETHER: &str = "1000000000000000000";

    type EventLog = Arc<Mutex<Vec<&'static str>>>;

    fn test_config(auto_approve: bool) -> SwapConfig {
        SwapConfig {
            auto_approve,
            receipt_poll_interval_ms: 1,
            confirmation_timeout_secs: 5,
            ..SwapConfig::default()
        }
    }

    fn approval_payload() -> QuotedTransaction {
        QuotedTransaction {
            to: Some(USDC.to_string()),
            data: Some("0x095ea7b3".to_string()),
            value: Some(U256::zero()),
            gas_price: Some(U256::from(1_000_000_000u64)),
            ..Default::default()
        }
    }

    fn swap_payload(gas: u64) -> SwapQuote {
        SwapQuote {
            dst_amount: Some("400000000000000".to_string()),
            tx: QuotedTransaction {
                from: Some(WALLET_CHECKSUM.to_string()),
                to: Some(ROUTER.to_string()),
                data: Some("0x12aa3caf".to_string()),
                value: Some(U256::zero()),
                gas: Some(U256::from(gas)),
                gas_price: Some(U256::from(2_000_000_000u64)),
                ..Default::default()
            },
        }
    }

    /// Node that logs broadcasts and receipt polls and keeps the raw payloads.
    /// The first `pending_polls` receipt lookups report the transaction as pending.
    fn recording_node(
        chain_id: u64,
        log: EventLog,
        sent: Arc<Mutex<Vec<Bytes>>>,
        pending_polls: usize,
    ) -> MockChainNode {
        let mut node = MockChainNode::new();
        node.expect_chain_id().return_const(chain_id);
        let nonce_source = sent.clone();
        node.expect_transaction_count()
            .returning(move |_| Ok(U256::from(nonce_source.lock().unwrap().len())));
        node.expect_gas_price().returning(|| Ok(U256::from(1_000_000_000u64)));
        node.expect_estimate_gas()
            .returning(|_| Err(SwapError::GasEstimation("execution reverted".to_string())));

        let send_log = log.clone();
        node.expect_send_raw_transaction().returning(move |raw| {
            send_log.lock().unwrap().push("send");
            let hash = H256::from(keccak256(&raw));
            sent.lock().unwrap().push(raw);
            Ok(hash)
        });

        let polls = Arc::new(AtomicUsize::new(0));
        node.expect_transaction_receipt().returning(move |_| {
            log.lock().unwrap().push("receipt");
            if polls.fetch_add(1, Ordering::SeqCst) < pending_polls {
                return Ok(None);
            }
            Ok(Some(TransactionReceipt {
                status: Some(U64::from(1)),
                block_number: Some(U64::from(19_000_000)),
                ..Default::default()
            }))
        });
        node
    }

    fn coordinator(
        quote: MockQuoteService,
        node: MockChainNode,
        config: SwapConfig,
    ) -> SwapCoordinator {
        SwapCoordinator::new(
            WALLET,
            TransactionSigner::from_private_key(DEV_KEY).unwrap(),
            Arc::new(quote),
            Arc::new(node),
            config,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_approval_path_end_to_end() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let sent = Arc::new(Mutex::new(Vec::new()));

        let mut quote = MockQuoteService::new();
        let l = log.clone();
        quote.expect_allowance().times(1).returning(move |_, _, _| {
            l.lock().unwrap().push("allowance");
            Ok(U256::zero())
        });
        let l = log.clone();
        quote
            .expect_approve_transaction()
            .times(1)
            .withf(|chain_id, _, amount| *chain_id == 42161 && amount.is_none())
            .returning(move |_, _, _| {
                l.lock().unwrap().push("approve_build");
                Ok(approval_payload())
            });
        let l = log.clone();
        quote
            .expect_swap_transaction()
            .times(1)
            .withf(|_, query| query.from == parse_address(WALLET).unwrap())
            .returning(move |_, _| {
                l.lock().unwrap().push("swap_build");
                Ok(swap_payload(0))
            });

        let node = recording_node(42161, log.clone(), sent.clone(), 0);
        let outcome = coordinator(quote, node, test_config(true))
            .perform_swap(USDC, WETH, ONE_ETHER, 1.0)
            .await
            .unwrap();

        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(outcome.message, "Swap completed successfully");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["allowance", "approve_build", "send", "receipt", "swap_build", "send"]
        );

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            outcome.approval_tx_hash.as_deref(),
            Some(format_hash(H256::from(keccak256(&sent[0]))).as_str())
        );
        assert_eq!(
            outcome.tx_hash.as_deref(),
            Some(format_hash(H256::from(keccak256(&sent[1]))).as_str())
        );
        let (swap_tx, signature) = TypedTransaction::decode_signed(&Rlp::new(&sent[1])).unwrap();
        assert_eq!(
            signature.recover(swap_tx.sighash()).unwrap(),
            parse_address(WALLET_CHECKSUM).unwrap()
        );
        assert_eq!(swap_tx.chain_id(), Some(U64::from(42161)));
        assert_eq!(swap_tx.nonce(), Some(&U256::one()));
        assert_eq!(swap_tx.value(), Some(&U256::zero()));
        // Quoted gas was zero and estimation failed.
        assert_eq!(swap_tx.gas(), Some(&U256::from(500_000)));
        assert_eq!(swap_tx.gas_price(), Some(U256::from(2_000_000_000u64)));
    }

    #[tokio::test]
    async fn test_swap_waits_for_pending_approval() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let sent = Arc::new(Mutex::new(Vec::new()));

        let mut quote = MockQuoteService::new();
        quote.expect_allowance().returning(|_, _, _| Ok(U256::zero()));
        quote
            .expect_approve_transaction()
            .times(1)
            .returning(|_, _, _| Ok(approval_payload()));
        let l = log.clone();
        quote.expect_swap_transaction().times(1).returning(move |_, _| {
            l.lock().unwrap().push("swap_build");
            Ok(swap_payload(181_262))
        });

        let node = recording_node(10, log.clone(), sent.clone(), 2);
        let outcome = coordinator(quote, node, test_config(true))
            .perform_swap(USDC, WETH, ONE_ETHER, 1.0)
            .await
            .unwrap();

        assert!(outcome.success, "{}", outcome.message);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["send", "receipt", "receipt", "receipt", "swap_build", "send"]
        );
    }

    #[tokio::test]
    async fn test_overflowing_swap_fees_fail_the_build() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let sent = Arc::new(Mutex::new(Vec::new()));

        let mut quote = MockQuoteService::new();
        quote.expect_allowance().returning(|_, _, _| Ok(U256::MAX));
        quote.expect_swap_transaction().returning(|_, _| {
            let mut quote = swap_payload(0);
            quote.tx.gas_price = Some(U256::MAX / 1000);
            Ok(quote)
        });

        let node = recording_node(1, log.clone(), sent.clone(), 0);
        let outcome = coordinator(quote, node, test_config(true))
            .perform_swap(USDC, WETH, ONE_ETHER, 1.0)
            .await
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Failed to build swap transaction: Malformed payload"));
        assert!(outcome.tx_hash.is_none());
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sufficient_allowance_skips_approval() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let sent = Arc::new(Mutex::new(Vec::new()));

        let mut quote = MockQuoteService::new();
        quote
            .expect_allowance()
            .returning(|_, _, _| Ok(U256::from_dec_str(ONE_ETHER).unwrap()));
        quote.expect_approve_transaction().never();
        quote
            .expect_swap_transaction()
            .times(1)
            .returning(|_, _| Ok(swap_payload(181_262)));

        let node = recording_node(1, log.clone(), sent.clone(), 0);
        let outcome = coordinator(quote, node, test_config(true))
            .perform_swap(USDC, WETH, ONE_ETHER, 0.5)
            .await
            .unwrap();

        assert!(outcome.success);
        assert!(outcome.approval_tx_hash.is_none());
        assert_eq!(*log.lock().unwrap(), vec!["send"]);

        let sent = sent.lock().unwrap();
        let (swap_tx, _) = TypedTransaction::decode_signed(&Rlp::new(&sent[0])).unwrap();
        assert_eq!(swap_tx.gas(), Some(&U256::from(181_262)));
    }

    #[tokio::test]
    async fn test_auto_approve_disabled_fails_without_broadcast() {
        let mut quote = MockQuoteService::new();
        quote.expect_allowance().returning(|_, _, _| Ok(U256::from(5)));
        quote.expect_approve_transaction().never();
        quote.expect_swap_transaction().never();

        let mut node = MockChainNode::new();
        node.expect_chain_id().return_const(10u64);
        node.expect_send_raw_transaction().never();

        let outcome = coordinator(quote, node, test_config(false))
            .perform_swap(USDC, WETH, "6", 1.0)
            .await
            .unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.message, "Insufficient allowance and auto-approve is disabled");
        assert!(outcome.tx_hash.is_none());
        assert!(outcome.approval_tx_hash.is_none());
    }

    #[tokio::test]
    async fn test_allowance_failure_assumes_zero() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let sent = Arc::new(Mutex::new(Vec::new()));

        let mut quote = MockQuoteService::new();
        quote.expect_allowance().returning(|_, _, _| {
            Err(SwapError::QuoteService {
                endpoint: "/approve/allowance".to_string(),
                message: "connection reset".to_string(),
            })
        });
        quote
            .expect_approve_transaction()
            .times(1)
            .returning(|_, _, _| Ok(approval_payload()));
        quote
            .expect_swap_transaction()
            .returning(|_, _| Ok(swap_payload(200_000)));

        let node = recording_node(8453, log, sent.clone(), 0);
        let outcome = coordinator(quote, node, test_config(true))
            .perform_swap(USDC, WETH, "1", 1.0)
            .await
            .unwrap();

        assert!(outcome.success);
        assert!(outcome.approval_tx_hash.is_some());
        assert_eq!(sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_allowance_failure_abort_policy() {
        let mut quote = MockQuoteService::new();
        quote.expect_allowance().returning(|_, _, _| {
            Err(SwapError::RateLimited {
                endpoint: "/approve/allowance".to_string(),
            })
        });
        quote.expect_approve_transaction().never();

        let mut node = MockChainNode::new();
        node.expect_chain_id().return_const(1u64);
        node.expect_send_raw_transaction().never();

        let config = SwapConfig {
            allowance_failure_policy: AllowanceFailurePolicy::Abort,
            ..test_config(true)
        };
        let outcome = coordinator(quote, node, config)
            .perform_swap(USDC, WETH, ONE_ETHER, 1.0)
            .await
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Failed to check allowance"));
    }

    #[tokio::test]
    async fn test_swap_failure_keeps_approval_hash() {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let sent = Arc::new(Mutex::new(Vec::new()));

        let mut quote = MockQuoteService::new();
        quote.expect_allowance().returning(|_, _, _| Ok(U256::zero()));
        quote
            .expect_approve_transaction()
            .returning(|_, _, _| Ok(approval_payload()));
        quote.expect_swap_transaction().returning(|_, _| {
            Err(SwapError::QuoteService {
                endpoint: "/swap".to_string(),
                message: "400 Bad Request: insufficient liquidity".to_string(),
            })
        });

        let node = recording_node(1, log, sent.clone(), 0);
        let outcome = coordinator(quote, node, test_config(true))
            .perform_swap(USDC, WETH, ONE_ETHER, 1.0)
            .await
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Failed to build swap transaction"));
        assert!(outcome.approval_tx_hash.is_some());
        assert!(outcome.tx_hash.is_none());
        assert_eq!(sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reverted_approval_stops_before_swap() {
        let mut quote = MockQuoteService::new();
        quote.expect_allowance().returning(|_, _, _| Ok(U256::zero()));
        quote
            .expect_approve_transaction()
            .returning(|_, _, _| Ok(approval_payload()));
        quote.expect_swap_transaction().never();

        let mut node = MockChainNode::new();
        node.expect_chain_id().return_const(1u64);
        node.expect_transaction_count().returning(|_| Ok(U256::zero()));
        node.expect_estimate_gas().returning(|_| Ok(U256::from(46_000)));
        node.expect_send_raw_transaction()
            .times(1)
            .returning(|_| Ok(H256::repeat_byte(0xaa)));
        node.expect_transaction_receipt().returning(|_| {
            Ok(Some(TransactionReceipt {
                status: Some(U64::zero()),
                ..Default::default()
            }))
        });

        let outcome = coordinator(quote, node, test_config(true))
            .perform_swap(USDC, WETH, ONE_ETHER, 1.0)
            .await
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Approval transaction was not confirmed"));
        let approval_hash = outcome.approval_tx_hash.unwrap();
        assert!(approval_hash.starts_with("0x"));
        assert_eq!(approval_hash.len(), 66);
    }

    #[tokio::test]
    async fn test_broadcast_failure_is_reported() {
        let mut quote = MockQuoteService::new();
        quote.expect_allowance().returning(|_, _, _| Ok(U256::MAX));
        quote
            .expect_swap_transaction()
            .returning(|_, _| Ok(swap_payload(150_000)));

        let mut node = MockChainNode::new();
        node.expect_chain_id().return_const(1u64);
        node.expect_transaction_count().returning(|_| Ok(U256::from(12)));
        node.expect_send_raw_transaction()
            .times(1)
            .returning(|_| Err(SwapError::InsufficientFunds { chain_id: 1 }));

        let outcome = coordinator(quote, node, test_config(true))
            .perform_swap(USDC, WETH, ONE_ETHER, 1.0)
            .await
            .unwrap();

        assert!(!outcome.success);
        assert!(outcome.message.starts_with("Failed to send swap transaction"));
        assert!(outcome.tx_hash.is_none());
    }

    #[test]
    fn test_wallet_must_match_key() {
        let mut node = MockChainNode::new();
        node.expect_chain_id().return_const(1u64);

        let result = SwapCoordinator::new(
            "0x0000000000000000000000000000000000000001",
            TransactionSigner::from_private_key(DEV_KEY).unwrap(),
            Arc::new(MockQuoteService::new()),
            Arc::new(node),
            SwapConfig::default(),
        );
        assert!(matches!(result, Err(SwapError::Wallet(_))));
    }

    #[tokio::test]
    async fn test_invalid_inputs_are_errors() {
        let mut quote = MockQuoteService::new();
        quote.expect_allowance().never();
        let mut node = MockChainNode::new();
        node.expect_chain_id().return_const(1u64);

        let coordinator = coordinator(quote, node, test_config(true));
        assert!(matches!(
            coordinator.perform_swap("0x1234", WETH, ONE_ETHER, 1.0).await,
            Err(SwapError::InvalidAddress(_))
        ));
        assert!(matches!(
            coordinator.perform_swap(USDC, WETH, "1.5", 1.0).await,
            Err(SwapError::InvalidAmount(_))
        ));
        assert!(matches!(
            coordinator.perform_swap(USDC, WETH, ONE_ETHER, 75.0).await,
            Err(SwapError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_amount_beyond_u64() {
        let amount = parse_amount("340282366920938463463374607431768211456").unwrap();
        assert_eq!(amount, U256::from(2).pow(U256::from(128)));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-5").is_err());
        assert!(parse_amount("0x10").is_err());
    }
}
