//! Request, outcome and workflow stage types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inbound swap request
#[derive(Clone, Deserialize)]
pub struct SwapRequest {
    pub wallet_address: String,
    pub private_key: String,
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    pub src_token: String,
    pub dst_token: String,
    /// Smallest token units
    pub amount: String,
    /// Percent
    #[serde(default = "default_slippage")]
    pub slippage: f64,
}

fn default_chain_id() -> u64 {
    1
}

fn default_slippage() -> f64 {
    1.0
}

impl fmt::Debug for SwapRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapRequest")
            .field("wallet_address", &self.wallet_address)
            .field("private_key", &"<redacted>")
            .field("chain_id", &self.chain_id)
            .field("src_token", &self.src_token)
            .field("dst_token", &self.dst_token)
            .field("amount", &self.amount)
            .field("slippage", &self.slippage)
            .finish()
    }
}

/// Terminal result of a swap request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwapOutcome {
    pub success: bool,
    pub message: String,
    pub tx_hash: Option<String>,
    pub approval_tx_hash: Option<String>,
}

impl SwapOutcome {
    pub fn succeeded(mut self, tx_hash: String) -> Self {
        self.success = true;
        self.message = "Swap completed successfully".to_string();
        self.tx_hash = Some(tx_hash);
        self
    }

    pub fn failed(mut self, message: impl Into<String>) -> Self {
        self.success = false;
        self.message = message.into();
        self
    }
}

/// Steps of a single swap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStage {
    CheckAllowance,
    ApproveBuild,
    ApproveSignSend,
    ApproveConfirm,
    SwapBuild,
    SwapSignSend,
    Succeeded,
    Failed,
}

impl SwapStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SwapStage::Succeeded | SwapStage::Failed)
    }

    /// Outcome message prefix when this stage fails
    pub fn failure_message(&self) -> &'static str {
        match self {
            SwapStage::CheckAllowance => "Failed to check allowance",
            SwapStage::ApproveBuild => "Failed to build approval transaction",
            SwapStage::ApproveSignSend => "Failed to send approval transaction",
            SwapStage::ApproveConfirm => "Approval transaction was not confirmed",
            SwapStage::SwapBuild => "Failed to build swap transaction",
            SwapStage::SwapSignSend => "Failed to send swap transaction",
            SwapStage::Succeeded | SwapStage::Failed => "Swap failed",
        }
    }
}

impl fmt::Display for SwapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SwapStage::CheckAllowance => "CHECK_ALLOWANCE",
            SwapStage::ApproveBuild => "APPROVE_BUILD",
            SwapStage::ApproveSignSend => "APPROVE_SIGN_SEND",
            SwapStage::ApproveConfirm => "APPROVE_CONFIRM",
            SwapStage::SwapBuild => "SWAP_BUILD",
            SwapStage::SwapSignSend => "SWAP_SIGN_SEND",
            SwapStage::Succeeded => "SUCCEEDED",
            SwapStage::Failed => "FAILED",
        };
        f.write_str(name)
    }
}
