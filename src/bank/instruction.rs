//! Instruction records decoded from the batch input.
use serde::Deserialize;

use crate::bank::types::Money;

/// Enum representing the kind of instruction.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "lowercase")]
pub enum InstructionType {
    Open,
    Deposit,
    Withdraw,
    Transfer,
}

/// Represents one instruction from the batch input.
///
/// Records carry the columns `type,owner,to,amount`; `to` is only
/// meaningful for transfers, and a missing `amount` on `open` opens the
/// account at zero.
#[derive(Deserialize, Debug, Clone)]
pub struct Instruction {
    /// The kind of instruction.
    #[serde(rename = "type")]
    kind: InstructionType,

    /// Owner name of the account the instruction operates on.
    owner: String,

    /// Owner name of the destination account, for transfers.
    to: Option<String>,

    /// The amount involved, if applicable.
    amount: Option<Money>,
}

impl Instruction {
    /// Gets the kind of the instruction.
    pub fn get_kind(&self) -> &InstructionType {
        &self.kind
    }

    /// Gets the owner name the instruction targets.
    pub fn get_owner(&self) -> &str {
        &self.owner
    }

    /// Gets the destination owner name, if present.
    pub fn get_to(&self) -> Option<&str> {
        self.to.as_deref()
    }

    /// Gets the amount, if present.
    pub fn get_amount(&self) -> Option<Money> {
        self.amount
    }

    #[cfg(test)]
    pub fn new(
        kind: InstructionType,
        owner: &str,
        to: Option<&str>,
        amount: Option<Money>,
    ) -> Self {
        Instruction {
            kind,
            owner: owner.to_string(),
            to: to.map(str::to_string),
            amount,
        }
    }
}
