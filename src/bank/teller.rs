//! The `Teller` applies a stream of instructions to a bank.
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::warn;

use crate::bank::{Account, Bank, BankError, Instruction, InstructionType, Money};

/// Processes instructions received over a channel against one bank.
pub struct Teller {
    /// The bank whose accounts the instructions operate on.
    bank: Arc<Bank>,

    /// A channel receiver for incoming instructions.
    receiver: mpsc::Receiver<Instruction>,
}

impl Teller {
    /// Creates a teller for the given bank.
    pub fn new(bank: Arc<Bank>, receiver: mpsc::Receiver<Instruction>) -> Self {
        Teller { bank, receiver }
    }

    /// Gets the bank this teller operates on.
    pub fn get_bank(&self) -> &Arc<Bank> {
        &self.bank
    }

    /// Resolves an owner name to the first matching account in insertion
    /// order. Owner names are display names, not keys, so the first match
    /// wins.
    fn find_account(&self, owner: &str) -> Result<Account, BankError> {
        self.bank
            .get_accounts()
            .into_iter()
            .find(|account| account.get_owner() == owner)
            .ok_or_else(|| BankError::UnknownAccount(owner.to_string()))
    }

    /// Applies a single instruction to the bank.
    fn apply(&self, instruction: &Instruction) -> Result<(), BankError> {
        match instruction.get_kind() {
            InstructionType::Open => {
                let opening_balance = instruction.get_amount().unwrap_or(Money::ZERO);
                self.bank
                    .add_account(Account::new(instruction.get_owner(), opening_balance));
                Ok(())
            }
            InstructionType::Deposit => {
                let amount = instruction
                    .get_amount()
                    .ok_or(BankError::InvalidInstruction)?;
                self.find_account(instruction.get_owner())?.credit(amount);
                Ok(())
            }
            InstructionType::Withdraw => {
                let amount = instruction
                    .get_amount()
                    .ok_or(BankError::InvalidInstruction)?;
                self.find_account(instruction.get_owner())?.debit(amount)
            }
            InstructionType::Transfer => {
                let amount = instruction
                    .get_amount()
                    .ok_or(BankError::InvalidInstruction)?;
                let to = instruction.get_to().ok_or(BankError::InvalidInstruction)?;
                let source = self.find_account(instruction.get_owner())?;
                let destination = self.find_account(to)?;
                self.bank.transfer(&source, &destination, amount)
            }
        }
    }

    /// Runs the processing loop until the channel closes. A rejected
    /// instruction is logged and skipped, never aborting the run.
    pub async fn run(&mut self) {
        while let Some(instruction) = self.receiver.recv().await {
            if let Err(error) = self.apply(&instruction) {
                warn!(%error, ?instruction, "instruction rejected");
            }
        }
    }
}
