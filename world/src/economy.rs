//! Money bookkeeping.

use path_defence_core::InsufficientFunds;

/// Non-negative money balance; the only place money is created or destroyed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Economy {
    balance: u32,
}

impl Economy {
    /// Creates an economy holding the provided balance.
    #[must_use]
    pub const fn new(balance: u32) -> Self {
        Self { balance }
    }

    /// Current balance.
    #[must_use]
    pub const fn balance(&self) -> u32 {
        self.balance
    }

    /// Reports whether `amount` can be spent.
    #[must_use]
    pub const fn can_afford(&self, amount: u32) -> bool {
        amount <= self.balance
    }

    /// Debits exactly `amount`, or nothing at all when the balance is short.
    pub fn spend(&mut self, amount: u32) -> Result<(), InsufficientFunds> {
        if !self.can_afford(amount) {
            return Err(InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(())
    }

    /// Adds `amount` to the balance.
    pub fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(amount);
    }
}
