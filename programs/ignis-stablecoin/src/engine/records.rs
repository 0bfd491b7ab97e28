use anchor_lang::prelude::*;

use crate::engine::store::{AssetAccountStore, Holder};
use crate::error::IgnisError;
use crate::state::{Asset, AssetRefs};

/// Outstanding supply of one asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MintLedger {
    pub total_supply: u64,
}

impl MintLedger {
    pub fn observe<S: AssetAccountStore>(store: &S, asset: Asset) -> Self {
        Self {
            total_supply: store.supply(asset),
        }
    }

    pub fn increased(self, amount: u64) -> Result<Self> {
        let total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(IgnisError::Overflow)?;
        Ok(Self { total_supply })
    }

    /// Holder balances are checked before this, so running out of supply
    /// means supply and balances have already diverged.
    pub fn decreased(self, amount: u64) -> Result<Self> {
        let total_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(IgnisError::InvariantViolation)?;
        Ok(Self { total_supply })
    }
}

/// Custody view of one asset.
///
/// Not stored anywhere: `custodial_balance` is the store's balance for
/// [`Holder::Custody`], re-read for every operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReserveRecord {
    pub custodial_balance: u64,
    pub reserve_wallet: Pubkey,
}

impl ReserveRecord {
    pub fn observe<S: AssetAccountStore>(store: &S, refs: &AssetRefs) -> Self {
        Self {
            custodial_balance: store.balance(refs.asset, &Holder::Custody),
            reserve_wallet: refs.reserve_wallet,
        }
    }

    pub fn check_against(&self, ledger: &MintLedger) -> Result<()> {
        require!(
            self.custodial_balance <= ledger.total_supply,
            IgnisError::InvariantViolation
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supply_increase_overflows_at_u64_max() {
        let ledger = MintLedger {
            total_supply: u64::MAX - 1,
        };
        assert_eq!(ledger.increased(1).unwrap().total_supply, u64::MAX);
        assert_eq!(
            ledger.increased(2).unwrap_err(),
            IgnisError::Overflow.into()
        );
    }

    #[test]
    fn supply_cannot_go_negative() {
        let ledger = MintLedger { total_supply: 3 };
        assert_eq!(ledger.decreased(3).unwrap(), MintLedger::default());
        assert_eq!(
            ledger.decreased(4).unwrap_err(),
            IgnisError::InvariantViolation.into()
        );
    }

    #[test]
    fn custody_above_supply_is_flagged() {
        let reserve = ReserveRecord {
            custodial_balance: 5,
            reserve_wallet: Pubkey::new_unique(),
        };
        assert!(reserve.check_against(&MintLedger { total_supply: 5 }).is_ok());
        assert_eq!(
            reserve
                .check_against(&MintLedger { total_supply: 4 })
                .unwrap_err(),
            IgnisError::InvariantViolation.into()
        );
    }
}
