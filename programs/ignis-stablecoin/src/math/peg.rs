use anchor_lang::prelude::*;

use crate::constants::PEG_ONE;
use crate::error::IgnisError;
use crate::state::Asset;

/// `value * numerator / denominator`, truncated toward zero.
///
/// Both conversion directions go through here so the truncation bias is the
/// same either way: the result never exceeds the exact quotient.
pub fn mul_div_floor(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    require!(denominator > 0, IgnisError::InvalidPeg);

    let scaled = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or(IgnisError::Overflow)?
        .checked_div(denominator as u128)
        .ok_or(IgnisError::Overflow)?;

    u64::try_from(scaled).map_err(|_| error!(IgnisError::Overflow))
}

/// Ignis base units -> Ventura base units at `peg`
pub fn ignis_to_ventura(amount: u64, peg: u64) -> Result<u64> {
    mul_div_floor(amount, peg, PEG_ONE)
}

/// Ventura base units -> Ignis base units at `peg`
pub fn ventura_to_ignis(amount: u64, peg: u64) -> Result<u64> {
    require!(peg > 0, IgnisError::InvalidPeg);
    mul_div_floor(amount, PEG_ONE, peg)
}

/// Amount of `source.counter()` paid out for `amount` of `source`.
/// May be zero; callers decide whether that is acceptable.
pub fn convert(source: Asset, amount: u64, peg: u64) -> Result<u64> {
    match source {
        Asset::Ignis => ignis_to_ventura(amount, peg),
        Asset::Ventura => ventura_to_ignis(amount, peg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_peg_is_identity_both_ways() {
        for amount in [1, 2, 999_999, 1_000_000, u64::MAX] {
            assert_eq!(ignis_to_ventura(amount, PEG_ONE).unwrap(), amount);
            assert_eq!(ventura_to_ignis(amount, PEG_ONE).unwrap(), amount);
        }
    }

    #[test]
    fn truncates_toward_zero() {
        // 1.5 peg
        let peg = 1_500_000;
        assert_eq!(ignis_to_ventura(3, peg).unwrap(), 4);
        assert_eq!(ventura_to_ignis(4, peg).unwrap(), 2);
        assert_eq!(ventura_to_ignis(1, peg).unwrap(), 0);

        // 0.5 peg
        let peg = 500_000;
        assert_eq!(ignis_to_ventura(1, peg).unwrap(), 0);
        assert_eq!(ignis_to_ventura(3, peg).unwrap(), 1);
        assert_eq!(ventura_to_ignis(3, peg).unwrap(), 6);
    }

    #[test]
    fn round_trip_never_gains_value() {
        for peg in [1, 333_333, 500_000, PEG_ONE, 1_234_567, 7 * PEG_ONE] {
            for amount in [1u64, 7, 1_000, 123_456_789] {
                let out = ignis_to_ventura(amount, peg).unwrap();
                let back = ventura_to_ignis(out, peg).unwrap();
                assert!(back <= amount, "peg {peg} amount {amount}: {back} > {amount}");
            }
        }
    }

    #[test]
    fn result_past_u64_is_overflow() {
        let err = ignis_to_ventura(u64::MAX, 2 * PEG_ONE).unwrap_err();
        assert_eq!(err, IgnisError::Overflow.into());
    }

    #[test]
    fn zero_peg_is_rejected() {
        assert_eq!(
            ventura_to_ignis(10, 0).unwrap_err(),
            IgnisError::InvalidPeg.into()
        );
        assert_eq!(mul_div_floor(10, 1, 0).unwrap_err(), IgnisError::InvalidPeg.into());
    }

    #[test]
    fn convert_dispatches_on_source() {
        let peg = 2 * PEG_ONE;
        assert_eq!(convert(Asset::Ignis, 5, peg).unwrap(), 10);
        assert_eq!(convert(Asset::Ventura, 5, peg).unwrap(), 2);
    }
}
