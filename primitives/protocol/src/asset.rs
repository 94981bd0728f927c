// Copyright 2019-2023 Agora Project Authors. Licensed under GPL-3.0.

//! Exact-integer money: the three consensus assets and price conversion.

use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

use sp_runtime::RuntimeDebug;

/// The raw amount of an asset, in its smallest unit.
pub type Amount = i64;

/// The three assets known to consensus.
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo,
    MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum AssetSymbol {
    /// The core coin.
    Steem,
    /// The stable-value token.
    Sbd,
    /// Vested shares of the core coin.
    Vests,
}

impl AssetSymbol {
    /// Decimal places of the asset's smallest unit.
    pub fn precision(self) -> u8 {
        match self {
            Self::Steem | Self::Sbd => 3,
            Self::Vests => 6,
        }
    }
}

/// A typed amount of one asset.
///
/// Arithmetic is exact: all intermediate products widen to 128 bits and
/// division truncates toward zero.
#[derive(
    PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo,
    MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct Asset {
    /// Amount in the smallest unit of `symbol`.
    pub amount: Amount,
    /// The asset this amount is denominated in.
    pub symbol: AssetSymbol,
}

impl Asset {
    /// A new asset value.
    pub fn new(amount: Amount, symbol: AssetSymbol) -> Self {
        Self { amount, symbol }
    }

    /// Zero of the given asset.
    pub fn zero(symbol: AssetSymbol) -> Self {
        Self { amount: 0, symbol }
    }

    /// Zero of the core coin.
    pub fn steem(amount: Amount) -> Self {
        Self::new(amount, AssetSymbol::Steem)
    }

    /// An SBD amount.
    pub fn sbd(amount: Amount) -> Self {
        Self::new(amount, AssetSymbol::Sbd)
    }

    /// A VESTS amount.
    pub fn vests(amount: Amount) -> Self {
        Self::new(amount, AssetSymbol::Vests)
    }

    /// True iff the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Same-symbol checked addition.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if self.symbol != other.symbol {
            return None;
        }
        self.amount.checked_add(other.amount).map(|amount| Self { amount, ..*self })
    }

    /// Same-symbol checked subtraction.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if self.symbol != other.symbol {
            return None;
        }
        self.amount.checked_sub(other.amount).map(|amount| Self { amount, ..*self })
    }

    /// `amount * numerator / denominator` with 128-bit intermediates.
    ///
    /// Multiplication always precedes division; the quotient truncates.
    pub fn mul_div(&self, numerator: i64, denominator: i64) -> Option<Self> {
        if denominator == 0 {
            return None;
        }
        let wide = (self.amount as i128)
            .checked_mul(numerator as i128)?
            .checked_div(denominator as i128)?;
        i64::try_from(wide).ok().map(|amount| Self { amount, ..*self })
    }

    /// Converts through a price, yielding the opposite side of the pair.
    ///
    /// Returns `None` when the symbol matches neither side or the price is
    /// degenerate.
    pub fn convert(&self, price: &Price) -> Option<Self> {
        if self.symbol == price.base.symbol && price.base.amount != 0 {
            let wide = (self.amount as i128)
                .checked_mul(price.quote.amount as i128)?
                .checked_div(price.base.amount as i128)?;
            i64::try_from(wide).ok().map(|amount| Self::new(amount, price.quote.symbol))
        } else if self.symbol == price.quote.symbol && price.quote.amount != 0 {
            let wide = (self.amount as i128)
                .checked_mul(price.base.amount as i128)?
                .checked_div(price.quote.amount as i128)?;
            i64::try_from(wide).ok().map(|amount| Self::new(amount, price.base.symbol))
        } else {
            None
        }
    }
}

/// The exchange rate between two assets.
#[derive(PartialEq, Eq, Clone, Copy, Encode, Decode, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "std", serde(rename_all = "camelCase"))]
pub struct Price {
    /// The asset being priced.
    pub base: Asset,
    /// What one `base` is worth.
    pub quote: Asset,
}

impl Price {
    /// A new price; the two sides must be distinct symbols.
    pub fn new(base: Asset, quote: Asset) -> Option<Self> {
        if base.symbol == quote.symbol || base.amount <= 0 || quote.amount <= 0 {
            return None;
        }
        Some(Self { base, quote })
    }
}
