use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::catalog::Candle;
use super::errors::DomainError;

/// Currencies the storefront sells in. Amounts are whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Huf,
    Eur,
    Czk,
}

/// Per-currency shipping configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingRates {
    pub free_threshold: i64,
    pub home_delivery: i64,
    pub pickup_point: i64,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::Huf => "huf",
            Currency::Eur => "eur",
            Currency::Czk => "czk",
        }
    }

    pub fn shipping_rates(self) -> ShippingRates {
        match self {
            Currency::Huf => ShippingRates {
                free_threshold: 15000,
                home_delivery: 2100,
                pickup_point: 1400,
            },
            Currency::Eur => ShippingRates {
                free_threshold: 40,
                home_delivery: 6,
                pickup_point: 4,
            },
            Currency::Czk => ShippingRates {
                free_threshold: 1000,
                home_delivery: 149,
                pickup_point: 89,
            },
        }
    }

    /// Catalog price of `candle` in this currency, rounded half away from zero.
    pub fn unit_price(self, candle: &Candle) -> i64 {
        let raw = match self {
            Currency::Huf => candle.price_huf,
            Currency::Eur => candle.price_eur,
            Currency::Czk => candle.price_czk,
        };
        raw.round() as i64
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huf" => Ok(Currency::Huf),
            "eur" => Ok(Currency::Eur),
            "czk" => Ok(Currency::Czk),
            _ => Err(DomainError::UnsupportedCurrency(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentMode {
    HomeDelivery,
    PickupPoint,
}

impl ShippingRates {
    /// Flat fee for `mode` when `payable` is below the free-shipping threshold.
    pub fn fee_for(&self, payable: i64, mode: FulfillmentMode) -> i64 {
        if payable >= self.free_threshold {
            return 0;
        }
        match mode {
            FulfillmentMode::HomeDelivery => self.home_delivery,
            FulfillmentMode::PickupPoint => self.pickup_point,
        }
    }
}

/// One cart line as the client submitted it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub candle_id: Uuid,
    pub claimed_unit_price: i64,
    pub quantity: i32,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    pub currency: Currency,
    pub subtotal: i64,
    pub discount: i64,
    /// Present only when a promotion was applied.
    pub discounted: Option<i64>,
    pub shipping: i64,
    pub discount_percentage: Option<i32>,
}

impl PricedCart {
    /// Items total after the promotion, before shipping.
    pub fn payable(&self) -> i64 {
        self.discounted.unwrap_or(self.subtotal)
    }

    pub fn grand_total(&self) -> i64 {
        self.payable() + self.shipping
    }
}

/// Validates every line against the catalog and totals the cart.
///
/// `lookup` returns the catalog entry for a candle id, or `None` when the id
/// is unknown. The first failing line rejects the whole cart.
pub fn price_cart<'a, F>(
    currency: Currency,
    lines: &[CartLine],
    lookup: F,
    discount_percentage: Option<i32>,
    mode: FulfillmentMode,
) -> Result<PricedCart, DomainError>
where
    F: Fn(Uuid) -> Option<&'a Candle>,
{
    let mut subtotal: i64 = 0;
    for line in lines {
        let candle = lookup(line.candle_id).ok_or(DomainError::InvalidCandle(line.candle_id))?;
        let expected = currency.unit_price(candle);
        if expected != line.claimed_unit_price {
            return Err(DomainError::PriceMismatch {
                candle_id: line.candle_id,
                expected,
                claimed: line.claimed_unit_price,
            });
        }
        subtotal += expected * i64::from(line.quantity);
    }

    let (discount, discounted) = match discount_percentage {
        Some(pct) => {
            let discount = subtotal * i64::from(pct) / 100;
            (discount, Some(subtotal - discount))
        }
        None => (0, None),
    };

    let payable = discounted.unwrap_or(subtotal);
    let shipping = currency.shipping_rates().fee_for(payable, mode);

    Ok(PricedCart {
        currency,
        subtotal,
        discount,
        discounted,
        shipping,
        discount_percentage,
    })
}
