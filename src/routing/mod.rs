use rust_decimal::Decimal;

use crate::errors::PriceError;
use crate::pools::Pair;
use crate::tokens::Token;

/// Pools walked in order from `input`; `path` holds every token visited.
#[derive(Debug, Clone)]
pub struct Route {
    pub pairs: Vec<Pair>,
    pub path: Vec<Token>,
    pub input: Token,
    pub output: Token,
}

impl Route {
    pub fn new(pairs: Vec<Pair>, input: Token) -> Result<Self, PriceError> {
        if pairs.is_empty() {
            return Err(PriceError::InvalidRoute("route has no pairs".to_string()));
        }

        let mut path = Vec::with_capacity(pairs.len() + 1);
        path.push(input.clone());

        for pair in &pairs {
            let current = &path[path.len() - 1];
            if !pair.involves(current) {
                return Err(PriceError::InvalidRoute(format!(
                    "pair {:?} does not continue from {}",
                    pair.address, current.symbol
                )));
            }
            let next = pair.other(current)?.clone();
            path.push(next);
        }

        let output = path[path.len() - 1].clone();
        Ok(Self {
            pairs,
            path,
            input,
            output,
        })
    }

    /// Output units received per input unit at current reserves, ignoring fees and impact.
    pub fn mid_price(&self) -> Result<Decimal, PriceError> {
        let mut price = Decimal::ONE;
        for (pair, hop) in self.pairs.iter().zip(self.path.windows(2)) {
            let hop_price = reserves_to_price(pair, &hop[0], &hop[1])?;
            price = price
                .checked_mul(hop_price)
                .ok_or(PriceError::InvalidDecimal("mid price overflow".to_string()))?;
        }
        Ok(price)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn reserves_to_price(
    pair: &Pair,
    token_in: &Token,
    token_out: &Token,
) -> Result<Decimal, PriceError> {
    let reserve_in = pair.reserve_of(token_in)?;
    let reserve_out = pair.reserve_of(token_out)?;

    if reserve_in.is_zero() || reserve_out.is_zero() {
        return Err(PriceError::InsufficientReserves(pair.address));
    }

    reserve_out
        .checked_div(reserve_in)
        .ok_or(PriceError::DivisionByZero("hop price"))
}

/// Inverse of a price, e.g. stable-per-token from token-per-stable.
pub fn invert(price: Decimal) -> Result<Decimal, PriceError> {
    Decimal::ONE
        .checked_div(price)
        .ok_or(PriceError::DivisionByZero("inverted price"))
}
