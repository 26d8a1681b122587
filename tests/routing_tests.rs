use anyhow::Result;
use ethers::types::{Address, U256};
use polyprices::{
    pools::Pair,
    routing::{invert, Route},
    PriceError, Token,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use test_log::test;

mod common;
use common::*;

fn pair(a: &Token, b: &Token, amount_a: u64, amount_b: u64) -> Pair {
    let reserve_a = whole(amount_a, a.decimals);
    let reserve_b = whole(amount_b, b.decimals);
    Pair::new(Address::repeat_byte(0x42), a.clone(), b.clone(), reserve_a, reserve_b).unwrap()
}

#[test]
fn test_two_hop_route_price() -> Result<()> {
    let usdc = Token::usdc();
    let wmatic = Token::wmatic();
    let route = Route::new(
        vec![pair(&wmatic, &usdc, 2000, 1000), pair(&weth(), &wmatic, 1, 1500)],
        usdc.clone(),
    )?;

    assert_eq!(route.len(), 2);
    assert_eq!(route.path, vec![usdc, wmatic, weth()]);
    assert_eq!(route.output, weth());

    // 2 WMATIC per USDC, 1/1500 WETH per WMATIC
    let mid = route.mid_price()?;
    assert_eq!(invert(mid)?.round_dp(6), Decimal::from(750));
    Ok(())
}

#[test]
fn test_reserves_account_for_decimals() -> Result<()> {
    // 6 decimals against 18 decimals must still price at human units
    let route = Route::new(vec![pair(&Token::wmatic(), &Token::usdc(), 10, 8)], Token::usdc())?;
    assert_eq!(invert(route.mid_price()?)?, Decimal::from_str("0.8")?);
    Ok(())
}

#[test]
fn test_disconnected_route_is_rejected() {
    let err = Route::new(vec![pair(&iris(), &weth(), 1, 1)], Token::usdc()).unwrap_err();
    assert!(matches!(err, PriceError::InvalidRoute(_)));
}

#[test]
fn test_drained_pool_has_no_price() -> Result<()> {
    let route = Route::new(vec![pair(&Token::wmatic(), &Token::usdc(), 0, 100)], Token::usdc())?;
    assert!(matches!(route.mid_price(), Err(PriceError::InsufficientReserves(_))));
    assert!(matches!(invert(Decimal::ZERO), Err(PriceError::DivisionByZero(_))));
    Ok(())
}

#[test]
fn test_pair_of_token_with_itself() {
    let err = Pair::new(Address::zero(), weth(), weth(), U256::one(), U256::one()).unwrap_err();
    assert!(err.is_identical_endpoints());
}
