use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ethers::types::{Address, U256};
use polyprices::{
    pools::Pair,
    registry::SourceRegistry,
    routing::{invert, Route},
    utils::to_significant,
    Token,
};
use rust_decimal::Decimal;
use std::str::FromStr;

fn iris() -> Token {
    Token::parse("0xdaB35042e63E93Cc8556c9bAE482E5415B5Ac4B1", 18, "IRIS").unwrap()
}

fn two_hop_route() -> Route {
    let usdc = Token::usdc();
    let wmatic = Token::wmatic();
    let native_to_stable = Pair::new(
        Address::repeat_byte(1),
        wmatic.clone(),
        usdc.clone(),
        U256::exp10(24),
        U256::exp10(12),
    )
    .unwrap();
    let token_to_native = Pair::new(
        Address::repeat_byte(2),
        iris(),
        wmatic,
        U256::exp10(21) * U256::from(3u64),
        U256::exp10(20) * U256::from(7u64),
    )
    .unwrap();
    Route::new(vec![native_to_stable, token_to_native], usdc).unwrap()
}

fn benchmark_route_price(c: &mut Criterion) {
    let route = two_hop_route();
    c.bench_function("route_mid_price", |b| {
        b.iter(|| {
            let price = black_box(&route).mid_price().unwrap();
            to_significant(invert(price).unwrap(), 6)
        })
    });
}

fn benchmark_significant_digits(c: &mut Criterion) {
    let value = Decimal::from_str("0.000123456789012345").unwrap();
    c.bench_function("to_significant", |b| b.iter(|| to_significant(black_box(value), 6)));
}

fn benchmark_registry_lookup(c: &mut Criterion) {
    let registry = SourceRegistry::polygon().unwrap();
    c.bench_function("registry_resolve", |b| {
        b.iter(|| registry.resolve(black_box("0xdab35042e63e93cc8556c9bae482e5415b5ac4b1")))
    });
}

criterion_group!(
    benches,
    benchmark_route_price,
    benchmark_significant_digits,
    benchmark_registry_lookup
);
criterion_main!(benches);
