//! Shared synthetic coffee data for integration tests.

#![allow(dead_code, unreachable_pub)]

use crema::data::schema::PRICE;
use crema::data::{CoffeeAttributes, Record};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt::Write as _;
use std::path::Path;

pub const ORIGINS: [&str; 4] = ["Ethiopia", "Colombia", "Brazil", "Kenya"];
pub const ROASTS: [&str; 3] = ["Light", "Medium", "Dark"];
pub const FLAVORS: [&str; 3] = ["Fruity", "Nutty", "Chocolatey"];

/// Price rises with bean cost and competitor price, plus an origin premium.
pub fn coffee_rows(n: usize, seed: u64) -> Vec<CoffeeAttributes> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n)
        .map(|_| CoffeeAttributes {
            bean_origin: ORIGINS[rng.gen_range(0..ORIGINS.len())].to_string(),
            roast_level: ROASTS[rng.gen_range(0..ROASTS.len())].to_string(),
            flavor_profile: FLAVORS[rng.gen_range(0..FLAVORS.len())].to_string(),
            customer_rating: rng.gen_range(1.0..5.0),
            competitor_price: rng.gen_range(100.0..600.0),
            bean_cost: rng.gen_range(50.0..300.0),
            month: rng.gen_range(1..=12),
        })
        .collect()
}

pub fn price_of(attrs: &CoffeeAttributes) -> f64 {
    let premium = if attrs.bean_origin == "Ethiopia" { 40.0 } else { 0.0 };
    80.0 + 1.6 * attrs.bean_cost + 0.2 * attrs.competitor_price + premium
}

pub fn training_records(n: usize, seed: u64) -> Vec<Record> {
    coffee_rows(n, seed)
        .iter()
        .map(|a| a.to_record().with_numeric(PRICE, price_of(a)))
        .collect()
}

/// Write rows as a dataset CSV, optionally with the price column.
pub fn write_csv(path: &Path, rows: &[CoffeeAttributes], with_price: bool) {
    let mut out = String::from(
        "Bean_Origin,Roast_Level,Flavor_Profile,Customer_Rating,Competitor_Price_INR,Bean_Cost_INR,Month",
    );
    if with_price {
        out.push_str(",price");
    }
    out.push('\n');

    for a in rows {
        write!(
            out,
            "{},{},{},{},{},{},{}",
            a.bean_origin,
            a.roast_level,
            a.flavor_profile,
            a.customer_rating,
            a.competitor_price,
            a.bean_cost,
            a.month
        )
        .unwrap();
        if with_price {
            write!(out, ",{}", price_of(a)).unwrap();
        }
        out.push('\n');
    }

    std::fs::write(path, out).unwrap();
}
