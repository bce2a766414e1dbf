use arbitrary::Arbitrary;
use clmm_engine::constants::{MAX_SQRT_PRICE, MAX_TICK, MIN_SQRT_PRICE, MIN_TICK};
use clmm_engine::math::tick_math::{get_sqrt_price_at_tick, get_tick_at_sqrt_price};
use honggfuzz::fuzz;
use primitive_types::U256;

#[derive(Debug, Clone, Arbitrary)]
enum TickPriceInput {
    Tick(i32),
    SqrtPrice([u64; 3]),
}

fn fuzz_tick_price(input: TickPriceInput) {
    match input {
        TickPriceInput::Tick(tick) => match get_sqrt_price_at_tick(tick) {
            Ok(sqrt_price) => {
                assert!((MIN_TICK..=MAX_TICK).contains(&tick));
                assert!(sqrt_price >= MIN_SQRT_PRICE && sqrt_price <= MAX_SQRT_PRICE);
                if tick < MAX_TICK {
                    assert_eq!(get_tick_at_sqrt_price(sqrt_price).unwrap(), tick);
                    assert!(get_sqrt_price_at_tick(tick + 1).unwrap() > sqrt_price);
                }
            }
            Err(_) => assert!(!(MIN_TICK..=MAX_TICK).contains(&tick)),
        },
        TickPriceInput::SqrtPrice(limbs) => {
            let sqrt_price = U256([limbs[0], limbs[1], limbs[2], 0]);
            match get_tick_at_sqrt_price(sqrt_price) {
                Ok(tick) => {
                    assert!(sqrt_price >= MIN_SQRT_PRICE && sqrt_price < MAX_SQRT_PRICE);
                    assert!(get_sqrt_price_at_tick(tick).unwrap() <= sqrt_price);
                    assert!(get_sqrt_price_at_tick(tick + 1).unwrap() > sqrt_price);
                }
                Err(_) => assert!(sqrt_price < MIN_SQRT_PRICE || sqrt_price >= MAX_SQRT_PRICE),
            }
        }
    }
}

fn main() {
    loop {
        fuzz!(|data: TickPriceInput| {
            fuzz_tick_price(data);
        });
    }
}
