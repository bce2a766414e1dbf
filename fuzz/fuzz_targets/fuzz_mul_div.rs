use arbitrary::Arbitrary;
use clmm_engine::errors::ErrorCode;
use clmm_engine::math::full_math::{mul_div, mul_div_rounding_up};
use honggfuzz::fuzz;
use primitive_types::{U256, U512};

#[derive(Debug, Clone, Arbitrary)]
struct MulDivInput {
    a: [u64; 4],
    b: [u64; 4],
    denominator: [u64; 4],
    round_up: bool,
}

fn fuzz_mul_div(input: MulDivInput) {
    let a = U256(input.a);
    let b = U256(input.b);
    let denominator = U256(input.denominator);

    let exact = if denominator.is_zero() {
        None
    } else {
        Some(a.full_mul(b) / U512::from(denominator))
    };

    let result = if input.round_up {
        mul_div_rounding_up(a, b, denominator)
    } else {
        mul_div(a, b, denominator)
    };

    match (result, exact) {
        (Ok(value), Some(quotient)) => {
            let remainder_zero = (a.full_mul(b) % U512::from(denominator)).is_zero();
            let expected = if input.round_up && !remainder_zero {
                quotient + U512::one()
            } else {
                quotient
            };
            assert_eq!(U512::from(value), expected);
        }
        (Ok(_), None) => panic!("division by zero succeeded"),
        (Err(error), exact) => {
            // Only a zero denominator or a result above 256 bits may fail
            assert_eq!(error, ErrorCode::Overflow.into());
            if let Some(quotient) = exact {
                let max = U512::from(U256::MAX);
                assert!(quotient > max || (input.round_up && quotient == max));
            }
        }
    }
}

fn main() {
    loop {
        fuzz!(|data: MulDivInput| {
            fuzz_mul_div(data);
        });
    }
}
