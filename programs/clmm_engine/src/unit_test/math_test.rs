use super::u256;
use crate::constants::*;
use crate::errors::ErrorCode;
use crate::math::*;
use primitive_types::U256;

mod full_math_tests {
    use super::*;

    #[test]
    fn test_mul_div_exact_and_floored() {
        assert_eq!(
            mul_div(U256::from(6u8), U256::from(7u8), U256::from(3u8)).unwrap(),
            U256::from(14u8)
        );
        assert_eq!(
            mul_div(Q128, U256::from(3u8), U256::from(7u8)).unwrap(),
            u256("145835300108973627198589117470757804909")
        );
        assert_eq!(
            mul_div_rounding_up(Q128, U256::from(3u8), U256::from(7u8)).unwrap(),
            u256("145835300108973627198589117470757804910")
        );
    }

    #[test]
    fn test_mul_div_uses_wide_intermediate() {
        // MAX * MAX / MAX does not fit in 256 bits mid-computation
        assert_eq!(
            mul_div(U256::MAX, U256::MAX, U256::MAX).unwrap(),
            U256::MAX
        );
        assert_eq!(mul_div(Q128, Q128, Q128).unwrap(), Q128);
    }

    #[test]
    fn test_mul_div_overflow_and_zero_denominator() {
        assert_eq!(
            mul_div(U256::MAX, U256::from(2u8), U256::one()).unwrap_err(),
            ErrorCode::Overflow.into()
        );
        assert_eq!(
            mul_div(U256::one(), U256::one(), U256::zero()).unwrap_err(),
            ErrorCode::Overflow.into()
        );
        // Exactly MAX does not round past the limit, anything with a remainder does
        assert_eq!(
            mul_div_rounding_up(U256::MAX, U256::MAX, U256::MAX).unwrap(),
            U256::MAX
        );
        assert_eq!(
            mul_div_rounding_up(U256::MAX, U256::from(3u8), U256::from(2u8)).unwrap_err(),
            ErrorCode::Overflow.into()
        );
    }

    #[test]
    fn test_div_rounding_up() {
        assert_eq!(
            div_rounding_up(U256::from(10u8), U256::from(5u8)).unwrap(),
            U256::from(2u8)
        );
        assert_eq!(
            div_rounding_up(U256::from(11u8), U256::from(5u8)).unwrap(),
            U256::from(3u8)
        );
        assert_eq!(
            div_rounding_up(U256::one(), U256::zero()).unwrap_err(),
            ErrorCode::Overflow.into()
        );
    }
}

mod tick_math_tests {
    use super::*;

    #[test]
    fn test_sqrt_price_at_bounds() {
        assert_eq!(get_sqrt_price_at_tick(MIN_TICK).unwrap(), MIN_SQRT_PRICE);
        assert_eq!(get_sqrt_price_at_tick(MAX_TICK).unwrap(), MAX_SQRT_PRICE);
        assert_eq!(
            MAX_SQRT_PRICE,
            u256("1461446703485210103287273052203988822378723970342")
        );
    }

    #[test]
    fn test_sqrt_price_at_known_ticks() {
        assert_eq!(get_sqrt_price_at_tick(0).unwrap(), Q96);
        assert_eq!(
            get_sqrt_price_at_tick(1).unwrap(),
            u256("79232123823359799118286999568")
        );
        assert_eq!(
            get_sqrt_price_at_tick(-1).unwrap(),
            u256("79224201403219477170569942574")
        );
        assert_eq!(
            get_sqrt_price_at_tick(60).unwrap(),
            u256("79466191966197645195421774833")
        );
        assert_eq!(
            get_sqrt_price_at_tick(-600).unwrap(),
            u256("76886731765546235930195592750")
        );
        assert_eq!(
            get_sqrt_price_at_tick(600).unwrap(),
            u256("81640896826356156310682304526")
        );
    }

    #[test]
    fn test_sqrt_price_out_of_range() {
        assert_eq!(
            get_sqrt_price_at_tick(MIN_TICK - 1).unwrap_err(),
            ErrorCode::InvalidTickRange.into()
        );
        assert_eq!(
            get_sqrt_price_at_tick(MAX_TICK + 1).unwrap_err(),
            ErrorCode::InvalidTickRange.into()
        );
    }

    #[test]
    fn test_tick_at_sqrt_price() {
        assert_eq!(get_tick_at_sqrt_price(Q96).unwrap(), 0);
        assert_eq!(get_tick_at_sqrt_price(Q96 - U256::one()).unwrap(), -1);
        assert_eq!(get_tick_at_sqrt_price(MIN_SQRT_PRICE).unwrap(), MIN_TICK);
        assert_eq!(
            get_tick_at_sqrt_price(MAX_SQRT_PRICE - U256::one()).unwrap(),
            MAX_TICK - 1
        );
        let just_below_600 = get_sqrt_price_at_tick(600).unwrap() - U256::one();
        assert_eq!(get_tick_at_sqrt_price(just_below_600).unwrap(), 599);
    }

    #[test]
    fn test_tick_at_sqrt_price_out_of_range() {
        assert_eq!(
            get_tick_at_sqrt_price(MIN_SQRT_PRICE - U256::one()).unwrap_err(),
            ErrorCode::PriceOutOfBounds.into()
        );
        assert_eq!(
            get_tick_at_sqrt_price(MAX_SQRT_PRICE).unwrap_err(),
            ErrorCode::PriceOutOfBounds.into()
        );
        assert_eq!(
            get_tick_at_sqrt_price(U256::zero()).unwrap_err(),
            ErrorCode::PriceOutOfBounds.into()
        );
    }

    #[test]
    fn test_round_trip_sample_ticks() {
        for tick in [MIN_TICK, -500_000, -887, -60, -1, 0, 1, 59, 60, 123_456, MAX_TICK - 1] {
            let price = get_sqrt_price_at_tick(tick).unwrap();
            assert_eq!(get_tick_at_sqrt_price(price).unwrap(), tick, "tick {tick}");
        }
    }

    #[test]
    fn test_usable_ticks() {
        assert_eq!(min_usable_tick(60), -887220);
        assert_eq!(max_usable_tick(60), 887220);
        assert_eq!(min_usable_tick(1), MIN_TICK);
        assert_eq!(max_usable_tick(200), 887200);
    }
}

mod sqrt_price_math_tests {
    use super::*;

    fn price_1_21() -> U256 {
        // sqrt(1.21) in Q64.96
        u256("87150978765690771352898345369")
    }

    #[test]
    fn test_amount_0_delta_rounding() {
        let liquidity = 1_000_000_000_000_000_000u128;
        assert_eq!(
            get_amount_0_delta(Q96, price_1_21(), liquidity, true).unwrap(),
            U256::from(90909090909090910u64)
        );
        assert_eq!(
            get_amount_0_delta(Q96, price_1_21(), liquidity, false).unwrap(),
            U256::from(90909090909090909u64)
        );
        // Argument order does not matter
        assert_eq!(
            get_amount_0_delta(price_1_21(), Q96, liquidity, true).unwrap(),
            U256::from(90909090909090910u64)
        );
    }

    #[test]
    fn test_amount_1_delta_rounding() {
        let liquidity = 1_000_000_000_000_000_000u128;
        assert_eq!(
            get_amount_1_delta(Q96, price_1_21(), liquidity, true).unwrap(),
            U256::from(100000000000000000u64)
        );
        assert_eq!(
            get_amount_1_delta(Q96, price_1_21(), liquidity, false).unwrap(),
            U256::from(99999999999999999u64)
        );
    }

    #[test]
    fn test_zero_liquidity_and_equal_prices() {
        assert!(get_amount_0_delta(Q96, price_1_21(), 0, true)
            .unwrap()
            .is_zero());
        assert!(get_amount_1_delta(Q96, Q96, 1_000_000, true)
            .unwrap()
            .is_zero());
    }

    #[test]
    fn test_next_sqrt_price_from_input() {
        let liquidity = 1_000_000_000_000_000_000u128;
        let amount = U256::from(100_000_000_000_000_000u64);
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, liquidity, amount, false).unwrap(),
            price_1_21()
        );
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, liquidity, amount, true).unwrap(),
            u256("72025602285694852357767227579")
        );
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, liquidity, U256::zero(), true).unwrap(),
            Q96
        );
    }

    #[test]
    fn test_next_sqrt_price_from_output() {
        let liquidity = 1_000_000_000_000_000_000u128;
        let amount = U256::from(100_000_000_000_000_000u64);
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, liquidity, amount, true).unwrap(),
            u256("71305346262837903834189555302")
        );
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, liquidity, amount, false).unwrap(),
            u256("88031291682515930659493278152")
        );
    }

    #[test]
    fn test_next_sqrt_price_errors() {
        assert_eq!(
            get_next_sqrt_price_from_input(U256::zero(), 1, U256::one(), true).unwrap_err(),
            ErrorCode::PriceOutOfBounds.into()
        );
        assert_eq!(
            get_next_sqrt_price_from_input(Q96, 0, U256::one(), true).unwrap_err(),
            ErrorCode::InsufficientLiquidity.into()
        );
        // Asking for more token1 than the range holds
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, 1, U256::from(10u8), true).unwrap_err(),
            ErrorCode::InsufficientLiquidity.into()
        );
        // Asking for more token0 than the range holds
        assert_eq!(
            get_next_sqrt_price_from_output(Q96, 1, U256::from(10u8), false).unwrap_err(),
            ErrorCode::InsufficientLiquidity.into()
        );
    }
}

mod liquidity_math_tests {
    use super::*;

    #[test]
    fn test_add_delta() {
        assert_eq!(add_delta(10, 5).unwrap(), 15);
        assert_eq!(add_delta(10, -10).unwrap(), 0);
        assert_eq!(add_delta(10, 0).unwrap(), 10);
        assert_eq!(
            add_delta(10, -11).unwrap_err(),
            ErrorCode::InsufficientLiquidity.into()
        );
        assert_eq!(
            add_delta(u128::MAX, 1).unwrap_err(),
            ErrorCode::Overflow.into()
        );
    }

    #[test]
    fn test_liquidity_for_amounts() {
        let lower = get_sqrt_price_at_tick(-600).unwrap();
        let upper = get_sqrt_price_at_tick(600).unwrap();
        let budget = U256::from(1_000_000_000_000_000_000u64);

        // In range: both budgets bind at the same value for a symmetric range
        assert_eq!(
            get_liquidity_for_amounts(Q96, lower, upper, budget, budget).unwrap(),
            33837499809738371427
        );
        // Below the range only token0 counts, above only token1
        assert_eq!(
            get_liquidity_for_amounts(lower, lower, upper, budget, U256::zero()).unwrap(),
            16665000373539200203
        );
        assert_eq!(
            get_liquidity_for_amounts(upper, lower, upper, U256::zero(), budget).unwrap(),
            16665000373539200203
        );
    }

    #[test]
    fn test_liquidity_for_empty_range() {
        assert_eq!(
            get_liquidity_for_amount_0(Q96, Q96, U256::one()).unwrap_err(),
            ErrorCode::InvalidTickRange.into()
        );
    }
}

mod swap_math_tests {
    use super::*;

    fn price_1_01() -> U256 {
        u256("79623317895830914510639640423")
    }

    fn price_0_99() -> U256 {
        u256("78831026366734652303669917531")
    }

    const LIQUIDITY: u128 = 2_000_000_000_000_000_000;

    #[test]
    fn test_exact_input_reaches_target() {
        let step = compute_swap_step(
            Q96,
            price_1_01(),
            LIQUIDITY,
            U256::from(1_000_000_000_000_000_000u64),
            true,
            600,
        )
        .unwrap();
        assert_eq!(step.sqrt_price_next_x96, price_1_01());
        assert_eq!(step.amount_in, U256::from(9975124224178055u64));
        assert_eq!(step.amount_out, U256::from(9925619580021728u64));
        assert_eq!(step.fee_amount, U256::from(5988667735148u64));
    }

    #[test]
    fn test_exact_output_reaches_target() {
        let step = compute_swap_step(
            Q96,
            price_1_01(),
            LIQUIDITY,
            U256::from(1_000_000_000_000_000_000u64),
            false,
            600,
        )
        .unwrap();
        assert_eq!(step.sqrt_price_next_x96, price_1_01());
        assert_eq!(step.amount_in, U256::from(9975124224178055u64));
        assert_eq!(step.amount_out, U256::from(9925619580021728u64));
        assert_eq!(step.fee_amount, U256::from(5988667735148u64));
    }

    #[test]
    fn test_exact_input_exhausted_before_target() {
        let amount = U256::from(10_000_000_000_000_000u64);
        let step = compute_swap_step(Q96, price_0_99(), LIQUIDITY, amount, true, 3000).unwrap();
        assert_eq!(
            step.sqrt_price_next_x96,
            u256("78835169195823159145205102899")
        );
        assert_eq!(step.amount_in, U256::from(9970000000000000u64));
        assert_eq!(step.amount_out, U256::from(9920546077802156u64));
        assert_eq!(step.fee_amount, U256::from(30000000000000u64));
        // Everything specified is consumed
        assert_eq!(step.amount_in + step.fee_amount, amount);
    }

    #[test]
    fn test_full_fee_takes_entire_input() {
        let amount = U256::from(10_000_000_000_000_000u64);
        let step =
            compute_swap_step(Q96, price_0_99(), LIQUIDITY, amount, true, MAX_LP_FEE).unwrap();
        assert_eq!(step.sqrt_price_next_x96, Q96);
        assert!(step.amount_in.is_zero());
        assert!(step.amount_out.is_zero());
        assert_eq!(step.fee_amount, amount);

        assert_eq!(
            compute_swap_step(Q96, price_0_99(), LIQUIDITY, amount, false, MAX_LP_FEE)
                .unwrap_err(),
            ErrorCode::InvalidFeeForExactOutput.into()
        );
    }

    #[test]
    fn test_zero_liquidity_moves_to_target_for_free() {
        let step = compute_swap_step(Q96, price_0_99(), 0, U256::from(1000u32), true, 3000).unwrap();
        assert_eq!(step.sqrt_price_next_x96, price_0_99());
        assert!(step.amount_in.is_zero());
        assert!(step.amount_out.is_zero());
        assert!(step.fee_amount.is_zero());
    }

    #[test]
    fn test_fee_above_maximum_rejected() {
        assert_eq!(
            compute_swap_step(Q96, price_0_99(), LIQUIDITY, U256::one(), true, MAX_LP_FEE + 1)
                .unwrap_err(),
            ErrorCode::InvalidFee.into()
        );
    }
}
