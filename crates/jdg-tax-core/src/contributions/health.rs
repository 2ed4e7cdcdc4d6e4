//! Monthly health contribution (składka zdrowotna) per regime.
//!
//! The scale and linear regimes pay a percentage of monthly income with a
//! common floor; the lump-sum regime pays a flat amount regardless of revenue.

use rust_decimal::Decimal;

use crate::tables::TaxTables;
use crate::types::{finalize, Money};

fn income_based(monthly_income: Money, rate: Decimal, tables: &TaxTables) -> Money {
    let floor = tables.health_floor();
    if monthly_income <= Decimal::ZERO {
        return finalize(floor);
    }
    finalize((monthly_income * rate).max(floor))
}

/// 9% of monthly income, never below the floor.
pub fn monthly_scale(monthly_income: Money, tables: &TaxTables) -> Money {
    income_based(monthly_income, tables.health.rate_scale, tables)
}

/// 4.9% of monthly income, never below the floor.
pub fn monthly_linear(monthly_income: Money, tables: &TaxTables) -> Money {
    income_based(monthly_income, tables.health.rate_linear, tables)
}

pub fn monthly_lump_sum(tables: &TaxTables) -> Money {
    finalize(tables.lump_sum_health())
}

/// Lump-sum health contribution over `months` months of activity.
pub fn annual_lump_sum(months: u32, tables: &TaxTables) -> Money {
    finalize(monthly_lump_sum(tables) * Decimal::from(months))
}

/// Spread an annual amount evenly over `months` for reporting.
pub fn distribute_annual_to_monthly(annual: Money, months: i32) -> Money {
    if months <= 0 {
        return finalize(Decimal::ZERO);
    }
    finalize(annual / Decimal::from(months))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tables() -> TaxTables {
        TaxTables::fiscal_2025()
    }

    #[test]
    fn test_scale_nine_percent() {
        assert_eq!(monthly_scale(dec!(10000), &tables()), dec!(900.00));
        assert_eq!(monthly_scale(dec!(45000), &tables()), dec!(4050.00));
    }

    #[test]
    fn test_linear_four_point_nine_percent() {
        assert_eq!(monthly_linear(dec!(10000), &tables()), dec!(490.00));
        assert_eq!(monthly_linear(dec!(45000), &tables()), dec!(2205.00));
    }

    #[test]
    fn test_floor_applies_for_low_income() {
        // 9% of 1000 = 90, floor is 314.96
        assert_eq!(monthly_scale(dec!(1000), &tables()), dec!(314.96));
        // 4.9% of 6000 = 294, still under the floor
        assert_eq!(monthly_linear(dec!(6000), &tables()), dec!(314.96));
    }

    #[test]
    fn test_zero_and_negative_income_pay_floor() {
        let t = tables();
        for income in [dec!(0), dec!(-1), dec!(-25000)] {
            assert_eq!(monthly_scale(income, &t), dec!(314.96));
            assert_eq!(monthly_linear(income, &t), dec!(314.96));
        }
    }

    #[test]
    fn test_floor_identical_for_scale_and_linear() {
        let t = tables();
        assert_eq!(monthly_scale(dec!(0), &t), monthly_linear(dec!(0), &t));
    }

    #[test]
    fn test_lump_sum_flat_amount() {
        assert_eq!(monthly_lump_sum(&tables()), dec!(554.43));
    }

    #[test]
    fn test_annual_lump_sum() {
        let t = tables();
        assert_eq!(annual_lump_sum(12, &t), dec!(6653.16));
        assert_eq!(annual_lump_sum(0, &t), dec!(0));
    }

    #[test]
    fn test_distribute_annual() {
        assert_eq!(distribute_annual_to_monthly(dec!(12000), 12), dec!(1000.00));
        assert_eq!(distribute_annual_to_monthly(dec!(1000), 3), dec!(333.33));
        assert_eq!(distribute_annual_to_monthly(dec!(1000), 0), dec!(0));
        assert_eq!(distribute_annual_to_monthly(dec!(1000), -4), dec!(0));
    }

    #[test]
    fn test_results_have_two_places() {
        let t = tables();
        assert_eq!(monthly_scale(dec!(12345.678), &t).scale(), 2);
        assert_eq!(monthly_lump_sum(&t).scale(), 2);
    }
}
