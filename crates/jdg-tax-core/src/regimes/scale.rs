//! Progressive two-bracket income tax (skala podatkowa).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::tables::{ScaleTable, TaxTables};
use crate::types::{finalize, Money};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Bracketed tax less the credit, floored at zero. Unrounded.
fn bracketed(income: Money, threshold: Money, reduction: Money, scale: &ScaleTable) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let before_reduction = if income <= threshold {
        income * scale.rate_low
    } else {
        threshold * scale.rate_low + (income - threshold) * scale.rate_high
    };

    (before_reduction - reduction).max(Decimal::ZERO)
}

/// Annual tax on annual income.
pub fn annual_tax(annual_income: Money, tables: &TaxTables) -> Money {
    let s = &tables.scale;
    finalize(bracketed(annual_income, s.threshold, s.reduction, s))
}

/// Monthly advance on one month's income.
///
/// Applies the brackets against a twelfth of the threshold and of the credit,
/// month by month. This does not reproduce cumulative year-to-date
/// withholding, so twelve advances need not add up to [`annual_tax`].
pub fn monthly_tax(monthly_income: Money, tables: &TaxTables) -> Money {
    let s = &tables.scale;
    finalize(bracketed(
        monthly_income,
        s.threshold / MONTHS_PER_YEAR,
        s.reduction / MONTHS_PER_YEAR,
        s,
    ))
}

/// Annual income after tax, before contributions. Zero when there is no income.
pub fn annual_net_income(annual_revenue: Money, annual_costs: Money, tables: &TaxTables) -> Money {
    let income = annual_revenue - annual_costs;
    if income <= Decimal::ZERO {
        return finalize(Decimal::ZERO);
    }
    finalize(income - annual_tax(income, tables))
}
