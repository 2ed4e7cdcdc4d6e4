//! Flat-rate income tax (podatek liniowy): one rate, no threshold, no credit.

use rust_decimal::Decimal;

use crate::tables::TaxTables;
use crate::types::{finalize, Money};

fn flat(income: Money, tables: &TaxTables) -> Money {
    finalize(income.max(Decimal::ZERO) * tables.linear_rate)
}

pub fn annual_tax(annual_income: Money, tables: &TaxTables) -> Money {
    flat(annual_income, tables)
}

pub fn monthly_tax(monthly_income: Money, tables: &TaxTables) -> Money {
    flat(monthly_income, tables)
}

/// Annual income after tax, before contributions. Zero when there is no income.
pub fn annual_net_income(annual_revenue: Money, annual_costs: Money, tables: &TaxTables) -> Money {
    let income = annual_revenue - annual_costs;
    if income <= Decimal::ZERO {
        return finalize(Decimal::ZERO);
    }
    finalize(income - annual_tax(income, tables))
}
