use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::{horizon, CalendarMonth};
use crate::error::JdgTaxError;
use crate::regimes::lump_sum;
use crate::regimes::RevenueByRate;
use crate::types::*;
use crate::JdgTaxResult;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// An extra cost booked in a single month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OneTimeCost {
    pub month_index: MonthIndex,
    pub amount: Money,
}

/// Lump-sum revenue for one month, split by declared rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LumpSumMonth {
    pub month_index: MonthIndex,
    pub revenues_by_rate: RevenueByRate,
}

/// Everything a caller supplies for a sixty-month projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    pub base_month: CalendarMonth,
    pub business_start_date: NaiveDate,
    /// Revenue per month for the scale and linear regimes.
    pub monthly_revenues: Vec<Money>,
    /// Recurring costs per month.
    pub monthly_costs: Vec<Money>,
    #[serde(default)]
    pub one_time_costs: Vec<OneTimeCost>,
    /// Per-month revenue by rate for the lump-sum regime.
    #[serde(default)]
    pub lump_sum_revenues: Option<Vec<LumpSumMonth>>,
}

// ---------------------------------------------------------------------------
// Validated plan
// ---------------------------------------------------------------------------

/// A validated request, resolved to one value per month.
///
/// Built once by [`ProjectionRequest::plan`] and shared read-only by every
/// regime projection of the request.
#[derive(Debug, Clone)]
pub struct ProjectionPlan {
    months: Vec<CalendarMonth>,
    business_start: NaiveDate,
    revenues: Vec<Money>,
    recurring_costs: Vec<Money>,
    one_time_costs: Vec<Money>,
    lump_sum: Vec<RevenueByRate>,
}

impl ProjectionPlan {
    pub fn months(&self) -> &[CalendarMonth] {
        &self.months
    }

    pub fn business_start(&self) -> NaiveDate {
        self.business_start
    }

    pub fn revenue(&self, i: MonthIndex) -> Money {
        self.revenues[i]
    }

    /// Recurring plus one-time costs for month `i`, unrounded.
    pub fn cost(&self, i: MonthIndex) -> Money {
        self.recurring_costs[i] + self.one_time_costs[i]
    }

    pub fn one_time_cost(&self, i: MonthIndex) -> Money {
        self.one_time_costs[i]
    }

    /// Lump-sum revenue by rate for month `i`; empty when none was declared.
    pub fn lump_sum_revenue(&self, i: MonthIndex) -> &RevenueByRate {
        &self.lump_sum[i]
    }

    pub fn has_lump_sum_revenue(&self) -> bool {
        self.lump_sum.iter().any(|m| !m.is_empty())
    }
}

impl ProjectionRequest {
    /// Shape checks performed before any projection runs.
    pub fn validate(&self) -> JdgTaxResult<()> {
        check_series("monthly_revenues", &self.monthly_revenues)?;
        check_series("monthly_costs", &self.monthly_costs)?;

        for (n, cost) in self.one_time_costs.iter().enumerate() {
            check_index(&format!("one_time_costs[{n}].month_index"), cost.month_index)?;
            let field = format!("one_time_costs[{n}].amount");
            if cost.amount <= Decimal::ZERO {
                return Err(JdgTaxError::InvalidInput {
                    field,
                    reason: "must be positive".into(),
                });
            }
            check_amount(&field, cost.amount)?;
        }

        if let Some(lump) = &self.lump_sum_revenues {
            if lump.len() != HORIZON_MONTHS {
                return Err(JdgTaxError::InvalidInput {
                    field: "lump_sum_revenues".into(),
                    reason: format!(
                        "must contain {HORIZON_MONTHS} months, got {}",
                        lump.len()
                    ),
                });
            }
            let mut seen = [false; HORIZON_MONTHS];
            for (n, month) in lump.iter().enumerate() {
                let field = format!("lump_sum_revenues[{n}]");
                check_index(&format!("{field}.month_index"), month.month_index)?;
                if std::mem::replace(&mut seen[month.month_index], true) {
                    return Err(JdgTaxError::InvalidInput {
                        field: format!("{field}.month_index"),
                        reason: format!("month {} listed more than once", month.month_index),
                    });
                }
                if !lump_sum::rates_valid(&month.revenues_by_rate) {
                    return Err(JdgTaxError::InvalidInput {
                        field: format!("{field}.revenues_by_rate"),
                        reason: "every rate must lie strictly between 0 and 1".into(),
                    });
                }
                for revenue in month.revenues_by_rate.values() {
                    check_amount(&format!("{field}.revenues_by_rate"), *revenue)?;
                }
            }
        }

        Ok(())
    }

    /// Validate and resolve into a per-month plan.
    pub fn plan(&self) -> JdgTaxResult<ProjectionPlan> {
        self.validate()?;

        let mut one_time_costs = vec![Decimal::ZERO; HORIZON_MONTHS];
        for cost in &self.one_time_costs {
            one_time_costs[cost.month_index] += cost.amount;
        }

        let mut lump = vec![RevenueByRate::new(); HORIZON_MONTHS];
        for month in self.lump_sum_revenues.iter().flatten() {
            lump[month.month_index] = month.revenues_by_rate.clone();
        }

        Ok(ProjectionPlan {
            months: horizon(self.base_month)?,
            business_start: self.business_start_date,
            revenues: self.monthly_revenues.clone(),
            recurring_costs: self.monthly_costs.clone(),
            one_time_costs,
            lump_sum: lump,
        })
    }
}

fn check_series(field: &str, values: &[Money]) -> JdgTaxResult<()> {
    if values.len() != HORIZON_MONTHS {
        return Err(JdgTaxError::InvalidInput {
            field: field.into(),
            reason: format!("must contain {HORIZON_MONTHS} values, got {}", values.len()),
        });
    }
    for (i, v) in values.iter().enumerate() {
        check_amount(&format!("{field}[{i}]"), *v)?;
    }
    Ok(())
}

fn check_index(field: &str, i: MonthIndex) -> JdgTaxResult<()> {
    if i >= HORIZON_MONTHS {
        return Err(JdgTaxError::InvalidInput {
            field: field.into(),
            reason: format!("must be in 0..{HORIZON_MONTHS}, got {i}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> ProjectionRequest {
        ProjectionRequest {
            base_month: "2025-01".parse().unwrap(),
            business_start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            monthly_revenues: vec![dec!(50000); 60],
            monthly_costs: vec![dec!(5000); 60],
            one_time_costs: vec![],
            lump_sum_revenues: None,
        }
    }

    fn lump_months() -> Vec<LumpSumMonth> {
        (0..60)
            .map(|i| LumpSumMonth {
                month_index: i,
                revenues_by_rate: RevenueByRate::new(),
            })
            .collect()
    }

    fn rejected_field(req: &ProjectionRequest) -> String {
        match req.validate() {
            Err(JdgTaxError::InvalidInput { field, .. }) => field,
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_wrong_length() {
        let mut req = request();
        req.monthly_revenues.pop();
        assert_eq!(rejected_field(&req), "monthly_revenues");
    }

    #[test]
    fn test_negative_cost() {
        let mut req = request();
        req.monthly_costs[17] = dec!(-1);
        assert_eq!(rejected_field(&req), "monthly_costs[17]");
    }

    #[test]
    fn test_amounts_above_ceiling_rejected() {
        let huge = dec!(2000000000000000000000000000);

        let mut req = request();
        req.monthly_revenues = vec![huge; 60];
        assert_eq!(rejected_field(&req), "monthly_revenues[0]");

        let mut req = request();
        req.monthly_costs[42] = MAX_AMOUNT + dec!(1);
        assert_eq!(rejected_field(&req), "monthly_costs[42]");

        let mut req = request();
        req.one_time_costs.push(OneTimeCost { month_index: 7, amount: huge });
        assert_eq!(rejected_field(&req), "one_time_costs[0].amount");

        let mut req = request();
        let mut months = lump_months();
        months[9].revenues_by_rate.insert(dec!(0.12), huge);
        req.lump_sum_revenues = Some(months);
        assert_eq!(rejected_field(&req), "lump_sum_revenues[9].revenues_by_rate");
    }

    #[test]
    fn test_amounts_at_ceiling_project_without_overflow() {
        let mut req = request();
        req.monthly_revenues = vec![MAX_AMOUNT; 60];
        req.monthly_costs = vec![Decimal::ZERO; 60];
        req.one_time_costs.push(OneTimeCost { month_index: 0, amount: MAX_AMOUNT });
        let mut months = lump_months();
        for m in &mut months {
            m.revenues_by_rate.insert(dec!(0.17), MAX_AMOUNT);
        }
        req.lump_sum_revenues = Some(months);

        let out = crate::comparison::compare_regimes(&req, &crate::tables::TaxTables::fiscal_2025())
            .unwrap();
        assert_eq!(out.result.linear_tax.summary_60_months.revenue, MAX_AMOUNT * dec!(60));
        assert!(out.result.lump_sum.summary_60_months.tax > Decimal::ZERO);
    }

    #[test]
    fn test_base_month_near_year_9999_rejected() {
        let mut req = request();
        req.base_month = "9996-01".parse().unwrap();
        assert!(matches!(req.plan(), Err(JdgTaxError::DateError(_))));
        req.base_month = "9995-01".parse().unwrap();
        assert!(req.plan().is_ok());
    }

    #[test]
    fn test_one_time_cost_out_of_range() {
        let mut req = request();
        req.one_time_costs.push(OneTimeCost {
            month_index: 60,
            amount: dec!(100),
        });
        assert_eq!(rejected_field(&req), "one_time_costs[0].month_index");
    }

    #[test]
    fn test_one_time_cost_must_be_positive() {
        let mut req = request();
        req.one_time_costs.push(OneTimeCost {
            month_index: 3,
            amount: dec!(0),
        });
        assert_eq!(rejected_field(&req), "one_time_costs[0].amount");
    }

    #[test]
    fn test_one_time_costs_accumulate() {
        let mut req = request();
        req.one_time_costs = vec![
            OneTimeCost { month_index: 12, amount: dec!(1000) },
            OneTimeCost { month_index: 12, amount: dec!(250.50) },
            OneTimeCost { month_index: 0, amount: dec!(10000) },
        ];
        let plan = req.plan().unwrap();
        assert_eq!(plan.one_time_cost(12), dec!(1250.50));
        assert_eq!(plan.cost(12), dec!(6250.50));
        assert_eq!(plan.cost(0), dec!(15000));
        assert_eq!(plan.cost(1), dec!(5000));
    }

    #[test]
    fn test_lump_sum_wrong_length() {
        let mut req = request();
        let mut months = lump_months();
        months.truncate(59);
        req.lump_sum_revenues = Some(months);
        assert_eq!(rejected_field(&req), "lump_sum_revenues");
    }

    #[test]
    fn test_lump_sum_duplicate_month() {
        let mut req = request();
        let mut months = lump_months();
        months[5].month_index = 4;
        req.lump_sum_revenues = Some(months);
        assert_eq!(rejected_field(&req), "lump_sum_revenues[5].month_index");
    }

    #[test]
    fn test_lump_sum_rate_out_of_range() {
        let mut req = request();
        let mut months = lump_months();
        months[2].revenues_by_rate.insert(dec!(1.5), dec!(100));
        req.lump_sum_revenues = Some(months);
        assert_eq!(rejected_field(&req), "lump_sum_revenues[2].revenues_by_rate");
    }

    #[test]
    fn test_lump_sum_negative_revenue() {
        let mut req = request();
        let mut months = lump_months();
        months[2].revenues_by_rate.insert(dec!(0.12), dec!(-100));
        req.lump_sum_revenues = Some(months);
        assert_eq!(rejected_field(&req), "lump_sum_revenues[2].revenues_by_rate");
    }

    #[test]
    fn test_plan_without_lump_sum_has_empty_months() {
        let plan = request().plan().unwrap();
        assert!(!plan.has_lump_sum_revenue());
        assert!(plan.lump_sum_revenue(59).is_empty());
        assert_eq!(plan.months().len(), 60);
    }

    #[test]
    fn test_plan_places_lump_sum_by_index() {
        let mut req = request();
        let mut months = lump_months();
        months.reverse();
        months[0].revenues_by_rate.insert(dec!(0.055), dec!(1000));
        req.lump_sum_revenues = Some(months);
        let plan = req.plan().unwrap();
        assert_eq!(plan.lump_sum_revenue(59)[&dec!(0.055)], dec!(1000));
        assert!(plan.lump_sum_revenue(0).is_empty());
    }

    #[test]
    fn test_request_from_json() {
        let json = serde_json::json!({
            "base_month": "2025-01",
            "business_start_date": "2025-01-15",
            "monthly_revenues": vec![10000; 60],
            "monthly_costs": vec!["1500.50"; 60],
            "one_time_costs": [{"month_index": 0, "amount": 10000}],
            "lump_sum_revenues": (0..60).map(|i| serde_json::json!({
                "month_index": i,
                "revenues_by_rate": {"0.055": 10000}
            })).collect::<Vec<_>>(),
        });
        let req: ProjectionRequest = serde_json::from_value(json).unwrap();
        let plan = req.plan().unwrap();
        assert_eq!(plan.cost(0), dec!(11500.50));
        assert_eq!(plan.lump_sum_revenue(30)[&dec!(0.055)], dec!(10000));
    }

    #[test]
    fn test_request_rejects_bad_base_month() {
        let json = serde_json::json!({
            "base_month": "2025-13",
            "business_start_date": "2025-01-01",
            "monthly_revenues": [],
            "monthly_costs": [],
        });
        assert!(serde_json::from_value::<ProjectionRequest>(json).is_err());
    }
}
