use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::InvestmentError;
use crate::holding::HoldingSnapshot;
use crate::types::CostInputs;

/// Profit and return figures for a resale at the end of the holding period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProjection {
    /// Market value minus purchase price.
    pub discount: Decimal,
    /// Discount as a percentage of market value.
    pub discount_percentage: Decimal,
    /// Recurring charges times the months held.
    pub total_monthly_expenses: Decimal,
    /// Taxes, fees, brokerage, renovation and recurring charges.
    pub total_additional_costs: Decimal,
    /// Entry, installments paid and additional costs.
    pub total_investment: Decimal,
    /// Market value after brokerage.
    pub net_resale_value: Decimal,
    /// Net resale value less remaining debt and costs, entry added back.
    pub estimated_profit: Decimal,
    /// Cash actually spent up to the resale; ROI denominator.
    pub cash_outlay: Decimal,
    /// Percentage over the whole holding period.
    pub total_roi: Decimal,
    /// `total_roi` spread evenly over the months held.
    pub monthly_roi: Decimal,
}

/// Combines the financing state at resale with purchase costs into profit and ROI.
///
/// The entry is counted once in `total_investment` and added back to the profit:
/// it comes back as equity when the property is sold. Brokerage only reduces the
/// sale proceeds. Zero divisors (market value, cash outlay, months held) yield a
/// zero ratio.
///
/// # Errors
///
/// Returns [`InvestmentError::Overflow`] when the amounts do not fit a `Decimal`.
pub fn project_outcome(
    snapshot: &HoldingSnapshot,
    costs: &CostInputs,
    purchase_price: Decimal,
    market_value: Decimal,
    holding_months: u32,
) -> Result<OutcomeProjection, InvestmentError> {
    let discount = checked(market_value.checked_sub(purchase_price), "discount")?;
    let discount_percentage = percentage_of(discount, market_value)?;

    let total_monthly_expenses = checked(
        costs.monthly_expenses.checked_mul(Decimal::from(holding_months)),
        "monthly expenses",
    )?;
    let total_additional_costs = checked_sum(
        &[
            costs.itbi,
            costs.documentation,
            costs.brokerage,
            costs.renovation,
            total_monthly_expenses,
        ],
        "additional costs",
    )?;

    let total_investment = checked_sum(
        &[costs.entry_value, snapshot.total_paid, total_additional_costs],
        "total investment",
    )?;
    let net_resale_value = checked(market_value.checked_sub(costs.brokerage), "resale value")?;
    let estimated_profit = checked(
        net_resale_value
            .checked_sub(snapshot.remaining_debt)
            .and_then(|v| v.checked_sub(total_investment))
            .and_then(|v| v.checked_add(costs.entry_value)),
        "estimated profit",
    )?;

    let cash_outlay = checked_sum(
        &[costs.entry_value, total_additional_costs, snapshot.total_paid],
        "cash outlay",
    )?;
    let total_roi = percentage_of(estimated_profit, cash_outlay)?;
    let monthly_roi = if holding_months == 0 {
        Decimal::ZERO
    } else {
        total_roi / Decimal::from(holding_months)
    };

    Ok(OutcomeProjection {
        discount,
        discount_percentage,
        total_monthly_expenses,
        total_additional_costs,
        total_investment,
        net_resale_value,
        estimated_profit,
        cash_outlay,
        total_roi,
        monthly_roi,
    })
}

fn checked(value: Option<Decimal>, context: &str) -> Result<Decimal, InvestmentError> {
    value.ok_or_else(|| InvestmentError::overflow(context))
}

fn checked_sum(values: &[Decimal], context: &str) -> Result<Decimal, InvestmentError> {
    values
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(|| InvestmentError::overflow(context))
}

fn percentage_of(part: Decimal, whole: Decimal) -> Result<Decimal, InvestmentError> {
    match part.checked_div(whole) {
        Some(ratio) => checked(ratio.checked_mul(dec!(100)), "percentage"),
        None if whole.is_zero() => Ok(Decimal::ZERO),
        None => Err(InvestmentError::overflow("percentage")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn snapshot(total_paid: Decimal, remaining_debt: Decimal) -> HoldingSnapshot {
        HoldingSnapshot {
            month: 12,
            total_paid,
            total_interest: Decimal::ZERO,
            remaining_debt,
        }
    }

    #[test]
    fn test_project_outcome_hand_computed() {
        let costs = CostInputs {
            entry_value: dec!(20000),
            itbi: dec!(2000),
            documentation: dec!(1000),
            brokerage: dec!(6000),
            renovation: dec!(5000),
            monthly_expenses: dec!(500),
        };

        let result = project_outcome(
            &snapshot(dec!(12000), dec!(70000)),
            &costs,
            dec!(100000),
            dec!(125000),
            12,
        )
        .unwrap();

        assert_eq!(
            result,
            OutcomeProjection {
                discount: dec!(25000),
                discount_percentage: dec!(20),
                total_monthly_expenses: dec!(6000),
                total_additional_costs: dec!(20000),
                total_investment: dec!(52000),
                net_resale_value: dec!(119000),
                estimated_profit: dec!(17000),
                cash_outlay: dec!(52000),
                total_roi: dec!(17000) / dec!(52000) * dec!(100),
                monthly_roi: dec!(17000) / dec!(52000) * dec!(100) / dec!(12),
            }
        );
    }

    #[test]
    fn test_entry_is_not_double_subtracted() {
        let base = CostInputs::default();
        let with_entry = CostInputs {
            entry_value: dec!(50000),
            ..CostInputs::default()
        };
        let snap = snapshot(dec!(10000), dec!(40000));

        let without = project_outcome(&snap, &base, dec!(100000), dec!(120000), 10).unwrap();
        let with = project_outcome(&snap, &with_entry, dec!(100000), dec!(120000), 10).unwrap();

        assert_eq!(without.estimated_profit, with.estimated_profit);
        assert_eq!(with.cash_outlay, without.cash_outlay + dec!(50000));
    }

    #[rstest]
    #[case(dec!(150000), true)]
    #[case(dec!(60000), false)]
    fn test_roi_sign_follows_profit(#[case] market_value: Decimal, #[case] profitable: bool) {
        let costs = CostInputs {
            entry_value: dec!(20000),
            ..CostInputs::default()
        };
        let result = project_outcome(
            &snapshot(dec!(15000), dec!(75000)),
            &costs,
            dec!(100000),
            market_value,
            12,
        )
        .unwrap();

        assert_eq!(result.estimated_profit > Decimal::ZERO, profitable);
        assert_eq!(result.total_roi > Decimal::ZERO, profitable);
    }

    #[test]
    fn test_zero_divisors_give_zero_ratios() {
        let result = project_outcome(
            &snapshot(dec!(0), dec!(0)),
            &CostInputs::default(),
            dec!(0),
            dec!(0),
            0,
        )
        .unwrap();

        assert_eq!(result.discount_percentage, dec!(0));
        assert_eq!(result.cash_outlay, dec!(0));
        assert_eq!(result.total_roi, dec!(0));
        assert_eq!(result.monthly_roi, dec!(0));
    }

    #[test]
    fn test_oversized_amounts_are_an_error() {
        let costs = CostInputs {
            monthly_expenses: dec!(100_000_000_000_000_000_000_000_000),
            ..CostInputs::default()
        };

        let err = project_outcome(
            &snapshot(dec!(1000), dec!(1000)),
            &costs,
            dec!(300000),
            dec!(450000),
            1000,
        )
        .unwrap_err();

        assert_eq!(err, InvestmentError::overflow("monthly expenses"));
    }
}
