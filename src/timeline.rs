use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InvestmentError;
use crate::holding::aggregate_to_month;
use crate::projection::project_outcome;
use crate::schedule::{Schedule, compute_schedule};
use crate::types::{CostInputs, FinancingInput};

/// Grid of alternative resale months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineSettings {
    /// Distance between candidate months; also the first candidate.
    pub step_months: u32,
    /// Last candidate month, further capped by the loan term.
    pub max_months: u32,
}

impl Default for TimelineSettings {
    fn default() -> Self {
        TimelineSettings {
            step_months: 6,
            max_months: 60,
        }
    }
}

impl TimelineSettings {
    /// Loads settings from a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, anyhow::Error> {
        let settings: TimelineSettings =
            serde_json::from_str(json).map_err(InvestmentError::from)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Rejects a zero step.
    pub fn validate(&self) -> Result<(), InvestmentError> {
        if self.step_months == 0 {
            return Err(InvestmentError::invalid("step_months", "must be at least one month"));
        }
        Ok(())
    }

    /// Candidate months in ascending order: `step, 2 * step, ...` up to the cap.
    pub fn candidate_months(&self, term_months: u32) -> Vec<u32> {
        if self.step_months == 0 {
            return Vec::new();
        }
        let last = self.max_months.min(term_months);
        (self.step_months..=last)
            .step_by(self.step_months as usize)
            .collect()
    }
}

/// Outcome of reselling at one candidate month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRow {
    /// Resale month.
    pub month: u32,
    /// Estimated profit when selling at `month`.
    pub profit: Decimal,
    /// Total ROI percentage when selling at `month`.
    pub roi: Decimal,
    pub remaining_debt: Decimal,
    /// Installments paid up to `month`.
    pub total_paid: Decimal,
}

/// Profit and ROI for every 6th month up to 60 months or the loan term.
pub fn build_timeline(
    financing: &FinancingInput,
    costs: &CostInputs,
    purchase_price: Decimal,
    market_value: Decimal,
) -> Result<Vec<TimelineRow>, anyhow::Error> {
    build_timeline_with(
        &TimelineSettings::default(),
        financing,
        costs,
        purchase_price,
        market_value,
    )
}

/// [`build_timeline`] over a custom grid of candidate months.
///
/// # Errors
///
/// Invalid settings or financing, or amounts too large to project.
pub fn build_timeline_with(
    settings: &TimelineSettings,
    financing: &FinancingInput,
    costs: &CostInputs,
    purchase_price: Decimal,
    market_value: Decimal,
) -> Result<Vec<TimelineRow>, anyhow::Error> {
    settings.validate()?;
    let schedule = compute_schedule(financing)?;
    let rows =
        build_timeline_for_schedule(settings, &schedule, costs, purchase_price, market_value)?;
    Ok(rows)
}

/// Same as [`build_timeline_with`] over a schedule that is already built.
/// Every row is aggregated from month 1 on its own.
///
/// # Errors
///
/// [`InvestmentError::Overflow`] if a row cannot be projected.
pub fn build_timeline_for_schedule(
    settings: &TimelineSettings,
    schedule: &Schedule,
    costs: &CostInputs,
    purchase_price: Decimal,
    market_value: Decimal,
) -> Result<Vec<TimelineRow>, InvestmentError> {
    let rows = settings
        .candidate_months(schedule.len() as u32)
        .into_iter()
        .map(|month| {
            let snapshot = aggregate_to_month(schedule, month);
            let outcome = project_outcome(&snapshot, costs, purchase_price, market_value, month)?;
            Ok(TimelineRow {
                month,
                profit: outcome.estimated_profit,
                roi: outcome.total_roi,
                remaining_debt: snapshot.remaining_debt,
                total_paid: snapshot.total_paid,
            })
        })
        .collect::<Result<Vec<_>, InvestmentError>>()?;

    debug!("timeline built with {} rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AmortizationTable;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn financing(term_months: u32) -> FinancingInput {
        FinancingInput {
            financed_amount: dec!(100000),
            annual_rate: dec!(0.09),
            term_months,
            table: AmortizationTable::Sac,
        }
    }

    #[rstest]
    #[case(360, vec![6, 12, 18, 24, 30, 36, 42, 48, 54, 60])]
    #[case(24, vec![6, 12, 18, 24])]
    #[case(20, vec![6, 12, 18])]
    #[case(5, vec![])]
    fn test_candidate_months(#[case] term: u32, #[case] expected: Vec<u32>) {
        assert_eq!(TimelineSettings::default().candidate_months(term), expected);
    }

    #[test]
    fn test_settings_from_json_keeps_defaults() {
        let settings = TimelineSettings::from_json(r#"{ "step_months": 12 }"#).unwrap();
        assert_eq!(settings.step_months, 12);
        assert_eq!(settings.max_months, 60);
        assert_eq!(settings.candidate_months(360), vec![12, 24, 36, 48, 60]);
    }

    #[rstest]
    #[case(r#"{ "step_months": 0 }"#)]
    #[case(r#"{ "step_months": "six" }"#)]
    fn test_bad_settings_are_rejected(#[case] json: &str) {
        assert!(TimelineSettings::from_json(json).is_err());
    }

    #[test]
    fn test_rows_match_single_point_projection() {
        let financing = financing(120);
        let costs = CostInputs {
            entry_value: dec!(25000),
            itbi: dec!(3000),
            monthly_expenses: dec!(400),
            ..CostInputs::default()
        };
        let schedule = compute_schedule(&financing).unwrap();
        let rows = build_timeline(&financing, &costs, dec!(125000), dec!(160000)).unwrap();

        for row in &rows {
            let snapshot = aggregate_to_month(&schedule, row.month);
            let outcome =
                project_outcome(&snapshot, &costs, dec!(125000), dec!(160000), row.month).unwrap();
            assert_eq!(row.profit, outcome.estimated_profit);
            assert_eq!(row.roi, outcome.total_roi);
            assert_eq!(row.total_paid, snapshot.total_paid);
            assert_eq!(row.remaining_debt, snapshot.remaining_debt);
        }
    }

    #[test]
    fn test_invalid_financing_builds_no_timeline() {
        let mut financing = financing(120);
        financing.annual_rate = dec!(0);
        assert!(build_timeline(&financing, &CostInputs::default(), dec!(1), dec!(1)).is_err());
    }
}
