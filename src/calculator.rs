use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityEvent, ActivitySink};
use crate::error::InvestmentError;
use crate::holding::{HoldingSnapshot, aggregate_to_month};
use crate::projection::{OutcomeProjection, project_outcome};
use crate::schedule::{Schedule, compute_schedule};
use crate::timeline::{TimelineRow, TimelineSettings, build_timeline_for_schedule};
use crate::types::{CostInputs, FinancingInput, InvestmentInput, MAX_AMOUNT};

/// Complete outcome of one calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentResult {
    /// Purchase price minus entry.
    pub financed_amount: Decimal,
    /// Costs as applied, with the resolved entry value.
    pub costs: CostInputs,
    /// Loan state at the chosen resale month.
    pub snapshot: HoldingSnapshot,
    pub projection: OutcomeProjection,
    /// Schedule over the whole term.
    pub schedule: Schedule,
    /// Same projection at alternative resale months.
    pub timeline: Vec<TimelineRow>,
}

/// Runs the whole analysis with the default timeline grid.
///
/// # Errors
///
/// Fails with [`InvestmentError`] on any invalid input; no partial result is
/// produced.
pub fn calculate_investment(input: &InvestmentInput) -> Result<InvestmentResult, anyhow::Error> {
    calculate_investment_with(&TimelineSettings::default(), input)
}

/// [`calculate_investment`] with a custom timeline grid.
pub fn calculate_investment_with(
    settings: &TimelineSettings,
    input: &InvestmentInput,
) -> Result<InvestmentResult, anyhow::Error> {
    let (financing, costs) =
        prepare(input).inspect_err(|e| warn!("calculation rejected: {e}"))?;
    settings.validate()?;

    let schedule = compute_schedule(&financing)?;
    let snapshot = aggregate_to_month(&schedule, input.holding_months);
    let projection = project_outcome(
        &snapshot,
        &costs,
        input.purchase_price,
        input.market_value,
        input.holding_months,
    )?;
    let timeline = build_timeline_for_schedule(
        settings,
        &schedule,
        &costs,
        input.purchase_price,
        input.market_value,
    )?;

    Ok(InvestmentResult {
        financed_amount: financing.financed_amount,
        costs,
        snapshot,
        projection,
        schedule,
        timeline,
    })
}

/// Calculates and appends the outcome to `sink`. A sink failure is logged and
/// the result is still returned.
pub fn calculate_and_record(
    input: &InvestmentInput,
    sink: &dyn ActivitySink,
) -> Result<InvestmentResult, anyhow::Error> {
    calculate_and_record_with(&TimelineSettings::default(), input, sink)
}

/// [`calculate_and_record`] with a custom timeline grid.
pub fn calculate_and_record_with(
    settings: &TimelineSettings,
    input: &InvestmentInput,
    sink: &dyn ActivitySink,
) -> Result<InvestmentResult, anyhow::Error> {
    let result = calculate_investment_with(settings, input)?;
    if let Err(e) = sink.record(&ActivityEvent::calculation(input, &result)) {
        warn!("failed to record calculation activity: {e:#}");
    }
    Ok(result)
}

fn prepare(input: &InvestmentInput) -> Result<(FinancingInput, CostInputs), InvestmentError> {
    if input.purchase_price <= Decimal::ZERO {
        return Err(InvestmentError::invalid("purchase_price", "must be positive"));
    }
    if input.market_value <= Decimal::ZERO {
        return Err(InvestmentError::invalid("market_value", "must be positive"));
    }
    if input.purchase_price > MAX_AMOUNT {
        return Err(InvestmentError::invalid("purchase_price", "value too large"));
    }
    if input.market_value > MAX_AMOUNT {
        return Err(InvestmentError::invalid("market_value", "value too large"));
    }
    if input.holding_months == 0 {
        return Err(InvestmentError::invalid("holding_months", "must be at least one month"));
    }

    let entry_value = input.entry.resolve(input.purchase_price);
    let costs = CostInputs {
        entry_value,
        ..input.costs.clone()
    };
    costs.validate()?;

    let financed_amount = input.purchase_price - entry_value;
    if financed_amount <= Decimal::ZERO {
        return Err(InvestmentError::DegenerateFinancing {
            purchase_price: input.purchase_price,
            entry_value,
        });
    }

    let financing = FinancingInput {
        financed_amount,
        annual_rate: input.annual_rate,
        term_months: input.term_months,
        table: input.table,
    };
    financing.validate()?;

    Ok((financing, costs))
}
