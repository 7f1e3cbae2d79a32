use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::schedule::Schedule;

/// State of the loan at the resale month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingSnapshot {
    /// Month actually used, capped at the loan term.
    pub month: u32,
    /// Installments paid up to `month`.
    pub total_paid: Decimal,
    /// Interest share of `total_paid`.
    pub total_interest: Decimal,
    /// Balance still owed after `month`, never negative.
    pub remaining_debt: Decimal,
}

/// Accumulates installments and interest over months `1..=holding_months`.
///
/// Holding past the end of the term stops at the last installment. A zero
/// holding period pays nothing and leaves the whole principal outstanding.
pub fn aggregate_to_month(schedule: &Schedule, holding_months: u32) -> HoldingSnapshot {
    let effective = (holding_months as usize).min(schedule.len());
    if effective == 0 {
        return HoldingSnapshot {
            month: 0,
            total_paid: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            remaining_debt: schedule.financed_amount,
        };
    }

    let paid = &schedule.entries[..effective];
    HoldingSnapshot {
        month: effective as u32,
        total_paid: paid.iter().map(|e| e.installment).sum(),
        total_interest: paid.iter().map(|e| e.interest).sum(),
        remaining_debt: paid[effective - 1].remaining_debt.max(Decimal::ZERO),
    }
}
