use log::debug;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::InvestmentError;
use crate::types::{AmortizationTable, FinancingInput};

/// Payment details for a single month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodEntry {
    /// 1-based installment number.
    pub month: u32,
    /// Total paid this month.
    pub installment: Decimal,
    /// Interest on the balance before this installment.
    pub interest: Decimal,
    /// Principal repaid this month.
    pub amortization: Decimal,
    /// Balance after this installment, floored at zero.
    pub remaining_debt: Decimal,
}

/// Full month-by-month schedule of a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Principal at month 0.
    pub financed_amount: Decimal,
    pub table: AmortizationTable,
    /// One entry per month, in order.
    pub entries: Vec<PeriodEntry>,
}

impl Schedule {
    /// Number of installments.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every installment over the whole term.
    pub fn total_paid(&self) -> Decimal {
        self.entries.iter().map(|e| e.installment).sum()
    }

    /// Sum of the interest portions over the whole term.
    pub fn total_interest(&self) -> Decimal {
        self.entries.iter().map(|e| e.interest).sum()
    }
}

/// Builds the schedule for `input`, one entry per month of the term.
///
/// The running balance is never clamped, so interest is always charged on the
/// true outstanding principal. Only the reported `remaining_debt` is floored at
/// zero, which hides the sub-cent overshoot left by the last installment.
///
/// # Errors
///
/// Returns [`InvestmentError::InvalidInput`] when the amount, rate or term is not
/// positive or above its maximum, before any entry is produced.
/// [`InvestmentError::Overflow`] if the compounded rate does not fit a `Decimal`.
pub fn compute_schedule(input: &FinancingInput) -> Result<Schedule, anyhow::Error> {
    input.validate()?;

    let monthly_rate = input.monthly_rate();
    let entries = match input.table {
        AmortizationTable::Price => {
            price_entries(input.financed_amount, monthly_rate, input.term_months)?
        }
        AmortizationTable::Sac => {
            sac_entries(input.financed_amount, monthly_rate, input.term_months)?
        }
    };

    debug!(
        "built {} schedule: {} months on {} at {} per month",
        input.table, input.term_months, input.financed_amount, monthly_rate
    );

    Ok(Schedule {
        financed_amount: input.financed_amount,
        table: input.table,
        entries,
    })
}

/// Fixed installment of the Price table: PMT = P * [i(1 + i)^n] / [(1 + i)^n - 1]
pub fn price_installment(
    financed_amount: Decimal,
    monthly_rate: Decimal,
    term_months: u32,
) -> Result<Decimal, InvestmentError> {
    let overflow = || InvestmentError::overflow("price installment");

    let i_plus_1_pow_n = dec!(1)
        .checked_add(monthly_rate)
        .and_then(|base| base.checked_powu(term_months.into()))
        .ok_or_else(overflow)?;

    let factor = monthly_rate
        .checked_mul(i_plus_1_pow_n)
        .ok_or_else(overflow)?
        .checked_div(i_plus_1_pow_n - dec!(1))
        .ok_or_else(|| InvestmentError::DivisionByZero {
            context: "price installment".to_string(),
        })?;

    financed_amount.checked_mul(factor).ok_or_else(overflow)
}

fn price_entries(
    financed_amount: Decimal,
    monthly_rate: Decimal,
    term_months: u32,
) -> Result<Vec<PeriodEntry>, InvestmentError> {
    let installment = price_installment(financed_amount, monthly_rate, term_months)?;
    let overflow = || InvestmentError::overflow("price schedule");

    let mut current_balance = financed_amount;
    let mut entries = Vec::with_capacity(term_months as usize);

    for month in 1..=term_months {
        let interest = current_balance.checked_mul(monthly_rate).ok_or_else(overflow)?;
        let amortization = installment.checked_sub(interest).ok_or_else(overflow)?;
        current_balance = current_balance.checked_sub(amortization).ok_or_else(overflow)?;
        entries.push(PeriodEntry {
            month,
            installment,
            interest,
            amortization,
            remaining_debt: current_balance.max(Decimal::ZERO),
        });
    }

    Ok(entries)
}

fn sac_entries(
    financed_amount: Decimal,
    monthly_rate: Decimal,
    term_months: u32,
) -> Result<Vec<PeriodEntry>, InvestmentError> {
    let amortization = financed_amount
        .checked_div(Decimal::from(term_months))
        .ok_or_else(|| InvestmentError::DivisionByZero {
            context: "sac amortization".to_string(),
        })?;
    let overflow = || InvestmentError::overflow("sac schedule");

    let mut current_balance = financed_amount;
    let mut entries = Vec::with_capacity(term_months as usize);

    for month in 1..=term_months {
        let interest = current_balance.checked_mul(monthly_rate).ok_or_else(overflow)?;
        let installment = amortization.checked_add(interest).ok_or_else(overflow)?;
        current_balance = current_balance.checked_sub(amortization).ok_or_else(overflow)?;
        entries.push(PeriodEntry {
            month,
            installment,
            interest,
            amortization,
            remaining_debt: current_balance.max(Decimal::ZERO),
        });
    }

    Ok(entries)
}

/// Headline figures of a schedule, rounded to cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub table: AmortizationTable,
    /// Highest installment under SAC.
    pub first_installment: Decimal,
    pub last_installment: Decimal,
    pub total_paid: Decimal,
    pub total_interest: Decimal,
}

impl From<&Schedule> for ScheduleSummary {
    fn from(schedule: &Schedule) -> Self {
        let first = schedule.entries.first().map(|e| e.installment);
        let last = schedule.entries.last().map(|e| e.installment);

        ScheduleSummary {
            table: schedule.table,
            first_installment: first.unwrap_or_default().round_dp(2),
            last_installment: last.unwrap_or_default().round_dp(2),
            total_paid: schedule.total_paid().round_dp(2),
            total_interest: schedule.total_interest().round_dp(2),
        }
    }
}

/// PRICE and SAC side by side for the same loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableComparison {
    pub financed_amount: Decimal,
    pub price: ScheduleSummary,
    pub sac: ScheduleSummary,
}

impl TableComparison {
    /// Interest saved by choosing SAC over PRICE.
    pub fn sac_interest_savings(&self) -> Decimal {
        self.price.total_interest - self.sac.total_interest
    }
}

/// Runs both amortization systems on the same loan and summarizes each.
///
/// # Errors
///
/// Same as [`compute_schedule`].
pub fn compare_tables(
    financed_amount: Decimal,
    annual_rate: Decimal,
    term_months: u32,
) -> Result<TableComparison, anyhow::Error> {
    let input = |table| FinancingInput {
        financed_amount,
        annual_rate,
        term_months,
        table,
    };

    let price = compute_schedule(&input(AmortizationTable::Price))?;
    let sac = compute_schedule(&input(AmortizationTable::Sac))?;

    Ok(TableComparison {
        financed_amount,
        price: ScheduleSummary::from(&price),
        sac: ScheduleSummary::from(&sac),
    })
}
