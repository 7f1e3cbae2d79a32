//! `br_investment` projects the outcome of buying a financed property in Brazil
//! and reselling it after a holding period.
//!
//! Financing follows one of the two amortization systems used by Brazilian banks:
//! - **SAC (Sistema de Amortização Constante)**: fixed amortization, so installments
//!   decrease over time.
//! - **Price (Sistema Francês de Amortização)**: fixed installments for the whole term.
//!
//! On top of the schedule the crate accumulates what was paid up to the resale month,
//! turns acquisition and transaction costs into profit and ROI, and repeats the
//! analysis every six months to compare exit timings.
//!
//! ## Usage
//!
//! ```rust
//! use br_investment::{
//!     calculate_investment, AmortizationTable, CostInputs, EntryPayment, InvestmentInput,
//! };
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let input = InvestmentInput {
//!         purchase_price: dec!(300_000),
//!         market_value: dec!(450_000),
//!         entry: EntryPayment::PercentOfPrice(dec!(20)),
//!         annual_rate: dec!(0.1099),
//!         term_months: 360,
//!         holding_months: 24,
//!         table: AmortizationTable::Sac,
//!         costs: CostInputs {
//!             brokerage: dec!(27_000),
//!             ..CostInputs::default()
//!         },
//!     };
//!
//!     match calculate_investment(&input) {
//!         Ok(result) => {
//!             println!("Discount:   {:.2}%", result.projection.discount_percentage);
//!             println!("Profit:     {:.2}", result.projection.estimated_profit);
//!             println!("Total ROI:  {:.2}%", result.projection.total_roi);
//!             for row in &result.timeline {
//!                 println!("month {:>2}: {:.2}", row.month, row.profit);
//!             }
//!         }
//!         Err(e) => {
//!             eprintln!("Error calculating investment: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod activity;
pub mod calculator;
pub mod currency;
pub mod error;
pub mod holding;
pub mod projection;
pub mod schedule;
pub mod timeline;
pub mod types;

pub use activity::{ActivityEvent, ActivitySink, LogSink};
pub use calculator::{
    InvestmentResult, calculate_and_record, calculate_and_record_with, calculate_investment,
    calculate_investment_with,
};
pub use currency::{parse_locale_currency, parse_locale_percentage, try_parse_locale_currency};
pub use error::InvestmentError;
pub use holding::{HoldingSnapshot, aggregate_to_month};
pub use projection::{OutcomeProjection, project_outcome};
pub use schedule::{
    PeriodEntry, Schedule, ScheduleSummary, TableComparison, compare_tables, compute_schedule,
};
pub use timeline::{
    TimelineRow, TimelineSettings, build_timeline, build_timeline_for_schedule,
    build_timeline_with,
};
pub use types::{
    AmortizationTable, CostInputs, EntryPayment, FinancingInput, InvestmentInput, MAX_AMOUNT,
    MAX_ANNUAL_RATE, MAX_TERM_MONTHS,
};
