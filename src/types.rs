use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::InvestmentError;

/// Largest amount accepted for a price, principal or cost.
pub const MAX_AMOUNT: Decimal = dec!(1_000_000_000_000_000);
/// Largest annual rate accepted (1000% per year).
pub const MAX_ANNUAL_RATE: Decimal = dec!(10);
/// Longest loan term accepted, 100 years.
pub const MAX_TERM_MONTHS: u32 = 1200;

/// Amortization system used to build the financing schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmortizationTable {
    /// Sistema Francês: constant installment.
    #[serde(rename = "PRICE")]
    Price,
    /// Sistema de Amortização Constante: constant amortization.
    #[serde(rename = "SAC")]
    Sac,
}

impl fmt::Display for AmortizationTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmortizationTable::Price => write!(f, "PRICE"),
            AmortizationTable::Sac => write!(f, "SAC"),
        }
    }
}

impl FromStr for AmortizationTable {
    type Err = InvestmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PRICE" => Ok(AmortizationTable::Price),
            "SAC" => Ok(AmortizationTable::Sac),
            _ => Err(InvestmentError::invalid("table", "expected PRICE or SAC")),
        }
    }
}

/// Loan parameters for a single schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingInput {
    /// Principal being financed.
    pub financed_amount: Decimal,
    /// Annual interest rate as a fraction (0.1099 for 10.99%).
    pub annual_rate: Decimal,
    /// Number of monthly installments.
    pub term_months: u32,
    /// Amortization system of the loan.
    pub table: AmortizationTable,
}

impl FinancingInput {
    /// Checks that amount, rate and term are positive and within
    /// [`MAX_AMOUNT`], [`MAX_ANNUAL_RATE`] and [`MAX_TERM_MONTHS`].
    pub fn validate(&self) -> Result<(), InvestmentError> {
        if self.financed_amount <= Decimal::ZERO {
            return Err(InvestmentError::invalid("financed_amount", "must be positive"));
        }
        if self.financed_amount > MAX_AMOUNT {
            return Err(InvestmentError::invalid("financed_amount", "value too large"));
        }
        if self.annual_rate <= Decimal::ZERO {
            return Err(InvestmentError::invalid("annual_rate", "must be positive"));
        }
        if self.annual_rate > MAX_ANNUAL_RATE {
            return Err(InvestmentError::invalid("annual_rate", "value too large"));
        }
        if self.term_months == 0 {
            return Err(InvestmentError::invalid("term_months", "must be at least one month"));
        }
        if self.term_months > MAX_TERM_MONTHS {
            return Err(InvestmentError::invalid("term_months", "longer than 1200 months"));
        }
        Ok(())
    }

    /// Simple division of the annual rate, no compounding conversion.
    pub fn monthly_rate(&self) -> Decimal {
        self.annual_rate / dec!(12)
    }
}

/// Acquisition and transaction costs. Anything left out counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostInputs {
    /// Down payment made at purchase.
    pub entry_value: Decimal,
    /// ITBI, the municipal transfer tax.
    pub itbi: Decimal,
    /// Notary and registry fees.
    pub documentation: Decimal,
    /// Commission paid on resale, taken out of the sale proceeds.
    pub brokerage: Decimal,
    /// Works done before the resale.
    pub renovation: Decimal,
    /// Recurring charges (condominium, IPTU, utilities) per month held.
    pub monthly_expenses: Decimal,
}

impl CostInputs {
    /// Every cost must lie between zero and [`MAX_AMOUNT`].
    pub fn validate(&self) -> Result<(), InvestmentError> {
        let fields = [
            ("entry_value", self.entry_value),
            ("itbi", self.itbi),
            ("documentation", self.documentation),
            ("brokerage", self.brokerage),
            ("renovation", self.renovation),
            ("monthly_expenses", self.monthly_expenses),
        ];
        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(InvestmentError::invalid(field, "cannot be negative"));
            }
            if value > MAX_AMOUNT {
                return Err(InvestmentError::invalid(field, "value too large"));
            }
        }
        Ok(())
    }
}

/// How the down payment was entered on the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "amount", rename_all = "snake_case")]
pub enum EntryPayment {
    /// Amount in currency.
    Value(Decimal),
    /// Percentage points of the purchase price (20 means 20%).
    PercentOfPrice(Decimal),
}

impl EntryPayment {
    /// Entry value in currency for a property bought at `purchase_price`.
    pub fn resolve(&self, purchase_price: Decimal) -> Decimal {
        match *self {
            EntryPayment::Value(value) => value,
            EntryPayment::PercentOfPrice(percent) => purchase_price * percent / dec!(100),
        }
    }
}

/// Everything the investment calculator form collects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInput {
    /// Price paid for the property.
    pub purchase_price: Decimal,
    /// Expected resale value.
    pub market_value: Decimal,
    /// Down payment, as a value or a share of the price.
    pub entry: EntryPayment,
    /// Annual interest rate as a fraction.
    pub annual_rate: Decimal,
    /// Loan term in months.
    pub term_months: u32,
    /// Months between purchase and resale.
    pub holding_months: u32,
    /// Amortization system of the loan.
    pub table: AmortizationTable,
    /// `entry_value` is replaced by the resolved `entry`.
    #[serde(default)]
    pub costs: CostInputs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("PRICE", AmortizationTable::Price)]
    #[case("price", AmortizationTable::Price)]
    #[case(" Sac ", AmortizationTable::Sac)]
    fn test_table_from_form_value(#[case] value: &str, #[case] expected: AmortizationTable) {
        assert_eq!(value.parse::<AmortizationTable>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        assert!("SACRE".parse::<AmortizationTable>().is_err());
    }

    #[test]
    fn test_table_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&AmortizationTable::Sac).unwrap(), r#""SAC""#);
        assert_eq!(AmortizationTable::Price.to_string(), "PRICE");
    }

    #[rstest]
    #[case(EntryPayment::Value(dec!(45000)), dec!(45000))]
    #[case(EntryPayment::PercentOfPrice(dec!(20)), dec!(60000))]
    #[case(EntryPayment::PercentOfPrice(dec!(0)), dec!(0))]
    fn test_entry_resolution(#[case] entry: EntryPayment, #[case] expected: Decimal) {
        assert_eq!(entry.resolve(dec!(300000)), expected);
    }

    #[test]
    fn test_missing_costs_default_to_zero() {
        let costs: CostInputs = serde_json::from_str(r#"{ "itbi": "9000" }"#).unwrap();
        assert_eq!(
            costs,
            CostInputs {
                itbi: dec!(9000),
                ..CostInputs::default()
            }
        );
    }

    #[rstest]
    #[case::itbi(|c: &mut CostInputs| c.itbi = dec!(2_000_000_000_000_000), "itbi")]
    #[case::monthly(
        |c: &mut CostInputs| c.monthly_expenses = dec!(100_000_000_000_000_000_000_000_000),
        "monthly_expenses"
    )]
    fn test_oversized_cost_is_rejected(#[case] inflate: fn(&mut CostInputs), #[case] field: &str) {
        let mut costs = CostInputs::default();
        inflate(&mut costs);
        assert_eq!(
            costs.validate(),
            Err(InvestmentError::invalid(field, "value too large"))
        );
    }

    #[test]
    fn test_monthly_rate_is_simple_division() {
        let input = FinancingInput {
            financed_amount: dec!(1000),
            annual_rate: dec!(0.12),
            term_months: 12,
            table: AmortizationTable::Sac,
        };
        assert_eq!(input.monthly_rate(), dec!(0.01));
    }
}
