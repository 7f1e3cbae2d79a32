use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a calculation is refused. Public operations return them wrapped in
/// `anyhow::Error`; use `downcast_ref::<InvestmentError>()` to match on them.
#[derive(Debug, Error, PartialEq)]
pub enum InvestmentError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("Nothing to finance: entry of {entry_value} covers purchase price {purchase_price}")]
    DegenerateFinancing {
        purchase_price: Decimal,
        entry_value: Decimal,
    },

    #[error("Division by zero in {context}")]
    DivisionByZero { context: String },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl InvestmentError {
    /// Shorthand for [`InvestmentError::InvalidInput`].
    pub fn invalid(field: &str, reason: &str) -> Self {
        InvestmentError::InvalidInput {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn overflow(context: &str) -> Self {
        InvestmentError::Overflow {
            context: context.to_string(),
        }
    }
}

impl From<serde_json::Error> for InvestmentError {
    fn from(e: serde_json::Error) -> Self {
        InvestmentError::Serialization(e.to_string())
    }
}
