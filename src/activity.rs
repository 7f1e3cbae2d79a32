use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::calculator::InvestmentResult;
use crate::error::InvestmentError;
use crate::types::InvestmentInput;

pub const CALCULATION_ACTION: &str = "investment_calculation";
pub const CALCULATOR_MODULE: &str = "investment_calculator";

/// Audit record describing something a user did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// What happened, e.g. [`CALCULATION_ACTION`].
    pub action: String,
    /// Screen or feature the action belongs to.
    pub module: String,
    pub details: BTreeMap<String, Value>,
}

impl ActivityEvent {
    /// Event without details.
    pub fn new(action: &str, module: &str) -> Self {
        ActivityEvent {
            action: action.to_string(),
            module: module.to_string(),
            details: BTreeMap::new(),
        }
    }

    /// Adds or replaces one detail.
    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }

    /// Metadata of a finished calculation.
    pub fn calculation(input: &InvestmentInput, result: &InvestmentResult) -> Self {
        let projection = &result.projection;
        ActivityEvent::new(CALCULATION_ACTION, CALCULATOR_MODULE)
            .with_detail("purchase_price", json!(input.purchase_price))
            .with_detail("market_value", json!(input.market_value))
            .with_detail(
                "discount_percentage",
                json!(projection.discount_percentage.round_dp(2)),
            )
            .with_detail("holding_period", input.holding_months)
            .with_detail("estimated_profit", json!(projection.estimated_profit.round_dp(2)))
            .with_detail("roi", json!(projection.total_roi.round_dp(2)))
            .with_detail("table", input.table.to_string())
    }
}

/// Destination for activity events.
pub trait ActivitySink {
    /// Appends `event`.
    fn record(&self, event: &ActivityEvent) -> Result<(), anyhow::Error>;
}

/// Writes events to the `log` facade at info level, details as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl ActivitySink for LogSink {
    fn record(&self, event: &ActivityEvent) -> Result<(), anyhow::Error> {
        let details = serde_json::to_string(&event.details).map_err(InvestmentError::from)?;
        info!(target: "activity", "[{}] {} {}", event.module, event.action, details);
        Ok(())
    }
}
