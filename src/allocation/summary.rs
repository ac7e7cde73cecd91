//! Display wrapper around a calculation: results plus totals and a currency symbol.

use serde::Serialize;
use std::fmt::Write as _;

use super::CalculationResult;

/// Symbol for a currency code. Unknown codes fall back to `$`.
pub fn currency_symbol(code: &str) -> &'static str {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "CHF" => "Fr",
        "INR" => "₹",
        _ => "$",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitSummary {
    pub currency: String,
    pub currency_symbol: &'static str,
    pub total_rent: f64,
    pub results: Vec<CalculationResult>,
    /// Sum of the per-room rents; equals `total_rent` up to float error.
    pub allocated: f64,
}

impl SplitSummary {
    pub fn new(total_rent: f64, currency: &str, results: Vec<CalculationResult>) -> Self {
        let allocated = results.iter().map(|r| r.rent).sum();
        Self {
            currency: currency.to_string(),
            currency_symbol: currency_symbol(currency),
            total_rent,
            results,
            allocated,
        }
    }

    /// Plain-text table: room, percentage, rent, and a total row.
    pub fn format_table(&self) -> String {
        let sym = self.currency_symbol;
        let width = self
            .results
            .iter()
            .map(|r| r.room_name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Room".len());

        let mut out = String::new();
        let _ = writeln!(out, "{:<width$}  {:>8}  {:>12}", "Room", "Share", "Rent");
        for r in &self.results {
            let rent = format!("{sym}{:.2}", r.rent);
            let _ = writeln!(
                out,
                "{:<width$}  {:>7.2}%  {:>12}",
                r.room_name, r.percentage, rent
            );
        }
        let total = format!("{sym}{:.2}", self.total_rent);
        let _ = writeln!(out, "{:<width$}  {:>7.2}%  {:>12}", "Total", 100.0, total);
        out
    }
}
