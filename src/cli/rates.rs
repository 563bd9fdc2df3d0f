use super::ui;
use crate::core::{CurrencyCode, FxError, RateProvider, RateSnapshot, RateTable};
use anyhow::Result;
use comfy_table::Cell;

impl RateSnapshot {
    pub fn display_as_table(&self, currencies: &[CurrencyCode]) -> String {
        let base = self.base();
        let mut table = ui::new_styled_table();

        table.set_header(vec![
            ui::header_cell("Currency"),
            ui::header_cell(&format!("Per 1 {base}")),
            ui::header_cell(&format!("In {base}")),
        ]);

        for code in currencies {
            let (rate, inverse) = match (self.cross_rate(base, code), self.cross_rate(code, base)) {
                (Ok(rate), Ok(inverse)) => (
                    ui::number_cell(format!("{rate:.4}")),
                    ui::number_cell(format!("{inverse:.6}")),
                ),
                (Err(FxError::RateUnavailable(_)), _) | (_, Err(FxError::RateUnavailable(_))) => {
                    (ui::na_cell(false), ui::na_cell(false))
                }
                _ => (ui::na_cell(true), ui::na_cell(true)),
            };
            table.add_row(vec![Cell::new(code.as_str()), rate, inverse]);
        }

        let mut output = format!(
            "Exchange rates: {}\n\n",
            ui::style_text(base.as_str(), ui::StyleType::Title)
        );
        output.push_str(&table.to_string());

        let updated = self
            .last_updated()
            .or(self.fetched_at())
            .map_or("never".to_string(), |t| t.format("%Y-%m-%d %H:%M UTC").to_string());
        output.push_str(&format!(
            "\n\n{}",
            ui::style_text(&format!("Last updated: {updated}"), ui::StyleType::Subtle)
        ));
        output
    }
}

/// Refreshes the rate table once and prints rates for `currencies`, or the
/// common set when none are given.
pub async fn run<P: RateProvider>(table: &RateTable<P>, currencies: &[CurrencyCode]) -> Result<()> {
    let spinner = ui::new_spinner("Fetching exchange rates...");
    let refreshed = table.refresh().await;
    spinner.finish_and_clear();
    refreshed?;

    let currencies = if currencies.is_empty() {
        CurrencyCode::common()
    } else {
        currencies.to_vec()
    };
    println!("{}", table.snapshot().display_as_table(&currencies));
    Ok(())
}
