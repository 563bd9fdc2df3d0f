use super::ui;
use crate::core::{Conversion, ConversionRequest, RateProvider, RateTable, convert};
use anyhow::Result;
use tracing::debug;

/// Renders a successful conversion for the terminal.
pub fn display_conversion(conversion: &Conversion) -> String {
    let request = &conversion.request;
    let mut output = format!(
        "{:.2} {} = {} {}",
        request.amount(),
        request.source(),
        ui::style_text(&conversion.to_string(), ui::StyleType::Value),
        ui::style_text(request.target().as_str(), ui::StyleType::Label),
    );
    if request.source() != request.target() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                &format!(
                    "1 {} = {:.4} {}",
                    request.source(),
                    conversion.rate,
                    request.target()
                ),
                ui::StyleType::Subtle
            )
        ));
    }
    output
}

/// Refreshes the rate table once, then converts and prints the result.
pub async fn run<P: RateProvider>(table: &RateTable<P>, request: &ConversionRequest) -> Result<()> {
    if request.source() != request.target() {
        let spinner = ui::new_spinner("Fetching exchange rates...");
        let refreshed = table.refresh().await;
        spinner.finish_and_clear();
        refreshed?;
    } else {
        debug!("Same-currency conversion, skipping rate fetch");
    }

    let conversion = convert(&table.snapshot(), request)?;
    println!("{}", display_conversion(&conversion));
    Ok(())
}
