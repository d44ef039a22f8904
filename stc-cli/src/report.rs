//! Plain-text breakdowns of single results for terminal output.

use std::fmt::Write;

use rust_decimal::Decimal;
use stc_core::calculations::format_fixed;
use stc_core::{OptionResult, RsuResult};

const LABEL_WIDTH: usize = 22;

fn money(
    out: &mut String,
    label: &str,
    value: Decimal,
) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}${}", format_fixed(value, 2));
}

fn shares(
    out: &mut String,
    label: &str,
    value: Decimal,
) {
    let _ = writeln!(out, "  {label:<LABEL_WIDTH$}{}", value.normalize());
}

fn taxes(
    out: &mut String,
    lines: [(&str, Decimal); 6],
) {
    for (label, value) in lines {
        money(out, label, value);
    }
}

/// Renders every line of an option exercise result, ending with the
/// one-line summary.
pub fn render_option(result: &OptionResult) -> String {
    let mut out = String::from("Option Exercise\n");

    money(&mut out, "Exercise Price:", result.exercise_price);
    shares(&mut out, "Exercised Shares:", result.exercised_shares);
    money(&mut out, "FMV:", result.fmv);
    money(&mut out, "Option Cost:", result.option_cost);
    money(&mut out, "Taxable Gain:", result.taxable_gain);
    taxes(
        &mut out,
        [
            ("Federal Tax:", result.federal_tax),
            ("Medicare Tax:", result.medicare_tax),
            ("Social Security Tax:", result.social_security_tax),
            ("State Tax:", result.state_tax),
            ("Local Tax:", result.local_tax),
            ("Total Tax:", result.total_tax),
        ],
    );
    money(&mut out, "Broker Commission:", result.broker_commission);
    money(&mut out, "Broker Fees:", result.broker_fees);
    money(&mut out, "Total Costs:", result.total_costs);
    money(&mut out, "Est. Gross Proceeds:", result.est_gross_proceeds);
    let _ = writeln!(out, "{result}");
    out
}

/// Renders every line of an RSU release result, ending with the one-line
/// summary.
pub fn render_rsu(result: &RsuResult) -> String {
    let mut out = String::from("RSU Release\n");

    shares(&mut out, "Shares Released:", result.shares_released);
    money(&mut out, "Vest Price:", result.vest_price);
    money(&mut out, "Sale Price:", result.sale_price);
    money(&mut out, "Taxable Gain:", result.taxable_gain);
    taxes(
        &mut out,
        [
            ("Federal Tax:", result.federal_tax),
            ("Medicare Tax:", result.medicare_tax),
            ("Social Security Tax:", result.social_security_tax),
            ("State Tax:", result.state_tax),
            ("Local Tax:", result.local_tax),
            ("Total Tax:", result.total_tax),
        ],
    );
    money(&mut out, "Broker Commission:", result.broker_commission);
    money(&mut out, "Broker Fees:", result.broker_fees);
    money(&mut out, "Flat Fee:", result.flat_fee);
    money(&mut out, "Total Costs:", result.total_costs);
    money(&mut out, "Est. Gross Proceeds:", result.est_gross_proceeds);
    let _ = writeln!(out, "{result}");
    out
}
