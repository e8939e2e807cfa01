//! Plain-text rendering of a [`RiskReport`].

use std::collections::BTreeMap;

use crime_risk_analytics_models::RiskReport;
use crime_risk_geography_models::AreaCode;

/// One table row per area: code, incident total, predicted tier.
pub fn render_table(report: &RiskReport) -> String {
    let tiers: BTreeMap<AreaCode, String> = report
        .predictions
        .iter()
        .map(|p| (p.area_code, p.tier.to_string()))
        .collect();

    let mut out = format!("{:<8} {:>8}  TIER\n", "ZIP", "COUNT");
    out.push_str(&"-".repeat(30));
    out.push('\n');

    for count in &report.area_counts {
        let tier = tiers.get(&count.area_code).map_or("-", String::as_str);
        out.push_str(&format!(
            "{:<8} {:>8}  {tier}\n",
            count.area_code.to_string(),
            count.total_incidents
        ));
    }

    if report.area_counts.is_empty() {
        out.push_str("(no matching areas)\n");
    }

    out
}

pub fn print_table(report: &RiskReport) {
    print!("{}", render_table(report));
}
