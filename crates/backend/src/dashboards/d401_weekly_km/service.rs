use anyhow::Result;
use contracts::dashboards::d401_weekly_km::dto::{
    WeeklyKmSummaryRequest, WeeklyKmSummaryResponse, WeeklyKmSummaryRow,
};
use std::collections::HashMap;

use super::repository::{self, KmEntryRow};
use crate::shared::error::validation_error;
use crate::shared::format::format_number;

/// Sum distance per operator, sorted by operator name
pub fn summarize(entries: &[KmEntryRow]) -> Vec<WeeklyKmSummaryRow> {
    let mut by_operator: HashMap<&str, WeeklyKmSummaryRow> = HashMap::new();

    for entry in entries {
        let row = by_operator
            .entry(entry.operator_id.as_str())
            .or_insert_with(|| WeeklyKmSummaryRow {
                operator_id: entry.operator_id.clone(),
                operator_name: entry
                    .operator_name
                    .clone()
                    .unwrap_or_else(|| entry.operator_id.clone()),
                entries: 0,
                total_km: 0,
            });
        row.entries += 1;
        row.total_km += entry.end_km - entry.start_km;
    }

    let mut rows: Vec<WeeklyKmSummaryRow> = by_operator.into_values().collect();
    rows.sort_by(|a, b| {
        a.operator_name
            .cmp(&b.operator_name)
            .then_with(|| a.operator_id.cmp(&b.operator_id))
    });
    rows
}

pub async fn get_weekly_km_summary(request: WeeklyKmSummaryRequest) -> Result<WeeklyKmSummaryResponse> {
    if request.date_from > request.date_to {
        return Err(validation_error("date_from must not be after date_to"));
    }

    let date_from = request.date_from.format("%Y-%m-%d").to_string();
    let date_to = request.date_to.format("%Y-%m-%d").to_string();
    let operator_id = request
        .operator_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let entries = repository::get_entries(&date_from, &date_to, operator_id).await?;
    let rows = summarize(&entries);
    let total_km = rows.iter().map(|r| r.total_km).sum();

    tracing::info!(
        "Weekly km {}..{}: {} entries, {} km",
        date_from,
        date_to,
        format_number(entries.len()),
        total_km
    );

    Ok(WeeklyKmSummaryResponse {
        date_from: request.date_from,
        date_to: request.date_to,
        rows,
        total_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(operator_id: &str, name: Option<&str>, start: i64, end: i64) -> KmEntryRow {
        KmEntryRow {
            operator_id: operator_id.into(),
            operator_name: name.map(Into::into),
            start_km: start,
            end_km: end,
        }
    }

    #[test]
    fn test_summarize_groups_by_operator() {
        let rows = summarize(&[
            entry("o2", Some("Zeynep"), 1000, 1350),
            entry("o1", Some("Ali"), 500, 620),
            entry("o2", Some("Zeynep"), 1350, 1500),
        ]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].operator_name, "Ali");
        assert_eq!(rows[0].total_km, 120);
        assert_eq!(rows[1].entries, 2);
        assert_eq!(rows[1].total_km, 500);
    }

    #[test]
    fn test_unknown_operator_named_by_id() {
        let rows = summarize(&[entry("o9", None, 0, 10)]);
        assert_eq!(rows[0].operator_name, "o9");
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize(&[]).is_empty());
    }
}
