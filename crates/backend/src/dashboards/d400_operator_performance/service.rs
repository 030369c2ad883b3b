use anyhow::Result;
use contracts::dashboards::d400_operator_performance::dto::{
    OperatorPerformanceRequest, OperatorPerformanceResponse,
};
use std::time::Instant;

use super::aggregator::{self, AggregatorInput};
use super::repository;
use crate::shared::error::validation_error;
use crate::shared::format::format_money;

/// Per-operator revenue for the requested period
pub async fn get_operator_performance(
    request: OperatorPerformanceRequest,
) -> Result<OperatorPerformanceResponse> {
    if request.date_from > request.date_to {
        return Err(validation_error("date_from must not be after date_to"));
    }

    let started = Instant::now();
    let date_from = request.date_from.format("%Y-%m-%d").to_string();
    let date_to = request.date_to.format("%Y-%m-%d").to_string();
    let operator_id = request
        .operator_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    // Independent reads; any failure aborts the whole report
    let (visits, sales, branches, customers, operators) = tokio::try_join!(
        repository::get_completed_visits(&date_from, &date_to, operator_id),
        repository::get_sales_in_period(&date_from, &date_to),
        repository::get_branch_prices(),
        repository::get_customer_prices(),
        repository::get_operators(operator_id),
    )?;

    let output = aggregator::aggregate(&AggregatorInput {
        visits,
        sales,
        branches,
        customers,
        operators,
    });

    tracing::info!(
        "Operator performance {}..{}: {} operators, {} visits, total {} ({} ms)",
        date_from,
        date_to,
        output.rows.len(),
        output.totals.total_visits,
        format_money(output.totals.total_revenue),
        started.elapsed().as_millis()
    );

    Ok(OperatorPerformanceResponse {
        date_from: request.date_from,
        date_to: request.date_to,
        rows: output.rows,
        totals: output.totals,
        unattributed_material_revenue: output.unattributed_material_revenue,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{a006_material_sale, fixtures};
    use crate::shared::data::db::test_support::with_database;
    use chrono::NaiveDate;
    use contracts::domain::a004_visit::aggregate::VisitStatus;

    fn march(operator_id: Option<&str>) -> OperatorPerformanceRequest {
        OperatorPerformanceRequest {
            date_from: NaiveDate::from_ymd_opt(2031, 3, 1).unwrap(),
            date_to: NaiveDate::from_ymd_opt(2031, 3, 31).unwrap(),
            operator_id: operator_id.map(str::to_string),
        }
    }

    #[test]
    fn test_report_reads_window_status_and_filters_from_database() {
        with_database(async {
            let customer = fixtures::customer(Some(900.0)).await;
            let branch = fixtures::branch(&customer).await;
            let ayse = fixtures::operator("Ayse Kaya", true).await;
            let burak = fixtures::operator("Burak Demir", true).await;
            let cem = fixtures::operator("Cem Arslan", false).await;

            let first =
                fixtures::visit(&customer, &branch, &ayse, "2031-03-01T09:00:00Z", VisitStatus::Completed).await;
            let second =
                fixtures::visit(&customer, &branch, &ayse, "2031-03-15T10:00:00Z", VisitStatus::Completed).await;
            // Late evening on the last day still belongs to the window
            let last =
                fixtures::visit(&customer, &branch, &ayse, "2031-03-31T23:30:00Z", VisitStatus::Completed).await;
            let planned =
                fixtures::visit(&customer, &branch, &ayse, "2031-03-10T09:00:00Z", VisitStatus::Planned).await;
            fixtures::visit(&customer, &branch, &ayse, "2031-03-12T09:00:00Z", VisitStatus::Cancelled).await;
            fixtures::visit(&customer, &branch, &ayse, "2031-04-01T00:10:00Z", VisitStatus::Completed).await;
            fixtures::visit(&customer, &branch, &burak, "2031-03-20T14:00:00Z", VisitStatus::Completed).await;

            fixtures::sale(&first, 150.0).await;
            fixtures::sale(&last, 50.0).await;
            fixtures::sale(&planned, 70.0).await;
            let deleted = fixtures::sale(&second, 500.0).await;
            assert!(a006_material_sale::service::delete(deleted).await.unwrap());

            let report = get_operator_performance(march(None)).await.unwrap();

            let row = |id: &str| report.rows.iter().find(|r| r.operator_id == id);
            let ayse_row = row(&ayse).expect("row for active operator");
            assert_eq!(ayse_row.operator_name, "Ayse Kaya");
            assert_eq!(ayse_row.total_visits, 3);
            assert_eq!(ayse_row.paid_visits, 3);
            assert_eq!(ayse_row.visit_revenue, 900.0);
            assert_eq!(ayse_row.material_revenue, 200.0);
            assert_eq!(ayse_row.total_revenue, 1100.0);

            let burak_row = row(&burak).expect("row for second operator");
            assert_eq!(burak_row.total_visits, 1);
            assert_eq!(burak_row.total_revenue, 900.0);

            // Inactive operator without visits is hidden
            assert!(row(&cem).is_none());
            assert_eq!(report.totals.total_visits, 4);
            assert_eq!(report.unattributed_material_revenue, 70.0);

            let filtered = get_operator_performance(march(Some(&burak))).await.unwrap();
            assert_eq!(filtered.rows.len(), 1);
            assert_eq!(filtered.rows[0].operator_id, burak);
            assert_eq!(filtered.totals.total_visits, 1);
            assert_eq!(filtered.totals.total_revenue, 900.0);
        });
    }

    #[test]
    fn test_reversed_period_is_rejected() {
        with_database(async {
            let request = OperatorPerformanceRequest {
                date_from: NaiveDate::from_ymd_opt(2031, 3, 31).unwrap(),
                date_to: NaiveDate::from_ymd_opt(2031, 3, 1).unwrap(),
                operator_id: None,
            };
            let err = get_operator_performance(request).await.unwrap_err();
            assert!(err.to_string().contains("date_from"));
        });
    }
}
