//! In-memory join of visits, price lists and material sales into
//! per-operator revenue.
//!
//! Unit price precedence for the visits of one operator at one branch:
//! branch per-visit, customer per-visit, branch monthly / visit count,
//! customer monthly / visit count. Prices of zero or below are unset.

use std::collections::{BTreeMap, HashMap};

use contracts::dashboards::d400_operator_performance::dto::{
    OperatorPerformanceRow, OperatorPerformanceTotals,
};
use contracts::domain::common::Pricing;

use super::repository::{BranchPriceRow, CustomerPriceRow, OperatorRow, SaleRow, VisitRow};

/// Everything the report needs, already narrowed to the period
#[derive(Debug, Clone, Default)]
pub struct AggregatorInput {
    /// Completed visits in the period (after the operator filter)
    pub visits: Vec<VisitRow>,
    /// Sales on visits dated in the period
    pub sales: Vec<SaleRow>,
    pub branches: Vec<BranchPriceRow>,
    pub customers: Vec<CustomerPriceRow>,
    pub operators: Vec<OperatorRow>,
}

#[derive(Debug, Clone, Default)]
pub struct AggregatorOutput {
    pub rows: Vec<OperatorPerformanceRow>,
    pub totals: OperatorPerformanceTotals,
    pub unattributed_material_revenue: f64,
}

fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Per-visit price for a group of `visit_count` visits at one branch
pub fn unit_price(
    branch_price: Option<&Pricing>,
    customer_price: Option<&Pricing>,
    visit_count: u32,
) -> f64 {
    if let Some(price) = branch_price.and_then(Pricing::per_visit) {
        return price;
    }
    if let Some(price) = customer_price.and_then(Pricing::per_visit) {
        return price;
    }
    if visit_count == 0 {
        return 0.0;
    }
    let monthly = branch_price
        .and_then(Pricing::monthly)
        .or_else(|| customer_price.and_then(Pricing::monthly));
    match monthly {
        Some(price) => price / visit_count as f64,
        None => 0.0,
    }
}

#[derive(Default)]
struct Accumulator {
    material_revenue: f64,
    visit_revenue: f64,
    total_visits: u32,
    paid_visits: u32,
}

pub fn aggregate(input: &AggregatorInput) -> AggregatorOutput {
    let branch_to_customer: HashMap<&str, &str> = input
        .branches
        .iter()
        .map(|b| (b.branch_id.as_str(), b.customer_id.as_str()))
        .collect();
    let branch_price: HashMap<&str, Pricing> = input
        .branches
        .iter()
        .map(|b| (b.branch_id.as_str(), b.pricing()))
        .collect();
    let customer_price: HashMap<&str, Pricing> = input
        .customers
        .iter()
        .map(|c| (c.customer_id.as_str(), c.pricing()))
        .collect();

    let visit_to_operator: HashMap<&str, &str> = input
        .visits
        .iter()
        .map(|v| (v.visit_id.as_str(), v.operator_id.as_str()))
        .collect();

    // operator -> branch -> visit count; BTreeMap keeps the summation order stable
    let mut groups: BTreeMap<&str, BTreeMap<&str, u32>> = BTreeMap::new();
    for visit in &input.visits {
        *groups
            .entry(visit.operator_id.as_str())
            .or_default()
            .entry(visit.branch_id.as_str())
            .or_default() += 1;
    }

    let mut acc: HashMap<&str, Accumulator> = HashMap::new();

    let mut unattributed = 0.0;
    for sale in &input.sales {
        match visit_to_operator.get(sale.visit_id.as_str()) {
            Some(operator_id) => {
                acc.entry(*operator_id).or_default().material_revenue += sale.total_amount;
            }
            None => unattributed += sale.total_amount,
        }
    }

    for (operator_id, by_branch) in &groups {
        let entry = acc.entry(*operator_id).or_default();
        for (branch_id, &count) in by_branch {
            let customer = branch_to_customer
                .get(branch_id)
                .and_then(|customer_id| customer_price.get(customer_id));
            let price = unit_price(branch_price.get(branch_id), customer, count);

            entry.visit_revenue += price * count as f64;
            entry.total_visits += count;
            if price > 0.0 {
                entry.paid_visits += count;
            }
        }
    }

    let mut names: HashMap<&str, &str> = HashMap::new();
    for op in &input.operators {
        names.insert(op.operator_id.as_str(), op.operator_name.as_str());
        // Inactive operators only show up when they have something to report
        if op.is_active {
            acc.entry(op.operator_id.as_str()).or_default();
        }
    }

    let mut rows: Vec<OperatorPerformanceRow> = acc
        .into_iter()
        .map(|(operator_id, a)| {
            let material_revenue = round_money(a.material_revenue);
            let visit_revenue = round_money(a.visit_revenue);
            OperatorPerformanceRow {
                operator_id: operator_id.to_string(),
                operator_name: names.get(operator_id).unwrap_or(&operator_id).to_string(),
                material_revenue,
                visit_revenue,
                total_revenue: round_money(material_revenue + visit_revenue),
                total_visits: a.total_visits,
                paid_visits: a.paid_visits,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total_revenue
            .total_cmp(&a.total_revenue)
            .then_with(|| a.operator_name.cmp(&b.operator_name))
    });

    let mut totals = OperatorPerformanceTotals::default();
    for row in &rows {
        totals.material_revenue += row.material_revenue;
        totals.visit_revenue += row.visit_revenue;
        totals.total_visits += row.total_visits;
        totals.paid_visits += row.paid_visits;
    }
    totals.material_revenue = round_money(totals.material_revenue);
    totals.visit_revenue = round_money(totals.visit_revenue);
    totals.total_revenue = round_money(totals.material_revenue + totals.visit_revenue);

    AggregatorOutput {
        rows,
        totals,
        unattributed_material_revenue: round_money(unattributed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(id: &str, operator: &str, branch: &str) -> VisitRow {
        VisitRow {
            visit_id: id.into(),
            operator_id: operator.into(),
            branch_id: branch.into(),
        }
    }

    fn sale(visit_id: &str, amount: f64) -> SaleRow {
        SaleRow {
            visit_id: visit_id.into(),
            total_amount: amount,
        }
    }

    fn branch(id: &str, customer: &str, monthly: Option<f64>, per_visit: Option<f64>) -> BranchPriceRow {
        BranchPriceRow {
            branch_id: id.into(),
            customer_id: customer.into(),
            monthly_price: monthly,
            per_visit_price: per_visit,
        }
    }

    fn customer(id: &str, monthly: Option<f64>, per_visit: Option<f64>) -> CustomerPriceRow {
        CustomerPriceRow {
            customer_id: id.into(),
            monthly_price: monthly,
            per_visit_price: per_visit,
        }
    }

    fn operator(id: &str, name: &str) -> OperatorRow {
        OperatorRow {
            operator_id: id.into(),
            operator_name: name.into(),
            is_active: true,
        }
    }

    fn row<'a>(out: &'a AggregatorOutput, operator_id: &str) -> &'a OperatorPerformanceRow {
        out.rows
            .iter()
            .find(|r| r.operator_id == operator_id)
            .expect("row for operator")
    }

    #[test]
    fn test_monthly_price_split_across_visits() {
        let input = AggregatorInput {
            visits: vec![visit("v1", "A", "X"), visit("v2", "A", "X"), visit("v3", "A", "X")],
            sales: vec![sale("v1", 150.0), sale("v2", 50.0)],
            branches: vec![branch("X", "C1", None, None)],
            customers: vec![customer("C1", Some(900.0), None)],
            operators: vec![operator("A", "Alice")],
        };

        let out = aggregate(&input);
        let a = row(&out, "A");
        assert_eq!(a.visit_revenue, 900.0);
        assert_eq!(a.material_revenue, 200.0);
        assert_eq!(a.total_revenue, 1100.0);
        assert_eq!(a.total_visits, 3);
        assert_eq!(a.paid_visits, 3);
    }

    #[test]
    fn test_unpriced_visits_are_unpaid() {
        let input = AggregatorInput {
            visits: vec![visit("v1", "B", "Y"), visit("v2", "B", "Y")],
            branches: vec![branch("Y", "C2", None, None)],
            customers: vec![customer("C2", None, None)],
            operators: vec![operator("B", "Bob")],
            ..Default::default()
        };

        let out = aggregate(&input);
        let b = row(&out, "B");
        assert_eq!(b.visit_revenue, 0.0);
        assert_eq!(b.total_revenue, 0.0);
        assert_eq!(b.paid_visits, 0);
        assert_eq!(b.total_visits, 2);
    }

    #[test]
    fn test_operator_without_visits_has_zero_row() {
        let input = AggregatorInput {
            visits: vec![visit("v1", "A", "X")],
            branches: vec![branch("X", "C1", None, Some(100.0))],
            operators: vec![operator("A", "Alice"), operator("Z", "Zoe")],
            ..Default::default()
        };

        let out = aggregate(&input);
        let z = row(&out, "Z");
        assert_eq!(z.total_revenue, 0.0);
        assert_eq!(z.total_visits, 0);
        assert_eq!(z.paid_visits, 0);
    }

    #[test]
    fn test_branch_per_visit_beats_customer_monthly() {
        let input = AggregatorInput {
            visits: vec![visit("v1", "A", "X"), visit("v2", "A", "X")],
            branches: vec![branch("X", "C1", None, Some(120.0))],
            customers: vec![customer("C1", Some(1000.0), None)],
            operators: vec![operator("A", "Alice")],
            ..Default::default()
        };

        let out = aggregate(&input);
        assert_eq!(row(&out, "A").visit_revenue, 240.0);
    }

    #[test]
    fn test_price_precedence_order() {
        let branch_full = Pricing::new(Some(600.0), Some(50.0));
        let branch_monthly = Pricing::new(Some(600.0), None);
        let customer_full = Pricing::new(Some(900.0), Some(70.0));
        let customer_monthly = Pricing::new(Some(900.0), None);

        assert_eq!(unit_price(Some(&branch_full), Some(&customer_full), 3), 50.0);
        assert_eq!(unit_price(Some(&branch_monthly), Some(&customer_full), 3), 70.0);
        assert_eq!(unit_price(Some(&branch_monthly), Some(&customer_monthly), 3), 200.0);
        assert_eq!(unit_price(None, Some(&customer_monthly), 3), 300.0);
        assert_eq!(unit_price(None, None, 3), 0.0);
    }

    #[test]
    fn test_zero_count_and_non_positive_prices() {
        let monthly = Pricing::new(Some(900.0), None);
        assert_eq!(unit_price(Some(&monthly), None, 0), 0.0);

        let zero = Pricing::new(Some(0.0), Some(0.0));
        let customer = Pricing::new(None, Some(40.0));
        assert_eq!(unit_price(Some(&zero), Some(&customer), 2), 40.0);

        let negative = Pricing::new(Some(-10.0), Some(-5.0));
        assert_eq!(unit_price(Some(&negative), None, 2), 0.0);
    }

    #[test]
    fn test_visits_are_partitioned_across_operators() {
        let input = AggregatorInput {
            visits: vec![
                visit("v1", "A", "X"),
                visit("v2", "B", "X"),
                visit("v3", "B", "Y"),
                visit("v4", "ghost", "Y"),
            ],
            branches: vec![
                branch("X", "C1", Some(300.0), None),
                branch("Y", "C2", None, None),
            ],
            operators: vec![operator("A", "Alice"), operator("B", "Bob")],
            ..Default::default()
        };

        let out = aggregate(&input);
        let total: u32 = out.rows.iter().map(|r| r.total_visits).sum();
        assert_eq!(total, 4);
        assert_eq!(out.totals.total_visits, 4);

        let ghost = row(&out, "ghost");
        assert_eq!(ghost.operator_name, "ghost");
        assert_eq!(ghost.total_visits, 1);
    }

    #[test]
    fn test_sale_outside_window_not_attributed() {
        let input = AggregatorInput {
            visits: vec![visit("v1", "A", "X")],
            sales: vec![sale("v1", 80.0), sale("elsewhere", 999.0)],
            branches: vec![branch("X", "C1", None, None)],
            operators: vec![operator("A", "Alice"), operator("B", "Bob")],
            ..Default::default()
        };

        let out = aggregate(&input);
        assert_eq!(row(&out, "A").material_revenue, 80.0);
        assert_eq!(row(&out, "B").material_revenue, 0.0);
        assert_eq!(out.totals.material_revenue, 80.0);
        assert_eq!(out.unattributed_material_revenue, 999.0);
    }

    #[test]
    fn test_rows_sorted_by_total_desc() {
        let input = AggregatorInput {
            visits: vec![visit("v1", "A", "X"), visit("v2", "B", "X"), visit("v3", "B", "X")],
            branches: vec![branch("X", "C1", None, Some(100.0))],
            operators: vec![operator("A", "Alice"), operator("B", "Bob"), operator("C", "Carl")],
            ..Default::default()
        };

        let out = aggregate(&input);
        let order: Vec<&str> = out.rows.iter().map(|r| r.operator_id.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
        assert_eq!(out.totals.total_revenue, 300.0);
    }

    #[test]
    fn test_inactive_operator_without_visits_is_hidden() {
        let mut retired = operator("R", "Retired");
        retired.is_active = false;
        let input = AggregatorInput {
            operators: vec![operator("A", "Alice"), retired],
            ..Default::default()
        };

        let out = aggregate(&input);
        assert_eq!(out.rows.len(), 1);
        assert_eq!(out.rows[0].operator_id, "A");
    }
}
