//! Bucketing for the admin dashboard.
//!
//! The database returns sparse grouped rows (only months or weekdays that had
//! orders). These helpers turn them into the dense, labelled series the
//! dashboard charts expect.

use rust_decimal::Decimal;
use serde::Serialize;

/// Shop occupancy shown on the dashboard. This is a fixed presentation figure.
pub const OCCUPANCY_RATE: u8 = 85;

/// Category label used for shops without one.
pub const DEFAULT_CATEGORY: &str = "General";

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Monday-first, matching `ISODOW` (1 = Monday, 7 = Sunday).
pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// One bar of the monthly revenue chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyRevenue {
    pub name: &'static str,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

/// One bar of the weekly traffic chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTraffic {
    pub name: &'static str,
    pub visits: i64,
}

/// One slice of the category pie chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub name: String,
    pub value: i64,
}

/// Zero-filled revenue per calendar month, summed across all years.
///
/// `rows` are `(month, revenue)` pairs with `month` in `1..=12`; anything
/// outside that range is ignored.
#[must_use]
pub fn monthly_revenue<I>(rows: I) -> Vec<MonthlyRevenue>
where
    I: IntoIterator<Item = (i32, Decimal)>,
{
    let mut totals = [Decimal::ZERO; 12];
    for (month, revenue) in rows {
        let slot = usize::try_from(month - 1)
            .ok()
            .and_then(|index| totals.get_mut(index));
        if let Some(slot) = slot {
            *slot += revenue;
        }
    }

    MONTH_LABELS
        .into_iter()
        .zip(totals)
        .map(|(name, value)| MonthlyRevenue { name, value })
        .collect()
}

/// Display heuristic turning an order count into a "visits" figure.
#[must_use]
pub const fn visits_for_orders(order_count: i64) -> i64 {
    order_count * 5 + 10
}

/// Visits per weekday, Monday first.
///
/// `rows` are `(isodow, order_count)` pairs with `isodow` in `1..=7`.
/// Weekdays without orders still get the baseline visit figure.
#[must_use]
pub fn weekly_traffic<I>(rows: I) -> Vec<DailyTraffic>
where
    I: IntoIterator<Item = (i32, i64)>,
{
    let mut counts = [0_i64; 7];
    for (isodow, count) in rows {
        let slot = usize::try_from(isodow - 1)
            .ok()
            .and_then(|index| counts.get_mut(index));
        if let Some(slot) = slot {
            *slot += count;
        }
    }

    WEEKDAY_LABELS
        .into_iter()
        .zip(counts)
        .map(|(name, count)| DailyTraffic {
            name,
            visits: visits_for_orders(count),
        })
        .collect()
}

/// Shop counts per category.
///
/// Shops with no category (or a blank one) are counted under
/// [`DEFAULT_CATEGORY`], merged with any shop that names it explicitly.
/// First-seen order is kept.
#[must_use]
pub fn category_shares<I>(rows: I) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = (Option<String>, i64)>,
{
    let mut shares: Vec<CategoryShare> = Vec::new();
    for (category, count) in rows {
        let name = category_label(category.as_deref());
        match shares.iter_mut().find(|share| share.name == name) {
            Some(share) => share.value += count,
            None => shares.push(CategoryShare {
                name: name.to_owned(),
                value: count,
            }),
        }
    }
    shares
}

/// The category name to show for a shop.
#[must_use]
pub fn category_label(category: Option<&str>) -> &str {
    match category.map(str::trim) {
        Some(name) if !name.is_empty() => name,
        _ => DEFAULT_CATEGORY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_revenue_zero_fills() {
        let series = monthly_revenue([(3, Decimal::new(2500, 2)), (12, Decimal::ONE)]);
        assert_eq!(series.len(), 12);
        assert_eq!(series.first().map(|m| m.name), Some("Jan"));
        assert_eq!(series.get(2).map(|m| m.value), Some(Decimal::new(2500, 2)));
        assert_eq!(series.get(11).map(|m| m.value), Some(Decimal::ONE));
        assert_eq!(series.get(5).map(|m| m.value), Some(Decimal::ZERO));
    }

    #[test]
    fn test_monthly_revenue_sums_same_month_and_skips_out_of_range() {
        let series = monthly_revenue([
            (1, Decimal::TEN),
            (1, Decimal::ONE),
            (0, Decimal::ONE_HUNDRED),
            (13, Decimal::ONE_HUNDRED),
        ]);
        assert_eq!(series.first().map(|m| m.value), Some(Decimal::new(11, 0)));
        let total: Decimal = series.iter().map(|m| m.value).sum();
        assert_eq!(total, Decimal::new(11, 0));
    }

    #[test]
    fn test_weekly_traffic_is_monday_first_with_baseline() {
        let series = weekly_traffic([(1, 2), (7, 1)]);
        let names: Vec<_> = series.iter().map(|d| d.name).collect();
        assert_eq!(names, WEEKDAY_LABELS);
        assert_eq!(series.first().map(|d| d.visits), Some(20));
        assert_eq!(series.get(3).map(|d| d.visits), Some(10));
        assert_eq!(series.get(6).map(|d| d.visits), Some(15));
    }

    #[test]
    fn test_category_shares_merge_missing_into_general() {
        let shares = category_shares([
            (Some("Fashion".to_owned()), 3),
            (None, 2),
            (Some("General".to_owned()), 1),
            (Some("  ".to_owned()), 1),
        ]);
        assert_eq!(
            shares,
            vec![
                CategoryShare {
                    name: "Fashion".to_owned(),
                    value: 3
                },
                CategoryShare {
                    name: "General".to_owned(),
                    value: 4
                },
            ]
        );
    }

    #[test]
    fn test_monthly_revenue_serializes_as_number() {
        let series = monthly_revenue([(2, Decimal::new(1050, 2))]);
        let json = serde_json::to_value(series.get(1)).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({"name": "Feb", "value": 10.5}))
        );
    }
}
