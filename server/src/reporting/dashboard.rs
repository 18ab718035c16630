//! Admin dashboard aggregation
//!
//! [`build_dashboard_payload`] is a pure function of the resolved range and
//! a [`DashboardSource`] — the raw record sets the db layer fetched for
//! that range. It never fails: a window with no matching records produces
//! an all-zero payload with fully zero-filled series.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::food_ids::parse_food_ids;
use super::range::ReportRange;
use super::{MONTH_LABELS, RangeBlock, YearlyRevenue, round2};

// ============================================================================
// Source record sets (fetched by db::dashboard)
// ============================================================================

/// Per-day record count
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DayCount {
    pub day: NaiveDate,
    pub total: i64,
}

/// Per-day monetary sum
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DayAmount {
    pub day: NaiveDate,
    pub total: f64,
}

/// Per-chef monetary sum
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChefAmount {
    pub chef: String,
    pub total: f64,
}

/// Per-calendar-month monetary sum (month is 1-based)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MonthAmount {
    pub month: i64,
    pub total: f64,
}

/// Food references and quantity of one order
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderItemsRow {
    pub food_items: Option<String>,
    pub quantity: i64,
}

/// A campaign in the top-campaigns ordering
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CampaignStanding {
    pub id: String,
    pub title: String,
    pub chef: String,
    pub total_orders: i64,
}

/// Raw record sets for one dashboard build.
///
/// Whatever snapshot the store yields at query time; no cross-query
/// consistency is assumed.
#[derive(Debug, Clone, Default)]
pub struct DashboardSource {
    /// Count of accounts with role 'user'
    pub user_role_count: i64,
    /// Count of all accounts (fallback when no role rows exist)
    pub user_total_count: i64,
    pub chef_count: i64,
    pub campaigns_in_range: i64,
    pub orders_in_range: i64,
    pub pending_recharge_total: f64,
    pub completed_recharge_total: f64,
    pub campaigns_per_day: Vec<DayCount>,
    pub orders_per_day: Vec<DayCount>,
    pub pending_per_day: Vec<DayAmount>,
    pub completed_per_day: Vec<DayAmount>,
    pub pending_by_chef: Vec<ChefAmount>,
    pub completed_by_chef: Vec<ChefAmount>,
    /// Already ordered `(total_orders desc, start_time desc)` and limited,
    /// with the system-wide fallback applied when the range had none.
    pub top_campaigns: Vec<CampaignStanding>,
    /// Food references of every order in range
    pub order_items: Vec<OrderItemsRow>,
    /// Per-month sums for the calendar year containing the range end
    pub pending_by_month: Vec<MonthAmount>,
    pub completed_by_month: Vec<MonthAmount>,
    /// Food id -> display name
    pub food_names: HashMap<String, String>,
}

// ============================================================================
// Payload
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_users: i64,
    pub total_chefs: i64,
    pub campaigns_in_range: i64,
    pub recharge_in_range: f64,
    pub orders_in_range: i64,
    // Backward-compatible summary keys
    pub campaigns_this_month: i64,
    pub recharge_this_month: f64,
    pub orders_today: i64,
}

/// Daily trend series. The block is named `last_30_days` in the JSON
/// contract regardless of the actual window length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTrends {
    pub labels: Vec<String>,
    pub campaigns_per_day: Vec<i64>,
    pub recharge_per_day: Vec<f64>,
    pub orders_per_day: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopChef {
    pub chef: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopCampaign {
    pub campaign_id: String,
    pub title: String,
    pub chef: String,
    pub total_orders: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopFood {
    pub food_id: String,
    pub name: String,
    pub quantity_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPerformers {
    pub chefs_by_revenue: Vec<TopChef>,
    pub campaigns_by_orders: Vec<TopCampaign>,
    pub foods_by_quantity: Vec<TopFood>,
}

/// The full admin dashboard payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPayload {
    pub range: RangeBlock,
    pub summary: DashboardSummary,
    pub last_30_days: DailyTrends,
    pub yearly_revenue: YearlyRevenue,
    pub top_performers: TopPerformers,
}

// ============================================================================
// Builder
// ============================================================================

/// Accumulates keyed totals preserving first-seen order, so descending
/// stable sorts break ties by encounter order.
struct OrderedTally<V> {
    order: Vec<String>,
    totals: HashMap<String, V>,
}

impl<V: Copy + Default + std::ops::AddAssign> OrderedTally<V> {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            totals: HashMap::new(),
        }
    }

    fn add(&mut self, key: &str, amount: V) {
        if !self.totals.contains_key(key) {
            self.order.push(key.to_string());
        }
        *self.totals.entry(key.to_string()).or_default() += amount;
    }

    fn into_entries(self) -> Vec<(String, V)> {
        self.order
            .into_iter()
            .map(|key| {
                let total = self.totals[&key];
                (key, total)
            })
            .collect()
    }
}

/// Build the admin dashboard payload from a resolved range and its source
/// record sets. Monetary values are rounded to 2dp here and nowhere else.
pub fn build_dashboard_payload(range: &ReportRange, source: &DashboardSource) -> DashboardPayload {
    let date_axis = range.date_axis();
    let labels: Vec<String> = date_axis.iter().map(|day| day.to_string()).collect();

    let total_users = if source.user_role_count > 0 {
        source.user_role_count
    } else {
        source.user_total_count
    };

    let recharge_total = round2(source.pending_recharge_total + source.completed_recharge_total);

    // Daily series, zero-filled across the full axis
    let campaigns_by_day: HashMap<NaiveDate, i64> = source
        .campaigns_per_day
        .iter()
        .map(|row| (row.day, row.total))
        .collect();
    let orders_by_day: HashMap<NaiveDate, i64> = source
        .orders_per_day
        .iter()
        .map(|row| (row.day, row.total))
        .collect();

    let mut recharge_by_day: HashMap<NaiveDate, f64> = HashMap::new();
    for row in source
        .pending_per_day
        .iter()
        .chain(source.completed_per_day.iter())
    {
        *recharge_by_day.entry(row.day).or_insert(0.0) += row.total;
    }

    let campaigns_series: Vec<i64> = date_axis
        .iter()
        .map(|day| campaigns_by_day.get(day).copied().unwrap_or(0))
        .collect();
    let orders_series: Vec<i64> = date_axis
        .iter()
        .map(|day| orders_by_day.get(day).copied().unwrap_or(0))
        .collect();
    let recharge_series: Vec<f64> = date_axis
        .iter()
        .map(|day| round2(recharge_by_day.get(day).copied().unwrap_or(0.0)))
        .collect();

    // Top chefs by recharge revenue: pending + completed merged by exact
    // chef string, descending, ties by encounter order.
    let mut chef_tally: OrderedTally<f64> = OrderedTally::new();
    for row in source
        .pending_by_chef
        .iter()
        .chain(source.completed_by_chef.iter())
    {
        let name = row.chef.trim();
        if !name.is_empty() {
            chef_tally.add(name, row.total);
        }
    }
    let mut top_chefs: Vec<TopChef> = chef_tally
        .into_entries()
        .into_iter()
        .map(|(chef, revenue)| TopChef { chef, revenue })
        .collect();
    top_chefs.sort_by(|a, b| {
        b.revenue
            .partial_cmp(&a.revenue)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    top_chefs.truncate(5);
    for chef in &mut top_chefs {
        chef.revenue = round2(chef.revenue);
    }

    let top_campaigns: Vec<TopCampaign> = source
        .top_campaigns
        .iter()
        .map(|campaign| TopCampaign {
            campaign_id: campaign.id.clone(),
            title: campaign.title.clone(),
            chef: campaign.chef.clone(),
            total_orders: campaign.total_orders,
        })
        .collect();

    // Top foods: every referenced id gets the order's full quantity
    // (floored to 1). This is the admin-wide policy; the chef dashboard
    // distributes proportionally instead.
    let mut food_tally: OrderedTally<i64> = OrderedTally::new();
    for row in &source.order_items {
        let quantity = if row.quantity > 0 { row.quantity } else { 1 };
        for food_id in parse_food_ids(row.food_items.as_deref()) {
            food_tally.add(&food_id, quantity);
        }
    }
    let mut food_entries = food_tally.into_entries();
    food_entries.sort_by(|a, b| b.1.cmp(&a.1));
    food_entries.truncate(5);
    let top_foods: Vec<TopFood> = food_entries
        .into_iter()
        .map(|(food_id, quantity_sold)| TopFood {
            name: source
                .food_names
                .get(&food_id)
                .cloned()
                .unwrap_or_else(|| "Unknown Food".to_string()),
            food_id,
            quantity_sold,
        })
        .collect();

    // Yearly revenue for the calendar year containing the range end
    let mut month_totals = [0.0_f64; 12];
    for row in source
        .pending_by_month
        .iter()
        .chain(source.completed_by_month.iter())
    {
        if (1..=12).contains(&row.month) {
            month_totals[(row.month - 1) as usize] += row.total;
        }
    }
    let revenue_per_month: Vec<f64> = month_totals.iter().map(|total| round2(*total)).collect();

    DashboardPayload {
        range: RangeBlock::from_range(range),
        summary: DashboardSummary {
            total_users,
            total_chefs: source.chef_count,
            campaigns_in_range: source.campaigns_in_range,
            recharge_in_range: recharge_total,
            orders_in_range: source.orders_in_range,
            campaigns_this_month: source.campaigns_in_range,
            recharge_this_month: recharge_total,
            orders_today: source.orders_in_range,
        },
        last_30_days: DailyTrends {
            labels,
            campaigns_per_day: campaigns_series,
            recharge_per_day: recharge_series,
            orders_per_day: orders_series,
        },
        yearly_revenue: YearlyRevenue {
            year: range.end_date.year(),
            labels: MONTH_LABELS.iter().map(|label| label.to_string()).collect(),
            revenue_per_month,
        },
        top_performers: TopPerformers {
            chefs_by_revenue: top_chefs,
            campaigns_by_orders: top_campaigns,
            foods_by_quantity: top_foods,
        },
    }
}
