//! Chef-scoped dashboard aggregation
//!
//! Unlike the admin dashboard, revenue here is attributed proportionally:
//! when an order references foods from several chefs, each chef's share is
//! `matched referenced ids / total referenced ids` of the order price, so
//! the order's total spend is split across vendors instead of being
//! counted once per vendor. Quantity is distributed the same way.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use super::dashboard::DayCount;
use super::food_ids::parse_food_ids;
use super::range::ReportRange;
use super::{MONTH_LABELS, RangeBlock, YearlyRevenue, round2};

// ============================================================================
// Source record sets (fetched by db::chef_dashboard)
// ============================================================================

/// A chef profile row
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChefProfile {
    pub chef_username: String,
    pub balance: f64,
    pub campaign_points: i64,
    pub subscription_status: String,
    pub total_orders_received: i64,
    pub total_campaigns: i64,
}

/// A food item owned by the chef
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodRef {
    pub id: String,
    pub food_name: String,
}

/// One order row, as needed for attribution
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRecord {
    pub order_time: DateTime<Utc>,
    pub food_items: Option<String>,
    pub food_price: f64,
    pub quantity: i64,
}

/// A campaign in the chef's top-campaigns ordering
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ChefCampaignStanding {
    pub id: String,
    pub title: String,
    pub status: String,
    pub total_orders: i64,
    pub quantity_available: i64,
}

/// Raw record sets for one chef dashboard build
#[derive(Debug, Clone, Default)]
pub struct ChefDashboardSource {
    pub campaigns_in_range: i64,
    pub active_campaigns: i64,
    pub campaigns_per_day: Vec<DayCount>,
    /// The chef's foods (attribution universe)
    pub chef_foods: Vec<FoodRef>,
    /// Every order in the window, not pre-filtered by chef
    pub range_orders: Vec<OrderRecord>,
    /// Already ordered `(total_orders desc, start_time desc)` and limited
    pub top_campaigns: Vec<ChefCampaignStanding>,
    /// Every order in the calendar year containing the range end
    pub yearly_orders: Vec<OrderRecord>,
}

/// Who is looking at whose dashboard
#[derive(Debug, Clone)]
pub struct ChefContext {
    pub username: String,
    pub requested_by_role: String,
    pub is_self: bool,
    pub fallback_used: bool,
}

// ============================================================================
// Payload
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChefBlock {
    pub username: String,
    pub requested_by_role: String,
    pub is_self: bool,
    pub fallback_used: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChefSummary {
    pub balance: f64,
    pub campaign_points: i64,
    pub subscription_status: String,
    pub active_campaigns: i64,
    pub campaigns_in_range: i64,
    pub orders_in_range: i64,
    pub revenue_in_range: f64,
    pub avg_order_value: f64,
    pub lifetime_total_orders: i64,
    pub lifetime_total_campaigns: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChefTrends {
    pub labels: Vec<String>,
    pub campaigns_per_day: Vec<i64>,
    pub orders_per_day: Vec<i64>,
    pub revenue_per_day: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChefTopCampaign {
    pub campaign_id: String,
    pub title: String,
    pub status: String,
    pub total_orders: i64,
    pub quantity_available: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChefTopFood {
    pub food_id: String,
    pub name: String,
    pub quantity_sold: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChefTopPerformers {
    pub campaigns: Vec<ChefTopCampaign>,
    pub foods: Vec<ChefTopFood>,
}

/// Legacy metrics block kept for older dashboard clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChefMetrics {
    pub balance: f64,
    pub total_orders_received: i64,
    pub total_campaigns: i64,
    pub campaign_points: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChefDashboardPayload {
    pub range: RangeBlock,
    pub chef: ChefBlock,
    pub summary: ChefSummary,
    pub trends: ChefTrends,
    pub yearly_revenue: YearlyRevenue,
    pub top_performers: ChefTopPerformers,
    pub metrices: ChefMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Builders
// ============================================================================

/// All-zero payload for an admin viewing a system with no chef profiles.
pub fn empty_chef_dashboard_payload(
    range: &ReportRange,
    role: &str,
    warning: Option<String>,
) -> ChefDashboardPayload {
    let span = range.day_span as usize;
    let labels: Vec<String> = range.date_axis().iter().map(|d| d.to_string()).collect();

    ChefDashboardPayload {
        range: RangeBlock::from_range(range),
        chef: ChefBlock {
            username: String::new(),
            requested_by_role: role.to_string(),
            is_self: false,
            fallback_used: false,
        },
        summary: ChefSummary {
            balance: 0.0,
            campaign_points: 0,
            subscription_status: "N/A".to_string(),
            active_campaigns: 0,
            campaigns_in_range: 0,
            orders_in_range: 0,
            revenue_in_range: 0.0,
            avg_order_value: 0.0,
            lifetime_total_orders: 0,
            lifetime_total_campaigns: 0,
        },
        trends: ChefTrends {
            labels,
            campaigns_per_day: vec![0; span],
            orders_per_day: vec![0; span],
            revenue_per_day: vec![0.0; span],
        },
        yearly_revenue: YearlyRevenue {
            year: range.end_date.year(),
            labels: MONTH_LABELS.iter().map(|label| label.to_string()).collect(),
            revenue_per_month: vec![0.0; 12],
        },
        top_performers: ChefTopPerformers {
            campaigns: Vec::new(),
            foods: Vec::new(),
        },
        metrices: ChefMetrics {
            balance: 0.0,
            total_orders_received: 0,
            total_campaigns: 0,
            campaign_points: 0,
        },
        warning,
    }
}

/// Build the chef dashboard payload. Pure over the fetched source sets.
pub fn build_chef_dashboard_payload(
    range: &ReportRange,
    ctx: &ChefContext,
    chef: &ChefProfile,
    source: &ChefDashboardSource,
) -> ChefDashboardPayload {
    let date_axis = range.date_axis();
    let labels: Vec<String> = date_axis.iter().map(|day| day.to_string()).collect();

    let chef_food_ids: HashSet<&str> = source
        .chef_foods
        .iter()
        .map(|food| food.id.as_str())
        .collect();
    let chef_food_names: HashMap<&str, &str> = source
        .chef_foods
        .iter()
        .map(|food| (food.id.as_str(), food.food_name.as_str()))
        .collect();

    let campaigns_by_day: HashMap<NaiveDate, i64> = source
        .campaigns_per_day
        .iter()
        .map(|row| (row.day, row.total))
        .collect();
    let campaigns_per_day: Vec<i64> = date_axis
        .iter()
        .map(|day| campaigns_by_day.get(day).copied().unwrap_or(0))
        .collect();

    let mut orders_in_range: i64 = 0;
    let mut revenue_in_range: f64 = 0.0;
    let mut revenue_by_day: HashMap<NaiveDate, f64> = HashMap::new();
    let mut orders_by_day: HashMap<NaiveDate, i64> = HashMap::new();
    // Seed every chef food so zero-sellers still rank (and display) at 0.
    let mut food_quantities: Vec<(String, i64)> = source
        .chef_foods
        .iter()
        .map(|food| (food.id.clone(), 0_i64))
        .collect();
    let mut food_index: HashMap<String, usize> = food_quantities
        .iter()
        .enumerate()
        .map(|(idx, (id, _))| (id.clone(), idx))
        .collect();

    for order in &source.range_orders {
        let all_ids = parse_food_ids(order.food_items.as_deref());
        if all_ids.is_empty() {
            continue;
        }
        let matched: Vec<&String> = all_ids
            .iter()
            .filter(|id| chef_food_ids.contains(id.as_str()))
            .collect();
        if matched.is_empty() {
            continue;
        }

        orders_in_range += 1;
        let total_items = all_ids.len().max(1);
        let ratio = matched.len() as f64 / total_items as f64;
        let proportional_revenue = order.food_price * ratio;
        revenue_in_range += proportional_revenue;

        let day = order.order_time.date_naive();
        if day >= range.start_date && day <= range.end_date {
            *revenue_by_day.entry(day).or_insert(0.0) += proportional_revenue;
            *orders_by_day.entry(day).or_insert(0) += 1;
        }

        let quantity = if order.quantity > 0 {
            order.quantity
        } else {
            matched.len() as i64
        };
        let distributed = ((quantity as f64 / matched.len().max(1) as f64).round() as i64).max(1);
        for food_id in &matched {
            let idx = *food_index.entry((*food_id).clone()).or_insert_with(|| {
                food_quantities.push(((*food_id).clone(), 0));
                food_quantities.len() - 1
            });
            food_quantities[idx].1 += distributed;
        }
    }

    let revenue_in_range = round2(revenue_in_range);
    let avg_order_value = if orders_in_range > 0 {
        round2(revenue_in_range / orders_in_range as f64)
    } else {
        0.0
    };
    let revenue_per_day: Vec<f64> = date_axis
        .iter()
        .map(|day| round2(revenue_by_day.get(day).copied().unwrap_or(0.0)))
        .collect();
    let orders_per_day: Vec<i64> = date_axis
        .iter()
        .map(|day| orders_by_day.get(day).copied().unwrap_or(0))
        .collect();

    let top_campaigns: Vec<ChefTopCampaign> = source
        .top_campaigns
        .iter()
        .map(|campaign| ChefTopCampaign {
            campaign_id: campaign.id.clone(),
            title: campaign.title.clone(),
            status: campaign.status.clone(),
            total_orders: campaign.total_orders,
            quantity_available: campaign.quantity_available,
        })
        .collect();

    let mut ranked_foods = food_quantities.clone();
    ranked_foods.sort_by(|a, b| b.1.cmp(&a.1));
    ranked_foods.truncate(5);
    let top_foods: Vec<ChefTopFood> = ranked_foods
        .into_iter()
        .map(|(food_id, quantity_sold)| ChefTopFood {
            name: chef_food_names
                .get(food_id.as_str())
                .map(|name| name.to_string())
                .unwrap_or_else(|| "Unknown Food".to_string()),
            food_id,
            quantity_sold,
        })
        .collect();

    // Yearly revenue from proportional order attribution (not transactions)
    let year = range.end_date.year();
    let mut month_totals = [0.0_f64; 12];
    for order in &source.yearly_orders {
        let all_ids = parse_food_ids(order.food_items.as_deref());
        if all_ids.is_empty() {
            continue;
        }
        let matched_count = all_ids
            .iter()
            .filter(|id| chef_food_ids.contains(id.as_str()))
            .count();
        if matched_count == 0 {
            continue;
        }
        let ratio = matched_count as f64 / all_ids.len().max(1) as f64;
        let month = order.order_time.month() as usize;
        if (1..=12).contains(&month) {
            month_totals[month - 1] += order.food_price * ratio;
        }
    }
    let revenue_per_month: Vec<f64> = month_totals.iter().map(|total| round2(*total)).collect();

    let summary = ChefSummary {
        balance: round2(chef.balance),
        campaign_points: chef.campaign_points,
        subscription_status: chef.subscription_status.clone(),
        active_campaigns: source.active_campaigns,
        campaigns_in_range: source.campaigns_in_range,
        orders_in_range,
        revenue_in_range,
        avg_order_value,
        lifetime_total_orders: chef.total_orders_received,
        lifetime_total_campaigns: chef.total_campaigns,
    };

    let warning = ctx.fallback_used.then(|| {
        format!(
            "Showing dashboard for chef '{}'. Use ?chef=<chef_username> to view a specific chef.",
            ctx.username
        )
    });

    ChefDashboardPayload {
        range: RangeBlock::from_range(range),
        chef: ChefBlock {
            username: ctx.username.clone(),
            requested_by_role: ctx.requested_by_role.clone(),
            is_self: ctx.is_self,
            fallback_used: ctx.fallback_used,
        },
        metrices: ChefMetrics {
            balance: summary.balance,
            total_orders_received: summary.lifetime_total_orders,
            total_campaigns: summary.lifetime_total_campaigns,
            campaign_points: summary.campaign_points,
        },
        summary,
        trends: ChefTrends {
            labels,
            campaigns_per_day,
            orders_per_day,
            revenue_per_day,
        },
        yearly_revenue: YearlyRevenue {
            year,
            labels: MONTH_LABELS.iter().map(|label| label.to_string()).collect(),
            revenue_per_month,
        },
        top_performers: ChefTopPerformers {
            campaigns: top_campaigns,
            foods: top_foods,
        },
        warning,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn range_7d() -> ReportRange {
        ReportRange::resolve(
            Some("7d"),
            None,
            None,
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
        )
        .unwrap()
    }

    fn ctx(username: &str) -> ChefContext {
        ChefContext {
            username: username.to_string(),
            requested_by_role: "chef".to_string(),
            is_self: true,
            fallback_used: false,
        }
    }

    fn profile(username: &str) -> ChefProfile {
        ChefProfile {
            chef_username: username.to_string(),
            balance: 100.0,
            campaign_points: 5,
            subscription_status: "Active".to_string(),
            total_orders_received: 10,
            total_campaigns: 3,
        }
    }

    fn order_at(day: u32, food_items: &str, price: f64, quantity: i64) -> OrderRecord {
        OrderRecord {
            order_time: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
            food_items: Some(food_items.to_string()),
            food_price: price,
            quantity,
        }
    }

    fn source_for(foods: &[(&str, &str)], orders: Vec<OrderRecord>) -> ChefDashboardSource {
        ChefDashboardSource {
            chef_foods: foods
                .iter()
                .map(|(id, name)| FoodRef {
                    id: id.to_string(),
                    food_name: name.to_string(),
                })
                .collect(),
            yearly_orders: orders.clone(),
            range_orders: orders,
            ..Default::default()
        }
    }

    #[test]
    fn test_equal_split_between_two_chefs() {
        // One order referencing one food of chef A and one of chef B splits
        // its 25.00 price exactly 50/50.
        let range = range_7d();
        let order = order_at(12, "fa,fb", 25.0, 2);

        let payload_a = build_chef_dashboard_payload(
            &range,
            &ctx("aisha"),
            &profile("aisha"),
            &source_for(&[("fa", "Laksa")], vec![order.clone()]),
        );
        let payload_b = build_chef_dashboard_payload(
            &range,
            &ctx("bilal"),
            &profile("bilal"),
            &source_for(&[("fb", "Satay")], vec![order]),
        );

        assert_eq!(payload_a.summary.revenue_in_range, 12.5);
        assert_eq!(payload_b.summary.revenue_in_range, 12.5);
        assert_eq!(payload_a.summary.orders_in_range, 1);
        assert_eq!(payload_b.summary.orders_in_range, 1);
    }

    #[test]
    fn test_unmatched_orders_ignored() {
        let range = range_7d();
        let payload = build_chef_dashboard_payload(
            &range,
            &ctx("aisha"),
            &profile("aisha"),
            &source_for(&[("fa", "Laksa")], vec![order_at(12, "other1,other2", 30.0, 1)]),
        );
        assert_eq!(payload.summary.orders_in_range, 0);
        assert_eq!(payload.summary.revenue_in_range, 0.0);
        assert_eq!(payload.summary.avg_order_value, 0.0);
    }

    #[test]
    fn test_revenue_lands_on_order_day() {
        let range = range_7d(); // 2025-03-09 .. 2025-03-15
        let payload = build_chef_dashboard_payload(
            &range,
            &ctx("aisha"),
            &profile("aisha"),
            &source_for(&[("fa", "Laksa")], vec![order_at(12, "fa", 20.0, 1)]),
        );
        assert_eq!(
            payload.trends.revenue_per_day,
            vec![0.0, 0.0, 0.0, 20.0, 0.0, 0.0, 0.0]
        );
        assert_eq!(payload.trends.orders_per_day, vec![0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_quantity_distributed_proportionally() {
        // Chef owns both referenced foods: 4 units over 2 matches = 2 each.
        let range = range_7d();
        let payload = build_chef_dashboard_payload(
            &range,
            &ctx("aisha"),
            &profile("aisha"),
            &source_for(
                &[("fa", "Laksa"), ("fb", "Satay")],
                vec![order_at(12, "fa,fb", 40.0, 4)],
            ),
        );
        let foods = &payload.top_performers.foods;
        assert!(foods.iter().all(|food| food.quantity_sold == 2));
        // Chef owns both foods, so the full price is attributed.
        assert_eq!(payload.summary.revenue_in_range, 40.0);
    }

    #[test]
    fn test_zero_quantity_distributes_at_least_one() {
        let range = range_7d();
        let payload = build_chef_dashboard_payload(
            &range,
            &ctx("aisha"),
            &profile("aisha"),
            &source_for(&[("fa", "Laksa")], vec![order_at(12, "fa", 10.0, 0)]),
        );
        assert_eq!(payload.top_performers.foods[0].quantity_sold, 1);
    }

    #[test]
    fn test_zero_sellers_still_listed() {
        let range = range_7d();
        let payload = build_chef_dashboard_payload(
            &range,
            &ctx("aisha"),
            &profile("aisha"),
            &source_for(&[("fa", "Laksa"), ("fb", "Satay")], Vec::new()),
        );
        assert_eq!(payload.top_performers.foods.len(), 2);
        assert!(payload
            .top_performers
            .foods
            .iter()
            .all(|food| food.quantity_sold == 0));
    }

    #[test]
    fn test_yearly_revenue_buckets_by_month() {
        let range = range_7d();
        let mut source = source_for(&[("fa", "Laksa")], Vec::new());
        source.yearly_orders = vec![
            OrderRecord {
                order_time: Utc.with_ymd_and_hms(2025, 1, 10, 8, 0, 0).unwrap(),
                food_items: Some("fa".to_string()),
                food_price: 15.0,
                quantity: 1,
            },
            OrderRecord {
                order_time: Utc.with_ymd_and_hms(2025, 1, 20, 8, 0, 0).unwrap(),
                food_items: Some("fa,other".to_string()),
                food_price: 10.0,
                quantity: 1,
            },
        ];
        let payload =
            build_chef_dashboard_payload(&range, &ctx("aisha"), &profile("aisha"), &source);
        // 15.0 + proportional 5.0 in January
        assert_eq!(payload.yearly_revenue.revenue_per_month[0], 20.0);
        assert_eq!(payload.yearly_revenue.revenue_per_month[1..], vec![0.0; 11]);
    }

    #[test]
    fn test_avg_order_value() {
        let range = range_7d();
        let payload = build_chef_dashboard_payload(
            &range,
            &ctx("aisha"),
            &profile("aisha"),
            &source_for(
                &[("fa", "Laksa")],
                vec![order_at(10, "fa", 10.0, 1), order_at(11, "fa", 15.0, 1)],
            ),
        );
        assert_eq!(payload.summary.revenue_in_range, 25.0);
        assert_eq!(payload.summary.avg_order_value, 12.5);
    }

    #[test]
    fn test_fallback_warning() {
        let range = range_7d();
        let mut context = ctx("aisha");
        context.fallback_used = true;
        let payload = build_chef_dashboard_payload(
            &range,
            &context,
            &profile("aisha"),
            &ChefDashboardSource::default(),
        );
        assert!(payload.warning.unwrap().contains("aisha"));
    }

    #[test]
    fn test_empty_payload_shape() {
        let range = range_7d();
        let payload = empty_chef_dashboard_payload(&range, "admin", Some("No chefs".to_string()));
        assert_eq!(payload.trends.labels.len(), 7);
        assert_eq!(payload.trends.revenue_per_day, vec![0.0; 7]);
        assert_eq!(payload.summary.subscription_status, "N/A");
        assert_eq!(payload.yearly_revenue.revenue_per_month.len(), 12);
        assert_eq!(payload.warning.as_deref(), Some("No chefs"));
    }
}
