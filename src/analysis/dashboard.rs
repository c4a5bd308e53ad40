use super::aggregate::aggregate_by;
use super::filter::apply_filter;
use super::round2;
use super::satisfaction::{csat_dsat, satisfaction_breakdown};
use super::trends::{daily_volume, monthly_category_trend, today_snapshot, top_categories};
use crate::models::filter::DashboardFilter;
use crate::models::metrics::{DashboardData, GroupMetrics, KpiSummary};
use crate::models::ticket::{IssueCategory, Ticket, TicketColumn};
use std::collections::{BTreeSet, HashMap};

/// Chart knobs that come from settings rather than the filter widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardOptions {
    pub rolling_window_days: usize,
    pub top_categories: usize,
    pub default_issue_category: IssueCategory,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            rolling_window_days: 7,
            top_categories: 5,
            default_issue_category: IssueCategory::TicketSubject,
        }
    }
}

/// Distinct priorities (a missing one counts once) seen in each channel
fn priorities_per_channel(tickets: &[Ticket]) -> HashMap<&str, usize> {
    let mut pairs: HashMap<&str, BTreeSet<Option<&str>>> = HashMap::new();
    for ticket in tickets {
        if let Some(channel) = ticket.channel.as_deref() {
            pairs.entry(channel).or_default().insert(ticket.priority.as_deref());
        }
    }
    pairs.into_iter().map(|(channel, priorities)| (channel, priorities.len())).collect()
}

/// Headline numbers: worst channel breach rate, average resolution over the
/// channel rows, ticket count and CSAT/DSAT. Each channel row is weighted by
/// the number of priorities present in it, so a channel spanning four
/// priorities counts four times. Means over no channels are `None`.
pub fn kpi_summary(tickets: &[Ticket], channel_metrics: &[GroupMetrics]) -> KpiSummary {
    let max_breach_rate = channel_metrics
        .iter()
        .map(|m| m.sla_breach_rate)
        .fold(None, |acc: Option<f64>, rate| Some(acc.map_or(rate, |a| a.max(rate))));

    let weights = priorities_per_channel(tickets);
    let (weighted_sum, weight_total) = channel_metrics.iter().fold((0.0, 0usize), |(sum, total), m| {
        let weight = weights.get(m.group.as_str()).copied().unwrap_or(1);
        (sum + m.avg_resolution_hrs * weight as f64, total + weight)
    });
    let avg_resolution_hrs = (weight_total > 0).then(|| round2(weighted_sum / weight_total as f64));

    let satisfaction = csat_dsat(tickets);

    KpiSummary {
        max_breach_rate,
        avg_resolution_hrs,
        total_tickets: tickets.len(),
        csat_percent: satisfaction.csat_percent,
        dsat_percent: satisfaction.dsat_percent,
    }
}

/// Every chart payload for one filter selection. The "today" panel always
/// reflects the unfiltered base table.
pub fn build_dashboard(base: &[Ticket], filter: &DashboardFilter, options: &DashboardOptions) -> DashboardData {
    let filtered = apply_filter(base, filter);
    let category = filter.issue_category.unwrap_or(options.default_issue_category);
    let channel_metrics = aggregate_by(&filtered, TicketColumn::Channel);

    DashboardData {
        kpis: kpi_summary(&filtered, &channel_metrics),
        satisfaction: satisfaction_breakdown(&filtered),
        today: today_snapshot(base),
        daily_volume: daily_volume(&filtered, options.rolling_window_days),
        issue_category: category.column().label().to_string(),
        monthly_trend: monthly_category_trend(&filtered, category),
        top_categories: top_categories(&filtered, category, options.top_categories),
        channel_metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{created_on, ticket};

    fn base() -> Vec<Ticket> {
        vec![
            created_on(ticket(1, "Email", "Critical", 10, Some(5)), 2023, 6, 1, 9),
            created_on(ticket(2, "Email", "High", 2, Some(1)), 2023, 6, 2, 9),
            created_on(ticket(3, "Chat", "Low", 4, None), 2023, 6, 3, 14),
        ]
    }

    #[test]
    fn kpis_summarize_channel_rows() {
        let tickets = base();
        let channels = aggregate_by(&tickets, TicketColumn::Channel);
        let kpis = kpi_summary(&tickets, &channels);

        assert_eq!(kpis.max_breach_rate, Some(50.0));
        // Email spans two priorities and counts twice: (6 + 6 + 4) / 3
        assert_eq!(kpis.avg_resolution_hrs, Some(5.33));
        assert_eq!(kpis.total_tickets, 3);
        assert_eq!(kpis.csat_percent, 50.0);
        assert_eq!(kpis.dsat_percent, 50.0);
    }

    #[test]
    fn resolution_kpi_weights_channels_by_priority_spread() {
        let mut tickets = vec![
            ticket(1, "Email", "Critical", 8, None),
            ticket(2, "Email", "High", 8, None),
            ticket(3, "Email", "Low", 8, None),
            ticket(4, "Chat", "Low", 2, None),
            ticket(5, "Chat", "Low", 2, None),
        ];
        let mut unprioritized = ticket(6, "Email", "Low", 8, None);
        unprioritized.priority = None;
        tickets.push(unprioritized);

        let channels = aggregate_by(&tickets, TicketColumn::Channel);
        let kpis = kpi_summary(&tickets, &channels);
        // Email: Critical, High, Low and missing give weight 4; Chat weight 1
        assert_eq!(kpis.avg_resolution_hrs, Some(6.8));
    }

    #[test]
    fn empty_selection_degrades_to_no_data() {
        let filter = DashboardFilter::default().with_channels(["Fax"]);
        let data = build_dashboard(&base(), &filter, &DashboardOptions::default());

        assert!(data.channel_metrics.is_empty());
        assert_eq!(data.kpis.max_breach_rate, None);
        assert_eq!(data.kpis.avg_resolution_hrs, None);
        assert_eq!(data.kpis.total_tickets, 0);
        assert_eq!(data.satisfaction.total_tickets, 0);
        assert!(data.daily_volume.is_empty());
        assert!(data.monthly_trend.is_empty());
        assert!(data.top_categories.is_empty());
        // Today panel ignores the filter
        assert_eq!(data.today.total_tickets, 1);
    }

    #[test]
    fn issue_category_falls_back_to_settings_default() {
        let options = DashboardOptions {
            default_issue_category: IssueCategory::ProductPurchased,
            ..DashboardOptions::default()
        };
        let data = build_dashboard(&base(), &DashboardFilter::default(), &options);
        assert_eq!(data.issue_category, "Product Purchased");

        let filter = DashboardFilter {
            issue_category: Some(IssueCategory::TicketType),
            ..DashboardFilter::default()
        };
        let data = build_dashboard(&base(), &filter, &options);
        assert_eq!(data.issue_category, "Ticket Type");
    }
}
