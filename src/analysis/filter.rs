use crate::models::filter::DashboardFilter;
use crate::models::metrics::FilterOptions;
use crate::models::ticket::Ticket;
use std::collections::BTreeSet;

fn selected(choices: &[String], value: Option<&str>) -> bool {
    if choices.is_empty() {
        return true;
    }
    value.is_some_and(|v| choices.iter().any(|c| c == v))
}

/// True when the ticket passes every active filter dimension
pub fn matches(filter: &DashboardFilter, ticket: &Ticket) -> bool {
    if !selected(&filter.channels, ticket.channel.as_deref()) {
        return false;
    }
    if !selected(&filter.priorities, ticket.priority.as_deref()) {
        return false;
    }
    match filter.date_range {
        None => true,
        Some(range) => ticket
            .created_at
            .map(|created| {
                let day = created.date();
                day >= range.start && day <= range.end
            })
            .unwrap_or(false),
    }
}

/// A new table holding the tickets that pass `filter`; the base is untouched
pub fn apply_filter(tickets: &[Ticket], filter: &DashboardFilter) -> Vec<Ticket> {
    tickets
        .iter()
        .filter(|ticket| matches(filter, ticket))
        .cloned()
        .collect()
}

/// Choices and bounds for the filter widgets; missing values are left out
pub fn filter_options(tickets: &[Ticket]) -> FilterOptions {
    let channels: BTreeSet<&str> = tickets.iter().filter_map(|t| t.channel.as_deref()).collect();
    let priorities: BTreeSet<&str> = tickets.iter().filter_map(|t| t.priority.as_deref()).collect();
    let dates = tickets.iter().filter_map(|t| t.created_at.map(|c| c.date()));

    FilterOptions {
        channels: channels.into_iter().map(str::to_string).collect(),
        priorities: priorities.into_iter().map(str::to_string).collect(),
        date_min: dates.clone().min(),
        date_max: dates.max(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{created_on, ticket};
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 6, d).expect("valid date")
    }

    fn sample() -> Vec<Ticket> {
        vec![
            created_on(ticket(1, "Email", "High", 1, None), 2023, 6, 1, 9),
            created_on(ticket(2, "Chat", "Low", 1, None), 2023, 6, 2, 10),
            created_on(ticket(3, "Email", "Low", 1, None), 2023, 6, 3, 11),
            created_on(ticket(4, "Phone", "Critical", 1, None), 2023, 6, 4, 12),
            ticket(5, "Email", "Low", 1, None),
        ]
    }

    fn ids(tickets: &[Ticket]) -> Vec<String> {
        tickets.iter().map(|t| t.ticket_id.clone()).collect()
    }

    #[test]
    fn empty_selection_means_no_restriction() {
        let tickets = sample();
        assert_eq!(apply_filter(&tickets, &DashboardFilter::default()).len(), tickets.len());
    }

    #[test]
    fn date_range_is_inclusive_and_drops_undated_rows() {
        let filter = DashboardFilter::default().with_date_range(day(2), day(3));
        assert_eq!(ids(&apply_filter(&sample(), &filter)), vec!["2", "3"]);
    }

    #[test]
    fn inverted_date_range_selects_nothing() {
        let filter = DashboardFilter::default().with_date_range(day(4), day(1));
        assert!(apply_filter(&sample(), &filter).is_empty());
    }

    #[test]
    fn filters_compose_in_any_order() {
        let tickets = sample();
        let by_channel = DashboardFilter::default().with_channels(["Email", "Chat"]);
        let by_priority = DashboardFilter::default().with_priorities(["Low"]);
        let by_date = DashboardFilter::default().with_date_range(day(1), day(3));
        let combined = DashboardFilter::default()
            .with_channels(["Email", "Chat"])
            .with_priorities(["Low"])
            .with_date_range(day(1), day(3));

        let all_at_once = ids(&apply_filter(&tickets, &combined));
        let orders = [
            [&by_channel, &by_priority, &by_date],
            [&by_date, &by_priority, &by_channel],
            [&by_priority, &by_channel, &by_date],
        ];
        for order in orders {
            let mut view = tickets.clone();
            for filter in order {
                view = apply_filter(&view, filter);
            }
            assert_eq!(ids(&view), all_at_once);
        }
        assert_eq!(all_at_once, vec!["2", "3"]);
    }

    #[test]
    fn absent_channel_yields_empty_table() {
        let filter = DashboardFilter::default().with_channels(["Fax"]);
        assert!(apply_filter(&sample(), &filter).is_empty());
    }

    #[test]
    fn options_are_sorted_and_skip_missing_values() {
        let mut tickets = sample();
        tickets[0].channel = None;
        let options = filter_options(&tickets);
        assert_eq!(options.channels, vec!["Chat", "Email", "Phone"]);
        assert_eq!(options.priorities, vec!["Critical", "High", "Low"]);
        assert_eq!(options.date_min, Some(day(1)));
        assert_eq!(options.date_max, Some(day(4)));
    }

    #[test]
    fn options_for_empty_table_have_no_bounds() {
        let options = filter_options(&[]);
        assert!(options.channels.is_empty());
        assert_eq!(options.date_min, None);
        assert_eq!(options.date_max, None);
    }
}
