use super::round2;
use crate::models::metrics::{
    CategoryCount, DailyVolume, HourlyVolume, MonthlyCategoryCount, TodaySnapshot, TopCategory,
};
use crate::models::ticket::{IssueCategory, Ticket, TicketColumn};
use chrono::{Datelike, NaiveDate, Timelike};
use std::collections::BTreeMap;

fn count_by<'a, I>(values: I) -> BTreeMap<&'a str, usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_insert(0) += 1;
    }
    counts
}

/// Tickets created on the latest day present in `tickets`, split by hour
/// and ticket type. Meant for the unfiltered base table.
pub fn today_snapshot(tickets: &[Ticket]) -> TodaySnapshot {
    let Some(latest) = tickets.iter().filter_map(|t| t.created_at).map(|c| c.date()).max() else {
        return TodaySnapshot {
            date: None,
            total_tickets: 0,
            hourly: Vec::new(),
            type_distribution: Vec::new(),
        };
    };

    let today: Vec<&Ticket> = tickets
        .iter()
        .filter(|t| t.created_at.is_some_and(|c| c.date() == latest))
        .collect();

    let mut hourly: BTreeMap<u32, usize> = BTreeMap::new();
    for created in today.iter().filter_map(|t| t.created_at) {
        *hourly.entry(created.hour()).or_insert(0) += 1;
    }

    let types = count_by(today.iter().filter_map(|t| TicketColumn::Type.value_of(t)));

    TodaySnapshot {
        date: Some(latest),
        total_tickets: today.len(),
        hourly: hourly
            .into_iter()
            .map(|(hour, ticket_count)| HourlyVolume { hour, ticket_count })
            .collect(),
        type_distribution: types
            .into_iter()
            .map(|(category, ticket_count)| CategoryCount {
                category: category.to_string(),
                ticket_count,
            })
            .collect(),
    }
}

/// Daily ticket counts with a trailing rolling mean. Only tickets whose
/// first response came at or after creation are counted; days without
/// tickets inside the span are reported as zero.
pub fn daily_volume(tickets: &[Ticket], window_days: usize) -> Vec<DailyVolume> {
    let window = window_days.max(1);

    let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for ticket in tickets {
        let (Some(created), Some(responded)) = (ticket.created_at, ticket.first_response_at) else {
            continue;
        };
        if responded >= created {
            *per_day.entry(created.date()).or_insert(0) += 1;
        }
    }

    let (Some(first), Some(last)) = (
        per_day.keys().next().copied(),
        per_day.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    let counts: Vec<(NaiveDate, usize)> = first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| (day, per_day.get(&day).copied().unwrap_or(0)))
        .collect();

    counts
        .iter()
        .enumerate()
        .map(|(index, (date, ticket_count))| {
            let rolling_avg = (index + 1 >= window).then(|| {
                let total: usize = counts[index + 1 - window..=index].iter().map(|(_, c)| c).sum();
                total as f64 / window as f64
            });
            DailyVolume {
                date: *date,
                ticket_count: *ticket_count,
                rolling_avg,
            }
        })
        .collect()
}

/// Ticket counts per calendar month and category value
pub fn monthly_category_trend(tickets: &[Ticket], category: IssueCategory) -> Vec<MonthlyCategoryCount> {
    let column = category.column();
    let mut counts: BTreeMap<(NaiveDate, &str), usize> = BTreeMap::new();

    for ticket in tickets {
        let (Some(created), Some(value)) = (ticket.created_at, column.value_of(ticket)) else {
            continue;
        };
        let Some(month) = NaiveDate::from_ymd_opt(created.year(), created.month(), 1) else {
            continue;
        };
        *counts.entry((month, value)).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((month, value), ticket_count)| MonthlyCategoryCount {
            month,
            category: value.to_string(),
            ticket_count,
        })
        .collect()
}

/// The `limit` most frequent category values with their share of the top-N total
pub fn top_categories(tickets: &[Ticket], category: IssueCategory, limit: usize) -> Vec<TopCategory> {
    let column = category.column();
    let mut ranked: Vec<(&str, usize)> = count_by(tickets.iter().filter_map(|t| column.value_of(t)))
        .into_iter()
        .collect();

    // BTreeMap order is by name, so a stable sort keeps ties alphabetical
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);

    let total: usize = ranked.iter().map(|(_, count)| count).sum();
    ranked
        .into_iter()
        .map(|(value, ticket_count)| TopCategory {
            category: value.to_string(),
            ticket_count,
            percentage: round2(ticket_count as f64 / total as f64 * 100.0),
        })
        .collect()
}
