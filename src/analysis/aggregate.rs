use super::round2;
use crate::models::metrics::GroupMetrics;
use crate::models::ticket::{Ticket, TicketColumn};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Default)]
struct GroupAccumulator<'a> {
    count: usize,
    resolution_sum: f64,
    breaches: usize,
    priorities: BTreeSet<&'a str>,
}

/// SLA metrics per distinct non-missing value of `column`, ordered by value.
/// Rows missing the column are skipped; an empty table yields no rows.
pub fn aggregate_by(tickets: &[Ticket], column: TicketColumn) -> Vec<GroupMetrics> {
    let mut groups: BTreeMap<&str, GroupAccumulator> = BTreeMap::new();

    for ticket in tickets {
        let Some(key) = column.value_of(ticket) else {
            continue;
        };

        let group = groups.entry(key).or_default();
        group.count += 1;
        group.resolution_sum += ticket.resolution_after_response_hrs as f64;
        group.breaches += usize::from(ticket.sla_breach);
        if let Some(priority) = ticket.priority.as_deref() {
            group.priorities.insert(priority);
        }
    }

    groups
        .into_iter()
        .map(|(key, group)| {
            let count = group.count as f64;
            GroupMetrics {
                group: key.to_string(),
                avg_resolution_hrs: round2(group.resolution_sum / count),
                sla_breach_rate: round2(group.breaches as f64 / count * 100.0),
                total_tickets: group.count,
                priorities: group.priorities.into_iter().map(str::to_string).collect(),
            }
        })
        .collect()
}
