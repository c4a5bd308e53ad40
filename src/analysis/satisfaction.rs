use crate::models::metrics::{CsatDsat, SatisfactionBreakdown};
use crate::models::ticket::Ticket;

fn is_satisfied(rating: u8) -> bool {
    rating >= 4
}

fn is_dissatisfied(rating: u8) -> bool {
    rating <= 2
}

fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    count as f64 / total as f64 * 100.0
}

/// CSAT (ratings 4–5) and DSAT (ratings 1–2) as a share of *rated* tickets.
/// Returns zeros when nothing is rated.
pub fn csat_dsat(tickets: &[Ticket]) -> CsatDsat {
    let ratings: Vec<u8> = tickets.iter().filter_map(|t| t.satisfaction_rating).collect();
    let csat = ratings.iter().filter(|r| is_satisfied(**r)).count();
    let dsat = ratings.iter().filter(|r| is_dissatisfied(**r)).count();

    CsatDsat {
        csat_percent: percent(csat, ratings.len()),
        dsat_percent: percent(dsat, ratings.len()),
        rated_tickets: ratings.len(),
    }
}

/// Satisfied / neutral / dissatisfied as a share of *all* tickets, so unrated
/// tickets shrink every bucket. An empty table gives zeros with `total_tickets == 0`.
pub fn satisfaction_breakdown(tickets: &[Ticket]) -> SatisfactionBreakdown {
    let mut satisfied = 0;
    let mut neutral = 0;
    let mut dissatisfied = 0;

    for rating in tickets.iter().filter_map(|t| t.satisfaction_rating) {
        if is_satisfied(rating) {
            satisfied += 1;
        } else if is_dissatisfied(rating) {
            dissatisfied += 1;
        } else {
            neutral += 1;
        }
    }

    SatisfactionBreakdown {
        satisfied_percent: percent(satisfied, tickets.len()),
        neutral_percent: percent(neutral, tickets.len()),
        dissatisfied_percent: percent(dissatisfied, tickets.len()),
        total_tickets: tickets.len(),
    }
}
