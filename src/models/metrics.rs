use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-group SLA metrics (one row per distinct channel, priority, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMetrics {
    pub group: String,
    pub avg_resolution_hrs: f64,
    pub sla_breach_rate: f64,
    pub total_tickets: usize,
    pub priorities: Vec<String>,
}

/// CSAT/DSAT against rated tickets only
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CsatDsat {
    pub csat_percent: f64,
    pub dsat_percent: f64,
    pub rated_tickets: usize,
}

/// Three-way split against every ticket, rated or not
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionBreakdown {
    pub satisfied_percent: f64,
    pub neutral_percent: f64,
    pub dissatisfied_percent: f64,
    pub total_tickets: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionReport {
    pub csat_dsat: CsatDsat,
    pub breakdown: SatisfactionBreakdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub max_breach_rate: Option<f64>,
    pub avg_resolution_hrs: Option<f64>,
    pub total_tickets: usize,
    pub csat_percent: f64,
    pub dsat_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub ticket_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyVolume {
    pub hour: u32,
    pub ticket_count: usize,
}

/// Activity on the latest day present in the dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodaySnapshot {
    pub date: Option<NaiveDate>,
    pub total_tickets: usize,
    pub hourly: Vec<HourlyVolume>,
    pub type_distribution: Vec<CategoryCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyVolume {
    pub date: NaiveDate,
    pub ticket_count: usize,
    pub rolling_avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCategoryCount {
    pub month: NaiveDate,
    pub category: String,
    pub ticket_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCategory {
    pub category: String,
    pub ticket_count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub channels: Vec<String>,
    pub priorities: Vec<String>,
    pub date_min: Option<NaiveDate>,
    pub date_max: Option<NaiveDate>,
}

/// Every chart payload the dashboard renders for one filter selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub kpis: KpiSummary,
    pub channel_metrics: Vec<GroupMetrics>,
    pub satisfaction: SatisfactionBreakdown,
    pub today: TodaySnapshot,
    pub daily_volume: Vec<DailyVolume>,
    pub issue_category: String,
    pub monthly_trend: Vec<MonthlyCategoryCount>,
    pub top_categories: Vec<TopCategory>,
}
