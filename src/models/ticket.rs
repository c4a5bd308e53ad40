use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Header names the loader requires in the input file
pub const REQUIRED_COLUMNS: [&str; 12] = [
    "Ticket ID",
    "Customer Name",
    "Ticket Channel",
    "Ticket Priority",
    "Ticket Type",
    "Ticket Subject",
    "Product Purchased",
    "Ticket Status",
    "Date of Purchase",
    "First Response Time",
    "Time to Resolution",
    "Customer Satisfaction Rating",
];

/// One CSV row exactly as read from disk, before any derivation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTicket {
    #[serde(rename = "Ticket ID")]
    pub ticket_id: Option<String>,
    #[serde(rename = "Customer Name")]
    pub customer_name: Option<String>,
    #[serde(rename = "Ticket Channel")]
    pub channel: Option<String>,
    #[serde(rename = "Ticket Priority")]
    pub priority: Option<String>,
    #[serde(rename = "Ticket Type")]
    pub ticket_type: Option<String>,
    #[serde(rename = "Ticket Subject")]
    pub subject: Option<String>,
    #[serde(rename = "Product Purchased")]
    pub product: Option<String>,
    #[serde(rename = "Ticket Status")]
    pub status: Option<String>,
    #[serde(rename = "Date of Purchase")]
    pub date_of_purchase: Option<String>,
    #[serde(rename = "First Response Time")]
    pub first_response_time: Option<String>,
    #[serde(rename = "Time to Resolution")]
    pub time_to_resolution: Option<String>,
    #[serde(rename = "Customer Satisfaction Rating")]
    pub satisfaction_rating: Option<String>,
}

/// A normalized ticket. Derived fields are computed once at load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub ticket_id: String,
    pub customer_name: Option<String>,
    pub channel: Option<String>,
    pub priority: Option<String>,
    pub ticket_type: Option<String>,
    pub subject: Option<String>,
    pub product: Option<String>,
    pub status: Option<String>,
    pub purchased_at: Option<NaiveDateTime>,
    pub first_response_at: Option<NaiveDateTime>,
    pub resolved_at: Option<NaiveDateTime>,
    pub satisfaction_rating: Option<u8>,
    pub created_at: Option<NaiveDateTime>,
    pub response_after_creation_hrs: Option<i64>,
    pub resolution_after_response_hrs: i64,
    pub sla_threshold_hrs: u32,
    pub sla_breach: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    /// Exact, case-sensitive match on the labels used in the dataset
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Critical" => Some(Priority::Critical),
            "High" => Some(Priority::High),
            "Medium" => Some(Priority::Medium),
            "Low" => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Critical => "Critical",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Ticket columns that can be grouped on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketColumn {
    #[serde(rename = "Ticket Channel")]
    Channel,
    #[serde(rename = "Ticket Priority")]
    Priority,
    #[serde(rename = "Ticket Type")]
    Type,
    #[serde(rename = "Ticket Subject")]
    Subject,
    #[serde(rename = "Product Purchased")]
    Product,
    #[serde(rename = "Ticket Status")]
    Status,
}

impl TicketColumn {
    pub fn value_of<'a>(&self, ticket: &'a Ticket) -> Option<&'a str> {
        let value = match self {
            TicketColumn::Channel => &ticket.channel,
            TicketColumn::Priority => &ticket.priority,
            TicketColumn::Type => &ticket.ticket_type,
            TicketColumn::Subject => &ticket.subject,
            TicketColumn::Product => &ticket.product,
            TicketColumn::Status => &ticket.status,
        };
        value.as_deref()
    }

    pub fn label(&self) -> &'static str {
        match self {
            TicketColumn::Channel => "Ticket Channel",
            TicketColumn::Priority => "Ticket Priority",
            TicketColumn::Type => "Ticket Type",
            TicketColumn::Subject => "Ticket Subject",
            TicketColumn::Product => "Product Purchased",
            TicketColumn::Status => "Ticket Status",
        }
    }
}

/// Drill-down dimension for the trend and top-N charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IssueCategory {
    #[serde(rename = "Ticket Type")]
    TicketType,
    #[default]
    #[serde(rename = "Ticket Subject")]
    TicketSubject,
    #[serde(rename = "Product Purchased")]
    ProductPurchased,
}

impl IssueCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Ticket Type" => Some(IssueCategory::TicketType),
            "Ticket Subject" => Some(IssueCategory::TicketSubject),
            "Product Purchased" => Some(IssueCategory::ProductPurchased),
            _ => None,
        }
    }

    pub fn column(&self) -> TicketColumn {
        match self {
            IssueCategory::TicketType => TicketColumn::Type,
            IssueCategory::TicketSubject => TicketColumn::Subject,
            IssueCategory::ProductPurchased => TicketColumn::Product,
        }
    }
}
