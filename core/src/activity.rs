//! Raw activity rows: orders, support tickets, feedback.
//!
//! These are the inputs the snapshot is aggregated from. They are append-only;
//! a change to any of them means the owning customer is reassessed.

use crate::types::{CustomerId, EntityId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderStatus {
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Refunded  => "Refunded",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Completed" => Some(Self::Completed),
            "Cancelled" => Some(Self::Cancelled),
            "Refunded"  => Some(Self::Refunded),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IssueType {
    Technical,
    Billing,
    General,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technical => "Technical",
            Self::Billing   => "Billing",
            Self::General   => "General",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Technical" => Some(Self::Technical),
            "Billing"   => Some(Self::Billing),
            "General"   => Some(Self::General),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low    => "Low",
            Self::Medium => "Medium",
            Self::High   => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Low"    => Some(Self::Low),
            "Medium" => Some(Self::Medium),
            "High"   => Some(Self::High),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketStatus {
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open       => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved   => "Resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Open"        => Some(Self::Open),
            "In Progress" => Some(Self::InProgress),
            "Resolved"    => Some(Self::Resolved),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    pub order_id:     EntityId,
    pub customer_id:  CustomerId,
    pub order_date:   NaiveDateTime,
    pub total_amount: f64,
    pub items_count:  u32,
    pub status:       OrderStatus,
}

impl OrderRecord {
    pub fn is_completed(&self) -> bool {
        self.status == OrderStatus::Completed
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupportTicket {
    pub ticket_id:       EntityId,
    pub customer_id:     CustomerId,
    pub created_date:    NaiveDateTime,
    pub issue_type:      IssueType,
    pub priority:        TicketPriority,
    pub status:          TicketStatus,
    /// Hours to resolution, when known.
    pub resolution_time: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedbackRating {
    pub feedback_id: EntityId,
    pub customer_id: CustomerId,
    /// 1..=5
    pub rating:      u8,
    pub comment:     String,
    pub date:        NaiveDateTime,
    pub product_id:  EntityId,
}
