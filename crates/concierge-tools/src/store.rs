//! In-memory customer and ticket records
//!
//! The store starts from a fixed seed and can be reset to it at any time.
//! All access goes through a `tokio` read/write lock.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::{Error, Result};

/// Account state of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    /// Active account
    Active,
    /// Disabled account
    Disabled,
}

/// Service tier of a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Entry tier
    Basic,
    /// Paid tier
    Premium,
    /// Contracted tier
    Enterprise,
}

/// Ticket lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly opened
    Open,
    /// Being worked on
    InProgress,
    /// Closed
    Resolved,
}

/// Ticket urgency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

macro_rules! parse_lowercase {
    ($ty:ty, $kind:literal) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                serde_json::from_value(serde_json::Value::String(s.trim().to_lowercase()))
                    .map_err(|_| Error::InvalidInput(format!("unknown {}: {s}", $kind)))
            }
        }
    };
}

parse_lowercase!(CustomerStatus, "status");
parse_lowercase!(Tier, "tier");
parse_lowercase!(TicketStatus, "ticket status");
parse_lowercase!(Priority, "priority");

/// Customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer id
    pub id: i64,
    /// Full name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Contact phone
    pub phone: Option<String>,
    /// Account state
    pub status: CustomerStatus,
    /// Service tier
    pub tier: Tier,
    /// Free-form billing note
    pub billing_info: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

/// Support ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Ticket id
    pub id: i64,
    /// Owning customer
    pub customer_id: i64,
    /// Issue description
    pub issue: String,
    /// Lifecycle state
    pub status: TicketStatus,
    /// Urgency
    pub priority: Priority,
    /// Creation time
    pub created_at: DateTime<Utc>,
}

/// Filter for [`RecordStore::list_customers`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    /// Only customers in this state
    pub status: Option<CustomerStatus>,
    /// Only customers on this tier
    pub tier: Option<Tier>,
    /// At most this many records
    pub limit: Option<usize>,
}

/// Changes accepted by [`RecordStore::update_customer`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerUpdate {
    /// New email
    pub email: Option<String>,
    /// New tier
    pub tier: Option<Tier>,
    /// New billing note
    pub billing_info: Option<String>,
}

impl CustomerUpdate {
    /// True when nothing would change
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.tier.is_none() && self.billing_info.is_none()
    }
}

/// Filter for [`RecordStore::list_tickets`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFilter {
    /// Owning customers; empty matches nobody
    pub customer_ids: Vec<i64>,
    /// Only tickets in this state
    pub status: Option<TicketStatus>,
    /// Only tickets with this priority
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone)]
struct Records {
    customers: BTreeMap<i64, Customer>,
    tickets: BTreeMap<i64, Ticket>,
    next_ticket_id: i64,
}

impl Records {
    fn seed() -> Self {
        let epoch = Utc
            .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);

        use CustomerStatus::{Active, Disabled};
        use Tier::{Basic, Enterprise, Premium};

        let customers = [
            (1, "John Doe", "john.doe@example.com", Some("+1-555-0101"), Active, Premium),
            (2, "Jane Smith", "jane.smith@example.com", Some("+1-555-0102"), Active, Basic),
            (3, "Bob Johnson", "bob.johnson@example.com", None, Disabled, Basic),
            (4, "Alice Williams", "alice.w@techcorp.com", Some("+1-555-0104"), Active, Enterprise),
            (5, "Charlie Brown", "charlie.brown@email.com", None, Active, Basic),
            (12345, "Priya Patel", "priya.patel@example.com", Some("+1-555-0145"), Active, Basic),
        ]
        .into_iter()
        .enumerate()
        .map(|(n, (id, name, email, phone, status, tier))| {
            let created_at = epoch + Duration::days(n as i64 * 7);
            (
                id,
                Customer {
                    id,
                    name: name.to_string(),
                    email: email.to_string(),
                    phone: phone.map(str::to_string),
                    status,
                    tier,
                    billing_info: None,
                    created_at,
                    updated_at: created_at,
                },
            )
        })
        .collect();

        let tickets: BTreeMap<i64, Ticket> = [
            (1, "Cannot login to account", TicketStatus::Open, Priority::High),
            (1, "Password reset email not arriving", TicketStatus::Resolved, Priority::Medium),
            (2, "Billing question about last invoice", TicketStatus::InProgress, Priority::Medium),
            (4, "Request for enterprise SSO setup", TicketStatus::Open, Priority::Low),
            (5, "App crashes on startup", TicketStatus::Open, Priority::High),
            (12345, "Charged twice this month", TicketStatus::Open, Priority::High),
        ]
        .into_iter()
        .enumerate()
        .map(|(n, (customer_id, issue, status, priority))| {
            let id = n as i64 + 1;
            (
                id,
                Ticket {
                    id,
                    customer_id,
                    issue: issue.to_string(),
                    status,
                    priority,
                    created_at: epoch + Duration::days(60 + n as i64),
                },
            )
        })
        .collect();

        let next_ticket_id = tickets.keys().max().copied().unwrap_or(0) + 1;
        Self {
            customers,
            tickets,
            next_ticket_id,
        }
    }
}

/// Customer and ticket records behind a lock
pub struct RecordStore {
    records: RwLock<Records>,
}

impl fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

impl Default for RecordStore {
    fn default() -> Self {
        Self::seeded()
    }
}

impl RecordStore {
    /// Store holding the seed records
    #[must_use]
    pub fn seeded() -> Self {
        Self {
            records: RwLock::new(Records::seed()),
        }
    }

    /// Restore the seed records
    pub async fn reset(&self) {
        *self.records.write().await = Records::seed();
        info!("Record store reset to seed data");
    }

    /// Customer by id
    pub async fn customer(&self, id: i64) -> Result<Customer> {
        self.records
            .read()
            .await
            .customers
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::customer_not_found(id))
    }

    /// Customers matching `filter`, ordered by id
    pub async fn list_customers(&self, filter: &CustomerFilter) -> Vec<Customer> {
        let records = self.records.read().await;
        records
            .customers
            .values()
            .filter(|c| filter.status.is_none_or(|s| c.status == s))
            .filter(|c| filter.tier.is_none_or(|t| c.tier == t))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }

    /// Apply `update` and return the new record
    pub async fn update_customer(&self, id: i64, update: CustomerUpdate) -> Result<Customer> {
        if update.is_empty() {
            return Err(Error::InvalidInput("no fields to update".to_string()));
        }

        let mut records = self.records.write().await;
        let customer = records
            .customers
            .get_mut(&id)
            .ok_or_else(|| Error::customer_not_found(id))?;

        if let Some(email) = update.email {
            customer.email = email;
        }
        if let Some(tier) = update.tier {
            customer.tier = tier;
        }
        if let Some(billing_info) = update.billing_info {
            customer.billing_info = Some(billing_info);
        }
        customer.updated_at = Utc::now();

        info!(customer_id = id, "Customer updated");
        Ok(customer.clone())
    }

    /// Open a ticket for an existing customer
    pub async fn create_ticket(
        &self,
        customer_id: i64,
        issue: &str,
        priority: Priority,
    ) -> Result<Ticket> {
        let issue = issue.trim();
        if issue.is_empty() {
            return Err(Error::InvalidInput("issue must not be empty".to_string()));
        }

        let mut records = self.records.write().await;
        if !records.customers.contains_key(&customer_id) {
            return Err(Error::customer_not_found(customer_id));
        }

        let id = records.next_ticket_id;
        records.next_ticket_id += 1;
        let ticket = Ticket {
            id,
            customer_id,
            issue: issue.to_string(),
            status: TicketStatus::Open,
            priority,
            created_at: Utc::now(),
        };
        records.tickets.insert(id, ticket.clone());

        info!(ticket_id = id, customer_id, priority = ?priority, "Ticket created");
        Ok(ticket)
    }

    /// Every ticket of a customer, newest first
    pub async fn history(&self, customer_id: i64) -> Result<Vec<Ticket>> {
        let records = self.records.read().await;
        if !records.customers.contains_key(&customer_id) {
            return Err(Error::customer_not_found(customer_id));
        }

        let mut tickets: Vec<Ticket> = records
            .tickets
            .values()
            .filter(|t| t.customer_id == customer_id)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tickets)
    }

    /// Tickets matching `filter`, ordered by id
    pub async fn list_tickets(&self, filter: &TicketFilter) -> Vec<Ticket> {
        let records = self.records.read().await;
        records
            .tickets
            .values()
            .filter(|t| filter.customer_ids.contains(&t.customer_id))
            .filter(|t| filter.status.is_none_or(|s| t.status == s))
            .filter(|t| filter.priority.is_none_or(|p| t.priority == p))
            .cloned()
            .collect()
    }
}
