use super::{enum_column, format_ts, int_column, ts_column, HealthStore};
use crate::{
    activity::{
        FeedbackRating, IssueType, OrderRecord, OrderStatus, SupportTicket, TicketPriority,
        TicketStatus,
    },
    error::HealthResult,
    snapshot::CustomerActivitySnapshot,
};
use rusqlite::params;

impl HealthStore {
    // ── Orders ────────────────────────────────────────────────────

    pub fn insert_order(&self, o: &OrderRecord) -> HealthResult<()> {
        self.conn.execute(
            "INSERT INTO orders (order_id, customer_id, order_date, total_amount, items_count, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &o.order_id,
                &o.customer_id,
                format_ts(&o.order_date),
                o.total_amount,
                o.items_count as i64,
                o.status.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn orders_for(&self, customer_id: &str) -> HealthResult<Vec<OrderRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT order_id, customer_id, order_date, total_amount, items_count, status
             FROM orders WHERE customer_id = ?1 ORDER BY order_date ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![customer_id], |row| {
            Ok(OrderRecord {
                order_id:     row.get(0)?,
                customer_id:  row.get(1)?,
                order_date:   ts_column(2, row.get(2)?)?,
                total_amount: row.get(3)?,
                items_count:  int_column(4, row.get(4)?)?,
                status:       enum_column(5, row.get(5)?, OrderStatus::parse)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Support tickets ───────────────────────────────────────────

    pub fn insert_ticket(&self, t: &SupportTicket) -> HealthResult<()> {
        self.conn.execute(
            "INSERT INTO support_ticket (
                ticket_id, customer_id, created_date, issue_type, priority, status, resolution_time
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &t.ticket_id,
                &t.customer_id,
                format_ts(&t.created_date),
                t.issue_type.as_str(),
                t.priority.as_str(),
                t.status.as_str(),
                t.resolution_time.map(|h| h as i64),
            ],
        )?;
        Ok(())
    }

    pub fn tickets_for(&self, customer_id: &str) -> HealthResult<Vec<SupportTicket>> {
        let mut stmt = self.conn.prepare(
            "SELECT ticket_id, customer_id, created_date, issue_type, priority, status, resolution_time
             FROM support_ticket WHERE customer_id = ?1 ORDER BY created_date ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![customer_id], |row| {
            Ok(SupportTicket {
                ticket_id:       row.get(0)?,
                customer_id:     row.get(1)?,
                created_date:    ts_column(2, row.get(2)?)?,
                issue_type:      enum_column(3, row.get(3)?, IssueType::parse)?,
                priority:        enum_column(4, row.get(4)?, TicketPriority::parse)?,
                status:          enum_column(5, row.get(5)?, TicketStatus::parse)?,
                resolution_time: row
                    .get::<_, Option<i64>>(6)?
                    .map(|h| int_column(6, h))
                    .transpose()?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Feedback ──────────────────────────────────────────────────

    pub fn insert_feedback(&self, f: &FeedbackRating) -> HealthResult<()> {
        self.conn.execute(
            "INSERT INTO feedback (feedback_id, customer_id, rating, comment, date, product_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &f.feedback_id,
                &f.customer_id,
                f.rating as i64,
                &f.comment,
                format_ts(&f.date),
                &f.product_id,
            ],
        )?;
        Ok(())
    }

    pub fn feedback_for(&self, customer_id: &str) -> HealthResult<Vec<FeedbackRating>> {
        let mut stmt = self.conn.prepare(
            "SELECT feedback_id, customer_id, rating, comment, date, product_id
             FROM feedback WHERE customer_id = ?1 ORDER BY date ASC, rowid ASC",
        )?;
        let rows = stmt.query_map(params![customer_id], |row| {
            Ok(FeedbackRating {
                feedback_id: row.get(0)?,
                customer_id: row.get(1)?,
                rating:      int_column(2, row.get(2)?)?,
                comment:     row.get(3)?,
                date:        ts_column(4, row.get(4)?)?,
                product_id:  row.get(5)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    // ── Snapshot ──────────────────────────────────────────────────

    /// Rebuild a customer's snapshot from the activity rows on file.
    pub fn activity_snapshot(&self, customer_id: &str) -> HealthResult<CustomerActivitySnapshot> {
        let orders = self.orders_for(customer_id)?;
        let tickets = self.tickets_for(customer_id)?;
        let feedback = self.feedback_for(customer_id)?;
        Ok(CustomerActivitySnapshot::from_activity(&orders, &tickets, &feedback))
    }
}
