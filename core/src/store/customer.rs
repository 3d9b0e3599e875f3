use super::{conversion_failure, enum_column, format_ts, int_column, not_found, ts_column, HealthStore};
use crate::{
    customer::{CustomerProfile, CustomerTier, Region},
    error::HealthResult,
    generator::SampleDataset,
    health_scorer::{ChurnRisk, HealthAssessment},
    snapshot::{CustomerActivitySnapshot, OrderTimestamp},
};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};

const CUSTOMER_COLUMNS: &str = "customer_id, name, email, phone, registration_date,
    customer_tier, region, total_orders, total_spent, last_order_date,
    support_tickets, avg_rating, health_score, churn_risk, lifetime_value,
    score_breakdown";

/// Exact-match filters plus skip/limit paging over customers in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerQuery {
    pub skip:          u32,
    pub limit:         u32,
    pub churn_risk:    Option<ChurnRisk>,
    pub customer_tier: Option<CustomerTier>,
    pub region:        Option<Region>,
}

impl Default for CustomerQuery {
    fn default() -> Self {
        Self {
            skip:          0,
            limit:         100,
            churn_risk:    None,
            customer_tier: None,
            region:        None,
        }
    }
}

impl HealthStore {
    // ── Customer ──────────────────────────────────────────────────

    pub fn insert_customer(&self, c: &CustomerProfile) -> HealthResult<()> {
        let breakdown = serde_json::to_string(&c.score_breakdown)?;
        self.conn.execute(
            "INSERT INTO customer (
                customer_id, name, email, phone, registration_date, customer_tier, region,
                total_orders, total_spent, last_order_date, support_tickets, avg_rating,
                health_score, churn_risk, lifetime_value, score_breakdown
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            params![
                &c.customer_id,
                &c.name,
                &c.email,
                &c.phone,
                format_ts(&c.registration_date),
                c.customer_tier.as_str(),
                c.region.as_str(),
                c.total_orders as i64,
                c.total_spent,
                c.last_order_date.as_ref().map(OrderTimestamp::to_storage),
                c.support_tickets as i64,
                c.avg_rating,
                c.health_score,
                c.churn_risk.as_str(),
                c.lifetime_value,
                breakdown,
            ],
        )?;
        Ok(())
    }

    /// Insert a whole generated population atomically.
    pub fn insert_dataset(&self, data: &SampleDataset) -> HealthResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for c in &data.customers {
            self.insert_customer(c)?;
        }
        for o in &data.orders {
            self.insert_order(o)?;
        }
        for t in &data.tickets {
            self.insert_ticket(t)?;
        }
        for f in &data.feedback {
            self.insert_feedback(f)?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_customer(&self, customer_id: &str) -> HealthResult<Option<CustomerProfile>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customer WHERE customer_id = ?1");
        let customer = self
            .conn
            .query_row(&sql, params![customer_id], customer_from_row)
            .optional()?;
        Ok(customer)
    }

    pub fn query_customers(&self, q: &CustomerQuery) -> HealthResult<Vec<CustomerProfile>> {
        let mut clauses = Vec::new();
        let mut args: Vec<&'static str> = Vec::new();
        if let Some(risk) = q.churn_risk {
            clauses.push("churn_risk = ?");
            args.push(risk.as_str());
        }
        if let Some(tier) = q.customer_tier {
            clauses.push("customer_tier = ?");
            args.push(tier.as_str());
        }
        if let Some(region) = q.region {
            clauses.push("region = ?");
            args.push(region.as_str());
        }
        let filter = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer {filter}
             ORDER BY rowid ASC LIMIT {} OFFSET {}",
            q.limit, q.skip
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args), customer_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// High-risk customers, weakest first.
    pub fn high_risk_customers(&self, limit: u32) -> HealthResult<Vec<CustomerProfile>> {
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer
             WHERE churn_risk = ?1
             ORDER BY health_score ASC, rowid ASC LIMIT ?2"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![ChurnRisk::High.as_str(), limit as i64],
            customer_from_row,
        )?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn customer_ids(&self) -> HealthResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT customer_id FROM customer ORDER BY rowid ASC")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn customer_count(&self) -> HealthResult<i64> {
        let n = self
            .conn
            .query_row("SELECT COUNT(*) FROM customer", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Persist a recomputed snapshot together with its assessment.
    pub fn update_assessment(
        &self,
        customer_id: &str,
        snapshot: &CustomerActivitySnapshot,
        assessment: &HealthAssessment,
    ) -> HealthResult<()> {
        let breakdown = serde_json::to_string(&assessment.score_breakdown)?;
        let changed = self.conn.execute(
            "UPDATE customer SET
                total_orders = ?1, total_spent = ?2, last_order_date = ?3,
                support_tickets = ?4, avg_rating = ?5,
                health_score = ?6, churn_risk = ?7, lifetime_value = ?8, score_breakdown = ?9
             WHERE customer_id = ?10",
            params![
                snapshot.total_orders as i64,
                snapshot.total_spent,
                snapshot.last_order_date.as_ref().map(OrderTimestamp::to_storage),
                snapshot.support_tickets as i64,
                snapshot.avg_rating,
                assessment.health_score,
                assessment.churn_risk.as_str(),
                assessment.lifetime_value,
                breakdown,
                customer_id,
            ],
        )?;
        if changed == 0 {
            return Err(not_found(customer_id));
        }
        Ok(())
    }
}

fn customer_from_row(row: &Row<'_>) -> rusqlite::Result<CustomerProfile> {
    let breakdown_json: String = row.get(15)?;
    let score_breakdown = serde_json::from_str(&breakdown_json)
        .map_err(|e| conversion_failure(15, e.to_string()))?;
    Ok(CustomerProfile {
        customer_id:       row.get(0)?,
        name:              row.get(1)?,
        email:             row.get(2)?,
        phone:             row.get(3)?,
        registration_date: ts_column(4, row.get(4)?)?,
        customer_tier:     enum_column(5, row.get(5)?, CustomerTier::parse)?,
        region:            enum_column(6, row.get(6)?, Region::parse)?,
        total_orders:      int_column(7, row.get(7)?)?,
        total_spent:       row.get(8)?,
        last_order_date:   row
            .get::<_, Option<String>>(9)?
            .map(|raw| OrderTimestamp::from_storage(&raw)),
        support_tickets:   int_column(10, row.get(10)?)?,
        avg_rating:        row.get(11)?,
        health_score:      row.get(12)?,
        churn_risk:        enum_column(13, row.get(13)?, ChurnRisk::parse)?,
        lifetime_value:    row.get(14)?,
        score_breakdown,
    })
}
