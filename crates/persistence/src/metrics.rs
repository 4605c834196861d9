//! Store metrics.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Times a store operation and records it when dropped, so early returns
/// through `?` are measured too.
///
/// ```ignore
/// let _timer = QueryTimer::new("tasks.list_in_orgs");
/// sqlx::query_as::<_, TaskEntity>(...).fetch_all(&self.pool).await
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }
}

impl Drop for QueryTimer {
    fn drop(&mut self) {
        histogram!("database_query_duration_seconds", "query" => self.query_name)
            .record(self.start.elapsed().as_secs_f64());
    }
}

/// Publishes connection pool gauges.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!("database_connections_active").set(size.saturating_sub(idle) as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}
