//! SQLite-backed store for tracked orders and their histories

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, Sqlite, SqlitePool, migrate::MigrateDatabase};
use tracing::info;

use crate::error::TrackError;
use crate::models::{EntryHistory, Observation, ObservationReason, TrackedOrder};

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the database named by `DATABASE_URL` (default
    /// `sqlite:tracker.db`), creating the file and running migrations
    /// on first use.
    pub async fn new() -> Result<Self, TrackError> {
        let db_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:tracker.db".to_string());

        if !Sqlite::database_exists(&db_url).await.unwrap_or(false) {
            info!("Creating database file");
            Sqlite::create_database(&db_url).await?;
        }

        Self::connect(&db_url).await
    }

    /// Connects to an explicit database URL and runs migrations.
    pub async fn connect(db_url: &str) -> Result<Self, TrackError> {
        // One connection is enough: cycles are single-flight, and it keeps
        // `sqlite::memory:` from handing each connection its own database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(db_url)
            .await?;

        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Registers a new order for tracking.
    pub async fn add_order(&self, order: &TrackedOrder) -> Result<(), TrackError> {
        sqlx::query(
            r"
            INSERT INTO orders (id, retailer_id, product_identifier, name, color, size, search_count)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(&order.id)
        .bind(&order.retailer_id)
        .bind(&order.product_identifier)
        .bind(&order.name)
        .bind(&order.color)
        .bind(&order.size)
        .bind(order.search_count)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Loads every tracked order with its full observation history.
    pub async fn list_tracked(&self) -> Result<Vec<TrackedOrder>, TrackError> {
        let rows = sqlx::query(
            "SELECT id, retailer_id, product_identifier, name, color, size, search_count
             FROM orders ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let history = self.load_history(&id).await?;

            orders.push(TrackedOrder {
                id,
                retailer_id: row.get("retailer_id"),
                product_identifier: row.get("product_identifier"),
                name: row.get("name"),
                color: row.get("color"),
                size: row.get("size"),
                history,
                search_count: row.get("search_count"),
            });
        }

        Ok(orders)
    }

    async fn load_history(&self, order_id: &str) -> Result<EntryHistory, TrackError> {
        let rows = sqlx::query(
            "SELECT price, available, reason, recorded_at
             FROM observations WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        let entries = rows
            .into_iter()
            .map(|row| Observation {
                price: row.get("price"),
                available: row.get("available"),
                reason: ObservationReason::from(row.get::<String, _>("reason").as_str()),
                recorded_at: row.get("recorded_at"),
            })
            .collect();

        Ok(EntryHistory::from_entries(entries))
    }

    /// Persists an order's counter and any history entries appended since
    /// the last save, in one transaction.
    ///
    /// Either the whole append + increment for a cycle lands, or none of
    /// it does; a failed order never leaves partial state behind.
    pub async fn save(&self, order: &TrackedOrder) -> Result<(), TrackError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE orders SET search_count = ? WHERE id = ?")
            .bind(order.search_count)
            .bind(&order.id)
            .execute(&mut *tx)
            .await?;

        let persisted: i64 =
            sqlx::query("SELECT COUNT(*) AS n FROM observations WHERE order_id = ?")
                .bind(&order.id)
                .fetch_one(&mut *tx)
                .await?
                .get("n");

        for observation in order.history.entries().iter().skip(persisted as usize) {
            sqlx::query(
                r"
                INSERT INTO observations (order_id, price, available, reason, recorded_at)
                VALUES (?, ?, ?, ?, ?)
                ",
            )
            .bind(&order.id)
            .bind(observation.price)
            .bind(observation.available)
            .bind(observation.reason.as_str())
            .bind(observation.recorded_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}
