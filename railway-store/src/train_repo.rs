use async_trait::async_trait;
use railway_core::repository::{RepoError, TrainRepository};
use railway_core::TrainRecord;
use sqlx::PgPool;

const TRAIN_COLUMNS: &str = "id, name, number, source, destination, departure_time, arrival_time, \
                             price, total_seats, available_seats";

pub struct PostgresTrainRepository {
    pool: PgPool,
}

impl PostgresTrainRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TrainRow {
    id: String,
    name: String,
    number: String,
    source: String,
    destination: String,
    departure_time: String,
    arrival_time: String,
    price: f64,
    total_seats: i32,
    available_seats: i32,
}

impl From<TrainRow> for TrainRecord {
    fn from(row: TrainRow) -> Self {
        TrainRecord {
            id: row.id,
            name: row.name,
            number: row.number,
            source: row.source,
            destination: row.destination,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            price: row.price,
            total_seats: row.total_seats,
            available_seats: row.available_seats,
        }
    }
}

#[async_trait]
impl TrainRepository for PostgresTrainRepository {
    async fn list_trains(&self) -> Result<Vec<TrainRecord>, RepoError> {
        let rows = sqlx::query_as::<_, TrainRow>(&format!(
            "SELECT {} FROM trains ORDER BY departure_time, name",
            TRAIN_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TrainRecord::from).collect())
    }

    async fn get_train(&self, id: &str) -> Result<Option<TrainRecord>, RepoError> {
        let row = sqlx::query_as::<_, TrainRow>(&format!("SELECT {} FROM trains WHERE id = $1", TRAIN_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(TrainRecord::from))
    }

    async fn find_by_route(&self, source: &str, destination: &str) -> Result<Vec<TrainRecord>, RepoError> {
        let rows = sqlx::query_as::<_, TrainRow>(&format!(
            r#"
            SELECT {} FROM trains
            WHERE LOWER(TRIM(source)) = LOWER(TRIM($1))
              AND LOWER(TRIM(destination)) = LOWER(TRIM($2))
            ORDER BY departure_time, name
            "#,
            TRAIN_COLUMNS
        ))
        .bind(source)
        .bind(destination)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TrainRecord::from).collect())
    }

    async fn save_train(&self, train: &TrainRecord) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO trains (id, name, number, source, destination, departure_time, arrival_time,
                                price, total_seats, available_seats)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                number = EXCLUDED.number,
                source = EXCLUDED.source,
                destination = EXCLUDED.destination,
                departure_time = EXCLUDED.departure_time,
                arrival_time = EXCLUDED.arrival_time,
                price = EXCLUDED.price,
                total_seats = EXCLUDED.total_seats,
                available_seats = EXCLUDED.available_seats
            "#,
        )
        .bind(&train.id)
        .bind(&train.name)
        .bind(&train.number)
        .bind(&train.source)
        .bind(&train.destination)
        .bind(&train.departure_time)
        .bind(&train.arrival_time)
        .bind(train.price)
        .bind(train.total_seats)
        .bind(train.available_seats)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_train(&self, id: &str) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM trains WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_trains(&self) -> Result<i64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trains")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn reserve_seats(&self, id: &str, count: i32) -> Result<Option<TrainRecord>, RepoError> {
        // Single statement so concurrent bookings cannot oversell.
        let row = sqlx::query_as::<_, TrainRow>(&format!(
            r#"
            UPDATE trains SET available_seats = available_seats - $2
            WHERE id = $1 AND available_seats >= $2
            RETURNING {}
            "#,
            TRAIN_COLUMNS
        ))
        .bind(id)
        .bind(count)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TrainRecord::from))
    }

    async fn release_seats(&self, id: &str, count: i32) -> Result<Option<TrainRecord>, RepoError> {
        let row = sqlx::query_as::<_, TrainRow>(&format!(
            r#"
            UPDATE trains SET available_seats = LEAST(total_seats, available_seats + $2)
            WHERE id = $1
            RETURNING {}
            "#,
            TRAIN_COLUMNS
        ))
        .bind(id)
        .bind(count)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TrainRecord::from))
    }
}
