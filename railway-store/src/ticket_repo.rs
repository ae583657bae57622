use async_trait::async_trait;
use chrono::NaiveDate;
use railway_core::repository::{RepoError, TicketRepository};
use railway_core::{Ticket, TicketStatus};
use sqlx::PgPool;

const TICKET_COLUMNS: &str =
    "id, user_id, train_id, passenger_name, seat_number, seat_count, price, booking_date, status";

pub struct PostgresTicketRepository {
    pool: PgPool,
}

impl PostgresTicketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TicketRow {
    id: String,
    user_id: String,
    train_id: String,
    passenger_name: String,
    seat_number: i32,
    seat_count: i32,
    price: f64,
    booking_date: NaiveDate,
    status: String,
}

impl TryFrom<TicketRow> for Ticket {
    type Error = RepoError;

    fn try_from(row: TicketRow) -> Result<Self, Self::Error> {
        Ok(Ticket {
            id: row.id,
            user_id: row.user_id,
            train_id: row.train_id,
            passenger_name: row.passenger_name,
            seat_number: row.seat_number,
            seat_count: row.seat_count,
            price: row.price,
            booking_date: row.booking_date,
            status: row.status.parse::<TicketStatus>()?,
        })
    }
}

#[async_trait]
impl TicketRepository for PostgresTicketRepository {
    async fn save_ticket(&self, ticket: &Ticket) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            INSERT INTO tickets (id, user_id, train_id, passenger_name, seat_number, seat_count,
                                 price, booking_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (id) DO UPDATE SET
                passenger_name = EXCLUDED.passenger_name,
                seat_number = EXCLUDED.seat_number,
                seat_count = EXCLUDED.seat_count,
                price = EXCLUDED.price,
                status = EXCLUDED.status
            "#,
        )
        .bind(&ticket.id)
        .bind(&ticket.user_id)
        .bind(&ticket.train_id)
        .bind(&ticket.passenger_name)
        .bind(ticket.seat_number)
        .bind(ticket.seat_count)
        .bind(ticket.price)
        .bind(ticket.booking_date)
        .bind(ticket.status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_ticket(&self, id: &str) -> Result<Option<Ticket>, RepoError> {
        let row = sqlx::query_as::<_, TicketRow>(&format!("SELECT {} FROM tickets WHERE id = $1", TICKET_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Ticket::try_from).transpose()
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Ticket>, RepoError> {
        let rows = sqlx::query_as::<_, TicketRow>(&format!(
            "SELECT {} FROM tickets WHERE user_id = $1 ORDER BY booking_date DESC, id",
            TICKET_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Ticket::try_from).collect()
    }
}
