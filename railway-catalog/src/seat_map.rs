use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::layout::CoachLayout;

/// Chance that a generated seat is already taken. Stands in for a real seat inventory.
pub const BOOKED_PROBABILITY: f64 = 0.3;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeatStatus {
    Available,
    Selected,
    Booked,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Seat {
    pub id: String,
    pub row: u32,
    pub column: u32,
    pub status: SeatStatus,
}

impl Seat {
    /// `A1`, `B1`, ... `D15`.
    pub fn label(row: u32, column: u32) -> String {
        let letter = (b'A' + (column - 1) as u8) as char;
        format!("{}{}", letter, row)
    }
}

/// Seat grid for one coach, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMap {
    pub class_type: String,
    pub layout: CoachLayout,
    seats: Vec<Seat>,
}

impl SeatMap {
    pub fn generate<R: Rng + ?Sized>(class_type: &str, rng: &mut R) -> Self {
        let layout = CoachLayout::for_class(class_type);
        let mut seats = Vec::with_capacity(layout.capacity() as usize);

        for row in 1..=layout.rows() {
            for column in 1..=layout.columns() {
                let status = if rng.gen_bool(BOOKED_PROBABILITY) {
                    SeatStatus::Booked
                } else {
                    SeatStatus::Available
                };
                seats.push(Seat {
                    id: Seat::label(row, column),
                    row,
                    column,
                    status,
                });
            }
        }

        Self {
            class_type: class_type.to_string(),
            layout,
            seats,
        }
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, seat_id: &str) -> Option<&Seat> {
        self.seats.iter().find(|s| s.id == seat_id)
    }

    /// Flips available <-> selected. Booked seats are left untouched.
    pub fn toggle(&mut self, seat_id: &str) -> Result<SeatStatus, SeatMapError> {
        let seat = self
            .seats
            .iter_mut()
            .find(|s| s.id == seat_id)
            .ok_or_else(|| SeatMapError::UnknownSeat(seat_id.to_string()))?;

        seat.status = match seat.status {
            SeatStatus::Available => SeatStatus::Selected,
            SeatStatus::Selected => SeatStatus::Available,
            SeatStatus::Booked => SeatStatus::Booked,
        };
        Ok(seat.status)
    }

    /// Selected seat ids in grid order.
    pub fn selected_ids(&self) -> Vec<String> {
        self.seats
            .iter()
            .filter(|s| s.status == SeatStatus::Selected)
            .map(|s| s.id.clone())
            .collect()
    }

    pub fn count(&self, status: SeatStatus) -> usize {
        self.seats.iter().filter(|s| s.status == status).count()
    }

    /// Seats grouped by row for rendering, front of coach first.
    pub fn rows(&self) -> Vec<&[Seat]> {
        self.seats.chunks(self.layout.columns() as usize).collect()
    }

    #[cfg(test)]
    fn set_status(&mut self, seat_id: &str, status: SeatStatus) {
        if let Some(seat) = self.seats.iter_mut().find(|s| s.id == seat_id) {
            seat.status = status;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SeatMapError {
    #[error("Unknown seat: {0}")]
    UnknownSeat(String),
}
