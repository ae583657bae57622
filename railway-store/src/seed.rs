use railway_core::repository::TrainRepository;
use railway_core::TrainRecord;
use uuid::Uuid;

use crate::StoreError;

/// name, number, source, destination, departure, arrival, price, seats
const SERVICES: [(&str, &str, &str, &str, &str, &str, f64, i32); 12] = [
    ("Podi Menike", "1005", "Colombo", "Badulla", "05:55", "16:00", 1200.0, 500),
    ("Udarata Menike", "1015", "Colombo", "Badulla", "08:30", "17:30", 1500.0, 400),
    ("Tikiri Menike", "1023", "Colombo", "Hatton", "10:00", "14:00", 800.0, 300),
    ("Senkadagala Menike", "1035", "Colombo", "Kandy", "07:00", "09:30", 600.0, 450),
    ("Yal Devi", "4077", "Colombo", "Jaffna", "05:45", "13:00", 1800.0, 600),
    ("Uttara Devi", "4017", "Colombo", "Jaffna", "11:50", "19:00", 1800.0, 500),
    ("Galu Kumari", "8056", "Colombo", "Matara", "14:00", "17:30", 500.0, 400),
    ("Ruhunu Kumari", "8058", "Matara", "Colombo", "06:05", "09:30", 500.0, 400),
    ("Sagarika", "8096", "Galle", "Colombo", "16:45", "19:15", 400.0, 350),
    ("Sri Devi", "4003", "Colombo", "Trincomalee", "06:05", "13:30", 1600.0, 300),
    ("Night Mail", "1045", "Colombo", "Badulla", "20:00", "07:00", 2000.0, 200),
    ("Ella Odyssey", "1001", "Colombo", "Ella", "05:00", "15:00", 4000.0, 100),
];

pub fn default_trains() -> Vec<TrainRecord> {
    SERVICES
        .iter()
        .map(|&(name, number, source, destination, departure, arrival, price, seats)| TrainRecord {
            id: Uuid::new_v4().simple().to_string(),
            name: name.into(),
            number: number.into(),
            source: source.into(),
            destination: destination.into(),
            departure_time: departure.into(),
            arrival_time: arrival.into(),
            price,
            total_seats: seats,
            available_seats: seats,
        })
        .collect()
}

/// Fills an empty train store. Returns how many trains were inserted.
pub async fn seed_trains(repo: &dyn TrainRepository) -> Result<usize, StoreError> {
    let existing = repo.count_trains().await.map_err(|e| StoreError::Repository(e.to_string()))?;
    if existing > 0 {
        tracing::debug!(existing, "Train store already populated, skipping seed");
        return Ok(0);
    }

    let trains = default_trains();
    for train in &trains {
        repo.save_train(train).await.map_err(|e| StoreError::Repository(e.to_string()))?;
    }
    tracing::info!("Seeded {} trains", trains.len());
    Ok(trains.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryTrainRepository;

    #[tokio::test]
    async fn test_seed_only_when_empty() {
        let repo = InMemoryTrainRepository::new();
        assert_eq!(seed_trains(&repo).await.unwrap(), 12);
        assert_eq!(seed_trains(&repo).await.unwrap(), 0);
        assert_eq!(repo.count_trains().await.unwrap(), 12);

        let badulla = repo.find_by_route("Colombo", "Badulla").await.unwrap();
        let names: Vec<&str> = badulla.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Podi Menike", "Udarata Menike", "Night Mail"]);
    }
}
