pub mod layout;
pub mod pricing;
pub mod seat_map;

pub use layout::CoachLayout;
pub use pricing::{CheckoutBreakdown, CheckoutCalculator, CheckoutRates};
pub use seat_map::{Seat, SeatMap, SeatMapError, SeatStatus};
