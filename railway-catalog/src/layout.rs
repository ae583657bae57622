use serde::{Deserialize, Serialize};

/// Seats per row, lettered A-D with the aisle after B.
pub const SEATS_PER_ROW: u32 = 4;

/// Coach tier inferred from a fare-class label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CoachLayout {
    /// Reclining chair and executive coaches.
    Chair,
    /// Premium first-class coaches.
    First,
    Standard,
}

impl CoachLayout {
    /// Chair/executive labels win over "First", so "First Executive" is a chair coach.
    pub fn for_class(class_type: &str) -> Self {
        if class_type.contains("Chair") || class_type.contains("Executive") {
            CoachLayout::Chair
        } else if class_type.contains("First") {
            CoachLayout::First
        } else {
            CoachLayout::Standard
        }
    }

    pub fn rows(&self) -> u32 {
        match self {
            CoachLayout::First => 8,
            CoachLayout::Chair => 12,
            CoachLayout::Standard => 15,
        }
    }

    pub fn columns(&self) -> u32 {
        SEATS_PER_ROW
    }

    pub fn capacity(&self) -> u32 {
        self.rows() * self.columns()
    }
}
