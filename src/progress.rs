use crate::models::{Habit, Target};
use serde::{Deserialize, Serialize};

/// Share of the target reached, clamped to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub percent: f64,
    pub label: String,
}

impl Progress {
    pub fn empty() -> Self {
        Self::from_percent(0.0)
    }

    pub fn of(habit: &Habit) -> Self {
        Self::compute(habit.days.len(), &habit.target)
    }

    /// Zero, negative or non-numeric targets count as no progress.
    pub fn compute(days: usize, target: &Target) -> Self {
        let percent = match target.as_f64() {
            Some(target) if target.is_finite() && target > 0.0 => {
                (days as f64 / target).min(1.0) * 100.0
            }
            _ => 0.0,
        };
        Self::from_percent(percent)
    }

    fn from_percent(percent: f64) -> Self {
        Self {
            percent,
            label: format!("{}%", percent.round() as u64),
        }
    }

    pub fn width_style(&self) -> String {
        format!("width: {}%", self.percent)
    }
}
