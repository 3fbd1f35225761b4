use crate::models::{Day, Habit, ICON_PALETTE, Target};
use crate::progress::Progress;
use crate::routing::parse_fragment;

/// Mutators only touch memory; callers persist `habits()` afterwards.
#[derive(Debug, Clone)]
pub struct Tracker {
    habits: Vec<Habit>,
    active: Option<u64>,
    icon_choice: String,
}

impl Default for Tracker {
    fn default() -> Self {
        Self {
            habits: Vec::new(),
            active: None,
            icon_choice: ICON_PALETTE[0].0.to_string(),
        }
    }
}

impl Tracker {
    pub fn new(habits: Vec<Habit>) -> Self {
        let mut tracker = Self::default();
        tracker.restore(habits);
        tracker
    }

    pub fn restore(&mut self, habits: Vec<Habit>) {
        self.habits = habits;
        self.active = None;
    }

    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn active_id(&self) -> Option<u64> {
        self.active
    }

    pub fn active(&self) -> Option<&Habit> {
        let id = self.active?;
        self.habits.iter().find(|habit| habit.id == id)
    }

    pub fn active_progress(&self) -> Option<Progress> {
        self.active().map(Progress::of)
    }

    pub fn icon_choice(&self) -> &str {
        &self.icon_choice
    }

    /// `None` once the largest stored id is `u64::MAX`.
    pub fn next_id(&self) -> Option<u64> {
        self.habits
            .iter()
            .map(|habit| habit.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    pub fn select(&mut self, id: u64) -> bool {
        if self.habits.iter().any(|habit| habit.id == id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    // fragment id if it exists, else first habit, else nothing
    pub fn bootstrap(&mut self, fragment: Option<&str>) -> Option<u64> {
        let requested = fragment.and_then(parse_fragment);
        if !requested.is_some_and(|id| self.select(id)) {
            self.active = self.habits.first().map(|habit| habit.id);
        }
        self.active
    }

    pub fn add_habit(&mut self, name: String, icon: String, target: Target) -> Option<u64> {
        let id = self.next_id()?;
        self.icon_choice.clone_from(&icon);
        self.habits.push(Habit {
            id,
            name,
            icon,
            target,
            days: Vec::new(),
        });
        self.active = Some(id);
        Some(id)
    }

    pub fn delete_habit(&mut self, id: u64) -> bool {
        let before = self.habits.len();
        self.habits.retain(|habit| habit.id != id);
        if self.habits.len() == before {
            return false;
        }
        self.active = self.habits.first().map(|habit| habit.id);
        true
    }

    pub fn add_day(&mut self, comment: String) -> bool {
        match self.active_mut() {
            Some(habit) => {
                habit.days.push(Day { comment });
                true
            }
            None => false,
        }
    }

    pub fn delete_day(&mut self, index: usize) -> bool {
        match self.active_mut() {
            Some(habit) if index < habit.days.len() => {
                habit.days.remove(index);
                true
            }
            _ => false,
        }
    }

    fn active_mut(&mut self) -> Option<&mut Habit> {
        let id = self.active?;
        self.habits.iter_mut().find(|habit| habit.id == id)
    }
}
