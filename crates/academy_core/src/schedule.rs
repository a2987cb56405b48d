//! Timetable keyed by natural key.

use crate::model::{Day, RecordId, ScheduleSlot, SchoolClass, SlotEntry, SlotKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All schedule slots, indexed by `(day, class, period)`.
///
/// The map makes "one slot per natural key" structural: there is nowhere
/// to put a second slot with the same key. On the wire the schedule is a
/// plain list ordered by key; when a list repeats a key the later slot wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ScheduleSlot>", into = "Vec<ScheduleSlot>")]
pub struct Schedule {
    slots: BTreeMap<SlotKey, ScheduleSlot>,
}

impl Schedule {
    /// Creates an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at a natural key.
    #[must_use]
    pub fn get(&self, key: &SlotKey) -> Option<&ScheduleSlot> {
        self.slots.get(key)
    }

    /// Slot with a given id.
    #[must_use]
    pub fn get_by_id(&self, id: &RecordId) -> Option<&ScheduleSlot> {
        self.slots.values().find(|slot| &slot.id == id)
    }

    /// Slots in key order.
    pub fn iter(&self) -> impl Iterator<Item = &ScheduleSlot> {
        self.slots.values()
    }

    /// Slots of one class on one day, ordered by period.
    pub fn for_day(&self, day: Day, class: SchoolClass) -> impl Iterator<Item = &ScheduleSlot> {
        let start = SlotKey::new(day, class, u8::MIN);
        let end = SlotKey::new(day, class, u8::MAX);
        self.slots.range(start..=end).map(|(_, slot)| slot)
    }

    /// Inserts or replaces the slot at the entry's key.
    ///
    /// A replaced slot keeps its id; a new slot gets a fresh one. Returns
    /// the slot id.
    pub fn upsert(&mut self, entry: SlotEntry) -> RecordId {
        let key = entry.key;
        let id = self
            .slots
            .get(&key)
            .map(|existing| existing.id.clone())
            .unwrap_or_else(RecordId::generate);
        self.slots.insert(key, entry.into_slot(id.clone()));
        id
    }

    /// Removes the slot with a given id.
    pub fn remove_by_id(&mut self, id: &RecordId) -> Option<ScheduleSlot> {
        let key = self.get_by_id(id)?.key();
        self.slots.remove(&key)
    }

    /// Clears `staff_id` on every slot assigned to `staff_id`. Returns the
    /// number of slots vacated.
    pub fn vacate_staff(&mut self, staff_id: &RecordId) -> usize {
        let mut vacated = 0;
        for slot in self.slots.values_mut() {
            if &slot.staff_id == staff_id {
                slot.staff_id = RecordId::empty();
                vacated += 1;
            }
        }
        vacated
    }
}

impl From<Vec<ScheduleSlot>> for Schedule {
    fn from(slots: Vec<ScheduleSlot>) -> Self {
        let slots = slots.into_iter().map(|slot| (slot.key(), slot)).collect();
        Self { slots }
    }
}

impl From<Schedule> for Vec<ScheduleSlot> {
    fn from(schedule: Schedule) -> Self {
        schedule.slots.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: Day, period: u8, subject: &str, staff: &str) -> SlotEntry {
        SlotEntry {
            subject: subject.into(),
            staff_id: staff.into(),
            ..SlotEntry::blank(SlotKey::new(day, SchoolClass::Grade1, period))
        }
    }

    #[test]
    fn upsert_replaces_same_key() {
        let mut schedule = Schedule::new();
        let first = schedule.upsert(entry(Day::Monday, 2, "Math", "t1"));
        let second = schedule.upsert(entry(Day::Monday, 2, "Science", "t1"));

        assert_eq!(first, second);
        assert_eq!(schedule.len(), 1);
        let slot = schedule
            .get(&SlotKey::new(Day::Monday, SchoolClass::Grade1, 2))
            .unwrap();
        assert_eq!(slot.subject, "Science");
    }

    #[test]
    fn for_day_is_ordered_by_period() {
        let mut schedule = Schedule::new();
        schedule.upsert(entry(Day::Tuesday, 3, "Art", ""));
        schedule.upsert(entry(Day::Tuesday, 1, "Math", ""));
        schedule.upsert(entry(Day::Monday, 2, "Music", ""));

        let periods: Vec<u8> = schedule
            .for_day(Day::Tuesday, SchoolClass::Grade1)
            .map(|s| s.period_number)
            .collect();
        assert_eq!(periods, vec![1, 3]);
    }

    #[test]
    fn duplicate_keys_on_the_wire_collapse() {
        let a = entry(Day::Monday, 1, "Math", "").into_slot("a".into());
        let b = entry(Day::Monday, 1, "Science", "").into_slot("b".into());

        let schedule = Schedule::from(vec![a, b]);
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule.iter().next().unwrap().id.as_str(), "b");
    }

    #[test]
    fn remove_and_vacate() {
        let mut schedule = Schedule::new();
        let id = schedule.upsert(entry(Day::Monday, 1, "Math", "t1"));
        schedule.upsert(entry(Day::Monday, 2, "Math", "t1"));
        schedule.upsert(entry(Day::Monday, 3, "Math", "t2"));

        assert_eq!(schedule.vacate_staff(&"t1".into()), 2);
        assert!(schedule.iter().all(|s| s.staff_id.as_str() != "t1"));

        let removed = schedule.remove_by_id(&id).unwrap();
        assert_eq!(removed.period_number, 1);
        assert!(schedule.remove_by_id(&id).is_none());
        assert_eq!(schedule.len(), 2);
    }
}
