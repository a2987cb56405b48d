//! Record types held by the store.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Opaque identifier of a record.
///
/// Generated ids are random UUID strings, but any string read from a
/// persisted or remote document is accepted as-is. An empty id on a
/// reference field (e.g. [`ScheduleSlot::staff_id`]) means "unassigned".
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new random id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// The empty id, used for vacant references.
    #[must_use]
    pub fn empty() -> Self {
        Self(String::new())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the empty id.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({:?})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses the `FromStr` input of the enums below: case-insensitive, with
/// spaces, dashes and underscores ignored.
fn normalize(input: &str) -> String {
    input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Gender of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Other or undisclosed.
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        })
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" | "o" => Ok(Gender::Other),
            _ => Err(format!("unknown gender: {s}")),
        }
    }
}

/// A class section of the institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SchoolClass {
    /// Kindergarten 1.
    #[serde(rename = "KG1")]
    Kg1,
    /// Kindergarten 2.
    #[serde(rename = "KG2")]
    Kg2,
    /// Grade 1.
    #[serde(rename = "Grade 1")]
    Grade1,
    /// Grade 2.
    #[serde(rename = "Grade 2")]
    Grade2,
    /// Grade 3.
    #[serde(rename = "Grade 3")]
    Grade3,
    /// Grade 4.
    #[serde(rename = "Grade 4")]
    Grade4,
}

impl SchoolClass {
    /// All class sections in display order.
    pub const ALL: [SchoolClass; 6] = [
        SchoolClass::Kg1,
        SchoolClass::Kg2,
        SchoolClass::Grade1,
        SchoolClass::Grade2,
        SchoolClass::Grade3,
        SchoolClass::Grade4,
    ];

    /// Returns the display name, e.g. `"Grade 1"`.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            SchoolClass::Kg1 => "KG1",
            SchoolClass::Kg2 => "KG2",
            SchoolClass::Grade1 => "Grade 1",
            SchoolClass::Grade2 => "Grade 2",
            SchoolClass::Grade3 => "Grade 3",
            SchoolClass::Grade4 => "Grade 4",
        }
    }
}

impl fmt::Display for SchoolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for SchoolClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "kg1" => Ok(SchoolClass::Kg1),
            "kg2" => Ok(SchoolClass::Kg2),
            "grade1" | "g1" => Ok(SchoolClass::Grade1),
            "grade2" | "g2" => Ok(SchoolClass::Grade2),
            "grade3" | "g3" => Ok(SchoolClass::Grade3),
            "grade4" | "g4" => Ok(SchoolClass::Grade4),
            _ => Err(format!("unknown class: {s}")),
        }
    }
}

/// A teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
}

impl Day {
    /// All teaching days in week order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Returns the teaching day a date falls on, or `None` on weekends.
    #[must_use]
    pub fn of(date: NaiveDate) -> Option<Self> {
        match date.weekday() {
            Weekday::Mon => Some(Day::Monday),
            Weekday::Tue => Some(Day::Tuesday),
            Weekday::Wed => Some(Day::Wednesday),
            Weekday::Thu => Some(Day::Thursday),
            Weekday::Fri => Some(Day::Friday),
            Weekday::Sat | Weekday::Sun => None,
        }
    }
}

impl Day {
    /// Returns the day name, e.g. `"Monday"`.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Day {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "monday" | "mon" => Ok(Day::Monday),
            "tuesday" | "tue" => Ok(Day::Tuesday),
            "wednesday" | "wed" => Ok(Day::Wednesday),
            "thursday" | "thu" => Ok(Day::Thursday),
            "friday" | "fri" => Ok(Day::Friday),
            _ => Err(format!("unknown teaching day: {s}")),
        }
    }
}

/// A member of staff.
///
/// `is_active == false` exactly when `year_ended` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    /// Record id.
    pub id: RecordId,
    /// Full name.
    #[serde(alias = "fullName")]
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Contact phone number.
    #[serde(alias = "phoneNumber")]
    pub phone: String,
    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Subject specialization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    /// Year the member joined.
    pub year_started: i32,
    /// Year the member left; set only while inactive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_ended: Option<i32>,
    /// Whether the member is currently working.
    pub is_active: bool,
}

/// Fields of a staff member before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStaff {
    /// Full name.
    pub name: String,
    /// Gender.
    pub gender: Gender,
    /// Contact phone number.
    pub phone: String,
    /// Contact email.
    pub email: Option<String>,
    /// Subject specialization.
    pub specialization: Option<String>,
    /// Year the member joined.
    pub year_started: i32,
}

impl NewStaff {
    /// Assigns a fresh id and marks the member active.
    #[must_use]
    pub fn into_member(self) -> StaffMember {
        StaffMember {
            id: RecordId::generate(),
            name: self.name,
            gender: self.gender,
            phone: self.phone,
            email: self.email,
            specialization: self.specialization,
            year_started: self.year_started,
            year_ended: None,
            is_active: true,
        }
    }
}

/// Natural key of a schedule slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    /// Teaching day.
    pub day: Day,
    /// Class section.
    pub class_section: SchoolClass,
    /// Period number within the day.
    pub period_number: u8,
}

impl SlotKey {
    /// Creates a slot key.
    #[must_use]
    pub const fn new(day: Day, class_section: SchoolClass, period_number: u8) -> Self {
        Self {
            day,
            class_section,
            period_number,
        }
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} period {}",
            self.day, self.class_section, self.period_number
        )
    }
}

/// A recurring timetable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSlot {
    /// Record id.
    pub id: RecordId,
    /// Teaching day.
    pub day: Day,
    /// Class section.
    #[serde(alias = "classId")]
    pub class_section: SchoolClass,
    /// Period number within the day.
    pub period_number: u8,
    /// Subject taught; empty when unassigned.
    pub subject: String,
    /// Assigned staff member; empty when vacant. Not enforced.
    #[serde(alias = "teacherId")]
    pub staff_id: RecordId,
    /// Start time of day, e.g. `"08:00"`.
    pub start_time: String,
    /// End time of day, e.g. `"09:00"`.
    pub end_time: String,
}

impl ScheduleSlot {
    /// Returns the natural key of the slot.
    #[must_use]
    pub fn key(&self) -> SlotKey {
        SlotKey::new(self.day, self.class_section, self.period_number)
    }

    /// Returns true if no staff member is assigned.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.staff_id.is_empty()
    }
}

/// Contents of a schedule slot addressed by its natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotEntry {
    /// Natural key.
    pub key: SlotKey,
    /// Subject taught.
    pub subject: String,
    /// Assigned staff member.
    pub staff_id: RecordId,
    /// Start time of day.
    pub start_time: String,
    /// End time of day.
    pub end_time: String,
}

impl SlotEntry {
    /// Default start time of a newly created slot.
    pub const DEFAULT_START: &'static str = "08:00";
    /// Default end time of a newly created slot.
    pub const DEFAULT_END: &'static str = "09:00";

    /// Creates an unassigned entry with default times.
    #[must_use]
    pub fn blank(key: SlotKey) -> Self {
        Self {
            key,
            subject: String::new(),
            staff_id: RecordId::empty(),
            start_time: Self::DEFAULT_START.to_string(),
            end_time: Self::DEFAULT_END.to_string(),
        }
    }

    pub(crate) fn into_slot(self, id: RecordId) -> ScheduleSlot {
        ScheduleSlot {
            id,
            day: self.key.day,
            class_section: self.key.class_section,
            period_number: self.key.period_number,
            subject: self.subject,
            staff_id: self.staff_id,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }
}

impl From<&ScheduleSlot> for SlotEntry {
    fn from(slot: &ScheduleSlot) -> Self {
        Self {
            key: slot.key(),
            subject: slot.subject.clone(),
            staff_id: slot.staff_id.clone(),
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
        }
    }
}

/// A single-field edit of a timetable cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotField {
    /// Sets the subject.
    Subject(String),
    /// Assigns a staff member (empty id vacates).
    Staff(RecordId),
    /// Sets the start time.
    StartTime(String),
    /// Sets the end time.
    EndTime(String),
}

impl SlotField {
    pub(crate) fn apply(self, entry: &mut SlotEntry) {
        match self {
            SlotField::Subject(subject) => entry.subject = subject,
            SlotField::Staff(staff_id) => entry.staff_id = staff_id,
            SlotField::StartTime(time) => entry.start_time = time,
            SlotField::EndTime(time) => entry.end_time = time,
        }
    }
}

/// A logged teaching session.
///
/// Several records may share `(date, class, period)`; the store does not
/// deduplicate them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonRecord {
    /// Record id.
    pub id: RecordId,
    /// Class section.
    #[serde(alias = "classId")]
    pub class_section: SchoolClass,
    /// Day the lesson was taught.
    pub date: NaiveDate,
    /// Period number.
    pub period_number: u8,
    /// Subject taught.
    pub subject: String,
    /// Teaching staff member. Not enforced.
    #[serde(alias = "teacherId")]
    pub staff_id: RecordId,
    /// Time of capture as shown to the user, e.g. `"09:41"`.
    #[serde(alias = "timeTaught")]
    pub captured_at: String,
    /// Encoded whiteboard image payload.
    #[serde(alias = "whiteboardImage")]
    pub image: String,
}

/// Fields of a lesson record before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLesson {
    /// Class section.
    pub class_section: SchoolClass,
    /// Day the lesson was taught.
    pub date: NaiveDate,
    /// Period number.
    pub period_number: u8,
    /// Subject taught.
    pub subject: String,
    /// Teaching staff member.
    pub staff_id: RecordId,
    /// Time of capture.
    pub captured_at: String,
    /// Encoded whiteboard image payload.
    pub image: String,
}

impl NewLesson {
    pub(crate) fn into_record(self) -> LessonRecord {
        LessonRecord {
            id: RecordId::generate(),
            class_section: self.class_section,
            date: self.date,
            period_number: self.period_number,
            subject: self.subject,
            staff_id: self.staff_id,
            captured_at: self.captured_at,
            image: self.image,
        }
    }
}

/// A homework assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeworkRecord {
    /// Record id.
    pub id: RecordId,
    /// Class section.
    #[serde(alias = "classId")]
    pub class_section: SchoolClass,
    /// Day the homework was set.
    pub date: NaiveDate,
    /// Subject.
    pub subject: String,
    /// Instructions.
    pub description: String,
    /// Optional encoded image payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Fields of a homework record before an id is assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewHomework {
    /// Class section.
    pub class_section: SchoolClass,
    /// Day the homework was set.
    pub date: NaiveDate,
    /// Subject.
    pub subject: String,
    /// Instructions.
    pub description: String,
    /// Optional encoded image payload.
    pub image: Option<String>,
}

impl NewHomework {
    pub(crate) fn into_record(self) -> HomeworkRecord {
        HomeworkRecord {
            id: RecordId::generate(),
            class_section: self.class_section,
            date: self.date,
            subject: self.subject,
            description: self.description,
            image: self.image,
        }
    }
}

/// Bearer token and remote document id used for backups.
///
/// Persisted with the local state but never part of a snapshot. The token
/// is wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct SyncCredential {
    token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remote_id: Option<String>,
}

impl SyncCredential {
    /// Creates a credential. Blank tokens yield `None`; a blank remote id
    /// is treated as absent.
    #[must_use]
    pub fn new(token: impl Into<String>, remote_id: Option<String>) -> Option<Self> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return None;
        }
        Some(Self {
            token,
            remote_id: non_blank(remote_id),
        })
    }

    /// Returns the bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the remote document id, if one is known.
    #[must_use]
    pub fn remote_id(&self) -> Option<&str> {
        self.remote_id.as_deref()
    }

    pub(crate) fn set_remote_id(&mut self, remote_id: Option<String>) {
        self.remote_id = non_blank(remote_id);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl fmt::Debug for SyncCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCredential")
            .field("token", &"<redacted>")
            .field("remote_id", &self.remote_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert_ne!(a, b);
        assert!(!a.is_empty());
        assert!(RecordId::empty().is_empty());
    }

    #[test]
    fn enums_use_display_names_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&SchoolClass::Grade1).unwrap(),
            "\"Grade 1\""
        );
        assert_eq!(serde_json::to_string(&Day::Monday).unwrap(), "\"Monday\"");
        assert_eq!(serde_json::to_string(&Gender::Other).unwrap(), "\"Other\"");
    }

    #[test]
    fn enums_parse_loosely() {
        assert_eq!("grade 1".parse::<SchoolClass>(), Ok(SchoolClass::Grade1));
        assert_eq!("G3".parse::<SchoolClass>(), Ok(SchoolClass::Grade3));
        assert_eq!("kg-2".parse::<SchoolClass>(), Ok(SchoolClass::Kg2));
        assert_eq!("Wed".parse::<Day>(), Ok(Day::Wednesday));
        assert_eq!("F".parse::<Gender>(), Ok(Gender::Female));
        assert!("Saturday".parse::<Day>().is_err());
    }

    #[test]
    fn day_of_date() {
        let monday = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 5, 11).unwrap();
        assert_eq!(Day::of(monday), Some(Day::Monday));
        assert_eq!(Day::of(saturday), None);
    }

    #[test]
    fn staff_accepts_legacy_field_names() {
        let json = r#"{
            "id": "t1",
            "fullName": "Amina Yusuf",
            "gender": "Female",
            "phoneNumber": "0700000000",
            "yearStarted": 2019,
            "isActive": true
        }"#;
        let member: StaffMember = serde_json::from_str(json).unwrap();
        assert_eq!(member.name, "Amina Yusuf");
        assert_eq!(member.phone, "0700000000");
        assert_eq!(member.email, None);
    }

    #[test]
    fn new_staff_starts_active() {
        let member = NewStaff {
            name: "Omar".into(),
            gender: Gender::Male,
            phone: "1".into(),
            email: None,
            specialization: Some("Math".into()),
            year_started: 2020,
        }
        .into_member();
        assert!(member.is_active);
        assert_eq!(member.year_ended, None);
        assert!(!member.id.is_empty());
    }

    #[test]
    fn credential_rejects_blank_values() {
        assert!(SyncCredential::new("   ", None).is_none());
        let cred = SyncCredential::new(" tok ", Some("  ".into())).unwrap();
        assert_eq!(cred.token(), "tok");
        assert_eq!(cred.remote_id(), None);
    }

    #[test]
    fn credential_debug_hides_token() {
        let cred = SyncCredential::new("secret-token", Some("abc".into())).unwrap();
        let debug = format!("{cred:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("abc"));
    }

    #[test]
    fn slot_field_edits_entry() {
        let key = SlotKey::new(Day::Monday, SchoolClass::Grade1, 2);
        let mut entry = SlotEntry::blank(key);
        SlotField::Subject("Math".into()).apply(&mut entry);
        SlotField::Staff("t1".into()).apply(&mut entry);
        assert_eq!(entry.subject, "Math");
        assert_eq!(entry.staff_id.as_str(), "t1");
        assert_eq!(entry.start_time, "08:00");
    }
}
