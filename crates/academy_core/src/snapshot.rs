//! Snapshot codec.
//!
//! A snapshot is the whole dataset without the sync credential. It is what
//! gets exported and exchanged with the remote document service. The
//! locally persisted document is the same snapshot with the credential
//! added under a `credential` key.
//!
//! ```text
//! {
//!   "currentUser": "admin" | null,
//!   "staff": [...],
//!   "scheduleSlots": [...],
//!   "lessons": [...],
//!   "homework": [...],
//!   "credential": { "token", "remoteId"? }   <- persisted document only
//! }
//! ```

use crate::error::{CoreError, CoreResult};
use crate::model::{HomeworkRecord, LessonRecord, StaffMember, SyncCredential};
use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Collections every snapshot must carry, with the names used by older
/// documents.
const REQUIRED_COLLECTIONS: [(&str, &str); 4] = [
    ("staff", "teachers"),
    ("scheduleSlots", "timetable"),
    ("lessons", "lessons"),
    ("homework", "homework"),
];

/// Top-level keys under which older persisted documents kept the credential.
const LEGACY_TOKEN_KEY: &str = "githubToken";
const LEGACY_REMOTE_ID_KEY: &str = "githubGistId";

/// The dataset exchanged with the remote store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Name of the signed-in user, if any.
    #[serde(default)]
    pub current_user: Option<String>,
    /// Staff members in insertion order.
    #[serde(alias = "teachers")]
    pub staff: Vec<StaffMember>,
    /// Timetable.
    #[serde(alias = "timetable")]
    pub schedule_slots: Schedule,
    /// Lesson log in insertion order.
    pub lessons: Vec<LessonRecord>,
    /// Homework in insertion order.
    pub homework: Vec<HomeworkRecord>,
}

impl Snapshot {
    /// Total number of records across collections.
    #[must_use]
    pub fn record_count(&self) -> usize {
        self.staff.len() + self.schedule_slots.len() + self.lessons.len() + self.homework.len()
    }
}

/// Everything the record store holds: the snapshot plus the credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    /// Domain data.
    pub snapshot: Snapshot,
    /// Credential for remote backups; never leaves through a snapshot.
    pub credential: Option<SyncCredential>,
}

#[derive(Serialize)]
struct PersistedRef<'a> {
    #[serde(flatten)]
    snapshot: &'a Snapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    credential: Option<&'a SyncCredential>,
}

/// Encodes and decodes snapshot documents.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotCodec {
    pretty: bool,
}

impl Default for SnapshotCodec {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl SnapshotCodec {
    /// Creates a codec; `pretty` selects indented output.
    #[must_use]
    pub const fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serializes every collection of `state` except the credential.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self, state: &StoreState) -> CoreResult<String> {
        self.to_string(&state.snapshot)
    }

    /// Decodes a snapshot document into a replacement state.
    ///
    /// The returned state carries `credential` unchanged: the credential
    /// passes through the caller and is never read from the document, even
    /// when the document has one.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSnapshot` if the document is not JSON, is not an
    /// object, lacks one of the four collections, has a collection that is
    /// not a list, or holds records that do not decode.
    pub fn decode(
        &self,
        document: &str,
        credential: Option<SyncCredential>,
    ) -> CoreResult<StoreState> {
        let value = parse(document.as_bytes())?;
        decode_value(value, credential)
    }

    /// Serializes the full local state, credential included.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode_persisted(&self, state: &StoreState) -> CoreResult<Vec<u8>> {
        let persisted = PersistedRef {
            snapshot: &state.snapshot,
            credential: state.credential.as_ref(),
        };
        Ok(self.to_string(&persisted)?.into_bytes())
    }

    /// Decodes a locally persisted document, credential included.
    ///
    /// Documents that kept the credential as top-level `githubToken` /
    /// `githubGistId` fields are accepted as well.
    ///
    /// # Errors
    ///
    /// Returns `MalformedSnapshot` under the same conditions as
    /// [`SnapshotCodec::decode`], or if the credential entry is invalid.
    pub fn decode_persisted(&self, bytes: &[u8]) -> CoreResult<StoreState> {
        let mut value = parse(bytes)?;
        let credential = match value.as_object_mut() {
            Some(object) => take_credential(object)?,
            None => None,
        };
        decode_value(value, credential)
    }

    fn to_string<T: Serialize>(&self, value: &T) -> CoreResult<String> {
        let encoded = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(encoded)
    }
}

fn parse(bytes: &[u8]) -> CoreResult<Value> {
    serde_json::from_slice(bytes)
        .map_err(|e| CoreError::malformed_snapshot(format!("not valid JSON: {e}")))
}

fn decode_value(value: Value, credential: Option<SyncCredential>) -> CoreResult<StoreState> {
    validate_shape(&value)?;
    let snapshot: Snapshot = serde_json::from_value(value)
        .map_err(|e| CoreError::malformed_snapshot(format!("invalid record: {e}")))?;
    Ok(StoreState {
        snapshot,
        credential,
    })
}

fn validate_shape(value: &Value) -> CoreResult<()> {
    let object = value
        .as_object()
        .ok_or_else(|| CoreError::malformed_snapshot("document is not an object"))?;

    for (name, legacy) in REQUIRED_COLLECTIONS {
        let collection = object
            .get(name)
            .or_else(|| object.get(legacy))
            .ok_or_else(|| CoreError::malformed_snapshot(format!("missing collection `{name}`")))?;
        if !collection.is_array() {
            return Err(CoreError::malformed_snapshot(format!(
                "collection `{name}` is not a list"
            )));
        }
    }
    Ok(())
}

fn take_credential(object: &mut Map<String, Value>) -> CoreResult<Option<SyncCredential>> {
    let legacy_token = object.remove(LEGACY_TOKEN_KEY);
    let legacy_remote_id = object.remove(LEGACY_REMOTE_ID_KEY);

    if let Some(entry) = object.remove("credential") {
        if entry.is_null() {
            return Ok(None);
        }
        let credential: SyncCredential = serde_json::from_value(entry)
            .map_err(|e| CoreError::malformed_snapshot(format!("invalid credential: {e}")))?;
        return Ok(SyncCredential::new(
            credential.token(),
            credential.remote_id().map(str::to_string),
        ));
    }

    let token = legacy_token.and_then(|v| v.as_str().map(str::to_string));
    let remote_id = legacy_remote_id.and_then(|v| v.as_str().map(str::to_string));
    Ok(token.and_then(|token| SyncCredential::new(token, remote_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Day, Gender, SchoolClass, SlotEntry, SlotKey};
    use chrono::NaiveDate;

    fn sample_state() -> StoreState {
        let mut snapshot = Snapshot {
            current_user: Some("admin".into()),
            ..Snapshot::default()
        };
        snapshot.staff.push(StaffMember {
            id: "t1".into(),
            name: "Amina Yusuf".into(),
            gender: Gender::Female,
            phone: "0700".into(),
            email: Some("amina@example.org".into()),
            specialization: None,
            year_started: 2019,
            year_ended: None,
            is_active: true,
        });
        snapshot.schedule_slots.upsert(SlotEntry {
            subject: "Math".into(),
            staff_id: "t1".into(),
            ..SlotEntry::blank(SlotKey::new(Day::Monday, SchoolClass::Grade1, 2))
        });
        snapshot.lessons.push(LessonRecord {
            id: "l1".into(),
            class_section: SchoolClass::Grade1,
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            period_number: 2,
            subject: "Math".into(),
            staff_id: "t1".into(),
            captured_at: "09:41".into(),
            image: "data:image/png;base64,AAAA".into(),
        });
        snapshot.homework.push(HomeworkRecord {
            id: "h1".into(),
            class_section: SchoolClass::Kg2,
            date: NaiveDate::from_ymd_opt(2024, 5, 6).unwrap(),
            subject: "Reading".into(),
            description: "Read pages 4-6".into(),
            image: None,
        });

        StoreState {
            snapshot,
            credential: SyncCredential::new("secret-token", Some("gist-1".into())),
        }
    }

    #[test]
    fn encode_excludes_credential() {
        let codec = SnapshotCodec::default();
        let document = codec.encode(&sample_state()).unwrap();
        assert!(!document.contains("secret-token"));
        assert!(!document.contains("gist-1"));
        assert!(!document.contains("credential"));
    }

    #[test]
    fn decode_preserves_callers_credential() {
        let codec = SnapshotCodec::new(false);
        let state = sample_state();
        let document = codec.encode(&state).unwrap();

        let mine = SyncCredential::new("my-token", Some("my-gist".into()));
        let decoded = codec.decode(&document, mine.clone()).unwrap();

        assert_eq!(decoded.snapshot, state.snapshot);
        assert_eq!(decoded.credential, mine);
    }

    #[test]
    fn decode_ignores_credential_inside_document() {
        let codec = SnapshotCodec::default();
        let document = r#"{
            "staff": [], "scheduleSlots": [], "lessons": [], "homework": [],
            "credential": {"token": "leaked"}, "githubToken": "leaked"
        }"#;
        let decoded = codec.decode(document, None).unwrap();
        assert!(decoded.credential.is_none());
    }

    #[test]
    fn decode_rejects_missing_collection() {
        let codec = SnapshotCodec::default();
        let err = codec
            .decode(r#"{"staff": [], "scheduleSlots": [], "lessons": []}"#, None)
            .unwrap_err();
        assert!(matches!(err, CoreError::MalformedSnapshot { .. }));
        assert!(err.to_string().contains("homework"));
    }

    #[test]
    fn decode_rejects_wrong_container() {
        let codec = SnapshotCodec::default();
        let err = codec
            .decode(
                r#"{"staff": {}, "scheduleSlots": [], "lessons": [], "homework": []}"#,
                None,
            )
            .unwrap_err();
        assert!(err.to_string().contains("`staff` is not a list"));

        assert!(codec.decode("[]", None).is_err());
        assert!(codec.decode("not json", None).is_err());
    }

    #[test]
    fn decode_accepts_legacy_collection_names() {
        let codec = SnapshotCodec::default();
        let document = r#"{
            "currentUser": null,
            "teachers": [],
            "timetable": [{
                "id": "s1", "classId": "Grade 2", "day": "Friday", "periodNumber": 4,
                "subject": "Art", "teacherId": "", "startTime": "11:00", "endTime": "12:00"
            }],
            "lessons": [],
            "homework": []
        }"#;
        let decoded = codec.decode(document, None).unwrap();
        let slot = decoded.snapshot.schedule_slots.iter().next().unwrap();
        assert_eq!(slot.class_section, SchoolClass::Grade2);
        assert!(slot.is_vacant());
    }

    #[test]
    fn persisted_round_trip_keeps_credential() {
        let codec = SnapshotCodec::default();
        let state = sample_state();
        let bytes = codec.encode_persisted(&state).unwrap();
        let restored = codec.decode_persisted(&bytes).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn persisted_accepts_legacy_credential_fields() {
        let codec = SnapshotCodec::default();
        let document = br#"{
            "currentUser": "admin", "teachers": [], "timetable": [],
            "lessons": [], "homework": [],
            "githubToken": "tok", "githubGistId": "abc"
        }"#;
        let restored = codec.decode_persisted(document).unwrap();
        let credential = restored.credential.unwrap();
        assert_eq!(credential.token(), "tok");
        assert_eq!(credential.remote_id(), Some("abc"));
        assert_eq!(restored.snapshot.current_user.as_deref(), Some("admin"));
    }

    #[test]
    fn record_count() {
        assert_eq!(sample_state().snapshot.record_count(), 4);
    }
}
