use crate::pipeline::{ListRecord, SortKey};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

// Record shapes as the backend reports them. Every field beyond `id` is
// optional and date fields stay raw strings: partial/legacy rows must
// render (and fail date filters closed), never crash deserialization.

/// Tolerant date parse for the formats the backend has been seen to emit.
/// Anything else is treated as "no date".
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

pub(crate) fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.naive_utc())
        })
        .or_else(|| parse_date(raw).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

/// Closed per-screen status sets. Unknown or absent backend values fold to
/// the screen's initial state rather than erroring; the backend owns the
/// workflow, the portal only renders what it last reported.
pub trait StatusLabel: Default + Copy {
    fn parse(raw: &str) -> Self;
    fn as_str(&self) -> &'static str;
}

fn de_status<'de, D, S>(deserializer: D) -> Result<S, D::Error>
where
    D: Deserializer<'de>,
    S: StatusLabel,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.map(|s| S::parse(&s)).unwrap_or_default())
}

macro_rules! status_enum {
    ($name:ident, $initial:ident, [$(($variant:ident, $label:literal)),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$initial
            }
        }

        impl StatusLabel for $name {
            fn parse(raw: &str) -> Self {
                let normalized = raw.trim().to_lowercase().replace([' ', '_', '-'], "");
                match normalized.as_str() {
                    $(_ if normalized == $label.to_lowercase().replace(' ', "") => $name::$variant,)+
                    _ => $name::$initial,
                }
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }
    };
}

status_enum!(BlotterStatus, Pending, [
    (Pending, "Pending"),
    (Scheduled, "Scheduled"),
    (Ongoing, "Ongoing"),
    (Completed, "Completed"),
    (Cancelled, "Cancelled"),
    (NoShow, "No Show"),
]);

status_enum!(AppointmentStatus, Pending, [
    (Pending, "Pending"),
    (Scheduled, "Scheduled"),
    (Completed, "Completed"),
    (Cancelled, "Cancelled"),
    (NoShow, "No Show"),
]);

status_enum!(AnnouncementStatus, Draft, [
    (Draft, "Draft"),
    (Scheduled, "Scheduled"),
    (Posted, "Posted"),
]);

status_enum!(ProgramStatus, Planned, [
    (Planned, "Planned"),
    (Ongoing, "Ongoing"),
    (Completed, "Completed"),
]);

status_enum!(BeneficiaryStatus, Active, [
    (Active, "Active"),
    (Removed, "Removed"),
]);

/// A blotter (complaint) record.
#[derive(Debug, Clone, Deserialize)]
pub struct BlotterRecord {
    pub id: i64,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub complainant_name: Option<String>,
    #[serde(default)]
    pub respondent_name: Option<String>,
    /// Complaint type, e.g. "Theft", "Noise Complaint". Open-ended.
    #[serde(default)]
    pub complaint_type: Option<String>,
    #[serde(default)]
    pub incident_location: Option<String>,
    #[serde(default)]
    pub incident_date: Option<String>,
    #[serde(default)]
    pub hearing_date: Option<String>,
    #[serde(default, deserialize_with = "de_status")]
    pub status: BlotterStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl BlotterRecord {
    pub fn incident_date(&self) -> Option<NaiveDate> {
        self.incident_date.as_deref().and_then(parse_date)
    }

    pub fn hearing_date(&self) -> Option<NaiveDate> {
        self.hearing_date.as_deref().and_then(parse_date)
    }

    pub fn in_hearing_flow(&self) -> bool {
        matches!(
            self.status,
            BlotterStatus::Scheduled | BlotterStatus::Ongoing
        )
    }
}

impl ListRecord for BlotterRecord {
    fn search_text(&self) -> Vec<&str> {
        [
            self.case_number.as_deref(),
            self.complainant_name.as_deref(),
            self.respondent_name.as_deref(),
            self.incident_location.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn status_text(&self) -> &str {
        self.status.as_str()
    }

    fn category_text(&self) -> Option<&str> {
        self.complaint_type.as_deref()
    }

    fn event_date(&self) -> Option<NaiveDate> {
        self.incident_date()
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "case_number" => text_key(&self.case_number),
            "complainant" => text_key(&self.complainant_name),
            "respondent" => text_key(&self.respondent_name),
            "type" => text_key(&self.complaint_type),
            "incident_date" => date_key(self.incident_date()),
            "hearing_date" => date_key(self.hearing_date()),
            "status" => SortKey::Text(self.status.as_str().to_string()),
            "created_at" => datetime_key(&self.created_at),
            _ => SortKey::Missing,
        }
    }
}

/// An appointment (blotter request) in the scheduling queue.
#[derive(Debug, Clone, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(default)]
    pub ticket_number: Option<String>,
    #[serde(default)]
    pub requester_name: Option<String>,
    /// Purpose of the visit, e.g. "Barangay Clearance", "Mediation".
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub preferred_date: Option<String>,
    #[serde(default)]
    pub preferred_time: Option<String>,
    #[serde(default, deserialize_with = "de_status")]
    pub status: AppointmentStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Appointment {
    pub fn preferred_date(&self) -> Option<NaiveDate> {
        self.preferred_date.as_deref().and_then(parse_date)
    }
}

impl ListRecord for Appointment {
    fn search_text(&self) -> Vec<&str> {
        [self.ticket_number.as_deref(), self.requester_name.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn status_text(&self) -> &str {
        self.status.as_str()
    }

    fn category_text(&self) -> Option<&str> {
        self.purpose.as_deref()
    }

    fn event_date(&self) -> Option<NaiveDate> {
        self.preferred_date()
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "ticket" => text_key(&self.ticket_number),
            "requester" => text_key(&self.requester_name),
            "purpose" => text_key(&self.purpose),
            "preferred_date" => date_key(self.preferred_date()),
            "status" => SortKey::Text(self.status.as_str().to_string()),
            "created_at" => datetime_key(&self.created_at),
            _ => SortKey::Missing,
        }
    }
}

/// A community announcement.
#[derive(Debug, Clone, Deserialize)]
pub struct Announcement {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    /// Target audience, e.g. "All Residents", "Senior Citizens".
    #[serde(default)]
    pub audience: Option<String>,
    #[serde(default)]
    pub event_date: Option<String>,
    #[serde(default, deserialize_with = "de_status")]
    pub status: AnnouncementStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Announcement {
    pub fn event_date_parsed(&self) -> Option<NaiveDate> {
        self.event_date.as_deref().and_then(parse_date)
    }
}

impl ListRecord for Announcement {
    fn search_text(&self) -> Vec<&str> {
        [self.title.as_deref(), self.body.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn status_text(&self) -> &str {
        self.status.as_str()
    }

    fn category_text(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    fn event_date(&self) -> Option<NaiveDate> {
        self.event_date_parsed()
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "title" => text_key(&self.title),
            "audience" => text_key(&self.audience),
            "event_date" => date_key(self.event_date_parsed()),
            "status" => SortKey::Text(self.status.as_str().to_string()),
            "created_at" => datetime_key(&self.created_at),
            _ => SortKey::Missing,
        }
    }
}

/// A social-services program.
#[derive(Debug, Clone, Deserialize)]
pub struct Program {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// Program category, e.g. "Health", "Livelihood", "Feeding".
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "de_status")]
    pub status: ProgramStatus,
    #[serde(default)]
    pub beneficiary_count: Option<i64>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Program {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date.as_deref().and_then(parse_date)
    }
}

impl ListRecord for Program {
    fn search_text(&self) -> Vec<&str> {
        self.name.as_deref().into_iter().collect()
    }

    fn status_text(&self) -> &str {
        self.status.as_str()
    }

    fn category_text(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn event_date(&self) -> Option<NaiveDate> {
        self.start_date()
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "name" => text_key(&self.name),
            "category" => text_key(&self.category),
            "start_date" => date_key(self.start_date()),
            "status" => SortKey::Text(self.status.as_str().to_string()),
            "beneficiaries" => match self.beneficiary_count {
                Some(n) => SortKey::Number(n),
                None => SortKey::Missing,
            },
            _ => SortKey::Missing,
        }
    }
}

/// One beneficiary enrolled in a program.
#[derive(Debug, Clone, Deserialize)]
pub struct Beneficiary {
    pub id: i64,
    #[serde(default)]
    pub program_id: Option<i64>,
    #[serde(default)]
    pub full_name: Option<String>,
    /// Purok / zone within the barangay.
    #[serde(default)]
    pub purok: Option<String>,
    #[serde(default)]
    pub contact_number: Option<String>,
    #[serde(default)]
    pub enrolled_at: Option<String>,
    #[serde(default, deserialize_with = "de_status")]
    pub status: BeneficiaryStatus,
}

impl Beneficiary {
    pub fn enrolled_at(&self) -> Option<NaiveDate> {
        self.enrolled_at.as_deref().and_then(parse_date)
    }
}

impl ListRecord for Beneficiary {
    fn search_text(&self) -> Vec<&str> {
        [self.full_name.as_deref(), self.contact_number.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn status_text(&self) -> &str {
        self.status.as_str()
    }

    fn category_text(&self) -> Option<&str> {
        self.purok.as_deref()
    }

    fn event_date(&self) -> Option<NaiveDate> {
        self.enrolled_at()
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "name" => text_key(&self.full_name),
            "purok" => text_key(&self.purok),
            "enrolled_at" => date_key(self.enrolled_at()),
            "status" => SortKey::Text(self.status.as_str().to_string()),
            _ => SortKey::Missing,
        }
    }
}

fn text_key(value: &Option<String>) -> SortKey {
    match value {
        Some(s) if !s.trim().is_empty() => SortKey::Text(s.clone()),
        _ => SortKey::Missing,
    }
}

fn date_key(value: Option<NaiveDate>) -> SortKey {
    match value.and_then(|d| d.and_hms_opt(0, 0, 0)) {
        Some(dt) => SortKey::Date(dt),
        None => SortKey::Missing,
    }
}

fn datetime_key(raw: &Option<String>) -> SortKey {
    match raw.as_deref().and_then(parse_datetime) {
        Some(dt) => SortKey::Date(dt),
        None => SortKey::Missing,
    }
}

// Mutation payloads, sent as JSON. The backend validates; the portal only
// relays the form fields.

#[derive(Debug, Clone, Serialize)]
pub struct NewBlotter {
    pub complainant_name: String,
    pub respondent_name: String,
    pub complaint_type: String,
    pub incident_location: String,
    pub incident_date: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub requester_name: String,
    pub purpose: String,
    pub preferred_date: String,
    pub preferred_time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub body: String,
    pub audience: String,
    pub event_date: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProgram {
    pub name: String,
    pub category: String,
    pub start_date: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBeneficiary {
    pub program_id: i64,
    pub full_name: String,
    pub purok: String,
    pub contact_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_with_only_an_id_deserializes_to_defaults() {
        let r: BlotterRecord = serde_json::from_str(r#"{"id": 7}"#).unwrap();
        assert_eq!(r.id, 7);
        assert_eq!(r.status, BlotterStatus::Pending);
        assert!(r.incident_date().is_none());
        assert!(r.search_text().is_empty());
    }

    #[test]
    fn unknown_and_null_statuses_fold_to_the_initial_state() {
        let r: BlotterRecord =
            serde_json::from_str(r#"{"id": 1, "status": "archived?"}"#).unwrap();
        assert_eq!(r.status, BlotterStatus::Pending);

        let r: Announcement = serde_json::from_str(r#"{"id": 1, "status": null}"#).unwrap();
        assert_eq!(r.status, AnnouncementStatus::Draft);
    }

    #[test]
    fn status_parse_tolerates_spacing_and_case() {
        assert_eq!(BlotterStatus::parse("no_show"), BlotterStatus::NoShow);
        assert_eq!(BlotterStatus::parse("No Show"), BlotterStatus::NoShow);
        assert_eq!(BlotterStatus::parse("COMPLETED"), BlotterStatus::Completed);
        assert_eq!(AnnouncementStatus::parse("posted"), AnnouncementStatus::Posted);
    }

    #[test]
    fn date_parse_accepts_known_formats_and_rejects_garbage() {
        assert!(parse_date("2025-03-14").is_some());
        assert!(parse_date("2025-03-14T08:30:00").is_some());
        assert!(parse_date("2025-03-14 08:30:00").is_some());
        assert!(parse_date("2025-03-14T08:30:00+08:00").is_some());
        assert!(parse_date("March 14").is_none());
        assert!(parse_date("").is_none());
        assert!(parse_date("n/a").is_none());
    }

    #[test]
    fn malformed_date_means_no_event_date_not_an_error() {
        let r: BlotterRecord =
            serde_json::from_str(r#"{"id": 1, "incident_date": "pending paperwork"}"#).unwrap();
        assert!(r.event_date().is_none());
    }

    #[test]
    fn created_at_sorts_as_a_timestamp() {
        let r: BlotterRecord = serde_json::from_str(
            r#"{"id": 1, "created_at": "2025-03-14T08:30:00"}"#,
        )
        .unwrap();
        assert!(matches!(r.sort_key("created_at"), SortKey::Date(_)));
        assert!(matches!(r.sort_key("no_such_column"), SortKey::Missing));
    }
}
