// --- File: crates/carebook_slots/src/logic.rs ---
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

// --- Booking window ---
const FIRST_SLOT_HOUR: u32 = 10;
const LAST_SLOT_HOUR: u32 = 18;
const SLOT_STEP_MINUTES: u32 = 30;

/// Number of bookable slots per day (10:00 AM through 6:30 PM, every 30 minutes).
pub const SLOTS_PER_DAY: usize =
    ((LAST_SLOT_HOUR - FIRST_SLOT_HOUR + 1) * (60 / SLOT_STEP_MINUTES)) as usize;

/// Accepted spellings of a stored calendar date. ISO first, it is what the
/// booking flow writes.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
/// Accepted spellings of a stored time of day. The 12-hour form is the slot label.
const TIME_FORMATS: [&str; 3] = ["%I:%M %p", "%H:%M:%S%.f", "%H:%M"];

// --- Error Handling ---
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Failed to parse date: {0}")]
    InvalidDate(String),
    #[error("Failed to parse time: {0}")]
    InvalidTime(String),
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),
}

// --- Data Structures ---

/// A half-hour time of day a provider can be booked at.
///
/// Stored as a time of day; the `H:MM AM|PM` label is only a rendering, so
/// comparing slots never depends on string formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// Builds a slot from a 24-hour clock reading.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn time(&self) -> NaiveTime {
        self.0
    }

    /// The wall-clock instant of this slot on `date`.
    pub fn at(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }

    /// `H:MM AM|PM` without a leading zero on the hour; noon is `12:00 PM`.
    pub fn label(&self) -> String {
        let (is_pm, hour12) = self.0.hour12();
        let suffix = if is_pm { "PM" } else { "AM" };
        format!("{}:{:02} {}", hour12, self.minute(), suffix)
    }

    /// Parses a slot label (or any accepted time-of-day spelling).
    pub fn parse(label: &str) -> Result<Self, SlotError> {
        let time = parse_time_of_day(label)?;
        TimeSlot::new(time.hour(), time.minute())
            .ok_or_else(|| SlotError::InvalidTime(label.to_string()))
    }

    /// `true` if this slot is one of the generated daily slots.
    pub fn is_canonical(&self) -> bool {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&self.hour())
            && self.minute() % SLOT_STEP_MINUTES == 0
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeSlot::parse(s)
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        TimeSlot::parse(&label).map_err(de::Error::custom)
    }
}

/// An existing booking as stored by the content API.
///
/// Date and time stay in their stored spelling and are parsed on demand, so a
/// malformed record can be skipped instead of failing the whole provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub date: String,
    pub time: String,
    #[serde(default)]
    pub provider_id: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Appointment {
    pub fn new(date: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: time.into(),
            provider_id: None,
            username: None,
            email: None,
            note: None,
        }
    }

    /// The wall-clock instant this appointment occupies.
    ///
    /// Older records spell the noon slots `12:00 AM` and `12:30 AM`. Nothing
    /// is bookable after midnight, so a stored `12:xx AM` is read as noon.
    pub fn instant(&self) -> Result<NaiveDateTime, SlotError> {
        let date = parse_calendar_date(&self.date)?;
        let mut time = parse_time_of_day(&self.time)?;
        if time.hour() == 0 && is_twelve_hour_am(&self.time) {
            time += Duration::hours(12);
        }
        Ok(date.and_time(time))
    }
}

/// A slot together with whether it can still be picked, in grid order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub slot: TimeSlot,
    pub available: bool,
}

// --- Parsing ---

pub fn parse_calendar_date(raw: &str) -> Result<NaiveDate, SlotError> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .or_else(|| {
            // Some content APIs hand back a full timestamp for date fields
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
        .ok_or_else(|| SlotError::InvalidDate(raw.to_string()))
}

pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, SlotError> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| SlotError::InvalidTime(raw.to_string()))
}

fn is_twelve_hour_am(raw: &str) -> bool {
    raw.trim().to_ascii_uppercase().ends_with("AM")
}

pub fn parse_time_zone(name: &str) -> Result<Tz, SlotError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| SlotError::InvalidTimeZone(name.to_string()))
}

// --- Availability Logic ---

/// The fixed list of daily slots, 10:00 AM through 6:30 PM.
pub fn generate_daily_slots() -> Vec<TimeSlot> {
    (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR)
        .flat_map(|hour| {
            (0..60)
                .step_by(SLOT_STEP_MINUTES as usize)
                .filter_map(move |minute| TimeSlot::new(hour, minute))
        })
        .collect()
}

/// Whether `day` is over at `reference_now`.
///
/// A day counts as past once its local start plus 24 hours is not after
/// `reference_now`, so the current day always stays selectable.
pub fn is_past_date<T: TimeZone>(day: NaiveDate, reference_now: &DateTime<T>) -> bool {
    let zone = reference_now.timezone();
    let Some(local_midnight) = day.and_hms_opt(0, 0, 0) else {
        return false;
    };
    let start_of_day = match zone.from_local_datetime(&local_midnight).earliest() {
        Some(start) => start,
        // midnight skipped by a DST jump, read it as UTC instead
        None => zone.from_utc_datetime(&local_midnight),
    };
    start_of_day + Duration::hours(24) <= *reference_now
}

/// The calendar day `now` falls on in `zone`.
pub fn today_in<T: TimeZone>(zone: &T, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(zone).date_naive()
}

/// Slots of `date` not taken by any of `appointments`, in canonical order.
///
/// Appointments whose date or time cannot be parsed never match.
pub fn compute_available_slots(date: NaiveDate, appointments: &[Appointment]) -> Vec<TimeSlot> {
    let booked = booked_instants(appointments);
    generate_daily_slots()
        .into_iter()
        .filter(|slot| !booked.contains(&slot.at(date)))
        .collect()
}

/// Every daily slot with its availability on `date`.
pub fn slot_statuses(date: NaiveDate, appointments: &[Appointment]) -> Vec<SlotStatus> {
    let booked = booked_instants(appointments);
    generate_daily_slots()
        .into_iter()
        .map(|slot| SlotStatus {
            slot,
            available: !booked.contains(&slot.at(date)),
        })
        .collect()
}

fn booked_instants(appointments: &[Appointment]) -> HashSet<NaiveDateTime> {
    appointments
        .iter()
        .filter_map(|appointment| match appointment.instant() {
            Ok(instant) => Some(instant),
            Err(e) => {
                debug!(
                    "Ignoring appointment with unreadable schedule ({} {}): {}",
                    appointment.date, appointment.time, e
                );
                None
            }
        })
        .collect()
}
