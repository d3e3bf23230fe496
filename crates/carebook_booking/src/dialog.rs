// --- File: crates/carebook_booking/src/dialog.rs ---
//! The booking dialog: date and slot selection, note, submit.
//!
//! A dialog is owned by one caller. Submission is split into
//! [`BookingDialog::begin_submit`], which spawns the booking task and returns
//! its handle, and [`BookingDialog::complete`], which awaits it. While a
//! submission is pending, [`BookingDialog::can_submit`] is `false`, also
//! across `close` and `open`.

use carebook_slots::{
    compute_available_slots, is_past_date, slot_statuses, today_in, Appointment, SlotStatus,
    TimeSlot,
};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::BookingError;
use crate::flow::{validate_identity, BookingFlow, BookingReceipt};
use crate::models::{BookingRequest, Identity};
use crate::provider::ProviderDetail;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// What the user has picked so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    pub selected_date: NaiveDate,
    pub selected_slot: Option<TimeSlot>,
    pub note: String,
}

impl BookingDraft {
    pub fn fresh(today: NaiveDate) -> Self {
        Self {
            selected_date: today,
            selected_slot: None,
            note: String::new(),
        }
    }
}

static NEXT_DIALOG_ID: AtomicU64 = AtomicU64::new(1);

/// A submission in flight, returned by [`BookingDialog::begin_submit`].
///
/// It can only be completed by the dialog that started it. Dropping it does
/// not cancel the booking, but leaves that dialog `Submitting` for good.
#[derive(Debug)]
#[must_use = "pass it to BookingDialog::complete"]
pub struct PendingSubmission {
    dialog_id: u64,
    handle: JoinHandle<Result<BookingReceipt, BookingError>>,
}

impl PendingSubmission {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Booking dialog state for one provider.
#[derive(Debug)]
pub struct BookingDialog {
    id: u64,
    provider_id: String,
    provider_name: String,
    appointments: Vec<Appointment>,
    zone: Tz,
    draft: BookingDraft,
    phase: SubmissionPhase,
    open: bool,
}

impl BookingDialog {
    /// A closed dialog whose draft starts on today's date in `zone`.
    pub fn new(provider: &ProviderDetail, zone: Tz, now: DateTime<Utc>) -> Self {
        Self {
            id: NEXT_DIALOG_ID.fetch_add(1, Ordering::Relaxed),
            provider_id: provider.id.clone(),
            provider_name: provider.name.clone(),
            appointments: provider.appointments.clone(),
            zone,
            draft: BookingDraft::fresh(today_in(&zone, now)),
            phase: SubmissionPhase::Idle,
            open: false,
        }
    }

    /// Opens the dialog with a fresh draft. A pending submission stays pending.
    pub fn open(&mut self, now: DateTime<Utc>) {
        self.reset(now);
        if self.phase != SubmissionPhase::Submitting {
            self.phase = SubmissionPhase::Idle;
        }
        self.open = true;
    }

    /// Closes the dialog and discards the draft.
    pub fn close(&mut self, now: DateTime<Utc>) {
        self.reset(now);
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Picks a day. Days before today in the dialog's zone are rejected.
    ///
    /// A selected slot that is taken on the new day is cleared.
    pub fn select_date(&mut self, day: NaiveDate, now: DateTime<Utc>) -> Result<(), BookingError> {
        if is_past_date(day, &now.with_timezone(&self.zone)) {
            return Err(BookingError::PastDate(day));
        }
        self.draft.selected_date = day;
        if let Some(slot) = self.draft.selected_slot {
            if !self.available_slots().contains(&slot) {
                debug!("Clearing slot {} which is taken on {}", slot, day);
                self.draft.selected_slot = None;
            }
        }
        Ok(())
    }

    /// Picks a slot. Only slots currently offered for the selected date are accepted.
    pub fn select_slot(&mut self, slot: TimeSlot) -> Result<(), BookingError> {
        if !self.available_slots().contains(&slot) {
            return Err(BookingError::SlotUnavailable(slot));
        }
        self.draft.selected_slot = Some(slot);
        Ok(())
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.draft.note = note.into();
    }

    pub fn available_slots(&self) -> Vec<TimeSlot> {
        compute_available_slots(self.draft.selected_date, &self.appointments)
    }

    pub fn slot_statuses(&self) -> Vec<SlotStatus> {
        slot_statuses(self.draft.selected_date, &self.appointments)
    }

    /// `true` when the dialog is open, a slot is picked and nothing is in flight.
    pub fn can_submit(&self) -> bool {
        self.open
            && self.draft.selected_slot.is_some()
            && self.phase != SubmissionPhase::Submitting
    }

    /// Starts submitting the draft.
    ///
    /// An incomplete identity is rejected here, before anything is sent, and
    /// leaves the draft untouched.
    pub fn begin_submit(
        &mut self,
        flow: &BookingFlow,
        identity: Option<&Identity>,
    ) -> Result<PendingSubmission, BookingError> {
        let slot = match self.draft.selected_slot {
            Some(slot) if self.can_submit() => slot,
            _ => return Err(BookingError::SubmitDisabled),
        };
        let identity = validate_identity(identity)?.clone();

        let request = BookingRequest {
            provider_id: self.provider_id.clone(),
            provider_name: Some(self.provider_name.clone()),
            date: self.draft.selected_date,
            slot,
            note: Some(self.draft.note.clone()).filter(|n| !n.trim().is_empty()),
        };
        let flow = flow.clone();
        let handle = tokio::spawn(async move { flow.submit(Some(&identity), &request).await });

        self.phase = SubmissionPhase::Submitting;
        Ok(PendingSubmission {
            dialog_id: self.id,
            handle,
        })
    }

    /// Waits for `pending` to finish, then resets and closes the dialog.
    ///
    /// The draft is reset whether the booking went through or not. A booked
    /// slot is added to the dialog's appointments. A submission started by
    /// another dialog is rejected with `InvalidInput` and changes nothing here.
    pub async fn complete(
        &mut self,
        pending: PendingSubmission,
        now: DateTime<Utc>,
    ) -> Result<BookingReceipt, BookingError> {
        if pending.dialog_id != self.id || self.phase != SubmissionPhase::Submitting {
            return Err(BookingError::InvalidInput(
                "submission was not started by this dialog".to_string(),
            ));
        }
        let outcome = match pending.handle.await {
            Ok(outcome) => outcome,
            Err(join_err) => {
                warn!("Booking task did not finish: {}", join_err);
                Err(BookingError::SubmissionFailed(join_err.to_string()))
            }
        };

        match &outcome {
            Ok(receipt) => {
                self.phase = SubmissionPhase::Succeeded;
                self.record_booking(receipt);
            }
            Err(_) => self.phase = SubmissionPhase::Failed,
        }
        self.close(now);
        outcome
    }

    /// [`begin_submit`](Self::begin_submit) followed by [`complete`](Self::complete).
    pub async fn submit(
        &mut self,
        flow: &BookingFlow,
        identity: Option<&Identity>,
        now: DateTime<Utc>,
    ) -> Result<BookingReceipt, BookingError> {
        let pending = self.begin_submit(flow, identity)?;
        self.complete(pending, now).await
    }

    fn record_booking(&mut self, receipt: &BookingReceipt) {
        let booking = &receipt.booking;
        let (date, time) = match (&booking.date, &booking.time) {
            (Some(date), Some(time)) => (date.clone(), time.clone()),
            _ => match self.draft.selected_slot {
                Some(slot) => (
                    self.draft.selected_date.format("%Y-%m-%d").to_string(),
                    slot.label(),
                ),
                None => return,
            },
        };
        self.appointments.push(Appointment {
            date,
            time,
            provider_id: Some(self.provider_id.clone()),
            username: booking.username.clone(),
            email: booking.email.clone(),
            note: booking.note.clone(),
        });
    }

    fn reset(&mut self, now: DateTime<Utc>) {
        self.draft = BookingDraft::fresh(today_in(&self.zone, now));
    }
}
