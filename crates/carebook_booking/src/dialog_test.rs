#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use carebook_slots::{Appointment, TimeSlot, SLOTS_PER_DAY};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use chrono_tz::Tz;

    use crate::dialog::{BookingDialog, SubmissionPhase};
    use crate::error::BookingError;
    use crate::flow::BookingFlow;
    use crate::models::Identity;
    use crate::provider::ProviderDetail;
    use crate::service::mock::{MockBookingStore, MockNotificationService};

    const ZONE: Tz = Tz::Asia__Kolkata;

    // 2024-06-01 15:00 in Kolkata
    fn now() -> DateTime<Utc> {
        ZONE.with_ymd_and_hms(2024, 6, 1, 15, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn slot(label: &str) -> TimeSlot {
        TimeSlot::parse(label).unwrap()
    }

    fn provider() -> ProviderDetail {
        ProviderDetail {
            id: "3".to_string(),
            name: "Dr. Anil Kumar".to_string(),
            appointments: vec![Appointment::new("2024-06-01", "10:00 AM")],
            ..Default::default()
        }
    }

    fn asha() -> Identity {
        Identity::new("Asha", "Rao", "asha@example.com")
    }

    fn setup() -> (Arc<MockBookingStore>, Arc<MockNotificationService>, BookingFlow) {
        let store = Arc::new(MockBookingStore::new().with_provider(provider()));
        let notifier = Arc::new(MockNotificationService::new());
        let flow = BookingFlow::new(store.clone(), Some(notifier.clone()));
        (store, notifier, flow)
    }

    fn open_dialog() -> BookingDialog {
        let mut dialog = BookingDialog::new(&provider(), ZONE, now());
        dialog.open(now());
        dialog
    }

    #[test]
    fn test_open_starts_on_today_with_empty_draft() {
        let dialog = open_dialog();
        assert!(dialog.is_open());
        assert_eq!(dialog.draft().selected_date, date(2024, 6, 1));
        assert_eq!(dialog.draft().selected_slot, None);
        assert!(dialog.draft().note.is_empty());
        assert!(!dialog.can_submit());
    }

    #[test]
    fn test_existing_appointment_hides_slot() {
        let dialog = open_dialog();
        let available = dialog.available_slots();
        assert_eq!(available.len(), SLOTS_PER_DAY - 1);
        assert_eq!(available[0].label(), "10:30 AM");

        let statuses = dialog.slot_statuses();
        assert_eq!(statuses.len(), SLOTS_PER_DAY);
        assert!(!statuses[0].available);
    }

    #[test]
    fn test_select_past_date_is_rejected() {
        let mut dialog = open_dialog();
        let result = dialog.select_date(date(2024, 5, 31), now());

        assert!(matches!(result, Err(BookingError::PastDate(d)) if d == date(2024, 5, 31)));
        assert_eq!(dialog.draft().selected_date, date(2024, 6, 1));

        assert!(dialog.select_date(date(2024, 6, 1), now()).is_ok());
        assert!(dialog.select_date(date(2024, 6, 2), now()).is_ok());
        assert_eq!(dialog.draft().selected_date, date(2024, 6, 2));
    }

    #[test]
    fn test_select_taken_slot_is_rejected() {
        let mut dialog = open_dialog();
        let result = dialog.select_slot(slot("10:00 AM"));
        assert!(matches!(result, Err(BookingError::SlotUnavailable(_))));

        // off-grid
        assert!(dialog.select_slot(slot("10:15 AM")).is_err());

        dialog.select_slot(slot("10:30 AM")).unwrap();
        assert!(dialog.can_submit());
    }

    #[test]
    fn test_changing_date_clears_slot_taken_on_new_day() {
        let mut dialog = open_dialog();
        dialog.select_date(date(2024, 6, 2), now()).unwrap();
        dialog.select_slot(slot("10:00 AM")).unwrap();

        dialog.select_date(date(2024, 6, 1), now()).unwrap();
        assert_eq!(dialog.draft().selected_slot, None);

        dialog.select_slot(slot("11:00 AM")).unwrap();
        dialog.select_date(date(2024, 6, 3), now()).unwrap();
        assert_eq!(dialog.draft().selected_slot, Some(slot("11:00 AM")));
    }

    #[test]
    fn test_close_discards_draft() {
        let mut dialog = open_dialog();
        dialog.select_date(date(2024, 6, 4), now()).unwrap();
        dialog.select_slot(slot("2:00 PM")).unwrap();
        dialog.set_note("bring reports");

        dialog.close(now());
        assert!(!dialog.is_open());
        assert_eq!(dialog.draft().selected_date, date(2024, 6, 1));
        assert_eq!(dialog.draft().selected_slot, None);
        assert!(!dialog.can_submit());
    }

    #[tokio::test]
    async fn test_submit_without_slot_is_disabled() {
        let (store, _, flow) = setup();
        let mut dialog = open_dialog();

        let result = dialog.submit(&flow, Some(&asha()), now()).await;
        assert!(matches!(result, Err(BookingError::SubmitDisabled)));
        assert!(store.created_payloads().is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_identity_keeps_draft() {
        let (store, notifier, flow) = setup();
        let mut dialog = open_dialog();
        dialog.select_slot(slot("1:30 PM")).unwrap();
        dialog.set_note("fever");

        let result = dialog.submit(&flow, None, now()).await;

        assert!(matches!(result, Err(BookingError::MissingIdentity)));
        assert_eq!(
            result.unwrap_err().user_message(),
            "User information is not available. Please log in."
        );
        assert!(store.created_payloads().is_empty());
        assert!(notifier.sent().is_empty());
        assert_eq!(dialog.phase(), SubmissionPhase::Idle);
        assert_eq!(dialog.draft().selected_slot, Some(slot("1:30 PM")));
        assert_eq!(dialog.draft().note, "fever");
    }

    #[tokio::test]
    async fn test_submit_success_books_notifies_and_resets() {
        let (store, notifier, flow) = setup();
        let mut dialog = open_dialog();
        dialog.select_date(date(2024, 6, 3), now()).unwrap();
        dialog.select_slot(slot("1:30 PM")).unwrap();
        dialog.set_note("follow-up");

        let receipt = dialog.submit(&flow, Some(&asha()), now()).await.unwrap();
        assert_eq!(receipt.message, "Booking Confirmation will be sent to your email");
        receipt.notification.unwrap().await.unwrap();

        let payloads = store.created_payloads();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].data.date, "2024-06-03");
        assert_eq!(payloads[0].data.time, "1:30 PM");
        assert_eq!(payloads[0].data.note, "follow-up");
        assert_eq!(payloads[0].data.username, "Asha Rao");

        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].is_appointment);
        assert_eq!(sent[0].provider_name, "Dr. Anil Kumar");

        assert_eq!(dialog.phase(), SubmissionPhase::Succeeded);
        assert!(!dialog.is_open());
        assert_eq!(dialog.draft().selected_date, date(2024, 6, 1));
        assert_eq!(dialog.draft().selected_slot, None);
        assert!(dialog.draft().note.is_empty());

        // the booked slot is gone on reopen
        dialog.open(now());
        dialog.select_date(date(2024, 6, 3), now()).unwrap();
        assert!(!dialog.available_slots().contains(&slot("1:30 PM")));
    }

    #[tokio::test]
    async fn test_submit_failure_resets_and_skips_confirmation() {
        let (store, notifier, flow) = setup();
        store.fail_bookings("upstream timeout");
        let mut dialog = open_dialog();
        dialog.select_slot(slot("4:00 PM")).unwrap();

        let result = dialog.submit(&flow, Some(&asha()), now()).await;

        let err = result.unwrap_err();
        assert!(matches!(err, BookingError::SubmissionFailed(_)));
        assert_eq!(err.user_message(), "Booking failed. Please try again.");
        assert!(notifier.sent().is_empty());
        assert_eq!(dialog.phase(), SubmissionPhase::Failed);
        assert_eq!(dialog.draft().selected_slot, None);
        assert!(!dialog.is_open());
        assert_eq!(dialog.appointments().len(), 1);
    }

    #[tokio::test]
    async fn test_submit_disabled_while_pending() {
        let (store, _, flow) = setup();
        let mut dialog = open_dialog();
        dialog.select_slot(slot("5:00 PM")).unwrap();

        let pending = dialog.begin_submit(&flow, Some(&asha())).unwrap();
        assert_eq!(dialog.phase(), SubmissionPhase::Submitting);
        assert!(!dialog.can_submit());
        assert!(matches!(
            dialog.begin_submit(&flow, Some(&asha())),
            Err(BookingError::SubmitDisabled)
        ));

        dialog.complete(pending, now()).await.unwrap();
        assert_eq!(store.created_payloads().len(), 1);
    }

    #[tokio::test]
    async fn test_reopen_keeps_pending_submission_blocking() {
        let (store, _, flow) = setup();
        let mut dialog = open_dialog();
        dialog.select_slot(slot("5:00 PM")).unwrap();
        let pending = dialog.begin_submit(&flow, Some(&asha())).unwrap();

        dialog.close(now());
        dialog.open(now());
        dialog.select_slot(slot("5:00 PM")).unwrap();

        assert_eq!(dialog.phase(), SubmissionPhase::Submitting);
        assert!(!dialog.can_submit());
        assert!(matches!(
            dialog.begin_submit(&flow, Some(&asha())),
            Err(BookingError::SubmitDisabled)
        ));

        dialog.complete(pending, now()).await.unwrap();
        assert_eq!(store.created_payloads().len(), 1);
        assert_eq!(dialog.phase(), SubmissionPhase::Succeeded);

        dialog.open(now());
        assert_eq!(dialog.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn test_complete_rejects_submission_of_other_dialog() {
        let (_, _, flow) = setup();
        let mut first = open_dialog();
        first.select_slot(slot("2:00 PM")).unwrap();
        let pending = first.begin_submit(&flow, Some(&asha())).unwrap();

        let mut second = open_dialog();
        second.select_slot(slot("3:00 PM")).unwrap();
        let err = second.complete(pending, now()).await.unwrap_err();

        assert!(matches!(err, BookingError::InvalidInput(_)));
        assert_eq!(second.phase(), SubmissionPhase::Idle);
        assert!(second.is_open());
        assert_eq!(second.draft().selected_slot, Some(slot("3:00 PM")));
        assert_eq!(first.phase(), SubmissionPhase::Submitting);
    }
}
