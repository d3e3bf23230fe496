#[cfg(test)]
mod tests {
    use crate::logic::{
        compute_available_slots, generate_daily_slots, is_past_date, Appointment, TimeSlot,
    };
    use chrono::{Duration, NaiveDate, TimeZone};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    // Helper to turn a day offset into a calendar date
    fn day_from_offset(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)
    }

    // Helper producing an appointment on a given day at one of the daily slots
    fn appointment_at(offset: i64, slot_index: usize) -> Appointment {
        let slots = generate_daily_slots();
        let slot = slots[slot_index % slots.len()];
        Appointment::new(
            day_from_offset(offset).format("%Y-%m-%d").to_string(),
            slot.label(),
        )
    }

    fn is_subsequence(needle: &[TimeSlot], haystack: &[TimeSlot]) -> bool {
        let mut rest = haystack.iter();
        needle.iter().all(|slot| rest.any(|candidate| candidate == slot))
    }

    proptest! {
        // Output is an ordered subsequence of the canonical slots without booked instants
        #[test]
        fn test_available_slots_exclude_booked(
            query_offset in 0..60i64,
            booked in proptest::collection::vec((0..60i64, 0..64usize), 0..30),
        ) {
            let query_date = day_from_offset(query_offset);
            let appointments: Vec<Appointment> = booked
                .iter()
                .map(|(offset, idx)| appointment_at(*offset, *idx))
                .collect();

            let available = compute_available_slots(query_date, &appointments);
            prop_assert!(is_subsequence(&available, &generate_daily_slots()));

            for appointment in &appointments {
                let instant = appointment.instant().unwrap();
                prop_assert!(available.iter().all(|slot| slot.at(query_date) != instant));
            }

            // every missing slot is explained by an appointment on that day
            let booked_today = appointments
                .iter()
                .filter(|a| a.instant().unwrap().date() == query_date)
                .map(|a| a.instant().unwrap().time())
                .collect::<std::collections::HashSet<_>>();
            prop_assert_eq!(available.len() + booked_today.len(), generate_daily_slots().len());
        }

        // Same inputs, same output
        #[test]
        fn test_available_slots_idempotent(
            query_offset in 0..10i64,
            booked in proptest::collection::vec((0..10i64, 0..18usize), 0..12),
        ) {
            let query_date = day_from_offset(query_offset);
            let appointments: Vec<Appointment> = booked
                .iter()
                .map(|(offset, idx)| appointment_at(*offset, *idx))
                .collect();

            let first = compute_available_slots(query_date, &appointments);
            let second = compute_available_slots(query_date, &appointments);
            prop_assert_eq!(first, second);
        }

        // Garbage records never panic and never remove a slot
        #[test]
        fn test_garbage_appointments_are_harmless(
            date in "\\PC{0,12}",
            time in "[a-z ]{0,8}",
        ) {
            let appointments = vec![Appointment::new(date, time)];
            let available = compute_available_slots(day_from_offset(0), &appointments);
            prop_assert_eq!(available, generate_daily_slots());
        }

        // Days strictly before today are past, today and later are not
        #[test]
        fn test_past_day_predicate(
            day_offset in 1..400i64,
            hour in 0..24u32,
            minute in 0..60u32,
        ) {
            let zone = Tz::Europe__Zurich;
            let today = NaiveDate::from_ymd_opt(2025, 5, 5).unwrap();
            let now = zone
                .with_ymd_and_hms(2025, 5, 5, hour, minute, 0)
                .single()
                .unwrap();

            prop_assert!(!is_past_date(today, &now));
            prop_assert!(!is_past_date(today + Duration::days(day_offset), &now));
            prop_assert!(is_past_date(today - Duration::days(day_offset), &now));
        }
    }
}
