// --- File: crates/carebook_slots/src/lib.rs ---
pub mod logic;
#[cfg(test)]
mod logic_proptest;

pub use logic::{
    compute_available_slots, generate_daily_slots, is_past_date, parse_calendar_date,
    parse_time_of_day, parse_time_zone, slot_statuses, today_in, Appointment, SlotError,
    SlotStatus, TimeSlot, SLOTS_PER_DAY,
};
