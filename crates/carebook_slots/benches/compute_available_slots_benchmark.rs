use carebook_slots::{compute_available_slots, generate_daily_slots, Appointment};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

// Helper function to create a month of bookings, `per_day` per day
fn create_appointments(start: NaiveDate, days: i64, per_day: usize) -> Vec<Appointment> {
    let slots = generate_daily_slots();
    let mut appointments = Vec::new();
    for offset in 0..days {
        let date = (start + Duration::days(offset)).format("%Y-%m-%d").to_string();
        for slot in slots.iter().take(per_day) {
            appointments.push(Appointment::new(date.clone(), slot.label()));
        }
    }
    appointments
}

fn benchmark_compute_available_slots(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_available_slots");
    let query_date = NaiveDate::from_ymd_opt(2025, 5, 15).unwrap();
    let month_start = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();

    group.bench_function("no_appointments", |b| {
        let appointments = Vec::new();
        b.iter(|| compute_available_slots(black_box(query_date), black_box(&appointments)))
    });

    group.bench_function("busy_month", |b| {
        let appointments = create_appointments(month_start, 31, 12);
        b.iter(|| compute_available_slots(black_box(query_date), black_box(&appointments)))
    });

    group.bench_function("fully_booked_month", |b| {
        let appointments = create_appointments(month_start, 31, usize::MAX);
        b.iter(|| compute_available_slots(black_box(query_date), black_box(&appointments)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_compute_available_slots);
criterion_main!(benches);
