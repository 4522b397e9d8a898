// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
#![no_main]

use libfuzzer_sys::fuzz_target;
use tripline::calendar::build_day_columns;
use tripline::itinerary::build_itinerary_report;
use tripline::journal::{Journal, TripSource};

fuzz_target!(|data: &[u8]| {
    let Ok(journal) = serde_json::from_slice::<Journal>(data) else {
        return;
    };

    for trip in journal.trips() {
        let Some(snapshot) = journal.snapshot(trip.id) else {
            continue;
        };
        let report = build_itinerary_report(&snapshot.nodes, &snapshot.legs);
        let leg_entries: usize = report.entries.iter().map(|e| e.leg_ids().len()).sum();
        assert!(leg_entries <= snapshot.legs.len());

        // Bound the layout so huge date ranges do not stall the run
        if let Some((start, end)) = snapshot.trip.date_range() {
            let days = (end - start).num_days();
            if days <= 366 {
                let columns =
                    build_day_columns(&snapshot.trip, &snapshot.nodes, &snapshot.legs, &snapshot.stops);
                assert_eq!(columns.len() as i64, days + 1);
            }
        }
    }
});
