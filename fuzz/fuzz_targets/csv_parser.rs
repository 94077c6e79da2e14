#![no_main]

use ally_cutover::ingest::{events_from_table, CsvTable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Any input either parses into equal-width rows or errors, never panics
        if let Ok(table) = CsvTable::parse(input) {
            assert!(table.rows.iter().all(|row| row.len() == table.header.len()));
            let _ = events_from_table(&table);
        }
    }
});
