#![no_main]

use ideaflow::dataset::Dataset;
use ideaflow::lifecycle::PhaseSet;
use ideaflow::team::{EffortScope, TeamRoster};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and both aggregations must not panic on any document
        if let Ok(dataset) = Dataset::from_json_str(input) {
            let roster = TeamRoster::new(["API", "Frontend"]);
            let _ = dataset.cycle_time(&roster, EffortScope::Combined, &[2025, 2026]);
            let _ = dataset.lifecycle(&roster, &PhaseSet::default(), &[2025, 2026]);
        }
    }
});
