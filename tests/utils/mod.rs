// Integration test utilities
//
// Helpers that write realistic tracker exports to temporary files for the
// CLI tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;

/// Write a JSON document to a temporary `.json` file
pub fn write_json(document: &Value) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .expect("create temp file");
    file.write_all(document.to_string().as_bytes())
        .expect("write temp file");
    file
}

/// Write raw text to a temporary file with the given suffix
pub fn write_text(text: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(text.as_bytes()).expect("write temp file");
    file
}

/// Three API/Frontend ideas: one shipped in 20 days, one shared and shipped
/// in 8 days, one still open
pub fn product_cycle() -> Value {
    json!({
        "generatedAt": "2026-02-01T08:00:00Z",
        "teams": ["API", "Frontend"],
        "ideas": [
            {
                "key": "IDEA-1",
                "primary_team": "API",
                "teams": ["API"],
                "entered_done": "2025-01-21T00:00:00Z",
                "lifecycle_events": [
                    { "from_stage": "design", "to_stage": "in_development", "at": "2025-01-11T00:00:00Z" },
                    { "from_stage": "parking_lot", "to_stage": "design", "at": "2025-01-01T00:00:00Z" }
                ]
            },
            {
                "key": "IDEA-2",
                "primary_team": "Frontend",
                "teams": ["Frontend", "API"],
                "entered_done": "2025-05-09",
                "lifecycle_events": [
                    { "from_stage": "parking_lot", "to_stage": "design", "at": "2025-05-01" }
                ]
            },
            {
                "key": "IDEA-3",
                "primary_team": "Mobile",
                "entered_parking_lot": "2025-06-01",
                "lifecycle_events": []
            }
        ]
    })
}

pub fn sprint_goals() -> Value {
    json!({ "sprints": [
        { "sprint_start": "2026-01-26", "teams": [
            { "team": "API", "goals_total": 5, "goals_passed": 5 }
        ] },
        { "sprint_start": "2026-01-12", "teams": [
            { "team": "API", "goals_total": 4, "goals_passed": 3 },
            { "team": "Frontend", "goals_total": 2, "goals_passed": 1 }
        ] },
        { "sprint_start": "someday", "teams": [] }
    ] })
}

pub fn snapshot() -> Value {
    json!({
        "updatedAt": "2026-02-10T06:00:00Z",
        "combinedPoints": [
            {
                "date": "2026-02-01",
                "api": { "highest": 1, "high": 2, "medium": 3, "low": 0, "lowest": 1 },
                "bc": { "high": 4, "longstanding_30d_plus": 2 }
            }
        ],
        "uatAging": {
            "scope": { "label": "Broadcast" },
            "totalIssues": 4,
            "buckets": [
                { "id": "0-7", "label": "0-7 days" },
                { "id": "8-14", "label": "8-14 days" }
            ],
            "priorities": {
                "high": { "buckets": { "0-7": 3 } },
                "low": { "buckets": { "8-14": 1 } }
            }
        }
    })
}
