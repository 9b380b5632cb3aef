use serde::Serialize;

/// One benchmark dimension tracked on its own panel with its own magnitude scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ScenarioDefinition {
    pub key: &'static str,
    pub display_name: &'static str,
}

/// The six scenarios of a mixed-load benchmark run, in panel order.
pub const SCENARIOS: [ScenarioDefinition; 6] = [
    ScenarioDefinition {
        key: "avgr",
        display_name: "Average reads",
    },
    ScenarioDefinition {
        key: "avgw",
        display_name: "Average writes",
    },
    ScenarioDefinition {
        key: "peakr",
        display_name: "Peak reads",
    },
    ScenarioDefinition {
        key: "peakw",
        display_name: "Peak writes",
    },
    ScenarioDefinition {
        key: "susr",
        display_name: "Sustained reads",
    },
    ScenarioDefinition {
        key: "susw",
        display_name: "Sustained writes",
    },
];

pub fn scenario_by_key(key: &str) -> Option<&'static ScenarioDefinition> {
    SCENARIOS.iter().find(|s| s.key == key)
}
