use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AggregationServiceConfig {
    /// Time span during which same-key events merge into the existing
    /// open record instead of creating a new one.
    pub aggregation_window: Duration,
}
