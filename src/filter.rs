use crate::arrival::ArrivalRecord;
use crate::config::PollConfig;

// Sole inclusion gate: exact, case-sensitive match on route and destination.
pub fn matches(record: &ArrivalRecord, config: &PollConfig) -> bool {
    record.service_id() == config.route_filter
        && record.destination_name() == config.destination_filter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PollConfig {
        PollConfig {
            route_filter: "1".to_string(),
            destination_filter: "Island Bay".to_string(),
            ..PollConfig::default()
        }
    }

    fn record(service_id: &str, destination: &str) -> ArrivalRecord {
        ArrivalRecord::new(service_id, destination, "08:00", "08:02", "0")
    }

    #[test]
    fn test_exact_match() {
        assert!(matches(&record("1", "Island Bay"), &config()));
    }

    #[test]
    fn test_wrong_route() {
        assert!(!matches(&record("2", "Island Bay"), &config()));
        assert!(!matches(&record("12", "Island Bay"), &config()));
    }

    #[test]
    fn test_case_differences_excluded() {
        assert!(!matches(&record("1", "island bay"), &config()));
        assert!(!matches(&record("1", "ISLAND BAY"), &config()));
    }

    #[test]
    fn test_substrings_and_whitespace_excluded() {
        assert!(!matches(&record("1", "Island"), &config()));
        assert!(!matches(&record("1", "Island Bay Shops"), &config()));
        assert!(!matches(&record("1", " Island Bay"), &config()));
        assert!(!matches(&record(" 1", "Island Bay"), &config()));
    }

    #[test]
    fn test_empty_fields_do_not_match() {
        assert!(!matches(&record("", ""), &config()));
    }
}
