//! Naming heuristics used while mapping the catalog.
//!
//! Sensor types are guessed from substrings of file names and property
//! labels. These guesses are lossy: a property whose label matches no bucket
//! is dropped, and a label such as "ratio" lands in DISK_IO because it
//! contains "io". Rules are ordered and the first match wins, so specific
//! patterns must precede generic ones.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::database::{AgentType, SensorKind};

/// Ordered rules for data file names.
const FILENAME_RULES: &[(&[&str], SensorKind)] = &[
    (&["linux_cpu", "linux-cpu"], SensorKind::LinuxCpu),
    (&["cpu"], SensorKind::Cpu),
    (&["mem"], SensorKind::Memory),
    (&["diskio", "disk"], SensorKind::DiskIo),
    (&["infiniband"], SensorKind::Infiniband),
    (&["net"], SensorKind::Network),
    (&["smart_device", "smart-device"], SensorKind::SmartDevice),
    (&["smart_attr", "smart-attr"], SensorKind::SmartAttr),
    (&["ipmi"], SensorKind::Ipmi),
    (&["procstat"], SensorKind::Procstat),
    (&["turbostat"], SensorKind::Turbostat),
];

/// Ordered rules for observable property labels.
const PROPERTY_RULES: &[(&[&str], SensorKind)] = &[
    (&["cpu", "processor"], SensorKind::Cpu),
    (&["memory", "mem"], SensorKind::Memory),
    (&["disk", "io"], SensorKind::DiskIo),
    (&["network", "net"], SensorKind::Network),
];

const LICENSE_RULES: &[(&str, &str)] = &[
    ("by-nc-sa/4.0", "CC BY-NC-SA 4.0"),
    ("by/4.0", "CC BY 4.0"),
];

pub const UNKNOWN_LICENSE: &str = "Unknown License";
pub const DEFAULT_LICENSE_URL: &str = "https://creativecommons.org/licenses/by-nc-sa/4.0/";

fn first_match(text: &str, rules: &[(&[&str], SensorKind)]) -> Option<SensorKind> {
    let lowered = text.to_lowercase();
    rules
        .iter()
        .find(|(needles, _)| needles.iter().any(|needle| lowered.contains(needle)))
        .map(|(_, kind)| *kind)
}

pub fn sensor_kind_for_filename(filename: &str) -> Option<SensorKind> {
    first_match(filename, FILENAME_RULES)
}

pub fn sensor_kind_for_property(label: &str) -> Option<SensorKind> {
    first_match(label, PROPERTY_RULES)
}

/// Human label for a license URL. Matching is case-sensitive.
pub fn license_name(license_url: &str) -> &'static str {
    LICENSE_RULES
        .iter()
        .find(|(needle, _)| license_url.contains(needle))
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_LICENSE)
}

/// Classify an agent from its non-`prov:Agent` type IRIs.
pub fn agent_type<'a>(types: impl IntoIterator<Item = &'a str>) -> AgentType {
    for type_iri in types {
        let lowered = type_iri.to_lowercase();
        if lowered.contains("person") {
            return AgentType::Person;
        }
        if lowered.contains("organization") || lowered.contains("organisation") {
            return AgentType::Organization;
        }
    }
    AgentType::Software
}

/// Local name of an IRI: the fragment when there is one, otherwise the last
/// path segment.
pub fn uri_tail(uri: &str) -> &str {
    match uri.rsplit_once('#') {
        Some((_, fragment)) => fragment,
        None => uri.rsplit('/').next().unwrap_or(uri),
    }
}

/// Parse an ISO date or datetime, keeping the date. Anything else is `None`.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = value.parse::<NaiveDateTime>() {
        return Some(datetime.date());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Parse an ISO datetime; values without an offset are taken as UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Ok(datetime) = value.parse::<NaiveDateTime>() {
        return Some(datetime.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_cpu_takes_precedence_over_cpu() {
        assert_eq!(sensor_kind_for_filename("linux_cpu.csv"), Some(SensorKind::LinuxCpu));
        assert_eq!(sensor_kind_for_filename("LINUX-CPU.csv"), Some(SensorKind::LinuxCpu));
        assert_eq!(sensor_kind_for_filename("cpu.csv"), Some(SensorKind::Cpu));
    }

    #[test]
    fn test_filename_rules() {
        assert_eq!(sensor_kind_for_filename("mem.csv"), Some(SensorKind::Memory));
        assert_eq!(sensor_kind_for_filename("diskio.csv"), Some(SensorKind::DiskIo));
        assert_eq!(sensor_kind_for_filename("infiniband.csv"), Some(SensorKind::Infiniband));
        assert_eq!(sensor_kind_for_filename("net.csv"), Some(SensorKind::Network));
        assert_eq!(sensor_kind_for_filename("smart_device.csv"), Some(SensorKind::SmartDevice));
        assert_eq!(sensor_kind_for_filename("smart_attr.csv"), Some(SensorKind::SmartAttr));
        assert_eq!(sensor_kind_for_filename("ipmi_sensor.csv"), Some(SensorKind::Ipmi));
        assert_eq!(sensor_kind_for_filename("procstat.csv"), Some(SensorKind::Procstat));
        assert_eq!(sensor_kind_for_filename("turbostat.csv"), Some(SensorKind::Turbostat));
        assert_eq!(sensor_kind_for_filename("kernel.csv"), None);
    }

    #[test]
    fn test_property_rules_are_ordered() {
        assert_eq!(sensor_kind_for_property("Processor load"), Some(SensorKind::Cpu));
        assert_eq!(sensor_kind_for_property("Memory used"), Some(SensorKind::Memory));
        assert_eq!(sensor_kind_for_property("Disk read bytes"), Some(SensorKind::DiskIo));
        assert_eq!(sensor_kind_for_property("Network bytes received"), Some(SensorKind::Network));
        // "io" wins over the network bucket
        assert_eq!(sensor_kind_for_property("Network collisions"), Some(SensorKind::DiskIo));
        assert_eq!(sensor_kind_for_property("Temperature"), None);
    }

    #[test]
    fn test_license_names() {
        assert_eq!(
            license_name("https://creativecommons.org/licenses/by/4.0/"),
            "CC BY 4.0"
        );
        assert_eq!(
            license_name("https://creativecommons.org/licenses/by-nc-sa/4.0/"),
            "CC BY-NC-SA 4.0"
        );
        assert_eq!(license_name("https://opensource.org/licenses/MIT"), UNKNOWN_LICENSE);
        assert_eq!(
            license_name("https://creativecommons.org/licenses/BY/4.0/"),
            UNKNOWN_LICENSE
        );
    }

    #[test]
    fn test_agent_type() {
        assert_eq!(
            agent_type(["http://xmlns.com/foaf/0.1/Person"]),
            AgentType::Person
        );
        assert_eq!(
            agent_type(["http://www.w3.org/ns/prov#Organization"]),
            AgentType::Organization
        );
        assert_eq!(
            agent_type(["http://www.w3.org/ns/prov#SoftwareAgent"]),
            AgentType::Software
        );
        assert_eq!(agent_type(Vec::<&str>::new()), AgentType::Software);
    }

    #[test]
    fn test_uri_tails() {
        assert_eq!(uri_tail("http://areasciencepark.it/datacenter/ns#telegraf"), "telegraf");
        assert_eq!(uri_tail("http://example.org/datasets/dc-2025"), "dc-2025");
        assert_eq!(uri_tail("no-separators"), "no-separators");
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1);
        assert_eq!(parse_date("2025-03-01"), expected);
        assert_eq!(parse_date("2025-03-01T10:00:00Z"), expected);
        assert_eq!(parse_date("2025-03-01T10:00:00"), expected);
        assert_eq!(parse_date("March 2025"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_datetime_variants() {
        let parsed = parse_datetime("2025-03-01T10:30:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-03-01T10:30:00+00:00");

        let offset = parse_datetime("2025-03-01T12:30:00+02:00").unwrap();
        assert_eq!(offset, parsed);

        let naive = parse_datetime("2025-03-01T10:30:00").unwrap();
        assert_eq!(naive, parsed);

        assert!(parse_datetime("2025-03-01").is_some());
        assert!(parse_datetime("not a date").is_none());
    }
}
