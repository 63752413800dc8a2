//! Build metadata of the registry binary
//!
//! `build.rs` stamps each compilation with a build number and UTC time.

use serde::Serialize;

use crate::config::Config;

pub const BUILD_NUMBER: u64 = match option_env!("KARDIYO_BUILD_NUMBER") {
    Some(s) => match parse_u64(s) {
        Some(n) => n,
        None => 0,
    },
    None => 0,
};

pub const BUILD_TIMESTAMP: &str = match option_env!("KARDIYO_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const fn parse_u64(s: &str) -> Option<u64> {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return None;
    }
    let mut result: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b < b'0' || b > b'9' {
            return None;
        }
        result = result * 10 + (b - b'0') as u64;
        i += 1;
    }
    Some(result)
}

/// Build fields reported by the status tool
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }
}

fn banner_lines(info: &BuildInfo, config: &Config) -> Vec<String> {
    vec![
        "NEU-KARDIYO H-Type HT Registry".to_string(),
        format!("Version: {} | Build: {}", info.version, info.build_number),
        format!("Compiled: {}", info.build_timestamp),
        format!("Patients: {} (key '{}')", config.patient_sheet, config.key_field),
        format!("Case notes: {}", config.case_sheet),
        format!("Database: {}", config.database_path.display()),
    ]
}

/// Print the startup banner to stderr, stdout belongs to the MCP transport
pub fn print_startup_banner(config: &Config) {
    let rule = "=".repeat(47);
    eprintln!("{}", rule);
    for line in banner_lines(&BuildInfo::current(), config) {
        eprintln!("  {}", line);
    }
    eprintln!("{}", rule);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64("42"), Some(42));
        assert_eq!(parse_u64("0"), Some(0));
        assert_eq!(parse_u64(""), None);
        assert_eq!(parse_u64("4x"), None);
    }

    #[test]
    fn test_banner_names_sheets() {
        let config = Config {
            database_path: PathBuf::from("/tmp/kardiyo.db"),
            patient_sheet: "H_Type_HT_Verileri".to_string(),
            case_sheet: "Vaka_Takip_Notlari".to_string(),
            key_field: "Dosya Numarası".to_string(),
        };
        let info = BuildInfo {
            version: "1.0.0",
            build_number: 7,
            build_timestamp: "2026-01-01T00:00:00Z",
        };

        let lines = banner_lines(&info, &config);
        assert_eq!(lines[1], "Version: 1.0.0 | Build: 7");
        assert_eq!(lines[3], "Patients: H_Type_HT_Verileri (key 'Dosya Numarası')");
        assert_eq!(lines[4], "Case notes: Vaka_Takip_Notlari");
    }
}
