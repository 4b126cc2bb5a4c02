use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::file_format::FileFormat;

pub type Result<T> = anyhow::Result<T>;

pub fn serialize<T: Serialize>(value: &T, format: FileFormat) -> Result<String> {
    let mut text = match format {
        FileFormat::Yaml => serde_yml::to_string(value)?,
        FileFormat::Json => serde_json::to_string_pretty(value)?,
        FileFormat::Toml => toml::to_string(value)?,
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }

    Ok(text)
}

pub fn deserialize<T: DeserializeOwned>(serialized: &[u8], format: FileFormat) -> Result<T> {
    let text = std::str::from_utf8(serialized)?;
    match format {
        FileFormat::Yaml => Ok(serde_yml::from_str(text)?),
        FileFormat::Json => Ok(serde_json::from_str(text)?),
        FileFormat::Toml => Ok(toml::from_str(text)?),
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        level: u8,
        enabled: bool,
        name: String,
    }

    #[test]
    fn every_format_reads_back_what_it_writes() {
        let settings = Settings {
            level: 2,
            enabled: true,
            name: "hall".to_string(),
        };

        for format in FileFormat::all_formats_for_testing() {
            let text = serialize(&settings, format).unwrap();
            assert!(text.ends_with('\n'), "{format:?} output should end with a newline");
            let restored: Settings = deserialize(text.as_bytes(), format).unwrap();
            assert_eq!(restored, settings, "{format:?}");
        }
    }

    #[test]
    fn deserialize_rejects_invalid_utf8() {
        let result: Result<Settings> = deserialize(&[0xff, 0xfe], FileFormat::Json);
        assert!(result.is_err());
    }
}
