use indexmap::IndexMap;
use serde::Serialize;
use std::str::FromStr;

use crate::utils::CsvReaderError;

/// How fields of a row are keyed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMode {
    /// By header name.
    #[default]
    Associative,
    /// By zero-based column index.
    Positional,
}

impl FromStr for KeyMode {
    type Err = CsvReaderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "associative" | "assoc" => Ok(KeyMode::Associative),
            "positional" | "index" => Ok(KeyMode::Positional),
            other => Err(CsvReaderError::ConfigError(format!(
                "unknown key mode: {}",
                other
            ))),
        }
    }
}

/// One data row. Serializes as a JSON object or array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Row {
    Associative(IndexMap<String, String>),
    Positional(Vec<String>),
}

impl Row {
    /// Field by header name. Always `None` for positional rows.
    pub fn get(&self, name: &str) -> Option<&str> {
        match self {
            Row::Associative(map) => map.get(name).map(String::as_str),
            Row::Positional(_) => None,
        }
    }

    /// Field by column index, in either mode.
    pub fn field(&self, index: usize) -> Option<&str> {
        match self {
            Row::Associative(map) => map.get_index(index).map(|(_, v)| v.as_str()),
            Row::Positional(values) => values.get(index).map(String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Row::Associative(map) => map.len(),
            Row::Positional(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn key_mode(&self) -> KeyMode {
        match self {
            Row::Associative(_) => KeyMode::Associative,
            Row::Positional(_) => KeyMode::Positional,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Row {
        let mut map = IndexMap::new();
        map.insert("street".to_string(), "51 OMAHA CT".to_string());
        map.insert("city".to_string(), "SACRAMENTO".to_string());
        Row::Associative(map)
    }

    #[test]
    fn lookups_by_name_and_index() {
        let row = sample();
        assert_eq!(row.get("city"), Some("SACRAMENTO"));
        assert_eq!(row.field(0), Some("51 OMAHA CT"));
        assert_eq!(row.get("zip"), None);

        let row = Row::Positional(vec!["a".into(), "b".into()]);
        assert_eq!(row.get("a"), None);
        assert_eq!(row.field(1), Some("b"));
        assert_eq!(row.key_mode(), KeyMode::Positional);
        assert!(!row.is_empty());
        assert!(Row::Positional(Vec::new()).is_empty());
    }

    #[test]
    fn serializes_in_header_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(json, r#"{"street":"51 OMAHA CT","city":"SACRAMENTO"}"#);

        let json = serde_json::to_string(&Row::Positional(vec!["x".into()])).unwrap();
        assert_eq!(json, r#"["x"]"#);
    }

    #[test]
    fn parses_key_mode() {
        assert_eq!("associative".parse::<KeyMode>().unwrap(), KeyMode::Associative);
        assert_eq!("INDEX".parse::<KeyMode>().unwrap(), KeyMode::Positional);
        assert!("by-name".parse::<KeyMode>().is_err());
    }
}
