//! IO implementations for OCEL

use std::{fmt::Display, io::BufRead, path::Path, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::{
    event_data::{
        object_centric::{ocel_json, ocel_xml::import_ocel_xml_reader, OCELImportOptions, OCEL},
        timestamp_utils::InvalidTimestamp,
    },
    io::Importable,
};

/// Error type for OCEL IO operations
#[derive(Debug, thiserror::Error)]
pub enum OCELIOError {
    /// IO Error
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON Parsing Error
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    /// XML Parsing Error
    #[error("XML Error: {0}")]
    Xml(#[from] quick_xml::Error),
    /// Timestamp that could not be parsed in any supported format
    #[error("Invalid timestamp: {0}")]
    Timestamp(#[from] InvalidTimestamp),
    /// Required XML attribute missing on an element
    #[error("Missing attribute `{attribute}` on <{element}>")]
    MissingAttribute {
        /// Element name
        element: String,
        /// Attribute name
        attribute: &'static str,
    },
    /// Unsupported Format
    #[error("Unsupported Format: {0}")]
    UnsupportedFormat(String),
    /// Other Error
    #[error("Error: {0}")]
    Other(String),
}

/// Serialization formats of OCEL 2.0 supported by the importers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum OcelFormat {
    /// OCEL 2.0 JSON (`.json`, `.jsonocel`)
    Json,
    /// OCEL 2.0 XML (`.xml`, `.xmlocel`)
    Xml,
}

impl OcelFormat {
    /// Infer the format from a file name or path
    ///
    /// ```
    /// use oc_declare::core::event_data::object_centric::OcelFormat;
    ///
    /// assert_eq!(OcelFormat::from_path("order-management.jsonocel"), Some(OcelFormat::Json));
    /// assert_eq!(OcelFormat::from_path("logs/p2p.XML"), Some(OcelFormat::Xml));
    /// assert_eq!(OcelFormat::from_path("log.sqlite"), None);
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let p = path.as_ref().to_string_lossy().to_lowercase();
        if p.ends_with(".json") || p.ends_with(".jsonocel") {
            Some(Self::Json)
        } else if p.ends_with(".xml") || p.ends_with(".xmlocel") {
            Some(Self::Xml)
        } else {
            None
        }
    }

    /// Lowercase name of the format
    pub fn as_str(&self) -> &'static str {
        match self {
            OcelFormat::Json => "json",
            OcelFormat::Xml => "xml",
        }
    }
}

impl Display for OcelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OcelFormat {
    type Err = OCELIOError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "json" | "jsonocel" => Ok(Self::Json),
            "xml" | "xmlocel" => Ok(Self::Xml),
            other => Err(OCELIOError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl Importable for OCEL {
    type Error = OCELIOError;
    type Format = OcelFormat;
    type Options = OCELImportOptions;

    fn import_from_reader_with<R: BufRead>(
        reader: R,
        format: OcelFormat,
        options: &OCELImportOptions,
    ) -> Result<Self, Self::Error> {
        match format {
            OcelFormat::Json => ocel_json::import_ocel_json_from_reader(reader),
            OcelFormat::Xml => import_ocel_xml_reader(reader, options),
        }
    }

    fn infer_format(path: &Path) -> Option<OcelFormat> {
        OcelFormat::from_path(path)
    }
}

///
/// Import an [`OCEL`] from raw bytes in the given format
///
pub fn import_ocel_slice(
    bytes: &[u8],
    format: OcelFormat,
    options: &OCELImportOptions,
) -> Result<OCEL, OCELIOError> {
    OCEL::import_from_bytes_with(bytes, format, options)
}

///
/// Import an [`OCEL`] from a file path, inferring the format from its extension
///
pub fn import_ocel_path<P: AsRef<Path>>(
    path: P,
    options: &OCELImportOptions,
) -> Result<OCEL, OCELIOError> {
    let path = path.as_ref();
    if OcelFormat::from_path(path).is_none() {
        return Err(OCELIOError::UnsupportedFormat(path.display().to_string()));
    }
    OCEL::import_from_path_with(path, options)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MINIMAL_JSON: &str = r#"{
        "objectTypes": [{"name": "orders", "attributes": []}],
        "eventTypes": [{"name": "place order", "attributes": []}],
        "objects": [{"id": "o1", "type": "orders"}],
        "events": [{
            "id": "e1", "type": "place order", "time": "2024-01-01T10:00:00Z",
            "relationships": [{"objectId": "o1", "qualifier": ""}]
        }]
    }"#;

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<OcelFormat>().unwrap(), OcelFormat::Json);
        assert_eq!(".xmlocel".parse::<OcelFormat>().unwrap(), OcelFormat::Xml);
        assert!(matches!(
            "csv".parse::<OcelFormat>(),
            Err(OCELIOError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_import_path_infers_format() {
        let mut file = tempfile::Builder::new()
            .suffix(".jsonocel")
            .tempfile()
            .unwrap();
        file.write_all(MINIMAL_JSON.as_bytes()).unwrap();
        let ocel = import_ocel_path(file.path(), &OCELImportOptions::default()).unwrap();
        assert_eq!(ocel.events.len(), 1);
        assert_eq!(ocel.events[0].relationships[0].object_id, "o1");
    }

    #[test]
    fn test_import_path_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let res = import_ocel_path(file.path(), &OCELImportOptions::default());
        assert!(matches!(res, Err(OCELIOError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_malformed_bytes() {
        let res = import_ocel_slice(b"{not json", OcelFormat::Json, &Default::default());
        assert!(matches!(res, Err(OCELIOError::Json(_))));
    }
}
