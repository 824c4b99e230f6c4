//! Object-centric event data (OCEL 2.0)

/// IO for OCEL 2.0 (format detection, errors and [`crate::core::io::Importable`])
pub mod io;
/// Linked OCEL 2.0, allowing convenient and index-based access to object-centric data
pub mod linked_ocel;
/// Macros for the creation of [`OCEL`]
pub mod macros;
/// OCEL 2.0 JSON import/export
pub mod ocel_json;
/// OCEL 2.0 struct and sub-structs
pub mod ocel_struct;
/// Parser for the OCEL 2.0 XML format
pub mod ocel_xml;

#[doc(inline)]
pub use io::{import_ocel_path, import_ocel_slice, OCELIOError, OcelFormat};
#[doc(inline)]
pub use ocel_struct::*;
#[doc(inline)]
pub use ocel_xml::OCELImportOptions;
