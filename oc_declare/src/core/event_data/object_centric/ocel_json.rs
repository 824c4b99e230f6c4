//! OCEL 2.0 JSON Format Import/Export
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter},
    path::Path,
};

use crate::core::event_data::object_centric::{io::OCELIOError, OCEL};

///
/// Import [`OCEL`] from a JSON reader
///
pub fn import_ocel_json_from_reader<R: BufRead>(reader: R) -> Result<OCEL, OCELIOError> {
    Ok(serde_json::from_reader(reader)?)
}

///
/// Import [`OCEL`] from a JSON byte slice
///
/// See also [`import_ocel_json_from_path`].
///
pub fn import_ocel_json_from_slice(slice: &[u8]) -> Result<OCEL, OCELIOError> {
    Ok(serde_json::from_slice(slice)?)
}

///
/// Import [`OCEL`] from a JSON file given by a filepath
///
pub fn import_ocel_json_from_path<P: AsRef<Path>>(path: P) -> Result<OCEL, OCELIOError> {
    import_ocel_json_from_reader(BufReader::new(File::open(path)?))
}

///
/// Export [`OCEL`] to a JSON file at the specified path
///
pub fn export_ocel_json_path<P: AsRef<Path>>(ocel: &OCEL, path: P) -> Result<(), OCELIOError> {
    let writer: BufWriter<File> = BufWriter::new(File::create(path)?);
    Ok(serde_json::to_writer(writer, ocel)?)
}
