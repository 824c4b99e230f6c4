//! OCEL 2.0 XML Import
use std::{
    collections::HashMap,
    io::{BufRead, BufReader},
    path::Path,
};

use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::core::event_data::{
    object_centric::{
        io::OCELIOError, OCELAttributeType, OCELAttributeValue, OCELEvent, OCELEventAttribute,
        OCELObject, OCELObjectAttribute, OCELRelationship, OCELType, OCELTypeAttribute, OCEL,
    },
    timestamp_utils::parse_timestamp,
};

///
/// Options for OCEL Import
///
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[serde(default)]
pub struct OCELImportOptions {
    /// Log warnings (e.g., for invalid attribute values) through `tracing`
    pub verbose: bool,
    /// Optional date format to use when parsing `DateTimes` (first trying [`chrono::DateTime`] then falling back to [`chrono::NaiveDateTime`] with UTC timezone).
    ///
    /// See <https://docs.rs/chrono/latest/chrono/format/strftime/index.html> for all available Specifiers.
    ///
    /// Will fall back to default formats (e.g., rfc3339) if parsing fails using passed `date_format`
    pub date_format: Option<String>,
}

impl Default for OCELImportOptions {
    fn default() -> Self {
        Self {
            verbose: true,
            date_format: None,
        }
    }
}

///
/// Current Parsing Mode (i.e., which tag is currently open / being parsed)
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    None,
    Log,
    ObjectTypes,
    ObjectType,
    EventTypes,
    EventType,
    Objects,
    Object,
    ObjectAttribute,
    Events,
    Event,
    EventAttribute,
    /// Attribute whose time could not be parsed; its value is dropped
    SkippedAttribute,
}

struct XmlOcelBuilder<'a> {
    ocel: OCEL,
    options: &'a OCELImportOptions,
    // (Type name, Attribute name) => Attribute type
    object_attribute_types: HashMap<(String, String), OCELAttributeType>,
    event_attribute_types: HashMap<(String, String), OCELAttributeType>,
    has_type_decl: bool,
}

fn read_to_string(x: &[u8]) -> String {
    match std::str::from_utf8(x) {
        Ok(x_str) => match quick_xml::escape::unescape(x_str) {
            Ok(unescaped) => unescaped.into_owned(),
            Err(_) => x_str.to_string(),
        },
        Err(_) => String::from_utf8_lossy(x).into_owned(),
    }
}

fn get_attribute_value(t: &BytesStart<'_>, key: &'static str) -> Result<String, OCELIOError> {
    match t.try_get_attribute(key).map_err(quick_xml::Error::from)? {
        Some(attr) => Ok(read_to_string(attr.value.as_ref())),
        None => Err(OCELIOError::MissingAttribute {
            element: read_to_string(t.name().as_ref()),
            attribute: key,
        }),
    }
}

fn get_relationship(t: &BytesStart<'_>) -> Result<OCELRelationship, OCELIOError> {
    let object_id = get_attribute_value(t, "object-id")?;
    // Some exports omit empty qualifiers
    let qualifier = get_attribute_value(t, "qualifier").unwrap_or_default();
    Ok(OCELRelationship::new(object_id, qualifier))
}

fn parse_attribute_value(
    attribute_type: OCELAttributeType,
    value: String,
    options: &OCELImportOptions,
) -> OCELAttributeValue {
    let res = match attribute_type {
        OCELAttributeType::String => Ok(OCELAttributeValue::String(value.clone())),
        OCELAttributeType::Integer => value
            .parse::<i64>()
            .map_err(|e| e.to_string())
            .map(OCELAttributeValue::Integer),
        OCELAttributeType::Float => value
            .parse::<f64>()
            .or_else(|e| if value == "null" { Ok(f64::NAN) } else { Err(e) })
            .map_err(|e| e.to_string())
            .map(OCELAttributeValue::Float),
        OCELAttributeType::Boolean => value
            .parse::<bool>()
            .map_err(|e| e.to_string())
            .map(OCELAttributeValue::Boolean),
        OCELAttributeType::Null => Ok(OCELAttributeValue::Null),
        OCELAttributeType::Time => {
            parse_timestamp(&value, options.date_format.as_deref(), options.verbose)
                .map_err(|e| e.to_string())
                .map(OCELAttributeValue::Time)
        }
    };
    res.unwrap_or_else(|e| {
        if options.verbose {
            tracing::warn!(
                value = %value,
                ?attribute_type,
                error = %e,
                "failed to parse attribute value"
            );
        }
        OCELAttributeValue::Null
    })
}

impl<'a> XmlOcelBuilder<'a> {
    fn new(options: &'a OCELImportOptions) -> Self {
        Self {
            ocel: OCEL::default(),
            options,
            object_attribute_types: HashMap::new(),
            event_attribute_types: HashMap::new(),
            has_type_decl: false,
        }
    }

    /// Handle an opening (or self-closing) element, returning the mode for its content
    fn open(&mut self, t: &BytesStart<'_>, mode: Mode) -> Result<Mode, OCELIOError> {
        let next = match (mode, t.name().as_ref()) {
            (Mode::None, b"log") => Mode::Log,
            (Mode::Log, b"object-types") => {
                self.has_type_decl = true;
                Mode::ObjectTypes
            }
            (Mode::Log, b"event-types") => {
                self.has_type_decl = true;
                Mode::EventTypes
            }
            (Mode::Log, b"objects") => Mode::Objects,
            (Mode::Log, b"events") => Mode::Events,
            (Mode::ObjectTypes, b"object-type") => {
                self.ocel.object_types.push(OCELType {
                    name: get_attribute_value(t, "name")?,
                    attributes: Vec::new(),
                });
                Mode::ObjectType
            }
            (Mode::EventTypes, b"event-type") => {
                self.ocel.event_types.push(OCELType {
                    name: get_attribute_value(t, "name")?,
                    attributes: Vec::new(),
                });
                Mode::EventType
            }
            (Mode::ObjectType, b"attribute") => {
                let attr = self.type_attribute(t)?;
                if let Some(ot) = self.ocel.object_types.last_mut() {
                    self.object_attribute_types.insert(
                        (ot.name.clone(), attr.name.clone()),
                        OCELAttributeType::from_type_str(&attr.value_type),
                    );
                    ot.attributes.push(attr);
                }
                mode
            }
            (Mode::EventType, b"attribute") => {
                let attr = self.type_attribute(t)?;
                if let Some(et) = self.ocel.event_types.last_mut() {
                    self.event_attribute_types.insert(
                        (et.name.clone(), attr.name.clone()),
                        OCELAttributeType::from_type_str(&attr.value_type),
                    );
                    et.attributes.push(attr);
                }
                mode
            }
            (Mode::Objects, b"object") => {
                self.ocel.objects.push(OCELObject {
                    id: get_attribute_value(t, "id")?,
                    object_type: get_attribute_value(t, "type")?,
                    attributes: Vec::new(),
                    relationships: Vec::new(),
                });
                Mode::Object
            }
            (Mode::Events, b"event") => {
                let time = get_attribute_value(t, "time")?;
                let time = parse_timestamp(
                    &time,
                    self.options.date_format.as_deref(),
                    self.options.verbose,
                )?;
                self.ocel.events.push(OCELEvent::new(
                    get_attribute_value(t, "id")?,
                    get_attribute_value(t, "type")?,
                    time,
                    Vec::new(),
                    Vec::new(),
                ));
                Mode::Event
            }
            (Mode::Object, b"attribute") => {
                let name = get_attribute_value(t, "name")?;
                let time_str = get_attribute_value(t, "time")?;
                let time = parse_timestamp(
                    &time_str,
                    self.options.date_format.as_deref(),
                    self.options.verbose,
                );
                match (time, self.ocel.objects.last_mut()) {
                    (Ok(time), Some(o)) => {
                        o.attributes.push(OCELObjectAttribute {
                            name,
                            value: OCELAttributeValue::Null,
                            time,
                        });
                        Mode::ObjectAttribute
                    }
                    _ => {
                        if self.options.verbose {
                            tracing::warn!(
                                attribute = %name,
                                "skipping object attribute with invalid time"
                            );
                        }
                        Mode::SkippedAttribute
                    }
                }
            }
            (Mode::Event, b"attribute") => {
                let name = get_attribute_value(t, "name")?;
                if let Some(e) = self.ocel.events.last_mut() {
                    e.attributes.push(OCELEventAttribute {
                        name,
                        value: OCELAttributeValue::Null,
                    });
                }
                Mode::EventAttribute
            }
            // Several published logs use <object> or <relobj> instead of <relationship>
            (Mode::Object, b"relationship" | b"relobj") => {
                let rel = get_relationship(t)?;
                if let Some(o) = self.ocel.objects.last_mut() {
                    o.relationships.push(rel);
                }
                mode
            }
            (Mode::Event, b"relationship" | b"relobj" | b"object") => {
                let rel = get_relationship(t)?;
                if let Some(e) = self.ocel.events.last_mut() {
                    e.relationships.push(rel);
                }
                mode
            }
            // <attributes> and <objects> wrappers carry no information
            _ => mode,
        };
        Ok(next)
    }

    fn type_attribute(&self, t: &BytesStart<'_>) -> Result<OCELTypeAttribute, OCELIOError> {
        Ok(OCELTypeAttribute {
            name: get_attribute_value(t, "name")?,
            value_type: get_attribute_value(t, "type")?,
        })
    }

    fn close(&self, name: &[u8], mode: Mode) -> Mode {
        match (mode, name) {
            (Mode::Log, b"log") => Mode::None,
            (Mode::ObjectTypes, b"object-types")
            | (Mode::EventTypes, b"event-types")
            | (Mode::Objects, b"objects")
            | (Mode::Events, b"events") => Mode::Log,
            (Mode::ObjectType, b"object-type") => Mode::ObjectTypes,
            (Mode::EventType, b"event-type") => Mode::EventTypes,
            (Mode::Object, b"object") => Mode::Objects,
            (Mode::Event, b"event") => Mode::Events,
            // Only object attributes carry a time and can be skipped
            (Mode::ObjectAttribute | Mode::SkippedAttribute, b"attribute") => Mode::Object,
            (Mode::EventAttribute, b"attribute") => Mode::Event,
            _ => mode,
        }
    }

    fn text(&mut self, value: String, mode: Mode) {
        match mode {
            Mode::ObjectAttribute => {
                if let Some(o) = self.ocel.objects.last_mut() {
                    if let Some(attribute) = o.attributes.last_mut() {
                        let attr_type = self
                            .object_attribute_types
                            .get(&(o.object_type.clone(), attribute.name.clone()))
                            .copied()
                            .unwrap_or(OCELAttributeType::String);
                        attribute.value = parse_attribute_value(attr_type, value, self.options);
                    }
                }
            }
            Mode::EventAttribute => {
                if let Some(e) = self.ocel.events.last_mut() {
                    if let Some(attribute) = e.attributes.last_mut() {
                        let attr_type = self
                            .event_attribute_types
                            .get(&(e.event_type.clone(), attribute.name.clone()))
                            .copied()
                            .unwrap_or(OCELAttributeType::String);
                        attribute.value = parse_attribute_value(attr_type, value, self.options);
                    }
                }
            }
            Mode::SkippedAttribute => {}
            _ => {
                if self.options.verbose {
                    tracing::warn!(?mode, "got text in unexpected mode");
                }
            }
        }
    }
}

///
/// Import an [`OCEL`] XML file from the given reader
///
pub fn import_ocel_xml<T>(
    reader: &mut Reader<T>,
    options: &OCELImportOptions,
) -> Result<OCEL, OCELIOError>
where
    T: BufRead,
{
    reader.config_mut().trim_text(true);
    let mut buf: Vec<u8> = Vec::new();
    let mut mode = Mode::None;
    let mut builder = XmlOcelBuilder::new(options);
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(t) => mode = builder.open(&t, mode)?,
            Event::Empty(t) => {
                // Self-closing elements have no content, so the mode stays
                let inner = builder.open(&t, mode)?;
                mode = builder.close(t.name().as_ref(), inner);
            }
            Event::End(t) => mode = builder.close(t.name().as_ref(), mode),
            Event::Text(t) => builder.text(read_to_string(&t), mode),
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    if !builder.has_type_decl {
        return Err(OCELIOError::Other("No object or event types".to_string()));
    }
    Ok(builder.ocel)
}

///
/// Import an [`OCEL`] XML from a buffered reader
///
pub fn import_ocel_xml_reader<R: BufRead>(
    reader: R,
    options: &OCELImportOptions,
) -> Result<OCEL, OCELIOError> {
    import_ocel_xml(&mut Reader::from_reader(reader), options)
}

///
/// Import an [`OCEL`] XML from a byte slice __with__ _custom options_
///
pub fn import_ocel_xml_slice_with(
    xml_data: &[u8],
    options: &OCELImportOptions,
) -> Result<OCEL, OCELIOError> {
    import_ocel_xml_reader(xml_data, options)
}

///
/// Import an [`OCEL`] XML from a filepath __with__ _custom options_
///
pub fn import_ocel_xml_path_with<P: AsRef<Path>>(
    path: P,
    options: &OCELImportOptions,
) -> Result<OCEL, OCELIOError> {
    import_ocel_xml_reader(BufReader::new(std::fs::File::open(path)?), options)
}

///
/// Import an [`OCEL`] XML from a byte slice with default options
///
pub fn import_ocel_xml_slice(xml_data: &[u8]) -> Result<OCEL, OCELIOError> {
    import_ocel_xml_slice_with(xml_data, &OCELImportOptions::default())
}
