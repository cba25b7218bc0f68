use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter, Serializer};
use std::io::{self, Write};
use wazuh_inventory_core::{HostVars, Inventory, InventoryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputStyle {
    /// `", "` and `": "` separators, non-ASCII escaped.
    #[default]
    Spaced,
    Pretty,
}

/// Single-line JSON with spaced separators and ASCII-only output.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + Write,
    {
        if fragment.bytes().all(|byte| byte < 0x7f) {
            return writer.write_all(fragment.as_bytes());
        }
        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if (ch as u32) < 0x7f {
                let mut buf = [0u8; 1];
                writer.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

pub fn to_json<T>(value: &T, style: OutputStyle) -> Result<String, InventoryError>
where
    T: Serialize + ?Sized,
{
    let mut buf = Vec::with_capacity(128);
    match style {
        OutputStyle::Spaced => write_with(&mut buf, value, SpacedFormatter)?,
        OutputStyle::Pretty => write_with(&mut buf, value, PrettyFormatter::new())?,
    }
    String::from_utf8(buf).map_err(|err| InventoryError::Serialization(serde::ser::Error::custom(err)))
}

pub fn render_inventory(inventory: &Inventory, style: OutputStyle) -> Result<String, InventoryError> {
    to_json(inventory, style)
}

pub fn render_host_vars(vars: &HostVars, style: OutputStyle) -> Result<String, InventoryError> {
    to_json(vars, style)
}

fn write_with<T, F>(buf: &mut Vec<u8>, value: &T, formatter: F) -> Result<(), InventoryError>
where
    T: Serialize + ?Sized,
    F: Formatter,
{
    let mut serializer = Serializer::with_formatter(buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(())
}
