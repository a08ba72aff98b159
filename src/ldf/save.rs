use log::{info, warn};
use std::fmt::{self, Write as FmtWrite};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::types::{
    database::LinDatabase,
    encoding::EncodingValue,
    errors::LdfSaveError,
    node_attributes::LinNodeAttributes,
    version::LinVersion,
};

const INDENT: &str = "    ";
const NL: &str = "\r\n";

/// Serializes a `LinDatabase` into LDF text and writes it to `path`.
///
/// Ensures the destination has a `.ldf` extension, creates intermediate
/// directories when needed, and reports structured `LdfSaveError` variants
/// for path or I/O failures.
pub fn save_to_file(path: &str, database: &LinDatabase) -> Result<(), LdfSaveError> {
    if !path.to_ascii_lowercase().ends_with(".ldf") {
        return Err(LdfSaveError::InvalidExtension {
            path: path.to_string(),
        });
    }

    let path_ref: &Path = Path::new(path);
    if let Some(parent) = path_ref.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| LdfSaveError::CreateDirectory {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let file = File::create(path_ref).map_err(|source| LdfSaveError::CreateFile {
        path: path.to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    serialize_database(database, &mut writer).map_err(|source| LdfSaveError::Write {
        path: path.to_string(),
        source,
    })?;
    writer.flush().map_err(|source| LdfSaveError::Write {
        path: path.to_string(),
        source,
    })?;

    info!(
        "saved '{path}': {} signal(s), {} frame(s), {} schedule table(s)",
        database.signal_count(),
        database.frame_count(),
        database.schedule_table_count()
    );
    Ok(())
}

/// Renders the database as LDF text (CRLF line endings).
pub fn to_ldf_string(database: &LinDatabase) -> String {
    let mut buf: Vec<u8> = Vec::new();
    if let Err(err) = serialize_database(database, &mut buf) {
        warn!("failed to render LDF text: {err}");
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Serializes the database into raw LDF text using the provided writer.
fn serialize_database<W: Write>(db: &LinDatabase, out: &mut W) -> io::Result<()> {
    write_header(db, out)?;
    write_nodes(db, out)?;
    write_signals(db, out)?;
    write_frames(db, out)?;
    write_node_attributes(db, out)?;
    write_schedule_tables(db, out)?;
    write_encodings(db, out)?;
    Ok(())
}

fn write_header<W: Write>(db: &LinDatabase, out: &mut W) -> io::Result<()> {
    if db.is_lin_description_file {
        write_fmt(out, format_args!("LIN_description_file;{NL}"))?;
    }
    if let Some(v) = db.protocol_version {
        write_fmt(out, format_args!("LIN_protocol_version = \"{v}\";{NL}"))?;
    }
    if let Some(v) = db.language_version {
        write_fmt(out, format_args!("LIN_language_version = \"{v}\";{NL}"))?;
    }
    write_fmt(out, format_args!("LIN_speed = {:.3} kbps;{NL}", db.speed_kbps()))?;
    if let Some(channel) = &db.channel_name {
        write_fmt(out, format_args!("Channel_name = \"{channel}\";{NL}"))?;
    }
    write_fmt(out, format_args!("{NL}"))
}

fn write_nodes<W: Write>(db: &LinDatabase, out: &mut W) -> io::Result<()> {
    write_fmt(out, format_args!("Nodes {{{NL}"))?;
    if let Some(master) = db.master() {
        write_fmt(
            out,
            format_args!(
                "{INDENT}Master: {}, {} ms, {} ms;{NL}",
                master.name,
                master.timebase_ms,
                master.jitter_text()
            ),
        )?;
    }
    if db.slave_count() > 0 {
        let names: Vec<&str> = db.slaves().map(|s| s.name.as_str()).collect();
        write_fmt(out, format_args!("{INDENT}Slaves: {};{NL}", names.join(", ")))?;
    }
    write_fmt(out, format_args!("}}{NL}{NL}"))
}

fn write_signals<W: Write>(db: &LinDatabase, out: &mut W) -> io::Result<()> {
    write_fmt(out, format_args!("Signals {{{NL}"))?;
    for sig in db.signals() {
        write_fmt(
            out,
            format_args!(
                "{INDENT}{}: {}, {}, {}",
                sig.name, sig.bit_size, sig.init_value, sig.publisher
            ),
        )?;
        for sub in &sig.subscribers {
            write_fmt(out, format_args!(", {sub}"))?;
        }
        write_fmt(out, format_args!(";{NL}"))?;
    }
    write_fmt(out, format_args!("}}{NL}{NL}"))
}

fn write_frames<W: Write>(db: &LinDatabase, out: &mut W) -> io::Result<()> {
    write_fmt(out, format_args!("Frames {{{NL}"))?;
    for frame in db.frames() {
        write_fmt(
            out,
            format_args!(
                "{INDENT}{}: {}, {}, {} {{{NL}",
                frame.name, frame.id, frame.publisher, frame.size
            ),
        )?;
        for sig in &frame.signals {
            write_fmt(
                out,
                format_args!("{INDENT}{INDENT}{}, {};{NL}", sig.name, sig.offset),
            )?;
        }
        write_fmt(out, format_args!("{INDENT}}}{NL}"))?;
    }
    write_fmt(out, format_args!("}}{NL}{NL}"))
}

fn write_node_attributes<W: Write>(db: &LinDatabase, out: &mut W) -> io::Result<()> {
    write_fmt(out, format_args!("Node_attributes {{{NL}"))?;
    for attrs in db.node_attributes() {
        write_node(attrs, out)?;
    }
    write_fmt(out, format_args!("}}{NL}{NL}"))
}

fn write_node<W: Write>(attrs: &LinNodeAttributes, out: &mut W) -> io::Result<()> {
    let pad: String = INDENT.repeat(2);
    write_fmt(out, format_args!("{INDENT}{} {{{NL}", attrs.name))?;
    if let Some(protocol) = attrs.protocol {
        write_fmt(out, format_args!("{pad}LIN_protocol = \"{protocol}\";{NL}"))?;
    }
    write_fmt(
        out,
        format_args!("{pad}configured_NAD = 0x{:02X};{NL}", attrs.configured_nad),
    )?;
    if let Some(nad) = attrs.initial_nad {
        write_fmt(out, format_args!("{pad}initial_NAD = 0x{nad:02X};{NL}"))?;
    }
    let pid = attrs.product_id;
    write_fmt(
        out,
        format_args!(
            "{pad}product_id = 0x{:04X}, 0x{:04X}, 0x{:02X};{NL}",
            pid.supplier_id, pid.function_id, pid.variant
        ),
    )?;
    if let Some(signal) = &attrs.response_error {
        write_fmt(out, format_args!("{pad}response_error = {signal};{NL}"))?;
    }
    if !attrs.fault_state_signals.is_empty() {
        write_fmt(
            out,
            format_args!(
                "{pad}fault_state_signals = {};{NL}",
                attrs.fault_state_signals.join(", ")
            ),
        )?;
    }
    write_fmt(out, format_args!("{pad}P2_min = {} ms;{NL}", attrs.p2_min_ms))?;
    write_fmt(out, format_args!("{pad}ST_min = {} ms;{NL}", attrs.st_min_ms))?;
    write_fmt(
        out,
        format_args!("{pad}N_As_timeout = {} ms;{NL}", attrs.n_as_timeout_ms),
    )?;
    write_fmt(
        out,
        format_args!("{pad}N_Cr_timeout = {} ms;{NL}", attrs.n_cr_timeout_ms),
    )?;

    if !attrs.configurable_frames.is_empty() {
        write_fmt(out, format_args!("{pad}configurable_frames {{{NL}"))?;
        for frame in &attrs.configurable_frames {
            match (attrs.protocol, frame.id) {
                // LIN 2.0 assigns message ids in the file
                (Some(LinVersion::V2_0), Some(id)) => write_fmt(
                    out,
                    format_args!("{pad}{INDENT}{} = 0x{id:02X};{NL}", frame.name),
                )?,
                _ => write_fmt(out, format_args!("{pad}{INDENT}{};{NL}", frame.name))?,
            }
        }
        write_fmt(out, format_args!("{pad}}}{NL}"))?;
    }
    write_fmt(out, format_args!("{INDENT}}}{NL}"))
}

fn write_schedule_tables<W: Write>(db: &LinDatabase, out: &mut W) -> io::Result<()> {
    write_fmt(out, format_args!("Schedule_tables {{{NL}"))?;
    for table in db.schedule_tables() {
        write_fmt(out, format_args!("{INDENT}{} {{{NL}", table.name))?;
        for entry in &table.entries {
            write_fmt(
                out,
                format_args!(
                    "{INDENT}{INDENT}{} delay {} ms;{NL}",
                    entry.command, entry.delay_ms
                ),
            )?;
        }
        write_fmt(out, format_args!("{INDENT}}}{NL}"))?;
    }
    write_fmt(out, format_args!("}}{NL}{NL}"))
}

fn write_encodings<W: Write>(db: &LinDatabase, out: &mut W) -> io::Result<()> {
    if db.encoding_types.is_empty() && db.encoding_signals.is_empty() {
        return Ok(());
    }

    write_fmt(out, format_args!("Signal_encoding_types {{{NL}"))?;
    for enc in db.encoding_types() {
        write_fmt(out, format_args!("{INDENT}{} {{{NL}", enc.name))?;
        for value in &enc.values {
            write_fmt(out, format_args!("{INDENT}{INDENT}"))?;
            match value {
                EncodingValue::Logical { value, text } => {
                    write_fmt(out, format_args!("logical_value, {value}"))?;
                    if let Some(text) = text {
                        write_fmt(out, format_args!(", \"{text}\""))?;
                    }
                }
                EncodingValue::Physical {
                    min,
                    max,
                    scale,
                    offset,
                    unit,
                } => {
                    write_fmt(
                        out,
                        format_args!("physical_value, {min}, {max}, {scale}, {offset}"),
                    )?;
                    if let Some(unit) = unit {
                        write_fmt(out, format_args!(", \"{unit}\""))?;
                    }
                }
                EncodingValue::Bcd => write_fmt(out, format_args!("bcd_value"))?,
                EncodingValue::Ascii => write_fmt(out, format_args!("ascii_value"))?,
            }
            write_fmt(out, format_args!(";{NL}"))?;
        }
        write_fmt(out, format_args!("{INDENT}}}{NL}"))?;
    }
    write_fmt(out, format_args!("}}{NL}{NL}"))?;

    write_fmt(out, format_args!("Signal_representation {{{NL}"))?;
    for group in db.encoding_signals() {
        write_fmt(
            out,
            format_args!("{INDENT}{}: {};{NL}", group.name, group.signals.join(", ")),
        )?;
    }
    write_fmt(out, format_args!("}}{NL}"))
}

struct IoWriteAdapter<'a, W: Write> {
    inner: &'a mut W,
    error: Option<io::Error>,
}

impl<'a, W: Write> FmtWrite for IoWriteAdapter<'a, W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Err(err) = self.inner.write_all(s.as_bytes()) {
            self.error = Some(err);
            return Err(fmt::Error);
        }
        Ok(())
    }
}

/// Writes formatted arguments to any writer, propagating the underlying I/O error.
fn write_fmt<W: Write>(out: &mut W, args: fmt::Arguments<'_>) -> io::Result<()> {
    let mut adapter = IoWriteAdapter {
        inner: out,
        error: None,
    };
    match fmt::write(&mut adapter, args) {
        Ok(()) => Ok(()),
        Err(_) => Err(adapter
            .error
            .unwrap_or_else(|| io::Error::other("formatting error"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        frame::{FrameSignal, LinFrame},
        node::{LinMasterNode, LinNode},
        node_attributes::ConfigurableFrame,
        schedule::{LinScheduleTable, ScheduleCommand, ScheduleEntry},
        signal::{LinSignal, SignalInitValue},
    };

    fn build_database() -> LinDatabase {
        let mut db: LinDatabase = LinDatabase::new();
        db.protocol_version = Some(LinVersion::V2_0);
        db.language_version = Some(LinVersion::V2_0);
        db.set_speed_kbps(19.2);
        db.update_master(LinMasterNode::new("ECU", 10, 1)).unwrap();
        db.add_slave(LinNode::new("Door")).unwrap();
        db.add_signal(LinSignal::new(
            "DoorData",
            16,
            SignalInitValue::Array(vec![0, 255]),
            "Door",
            &["ECU"],
        ))
        .unwrap();
        let mut frame: LinFrame = LinFrame::new("DoorFrame", 0x21, "Door", 2);
        frame.add_signal(FrameSignal::new("DoorData", 0));
        db.add_frame(frame).unwrap();

        let mut attrs: LinNodeAttributes = LinNodeAttributes::new("Door");
        attrs.protocol = Some(LinVersion::V2_0);
        attrs.configured_nad = 0x0A;
        attrs.add_configurable_frame(ConfigurableFrame::new("DoorFrame", Some(0x21)));
        db.add_node_attributes(attrs).unwrap();

        let mut table: LinScheduleTable = LinScheduleTable::new("Normal");
        table.add_entry(ScheduleEntry::new(
            ScheduleCommand::UnconditionalFrame {
                frame: "DoorFrame".to_string(),
            },
            10.0,
        ));
        table.add_entry(ScheduleEntry::new(
            ScheduleCommand::AssignNad {
                slave: "Door".to_string(),
            },
            12.5,
        ));
        db.add_schedule_table(table).unwrap();
        db
    }

    #[test]
    fn test_serialize_sections() {
        let text: String = to_ldf_string(&build_database());

        assert!(text.starts_with("LIN_description_file;\r\nLIN_protocol_version = \"2.0\";\r\n"));
        assert!(text.contains("LIN_speed = 19.200 kbps;\r\n"));
        assert!(text.contains("    Master: ECU, 10 ms, 0.1 ms;\r\n    Slaves: Door;\r\n"));
        assert!(text.contains("    DoorData: 16, {0, 255}, Door, ECU;\r\n"));
        assert!(text.contains("    DoorFrame: 33, Door, 2 {\r\n        DoorData, 0;\r\n    }\r\n"));
        assert!(text.contains("        configured_NAD = 0x0A;\r\n"));
        assert!(!text.contains("initial_NAD"));
        assert!(text.contains("            DoorFrame = 0x21;\r\n"));
        assert!(text.contains("        DoorFrame delay 10 ms;\r\n"));
        assert!(text.contains("        AssignNAD { Door } delay 12.5 ms;\r\n"));
        assert!(!text.contains("Signal_encoding_types"));

        let order: Vec<usize> = [
            "Nodes {",
            "Signals {",
            "Frames {",
            "Node_attributes {",
            "Schedule_tables {",
        ]
        .iter()
        .map(|s| text.find(s).unwrap())
        .collect();
        assert!(order.windows(2).all(|w| w[0] < w[1]));
        assert!(!text.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_configurable_frames_lin21_are_bare() {
        let mut db: LinDatabase = build_database();
        let mut attrs: LinNodeAttributes = db.get_node_attributes_by_name("Door").unwrap().clone();
        attrs.protocol = Some(LinVersion::V2_1);
        db.update_node_attributes("Door", attrs).unwrap();

        let text: String = to_ldf_string(&db);
        assert!(text.contains("            DoorFrame;\r\n"));
        assert!(text.contains("        LIN_protocol = \"2.1\";\r\n"));
    }

    #[test]
    fn test_optional_items_are_omitted() {
        let text: String = to_ldf_string(&LinDatabase::default());
        assert!(!text.contains("LIN_description_file"));
        assert!(!text.contains("LIN_protocol_version"));
        assert!(!text.contains("Master:"));
        assert!(!text.contains("Slaves:"));
        assert!(text.contains("LIN_speed = 0.000 kbps;"));
    }

    #[test]
    fn test_save_rejects_extension() {
        let err = save_to_file("out.dbc", &LinDatabase::new()).unwrap_err();
        assert!(matches!(err, LdfSaveError::InvalidExtension { .. }));
    }
}
