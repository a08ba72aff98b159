//! # ldf
//!
//! `ldf` is the module to work with LIN Description Files (`.ldf`)

pub(crate) mod core;
mod parse;
mod save;
mod scanner;

pub use parse::Parser;
pub use save::{save_to_file, to_ldf_string};

use log::info;
use std::fs::File;
use std::io::{BufReader, Read};

use encoding_rs::WINDOWS_1252;

use crate::types::{database::LinDatabase, errors::LdfParseError};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses an LDF file and returns a populated [`LinDatabase`] instance.
///
/// This function reads an LDF file from disk, parses it statement by statement,
/// and fills the [`LinDatabase`] structure with all parsed information:
/// - **Header** (`LIN_description_file`, protocol/language version, `LIN_speed`, `Channel_name`)
/// - **Nodes** (master with time base and jitter, slaves)
/// - **Signals** (size, initial value, publisher, subscribers)
/// - **Frames** (id, publisher, size, signal offsets)
/// - **Node attributes** (NAD, product id, timings, configurable frames)
/// - **Schedule tables** (frame slots and diagnostic commands)
/// - **Signal encodings** (`Signal_encoding_types`, `Signal_representation`)
///
/// The database is validated before being returned; the findings are available
/// through [`LinDatabase::validation_messages`].
///
/// # Parameters
/// - `path`: Path to the `.ldf` file to parse.
///
/// # Returns
/// - `Ok(LinDatabase)` if the file was successfully read and parsed.
/// - `Err(LdfParseError)` detailing why the file could not be opened or read.
///
/// # Errors
/// Returns an `Err(LdfParseError)` if:
/// - The path does not end in `.ldf`.
/// - The file cannot be opened.
/// - There are I/O errors while reading.
///
/// # Notes
/// - Text is read as UTF-8 (BOM allowed); anything else is decoded as Windows-1252.
/// - Parsing stops only at the end of the file; malformed statements are skipped.
///
pub fn from_file(path: &str) -> Result<LinDatabase, LdfParseError> {
    // check if provided file has .ldf format
    if !path.to_ascii_lowercase().ends_with(".ldf") {
        return Err(LdfParseError::InvalidExtension {
            path: path.to_string(),
        });
    }

    let file: File = File::open(path).map_err(|source| LdfParseError::OpenFile {
        path: path.to_string(),
        source,
    })?;
    let mut reader: BufReader<File> = BufReader::new(file);
    let mut raw: Vec<u8> = Vec::new();
    reader
        .read_to_end(&mut raw)
        .map_err(|source| LdfParseError::Read {
            path: path.to_string(),
            source,
        })?;

    let db: LinDatabase = from_str(&decode_text(&raw));
    info!(
        "loaded '{path}': {} slave(s), {} signal(s), {} frame(s), {} validation message(s)",
        db.slave_count(),
        db.signal_count(),
        db.frame_count(),
        db.validation_messages().len()
    );
    Ok(db)
}

/// Parses LDF text and validates the result.
///
/// Never fails: malformed statements are dropped and problems are reported
/// through [`LinDatabase::validation_messages`].
pub fn from_str(text: &str) -> LinDatabase {
    let mut parser: Parser = Parser::new();
    parser.feed(text);
    let mut db: LinDatabase = parser.finish();
    db.validate();
    db
}

fn decode_text(raw: &[u8]) -> String {
    let raw: &[u8] = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    match std::str::from_utf8(raw) {
        Ok(text) => text.to_string(),
        Err(_) => {
            let (decoded, _, _) = WINDOWS_1252.decode(raw);
            decoded.into_owned()
        }
    }
}
