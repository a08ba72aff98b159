use log::{debug, warn};

use crate::ldf::core::tokens;
use crate::types::{database::LinDatabase, version::LinVersion};

/// Decode a top-level directive and store it in the database.
/// Example: `LIN_speed = 19.2 kbps`
///
/// Unknown directives and unreadable values are ignored.
pub(crate) fn decode(db: &mut LinDatabase, line: &str) {
    let (key, value) = match line.split_once('=') {
        Some((k, v)) => (k.trim(), v.trim()),
        None => (line.trim(), ""),
    };

    match key {
        "LIN_description_file" => db.is_lin_description_file = true,
        "LIN_protocol_version" => match LinVersion::from_ldf_token(value) {
            Some(v) => db.protocol_version = Some(v),
            None => warn!("unsupported LIN_protocol_version {value}"),
        },
        "LIN_language_version" => match LinVersion::from_ldf_token(value) {
            Some(v) => db.language_version = Some(v),
            None => warn!("unsupported LIN_language_version {value}"),
        },
        "LIN_speed" => match tokens::parse_f64(tokens::strip_unit(value, "kbps")) {
            Some(kbps) if kbps >= 0.0 => db.set_speed_kbps(kbps),
            _ => warn!("unreadable LIN_speed '{value}'"),
        },
        "Channel_name" => db.channel_name = Some(tokens::unquote(value).to_string()),
        other => debug!("ignoring directive '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_header() {
        let mut db: LinDatabase = LinDatabase::default();
        decode(&mut db, "LIN_description_file");
        decode(&mut db, "LIN_protocol_version = \"2.1\"");
        decode(&mut db, "LIN_language_version = \"2.0\"");
        decode(&mut db, "LIN_speed = 19.2 kbps");
        decode(&mut db, "Channel_name = \"DB\"");

        assert!(db.is_lin_description_file);
        assert_eq!(db.protocol_version, Some(LinVersion::V2_1));
        assert_eq!(db.language_version, Some(LinVersion::V2_0));
        assert_eq!(db.speed, 19200);
        assert_eq!(db.channel_name.as_deref(), Some("DB"));
    }

    #[test]
    fn test_decode_header_lenient() {
        let mut db: LinDatabase = LinDatabase::default();
        decode(&mut db, "LIN_protocol_version = \"1.3\"");
        decode(&mut db, "LIN_speed = fast");
        decode(&mut db, "Something_else = 1");
        assert_eq!(db, LinDatabase::default());
    }
}
