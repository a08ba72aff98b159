use log::warn;

use crate::ldf::core::tokens;
use crate::types::{
    database::LinDatabase,
    node::{LinMasterNode, LinNode},
};

/// Decode a line of the `Nodes` section.
/// Examples: `Master: ECU, 10 ms, 0.1 ms` and `Slaves: Door, Seat`
pub(crate) fn decode(db: &mut LinDatabase, line: &str) {
    let Some((key, rest)) = tokens::split_name(line) else {
        warn!("dropping Nodes statement '{line}'");
        return;
    };
    match key {
        "Master" => match decode_master(rest) {
            Some(master) => db.master = Some(master),
            None => warn!("dropping master definition '{line}'"),
        },
        "Slaves" => db.slaves.extend(decode_slaves(rest)),
        _ => warn!("dropping Nodes statement '{line}'"),
    }
}

/// `<name>, <time base> ms, <jitter> ms`; the jitter is stored in tenths of ms.
fn decode_master(rest: &str) -> Option<LinMasterNode> {
    let parts: Vec<&str> = rest.split(',').map(str::trim).collect();
    let name: &str = parts.first().copied().filter(|n| tokens::is_identifier(n))?;
    let timebase: f64 = tokens::parse_f64(tokens::strip_unit(parts.get(1)?, "ms"))?;
    let jitter: f64 = match parts.get(2) {
        Some(j) => tokens::parse_f64(tokens::strip_unit(j, "ms"))?,
        None => 0.0,
    };
    if timebase < 0.0 || jitter < 0.0 {
        return None;
    }
    Some(LinMasterNode::new(
        name,
        timebase.trunc().min(f64::from(u16::MAX)) as u16,
        (jitter * 10.0).round().min(f64::from(u16::MAX)) as u16,
    ))
}

fn decode_slaves(rest: &str) -> Vec<LinNode> {
    tokens::identifier_list(rest)
        .iter()
        .map(|name| LinNode::new(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_nodes() {
        let mut db: LinDatabase = LinDatabase::default();
        decode(&mut db, "Master: ECU, 10 ms, 0.1 ms");
        decode(&mut db, "Slaves: Door, Seat");

        let master = db.master().unwrap();
        assert_eq!(master.name, "ECU");
        assert_eq!(master.timebase_ms, 10);
        assert_eq!(master.jitter, 1);
        let names: Vec<&str> = db.slaves().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Door", "Seat"]);
    }

    #[test]
    fn test_decode_master_lenient() {
        assert_eq!(decode_master("ECU, 5 ms").unwrap().jitter, 0);
        assert_eq!(decode_master("ECU, 5 ms, 1.25 ms").unwrap().jitter, 13);
        assert!(decode_master("ECU").is_none());
        assert!(decode_master("ECU, fast").is_none());

        let mut db: LinDatabase = LinDatabase::default();
        decode(&mut db, "Master ECU 10 ms");
        assert!(db.master().is_none());
    }
}
