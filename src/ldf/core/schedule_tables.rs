use log::warn;

use crate::ldf::core::tokens;
use crate::types::schedule::{ScheduleCommand, ScheduleEntry};

/// Decode a schedule table slot.
/// Examples:
/// - `DoorFrame delay 10 ms`
/// - `MasterReq delay 20 ms`
/// - `AssignNAD { Door } delay 15 ms`
/// - `DataDump { Door, 0x01, 0x02, 0x03, 0x04, 0x05 } delay 20 ms`
///
/// Returns `None` for unknown keywords and malformed arguments.
pub(crate) fn decode(line: &str) -> Option<ScheduleEntry> {
    let line: &str = line.trim();
    let (command, tail): (Option<ScheduleCommand>, &str) =
        match (line.find('{'), line.rfind('}')) {
            (Some(open), Some(close)) if open < close => (
                decode_braced(line[..open].trim(), &line[open + 1..close]),
                &line[close + 1..],
            ),
            _ => {
                let (head, tail) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
                (decode_plain(head), tail)
            }
        };

    let Some(command) = command else {
        warn!("dropping schedule command '{line}'");
        return None;
    };
    let Some(delay_ms) = decode_delay(tail) else {
        warn!("dropping schedule command '{line}': unreadable delay");
        return None;
    };
    Some(ScheduleEntry::new(command, delay_ms))
}

fn decode_plain(head: &str) -> Option<ScheduleCommand> {
    match head {
        "MasterReq" => Some(ScheduleCommand::MasterReq),
        "SlaveResp" => Some(ScheduleCommand::SlaveResp),
        frame if tokens::is_identifier(frame) => Some(ScheduleCommand::UnconditionalFrame {
            frame: frame.to_string(),
        }),
        _ => None,
    }
}

fn decode_braced(keyword: &str, args: &str) -> Option<ScheduleCommand> {
    let args: Vec<&str> = args
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .collect();
    let slave = || -> Option<String> {
        args.first()
            .filter(|s| tokens::is_identifier(s))
            .map(|s| s.to_string())
    };

    match keyword {
        "AssignNAD" if args.len() == 1 => Some(ScheduleCommand::AssignNad { slave: slave()? }),
        "SaveConfiguration" if args.len() == 1 => {
            Some(ScheduleCommand::SaveConfiguration { slave: slave()? })
        }
        "DataDump" if args.len() == 6 => Some(ScheduleCommand::DataDump {
            slave: slave()?,
            data: bytes::<5>(&args[1..])?,
        }),
        "FreeFormat" if args.len() == 8 => Some(ScheduleCommand::FreeFormat {
            data: bytes::<8>(&args)?,
        }),
        "AssignFrameIdRange" if args.len() == 2 || args.len() == 6 => {
            Some(ScheduleCommand::AssignFrameIdRange {
                slave: slave()?,
                start_index: tokens::parse_u8(args[1])?,
                pids: match args.len() {
                    6 => Some(bytes::<4>(&args[2..])?),
                    _ => None,
                },
            })
        }
        "AssignFrameId" if args.len() == 2 && tokens::is_identifier(args[1]) => {
            Some(ScheduleCommand::AssignFrameId {
                slave: slave()?,
                frame: args[1].to_string(),
            })
        }
        _ => None,
    }
}

/// Reads exactly `N` bytes.
fn bytes<const N: usize>(args: &[&str]) -> Option<[u8; N]> {
    let mut out: [u8; N] = [0; N];
    if args.len() != N {
        return None;
    }
    for (slot, arg) in out.iter_mut().zip(args) {
        *slot = tokens::parse_u8(arg)?;
    }
    Some(out)
}

/// `delay <t> ms`; a missing delay reads as 0 ms.
fn decode_delay(tail: &str) -> Option<f64> {
    let tail: &str = tail.trim();
    if tail.is_empty() {
        return Some(0.0);
    }
    let value: &str = tail.strip_prefix("delay")?;
    tokens::parse_f64(tokens::strip_unit(value, "ms")).filter(|v| *v >= 0.0)
}
