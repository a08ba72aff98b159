use serde::{Deserialize, Serialize};

/// Represents a node (ECU) attached to the LIN cluster.
///
/// Slaves are plain named nodes; the master additionally carries the
/// scheduling time base and jitter (see [`LinMasterNode`]).
///
/// # Example
/// ```
/// use lin_tools::LinNode;
///
/// let node = LinNode::new("Door");
/// assert_eq!(node.name, "Door");
/// ```
#[derive(Default, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LinNode {
    pub name: String,
}

impl LinNode {
    pub fn new(name: &str) -> LinNode {
        LinNode {
            name: name.to_string(),
        }
    }
}

/// Master node of the cluster (`Master: <name>, <time base> ms, <jitter> ms;`).
#[derive(Default, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LinMasterNode {
    /// Node name.
    pub name: String,
    /// Time base in milliseconds.
    pub timebase_ms: u16,
    /// Jitter in tenths of a millisecond (`0.1 ms` is stored as `1`).
    pub jitter: u16,
}

impl LinMasterNode {
    pub fn new(name: &str, timebase_ms: u16, jitter: u16) -> LinMasterNode {
        LinMasterNode {
            name: name.to_string(),
            timebase_ms,
            jitter,
        }
    }

    /// Jitter expressed in milliseconds.
    pub fn jitter_ms(&self) -> f64 {
        f64::from(self.jitter) / 10.0
    }

    /// Formats the jitter with its single decimal digit, as written in LDF text (`0.1`).
    pub fn jitter_text(&self) -> String {
        format!("{}.{}", self.jitter / 10, self.jitter % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter() {
        let master: LinMasterNode = LinMasterNode::new("ECU", 10, 15);
        assert_eq!(master.jitter_text(), "1.5");
        assert!((master.jitter_ms() - 1.5).abs() < f64::EPSILON);
        assert_eq!(LinMasterNode::new("ECU", 5, 1).jitter_text(), "0.1");
    }
}
