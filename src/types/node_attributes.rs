use serde::{Deserialize, Serialize};

use crate::types::version::LinVersion;

/// Default P2_min in milliseconds.
pub const DEFAULT_P2_MIN_MS: f64 = 50.0;
/// Default ST_min in milliseconds.
pub const DEFAULT_ST_MIN_MS: f64 = 0.0;
/// Default N_As_timeout / N_Cr_timeout in milliseconds.
pub const DEFAULT_N_TIMEOUT_MS: f64 = 1000.0;
/// NAD value meaning "not assigned".
pub const NAD_UNASSIGNED: u8 = 0xFF;

/// Per-slave diagnostic configuration (`Node_attributes` section).
///
/// Keyed by node name; every signal and frame reference is a name.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LinNodeAttributes {
    /// Slave node name.
    pub name: String,
    /// `LIN_protocol` of the slave. `None` if not declared.
    pub protocol: Option<LinVersion>,
    /// `configured_NAD`.
    pub configured_nad: u8,
    /// `initial_NAD` (optional).
    pub initial_nad: Option<u8>,
    /// `product_id` triple.
    pub product_id: ProductId,
    /// `response_error` signal name.
    pub response_error: Option<String>,
    /// `fault_state_signals` names.
    pub fault_state_signals: Vec<String>,
    pub p2_min_ms: f64,
    pub st_min_ms: f64,
    pub n_as_timeout_ms: f64,
    pub n_cr_timeout_ms: f64,
    /// `configurable_frames` entries, in declaration order.
    pub configurable_frames: Vec<ConfigurableFrame>,
}

impl Default for LinNodeAttributes {
    fn default() -> Self {
        LinNodeAttributes {
            name: String::new(),
            protocol: None,
            configured_nad: NAD_UNASSIGNED,
            initial_nad: None,
            product_id: ProductId::default(),
            response_error: None,
            fault_state_signals: Vec::new(),
            p2_min_ms: DEFAULT_P2_MIN_MS,
            st_min_ms: DEFAULT_ST_MIN_MS,
            n_as_timeout_ms: DEFAULT_N_TIMEOUT_MS,
            n_cr_timeout_ms: DEFAULT_N_TIMEOUT_MS,
            configurable_frames: Vec::new(),
        }
    }
}

/// `product_id = <supplier>, <function>, <variant>;`
#[derive(Default, Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ProductId {
    pub supplier_id: u16,
    pub function_id: u16,
    pub variant: u8,
}

/// Entry of a slave's `configurable_frames` block.
///
/// The explicit `id` is only used by LIN 2.0 files (`Frame = 0x12;`).
#[derive(Default, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ConfigurableFrame {
    pub name: String,
    pub id: Option<u8>,
}

impl ConfigurableFrame {
    pub fn new(name: &str, id: Option<u8>) -> ConfigurableFrame {
        ConfigurableFrame {
            name: name.to_string(),
            id,
        }
    }
}

impl LinNodeAttributes {
    /// Attributes for `name` with every field at its default.
    pub fn new(name: &str) -> LinNodeAttributes {
        LinNodeAttributes {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn add_configurable_frame(&mut self, frame: ConfigurableFrame) {
        self.configurable_frames.push(frame);
    }

    /// `true` if any signal reference (response error, fault state) names `signal`.
    pub fn uses_signal(&self, signal: &str) -> bool {
        self.response_error.as_deref() == Some(signal)
            || self.fault_state_signals.iter().any(|s| s == signal)
    }

    pub fn update_configurable_frame_names(&mut self, old_name: &str, new_name: &str) {
        for f in self
            .configurable_frames
            .iter_mut()
            .filter(|f| f.name == old_name)
        {
            f.name = new_name.to_string();
        }
    }

    pub fn delete_configurable_frames_by_name(&mut self, name: &str) {
        self.configurable_frames.retain(|f| f.name != name);
    }

    /// Renames signal references (response error and fault state signals).
    pub fn update_signal_name(&mut self, old_name: &str, new_name: &str) {
        if self.response_error.as_deref() == Some(old_name) {
            self.response_error = Some(new_name.to_string());
        }
        for s in self
            .fault_state_signals
            .iter_mut()
            .filter(|s| s.as_str() == old_name)
        {
            *s = new_name.to_string();
        }
    }

    /// Drops signal references (response error and fault state signals).
    pub fn delete_signal_references(&mut self, name: &str) {
        if self.response_error.as_deref() == Some(name) {
            self.response_error = None;
        }
        self.fault_state_signals.retain(|s| s != name);
    }

    /// Orders configurable frames by name.
    pub fn sort_configurable_frames(&mut self) {
        self.configurable_frames.sort_by(|a, b| a.name.cmp(&b.name));
    }
}
