//! LinDatabase model.
//!
//! This module defines the in-memory **LIN cluster description** built by the LDF parser.
//! Every entity kind lives in its own ordered `Vec` owned by [`LinDatabase`];
//! entities refer to each other **by name only**, so the database is the single owner.
//!
//! Add/update/delete operations keep those name references consistent:
//! - renaming or deleting a node reaches signals, frames, schedule commands and node attributes;
//! - renaming or deleting a signal reaches frame entries, response-error/fault-state references
//!   and signal representations;
//! - renaming or deleting a frame reaches configurable frames and schedule commands.
//!
//! Operations that reference an unknown name return a [`DatabaseError`] and leave the
//! database unchanged.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::types::{
    encoding::{EncodingSignalGroup, LinEncodingType},
    errors::DatabaseError,
    frame::LinFrame,
    node::{LinMasterNode, LinNode},
    node_attributes::LinNodeAttributes,
    schedule::LinScheduleTable,
    signal::LinSignal,
    validation::ValidationMessage,
    version::LinVersion,
};

/// In-memory representation of a LIN Description File.
///
/// Holds the header directives (protocol/language version, bus speed), the master and
/// slave nodes, signals, frames, node attributes, schedule tables and signal encodings,
/// plus the messages of the last validation run.
#[derive(Default, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct LinDatabase {
    // --- General information ---
    /// `LIN_description_file;` was found.
    pub is_lin_description_file: bool,
    /// `LIN_protocol_version`.
    pub protocol_version: Option<LinVersion>,
    /// `LIN_language_version`.
    pub language_version: Option<LinVersion>,
    /// Bus speed in bit/s (`LIN_speed = 19.2 kbps;` is stored as `19200`).
    pub speed: u32,
    /// `Channel_name` (LIN 2.1, optional).
    pub channel_name: Option<String>,

    // --- Nodes ---
    pub master: Option<LinMasterNode>,
    pub slaves: Vec<LinNode>,

    // --- Main storage ---
    pub signals: Vec<LinSignal>,
    pub frames: Vec<LinFrame>,
    pub node_attributes: Vec<LinNodeAttributes>,
    pub schedule_tables: Vec<LinScheduleTable>,
    pub encoding_types: Vec<LinEncodingType>,
    pub encoding_signals: Vec<EncodingSignalGroup>,

    // --- Last validation run ---
    #[serde(skip)]
    pub(crate) validation_messages: Vec<ValidationMessage>,
}

impl LinDatabase {
    /// Empty database flagged as a LIN description file, ready to be filled through the API.
    pub fn new() -> LinDatabase {
        LinDatabase {
            is_lin_description_file: true,
            ..Default::default()
        }
    }

    /// Clear the database
    pub fn clear(&mut self) {
        *self = LinDatabase::default();
    }

    /// Bus speed in kbit/s.
    pub fn speed_kbps(&self) -> f64 {
        f64::from(self.speed) / 1000.0
    }

    /// Sets the bus speed from a kbit/s value (`19.2` → `19200` bit/s).
    pub fn set_speed_kbps(&mut self, kbps: f64) {
        self.speed = (kbps * 1000.0).round().max(0.0) as u32;
    }

    /// Messages of the last [`validate`](LinDatabase::validate) run.
    pub fn validation_messages(&self) -> &[ValidationMessage] {
        &self.validation_messages
    }

    /// `true` if `name` is the master or one of the slaves.
    pub fn is_known_node(&self, name: &str) -> bool {
        self.master.as_ref().is_some_and(|m| m.name == name) || self.is_slave(name)
    }

    /// `true` if `name` is one of the slaves.
    pub fn is_slave(&self, name: &str) -> bool {
        self.slaves.iter().any(|s| s.name == name)
    }

    // --------- Master node --------
    pub fn master(&self) -> Option<&LinMasterNode> {
        self.master.as_ref()
    }

    /// Sets or replaces the master node.
    ///
    /// When a master already exists under another name, every reference to the old
    /// name is renamed.
    pub fn update_master(&mut self, master: LinMasterNode) -> Result<(), DatabaseError> {
        if self.is_slave(&master.name) {
            return Err(DatabaseError::NodeAlreadyExists { name: master.name });
        }
        let old_name: Option<String> = self.master.as_ref().map(|m| m.name.clone());
        let new_name: String = master.name.clone();
        if let Some(old) = &old_name {
            self.check_node_attributes_rename(old, &new_name)?;
        }
        self.master = Some(master);

        if let Some(old) = old_name
            && old != new_name
        {
            debug!("renaming master node '{old}' to '{new_name}'");
            self.rename_node_references(&old, &new_name);
        }
        Ok(())
    }

    /// Removes the master node together with every signal and frame that uses it.
    pub fn delete_master(&mut self) -> Result<(), DatabaseError> {
        let master: LinMasterNode = self.master.take().ok_or(DatabaseError::MasterMissing)?;
        self.delete_node_cascade(&master.name);
        Ok(())
    }

    // --------- Slave nodes --------
    pub fn slaves(&self) -> impl Iterator<Item = &LinNode> + '_ {
        self.slaves.iter()
    }

    pub fn slave_count(&self) -> usize {
        self.slaves.len()
    }

    pub fn get_slave_by_index(&self, index: usize) -> Option<&LinNode> {
        self.slaves.get(index)
    }

    pub fn get_slave_by_name(&self, name: &str) -> Option<&LinNode> {
        self.slaves.iter().find(|s| s.name == name)
    }

    /// Adds a slave node. Node names are unique across master and slaves.
    pub fn add_slave(&mut self, node: LinNode) -> Result<(), DatabaseError> {
        if self.is_known_node(&node.name) {
            return Err(DatabaseError::NodeAlreadyExists { name: node.name });
        }
        self.slaves.push(node);
        Ok(())
    }

    /// Adds a slave node together with its node attributes.
    pub fn add_slave_with_attributes(
        &mut self,
        attributes: LinNodeAttributes,
    ) -> Result<(), DatabaseError> {
        if self.get_node_attributes_by_name(&attributes.name).is_some() {
            return Err(DatabaseError::NodeAttributesAlreadyExist {
                name: attributes.name,
            });
        }
        self.add_slave(LinNode::new(&attributes.name))?;
        self.node_attributes.push(attributes);
        Ok(())
    }

    /// Replaces the slave called `old_name`; a new name is propagated to every reference.
    pub fn update_slave(&mut self, old_name: &str, node: LinNode) -> Result<(), DatabaseError> {
        let index: usize = self
            .slaves
            .iter()
            .position(|s| s.name == old_name)
            .ok_or_else(|| DatabaseError::NodeNotFound {
                name: old_name.to_string(),
            })?;
        if node.name != old_name && self.is_known_node(&node.name) {
            return Err(DatabaseError::NodeAlreadyExists { name: node.name });
        }
        self.check_node_attributes_rename(old_name, &node.name)?;

        let new_name: String = node.name.clone();
        self.slaves[index] = node;
        if new_name != old_name {
            debug!("renaming slave node '{old_name}' to '{new_name}'");
            self.rename_node_references(old_name, &new_name);
        }
        Ok(())
    }

    /// Deletes a slave and everything that depends on it: its node attributes, every
    /// signal it publishes or subscribes, every frame it publishes and every schedule
    /// command targeting it.
    pub fn delete_slave(&mut self, name: &str) -> Result<(), DatabaseError> {
        let index: usize = self
            .slaves
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| DatabaseError::NodeNotFound {
                name: name.to_string(),
            })?;
        self.slaves.remove(index);
        self.node_attributes.retain(|a| a.name != name);
        self.delete_node_cascade(name);
        Ok(())
    }

    // --------- Node attributes --------
    pub fn node_attributes(&self) -> impl Iterator<Item = &LinNodeAttributes> + '_ {
        self.node_attributes.iter()
    }

    pub fn get_node_attributes_by_index(&self, index: usize) -> Option<&LinNodeAttributes> {
        self.node_attributes.get(index)
    }

    pub fn get_node_attributes_by_name(&self, name: &str) -> Option<&LinNodeAttributes> {
        self.node_attributes.iter().find(|a| a.name == name)
    }

    pub fn add_node_attributes(
        &mut self,
        attributes: LinNodeAttributes,
    ) -> Result<(), DatabaseError> {
        if self.get_node_attributes_by_name(&attributes.name).is_some() {
            return Err(DatabaseError::NodeAttributesAlreadyExist {
                name: attributes.name,
            });
        }
        self.node_attributes.push(attributes);
        Ok(())
    }

    /// Replaces the node attributes of `old_name`.
    ///
    /// When the new attributes carry another name and `old_name` is a slave, the slave
    /// is renamed as well, cascading to every reference.
    pub fn update_node_attributes(
        &mut self,
        old_name: &str,
        attributes: LinNodeAttributes,
    ) -> Result<(), DatabaseError> {
        let index: usize = self
            .node_attributes
            .iter()
            .position(|a| a.name == old_name)
            .ok_or_else(|| DatabaseError::NodeAttributesNotFound {
                name: old_name.to_string(),
            })?;
        let new_name: String = attributes.name.clone();
        if new_name != old_name {
            if self.get_node_attributes_by_name(&new_name).is_some() {
                return Err(DatabaseError::NodeAttributesAlreadyExist { name: new_name });
            }
            if self.is_slave(old_name) {
                self.update_slave(old_name, LinNode::new(&new_name))?;
            }
        }
        self.node_attributes[index] = attributes;
        Ok(())
    }

    pub fn delete_node_attributes(&mut self, name: &str) -> Result<(), DatabaseError> {
        let index: usize = self
            .node_attributes
            .iter()
            .position(|a| a.name == name)
            .ok_or_else(|| DatabaseError::NodeAttributesNotFound {
                name: name.to_string(),
            })?;
        self.node_attributes.remove(index);
        Ok(())
    }

    // -------------- Signals ------------
    pub fn signals(&self) -> impl Iterator<Item = &LinSignal> + '_ {
        self.signals.iter()
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn get_signal_by_index(&self, index: usize) -> Option<&LinSignal> {
        self.signals.get(index)
    }

    pub fn get_signal_by_name(&self, name: &str) -> Option<&LinSignal> {
        self.signals.iter().find(|s| s.name == name)
    }

    pub fn add_signal(&mut self, signal: LinSignal) -> Result<(), DatabaseError> {
        if self.get_signal_by_name(&signal.name).is_some() {
            return Err(DatabaseError::SignalAlreadyExists { name: signal.name });
        }
        self.signals.push(signal);
        Ok(())
    }

    /// Replaces the signal called `old_name`; a new name is propagated to frames,
    /// node attributes and signal representations.
    pub fn update_signal(&mut self, old_name: &str, signal: LinSignal) -> Result<(), DatabaseError> {
        let index: usize = self
            .signals
            .iter()
            .position(|s| s.name == old_name)
            .ok_or_else(|| DatabaseError::SignalNotFound {
                name: old_name.to_string(),
            })?;
        if signal.name != old_name && self.get_signal_by_name(&signal.name).is_some() {
            return Err(DatabaseError::SignalAlreadyExists { name: signal.name });
        }

        let new_name: String = signal.name.clone();
        self.signals[index] = signal;
        if new_name != old_name {
            debug!("renaming signal '{old_name}' to '{new_name}'");
            for f in &mut self.frames {
                f.update_signal_name(old_name, &new_name);
            }
            for a in &mut self.node_attributes {
                a.update_signal_name(old_name, &new_name);
            }
            for g in &mut self.encoding_signals {
                g.update_signal_name(old_name, &new_name);
            }
        }
        Ok(())
    }

    /// Deletes a signal and every reference to it.
    pub fn delete_signal(&mut self, name: &str) -> Result<(), DatabaseError> {
        let index: usize = self
            .signals
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| DatabaseError::SignalNotFound {
                name: name.to_string(),
            })?;
        self.signals.remove(index);
        self.remove_signal_references(name);
        Ok(())
    }

    // ------------- Frames ------------
    pub fn frames(&self) -> impl Iterator<Item = &LinFrame> + '_ {
        self.frames.iter()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn get_frame_by_index(&self, index: usize) -> Option<&LinFrame> {
        self.frames.get(index)
    }

    pub fn get_frame_by_name(&self, name: &str) -> Option<&LinFrame> {
        self.frames.iter().find(|f| f.name == name)
    }

    pub fn get_frame_by_id(&self, id: u8) -> Option<&LinFrame> {
        self.frames.iter().find(|f| f.id == id)
    }

    /// Looks a frame up by its protected identifier (id + parity bits).
    pub fn get_frame_by_pid(&self, pid: u8) -> Option<&LinFrame> {
        self.frames.iter().find(|f| f.pid() == pid)
    }

    /// Adds a frame. Frame names and ids are unique.
    pub fn add_frame(&mut self, frame: LinFrame) -> Result<(), DatabaseError> {
        if self.get_frame_by_name(&frame.name).is_some() {
            return Err(DatabaseError::FrameAlreadyExists { name: frame.name });
        }
        if let Some(other) = self.get_frame_by_id(frame.id) {
            return Err(DatabaseError::FrameIdAlreadyAssigned {
                id: frame.id,
                name: other.name.clone(),
            });
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Replaces the frame called `old_name`; a new name is propagated to configurable
    /// frames and schedule commands.
    pub fn update_frame(&mut self, old_name: &str, frame: LinFrame) -> Result<(), DatabaseError> {
        let index: usize = self
            .frames
            .iter()
            .position(|f| f.name == old_name)
            .ok_or_else(|| DatabaseError::FrameNotFound {
                name: old_name.to_string(),
            })?;
        if frame.name != old_name && self.get_frame_by_name(&frame.name).is_some() {
            return Err(DatabaseError::FrameAlreadyExists { name: frame.name });
        }
        if let Some(other) = self
            .frames
            .iter()
            .enumerate()
            .find(|(i, f)| *i != index && f.id == frame.id)
            .map(|(_, f)| f)
        {
            return Err(DatabaseError::FrameIdAlreadyAssigned {
                id: frame.id,
                name: other.name.clone(),
            });
        }

        let new_name: String = frame.name.clone();
        self.frames[index] = frame;
        if new_name != old_name {
            debug!("renaming frame '{old_name}' to '{new_name}'");
            for a in &mut self.node_attributes {
                a.update_configurable_frame_names(old_name, &new_name);
            }
            for t in &mut self.schedule_tables {
                t.update_commands_frame_name(old_name, &new_name);
            }
        }
        Ok(())
    }

    /// Deletes a frame, its configurable-frame entries and the schedule commands using it.
    pub fn delete_frame(&mut self, name: &str) -> Result<(), DatabaseError> {
        let index: usize = self
            .frames
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| DatabaseError::FrameNotFound {
                name: name.to_string(),
            })?;
        self.frames.remove(index);
        self.remove_frame_references(name);
        Ok(())
    }

    // ------------- Schedule tables ------------
    pub fn schedule_tables(&self) -> impl Iterator<Item = &LinScheduleTable> + '_ {
        self.schedule_tables.iter()
    }

    pub fn schedule_table_count(&self) -> usize {
        self.schedule_tables.len()
    }

    pub fn get_schedule_table_by_index(&self, index: usize) -> Option<&LinScheduleTable> {
        self.schedule_tables.get(index)
    }

    pub fn get_schedule_table_by_name(&self, name: &str) -> Option<&LinScheduleTable> {
        self.schedule_tables.iter().find(|t| t.name == name)
    }

    pub fn add_schedule_table(&mut self, table: LinScheduleTable) -> Result<(), DatabaseError> {
        if self.get_schedule_table_by_name(&table.name).is_some() {
            return Err(DatabaseError::ScheduleTableAlreadyExists { name: table.name });
        }
        self.schedule_tables.push(table);
        Ok(())
    }

    pub fn update_schedule_table(
        &mut self,
        old_name: &str,
        table: LinScheduleTable,
    ) -> Result<(), DatabaseError> {
        let index: usize = self
            .schedule_tables
            .iter()
            .position(|t| t.name == old_name)
            .ok_or_else(|| DatabaseError::ScheduleTableNotFound {
                name: old_name.to_string(),
            })?;
        if table.name != old_name && self.get_schedule_table_by_name(&table.name).is_some() {
            return Err(DatabaseError::ScheduleTableAlreadyExists { name: table.name });
        }
        self.schedule_tables[index] = table;
        Ok(())
    }

    pub fn delete_schedule_table(&mut self, name: &str) -> Result<(), DatabaseError> {
        let index: usize = self
            .schedule_tables
            .iter()
            .position(|t| t.name == name)
            .ok_or_else(|| DatabaseError::ScheduleTableNotFound {
                name: name.to_string(),
            })?;
        self.schedule_tables.remove(index);
        Ok(())
    }

    // ------------- Signal encodings ------------
    pub fn encoding_types(&self) -> impl Iterator<Item = &LinEncodingType> + '_ {
        self.encoding_types.iter()
    }

    pub fn get_encoding_type_by_name(&self, name: &str) -> Option<&LinEncodingType> {
        self.encoding_types.iter().find(|e| e.name == name)
    }

    pub fn add_encoding_type(&mut self, encoding: LinEncodingType) -> Result<(), DatabaseError> {
        if self.get_encoding_type_by_name(&encoding.name).is_some() {
            return Err(DatabaseError::EncodingTypeAlreadyExists {
                name: encoding.name,
            });
        }
        self.encoding_types.push(encoding);
        Ok(())
    }

    /// Replaces an encoding type; a new name is propagated to its signal representation.
    pub fn update_encoding_type(
        &mut self,
        old_name: &str,
        encoding: LinEncodingType,
    ) -> Result<(), DatabaseError> {
        let index: usize = self
            .encoding_types
            .iter()
            .position(|e| e.name == old_name)
            .ok_or_else(|| DatabaseError::EncodingTypeNotFound {
                name: old_name.to_string(),
            })?;
        if encoding.name != old_name {
            if self.get_encoding_type_by_name(&encoding.name).is_some() {
                return Err(DatabaseError::EncodingTypeAlreadyExists {
                    name: encoding.name,
                });
            }
            if self.get_encoding_signal_group_by_name(old_name).is_some()
                && self.get_encoding_signal_group_by_name(&encoding.name).is_some()
            {
                return Err(DatabaseError::EncodingSignalGroupAlreadyExists {
                    name: encoding.name,
                });
            }
        }
        let new_name: String = encoding.name.clone();
        self.encoding_types[index] = encoding;
        for g in self.encoding_signals.iter_mut().filter(|g| g.name == old_name) {
            g.name = new_name.clone();
        }
        Ok(())
    }

    /// Deletes an encoding type and its signal representation.
    pub fn delete_encoding_type(&mut self, name: &str) -> Result<(), DatabaseError> {
        let index: usize = self
            .encoding_types
            .iter()
            .position(|e| e.name == name)
            .ok_or_else(|| DatabaseError::EncodingTypeNotFound {
                name: name.to_string(),
            })?;
        self.encoding_types.remove(index);
        self.encoding_signals.retain(|g| g.name != name);
        Ok(())
    }

    pub fn encoding_signals(&self) -> impl Iterator<Item = &EncodingSignalGroup> + '_ {
        self.encoding_signals.iter()
    }

    pub fn get_encoding_signal_group_by_name(&self, name: &str) -> Option<&EncodingSignalGroup> {
        self.encoding_signals.iter().find(|g| g.name == name)
    }

    pub fn add_encoding_signal_group(
        &mut self,
        group: EncodingSignalGroup,
    ) -> Result<(), DatabaseError> {
        if self.get_encoding_signal_group_by_name(&group.name).is_some() {
            return Err(DatabaseError::EncodingSignalGroupAlreadyExists { name: group.name });
        }
        self.encoding_signals.push(group);
        Ok(())
    }

    pub fn update_encoding_signal_group(
        &mut self,
        old_name: &str,
        group: EncodingSignalGroup,
    ) -> Result<(), DatabaseError> {
        let index: usize = self
            .encoding_signals
            .iter()
            .position(|g| g.name == old_name)
            .ok_or_else(|| DatabaseError::EncodingSignalGroupNotFound {
                name: old_name.to_string(),
            })?;
        if group.name != old_name && self.get_encoding_signal_group_by_name(&group.name).is_some()
        {
            return Err(DatabaseError::EncodingSignalGroupAlreadyExists { name: group.name });
        }
        self.encoding_signals[index] = group;
        Ok(())
    }

    pub fn delete_encoding_signal_group(&mut self, name: &str) -> Result<(), DatabaseError> {
        let index: usize = self
            .encoding_signals
            .iter()
            .position(|g| g.name == name)
            .ok_or_else(|| DatabaseError::EncodingSignalGroupNotFound {
                name: name.to_string(),
            })?;
        self.encoding_signals.remove(index);
        Ok(())
    }

    // -------------- Sorting ---------------
    /// Orders the database for presentation:
    /// - signals by publisher, then name;
    /// - frames by publisher, then id;
    /// - frame signal entries by offset;
    /// - configurable frames by name.
    pub fn sort_data(&mut self) {
        self.signals.sort_by(|a, b| {
            a.publisher
                .cmp(&b.publisher)
                .then_with(|| a.name.cmp(&b.name))
        });
        self.frames
            .sort_by(|a, b| a.publisher.cmp(&b.publisher).then(a.id.cmp(&b.id)));
        for f in &mut self.frames {
            f.sort_signals();
        }
        for a in &mut self.node_attributes {
            a.sort_configurable_frames();
        }
    }

    // -------------- Cascades ---------------
    /// A node rename must not carry its attributes onto attributes already
    /// stored under the new name.
    fn check_node_attributes_rename(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> Result<(), DatabaseError> {
        if old_name != new_name
            && self.get_node_attributes_by_name(old_name).is_some()
            && self.get_node_attributes_by_name(new_name).is_some()
        {
            return Err(DatabaseError::NodeAttributesAlreadyExist {
                name: new_name.to_string(),
            });
        }
        Ok(())
    }

    fn rename_node_references(&mut self, old_name: &str, new_name: &str) {
        for s in &mut self.signals {
            s.update_node_name(old_name, new_name);
        }
        for f in &mut self.frames {
            f.update_node_name(old_name, new_name);
        }
        for t in &mut self.schedule_tables {
            t.update_commands_slave_name(old_name, new_name);
        }
        for a in self
            .node_attributes
            .iter_mut()
            .filter(|a| a.name == old_name)
        {
            a.name = new_name.to_string();
        }
    }

    /// Drops signals and frames using the node, then every reference left dangling.
    fn delete_node_cascade(&mut self, name: &str) {
        let doomed_signals: Vec<String> = self
            .signals
            .iter()
            .filter(|s| s.uses_node(name))
            .map(|s| s.name.clone())
            .collect();
        let doomed_frames: Vec<String> = self
            .frames
            .iter()
            .filter(|f| f.publisher == name)
            .map(|f| f.name.clone())
            .collect();

        if !doomed_signals.is_empty() || !doomed_frames.is_empty() {
            warn!(
                "deleting node '{name}' removes {} signal(s) and {} frame(s)",
                doomed_signals.len(),
                doomed_frames.len()
            );
        }

        self.signals.retain(|s| !s.uses_node(name));
        self.frames.retain(|f| f.publisher != name);
        for t in &mut self.schedule_tables {
            t.delete_commands_by_slave_name(name);
        }
        for sig in &doomed_signals {
            self.remove_signal_references(sig);
        }
        for frame in &doomed_frames {
            self.remove_frame_references(frame);
        }
    }

    fn remove_signal_references(&mut self, name: &str) {
        for f in &mut self.frames {
            f.delete_signal_by_name(name);
        }
        for a in &mut self.node_attributes {
            a.delete_signal_references(name);
        }
        for g in &mut self.encoding_signals {
            g.delete_signal_by_name(name);
        }
    }

    fn remove_frame_references(&mut self, name: &str) {
        for a in &mut self.node_attributes {
            a.delete_configurable_frames_by_name(name);
        }
        for t in &mut self.schedule_tables {
            t.delete_commands_by_frame_name(name);
        }
    }
}
