use log::debug;

use crate::types::{
    database::LinDatabase,
    frame::LinFrame,
    validation::{ValidationCode, ValidationMessage},
};

impl LinDatabase {
    /// Runs every consistency check and stores the resulting messages
    /// (see [`validation_messages`](LinDatabase::validation_messages)).
    ///
    /// Checks, in order:
    /// - header: `LIN_description_file`, protocol and language versions, speed;
    /// - master and at least one slave, node names unique;
    /// - signals: publisher/subscribers declared, names unique;
    /// - frames: publisher declared, names and ids unique, packed signals declared,
    ///   inside the payload and not overlapping;
    /// - node attributes: protocol set, node is a slave, entries unique, signal and
    ///   configurable frame references resolve;
    /// - schedule tables: names unique, frame and slave references resolve;
    /// - signal representations: unique, encoding type and signals declared.
    ///
    /// Returns `true` when no message was produced. Running it twice on an unchanged
    /// database yields the same messages.
    pub fn validate(&mut self) -> bool {
        self.validation_messages = self.check();
        debug!("validation produced {} message(s)", self.validation_messages.len());
        self.validation_messages.is_empty()
    }

    /// Computes the validation messages without storing them.
    pub fn check(&self) -> Vec<ValidationMessage> {
        let mut out: Vec<ValidationMessage> = Vec::new();
        self.check_header(&mut out);
        self.check_signals(&mut out);
        self.check_frames(&mut out);
        self.check_node_attributes(&mut out);
        self.check_schedule_tables(&mut out);
        self.check_encodings(&mut out);
        out
    }

    fn check_header(&self, out: &mut Vec<ValidationMessage>) {
        if !self.is_lin_description_file {
            out.push(ValidationMessage::error(
                ValidationCode::NotLinDescriptionFile,
                "",
                "Not a LIN description file".to_string(),
            ));
        }
        if self.protocol_version.is_none() {
            out.push(ValidationMessage::error(
                ValidationCode::ProtocolVersionMissing,
                "",
                "Protocol version not supported".to_string(),
            ));
        }
        if self.language_version.is_none() {
            out.push(ValidationMessage::error(
                ValidationCode::LanguageVersionMissing,
                "",
                "Language version not supported".to_string(),
            ));
        }
        if self.speed == 0 {
            out.push(ValidationMessage::error(
                ValidationCode::SpeedMissing,
                "",
                "LIN speed not defined".to_string(),
            ));
        }
        if self.master.is_none() {
            out.push(ValidationMessage::error(
                ValidationCode::MasterMissing,
                "",
                "LIN master not found in database".to_string(),
            ));
        }
        if self.slaves.is_empty() {
            out.push(ValidationMessage::error(
                ValidationCode::SlavesMissing,
                "",
                "LIN slaves not found in database".to_string(),
            ));
        }

        let nodes: Vec<&str> = self
            .master
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.slaves.iter().map(|s| s.name.as_str()))
            .collect();
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                if a == b {
                    out.push(ValidationMessage::error(
                        ValidationCode::NodeDuplicated,
                        a,
                        format!("Node '{a}' defined twice"),
                    ));
                }
            }
        }
    }

    fn check_signals(&self, out: &mut Vec<ValidationMessage>) {
        for sig in &self.signals {
            if !self.is_known_node(&sig.publisher) {
                out.push(ValidationMessage::error(
                    ValidationCode::SignalPublisherUnknown,
                    &sig.name,
                    format!(
                        "Signal '{}' publisher '{}' not defined",
                        sig.name, sig.publisher
                    ),
                ));
            }
            for sub in sig.subscribers.iter().filter(|s| !self.is_known_node(s)) {
                out.push(ValidationMessage::error(
                    ValidationCode::SignalSubscriberUnknown,
                    &sig.name,
                    format!("Signal '{}' subscriber '{}' not defined", sig.name, sub),
                ));
            }
        }

        for (i, a) in self.signals.iter().enumerate() {
            for b in &self.signals[i + 1..] {
                if a.name == b.name {
                    out.push(ValidationMessage::error(
                        ValidationCode::SignalDuplicated,
                        &a.name,
                        format!("Signal '{}' defined twice", a.name),
                    ));
                }
            }
        }
    }

    fn check_frames(&self, out: &mut Vec<ValidationMessage>) {
        for (i, frame) in self.frames.iter().enumerate() {
            if !self.is_known_node(&frame.publisher) {
                out.push(ValidationMessage::error(
                    ValidationCode::FramePublisherUnknown,
                    &frame.name,
                    format!(
                        "Frame '{}' publisher '{}' not defined",
                        frame.name, frame.publisher
                    ),
                ));
            }
            for other in &self.frames[i + 1..] {
                if frame.name == other.name {
                    out.push(ValidationMessage::error(
                        ValidationCode::FrameDuplicatedName,
                        &frame.name,
                        format!("Frame '{}' defined twice", frame.name),
                    ));
                }
                if frame.id == other.id {
                    out.push(ValidationMessage::error(
                        ValidationCode::FrameDuplicatedId,
                        &frame.name,
                        format!(
                            "Frames '{}' and '{}' share ID {}",
                            frame.name, other.name, frame.id
                        ),
                    ));
                }
            }
            self.check_frame_layout(frame, out);
        }
    }

    /// Every packed signal must be declared, end inside the payload and not
    /// share bits with another packed signal.
    fn check_frame_layout(&self, frame: &LinFrame, out: &mut Vec<ValidationMessage>) {
        // (name, first bit, one past last bit)
        let mut ranges: Vec<(&str, u32, u32)> = Vec::with_capacity(frame.signals.len());
        for entry in &frame.signals {
            let Some(sig) = self.get_signal_by_name(&entry.name) else {
                out.push(ValidationMessage::error(
                    ValidationCode::FrameSignalUnknown,
                    &frame.name,
                    format!(
                        "Frame '{}' signal '{}' not defined",
                        frame.name, entry.name
                    ),
                ));
                continue;
            };
            let start: u32 = u32::from(entry.offset);
            let end: u32 = start + u32::from(sig.bit_size);
            if end > frame.bit_capacity() {
                out.push(ValidationMessage::error(
                    ValidationCode::FrameSignalOutOfBounds,
                    &frame.name,
                    format!(
                        "Frame '{}' signal '{}' (bits {}..{}) exceeds the frame size of {} byte(s)",
                        frame.name, entry.name, start, end, frame.size
                    ),
                ));
            }
            ranges.push((entry.name.as_str(), start, end));
        }

        for (i, (a_name, a_start, a_end)) in ranges.iter().enumerate() {
            for (b_name, b_start, b_end) in &ranges[i + 1..] {
                if a_start < b_end && b_start < a_end {
                    out.push(ValidationMessage::error(
                        ValidationCode::FrameSignalOverlap,
                        &frame.name,
                        format!(
                            "Frame '{}' signals '{}' and '{}' overlap",
                            frame.name, a_name, b_name
                        ),
                    ));
                }
            }
        }
    }

    fn check_node_attributes(&self, out: &mut Vec<ValidationMessage>) {
        for (i, attrs) in self.node_attributes.iter().enumerate() {
            if attrs.protocol.is_none() {
                out.push(ValidationMessage::error(
                    ValidationCode::NodeAttributesProtocolMissing,
                    &attrs.name,
                    format!("Node_attributes '{}' protocol not defined", attrs.name),
                ));
            }
            if !self.is_slave(&attrs.name) {
                out.push(ValidationMessage::error(
                    ValidationCode::NodeAttributesNodeUnknown,
                    &attrs.name,
                    format!(
                        "Node_attributes '{}' node not defined in database's slaves",
                        attrs.name
                    ),
                ));
            }
            for other in &self.node_attributes[i + 1..] {
                if attrs.name == other.name {
                    out.push(ValidationMessage::error(
                        ValidationCode::NodeAttributesDuplicated,
                        &attrs.name,
                        format!("Node_attributes '{}' node defined twice", attrs.name),
                    ));
                }
            }

            let signal_refs = attrs
                .response_error
                .iter()
                .chain(attrs.fault_state_signals.iter());
            for sig in signal_refs.filter(|s| self.get_signal_by_name(s).is_none()) {
                out.push(ValidationMessage::error(
                    ValidationCode::NodeAttributesSignalUnknown,
                    &attrs.name,
                    format!(
                        "Node_attributes '{}' signal '{}' not defined",
                        attrs.name, sig
                    ),
                ));
            }

            for (j, frame) in attrs.configurable_frames.iter().enumerate() {
                if self.get_frame_by_name(&frame.name).is_none() {
                    out.push(ValidationMessage::error(
                        ValidationCode::ConfigurableFrameUnknown,
                        &attrs.name,
                        format!(
                            "Node_attributes '{}' configurable frame '{}' not defined",
                            attrs.name, frame.name
                        ),
                    ));
                }
                for other in &attrs.configurable_frames[j + 1..] {
                    if frame.name == other.name {
                        out.push(ValidationMessage::error(
                            ValidationCode::ConfigurableFrameDuplicated,
                            &attrs.name,
                            format!(
                                "Node_attributes '{}' configurable frame '{}' defined twice",
                                attrs.name, frame.name
                            ),
                        ));
                    }
                }
            }
        }
    }

    fn check_schedule_tables(&self, out: &mut Vec<ValidationMessage>) {
        for (i, table) in self.schedule_tables.iter().enumerate() {
            for other in &self.schedule_tables[i + 1..] {
                if table.name == other.name {
                    out.push(ValidationMessage::error(
                        ValidationCode::ScheduleTableDuplicated,
                        &table.name,
                        format!("Schedule table '{}' defined twice", table.name),
                    ));
                }
            }
            for entry in &table.entries {
                if let Some(frame) = entry.command.frame_name()
                    && self.get_frame_by_name(frame).is_none()
                {
                    out.push(ValidationMessage::error(
                        ValidationCode::ScheduleFrameUnknown,
                        &table.name,
                        format!(
                            "Schedule table '{}' frame '{}' not defined",
                            table.name, frame
                        ),
                    ));
                }
                if let Some(slave) = entry.command.slave_name()
                    && !self.is_slave(slave)
                {
                    out.push(ValidationMessage::error(
                        ValidationCode::ScheduleSlaveUnknown,
                        &table.name,
                        format!(
                            "Schedule table '{}' {} targets undefined slave '{}'",
                            table.name,
                            entry.command.keyword(),
                            slave
                        ),
                    ));
                }
            }
        }
    }

    fn check_encodings(&self, out: &mut Vec<ValidationMessage>) {
        for (i, group) in self.encoding_signals.iter().enumerate() {
            for other in &self.encoding_signals[i + 1..] {
                if group.name == other.name {
                    out.push(ValidationMessage::error(
                        ValidationCode::EncodingSignalGroupDuplicated,
                        &group.name,
                        format!("Signal representation '{}' defined twice", group.name),
                    ));
                }
            }
            if self.get_encoding_type_by_name(&group.name).is_none() {
                out.push(ValidationMessage::error(
                    ValidationCode::EncodingTypeUnknown,
                    &group.name,
                    format!("Signal encoding type '{}' not defined", group.name),
                ));
            }
            for sig in group
                .signals
                .iter()
                .filter(|s| self.get_signal_by_name(s).is_none())
            {
                out.push(ValidationMessage::error(
                    ValidationCode::EncodingSignalUnknown,
                    &group.name,
                    format!(
                        "Signal representation '{}' signal '{}' not defined",
                        group.name, sig
                    ),
                ));
            }
        }
    }
}
