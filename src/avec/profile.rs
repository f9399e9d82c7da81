//! Precomputed dictionary tables.

use super::dictionary::{Dictionary, FieldInfo, TypeFamily};

/// A field entry in a message table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldProfile {
    pub number: u8,
    pub name: &'static str,
    pub family: TypeFamily,
}

/// A message entry in a profile table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageProfile {
    pub number: u16,
    pub name: &'static str,
    pub fields: &'static [FieldProfile],
}

/// An immutable dictionary backed by static tables.
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    messages: &'static [MessageProfile],
}

impl Profile {
    pub const fn new(messages: &'static [MessageProfile]) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &'static [MessageProfile] {
        self.messages
    }

    pub fn message(&self, name: &str) -> Option<&'static MessageProfile> {
        self.messages.iter().find(|m| m.name == name)
    }
}

impl Dictionary for Profile {
    fn resolve(&self, message: &str, field: u8) -> Option<FieldInfo<'_>> {
        let f = self.message(message)?.fields.iter().find(|f| f.number == field)?;

        Some(FieldInfo {
            name: f.name,
            family: f.family,
        })
    }

    fn message_name(&self, global_number: u16) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.number == global_number)
            .map(|m| m.name)
    }

    fn message_number(&self, message: &str) -> Option<u16> {
        self.message(message).map(|m| m.number)
    }
}

macro_rules! fields {
    ($($number:literal => $name:literal: $family:ident),* $(,)?) => {
        &[$(FieldProfile {
            number: $number,
            name: $name,
            family: TypeFamily::$family,
        }),*]
    };
}

/// Messages written by and read from recorded activities.
pub static ACTIVITY: Profile = Profile::new(&[
    MessageProfile {
        number: 0,
        name: "file_id",
        fields: fields! {
            0 => "type": Number,
            1 => "manufacturer": Number,
            2 => "product": Number,
            3 => "serial_number": Number,
            4 => "time_created": Timestamp,
            5 => "number": Number,
            8 => "product_name": String,
        },
    },
    MessageProfile {
        number: 18,
        name: "session",
        fields: fields! {
            254 => "message_index": Number,
            253 => "timestamp": Timestamp,
            0 => "event": Number,
            1 => "event_type": Number,
            2 => "start_time": Timestamp,
            5 => "sport": Number,
            6 => "sub_sport": Number,
            7 => "total_elapsed_time": Number,
            8 => "total_timer_time": Number,
            9 => "total_distance": Number,
            16 => "avg_heart_rate": Number,
            17 => "max_heart_rate": Number,
            18 => "avg_cadence": Number,
            19 => "max_cadence": Number,
            20 => "avg_power": Number,
            21 => "max_power": Number,
            25 => "first_lap_index": Number,
            26 => "num_laps": Number,
        },
    },
    MessageProfile {
        number: 19,
        name: "lap",
        fields: fields! {
            254 => "message_index": Number,
            253 => "timestamp": Timestamp,
            0 => "event": Number,
            1 => "event_type": Number,
            2 => "start_time": Timestamp,
            7 => "total_elapsed_time": Number,
            8 => "total_timer_time": Number,
            9 => "total_distance": Number,
            15 => "avg_heart_rate": Number,
            16 => "max_heart_rate": Number,
            17 => "avg_cadence": Number,
            18 => "max_cadence": Number,
            19 => "avg_power": Number,
            20 => "max_power": Number,
        },
    },
    MessageProfile {
        number: 20,
        name: "record",
        fields: fields! {
            253 => "timestamp": Timestamp,
            0 => "position_lat": Number,
            1 => "position_long": Number,
            2 => "altitude": Number,
            3 => "heart_rate": Number,
            4 => "cadence": Number,
            5 => "distance": Number,
            6 => "speed": Number,
            7 => "power": Number,
            13 => "temperature": Number,
            54 => "saturated_hemoglobin_percent": Number,
            57 => "total_hemoglobin_conc": Number,
        },
    },
    MessageProfile {
        number: 21,
        name: "event",
        fields: fields! {
            253 => "timestamp": Timestamp,
            0 => "event": Number,
            1 => "event_type": Number,
            3 => "data": Number,
            4 => "event_group": Number,
        },
    },
    MessageProfile {
        number: 23,
        name: "device_info",
        fields: fields! {
            253 => "timestamp": Timestamp,
            0 => "device_index": Number,
            2 => "manufacturer": Number,
            3 => "serial_number": Number,
            4 => "product": Number,
            5 => "software_version": Number,
            27 => "product_name": String,
        },
    },
    MessageProfile {
        number: 31,
        name: "course",
        fields: fields! {
            4 => "sport": Number,
            5 => "name": String,
        },
    },
    MessageProfile {
        number: 34,
        name: "activity",
        fields: fields! {
            253 => "timestamp": Timestamp,
            0 => "total_timer_time": Number,
            1 => "num_sessions": Number,
            2 => "type": Number,
            3 => "event": Number,
            4 => "event_type": Number,
            5 => "local_timestamp": Number,
        },
    },
]);
