use spoke::{
    avec::{
        Codec, DataRecord, Fields, TypeFamily, Value,
        data::{Error, ErrorKind, InvalidValue, Strategy},
        profile::{self, FieldProfile, MessageProfile, Profile},
    },
    sans::{
        base::BaseType,
        definition::{Definition, FieldDefinition},
        number::Number,
        view::FIT_EPOCH,
    },
};

static MONITOR: Profile = Profile::new(&[MessageProfile {
    number: 20,
    name: "record",
    fields: &[
        FieldProfile {
            number: 7,
            name: "heartRate",
            family: TypeFamily::Number,
        },
        FieldProfile {
            number: 8,
            name: "zones",
            family: TypeFamily::Number,
        },
        FieldProfile {
            number: 9,
            name: "label",
            family: TypeFamily::String,
        },
        FieldProfile {
            number: 10,
            name: "power",
            family: TypeFamily::Number,
        },
    ],
}]);

fn record(architecture: bool, fields: Vec<FieldDefinition>) -> Definition {
    Definition::new(architecture, "record", 0, fields)
}

fn fields<const N: usize>(values: [(&str, Value); N]) -> Fields {
    values
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

#[test]
fn encode_heart_rate() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![FieldDefinition::new(7, 2, BaseType::Uint16)]);

    let mut buf = [0xAA; 3];
    let len = codec
        .encode(&definition, &fields([("heartRate", 143u16.into())]), &mut buf, 0)
        .unwrap();

    assert_eq!(len, 3);
    assert_eq!(buf, [0x00, 0x8F, 0x00]);

    let decoded = codec.decode(&definition, &buf, 0).unwrap();
    assert_eq!(
        decoded,
        DataRecord {
            name: "record".to_string(),
            local_number: 0,
            fields: fields([("heartRate", Value::Number(Number::U16(143)))]),
        }
    );
}

#[test]
fn encode_at_offset_with_local_number() {
    let codec = Codec::new(&MONITOR);
    let definition = Definition::new(
        false,
        "record",
        6,
        vec![FieldDefinition::new(7, 1, BaseType::Uint8)],
    );

    let mut buf = [0u8; 5];
    codec
        .encode(&definition, &fields([("heartRate", 90u8.into())]), &mut buf, 3)
        .unwrap();

    assert_eq!(buf, [0, 0, 0, 0x06, 90]);

    let decoded = codec.decode(&definition, &buf, 3).unwrap();
    assert_eq!(decoded.local_number, 6);
    assert_eq!(decoded.fields["heartRate"], Value::Number(Number::U8(90)));
}

#[test]
fn strings_stop_at_null() {
    let codec = Codec::new(&MONITOR);
    let definition = record(
        false,
        vec![FieldDefinition::new(9, 4, BaseType::ByteString)],
    );

    let mut buf = [0xAA; 5];
    codec
        .encode(&definition, &fields([("label", "AB".into())]), &mut buf, 0)
        .unwrap();

    assert_eq!(buf[1..], [0x41, 0x42, 0x00, 0x00]);

    let decoded = codec.decode(&definition, &buf, 0).unwrap();
    assert_eq!(decoded.fields["label"].as_str(), Some("AB"));
}

#[test]
fn arrays_decode_in_buffer_order() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![FieldDefinition::new(8, 6, BaseType::Uint16)]);

    let buf = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x00];
    let decoded = codec.decode(&definition, &buf, 0).unwrap();

    assert_eq!(
        decoded.fields["zones"].as_array().unwrap(),
        [Number::U16(1), Number::U16(2), Number::U16(3)]
    );
}

#[test]
fn arrays_encode_element_by_element() {
    let codec = Codec::new(&MONITOR);
    let definition = record(true, vec![FieldDefinition::new(8, 6, BaseType::Uint16)]);

    let zones = vec![Number::U16(0x0102), Number::U16(0x0304), Number::U16(0x0506)];

    let mut buf = [0u8; 7];
    codec
        .encode(&definition, &fields([("zones", zones.into())]), &mut buf, 0)
        .unwrap();

    assert_eq!(buf, [0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
}

#[test]
fn short_arrays_are_padded_with_invalid_markers() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![FieldDefinition::new(8, 3, BaseType::Uint8)]);

    let mut buf = [0u8; 4];
    codec
        .encode(
            &definition,
            &fields([("zones", vec![Number::U8(4)].into())]),
            &mut buf,
            0,
        )
        .unwrap();

    assert_eq!(buf, [0x00, 0x04, 0xFF, 0xFF]);
}

#[test]
fn long_arrays_are_rejected() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![FieldDefinition::new(8, 2, BaseType::Uint8)]);

    let zones = vec![Number::U8(1), Number::U8(2), Number::U8(3)];
    let err = codec
        .encode(&definition, &fields([("zones", zones.into())]), &mut [0; 3], 0)
        .unwrap_err();

    assert_eq!(
        err,
        Error::InvalidValue {
            field: 8,
            offset: 1,
            reason: InvalidValue::TooManyElements {
                capacity: 2,
                found: 3
            },
        }
    );
}

#[test]
fn architecture_swaps_multi_byte_fields() {
    let codec = Codec::new(&MONITOR);
    let fields = vec![
        FieldDefinition::new(7, 1, BaseType::Uint8),
        FieldDefinition::new(10, 4, BaseType::Sint32),
    ];

    let buf = [0x00, 0x2A, 0x01, 0x02, 0x03, 0x04];
    let little = codec.decode(&record(false, fields.clone()), &buf, 0).unwrap();
    let big = codec.decode(&record(true, fields), &buf, 0).unwrap();

    assert_eq!(little.fields["heartRate"], big.fields["heartRate"]);
    assert_eq!(
        little.fields["power"],
        Value::Number(Number::I32(0x04030201))
    );
    assert_eq!(big.fields["power"], Value::Number(Number::I32(0x01020304)));
}

#[test]
fn malformed_definition_fails_before_reading() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![FieldDefinition::new(7, 3, BaseType::Uint16)]);

    let err = codec.decode(&definition, &[0; 4], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDefinition);
}

#[test]
fn malformed_definition_fails_before_writing() {
    let codec = Codec::new(&MONITOR);
    let definition = record(
        false,
        vec![
            FieldDefinition::new(7, 2, BaseType::Uint16),
            FieldDefinition::new(8, 3, BaseType::Uint16),
        ],
    );

    let mut buf = [0xAA; 6];
    let err = codec
        .encode(&definition, &fields([("heartRate", 1u16.into())]), &mut buf, 0)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedDefinition);
    assert_eq!(buf, [0xAA; 6]);
}

#[test]
fn zero_sized_field_is_malformed() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![FieldDefinition::new(7, 0, BaseType::Uint8)]);

    let err = codec.decode(&definition, &[0; 2], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDefinition);
}

#[test]
fn wide_local_number_is_malformed() {
    let codec = Codec::new(&MONITOR);
    let definition = Definition::new(false, "record", 16, vec![]);

    let err = codec
        .encode(&definition, &Fields::new(), &mut [0; 1], 0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDefinition);
}

#[test]
fn underflow_keeps_earlier_fields() {
    let codec = Codec::new(&MONITOR);
    let definition = record(
        false,
        vec![
            FieldDefinition::new(7, 1, BaseType::Uint8),
            FieldDefinition::new(10, 2, BaseType::Uint16),
        ],
    );

    let mut decoded = Fields::new();
    let err = codec
        .decode_into(&definition, &[0x00, 0x50, 0x01], 0, &mut decoded)
        .unwrap_err();

    assert_eq!(
        err,
        Error::BufferUnderflow {
            field: Some(10),
            offset: 2,
            len: 2
        }
    );
    assert_eq!(err.kind(), ErrorKind::BufferUnderflow);
    assert_eq!(decoded, fields([("heartRate", 0x50u8.into())]));
}

#[test]
fn underflow_on_encode_names_field() {
    let codec = Codec::new(&MONITOR);
    let definition = record(
        false,
        vec![
            FieldDefinition::new(7, 1, BaseType::Uint8),
            FieldDefinition::new(10, 2, BaseType::Uint16),
        ],
    );

    let mut buf = [0xAA; 3];
    let err = codec
        .encode(&definition, &fields([("heartRate", 80u8.into())]), &mut buf, 0)
        .unwrap_err();

    assert_eq!(
        err,
        Error::BufferUnderflow {
            field: Some(10),
            offset: 2,
            len: 2
        }
    );
    // Earlier fields stay written, the offending one is untouched.
    assert_eq!(buf, [0x00, 80, 0xAA]);
}

#[test]
fn empty_buffer_underflows_at_header() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![]);

    let err = codec.decode(&definition, &[], 0).unwrap_err();
    assert_eq!(
        err,
        Error::BufferUnderflow {
            field: None,
            offset: 0,
            len: 1
        }
    );
}

#[test]
fn unresolved_field_is_an_error() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![FieldDefinition::new(99, 1, BaseType::Uint8)]);

    let err = codec.decode(&definition, &[0; 2], 0).unwrap_err();
    assert_eq!(
        err,
        Error::UnresolvedField {
            message: "record".to_string(),
            field: 99
        }
    );
    assert_eq!(err.kind(), ErrorKind::UnresolvedField);
}

#[test]
fn missing_values_become_invalid_markers() {
    let codec = Codec::new(&MONITOR);
    let definition = record(
        false,
        vec![
            FieldDefinition::new(7, 2, BaseType::Uint16),
            FieldDefinition::new(10, 1, BaseType::Sint8),
            FieldDefinition::new(9, 2, BaseType::ByteString),
        ],
    );

    let mut buf = [0xAA; 6];
    codec
        .encode(&definition, &Fields::new(), &mut buf, 0)
        .unwrap();

    assert_eq!(buf, [0x00, 0xFF, 0xFF, 0x7F, 0x00, 0x00]);

    // Markers pass through decoding as plain numbers.
    let decoded = codec.decode(&definition, &buf, 0).unwrap();
    assert_eq!(decoded.fields["heartRate"], Value::Number(Number::U16(u16::MAX)));
    assert_eq!(decoded.fields["label"].as_str(), Some(""));
}

#[test]
fn mismatched_value_shape_is_rejected() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![FieldDefinition::new(7, 1, BaseType::Uint8)]);

    let err = codec
        .encode(&definition, &fields([("heartRate", "fast".into())]), &mut [0; 2], 0)
        .unwrap_err();

    assert_eq!(
        err,
        Error::InvalidValue {
            field: 7,
            offset: 1,
            reason: InvalidValue::Shape(Strategy::Number)
        }
    );
}

#[test]
fn out_of_range_value_is_rejected() {
    let codec = Codec::new(&MONITOR);
    let definition = record(false, vec![FieldDefinition::new(7, 1, BaseType::Uint8)]);

    let err = codec
        .encode(&definition, &fields([("heartRate", 300u16.into())]), &mut [0; 2], 0)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[test]
fn activity_timestamps_use_fit_epoch() {
    let codec = Codec::new(&profile::ACTIVITY);
    let definition = Definition::new(
        false,
        "record",
        1,
        vec![
            FieldDefinition::new(253, 4, BaseType::Uint32),
            FieldDefinition::new(3, 1, BaseType::Uint8),
            FieldDefinition::new(7, 2, BaseType::Uint16),
        ],
    );

    let values = fields([
        ("timestamp", Value::Timestamp(FIT_EPOCH + 1000)),
        ("heart_rate", 143u8.into()),
        ("power", 250u16.into()),
    ]);

    let mut buf = [0u8; 8];
    codec.encode(&definition, &values, &mut buf, 0).unwrap();

    assert_eq!(buf, [0x01, 0xE8, 0x03, 0x00, 0x00, 143, 0xFA, 0x00]);
    assert_eq!(codec.decode(&definition, &buf, 0).unwrap().fields, values);
}

#[test]
fn timestamp_must_be_four_bytes() {
    let codec = Codec::new(&profile::ACTIVITY);
    let definition = record(false, vec![FieldDefinition::new(253, 2, BaseType::Uint16)]);

    let err = codec.decode(&definition, &[0; 3], 0).unwrap_err();
    assert_eq!(
        err,
        Error::MalformedTimestamp {
            field: 253,
            size: 2
        }
    );
    assert_eq!(err.kind(), ErrorKind::MalformedDefinition);
}

#[test]
fn timestamp_before_epoch_is_rejected() {
    let codec = Codec::new(&profile::ACTIVITY);
    let definition = record(false, vec![FieldDefinition::new(253, 4, BaseType::Uint32)]);

    let err = codec
        .encode(
            &definition,
            &fields([("timestamp", Value::Timestamp(0))]),
            &mut [0; 5],
            0,
        )
        .unwrap_err();

    assert_eq!(
        err,
        Error::InvalidValue {
            field: 253,
            offset: 1,
            reason: InvalidValue::Timestamp(0)
        }
    );
    assert_eq!(
        err.to_string(),
        "Invalid value for field 253 at offset 1: Timestamp 0 is outside the FIT epoch range."
    );
}

#[test]
fn string_fields_use_declared_size_over_base_type() {
    let codec = Codec::new(&profile::ACTIVITY);
    let definition = Definition::new(
        false,
        "file_id",
        0,
        vec![
            FieldDefinition::new(8, 6, BaseType::ByteString),
            FieldDefinition::new(1, 2, BaseType::Uint16),
        ],
    );

    let values = fields([
        ("product_name", "Flux 2".into()),
        ("manufacturer", 89u16.into()),
    ]);

    let mut buf = [0u8; 9];
    codec.encode(&definition, &values, &mut buf, 0).unwrap();

    assert_eq!(&buf[1..7], b"Flux 2");
    assert_eq!(buf[7..], [89, 0]);
    assert_eq!(codec.decode(&definition, &buf, 0).unwrap().fields, values);
}

#[test]
fn timestamp_field_must_fit_base_type() {
    let codec = Codec::new(&profile::ACTIVITY);
    let definition = record(false, vec![FieldDefinition::new(253, 4, BaseType::Float64)]);

    let err = codec.decode(&definition, &[0, 1, 0, 0, 0], 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDefinition);

    let mut buf = [0xAA; 5];
    let err = codec
        .encode(&definition, &Fields::new(), &mut buf, 0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDefinition);
    assert_eq!(buf, [0xAA; 5]);
}
