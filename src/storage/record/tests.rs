use super::*;
use crate::types::{DataType, Field, Schema};
use std::sync::Arc;

fn mixed_schema() -> Arc<Schema> {
    Schema::builder()
        .column("id", DataType::Int)
        .column("seq", DataType::BigInt)
        .nullable_column("score", DataType::Float)
        .varchar_column("name", 8)
        .build_with_handle()
}

#[test]
fn test_field_round_trip() {
    let schema = mixed_schema();
    let values = vec![
        Field::Integer(7),
        Field::BigInt(70),
        Field::Float(0.5),
        Field::from("ada"),
    ];
    let record = Record::from_fields(&schema, &values).unwrap();

    assert_eq!(values, record.fields().unwrap());
    assert_eq!(Field::BigInt(70), record.field_by_name("seq").unwrap());
}

#[test]
fn test_null_field_sets_bit_and_zeroes_payload() {
    let schema = mixed_schema();
    let record = Record::from_fields(
        &schema,
        &[
            Field::Integer(1),
            Field::BigInt(2),
            Field::Null,
            Field::from("x"),
        ],
    )
    .unwrap();

    assert_eq!(Field::Null, record.field(2).unwrap());
    let offset = schema.field_offset(2);
    let width = schema.field_size(2);
    assert!(record.data()[offset..offset + width].iter().all(|&b| b == 0));
}

#[test]
fn test_text_is_zero_padded_to_column_width() {
    let schema = mixed_schema();
    let record = Record::from_fields(
        &schema,
        &[
            Field::Integer(1),
            Field::BigInt(2),
            Field::Float(3.0),
            Field::from("ab"),
        ],
    )
    .unwrap();

    assert_eq!(schema.nullmap_size(), record.null_map().len());
    assert_eq!(schema.rec_size(), record.data().len());
    assert_eq!(Field::from("ab"), record.field(3).unwrap());
}

#[test]
fn test_from_fields_rejects_bad_shapes() {
    let schema = mixed_schema();

    // arity mismatch
    assert!(Record::from_fields(&schema, &[Field::Integer(1)]).is_err());

    // type mismatch
    assert!(Record::from_fields(
        &schema,
        &[
            Field::from("wrong"),
            Field::BigInt(2),
            Field::Float(3.0),
            Field::from("x"),
        ],
    )
    .is_err());

    // null in a non-nullable column
    assert!(Record::from_fields(
        &schema,
        &[Field::Null, Field::BigInt(2), Field::Float(3.0), Field::from("x")],
    )
    .is_err());

    // oversized varchar
    assert!(Record::from_fields(
        &schema,
        &[
            Field::Integer(1),
            Field::BigInt(2),
            Field::Float(3.0),
            Field::from("far too long for eight"),
        ],
    )
    .is_err());
}

#[test]
fn test_project_narrows_and_reorders() {
    let schema = mixed_schema();
    let record = Record::from_fields(
        &schema,
        &[
            Field::Integer(7),
            Field::BigInt(70),
            Field::Null,
            Field::from("ada"),
        ],
    )
    .unwrap();

    let projected_schema = schema.project(&["name", "score", "id"]).unwrap().to_handle();
    let projected = Record::project(&projected_schema, &record).unwrap();

    assert_eq!(
        vec![Field::from("ada"), Field::Null, Field::Integer(7)],
        projected.fields().unwrap()
    );
    assert_eq!(projected_schema.rec_size(), projected.data().len());
}

#[test]
fn test_chunk_accessors() {
    let schema = Schema::builder()
        .column("a", DataType::Int)
        .column("b", DataType::BigInt)
        .build_with_handle();
    let chunk = Chunk::new(
        &schema,
        vec![
            vec![Field::Integer(1), Field::Integer(2)],
            vec![Field::BigInt(10), Field::BigInt(20)],
        ],
    );

    assert_eq!(2, chunk.len());
    assert_eq!(&[Field::Integer(1), Field::Integer(2)], chunk.column(0));
    assert_eq!(
        Some(&[Field::BigInt(10), Field::BigInt(20)][..]),
        chunk.column_by_name("b")
    );
    assert!(chunk.column_by_name("missing").is_none());
}
