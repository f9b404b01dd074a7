use alloy_primitives::{Address, I256, U256};
use pretty_assertions::assert_eq;
use pw_schema::{ContractConfig, ContractSchema, Entry};

use super::*;

fn schema(fields: Vec<Entry>) -> ContractSchema {
    ContractSchema::compile(&ContractConfig::new("test", "Sample", "SMP").with_fields(fields)).unwrap()
}

fn mixed() -> ContractSchema {
    schema(vec![
        Entry::new(0, "flag", "boolean", 1),
        Entry::new(1, "owner", "address", 1),
        Entry::new(2, "delta", "int32", 1),
        Entry::new(3, "title", "char64", 1),
        Entry::new(4, "levels", "uint16", 5),
        Entry::new(5, "nick", "char8", 1),
    ])
}

#[test]
fn two_word_scenario_round_trips() {
    let s = schema(vec![
        Entry::new(0, "a", "uint256", 1),
        Entry::new(1, "b", "uint128", 1),
        Entry::new(2, "c", "uint64", 1),
        Entry::new(3, "d", "uint32", 1),
        Entry::new(4, "e", "uint16", 1),
        Entry::new(5, "f", "uint8", 1),
        Entry::new(6, "g", "uint8", 1),
    ]);
    let record = Record::new()
        .with("a", Value::Uint(U256::MAX))
        .with("b", Value::uint(0xdead_beef))
        .with("c", Value::uint(7))
        .with("d", Value::uint(8))
        .with("e", Value::uint(9))
        .with("f", Value::uint(10))
        .with("g", Value::uint(255));

    let words = pack(&s, &record).unwrap();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0], U256::MAX);
    assert_eq!(unpack(&s, &words).unwrap(), record);
}

#[test]
fn mixed_types_round_trip() {
    let s = mixed();
    let record = Record::new()
        .with("flag", Value::Bool(true))
        .with("owner", Value::Address(Address::repeat_byte(0x11)))
        .with("delta", Value::Int(I256::try_from(-42i64).unwrap()))
        .with("title", Value::Str("t".repeat(50)))
        .with(
            "levels",
            Value::Array((1..=5).map(Value::uint).collect()),
        )
        .with("nick", Value::str("pw"));

    let words = pack(&s, &record).unwrap();
    assert_eq!(words.len(), s.slot_count());
    assert_eq!(unpack(&s, &words).unwrap(), record);
}

#[test]
fn packed_fields_do_not_overlap() {
    let s = schema(vec![
        Entry::new(0, "low", "uint8", 1),
        Entry::new(1, "high", "uint8", 1),
    ]);
    let record = Record::new()
        .with("low", Value::uint(0xff))
        .with("high", Value::uint(0xff));
    let words = pack(&s, &record).unwrap();
    assert_eq!(words, vec![U256::from(0xffffu64)]);
}

#[test]
fn zeroed_record_packs_to_zero() {
    let s = mixed();
    let words = pack(&s, &Record::zeroed(&s)).unwrap();
    assert!(words.iter().all(|w| w.is_zero()));
    assert_eq!(unpack(&s, &words).unwrap(), Record::zeroed(&s));
}

#[test]
fn unpack_rejects_wrong_word_count() {
    let s = mixed();
    let short = vec![U256::ZERO; s.slot_count() - 1];
    assert_eq!(
        unpack(&s, &short),
        Err(EvalError::Runtime(RuntimeError::BadInputLengths))
    );
}

#[test]
fn pack_requires_every_field() {
    let s = mixed();
    let record = Record::zeroed(&s);
    let mut partial = Record::new();
    for (key, value) in record.iter().filter(|(k, _)| *k != "nick") {
        partial.set(key, value.clone());
    }
    assert_eq!(
        pack(&s, &partial),
        Err(EvalError::UnknownField("nick".to_string()))
    );
}

#[test]
fn dynamic_fields_are_not_in_the_record() {
    let s = schema(vec![
        Entry::new(0, "count", "uint32", 1),
        Entry::new(1, "links", "literef", 0),
    ]);
    let record = Record::zeroed(&s);
    assert_eq!(record.len(), 1);
    assert!(record.get("links").is_none());
}

#[test]
fn set_replaces_existing_value() {
    let mut record = Record::new().with("a", Value::uint(1));
    record.set("a", Value::uint(2));
    assert_eq!(record.len(), 1);
    assert_eq!(record.get("a"), Some(&Value::uint(2)));
}
