use pretty_assertions::assert_eq;
use pw_schema::{ContractConfig, ContractSchema, Entry, RuntimeError};

use crate::entity::Entity;
use crate::error::EvalError;
use crate::value::Value;

fn schema(array_length: u32) -> ContractSchema {
    ContractSchema::compile(&ContractConfig::new("test", "Holder", "HLD").with_fields(vec![
        Entry::new(0, "flag", "boolean", 1),
        Entry::new(1, "attributes", "literef", array_length),
    ]))
    .unwrap()
}

fn runtime(err: RuntimeError) -> Result<(), EvalError> {
    Err(EvalError::Runtime(err))
}

#[test]
fn add_fills_first_hole() {
    let s = schema(8);
    let mut entity = Entity::new(&s);
    let mut refs = entity.fixed_refs().unwrap();
    assert_eq!(refs.add(10).unwrap(), 0);
    assert_eq!(refs.add(11).unwrap(), 1);
    assert_eq!(refs.add(12).unwrap(), 2);
    refs.remove(11).unwrap();
    assert_eq!(refs.references(), vec![10, 12]);
    assert_eq!(refs.load_at(1).unwrap(), 0);
    assert_eq!(refs.add(13).unwrap(), 1);
    assert_eq!(refs.references(), vec![10, 13, 12]);
}

#[test]
fn exhaustion_and_reuse() {
    let s = schema(5);
    let mut entity = Entity::new(&s);
    let mut refs = entity.fixed_refs().unwrap();
    for r in 1..=5 {
        refs.add(r).unwrap();
    }
    assert_eq!(refs.add(6).map(|_| ()), runtime(RuntimeError::NoReferenceSlotsAvailable));
    refs.remove(3).unwrap();
    assert_eq!(refs.add(6).unwrap(), 2);
    // the fifth reference lives in the second word
    assert_eq!(refs.load_at(4).unwrap(), 5);
}

#[test]
fn remove_missing_reference() {
    let s = schema(4);
    let mut entity = Entity::new(&s);
    let mut refs = entity.fixed_refs().unwrap();
    refs.add(1).unwrap();
    assert_eq!(refs.remove(2), runtime(RuntimeError::NoReference));
}

#[test]
fn batch_requires_empty_store() {
    let s = schema(4);
    let mut entity = Entity::new(&s);
    let mut refs = entity.fixed_refs().unwrap();
    refs.add_batch(&[1, 2, 3]).unwrap();
    assert_eq!(refs.references(), vec![1, 2, 3]);
    assert_eq!(refs.add_batch(&[4]), runtime(RuntimeError::AlreadyHaveReferences));
}

#[test]
fn batch_longer_than_capacity() {
    let s = schema(2);
    let mut entity = Entity::new(&s);
    let mut refs = entity.fixed_refs().unwrap();
    assert_eq!(refs.add_batch(&[1, 2, 3]), runtime(RuntimeError::TooManyReferences));
    assert!(refs.references().is_empty());
}

#[test]
fn load_out_of_range() {
    let s = schema(2);
    let mut entity = Entity::new(&s);
    let refs = entity.fixed_refs().unwrap();
    assert_eq!(refs.load_at(2), Err(EvalError::Runtime(RuntimeError::NoReference)));
}

#[test]
fn scalar_reference_shares_its_word() {
    let s = schema(1);
    let mut entity = Entity::new(&s);
    {
        let mut refs = entity.fixed_refs().unwrap();
        assert_eq!(refs.capacity(), 1);
        refs.add(u64::MAX).unwrap();
    }
    assert_eq!(entity.load("flag").unwrap(), Value::Bool(false));
    assert_eq!(entity.load("attributes").unwrap(), Value::Ref(u64::MAX));
}

#[test]
fn zero_is_not_a_reference() {
    let s = schema(4);
    let mut entity = Entity::new(&s);
    let mut refs = entity.fixed_refs().unwrap();
    assert_eq!(refs.add(0), Err(EvalError::Runtime(RuntimeError::NoReference)));
    assert_eq!(refs.add_batch(&[1, 0]), runtime(RuntimeError::NoReference));
    assert!(refs.references().is_empty());

    refs.add(5).unwrap();
    // an empty sub-slot must not be "removed"
    assert_eq!(refs.remove(0), runtime(RuntimeError::NoReference));
    assert_eq!(refs.references(), vec![5]);
    assert_eq!(refs.add(6).unwrap(), 1);
}
