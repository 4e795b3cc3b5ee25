//! Record storage and aggregation.
use super::{Record, RecordValue};
use crate::error::CoreError;
use std::collections::HashSet;
use xxhash_rust::xxh3::Xxh3Builder;

/// Stores records and aggregates them on demand.
///
/// The trainer stores the record of every optimization step of an episode
/// and aggregates them when the episode ends. Scalars are averaged and the
/// average is stored under the same key; when more than one value was
/// stored, `<key>_min` and `<key>_max` are added. For the other value types
/// the most recent value is kept.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

fn min(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::INFINITY, f32::min)
}

fn max(vs: &[f32]) -> f32 {
    vs.iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

fn mean(vs: &[f32]) -> f32 {
    vs.iter().sum::<f32>() / vs.len() as f32
}

impl RecordStorage {
    /// Creates a new empty record storage.
    pub fn new() -> Self {
        Self { data: vec![] }
    }

    /// Stores a record in the storage.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Returns `true` if no record is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    fn get_keys(&self) -> HashSet<String, Xxh3Builder> {
        let mut keys = HashSet::<String, Xxh3Builder>::default();
        for record in self.data.iter() {
            for k in record.keys() {
                keys.insert(k.clone());
            }
        }
        keys
    }

    fn latest(&self, key: &str) -> Option<&RecordValue> {
        self.data.iter().rev().find_map(|record| record.get(key))
    }

    fn scalar(&self, key: &str) -> Result<Record, CoreError> {
        let mut vs = Vec::with_capacity(self.data.len());
        for value in self.data.iter().filter_map(|record| record.get(key)) {
            match value {
                RecordValue::Scalar(v) => vs.push(*v),
                _ => return Err(CoreError::RecordValueTypeError(key.to_string())),
            }
        }

        let mut record = Record::from_scalar(key, mean(&vs));
        if vs.len() > 1 {
            record.insert(format!("{}_min", key), RecordValue::Scalar(min(&vs)));
            record.insert(format!("{}_max", key), RecordValue::Scalar(max(&vs)));
        }
        Ok(record)
    }

    /// Aggregates all stored records and clears the storage.
    pub fn aggregate(&mut self) -> Result<Record, CoreError> {
        let mut record = Record::empty();

        for key in self.get_keys().iter() {
            match self.latest(key) {
                Some(RecordValue::Scalar(_)) => record.merge_inplace(self.scalar(key)?),
                Some(value) => record.insert(key.clone(), value.clone()),
                None => {}
            }
        }

        self.data.clear();

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_scalars() -> anyhow::Result<()> {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("loss", 1.0));
        storage.store(Record::from_scalar("loss", 2.0));
        storage.store(Record::from_slice(&[
            ("loss", RecordValue::Scalar(6.0)),
            ("tag", RecordValue::String("last".to_string())),
        ]));

        let record = storage.aggregate()?;
        assert_eq!(record.get_scalar("loss")?, 3.0);
        assert_eq!(record.get_scalar("loss_min")?, 1.0);
        assert_eq!(record.get_scalar("loss_max")?, 6.0);
        assert_eq!(record.get_string("tag")?, "last");
        assert!(storage.is_empty());
        Ok(())
    }

    #[test]
    fn test_aggregate_single_value() -> anyhow::Result<()> {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("loss", 0.25));

        let record = storage.aggregate()?;
        assert_eq!(record.get_scalar("loss")?, 0.25);
        assert!(record.get("loss_min").is_none());
        Ok(())
    }

    #[test]
    fn test_aggregate_mixed_types_is_error() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_slice(&[(
            "loss",
            RecordValue::String("nan".to_string()),
        )]));
        storage.store(Record::from_scalar("loss", 0.25));

        assert!(storage.aggregate().is_err());
    }
}
