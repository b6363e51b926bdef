//! Key-value bus table seam.
//!
//! The Limelight publishes into one NetworkTables table per camera. This
//! crate does not implement NetworkTables; callers hand the client an
//! implementation of [`NetworkTable`] bound to the camera's table.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

/// A double array together with the time it was published, in microseconds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimestampedArray {
    pub value: Vec<f64>,
    pub timestamp_us: i64,
}

/// Access to a single camera's table on the publish/subscribe bus.
///
/// Getters return `None` when the key is missing or holds another type.
pub trait NetworkTable: Send + Sync {
    fn get_f64(&self, key: &str) -> Option<f64>;
    fn get_string(&self, key: &str) -> Option<String>;
    fn get_f64_array(&self, key: &str) -> Option<Vec<f64>>;
    fn get_f64_array_atomic(&self, key: &str) -> Option<TimestampedArray>;
    fn get_string_array(&self, key: &str) -> Option<Vec<String>>;

    fn set_f64(&self, key: &str, value: f64);
    fn set_f64_array(&self, key: &str, value: &[f64]);
    fn set_string(&self, key: &str, value: &str);

    fn contains_key(&self, key: &str) -> bool;

    /// Push pending writes to the server.
    fn flush(&self) {}
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Double(f64),
    DoubleArray(Vec<f64>),
    String(String),
    StringArray(Vec<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    timestamp_us: i64,
}

/// In-process table, for tests, demos and simulation.
///
/// Each write is stamped with the table clock, which only moves when
/// [`MemoryTable::set_time_us`] is called.
#[derive(Debug, Default)]
pub struct MemoryTable {
    entries: RwLock<HashMap<String, Entry>>,
    clock_us: AtomicI64,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_time_us(&self, time_us: i64) {
        self.clock_us.store(time_us, Ordering::Relaxed);
    }

    pub fn set_string_array(&self, key: &str, value: &[String]) {
        self.put(key, Value::StringArray(value.to_vec()));
    }

    pub fn remove(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }

    pub fn keys(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn put(&self, key: &str, value: Value) {
        let entry = Entry {
            value,
            timestamp_us: self.clock_us.load(Ordering::Relaxed),
        };
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), entry);
    }

    fn get(&self, key: &str) -> Option<Entry> {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
            .cloned()
    }
}

impl NetworkTable for MemoryTable {
    fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)?.value {
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)?.value {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    fn get_f64_array(&self, key: &str) -> Option<Vec<f64>> {
        self.get_f64_array_atomic(key).map(|a| a.value)
    }

    fn get_f64_array_atomic(&self, key: &str) -> Option<TimestampedArray> {
        let entry = self.get(key)?;
        match entry.value {
            Value::DoubleArray(value) => Some(TimestampedArray {
                value,
                timestamp_us: entry.timestamp_us,
            }),
            _ => None,
        }
    }

    fn get_string_array(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)?.value {
            Value::StringArray(v) => Some(v),
            _ => None,
        }
    }

    fn set_f64(&self, key: &str, value: f64) {
        self.put(key, Value::Double(value));
    }

    fn set_f64_array(&self, key: &str, value: &[f64]) {
        self.put(key, Value::DoubleArray(value.to_vec()));
    }

    fn set_string(&self, key: &str, value: &str) {
        self.put(key, Value::String(value.to_string()));
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(key)
    }
}
