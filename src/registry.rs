//! Memoized "is this a record" check.
//!
//! The answer for a runtime type never changes, so once an object's type has
//! been confirmed as a record its `TypeId` is remembered and later checks are
//! a single set lookup. The set only grows.
use std::any::TypeId;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::value::{Object, Record, RecordType, Value};

static SHARED: Lazy<Arc<RecordTypeRegistry>> = Lazy::new(|| Arc::new(RecordTypeRegistry::new()));

/// Identity of a record type as referenced from a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordTypeRef {
    id: TypeId,
    layout: &'static RecordType,
}

impl RecordTypeRef {
    pub fn of<T: Record>() -> Self {
        Self { id: TypeId::of::<T>(), layout: T::RECORD_TYPE }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.layout.name()
    }

    pub fn layout(&self) -> &'static RecordType {
        self.layout
    }

    /// Exact type match (the `isinstance` check for record fields).
    pub fn matches(&self, obj: &dyn Object) -> bool {
        obj.type_key() == self.id
    }
}

#[derive(Default)]
struct Known {
    ids: HashSet<TypeId>,
    by_name: HashMap<&'static str, RecordTypeRef>,
}

/// Thread-safe cache of known record types.
#[derive(Default)]
pub struct RecordTypeRegistry {
    known: RwLock<Known>,
}

impl RecordTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by the crate-level dump functions.
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Registers `T` up front so its name can be used in schema descriptions.
    pub fn register<T: Record>(&self) -> RecordTypeRef {
        let ty = RecordTypeRef::of::<T>();
        self.remember(ty);
        ty
    }

    pub fn lookup(&self, name: &str) -> Option<RecordTypeRef> {
        self.known.read().by_name.get(name).copied()
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.known.read().ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.known.read().ids.len()
    }

    pub fn is_record_type(&self, value: &Value) -> bool {
        match value {
            Value::Object(obj) => self.is_record_object(obj.as_ref()),
            _ => false,
        }
    }

    pub fn is_record_object(&self, obj: &dyn Object) -> bool {
        let id = obj.type_key();
        if self.contains(id) {
            return true;
        }
        match obj.record_type() {
            Some(layout) => {
                self.remember(RecordTypeRef { id, layout });
                true
            }
            None => false,
        }
    }

    fn remember(&self, ty: RecordTypeRef) {
        let mut known = self.known.write();
        if !known.ids.insert(ty.id) {
            return;
        }
        tracing::debug!(record = ty.name(), "memoized record type");
        match known.by_name.get(ty.name()) {
            Some(existing) if existing.id != ty.id => {
                tracing::warn!(
                    record = ty.name(),
                    "record name already registered for another type; keeping the first"
                );
            }
            Some(_) => {}
            None => {
                known.by_name.insert(ty.name(), ty);
            }
        }
    }
}
