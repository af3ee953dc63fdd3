//! Host type to database type registry
//!
//! The registry is populated once and never mutated afterwards, so lookups
//! are plain reads from any thread.

use crate::errors::TypeMappingError;
use crate::types::{DbType, DbValue, HostType};
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::any::TypeId;
use std::collections::HashMap;
use uuid::Uuid;

static BUILTIN: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::builtin);

/// Fixed mapping from host primitive and nullable primitive types to
/// portable database type tags
#[derive(Debug)]
pub struct TypeRegistry {
    map: HashMap<TypeId, DbType>,
}

macro_rules! register_nullable {
    ($registry:expr, $($ty:ty => $db:ident),* $(,)?) => {
        $(
            $registry.insert::<$ty>(DbType::$db);
            $registry.insert::<Option<$ty>>(DbType::$db);
        )*
    };
}

impl TypeRegistry {
    fn builtin() -> Self {
        let mut registry = Self {
            map: HashMap::with_capacity(48),
        };
        register_nullable!(registry,
            u8 => Byte,
            i8 => SByte,
            i16 => Int16,
            u16 => UInt16,
            i32 => Int32,
            u32 => UInt32,
            i64 => Int64,
            u64 => UInt64,
            f32 => Single,
            f64 => Double,
            Decimal => Decimal,
            bool => Boolean,
            String => String,
            char => StringFixedLength,
            Uuid => Guid,
            NaiveDateTime => DateTime,
            DateTime<FixedOffset> => DateTimeOffset,
            TimeDelta => Time,
            Vec<u8> => Binary,
        );
        registry.insert::<&'static str>(DbType::String);
        registry.insert::<serde_json::Value>(DbType::Object);
        registry
    }

    fn insert<T: ?Sized + 'static>(&mut self, db_type: DbType) {
        self.map.insert(TypeId::of::<T>(), db_type);
    }

    /// Process-wide registry of the built-in mappings
    pub fn global() -> &'static TypeRegistry {
        &BUILTIN
    }

    pub fn lookup<T: ?Sized + 'static>(&self) -> Result<DbType, TypeMappingError> {
        self.lookup_host(HostType::of::<T>())
    }

    pub fn lookup_host(&self, host: HostType) -> Result<DbType, TypeMappingError> {
        self.map
            .get(&host.id())
            .copied()
            .ok_or_else(|| TypeMappingError::UnmappedType(host.name().to_string()))
    }

    /// Infer the tag for a runtime value; `Null` carries no type and yields `None`
    pub fn lookup_value(&self, value: &DbValue) -> Result<Option<DbType>, TypeMappingError> {
        value.host_type().map(|host| self.lookup_host(host)).transpose()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Look up the tag for a host type in the built-in registry
pub fn lookup_db_type<T: ?Sized + 'static>() -> Result<DbType, TypeMappingError> {
    TypeRegistry::global().lookup::<T>()
}
