//! Type mapping definitions
//!
//! This module provides the portable database type tags and the tagged
//! runtime value used for every dynamic parameter and column value.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;
use uuid::Uuid;

/// Database-engine-agnostic storage kinds used to tell a driver how to
/// encode or decode a bound value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DbType {
    Byte,
    SByte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    Single,
    Double,
    Decimal,
    Boolean,
    String,
    StringFixedLength,
    Guid,
    DateTime,
    DateTimeOffset,
    Time,
    Binary,
    Object,
}

impl DbType {
    /// True for the variable and fixed length string tags
    pub fn is_string(&self) -> bool {
        matches!(self, DbType::String | DbType::StringFixedLength)
    }
}

/// Static descriptor of a host type, used as the registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostType {
    id: TypeId,
    name: &'static str,
}

impl HostType {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Runtime value carried by parameters and result rows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DbValue {
    #[default]
    Null,
    Byte(u8),
    SByte(i8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    Boolean(bool),
    String(String),
    Char(char),
    Guid(Uuid),
    DateTime(NaiveDateTime),
    DateTimeOffset(DateTime<FixedOffset>),
    Time(TimeDelta),
    Binary(Vec<u8>),
    Object(serde_json::Value),
    Array(Vec<DbValue>),
}

impl DbValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DbValue::Null)
    }

    /// Host type wrapped by this value. `Null` carries no type.
    pub fn host_type(&self) -> Option<HostType> {
        let host = match self {
            DbValue::Null => return None,
            DbValue::Byte(_) => HostType::of::<u8>(),
            DbValue::SByte(_) => HostType::of::<i8>(),
            DbValue::Int16(_) => HostType::of::<i16>(),
            DbValue::UInt16(_) => HostType::of::<u16>(),
            DbValue::Int32(_) => HostType::of::<i32>(),
            DbValue::UInt32(_) => HostType::of::<u32>(),
            DbValue::Int64(_) => HostType::of::<i64>(),
            DbValue::UInt64(_) => HostType::of::<u64>(),
            DbValue::Single(_) => HostType::of::<f32>(),
            DbValue::Double(_) => HostType::of::<f64>(),
            DbValue::Decimal(_) => HostType::of::<Decimal>(),
            DbValue::Boolean(_) => HostType::of::<bool>(),
            DbValue::String(_) => HostType::of::<String>(),
            DbValue::Char(_) => HostType::of::<char>(),
            DbValue::Guid(_) => HostType::of::<Uuid>(),
            DbValue::DateTime(_) => HostType::of::<NaiveDateTime>(),
            DbValue::DateTimeOffset(_) => HostType::of::<DateTime<FixedOffset>>(),
            DbValue::Time(_) => HostType::of::<TimeDelta>(),
            DbValue::Binary(_) => HostType::of::<Vec<u8>>(),
            DbValue::Object(_) => HostType::of::<serde_json::Value>(),
            DbValue::Array(_) => HostType::of::<Vec<DbValue>>(),
        };
        Some(host)
    }

    /// Variant name, used in conversion diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            DbValue::Null => "Null",
            DbValue::Byte(_) => "Byte",
            DbValue::SByte(_) => "SByte",
            DbValue::Int16(_) => "Int16",
            DbValue::UInt16(_) => "UInt16",
            DbValue::Int32(_) => "Int32",
            DbValue::UInt32(_) => "UInt32",
            DbValue::Int64(_) => "Int64",
            DbValue::UInt64(_) => "UInt64",
            DbValue::Single(_) => "Single",
            DbValue::Double(_) => "Double",
            DbValue::Decimal(_) => "Decimal",
            DbValue::Boolean(_) => "Boolean",
            DbValue::String(_) => "String",
            DbValue::Char(_) => "Char",
            DbValue::Guid(_) => "Guid",
            DbValue::DateTime(_) => "DateTime",
            DbValue::DateTimeOffset(_) => "DateTimeOffset",
            DbValue::Time(_) => "Time",
            DbValue::Binary(_) => "Binary",
            DbValue::Object(_) => "Object",
            DbValue::Array(_) => "Array",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DbValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer variants widened to i128
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            DbValue::Byte(v) => Some(v.into()),
            DbValue::SByte(v) => Some(v.into()),
            DbValue::Int16(v) => Some(v.into()),
            DbValue::UInt16(v) => Some(v.into()),
            DbValue::Int32(v) => Some(v.into()),
            DbValue::UInt32(v) => Some(v.into()),
            DbValue::Int64(v) => Some(v.into()),
            DbValue::UInt64(v) => Some(v.into()),
            _ => None,
        }
    }

    /// JSON rendering used for typed row mapping.
    ///
    /// Decimals render as strings to keep precision, durations as whole
    /// milliseconds, binary blobs as byte arrays.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            DbValue::Null => Value::Null,
            DbValue::Byte(v) => Value::from(*v),
            DbValue::SByte(v) => Value::from(*v),
            DbValue::Int16(v) => Value::from(*v),
            DbValue::UInt16(v) => Value::from(*v),
            DbValue::Int32(v) => Value::from(*v),
            DbValue::UInt32(v) => Value::from(*v),
            DbValue::Int64(v) => Value::from(*v),
            DbValue::UInt64(v) => Value::from(*v),
            DbValue::Single(v) => Value::from(f64::from(*v)),
            DbValue::Double(v) => Value::from(*v),
            DbValue::Decimal(v) => Value::String(v.to_string()),
            DbValue::Boolean(v) => Value::Bool(*v),
            DbValue::String(v) => Value::String(v.clone()),
            DbValue::Char(v) => Value::String(v.to_string()),
            DbValue::Guid(v) => Value::String(v.to_string()),
            DbValue::DateTime(v) => serde_json::to_value(v).unwrap_or(Value::Null),
            DbValue::DateTimeOffset(v) => Value::String(v.to_rfc3339()),
            DbValue::Time(v) => Value::from(v.num_milliseconds()),
            DbValue::Binary(v) => Value::from(v.clone()),
            DbValue::Object(v) => v.clone(),
            DbValue::Array(items) => Value::Array(items.iter().map(DbValue::to_json).collect()),
        }
    }
}

impl fmt::Display for DbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DbValue::Null => Ok(()),
            DbValue::Byte(v) => write!(f, "{}", v),
            DbValue::SByte(v) => write!(f, "{}", v),
            DbValue::Int16(v) => write!(f, "{}", v),
            DbValue::UInt16(v) => write!(f, "{}", v),
            DbValue::Int32(v) => write!(f, "{}", v),
            DbValue::UInt32(v) => write!(f, "{}", v),
            DbValue::Int64(v) => write!(f, "{}", v),
            DbValue::UInt64(v) => write!(f, "{}", v),
            DbValue::Single(v) => write!(f, "{}", v),
            DbValue::Double(v) => write!(f, "{}", v),
            DbValue::Decimal(v) => write!(f, "{}", v),
            DbValue::Boolean(v) => write!(f, "{}", v),
            DbValue::String(v) => f.write_str(v),
            DbValue::Char(v) => write!(f, "{}", v),
            DbValue::Guid(v) => write!(f, "{}", v),
            DbValue::DateTime(v) => write!(f, "{}", v),
            DbValue::DateTimeOffset(v) => write!(f, "{}", v.to_rfc3339()),
            DbValue::Time(v) => write!(f, "{}", v),
            DbValue::Binary(v) => {
                f.write_str("0x")?;
                for byte in v {
                    write!(f, "{:02X}", byte)?;
                }
                Ok(())
            }
            DbValue::Object(v) => write!(f, "{}", v),
            DbValue::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for DbValue {
                fn from(val: $ty) -> Self {
                    DbValue::$variant(val)
                }
            }
        )*
    };
}

impl_from_primitive! {
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
    char => Char,
    Uuid => Guid,
    NaiveDateTime => DateTime,
    DateTime<FixedOffset> => DateTimeOffset,
    TimeDelta => Time,
    Vec<u8> => Binary,
    serde_json::Value => Object,
    Vec<DbValue> => Array,
}

impl From<&str> for DbValue {
    fn from(val: &str) -> Self {
        DbValue::String(val.to_string())
    }
}

impl From<DateTime<Utc>> for DbValue {
    fn from(val: DateTime<Utc>) -> Self {
        DbValue::DateTimeOffset(val.fixed_offset())
    }
}

impl<T> From<Option<T>> for DbValue
where
    T: Into<DbValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => DbValue::Null,
        }
    }
}
