//! Typed extraction of runtime values
//!
//! Readback of output parameters and row columns goes through
//! [`FromDbValue`]. A database null only converts into a nullable target.

use crate::errors::TypeMappingError;
use crate::types::DbValue;
use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use rust_decimal::Decimal;
use uuid::Uuid;

pub trait FromDbValue: Sized {
    /// Convert a non-null value
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError>;

    /// Conversion of a database null
    fn from_db_null() -> Result<Self, TypeMappingError> {
        Err(TypeMappingError::NullIntoNonNullable(
            std::any::type_name::<Self>().to_string(),
        ))
    }

    /// Entry point that dispatches on the null sentinel
    fn from_nullable(value: DbValue) -> Result<Self, TypeMappingError> {
        if value.is_null() {
            Self::from_db_null()
        } else {
            Self::from_db_value(value)
        }
    }
}

fn mismatch<T>(value: &DbValue) -> TypeMappingError {
    TypeMappingError::Conversion {
        from: value.kind(),
        to: std::any::type_name::<T>().to_string(),
    }
}

impl FromDbValue for DbValue {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        Ok(value)
    }

    fn from_db_null() -> Result<Self, TypeMappingError> {
        Ok(DbValue::Null)
    }
}

impl<T: FromDbValue> FromDbValue for Option<T> {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        T::from_db_value(value).map(Some)
    }

    fn from_db_null() -> Result<Self, TypeMappingError> {
        Ok(None)
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromDbValue for $ty {
                fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
                    value
                        .as_integer()
                        .and_then(|v| <$ty>::try_from(v).ok())
                        .ok_or_else(|| mismatch::<$ty>(&value))
                }
            }
        )*
    };
}

impl_from_integer!(u8, i8, i16, u16, i32, u32, i64, u64);

impl FromDbValue for f32 {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::Single(v) => Ok(v),
            other => Err(mismatch::<f32>(&other)),
        }
    }
}

impl FromDbValue for f64 {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::Double(v) => Ok(v),
            DbValue::Single(v) => Ok(v.into()),
            other => Err(mismatch::<f64>(&other)),
        }
    }
}

impl FromDbValue for Decimal {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::Decimal(v) => Ok(v),
            DbValue::Int64(v) => Ok(v.into()),
            DbValue::Int32(v) => Ok(v.into()),
            other => Err(mismatch::<Decimal>(&other)),
        }
    }
}

impl FromDbValue for bool {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::Boolean(v) => Ok(v),
            other => Err(mismatch::<bool>(&other)),
        }
    }
}

impl FromDbValue for String {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::String(v) => Ok(v),
            DbValue::Char(c) => Ok(c.to_string()),
            other => Err(mismatch::<String>(&other)),
        }
    }
}

impl FromDbValue for char {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::Char(c) => Ok(c),
            DbValue::String(ref s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Ok(c),
                    _ => Err(mismatch::<char>(&value)),
                }
            }
            other => Err(mismatch::<char>(&other)),
        }
    }
}

impl FromDbValue for Uuid {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::Guid(v) => Ok(v),
            other => Err(mismatch::<Uuid>(&other)),
        }
    }
}

impl FromDbValue for NaiveDateTime {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::DateTime(v) => Ok(v),
            other => Err(mismatch::<NaiveDateTime>(&other)),
        }
    }
}

impl FromDbValue for DateTime<FixedOffset> {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::DateTimeOffset(v) => Ok(v),
            other => Err(mismatch::<DateTime<FixedOffset>>(&other)),
        }
    }
}

impl FromDbValue for TimeDelta {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::Time(v) => Ok(v),
            other => Err(mismatch::<TimeDelta>(&other)),
        }
    }
}

impl FromDbValue for Vec<u8> {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::Binary(v) => Ok(v),
            other => Err(mismatch::<Vec<u8>>(&other)),
        }
    }
}

impl FromDbValue for serde_json::Value {
    fn from_db_value(value: DbValue) -> Result<Self, TypeMappingError> {
        match value {
            DbValue::Object(v) => Ok(v),
            other => Ok(other.to_json()),
        }
    }

    fn from_db_null() -> Result<Self, TypeMappingError> {
        Ok(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_into_non_nullable_fails() {
        let err = i32::from_nullable(DbValue::Null).unwrap_err();
        assert!(matches!(err, TypeMappingError::NullIntoNonNullable(_)));
        assert!(String::from_nullable(DbValue::Null).is_err());
    }

    #[test]
    fn test_null_into_nullable_is_absent() {
        assert_eq!(Option::<i32>::from_nullable(DbValue::Null).unwrap(), None);
        assert_eq!(DbValue::from_nullable(DbValue::Null).unwrap(), DbValue::Null);
    }

    #[test]
    fn test_integer_widening_and_narrowing() {
        assert_eq!(i64::from_nullable(DbValue::Int16(-4)).unwrap(), -4);
        assert_eq!(u8::from_nullable(DbValue::Int32(200)).unwrap(), 200);
        assert!(u8::from_nullable(DbValue::Int32(-1)).is_err());
        assert!(i32::from_nullable(DbValue::from("12")).is_err());
    }

    #[test]
    fn test_char_from_single_char_string() {
        assert_eq!(char::from_nullable(DbValue::from("Y")).unwrap(), 'Y');
        assert!(char::from_nullable(DbValue::from("YN")).is_err());
    }
}
