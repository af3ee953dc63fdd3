//! Typed result-set mapping
//!
//! A multi-result read is declared as a tuple of `Vec<T>`, one element per
//! result set in the order the procedure produces them.

use serde::de::DeserializeOwned;
use type_mapping::{Row, TypeMappingError};

/// Map every row of one result set into `T`
pub fn map_rows<T: DeserializeOwned>(rows: &[Row]) -> Result<Vec<T>, TypeMappingError> {
    rows.iter().map(Row::deserialize).collect()
}

/// An ordered group of typed result sets
pub trait ResultSets: Sized {
    /// Number of result sets consumed
    const COUNT: usize;

    /// Build from exactly `COUNT` drained sets
    fn from_sets(sets: Vec<Vec<Row>>) -> Result<Self, TypeMappingError>;
}

macro_rules! impl_result_sets {
    ($count:expr; $($ty:ident),+) => {
        impl<$($ty),+> ResultSets for ($(Vec<$ty>,)+)
        where
            $($ty: DeserializeOwned),+
        {
            const COUNT: usize = $count;

            fn from_sets(sets: Vec<Vec<Row>>) -> Result<Self, TypeMappingError> {
                let mut sets = sets.into_iter();
                Ok(($(
                    {
                        let rows = sets.next().unwrap_or_default();
                        map_rows::<$ty>(&rows)?
                    },
                )+))
            }
        }
    };
}

impl_result_sets!(1; T1);
impl_result_sets!(2; T1, T2);
impl_result_sets!(3; T1, T2, T3);
impl_result_sets!(4; T1, T2, T3, T4);
impl_result_sets!(5; T1, T2, T3, T4, T5);
impl_result_sets!(6; T1, T2, T3, T4, T5, T6);

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Order {
        id: i64,
        total: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Note {
        text: String,
    }

    #[test]
    fn test_sets_map_in_declared_order() {
        let sets = vec![
            vec![
                Row::new().with("id", 1i64).with("total", "9.50"),
                Row::new().with("id", 2i64).with("total", "1.00"),
            ],
            vec![Row::new().with("text", "hello")],
        ];

        let (orders, notes): (Vec<Order>, Vec<Note>) =
            <(Vec<Order>, Vec<Note>)>::from_sets(sets).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].id, 2);
        assert_eq!(notes, vec![Note { text: "hello".to_string() }]);
    }

    #[test]
    fn test_count_matches_arity() {
        assert_eq!(<(Vec<Note>,)>::COUNT, 1);
        assert_eq!(<(Vec<Note>, Vec<Note>, Vec<Note>, Vec<Note>, Vec<Note>)>::COUNT, 5);
        assert_eq!(
            <(Vec<Note>, Vec<Note>, Vec<Note>, Vec<Note>, Vec<Note>, Vec<Note>)>::COUNT,
            6
        );
    }

    #[test]
    fn test_mismatched_row_is_a_mapping_error() {
        let sets = vec![vec![Row::new().with("text", 7i32)]];
        assert!(<(Vec<Note>,)>::from_sets(sets).is_err());
    }
}
