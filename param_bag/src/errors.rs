use cache_system::CacheError;
use thiserror::Error;
use type_mapping::TypeMappingError;

#[derive(Error, Debug)]
pub enum BindError {
    #[error(transparent)]
    Type(#[from] TypeMappingError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Parameter {0} has not been bound to a command")]
    NotBound(String),

    #[error("Parameter bag is already bound to a command")]
    AlreadyBound,

    #[error("Parameter {0} carries an array value but the connection does not support array parameters")]
    ArraysUnsupported(String),
}
