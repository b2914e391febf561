pub use crate::definitions::*;
pub use crate::encoding::{
    EncodingError, EncodingResult, NomTryFromPrimitive, Parsable, ParseResult, Serializable,
};
pub use crate::values::*;
