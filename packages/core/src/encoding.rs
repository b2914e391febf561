//! Small parsing/serialization trait pair used throughout the workspace.
//!
//! Every wire-level type implements [`Parsable`] (backed by `nom`) and
//! [`Serializable`] (backed by `cookie_factory`), mirroring how the frame,
//! command and command-class layers all encode/decode themselves.

use std::fmt;
use thiserror::Error;

pub type Input<'a> = &'a [u8];
pub type ParseResult<'a, T> = nom::IResult<Input<'a>, T>;

pub trait Parsable
where
    Self: Sized,
{
    fn parse(i: Input) -> ParseResult<Self>;

    fn try_from_slice(data: &[u8]) -> Result<Self, EncodingError> {
        match Self::parse(data) {
            Ok((_, value)) => Ok(value),
            Err(e) => Err(EncodingError::Parse(format!("{:?}", e))),
        }
    }
}

pub trait Serializable
where
    Self: Sized,
{
    fn serialize<'a, W: std::io::Write + 'a>(&'a self) -> impl cookie_factory::SerializeFn<W> + 'a;

    fn try_to_vec(&self) -> Result<Vec<u8>, EncodingError> {
        cookie_factory::gen_simple(self.serialize(), Vec::new())
            .map_err(|e| EncodingError::Serialize(format!("{:?}", e)))
    }
}

/// Helper trait bridging `derive_try_from_primitive`-generated `TryFrom` impls
/// with `nom`'s `map_res` combinator.
pub trait NomTryFromPrimitive
where
    Self: Sized + TryFrom<Self::Repr>,
    <Self as NomTryFromPrimitive>::Repr: Copy + fmt::Debug,
{
    type Repr;

    fn try_from_primitive(repr: Self::Repr) -> Result<Self, EncodingError> {
        Self::try_from(repr).map_err(|_| EncodingError::Parse(format!("invalid value {:?}", repr)))
    }
}

#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("parse error: {0}")]
    Parse(String),
    #[error("serialization error: {0}")]
    Serialize(String),
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),
}

pub type EncodingResult<T> = std::result::Result<T, EncodingError>;

pub trait IntoEncodingResult {
    type Output;
    fn into_encoding_result(self) -> EncodingResult<Self::Output>;
}
