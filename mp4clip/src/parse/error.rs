//! Error reporting for the box parsers.

use std::any::type_name;
use std::fmt::{Debug, Display};

use derive_more::Display;

use crate::error::{Result, ResultExt};

use super::FourCC;

/// Error type returned by the MP4 parser.
///
/// While the API of this error type is currently considered unstable, it is more stably guaranteed
/// to implement [`Display`] + [`Debug`].
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The input ended, or a container box ended, in the middle of a box header.
    #[error("Truncated box header")]
    TruncatedHeader,

    /// A box header carried a size of 0 (until end of file) or 1 (64-bit extended size); neither
    /// is supported.
    #[error("Unsupported box size")]
    UnsupportedBoxSize,

    /// A container with a closed set of children contained a box of an unrecognised type.
    #[error("Unknown box type `{_0}`")]
    UnknownBoxType(FourCC),

    /// The input violates the expected structure: boxes out of order, a missing mandatory child,
    /// a box body inconsistent with its declared size, and the like.
    #[error("Bad format")]
    BadFormat,

    /// The input ended before an `mdat` box was found.
    #[error("Missing `mdat` box")]
    MissingMdat,
}

pub(crate) trait ParseResultExt: ResultExt + Sized {
    fn while_parsing_type<T>(self) -> Self {
        self.attach_printable(WhileParsingType(type_name::<T>()))
    }

    fn while_parsing_box(self, box_type: FourCC) -> Self {
        self.attach_printable(WhileParsingBox(box_type))
    }

    fn while_parsing_field<T>(self, box_type: FourCC, field_name: T) -> Self
    where
        T: Display + Debug + Send + Sync + 'static,
    {
        self.attach_printable(WhileParsingField(box_type, field_name))
    }

    fn while_parsing_child(self, box_type: FourCC, child_box_type: FourCC) -> Self {
        self.attach_printable(WhileParsingChild(box_type, child_box_type))
    }
}

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "while parsing value of type `{}`", _0)]
pub(crate) struct WhileParsingType(pub(crate) &'static str);

impl WhileParsingType {
    pub fn new<T: ?Sized>() -> Self {
        Self(type_name::<T>())
    }
}

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "while parsing `{}` box", _0)]
pub(crate) struct WhileParsingBox(pub(crate) FourCC);

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "while parsing `{}` box field `{}`", _0, _1)]
pub(crate) struct WhileParsingField<T>(pub(crate) FourCC, pub(crate) T);

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "while parsing `{}` box child `{}`", _0, _1)]
pub(crate) struct WhileParsingChild(pub(crate) FourCC, pub(crate) FourCC);

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "missing required `{}` box", _0)]
pub(crate) struct MissingRequiredBox(pub(crate) FourCC);

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "multiple `{}` boxes", _0)]
pub(crate) struct MultipleBoxes(pub(crate) FourCC);

#[derive(Clone, Copy, Debug, Display)]
#[display(fmt = "where `{} = {}`", _0, _1)]
pub(crate) struct WhereEq<T, U>(pub(crate) T, pub(crate) U);

impl<T, E> ParseResultExt for Result<T, E> {}
