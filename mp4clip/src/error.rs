//! Error types returned by the public API.

use std::fmt::{self, Debug, Display};
use std::io;
use std::panic::Location;
use std::result::Result as StdResult;

use crate::filter::ClipError;
use crate::parse::ParseError;

//
// macros
//

/// Build a [`Report`] from an error, attaching any number of [`Display`]-able notes to its stack.
macro_rules! report_attach {
    ($err:expr $(, $attachment:expr)* $(,)?) => {
        $crate::error::Report::from($err)$(.attach_printable($attachment))*
    };
}

/// Return early with a [`Report`], converted into the surrounding function's error type.
macro_rules! bail_attach {
    ($err:expr $(, $attachment:expr)* $(,)?) => {
        return Err(report_attach!($err $(, $attachment)*).into())
    };
}

/// Check a condition, bailing with the stringified condition attached when it does not hold.
macro_rules! ensure_attach {
    ($cond:expr, $err:expr $(, $attachment:expr)* $(,)?) => {
        if !$cond {
            bail_attach!($err, concat!("check failed: `", stringify!($cond), "`") $(, $attachment)*);
        }
    };
}

/// Error type returned by `mp4clip`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An IO error occurred while reading the input or writing the output.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input could not be parsed as an MP4 file.
    ///
    /// The wrapped [`Report`] can be used to identify exactly where in the parser the error
    /// occurred; its [`Debug`] implementation prints a human-readable parser stack trace. The
    /// underlying [`ParseError`] kind can be retrieved with [`Report::get_ref`].
    #[error("Parse error: {0}")]
    Parse(#[from] Report<ParseError>),

    /// The clip could not be applied to the movie.
    #[error("Clip error: {0}")]
    Clip(#[from] ClipError),
}

/// A report with additional debugging info for an error.
///
/// A `Report<E>` identifies exactly where the error `E` occurred. The [`Debug`] implementation
/// prints a human-readable stack trace; the underlying error of type `E` can be retrieved, e.g.
/// for matching against, with [`get_ref`](Self::get_ref) or [`into_inner`](Self::into_inner).
pub struct Report<E> {
    error: E,
    stack: ReportStack,
}

/// A convenience alias for a [`Result`](std::result::Result) containing an error wrapped by a
/// [`Report`].
pub type Result<T, E> = StdResult<T, Report<E>>;

/// A trait providing [`Report`]-related extensions for [`Result`](std::result::Result).
pub trait ResultExt: Sized {
    /// Attach a [`Display`]-able type to the error [`Report`]'s stack trace.
    #[track_caller]
    fn attach_printable<P: Display + Send + Sync + 'static>(self, printable: P) -> Self;
}

struct ReportStack {
    location: &'static Location<'static>,
    entries: Vec<ReportEntry>,
}

struct ReportEntry {
    message: Box<dyn Display + Send + Sync + 'static>,
    location: &'static Location<'static>,
}

//
// Report impls
//

impl<E> Report<E> {
    /// Get a reference to the underlying error.
    pub fn get_ref(&self) -> &E {
        &self.error
    }

    /// Unwrap this report, returning the underlying error.
    pub fn into_inner(self) -> E {
        self.error
    }

    /// Attach a [`Display`]-able type to the stack trace.
    #[track_caller]
    pub fn attach_printable<P: Display + Send + Sync + 'static>(mut self, message: P) -> Self {
        let entry = ReportEntry { message: Box::new(message), location: Location::caller() };
        self.stack.entries.push(entry);
        self
    }
}

impl<E> From<E> for Report<E> {
    #[track_caller]
    fn from(error: E) -> Self {
        Self { error, stack: ReportStack { location: Location::caller(), entries: Vec::new() } }
    }
}

impl<E: Display> Display for Report<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl<E: Display> Debug for Report<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { error, stack } = self;
        write!(f, "{error}{stack}")
    }
}

impl<E: Display + Debug> std::error::Error for Report<E> {}

//
// ReportStack impls
//

impl Display for ReportStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { location, entries } = self;
        writeln!(f, " at {location}")?;
        for entry in &entries[..entries.len().saturating_sub(1)] {
            writeln!(f, " - {entry}")?;
        }
        if let Some(entry) = entries.last() {
            write!(f, " - {entry}")?;
        }
        Ok(())
    }
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { message, location } = self;
        write!(f, "{message} at {location}")
    }
}

//
// ResultExt impls
//

impl<T, E> ResultExt for Result<T, E> {
    #[track_caller]
    fn attach_printable<P: Display + Send + Sync + 'static>(self, printable: P) -> Self {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.attach_printable(printable)),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const TEST_ERROR_DISPLAY: &str = "test error display";
    const TEST_ATTACHMENT: &str = "test attachment";

    #[derive(Debug, thiserror::Error)]
    #[error("{}", TEST_ERROR_DISPLAY)]
    struct TestError;

    fn test_report() -> Report<TestError> {
        report_attach!(TestError, TEST_ATTACHMENT)
    }

    #[test]
    fn report_display() {
        assert_eq!(test_report().to_string(), TEST_ERROR_DISPLAY);
    }

    #[test]
    fn report_debug() {
        let report_debug = format!("{report:?}", report = test_report());
        assert!(report_debug.starts_with(TEST_ERROR_DISPLAY));
        assert!(report_debug.contains(TEST_ATTACHMENT));
    }
}
