//! Purpose: Translate native Tango status codes into categorized, matchable errors.
//! Exports: `ErrorCode`, `Category`, `Classification`, `ErrorCondition`, `ConfigError`,
//!          `classify`, `check`, `check_status!`.
//! Role: Leaf of the crate; every other module reports native failures through here.
//! Invariants: Zero is the only success value; every nonzero code is a failure.
//! Invariants: `classify` is total and never fails; unknown codes map to "Unknown error.".
//! Invariants: Matching uses `{category, code}` only, never the context text.
use std::error::Error as StdError;
use std::fmt;

/// Named native status codes.
///
/// Codes outside this set are still carried verbatim by [`ConfigError`]; they
/// classify as "Unknown error." and are treated as extension values.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(i32)]
pub enum ErrorCode {
    NoMotionTrackingPermission = -87,
    NoAdfPermission = -86,
    NoDatasetPermission = -5,
    NoImportExportPermission = -4,
    NoCameraPermission = -3,
    Invalid = -2,
    Error = -1,
    Success = 0,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 8] = [
        ErrorCode::NoMotionTrackingPermission,
        ErrorCode::NoAdfPermission,
        ErrorCode::NoDatasetPermission,
        ErrorCode::NoImportExportPermission,
        ErrorCode::NoCameraPermission,
        ErrorCode::Invalid,
        ErrorCode::Error,
        ErrorCode::Success,
    ];

    pub const fn from_raw(code: i32) -> Option<ErrorCode> {
        match code {
            -87 => Some(ErrorCode::NoMotionTrackingPermission),
            -86 => Some(ErrorCode::NoAdfPermission),
            -5 => Some(ErrorCode::NoDatasetPermission),
            -4 => Some(ErrorCode::NoImportExportPermission),
            -3 => Some(ErrorCode::NoCameraPermission),
            -2 => Some(ErrorCode::Invalid),
            -1 => Some(ErrorCode::Error),
            0 => Some(ErrorCode::Success),
            _ => None,
        }
    }

    pub const fn raw(self) -> i32 {
        self as i32
    }

    pub const fn message(self) -> &'static str {
        match self {
            ErrorCode::NoDatasetPermission => {
                "The user has not given permissions to read and write datasets."
            }
            ErrorCode::NoImportExportPermission => {
                "The user has not given permission to export or import ADF files."
            }
            ErrorCode::NoMotionTrackingPermission => {
                "The user has not given permission to use Motion Tracking functionality."
            }
            ErrorCode::NoAdfPermission => {
                "The user has not given permission to save or change ADF files."
            }
            ErrorCode::NoCameraPermission => {
                "The user has not given permission to access the device's camera."
            }
            ErrorCode::Invalid => "The input argument is invalid.",
            ErrorCode::Error => "Some sort of hard error occurred.",
            ErrorCode::Success => "Success.",
        }
    }
}

const UNKNOWN_MESSAGE: &str = "Unknown error.";

/// Identity of an error domain.
///
/// Two categories are the same domain iff they are the same static instance.
#[derive(Debug)]
pub struct Category {
    name: &'static str,
}

static TANGO: Category = Category { name: "tango" };

impl Category {
    /// The Tango status-code domain. Named like the `generic` and `system` domains.
    pub fn tango() -> &'static Category {
        &TANGO
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn message(&self, code: i32) -> &'static str {
        match ErrorCode::from_raw(code) {
            Some(known) => known.message(),
            None => UNKNOWN_MESSAGE,
        }
    }
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Category {}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Classification {
    pub category: &'static str,
    pub message: &'static str,
}

pub fn classify(code: i32) -> Classification {
    let category = Category::tango();
    Classification {
        category: category.name(),
        message: category.message(code),
    }
}

/// The matchable part of a [`ConfigError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ErrorCondition {
    pub category: &'static Category,
    pub code: i32,
}

impl ErrorCondition {
    pub fn tango(code: ErrorCode) -> Self {
        Self {
            category: Category::tango(),
            code: code.raw(),
        }
    }
}

/// A failed native call: status code, its category, and what was being attempted.
#[derive(Clone, Debug)]
pub struct ConfigError {
    code: i32,
    category: &'static Category,
    context: String,
}

impl ConfigError {
    /// A zero code is not a failure; it is recorded as `ErrorCode::Error` instead.
    pub fn new(code: i32, context: impl Into<String>) -> Self {
        let code = if code == 0 { ErrorCode::Error.raw() } else { code };
        Self {
            code,
            category: Category::tango(),
            context: context.into(),
        }
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_raw(self.code)
    }

    pub fn category(&self) -> &'static Category {
        self.category
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn classified_message(&self) -> &'static str {
        self.category.message(self.code)
    }

    pub fn condition(&self) -> ErrorCondition {
        ErrorCondition {
            category: self.category,
            code: self.code,
        }
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.condition() == ErrorCondition::tango(code)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.classified_message();
        if self.context == message {
            f.write_str(message)
        } else {
            write!(f, "{}: {message}", self.context)
        }
    }
}

impl StdError for ConfigError {}

/// Turns a native status into a `Result`, attaching `what` as context on failure.
pub fn check(code: i32, what: &str) -> Result<(), ConfigError> {
    if code == 0 {
        return Ok(());
    }
    Err(ConfigError::new(code, what))
}

/// Evaluates a native status expression and uses its source text as the error context.
///
/// ```
/// use tango_config::check_status;
/// use tango_config::core::status::ConfigError;
///
/// fn native_call() -> i32 { -2 }
///
/// fn run() -> Result<(), ConfigError> {
///     check_status!(native_call())
/// }
///
/// let err = run().unwrap_err();
/// assert_eq!(err.code(), -2);
/// assert_eq!(err.context(), "native_call()");
/// ```
#[macro_export]
macro_rules! check_status {
    ($expr:expr) => {
        $crate::core::status::check($expr, stringify!($expr))
    };
}
