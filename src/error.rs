//! Error codes and the process-wide (thread-local) error-reporting slot.
//!
//! Mirrors the error taxonomy of `unur_errno.h`: a flat, stable set of
//! codes grouped by the object that raised them, plus a severity split
//! between *warnings* (the operation proceeded with a degraded result)
//! and *errors* (the operation produced nothing usable). See
//! `SPEC_FULL.md` §7.
use std::cell::RefCell;
use std::fmt;

/// The stable error-code surface. New variants may be added in a minor
/// release (the enum is `#[non_exhaustive]`), matching the original's
/// promise that the surface is additive-stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    // --- distribution object -------------------------------------------------
    DistrSet,
    DistrGet,
    DistrNParams,
    DistrDomain,
    DistrGen,
    DistrRequired,
    DistrUnknown,
    DistrInvalid,
    DistrDataMissing,
    DistrProp,
    // --- parameter object -----------------------------------------------------
    ParSet,
    ParVariant,
    ParInvalid,
    // --- generator object ------------------------------------------------------
    Gen,
    GenData,
    GenConditionViolated,
    GenInvalid,
    GenSampling,
    GenNoReinit,
    // --- URNG --------------------------------------------------------------
    Urng,
    UrngMissing,
    // --- string / function parser (survey-only, see SPEC_FULL.md §1) ----------
    Str,
    StrUnknown,
    StrSyntax,
    StrInvalid,
    FstrSyntax,
    FstrDeriv,
    // --- other run-time errors --------------------------------------------
    Domain,
    RoundOff,
    Malloc,
    Null,
    Inf,
    Nan,
    Compile,
    ShouldNotHappen,
    // --- this crate's own setup-failure codes (§4.1, §4.3) ---------------
    SetupCondition,
    SetupInfinite,
}

impl ErrorKind {
    /// Short human-readable description, analogous to `unur_get_strerror`.
    pub fn describe(&self) -> &'static str {
        use ErrorKind::*;
        match self {
            DistrSet => "set failed (invalid parameter)",
            DistrGet => "get failed (parameter not set)",
            DistrNParams => "invalid number of parameters",
            DistrDomain => "parameter(s) out of domain",
            DistrGen => "invalid variant for special generator",
            DistrRequired => "incomplete distribution object, entry missing",
            DistrUnknown => "unknown distribution, cannot handle",
            DistrInvalid => "invalid distribution object",
            DistrDataMissing => "data are missing",
            DistrProp => "desired property does not exist",
            ParSet => "set failed (invalid parameter)",
            ParVariant => "invalid variant, using default",
            ParInvalid => "invalid parameter object",
            Gen => "error with generator object",
            GenData => "possibly invalid data",
            GenConditionViolated => "condition for method violated",
            GenInvalid => "invalid generator object",
            GenSampling => "sampling error",
            GenNoReinit => "reinit routine not implemented",
            Urng => "generic error with URNG object",
            UrngMissing => "missing URNG functionality",
            Str => "error in string",
            StrUnknown => "unknown keyword",
            StrSyntax => "syntax error",
            StrInvalid => "invalid parameter",
            FstrSyntax => "syntax error in function string",
            FstrDeriv => "cannot derive function",
            Domain => "argument out of domain",
            RoundOff => "(serious) round-off error",
            Malloc => "virtual memory exhausted",
            Null => "invalid null value",
            Inf => "infinity occurred",
            Nan => "NaN occurred",
            Compile => "requested routine requires a different build configuration",
            ShouldNotHappen => "internal error, this should not happen",
            SetupCondition => "T-concavity (or method-specific) condition violated at setup",
            SetupInfinite => "a bound computed at setup was not finite",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

/// Severity of a reported condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation proceeded, possibly with a degraded or best-effort result.
    Warning,
    /// The operation could not produce a valid result.
    Error,
}

/// An error or warning raised by this crate.
#[derive(Debug, Clone)]
pub struct UnurError {
    kind: ErrorKind,
    severity: Severity,
    message: String,
}

impl UnurError {
    pub fn new(kind: ErrorKind, severity: Severity, message: impl Into<String>) -> Self {
        let err = UnurError {
            kind,
            severity,
            message: message.into(),
        };
        record(&err);
        err
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    pub fn warning(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for UnurError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.kind, self.message, self.kind.describe())
    }
}

impl std::error::Error for UnurError {}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, UnurError>;

type Handler = fn(&UnurError);

fn default_handler(err: &UnurError) {
    #[cfg(feature = "logging")]
    {
        if err.is_warning() {
            log::warn!("{}", err);
        } else {
            log::error!("{}", err);
        }
    }
    #[cfg(not(feature = "logging"))]
    {
        let _ = err;
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<UnurError>> = RefCell::new(None);
    static HANDLER: RefCell<Handler> = RefCell::new(default_handler);
}

/// Record `err` as the most recent error/warning on this thread and invoke
/// the installed handler. Every `UnurError::new` call does this
/// automatically; callers generally do not need to call it directly.
fn record(err: &UnurError) {
    HANDLER.with(|h| (h.borrow())(err));
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(err.clone()));
}

/// Install a replacement error handler for the current thread.
pub fn set_handler(handler: Handler) {
    HANDLER.with(|h| *h.borrow_mut() = handler);
}

/// The most recently reported error/warning on this thread, if any.
pub fn last() -> Option<UnurError> {
    LAST_ERROR.with(|slot| slot.borrow().clone())
}

/// Reset the thread-local last-error slot.
pub fn clear() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

/// Convenience for raising a warning without constructing an intermediate
/// binding at the call site.
pub fn warn(kind: ErrorKind, message: impl Into<String>) -> UnurError {
    UnurError::warning(kind, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_error_round_trips() {
        clear();
        assert!(last().is_none());
        let _ = UnurError::error(ErrorKind::DistrDomain, "left >= right");
        let got = last().unwrap();
        assert_eq!(got.kind(), ErrorKind::DistrDomain);
        assert!(!got.is_warning());
    }

    #[test]
    fn warning_is_marked_as_such() {
        clear();
        let _ = UnurError::warning(ErrorKind::GenConditionViolated, "squeeze > pdf at x=0.5");
        let got = last().unwrap();
        assert!(got.is_warning());
    }
}
