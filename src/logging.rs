//! Resolution tracing for the reroot library.
//!
//! Construction is the only phase that consults the filesystem, and the
//! choices it makes are invisible in the finished context: which symlink
//! layers of the root were collapsed, where an absolute link target was
//! re-anchored under the base, whether `PWD` was trusted over the kernel's
//! working directory. This module writes those choices to stderr when the
//! `REROOT_TRACE` environment variable asks for them.

use std::env;
use std::fmt;

/// How much of the resolution process is written to stderr.
///
/// Levels are ordered from silent to chatty.
///
/// # Examples
///
/// ```
/// use reroot::TraceLevel;
///
/// assert!(TraceLevel::Off < TraceLevel::Decisions);
/// assert!(TraceLevel::Decisions < TraceLevel::Steps);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TraceLevel {
    /// No output. The default.
    Off,
    /// One line per normalization outcome: the root and base a context
    /// settled on, and the working directory's position inside the root.
    Decisions,
    /// Outcomes plus every symlink hop and base re-anchoring taken on the
    /// way there.
    Steps,
}

impl fmt::Display for TraceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Off => write!(f, "off"),
            Self::Decisions => write!(f, "decisions"),
            Self::Steps => write!(f, "steps"),
        }
    }
}

impl TraceLevel {
    /// Parses a trace level from a string.
    ///
    /// Recognizes: "off", "decisions", "steps" (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use reroot::TraceLevel;
    ///
    /// assert_eq!(TraceLevel::parse("decisions").unwrap(), TraceLevel::Decisions);
    /// assert_eq!(TraceLevel::parse("STEPS").unwrap(), TraceLevel::Steps);
    /// assert!(TraceLevel::parse("debug").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "decisions" => Ok(Self::Decisions),
            "steps" => Ok(Self::Steps),
            _ => Err(format!("invalid trace level: {s}")),
        }
    }
}

/// A stderr sink for resolution traces.
///
/// Silent unless given a level above [`TraceLevel::Off`]; a library should
/// not chatter by default, so the usual way to obtain one is
/// [`Trace::from_env`], which stays off until `REROOT_TRACE` is set.
///
/// # Examples
///
/// ```
/// use reroot::{Trace, TraceLevel};
///
/// let trace = Trace::new(TraceLevel::Decisions);
/// trace.decision("root /scans/alias kept, parents canonicalized");
/// trace.step("this hop is not printed at the decisions level");
/// ```
pub struct Trace {
    level: TraceLevel,
}

impl Trace {
    /// Creates a trace sink with the specified level.
    #[must_use]
    pub const fn new(level: TraceLevel) -> Self {
        Self { level }
    }

    /// Creates a trace sink from the `REROOT_TRACE` environment variable.
    ///
    /// Unset, empty, or unrecognized values mean [`TraceLevel::Off`].
    ///
    /// # Examples
    ///
    /// ```
    /// use reroot::Trace;
    ///
    /// let trace = Trace::from_env();
    /// trace.decision("printed only when REROOT_TRACE is set");
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        let level = env::var("REROOT_TRACE")
            .ok()
            .and_then(|value| TraceLevel::parse(&value).ok())
            .unwrap_or(TraceLevel::Off);
        Self::new(level)
    }

    /// Returns the current trace level.
    #[must_use]
    pub const fn level(&self) -> TraceLevel {
        self.level
    }

    /// Record a normalization outcome.
    ///
    /// Shown at [`TraceLevel::Decisions`] and above. Used for the
    /// once-per-context facts: the resolved root, the accepted base, a
    /// `PWD` spelling preferred over the kernel cwd.
    pub fn decision(&self, message: &str) {
        if self.level >= TraceLevel::Decisions {
            eprintln!("reroot: {message}");
        }
    }

    /// Record a single resolution step.
    ///
    /// Shown only at [`TraceLevel::Steps`]. Used for the per-component
    /// work: each symlink hop followed, each absolute target re-anchored
    /// under the base.
    pub fn step(&self, message: &str) {
        if self.level >= TraceLevel::Steps {
            eprintln!("reroot:   {message}");
        }
    }
}

impl Default for Trace {
    fn default() -> Self {
        Self::new(TraceLevel::Off)
    }
}
