use thiserror::Error;

/// Which comparison an assertion keyword performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionKind {
    Equals,
    Contains,
}

impl std::fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssertionKind::Equals => write!(f, "should be"),
            AssertionKind::Contains => write!(f, "should contain"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SapError {
    #[error("cannot find element with id '{id}'")]
    ElementNotFound { id: String },

    #[error("cannot reach window 'wnd[{window}]', is the window actually open?")]
    WindowNotFound { window: usize },

    #[error("cannot use '{action}' on element type '{control_type}'")]
    UnsupportedAction {
        action: &'static str,
        control_type: String,
    },

    #[error("incorrect expected value '{value}' for element type '{control_type}', provide 'checked' or 'unchecked'")]
    InvalidExpectedValue {
        control_type: String,
        value: String,
    },

    #[error("element value of '{id}' {kind} '{expected}', but was '{actual}'")]
    AssertionMismatch {
        id: String,
        expected: String,
        actual: String,
        kind: AssertionKind,
    },

    #[error("unknown transaction: '{0}'")]
    UnknownTransaction(String),

    #[error("cannot find vkey '{0}', provide a valid vkey number or combination")]
    UnknownVirtualKey(String),

    #[error("connection unavailable: {0}")]
    ConnectionUnavailable(String),

    #[error("'{0}' is not a valid wait time, expected a number with an optional ms/s/m unit")]
    InvalidWaitFormat(String),

    #[error("scripting engine error: {0}")]
    Backend(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SapError>;
