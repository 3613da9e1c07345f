use std::fmt::{self, Display, Formatter};

/// Execution state of a node, ordered by precedence for [`NodeStatus::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum StatusCode {
    /// The node is in its pre-run state
    #[default]
    Pending,
    /// The node should keep running in the next tick
    Active,
    Success,
    Fail,
    Cancel,
}

impl StatusCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Success => "SUCCESS",
            Self::Fail => "FAIL",
            Self::Cancel => "CANCEL",
        }
    }

    /// Whether a node reporting this code has finished and needs cleanup.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Fail | Self::Cancel)
    }
}

impl Display for StatusCode {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

/// A status code with diagnostic text.
///
/// Equality only looks at the code, so a status compares equal to a bare
/// [`StatusCode`] as well as to any other status with the same code.
#[derive(Debug, Clone, Default)]
pub struct NodeStatus {
    pub code: StatusCode,
    pub text: String,
}

impl NodeStatus {
    pub fn new(code: StatusCode, text: impl Into<String>) -> Self {
        Self {
            code,
            text: text.into(),
        }
    }

    pub fn pending() -> Self {
        StatusCode::Pending.into()
    }

    pub fn active(text: impl Into<String>) -> Self {
        Self::new(StatusCode::Active, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusCode::Success, text)
    }

    pub fn fail(text: impl Into<String>) -> Self {
        Self::new(StatusCode::Fail, text)
    }

    pub fn cancel(text: impl Into<String>) -> Self {
        Self::new(StatusCode::Cancel, text)
    }

    /// Keeps the higher ranked of the two statuses. Equal codes concatenate
    /// their text.
    pub fn merge(&mut self, code: StatusCode, text: &str) {
        if code > self.code {
            self.code = code;
            self.text = text.to_owned();
        } else if code == self.code {
            self.text.push_str("; ");
            self.text.push_str(text);
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.code, StatusCode::Active | StatusCode::Pending)
    }
}

impl From<StatusCode> for NodeStatus {
    fn from(code: StatusCode) -> Self {
        Self {
            code,
            text: String::new(),
        }
    }
}

impl PartialEq for NodeStatus {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for NodeStatus {}

impl PartialEq<StatusCode> for NodeStatus {
    fn eq(&self, other: &StatusCode) -> bool {
        self.code == *other
    }
}

impl PartialEq<NodeStatus> for StatusCode {
    fn eq(&self, other: &NodeStatus) -> bool {
        *self == other.code
    }
}

impl Display for NodeStatus {
    fn fmt(&self, fmt: &mut Formatter) -> fmt::Result {
        write!(fmt, "{} {}", self.code, self.text)
    }
}
