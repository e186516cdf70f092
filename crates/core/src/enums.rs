//! Small signed-integer enums underlying the risk matrix arithmetic.
//! Mirrors `dfdone.enums`, with the classification contribution to the
//! risk sum fixed at -1/0/+1.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    Public,
    Restricted,
    Confidential,
}

impl Classification {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "public" => Some(Self::Public),
            "restricted" => Some(Self::Restricted),
            "confidential" => Some(Self::Confidential),
            _ => None,
        }
    }

    /// Contribution to the risk matrix sum: public=-1, restricted=0, confidential=+1.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Public => -1,
            Self::Restricted => 0,
            Self::Confidential => 1,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Public => "public",
            Self::Restricted => "restricted",
            Self::Confidential => "confidential",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Profile {
    Black,
    Grey,
    White,
}

impl Profile {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "black" => Some(Self::Black),
            "grey" | "gray" => Some(Self::Grey),
            "white" => Some(Self::White),
            _ => None,
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Black => "black",
            Self::Grey => "grey",
            Self::White => "white",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Agent,
    Service,
    Storage,
}

impl Role {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "agent" => Some(Self::Agent),
            "service" => Some(Self::Service),
            "storage" => Some(Self::Storage),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Agent => "agent",
            Self::Service => "service",
            Self::Storage => "storage",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Process,
    Send,
    Receive,
    Store,
}

impl Action {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "process" => Some(Self::Process),
            "send" => Some(Self::Send),
            "receive" => Some(Self::Receive),
            "store" => Some(Self::Store),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Process => "process",
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Store => "store",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Impact {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Probability {
    Low,
    Medium,
    High,
}

macro_rules! impact_probability_impl {
    ($ty:ident) => {
        impl $ty {
            pub fn from_str_ci(s: &str) -> Option<Self> {
                match s.to_ascii_lowercase().as_str() {
                    "low" => Some(Self::Low),
                    "medium" | "med" => Some(Self::Medium),
                    "high" => Some(Self::High),
                    _ => None,
                }
            }

            pub fn as_i32(self) -> i32 {
                match self {
                    Self::Low => 1,
                    Self::Medium => 2,
                    Self::High => 3,
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let s = match self {
                    Self::Low => "low",
                    Self::Medium => "medium",
                    Self::High => "high",
                };
                write!(f, "{s}")
            }
        }
    };
}

impact_probability_impl!(Impact);
impact_probability_impl!(Probability);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Detective,
    Partial,
    Full,
}

impl Capability {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "detective" => Some(Self::Detective),
            "partial" => Some(Self::Partial),
            "full" => Some(Self::Full),
            _ => None,
        }
    }

    /// detective=0, partial=1, full=2, fixed by design.
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Detective => 0,
            Self::Partial => 1,
            Self::Full => 2,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Detective => "detective",
            Self::Partial => "partial",
            Self::Full => "full",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Imperative {
    None,
    May,
    Should,
    Must,
}

impl Imperative {
    pub fn from_str_ci(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Some(Self::None),
            "may" => Some(Self::May),
            "should" => Some(Self::Should),
            "must" => Some(Self::Must),
            _ => None,
        }
    }
}

impl fmt::Display for Imperative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "none",
            Self::May => "may",
            Self::Should => "should",
            Self::Must => "must",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Pending,
    Implemented,
    Verified,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Implemented => "implemented",
            Self::Verified => "verified",
        };
        write!(f, "{s}")
    }
}

/// The risk matrix's named ratings, plus `Unknown` for interactions with no risks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rating {
    Unknown,
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Minimal => "minimal",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        write!(f, "{s}")
    }
}

/// Clamped impact+probability+classification-minus-mitigations sum to a named rating.
/// 1-2 => minimal, 3 => low, 4 => medium, 5 => high, 6-7 => critical.
pub fn rating_for_sum(sum: i32) -> Rating {
    let clamped = sum.clamp(1, 7);
    match clamped {
        1 | 2 => Rating::Minimal,
        3 => Rating::Low,
        4 => Rating::Medium,
        5 => Rating::High,
        6 | 7 => Rating::Critical,
        _ => unreachable!("clamp(1, 7) bounds the value"),
    }
}
