use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two kinds of authenticated actor.
///
/// Students and admins are stored in disjoint tables, so the same email can
/// exist once per kind. Every account reference at the API boundary carries
/// its kind to keep the two apart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Student,
    Admin,
}

impl PrincipalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Student => "student",
            PrincipalKind::Admin => "admin",
        }
    }

    /// Capitalised label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            PrincipalKind::Student => "Student",
            PrincipalKind::Admin => "Admin",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrincipalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(PrincipalKind::Student),
            "admin" => Ok(PrincipalKind::Admin),
            other => Err(format!("unknown principal kind: {other}")),
        }
    }
}

/// An authenticated actor: who they are and which table they live in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Principal {
    pub kind: PrincipalKind,
    pub id: Uuid,
}

impl Principal {
    pub fn student(id: Uuid) -> Self {
        Self {
            kind: PrincipalKind::Student,
            id,
        }
    }

    pub fn admin(id: Uuid) -> Self {
        Self {
            kind: PrincipalKind::Admin,
            id,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.kind == PrincipalKind::Admin
    }

    /// The opaque owner/author string stored on records this principal creates.
    pub fn owner_id(&self) -> String {
        self.id.to_string()
    }
}

/// Emergency contacts belong to students; helpline numbers to admins.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Emergency,
    Helpline,
}

impl ContactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContactKind::Emergency => "emergency",
            ContactKind::Helpline => "helpline",
        }
    }

    /// The principal kind allowed to own contacts of this kind.
    pub fn owner_kind(&self) -> PrincipalKind {
        match self {
            ContactKind::Emergency => PrincipalKind::Student,
            ContactKind::Helpline => PrincipalKind::Admin,
        }
    }
}

impl FromStr for ContactKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emergency" => Ok(ContactKind::Emergency),
            "helpline" => Ok(ContactKind::Helpline),
            other => Err(format!("unknown contact kind: {other}")),
        }
    }
}
