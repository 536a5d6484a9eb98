use serde::{Deserialize, Serialize};

/// Staff and customer roles. Anything not in this enum is rejected at the
/// identity boundary; capabilities are looked up per-role in
/// `domain::services::capability`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Artist,
    Controller,
    Admin,
    Superadmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Artist => "artist",
            Role::Controller => "controller",
            Role::Admin => "admin",
            Role::Superadmin => "superadmin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "member" => Some(Role::Member),
            "artist" => Some(Role::Artist),
            "controller" => Some(Role::Controller),
            "admin" => Some(Role::Admin),
            "superadmin" => Some(Role::Superadmin),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated party behind a request, supplied by the identity
/// collaborator. `email` links a member to their own bookings, `artist_id`
/// links an artist actor to the artist directory. `elevated` marks admins
/// granted permanent-delete rights.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: String,
    pub role: Role,
    pub email: Option<String>,
    pub artist_id: Option<i64>,
    pub elevated: bool,
}

impl Actor {
    pub fn owns(&self, customer_email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|e| e.eq_ignore_ascii_case(customer_email))
    }
}
