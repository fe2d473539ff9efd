use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Designer,
    Technician,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Designer => "designer",
            Role::Technician => "technician",
            Role::User => "user",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "designer" | "concepteur" => Some(Role::Designer),
            "technician" | "technicien" => Some(Role::Technician),
            "user" => Some(Role::User),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub role: Role,
}

/// Whoever is asking to see or change bookings.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub role: Role,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Actor {
    pub fn admin() -> Self {
        Self {
            role: Role::Admin,
            name: "admin".to_string(),
            email: String::new(),
            phone: String::new(),
        }
    }
}
