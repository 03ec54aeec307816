use serde::{ Deserialize, Serialize };

/// A registered account, guest or owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    /// Stored exactly as supplied; hashing is the caller's concern
    pub password: String,
}

/// Fields accepted when registering a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Attach the identifier assigned by the store
    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
        }
    }
}
