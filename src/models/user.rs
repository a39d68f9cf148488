use std::fmt;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde_json::Value;
use sqlx::FromRow;

use crate::{
    error::AppError,
    models::trip::Trip,
    serialize::{leaf, list, optional_text, Include, Mapping, ToMapping, UnknownRelation},
    validation::{validate_email, ValidationError},
};

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub email: Option<String>,
    /// Argon2 PHC string, never rendered.
    pub password: Option<String>,
    /// `None` until loaded with `services::users::load_trips`.
    #[sqlx(skip)]
    pub trips: Option<Vec<Trip>>,
}

impl User {
    pub fn verify_password(&self, candidate: &str) -> Result<bool, AppError> {
        let Some(stored) = self.password.as_deref() else {
            return Ok(false);
        };
        let parsed =
            PasswordHash::new(stored).map_err(|err| AppError::Password(err.to_string()))?;
        Ok(Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok())
    }

    pub fn trips(&self) -> &[Trip] {
        self.trips.as_deref().unwrap_or_default()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<User {}, {}, {}>",
            self.id,
            self.username.as_deref().unwrap_or(""),
            self.email.as_deref().unwrap_or("")
        )
    }
}

impl ToMapping for User {
    const RELATIONS: &'static [&'static str] = &["trips"];

    fn check_relation(relation: &str, nested: &Include) -> Result<(), UnknownRelation> {
        match relation {
            "trips" => Trip::check_include(nested),
            _ => leaf(nested),
        }
    }

    fn to_mapping(&self, include: &Include) -> Mapping {
        let mut map = Mapping::new();
        map.insert("id".into(), Value::from(self.id));
        map.insert("username".into(), optional_text(&self.username));
        map.insert("email".into(), optional_text(&self.email));
        if let (true, Some(trips)) = (include.contains("trips"), &self.trips) {
            map.insert("trips".into(), list(trips, &include.nested("trips")));
        }
        map
    }
}

/// A user that has passed validation and is ready to insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

impl NewUser {
    pub fn new(username: &str, email: &str, password: &str) -> Result<Self, AppError> {
        let email = validate_email(email)?.to_string();
        Ok(Self {
            username: username.to_string(),
            email,
            password_hash: hash_password(password)?,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

/// Partial update for a user. Setters validate before anything is stored.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub(crate) username: Option<String>,
    pub(crate) email: Option<String>,
    pub(crate) password_hash: Option<String>,
}

impl UserChanges {
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn with_email(mut self, email: &str) -> Result<Self, ValidationError> {
        self.email = Some(validate_email(email)?.to_string());
        Ok(self)
    }

    pub fn with_password(mut self, password: &str) -> Result<Self, AppError> {
        self.password_hash = Some(hash_password(password)?);
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::Password(err.to_string()))?;
    Ok(hash.to_string())
}
