use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub sex: Option<String>,
    pub birth_date: Option<String>,
    pub contact_number: Option<String>,
    pub guardian: Option<String>,
    pub profile_picture: Option<String>,
}

/// Settings form; absent fields keep their stored value and present ones
/// follow the registration rules
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
pub struct ProfileUpdate {
    #[validate(
        length(min = 3, max = 50, message = "First name must be 3 to 50 letters"),
        custom(function = "letters_only")
    )]
    pub first_name: Option<String>,

    #[validate(
        length(min = 2, max = 50, message = "Last name must be 2 to 50 letters"),
        custom(function = "letters_only")
    )]
    pub last_name: Option<String>,

    #[validate(custom(function = "known_sex"))]
    pub sex: Option<String>,

    pub birth_date: Option<String>,

    #[validate(length(min = 1, message = "Contact number is required"))]
    pub contact_number: Option<String>,

    #[validate(length(min = 1, message = "Guardian is required"))]
    pub guardian: Option<String>,

    pub profile_picture: Option<String>,
}

fn letters_only(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(())
    } else {
        Err(ValidationError::new("letters_only")
            .with_message("It can only contain letters".into()))
    }
}

fn known_sex(value: &str) -> Result<(), ValidationError> {
    match value {
        "male" | "female" => Ok(()),
        _ => Err(ValidationError::new("sex").with_message("Sex must be male or female".into())),
    }
}

#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: &str) -> Result<Option<UserProfile>, sqlx::Error> {
        sqlx::query_as(
            "SELECT id, first_name, last_name, sex, birth_date, contact_number, guardian, profile_picture
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Creates the profile or merges `update` into it
    pub async fn upsert(&self, id: &str, update: &ProfileUpdate) -> Result<UserProfile, sqlx::Error> {
        sqlx::query(
            "INSERT INTO users
                (id, first_name, last_name, sex, birth_date, contact_number, guardian, profile_picture)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (id) DO UPDATE SET
                first_name = COALESCE(excluded.first_name, users.first_name),
                last_name = COALESCE(excluded.last_name, users.last_name),
                sex = COALESCE(excluded.sex, users.sex),
                birth_date = COALESCE(excluded.birth_date, users.birth_date),
                contact_number = COALESCE(excluded.contact_number, users.contact_number),
                guardian = COALESCE(excluded.guardian, users.guardian),
                profile_picture = COALESCE(excluded.profile_picture, users.profile_picture)",
        )
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.sex)
        .bind(&update.birth_date)
        .bind(&update.contact_number)
        .bind(&update.guardian)
        .bind(&update.profile_picture)
        .execute(&self.pool)
        .await?;

        self.get(id).await?.ok_or(sqlx::Error::RowNotFound)
    }
}
