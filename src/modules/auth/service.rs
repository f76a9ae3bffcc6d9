use anyhow::{Context, anyhow};
use schoolhub_auth::create_access_token;
use schoolhub_config::JwtConfig;
use schoolhub_core::file_storage::FileStorage;
use schoolhub_core::{AppError, hash_password, verify_password};
use schoolhub_db::unique_violation;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::metrics::{LoginOutcome, track_login, track_user_created};
use crate::utils::avatar::{AvatarInput, prepare_avatar, store_avatar};

use super::model::{
    LoginRequest, LoginResponse, RegisterRequestDto, UpdateProfileDto, User, UserCredentials,
    UserRole,
};

/// Columns selected into [`User`].
pub const USER_COLUMNS: &str =
    "id, name, email, role, avatar, phone, address, created_at, updated_at";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(email = %dto.email))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let role = dto.role.unwrap_or(UserRole::Student);
        if role == UserRole::Admin {
            return Err(AppError::forbidden(
                "Admin accounts cannot be self-registered".to_string(),
            ));
        }

        Self::ensure_email_available(db, &dto.email).await?;

        let hashed_password = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.name)
        .bind(&dto.email)
        .bind(&hashed_password)
        .bind(role)
        .fetch_one(db)
        .await
        .map_err(email_conflict)?;

        track_user_created(role.as_str());
        Ok(user)
    }

    #[instrument(skip(db, jwt_config))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let credentials = sqlx::query_as::<_, UserCredentials>(&format!(
            "SELECT {USER_COLUMNS}, password FROM users WHERE email = $1"
        ))
        .bind(&dto.email)
        .fetch_optional(db)
        .await
        .context("Failed to fetch user for login")
        .map_err(AppError::database)?;

        let Some(credentials) = credentials else {
            track_login(LoginOutcome::UnknownEmail);
            return Err(AppError::unauthorized("Invalid email or password".to_string()));
        };

        if !verify_password(&dto.password, &credentials.password)? {
            track_login(LoginOutcome::WrongPassword);
            return Err(AppError::unauthorized("Invalid email or password".to_string()));
        }

        let user = credentials.user;
        let access_token =
            create_access_token(user.id, &user.email, user.role.as_str(), jwt_config)?;

        track_login(LoginOutcome::Success);

        Ok(LoginResponse {
            access_token,
            token_type: "Bearer".to_string(),
            user,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// Updates name, phone, address and avatar. Inline avatars are stored and
    /// replaced by their public URL; links are kept as given.
    #[instrument(skip(db, storage, dto))]
    pub async fn update_profile(
        db: &PgPool,
        storage: &dyn FileStorage,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<User, AppError> {
        let avatar = match prepare_avatar(dto.avatar.as_deref(), storage)? {
            Some(AvatarInput::Inline(decoded)) => {
                Some(store_avatar(storage, user_id, &decoded).await?.1)
            }
            Some(AvatarInput::Link(url)) => Some(url),
            None => None,
        };

        sqlx::query_as::<_, User>(&format!(
            r#"UPDATE users
               SET name = COALESCE($1, name),
                   phone = COALESCE($2, phone),
                   address = COALESCE($3, address),
                   avatar = COALESCE($4, avatar),
                   updated_at = NOW()
               WHERE id = $5
               RETURNING {USER_COLUMNS}"#
        ))
        .bind(&dto.name)
        .bind(&dto.phone)
        .bind(&dto.address)
        .bind(&avatar)
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("Failed to update profile")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    /// 409 when another account already uses `email`.
    pub async fn ensure_email_available(db: &PgPool, email: &str) -> Result<(), AppError> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(db)
        .await
        .context("Failed to check email availability")
        .map_err(AppError::database)?;

        if taken {
            return Err(AppError::conflict("Email already in use".to_string()));
        }

        Ok(())
    }
}

/// Maps the users email unique index to 409; anything else is a 500.
pub fn email_conflict(err: sqlx::Error) -> AppError {
    if unique_violation(&err) == Some("users_email_key") {
        return AppError::conflict("Email already in use".to_string());
    }
    AppError::database(err)
}
