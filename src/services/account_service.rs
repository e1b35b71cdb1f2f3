// src/services/account_service.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        response::{PageRequest, Paginated},
    },
    db::AccountRepository,
    middleware::auth::AuthenticatedUser,
    models::account::{
        Account, AccountListQuery, AuthResponse, ChangePasswordPayload, Claims, CreateStaffPayload,
        LoginPayload, RegisterPayload, Role, UpdateProfilePayload,
    },
};

#[derive(Clone)]
pub struct AccountService {
    repo: AccountRepository,
    pool: PgPool,
    jwt_secret: String,
    jwt_expires_days: i64,
}

impl AccountService {
    pub fn new(repo: AccountRepository, pool: PgPool, jwt_secret: String, jwt_expires_days: i64) -> Self {
        Self {
            repo,
            pool,
            jwt_secret,
            jwt_expires_days,
        }
    }

    // Auto-cadastro sempre cria Customer.
    pub async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&payload.email);
        let password_hash = hash_password(payload.password.clone()).await?;

        let account = self
            .repo
            .create(
                &self.pool,
                &email,
                &password_hash,
                payload.name.trim(),
                payload.phone.as_deref(),
                payload.address.as_deref(),
                Role::Customer,
            )
            .await?;

        tracing::info!(account_id = %account.id, "Conta registrada");

        let token = self.create_token(account.id, account.role)?;
        Ok(AuthResponse { token, account })
    }

    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse, AppError> {
        let account = self
            .repo
            .find_by_email(&normalize_email(&payload.email))
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(payload.password.clone(), account.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(account.id, account.role)?;
        Ok(AuthResponse { token, account })
    }

    pub async fn me(&self, account_id: Uuid) -> Result<Account, AppError> {
        self.repo
            .find_active_by_id(&self.pool, account_id)
            .await?
            .ok_or(AppError::AccountNotFound)
    }

    pub async fn update_profile(
        &self,
        account_id: Uuid,
        payload: &UpdateProfilePayload,
    ) -> Result<Account, AppError> {
        self.repo
            .update_profile(
                account_id,
                payload.name.as_deref().map(str::trim),
                payload.phone.as_deref(),
                payload.address.as_deref(),
                payload.image.as_deref(),
            )
            .await?
            .ok_or(AppError::AccountNotFound)
    }

    pub async fn change_password(
        &self,
        account_id: Uuid,
        payload: &ChangePasswordPayload,
    ) -> Result<(), AppError> {
        let account = self.me(account_id).await?;

        if !verify_password(payload.old_password.clone(), account.password_hash).await? {
            return Err(AppError::WrongPassword);
        }

        let new_hash = hash_password(payload.new_password.clone()).await?;
        if !self.repo.update_password(account_id, &new_hash).await? {
            return Err(AppError::AccountNotFound);
        }
        Ok(())
    }

    pub async fn create_staff(&self, payload: &CreateStaffPayload) -> Result<Account, AppError> {
        let password_hash = hash_password(payload.password.clone()).await?;

        let account = self
            .repo
            .create(
                &self.pool,
                &normalize_email(&payload.email),
                &password_hash,
                payload.name.trim(),
                payload.phone.as_deref(),
                None,
                payload.role,
            )
            .await?;

        tracing::info!(account_id = %account.id, role = %account.role, "Conta de funcionário criada");
        Ok(account)
    }

    pub async fn list(&self, query: &AccountListQuery) -> Result<Paginated<Account>, AppError> {
        let page = PageRequest::standard(query.page, query.limit);
        let (accounts, total) = self.repo.list(query.role, page.limit, page.offset()).await?;
        Ok(Paginated::new(accounts, page, total))
    }

    pub async fn delete(&self, account_id: Uuid) -> Result<(), AppError> {
        if !self.repo.soft_delete(account_id).await? {
            return Err(AppError::AccountNotFound);
        }
        tracing::info!(account_id = %account_id, "Conta removida");
        Ok(())
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        decode_token(&self.jwt_secret, token)
    }

    pub(crate) fn create_token(&self, account_id: Uuid, role: Role) -> Result<String, AppError> {
        issue_token(&self.jwt_secret, self.jwt_expires_days, account_id, role)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

async fn verify_password(password: String, password_hash: String) -> Result<bool, AppError> {
    let valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(valid)
}

pub fn issue_token(secret: &str, expires_days: i64, account_id: Uuid, role: Role) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::days(expires_days);

    let claims = Claims {
        sub: account_id,
        role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

// Só decodifica: a identidade vem inteira das claims.
pub fn decode_token(secret: &str, token: &str) -> Result<AuthenticatedUser, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(AuthenticatedUser {
        id: data.claims.sub,
        role: data.claims.role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn token_round_trip_keeps_identity() {
        let id = Uuid::new_v4();
        let token = issue_token(SECRET, 7, id, Role::KitchenStaff).unwrap();
        let user = decode_token(SECRET, &token).unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::KitchenStaff);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token("other", 7, Uuid::new_v4(), Role::Admin).unwrap();
        assert!(matches!(decode_token(SECRET, &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = issue_token(SECRET, -1, Uuid::new_v4(), Role::Customer).unwrap();
        assert!(matches!(decode_token(SECRET, &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(decode_token(SECRET, "not-a-jwt"), Err(AppError::InvalidToken)));
    }

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Ana@Restaurant.COM "), "ana@restaurant.com");
    }

    #[tokio::test]
    async fn password_hash_verifies() {
        let hashed = hash_password("secret123".to_string()).await.unwrap();
        assert!(verify_password("secret123".to_string(), hashed.clone()).await.unwrap());
        assert!(!verify_password("wrong".to_string(), hashed).await.unwrap());
    }
}
