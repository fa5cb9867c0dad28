use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait, sea_query::Expr,
};
use std::str::FromStr as _;
use uuid::Uuid;

use trenzo_api_schema::{addresses, admin_sessions, sessions, users, verification_codes};
use trenzo_auth_types::role::Role;

use crate::domain::repository::{
    AddressRepository, AdminSessionRepository, SessionRepository, UserRepository,
    VerificationCodeRepository,
};
use crate::domain::types::{
    Address, AddressChanges, AdminSession, CodePurpose, ProfileChanges, Session, User,
    VerificationCode,
};
use crate::error::ApiError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<User>, ApiError> {
        let model = users::Entity::find()
            .filter(
                users::Column::Email
                    .eq(identifier)
                    .or(users::Column::Phone.eq(identifier)),
            )
            .one(&self.db)
            .await
            .context("find user by identifier")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email_or_phone(
        &self,
        email: &str,
        phone: Option<&str>,
    ) -> Result<Option<User>, ApiError> {
        let mut condition = users::Column::Email.eq(email);
        if let Some(phone) = phone {
            condition = condition.or(users::Column::Phone.eq(phone));
        }
        let model = users::Entity::find()
            .filter(condition)
            .one(&self.db)
            .await
            .context("find user by email or phone")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), ApiError> {
        let result = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            phone: Set(user.phone.clone()),
            full_name: Set(user.full_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            is_verified: Set(user.is_verified),
            image_url: Set(user.image_url.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(_) => Ok(()),
            // Unique (email, phone) races resolve here, not in the usecase's
            // pre-check.
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(ApiError::DuplicateIdentity)
            }
            Err(e) => Err(anyhow::Error::from(e).context("create user").into()),
        }
    }

    async fn mark_verified(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), ApiError> {
        users::ActiveModel {
            id: Set(id),
            is_verified: Set(true),
            updated_at: Set(at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .map_err(|e| not_updated_to_user_not_found(e, "mark user verified"))?;
        Ok(())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: &ProfileChanges,
        at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(full_name) = &changes.full_name {
            am.full_name = Set(full_name.clone());
        }
        if let Some(image_url) = &changes.image_url {
            am.image_url = Set(Some(image_url.clone()));
        }
        if let Some(password_hash) = &changes.password_hash {
            am.password_hash = Set(password_hash.clone());
        }
        am.updated_at = Set(at);
        am.update(&self.db)
            .await
            .map_err(|e| not_updated_to_user_not_found(e, "update user profile"))?;
        Ok(())
    }

    async fn update_contact(
        &self,
        id: Uuid,
        full_name: Option<&str>,
        phone: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(full_name) = full_name {
            am.full_name = Set(full_name.to_owned());
        }
        if let Some(phone) = phone {
            am.phone = Set(Some(phone.to_owned()));
        }
        am.updated_at = Set(at);
        am.update(&self.db)
            .await
            .map_err(|e| not_updated_to_user_not_found(e, "update user contact"))?;
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, ApiError> {
        let models = users::Entity::find()
            .order_by_desc(users::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        // Sessions, codes and addresses go with the row via FK cascade.
        users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(())
    }
}

fn not_updated_to_user_not_found(e: DbErr, what: &'static str) -> ApiError {
    match e {
        DbErr::RecordNotUpdated => ApiError::UserNotFound,
        other => ApiError::Internal(anyhow::Error::from(other).context(what)),
    }
}

fn user_from_model(model: users::Model) -> Result<User, ApiError> {
    let role = Role::from_str(&model.role)
        .map_err(|e| anyhow::Error::from(e).context("role column"))?;
    Ok(User {
        id: model.id,
        email: model.email,
        phone: model.phone,
        full_name: model.full_name,
        password_hash: model.password_hash,
        role,
        is_verified: model.is_verified,
        image_url: model.image_url,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Verification code repository ─────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationCodeRepository {
    pub db: DatabaseConnection,
}

impl VerificationCodeRepository for DbVerificationCodeRepository {
    async fn delete_unused(&self, user_id: Uuid, purpose: CodePurpose) -> Result<(), ApiError> {
        verification_codes::Entity::delete_many()
            .filter(verification_codes::Column::UserId.eq(user_id))
            .filter(verification_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(verification_codes::Column::UsedAt.is_null())
            .exec(&self.db)
            .await
            .context("delete unused verification codes")?;
        Ok(())
    }

    async fn create(&self, code: &VerificationCode) -> Result<(), ApiError> {
        verification_codes::ActiveModel {
            id: Set(code.id),
            user_id: Set(code.user_id),
            code: Set(code.code.clone()),
            target: Set(code.target.clone()),
            purpose: Set(code.purpose.as_str().to_owned()),
            expires_at: Set(code.expires_at),
            used_at: Set(code.used_at),
            created_at: Set(code.created_at),
        }
        .insert(&self.db)
        .await
        .context("create verification code")?;
        Ok(())
    }

    async fn find_unused(
        &self,
        user_id: Uuid,
        code: &str,
        purpose: CodePurpose,
        cutoff: DateTime<Utc>,
    ) -> Result<Option<VerificationCode>, ApiError> {
        let model = verification_codes::Entity::find()
            .filter(verification_codes::Column::UserId.eq(user_id))
            .filter(verification_codes::Column::Code.eq(code))
            .filter(verification_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(verification_codes::Column::UsedAt.is_null())
            .filter(verification_codes::Column::ExpiresAt.gt(cutoff))
            .one(&self.db)
            .await
            .context("find unused verification code")?;
        Ok(model.map(|m| code_from_model(m, purpose)))
    }

    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, ApiError> {
        // Guarded update: concurrent validations race on `used_at IS NULL`
        // and exactly one of them flips it.
        let result = verification_codes::Entity::update_many()
            .filter(verification_codes::Column::Id.eq(id))
            .filter(verification_codes::Column::UsedAt.is_null())
            .col_expr(verification_codes::Column::UsedAt, Expr::value(at))
            .exec(&self.db)
            .await
            .context("consume verification code")?;
        Ok(result.rows_affected == 1)
    }
}

fn code_from_model(model: verification_codes::Model, purpose: CodePurpose) -> VerificationCode {
    VerificationCode {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        target: model.target,
        purpose,
        expires_at: model.expires_at,
        used_at: model.used_at,
        created_at: model.created_at,
    }
}

// ── Session repositories ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), ApiError> {
        sessions::ActiveModel {
            id: Set(session.id),
            user_id: Set(session.user_id),
            token: Set(session.token.clone()),
            expires_at: Set(session.expires_at),
            created_at: Set(session.created_at),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Session>, ApiError> {
        let model = sessions::Entity::find()
            .filter(sessions::Column::Token.eq(token))
            .one(&self.db)
            .await
            .context("find session by token")?;
        Ok(model.map(|m| Session {
            id: m.id,
            user_id: m.user_id,
            token: m.token,
            expires_at: m.expires_at,
            created_at: m.created_at,
        }))
    }

    async fn delete_by_token(&self, token: &str) -> Result<(), ApiError> {
        sessions::Entity::delete_many()
            .filter(sessions::Column::Token.eq(token))
            .exec(&self.db)
            .await
            .context("delete session by token")?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct DbAdminSessionRepository {
    pub db: DatabaseConnection,
}

impl AdminSessionRepository for DbAdminSessionRepository {
    async fn create(&self, session: &AdminSession) -> Result<(), ApiError> {
        admin_sessions::ActiveModel {
            id: Set(session.id),
            user_id: Set(session.user_id),
            refresh_token: Set(session.refresh_token.clone()),
            expires_at: Set(session.expires_at),
            created_at: Set(session.created_at),
        }
        .insert(&self.db)
        .await
        .context("create admin session")?;
        Ok(())
    }

    async fn find_by_token(&self, refresh_token: &str) -> Result<Option<AdminSession>, ApiError> {
        let model = admin_sessions::Entity::find()
            .filter(admin_sessions::Column::RefreshToken.eq(refresh_token))
            .one(&self.db)
            .await
            .context("find admin session by token")?;
        Ok(model.map(|m| AdminSession {
            id: m.id,
            user_id: m.user_id,
            refresh_token: m.refresh_token,
            expires_at: m.expires_at,
            created_at: m.created_at,
        }))
    }

    async fn delete_by_token(&self, refresh_token: &str) -> Result<(), ApiError> {
        admin_sessions::Entity::delete_many()
            .filter(admin_sessions::Column::RefreshToken.eq(refresh_token))
            .exec(&self.db)
            .await
            .context("delete admin session by token")?;
        Ok(())
    }
}

// ── Address repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAddressRepository {
    pub db: DatabaseConnection,
}

impl AddressRepository for DbAddressRepository {
    async fn create(&self, address: &Address) -> Result<(), ApiError> {
        let address = address.clone();
        self.db
            .transaction::<_, (), DbErr>(|txn| {
                Box::pin(async move {
                    if address.is_default {
                        let _ = addresses::Entity::update_many()
                            .filter(addresses::Column::UserId.eq(address.user_id))
                            .col_expr(addresses::Column::IsDefault, Expr::value(false))
                            .exec(txn)
                            .await?;
                    }
                    addresses::ActiveModel {
                        id: Set(address.id),
                        user_id: Set(address.user_id),
                        title: Set(address.title.clone()),
                        address: Set(address.address.clone()),
                        phone: Set(address.phone.clone()),
                        is_default: Set(address.is_default),
                        created_at: Set(address.created_at),
                        updated_at: Set(address.updated_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("create address")?;
        Ok(())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Address>, ApiError> {
        let models = addresses::Entity::find()
            .filter(addresses::Column::UserId.eq(user_id))
            .order_by_desc(addresses::Column::IsDefault)
            .order_by_desc(addresses::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list addresses")?;
        Ok(models.into_iter().map(address_from_model).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Address>, ApiError> {
        let model = addresses::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find address by id")?;
        Ok(model.map(address_from_model))
    }

    async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        changes: &AddressChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<Address>, ApiError> {
        let changes = changes.clone();
        let updated = self
            .db
            .transaction::<_, Option<addresses::Model>, DbErr>(move |txn| {
                Box::pin(async move {
                    let Some(existing) = addresses::Entity::find_by_id(id)
                        .filter(addresses::Column::UserId.eq(user_id))
                        .one(txn)
                        .await?
                    else {
                        return Ok(None);
                    };

                    if changes.is_default == Some(true) {
                        let _ = addresses::Entity::update_many()
                            .filter(addresses::Column::UserId.eq(user_id))
                            .col_expr(addresses::Column::IsDefault, Expr::value(false))
                            .exec(txn)
                            .await?;
                    }

                    let mut am = addresses::ActiveModel {
                        id: Set(existing.id),
                        ..Default::default()
                    };
                    if let Some(title) = changes.title {
                        am.title = Set(title);
                    }
                    if let Some(address) = changes.address {
                        am.address = Set(address);
                    }
                    if let Some(phone) = changes.phone {
                        am.phone = Set(phone);
                    }
                    if let Some(is_default) = changes.is_default {
                        am.is_default = Set(is_default);
                    }
                    am.updated_at = Set(at);
                    let model = am.update(txn).await?;
                    Ok(Some(model))
                })
            })
            .await
            .context("update address")?;
        Ok(updated.map(address_from_model))
    }

    async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        addresses::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete address")?;
        Ok(())
    }
}

fn address_from_model(model: addresses::Model) -> Address {
    Address {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        address: model.address,
        phone: model.phone,
        is_default: model.is_default,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
