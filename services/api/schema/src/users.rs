use sea_orm::entity::prelude::*;

/// User identity record. Created unverified on registration, or seeded
/// pre-verified for the admin account.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    /// Unique when present; registration without a phone is allowed.
    #[sea_orm(unique)]
    pub phone: Option<String>,
    pub full_name: String,
    /// Argon2 PHC string. Never leaves the service.
    pub password_hash: String,
    /// `USER` or `ADMIN` wire string, see `trenzo_auth_types::role::Role`.
    pub role: String,
    pub is_verified: bool,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::verification_codes::Entity")]
    VerificationCodes,
    #[sea_orm(has_many = "super::sessions::Entity")]
    Sessions,
    #[sea_orm(has_many = "super::admin_sessions::Entity")]
    AdminSessions,
    #[sea_orm(has_many = "super::addresses::Entity")]
    Addresses,
}

impl Related<super::verification_codes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VerificationCodes.def()
    }
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::admin_sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdminSessions.def()
    }
}

impl Related<super::addresses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Addresses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
