use sea_orm::entity::prelude::*;

/// Single-use one-time code scoped to (user, purpose).
/// Expires after 5 minutes; at most one unused row per scope at a time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "verification_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    /// Fixed-width 6-digit numeric code, zero-padded string form.
    pub code: String,
    /// Phone or email the code was dispatched to.
    pub target: String,
    /// `SIGNUP` or `ADMIN_ACTION` wire string.
    pub purpose: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// Null means still usable; set exactly once on successful validation.
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
