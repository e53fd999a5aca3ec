//! Question entity (the cards of the deck).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which partner a question is directed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    #[sea_orm(string_value = "MALE")]
    Male,
    #[sea_orm(string_value = "FEMALE")]
    Female,
    /// Directed at the couple to answer together.
    #[sea_orm(string_value = "BOTH")]
    Both,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "question")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Question text shown on the card
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Target gender
    pub for_gender: Gender,

    /// Depth level, 1 (surface) to 10 (naked truth)
    pub level: i32,

    /// Adult-content flag
    #[sea_orm(default_value = false)]
    pub is_18_plus: bool,

    /// Category reference
    #[sea_orm(indexed)]
    pub category_id: String,

    /// Creating user; the system user for seeded/generated content
    pub creator_id: String,

    /// Upvote count (denormalized)
    #[sea_orm(default_value = 0)]
    pub upvotes: i32,

    /// Downvote count (denormalized)
    #[sea_orm(default_value = 0)]
    pub downvotes: i32,

    /// Distinct users who ever interacted (denormalized)
    #[sea_orm(default_value = 0)]
    pub viewers_count: i32,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatorId",
        to = "super::user::Column::Id"
    )]
    Creator,

    #[sea_orm(has_many = "super::user_question::Entity")]
    Interactions,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::user_question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Interactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
