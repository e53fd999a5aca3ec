//! UserQuestion entity (per-user reactions to questions).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A swipe reaction to a question card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Reaction {
    #[sea_orm(string_value = "UPVOTE")]
    Upvote,
    #[sea_orm(string_value = "DOWNVOTE")]
    Downvote,
    #[sea_orm(string_value = "SKIP")]
    Skip,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_question")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user who reacted
    pub user_id: String,

    /// The question being reacted to
    pub question_id: String,

    /// Latest reaction; a new reaction overwrites the old one
    pub reaction: Reaction,

    /// Seconds the card was on screen; overwritten on update, never summed
    #[sea_orm(default_value = 0.0)]
    pub time_spent: f64,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id",
        on_delete = "Cascade"
    )]
    Question,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_wire_format() {
        let json = serde_json::to_string(&Reaction::Upvote).unwrap();
        assert_eq!(json, "\"UPVOTE\"");

        let parsed: Reaction = serde_json::from_str("\"SKIP\"").unwrap();
        assert_eq!(parsed, Reaction::Skip);
    }
}
