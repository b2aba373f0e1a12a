use sea_orm::Set;
use sea_orm::entity::prelude::*;

use scribe_core::domain::ReactionKind;

/// One like or dislike per (user, post); the pair is unique-indexed by the migration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub kind: Kind,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Kind {
    #[sea_orm(string_value = "like")]
    Like,
    #[sea_orm(string_value = "dislike")]
    Dislike,
}

impl From<Kind> for ReactionKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Like => ReactionKind::Like,
            Kind::Dislike => ReactionKind::Dislike,
        }
    }
}

impl From<ReactionKind> for Kind {
    fn from(kind: ReactionKind) -> Self {
        match kind {
            ReactionKind::Like => Kind::Like,
            ReactionKind::Dislike => Kind::Dislike,
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "Cascade"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for scribe_core::domain::Reaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            post_id: model.post_id,
            user_id: model.user_id,
            kind: model.kind.into(),
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

impl From<scribe_core::domain::Reaction> for ActiveModel {
    fn from(reaction: scribe_core::domain::Reaction) -> Self {
        Self {
            id: Set(reaction.id),
            post_id: Set(reaction.post_id),
            user_id: Set(reaction.user_id),
            kind: Set(reaction.kind.into()),
            created_at: Set(reaction.created_at.into()),
            updated_at: Set(reaction.updated_at.into()),
        }
    }
}
