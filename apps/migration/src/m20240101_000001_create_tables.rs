use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{EntityTrait, Schema};

use scribe_infra::database::entity::{
    album, bookmark, comment, contact, follow, post, reaction, user,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

fn create<E: EntityTrait>(schema: &Schema, entity: E) -> TableCreateStatement {
    schema.create_table_from_entity(entity).if_not_exists().to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());

        // Parents before children for the foreign keys.
        manager.create_table(create(&schema, user::Entity)).await?;
        manager.create_table(create(&schema, post::Entity)).await?;
        manager.create_table(create(&schema, follow::Entity)).await?;
        manager.create_table(create(&schema, comment::Entity)).await?;
        manager.create_table(create(&schema, reaction::Entity)).await?;
        manager.create_table(create(&schema, bookmark::Entity)).await?;
        manager.create_table(create(&schema, album::Entity)).await?;
        manager.create_table(create(&schema, contact::Entity)).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_posts_user_slug")
                    .table(post::Entity)
                    .col(post::Column::UserId)
                    .col(post::Column::Slug)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_reactions_user_post")
                    .table(reaction::Entity)
                    .col(reaction::Column::UserId)
                    .col(reaction::Column::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_bookmarks_user_post")
                    .table(bookmark::Entity)
                    .col(bookmark::Column::UserId)
                    .col(bookmark::Column::PostId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_comments_post")
                    .table(comment::Entity)
                    .col(comment::Column::PostId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(contact::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(album::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(bookmark::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(reaction::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(comment::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(follow::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(post::Entity).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(user::Entity).if_exists().to_owned())
            .await
    }
}
