use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "albums")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub price: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for scribe_core::domain::Album {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            artist: model.artist,
            price: model.price,
        }
    }
}

impl From<scribe_core::domain::Album> for ActiveModel {
    fn from(album: scribe_core::domain::Album) -> Self {
        Self {
            id: Set(album.id),
            title: Set(album.title),
            artist: Set(album.artist),
            price: Set(album.price),
        }
    }
}
