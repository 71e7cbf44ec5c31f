use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "inscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub nom_complet: String,

    #[sea_orm(unique)]
    pub numero_membre: String,

    /// 0 or 1
    pub frais_compris: i32,

    /// `YYYY-MM-DD HH:MM:SS`, UTC
    pub date_inscription: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
