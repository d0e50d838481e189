use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "evaluations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub intern_id: String,
    pub evaluator_id: String,
    pub evaluation_date: Date,
    pub general_comments: Option<String>,

    // Average score in hundredths, 0..=500
    pub average_score_hundredths: i32,

    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::intern::Entity",
        from = "Column::InternId",
        to = "super::intern::Column::Id"
    )]
    Intern,
    #[sea_orm(has_many = "super::competency_score::Entity")]
    CompetencyScore,
}

impl Related<super::intern::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Intern.def()
    }
}

impl Related<super::competency_score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompetencyScore.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
