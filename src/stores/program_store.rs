use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::errors::internal::ProgramError;
use crate::errors::InternalError;
use crate::stores::credential_store::{account_role, normalize_email};
use crate::types::db::{account, category, competency, intern};

/// Input for registering an intern
#[derive(Debug, Clone)]
pub struct NewIntern {
    pub full_name: String,
    pub email: String,
    pub institution: String,
    pub course: String,
    pub supervisor_id: Option<String>,
    pub active: bool,
}

/// Input for adding a competency to a category
#[derive(Debug, Clone)]
pub struct NewCompetency {
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}

fn required(field: &str, value: &str) -> Result<String, InternalError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ProgramError::invalid_field(field, "must not be empty").into());
    }
    Ok(trimmed.to_string())
}

/// ProgramStore manages interns, competency categories and competencies
pub struct ProgramStore;

impl ProgramStore {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_category(
        &self,
        conn: &impl ConnectionTrait,
        name: &str,
    ) -> Result<category::Model, InternalError> {
        let name = required("name", name)?;

        let existing = category::Entity::find()
            .filter(category::Column::Name.eq(&name))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_category_by_name", e))?;
        if existing.is_some() {
            return Err(ProgramError::DuplicateCategory(name).into());
        }

        category::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(name),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_category", e))
    }

    pub async fn list_categories(&self, conn: &impl ConnectionTrait) -> Result<Vec<category::Model>, InternalError> {
        category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_categories", e))
    }

    pub async fn create_competency(
        &self,
        conn: &impl ConnectionTrait,
        new_competency: NewCompetency,
    ) -> Result<competency::Model, InternalError> {
        let name = required("name", &new_competency.name)?;

        let category = category::Entity::find_by_id(new_competency.category_id.clone())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_category", e))?;
        if category.is_none() {
            return Err(ProgramError::CategoryNotFound(new_competency.category_id).into());
        }

        let description = new_competency
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        competency::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            category_id: Set(new_competency.category_id),
            name: Set(name),
            description: Set(description),
            active: Set(new_competency.active),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_competency", e))
    }

    /// Active competencies ordered by name
    pub async fn list_active_competencies(
        &self,
        conn: &impl ConnectionTrait,
    ) -> Result<Vec<competency::Model>, InternalError> {
        competency::Entity::find()
            .filter(competency::Column::Active.eq(true))
            .order_by_asc(competency::Column::Name)
            .all(conn)
            .await
            .map_err(|e| InternalError::database("list_active_competencies", e))
    }

    /// Subset of `ids` that name existing, active competencies
    pub async fn find_active_competency_ids(
        &self,
        conn: &impl ConnectionTrait,
        ids: &[String],
    ) -> Result<HashSet<String>, InternalError> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }

        let found = competency::Entity::find()
            .filter(competency::Column::Id.is_in(ids.iter().cloned()))
            .filter(competency::Column::Active.eq(true))
            .all(conn)
            .await
            .map_err(|e| InternalError::database("find_active_competencies", e))?;

        Ok(found.into_iter().map(|c| c.id).collect())
    }

    /// Register an intern
    ///
    /// A supervisor, when given, must be an account allowed to evaluate.
    pub async fn create_intern(
        &self,
        conn: &impl ConnectionTrait,
        new_intern: NewIntern,
    ) -> Result<intern::Model, InternalError> {
        let full_name = required("full_name", &new_intern.full_name)?;
        let institution = required("institution", &new_intern.institution)?;
        let course = required("course", &new_intern.course)?;
        let email = normalize_email(&new_intern.email);
        if !email.contains('@') {
            return Err(ProgramError::invalid_field("email", "must be an email address").into());
        }

        let existing = intern::Entity::find()
            .filter(intern::Column::Email.eq(&email))
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_intern_by_email", e))?;
        if existing.is_some() {
            return Err(ProgramError::DuplicateInternEmail(email).into());
        }

        if let Some(supervisor_id) = &new_intern.supervisor_id {
            let supervisor = account::Entity::find_by_id(supervisor_id.clone())
                .one(conn)
                .await
                .map_err(|e| InternalError::database("get_supervisor", e))?
                .ok_or_else(|| ProgramError::InvalidSupervisor(supervisor_id.clone()))?;
            if !account_role(&supervisor)?.evaluates() {
                return Err(ProgramError::InvalidSupervisor(supervisor_id.clone()).into());
            }
        }

        let intern = intern::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            full_name: Set(full_name),
            email: Set(email),
            institution: Set(institution),
            course: Set(course),
            supervisor_id: Set(new_intern.supervisor_id),
            active: Set(new_intern.active),
            created_at: Set(Utc::now().timestamp()),
        }
        .insert(conn)
        .await
        .map_err(|e| InternalError::database("insert_intern", e))?;

        tracing::info!(intern_id = %intern.id, "Intern registered");

        Ok(intern)
    }

    pub async fn get_intern(&self, conn: &impl ConnectionTrait, intern_id: &str) -> Result<intern::Model, InternalError> {
        intern::Entity::find_by_id(intern_id.to_owned())
            .one(conn)
            .await
            .map_err(|e| InternalError::database("get_intern", e))?
            .ok_or_else(|| ProgramError::InternNotFound(intern_id.to_owned()).into())
    }
}

impl Default for ProgramStore {
    fn default() -> Self {
        Self::new()
    }
}
