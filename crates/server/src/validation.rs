//! Payload rules checked before a request reaches the services.

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use db::models::{
    task::{CreateTask, UpdateTask},
    todo::{CreateTodo, UpdateTodo},
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub const TITLE_MAX_CHARS: usize = 255;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Which entity a title belongs to; only the wording of the message differs.
#[derive(Clone, Copy)]
enum TitleOwner {
    Todo,
    Task,
}

impl TitleOwner {
    fn label(self) -> &'static str {
        match self {
            TitleOwner::Todo => "Title",
            TitleOwner::Task => "Task title",
        }
    }
}

fn check_title(title: &str, owner: TitleOwner) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err(format!("{} cannot be empty", owner.label()));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(format!(
            "{} must be between 1 and {} characters",
            owner.label(),
            TITLE_MAX_CHARS
        ));
    }
    Ok(())
}

fn check_description(description: Option<&str>) -> Result<(), String> {
    match description {
        Some(text) if text.chars().count() > DESCRIPTION_MAX_CHARS => Err(format!(
            "Description must be less than {} characters",
            DESCRIPTION_MAX_CHARS
        )),
        _ => Ok(()),
    }
}

impl Validate for CreateTodo {
    fn validate(&self) -> Result<(), String> {
        check_title(&self.title, TitleOwner::Todo)?;
        check_description(self.description.as_deref())?;
        self.nested_tasks().iter().try_for_each(Validate::validate)
    }
}

impl Validate for UpdateTodo {
    fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            check_title(title, TitleOwner::Todo)?;
        }
        check_description(self.description.as_deref())
    }
}

impl Validate for CreateTask {
    fn validate(&self) -> Result<(), String> {
        check_title(&self.title, TitleOwner::Task)?;
        check_description(self.description.as_deref())
    }
}

impl Validate for UpdateTask {
    fn validate(&self) -> Result<(), String> {
        if let Some(title) = &self.title {
            check_title(title, TitleOwner::Task)?;
        }
        check_description(self.description.as_deref())
    }
}

/// `Json<T>` that also runs [`Validate`]; both failures become a 400 in the error envelope.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<T>::from_request(req, state).await?;
        payload.validate().map_err(ApiError::BadRequest)?;
        Ok(ValidatedJson(payload))
    }
}
