use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use festivo_api_structs::update_event::*;
use festivo_domain::{Event, EventCondition, EventStatus, ID};
use festivo_infra::Context;

pub async fn update_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (_user_id, policy) = protect_route(&http_req)?;

    let body = body.0;
    let usecase = UpdateEventUseCase {
        event_id: path_params.event_id.clone(),
        title: body.title,
        description: body.description,
        start_date: body.start_date,
        end_date: body.end_date,
        status: body.status,
        conditions: body.conditions,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct UpdateEventUseCase {
    pub event_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<EventStatus>,
    pub conditions: Option<Vec<EventCondition>>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidTimeWindow,
    EmptyTitle,
    StorageError,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::InvalidTimeWindow => {
                Self::BadClientData("The event end date must be after its start date".into())
            }
            UseCaseError::EmptyTitle => {
                Self::BadClientData("The event title must not be empty".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateEvent";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let mut event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))?;

        // The window is validated on the combination of stored and
        // incoming dates, so a partial update cannot invert it.
        let start_date = self.start_date.unwrap_or(event.start_date);
        let end_date = self.end_date.unwrap_or(event.end_date);
        if !Event::has_valid_window(&start_date, &end_date) {
            return Err(UseCaseError::InvalidTimeWindow);
        }

        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(UseCaseError::EmptyTitle);
            }
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = Some(description.clone());
        }
        event.start_date = start_date;
        event.end_date = end_date;
        if let Some(status) = self.status {
            event.status = status;
        }
        if let Some(conditions) = &self.conditions {
            event.conditions = conditions.clone();
        }
        event.updated = ctx.sys.get_utc_datetime();

        ctx.repos
            .events
            .save(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(event)
    }
}

impl PermissionBoundary for UpdateEventUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ManageEvents]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Duration;

    async fn seed_event(ctx: &Context) -> Event {
        let now = Utc::now();
        let event = Event {
            id: Default::default(),
            title: "Original title".into(),
            description: None,
            start_date: now,
            end_date: now + Duration::days(7),
            status: EventStatus::Scheduled,
            conditions: Vec::new(),
            created_by: Default::default(),
            deleted_at: None,
            created: now,
            updated: now,
        };
        ctx.repos.events.insert(&event).await.unwrap();
        event
    }

    fn noop_update(event_id: ID) -> UpdateEventUseCase {
        UpdateEventUseCase {
            event_id,
            title: None,
            description: None,
            start_date: None,
            end_date: None,
            status: None,
            conditions: None,
        }
    }

    #[actix_web::main]
    #[test]
    async fn updates_provided_fields_only() {
        let ctx = Context::create_inmemory();
        let event = seed_event(&ctx).await;

        let mut usecase = noop_update(event.id.clone());
        usecase.title = Some("New title".into());
        usecase.status = Some(EventStatus::Active);

        let updated = usecase.execute(&ctx).await.unwrap();
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.status, EventStatus::Active);
        assert_eq!(updated.start_date, event.start_date);
        assert_eq!(updated.end_date, event.end_date);
    }

    #[actix_web::main]
    #[test]
    async fn rejects_window_inverted_by_partial_update() {
        let ctx = Context::create_inmemory();
        let event = seed_event(&ctx).await;

        // only the end date moves, to before the stored start date
        let mut usecase = noop_update(event.id.clone());
        usecase.end_date = Some(event.start_date - Duration::hours(1));

        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::InvalidTimeWindow
        );

        // the stored event is untouched
        let stored = ctx.repos.events.find(&event.id).await.unwrap();
        assert_eq!(stored.end_date, event.end_date);
    }

    #[actix_web::main]
    #[test]
    async fn unknown_event_is_not_found() {
        let ctx = Context::create_inmemory();
        let mut usecase = noop_update(ID::new());
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::NotFound(usecase.event_id.clone())
        );
    }
}
