use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{DateTime, Utc};
use festivo_api_structs::create_event::*;
use festivo_domain::{Event, EventCondition, EventStatus, ID};
use festivo_infra::Context;

pub async fn create_event_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (user_id, policy) = protect_route(&http_req)?;

    let body = body.0;
    let usecase = CreateEventUseCase {
        title: body.title,
        description: body.description,
        start_date: body.start_date,
        end_date: body.end_date,
        status: body.status.unwrap_or(EventStatus::Scheduled),
        conditions: body.conditions.unwrap_or_default(),
        created_by: user_id,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: EventStatus,
    pub conditions: Vec<EventCondition>,
    pub created_by: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidTimeWindow,
    EmptyTitle,
    StorageError,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
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
impl UseCase for CreateEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.title.trim().is_empty() {
            return Err(UseCaseError::EmptyTitle);
        }
        if !Event::has_valid_window(&self.start_date, &self.end_date) {
            return Err(UseCaseError::InvalidTimeWindow);
        }

        let now = ctx.sys.get_utc_datetime();
        let event = Event {
            id: Default::default(),
            title: self.title.clone(),
            description: self.description.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            status: self.status,
            conditions: self.conditions.clone(),
            created_by: self.created_by.clone(),
            deleted_at: None,
            created: now,
            updated: now,
        };

        ctx.repos
            .events
            .insert(&event)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(event)
    }
}

impl PermissionBoundary for CreateEventUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ManageEvents]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Duration;

    fn usecase_with_window(start: DateTime<Utc>, end: DateTime<Utc>) -> CreateEventUseCase {
        CreateEventUseCase {
            title: "Summer login festival".into(),
            description: None,
            start_date: start,
            end_date: end,
            status: EventStatus::Active,
            conditions: vec![EventCondition::LoginStreak {
                value: 3,
                description: None,
            }],
            created_by: ID::new(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_event() {
        let ctx = Context::create_inmemory();
        let now = Utc::now();
        let mut usecase = usecase_with_window(now, now + Duration::days(7));

        let res = usecase.execute(&ctx).await;
        assert!(res.is_ok());
        let event = res.unwrap();
        assert_eq!(event.status, EventStatus::Active);
        assert!(ctx.repos.events.find(&event.id).await.is_some());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_time_window() {
        let ctx = Context::create_inmemory();
        let now = Utc::now();

        let mut usecase = usecase_with_window(now, now);
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::InvalidTimeWindow
        );

        let mut usecase = usecase_with_window(now, now - Duration::hours(1));
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::InvalidTimeWindow
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_empty_title() {
        let ctx = Context::create_inmemory();
        let now = Utc::now();
        let mut usecase = usecase_with_window(now, now + Duration::days(1));
        usecase.title = "   ".into();

        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::EmptyTitle
        );
    }
}
