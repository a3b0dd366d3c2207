use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::get_events::*;
use festivo_domain::{Event, EventStatus};
use festivo_infra::Context;

pub async fn get_events_controller(
    http_req: HttpRequest,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (_user_id, policy) = protect_route(&http_req)?;

    let usecase = GetEventsUseCase {
        status: query_params.status,
        include_deleted: query_params.show_deleted.unwrap_or(false),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|events| HttpResponse::Ok().json(APIResponse::new(events)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct GetEventsUseCase {
    pub status: Option<EventStatus>,
    pub include_deleted: bool,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventsUseCase {
    type Response = Vec<Event>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEvents";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .find_all(self.status, self.include_deleted)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

impl PermissionBoundary for GetEventsUseCase {
    fn permissions(&self) -> Vec<Permission> {
        if self.include_deleted {
            vec![Permission::ViewDeletedEvents]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, Utc};

    async fn seed_event(ctx: &Context, title: &str, status: EventStatus) -> Event {
        let now = Utc::now();
        let event = Event {
            id: Default::default(),
            title: title.into(),
            description: None,
            start_date: now,
            end_date: now + Duration::days(1),
            status,
            conditions: Vec::new(),
            created_by: Default::default(),
            deleted_at: None,
            created: now,
            updated: now,
        };
        ctx.repos.events.insert(&event).await.unwrap();
        event
    }

    #[actix_web::main]
    #[test]
    async fn filters_by_status() {
        let ctx = Context::create_inmemory();
        seed_event(&ctx, "active one", EventStatus::Active).await;
        seed_event(&ctx, "scheduled one", EventStatus::Scheduled).await;

        let mut usecase = GetEventsUseCase {
            status: Some(EventStatus::Active),
            include_deleted: false,
        };
        let events = usecase.execute(&ctx).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "active one");

        let mut usecase = GetEventsUseCase {
            status: None,
            include_deleted: false,
        };
        assert_eq!(usecase.execute(&ctx).await.unwrap().len(), 2);
    }

    #[actix_web::main]
    #[test]
    async fn hides_soft_deleted_events_by_default() {
        let ctx = Context::create_inmemory();
        let event = seed_event(&ctx, "short lived", EventStatus::Active).await;
        ctx.repos
            .events
            .soft_delete(&event.id, Utc::now())
            .await
            .unwrap();

        let mut usecase = GetEventsUseCase {
            status: None,
            include_deleted: false,
        };
        assert!(usecase.execute(&ctx).await.unwrap().is_empty());

        let mut usecase = GetEventsUseCase {
            status: None,
            include_deleted: true,
        };
        assert_eq!(usecase.execute(&ctx).await.unwrap().len(), 1);
    }

    #[test]
    fn deleted_listing_needs_elevated_permission() {
        let usecase = GetEventsUseCase {
            status: None,
            include_deleted: true,
        };
        assert_eq!(usecase.permissions(), vec![Permission::ViewDeletedEvents]);

        let usecase = GetEventsUseCase {
            status: None,
            include_deleted: false,
        };
        assert!(usecase.permissions().is_empty());
    }
}
