use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::get_event::*;
use festivo_domain::{Event, ID};
use festivo_infra::Context;

pub async fn get_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (_user_id, policy) = protect_route(&http_req)?;

    let usecase = GetEventUseCase {
        event_id: path_params.event_id.clone(),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct GetEventUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEvent";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .events
            .find(&self.event_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))
    }
}

impl PermissionBoundary for GetEventUseCase {
    fn permissions(&self) -> Vec<Permission> {
        Vec::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, Utc};
    use festivo_domain::EventStatus;

    #[actix_web::main]
    #[test]
    async fn returns_stored_event() {
        let ctx = Context::create_inmemory();
        let now = Utc::now();
        let event = Event {
            id: Default::default(),
            title: "Quest marathon".into(),
            description: None,
            start_date: now,
            end_date: now + Duration::days(3),
            status: EventStatus::Scheduled,
            conditions: Vec::new(),
            created_by: Default::default(),
            deleted_at: None,
            created: now,
            updated: now,
        };
        ctx.repos.events.insert(&event).await.unwrap();

        let mut usecase = GetEventUseCase {
            event_id: event.id.clone(),
        };
        let res = usecase.execute(&ctx).await.unwrap();
        assert_eq!(res.title, "Quest marathon");
    }

    #[actix_web::main]
    #[test]
    async fn unknown_id_is_not_found() {
        let ctx = Context::create_inmemory();
        let mut usecase = GetEventUseCase { event_id: ID::new() };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::NotFound(usecase.event_id.clone())
        );
    }
}
