use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::delete_event::*;
use festivo_domain::{Event, ID};
use festivo_infra::Context;

pub async fn delete_event_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (_user_id, policy) = protect_route(&http_req)?;

    let usecase = DeleteEventUseCase {
        event_id: path_params.event_id.clone(),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct DeleteEventUseCase {
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
impl UseCase for DeleteEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteEvent";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        // Soft delete keeps the event document for auditing. A second
        // delete of the same event reports not found.
        ctx.repos
            .events
            .soft_delete(&self.event_id, ctx.sys.get_utc_datetime())
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.event_id.clone()))
    }
}

impl PermissionBoundary for DeleteEventUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ManageEvents]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, Utc};
    use festivo_domain::EventStatus;

    #[actix_web::main]
    #[test]
    async fn soft_deletes_and_refuses_a_second_delete() {
        let ctx = Context::create_inmemory();
        let now = Utc::now();
        let event = Event {
            id: Default::default(),
            title: "One shot".into(),
            description: None,
            start_date: now,
            end_date: now + Duration::days(1),
            status: EventStatus::Active,
            conditions: Vec::new(),
            created_by: Default::default(),
            deleted_at: None,
            created: now,
            updated: now,
        };
        ctx.repos.events.insert(&event).await.unwrap();

        let mut usecase = DeleteEventUseCase {
            event_id: event.id.clone(),
        };
        let deleted = usecase.execute(&ctx).await.unwrap();
        assert!(deleted.is_deleted());

        // gone from regular reads
        assert!(ctx.repos.events.find(&event.id).await.is_none());

        let mut usecase = DeleteEventUseCase {
            event_id: event.id.clone(),
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::NotFound(event.id)
        );
    }
}
