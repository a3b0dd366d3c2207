use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::get_event_rewards::*;
use festivo_domain::{Reward, ID};
use festivo_infra::Context;

pub async fn get_event_rewards_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (_user_id, policy) = protect_route(&http_req)?;

    let usecase = GetEventRewardsUseCase {
        event_id: path_params.event_id.clone(),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|rewards| HttpResponse::Ok().json(APIResponse::new(rewards)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct GetEventRewardsUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventRewardsUseCase {
    type Response = Vec<Reward>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEventRewards";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::EventNotFound(self.event_id.clone()));
        }

        ctx.repos
            .rewards
            .find_by_event(&self.event_id)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

impl PermissionBoundary for GetEventRewardsUseCase {
    fn permissions(&self) -> Vec<Permission> {
        Vec::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{Duration, Utc};
    use festivo_domain::{Event, EventStatus, RewardType};

    #[actix_web::main]
    #[test]
    async fn lists_only_the_events_rewards() {
        let ctx = Context::create_inmemory();
        let now = Utc::now();
        let mut events = Vec::new();
        for title in ["first", "second"] {
            let event = Event {
                id: Default::default(),
                title: title.into(),
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
            let reward = Reward {
                id: Default::default(),
                event_id: event.id.clone(),
                name: format!("reward of {}", title),
                reward_type: RewardType::Item,
                quantity: 1,
                details: None,
                stock: None,
                created_by: Default::default(),
                created: now,
                updated: now,
            };
            ctx.repos.rewards.insert(&reward).await.unwrap();
            events.push(event);
        }

        let mut usecase = GetEventRewardsUseCase {
            event_id: events[0].id.clone(),
        };
        let rewards = usecase.execute(&ctx).await.unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].name, "reward of first");
    }

    #[actix_web::main]
    #[test]
    async fn unknown_event_is_not_found() {
        let ctx = Context::create_inmemory();
        let mut usecase = GetEventRewardsUseCase { event_id: ID::new() };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::EventNotFound(usecase.event_id.clone())
        );
    }
}
