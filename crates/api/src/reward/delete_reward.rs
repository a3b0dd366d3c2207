use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::delete_reward::*;
use festivo_domain::{Reward, ID};
use festivo_infra::Context;

pub async fn delete_reward_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (_user_id, policy) = protect_route(&http_req)?;

    let usecase = DeleteRewardUseCase {
        reward_id: path_params.reward_id.clone(),
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|reward| HttpResponse::Ok().json(APIResponse::new(reward)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct DeleteRewardUseCase {
    pub reward_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reward_id) => {
                Self::NotFound(format!("The reward with id: {}, was not found.", reward_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteRewardUseCase {
    type Response = Reward;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteReward";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .rewards
            .delete(&self.reward_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reward_id.clone()))
    }
}

impl PermissionBoundary for DeleteRewardUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ManageRewards]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::Utc;
    use festivo_domain::RewardType;

    #[actix_web::main]
    #[test]
    async fn deletes_reward() {
        let ctx = Context::create_inmemory();
        let now = Utc::now();
        let reward = Reward {
            id: Default::default(),
            event_id: Default::default(),
            name: "Limited badge".into(),
            reward_type: RewardType::Item,
            quantity: 1,
            details: None,
            stock: Some(5),
            created_by: Default::default(),
            created: now,
            updated: now,
        };
        ctx.repos.rewards.insert(&reward).await.unwrap();

        let mut usecase = DeleteRewardUseCase {
            reward_id: reward.id.clone(),
        };
        assert!(usecase.execute(&ctx).await.is_ok());
        assert!(ctx.repos.rewards.find(&reward.id).await.is_none());

        let mut usecase = DeleteRewardUseCase {
            reward_id: reward.id.clone(),
        };
        assert_eq!(
            usecase.execute(&ctx).await.unwrap_err(),
            UseCaseError::NotFound(reward.id)
        );
    }
}
