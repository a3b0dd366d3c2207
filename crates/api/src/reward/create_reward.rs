use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::create_reward::*;
use festivo_domain::{Reward, RewardType, ID};
use festivo_infra::Context;

pub async fn create_reward_controller(
    http_req: HttpRequest,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (user_id, policy) = protect_route(&http_req)?;

    let body = body.0;
    let usecase = CreateRewardUseCase {
        event_id: body.event_id,
        name: body.name,
        reward_type: body.reward_type,
        quantity: body.quantity,
        details: body.details,
        stock: body.stock,
        created_by: user_id,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|reward| HttpResponse::Created().json(APIResponse::new(reward)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct CreateRewardUseCase {
    pub event_id: ID,
    pub name: String,
    pub reward_type: RewardType,
    pub quantity: i64,
    pub details: Option<serde_json::Value>,
    pub stock: Option<i64>,
    pub created_by: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    EventNotFound(ID),
    InvalidQuantity,
    InvalidStock,
    StorageError,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EventNotFound(event_id) => {
                Self::NotFound(format!("The event with id: {}, was not found.", event_id))
            }
            UseCaseError::InvalidQuantity => {
                Self::BadClientData("The reward quantity must be positive".into())
            }
            UseCaseError::InvalidStock => {
                Self::BadClientData("The reward stock must not be negative".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateRewardUseCase {
    type Response = Reward;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReward";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        if self.quantity <= 0 {
            return Err(UseCaseError::InvalidQuantity);
        }
        if !Reward::has_valid_stock(&self.stock) {
            return Err(UseCaseError::InvalidStock);
        }

        if ctx.repos.events.find(&self.event_id).await.is_none() {
            return Err(UseCaseError::EventNotFound(self.event_id.clone()));
        }

        let now = ctx.sys.get_utc_datetime();
        let reward = Reward {
            id: Default::default(),
            event_id: self.event_id.clone(),
            name: self.name.clone(),
            reward_type: self.reward_type,
            quantity: self.quantity,
            details: self.details.clone(),
            stock: self.stock,
            created_by: self.created_by.clone(),
            created: now,
            updated: now,
        };

        ctx.repos
            .rewards
            .insert(&reward)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reward)
    }
}

impl PermissionBoundary for CreateRewardUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ManageRewards]
    }
}
