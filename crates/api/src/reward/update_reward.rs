use crate::error::FestivoError;
use crate::shared::{
    auth::{protect_route, Permission},
    usecase::{execute_with_policy, PermissionBoundary, UseCase},
};
use actix_web::{web, HttpRequest, HttpResponse};
use festivo_api_structs::update_reward::*;
use festivo_domain::{Reward, RewardType, ID};
use festivo_infra::Context;

pub async fn update_reward_controller(
    http_req: HttpRequest,
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<Context>,
) -> Result<HttpResponse, FestivoError> {
    let (_user_id, policy) = protect_route(&http_req)?;

    let body = body.0;
    let usecase = UpdateRewardUseCase {
        reward_id: path_params.reward_id.clone(),
        name: body.name,
        reward_type: body.reward_type,
        quantity: body.quantity,
        details: body.details,
        stock: body.stock,
    };

    execute_with_policy(usecase, &policy, &ctx)
        .await
        .map(|reward| HttpResponse::Ok().json(APIResponse::new(reward)))
        .map_err(FestivoError::from)
}

#[derive(Debug)]
pub struct UpdateRewardUseCase {
    pub reward_id: ID,
    pub name: Option<String>,
    pub reward_type: Option<RewardType>,
    pub quantity: Option<i64>,
    pub details: Option<serde_json::Value>,
    pub stock: Option<i64>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    InvalidQuantity,
    InvalidStock,
    StorageError,
}

impl From<UseCaseError> for FestivoError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reward_id) => {
                Self::NotFound(format!("The reward with id: {}, was not found.", reward_id))
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
impl UseCase for UpdateRewardUseCase {
    type Response = Reward;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateReward";

    async fn execute(&mut self, ctx: &Context) -> Result<Self::Response, Self::Error> {
        let mut reward = ctx
            .repos
            .rewards
            .find(&self.reward_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reward_id.clone()))?;

        if let Some(quantity) = self.quantity {
            if quantity <= 0 {
                return Err(UseCaseError::InvalidQuantity);
            }
            reward.quantity = quantity;
        }
        if let Some(stock) = self.stock {
            if !Reward::has_valid_stock(&Some(stock)) {
                return Err(UseCaseError::InvalidStock);
            }
            reward.stock = Some(stock);
        }
        if let Some(name) = &self.name {
            reward.name = name.clone();
        }
        if let Some(reward_type) = self.reward_type {
            reward.reward_type = reward_type;
        }
        if let Some(details) = &self.details {
            reward.details = Some(details.clone());
        }
        reward.updated = ctx.sys.get_utc_datetime();

        ctx.repos
            .rewards
            .save(&reward)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(reward)
    }
}

impl PermissionBoundary for UpdateRewardUseCase {
    fn permissions(&self) -> Vec<Permission> {
        vec![Permission::ManageRewards]
    }
}
