mod condition;
mod event;
mod reward;
mod reward_request;
mod shared;

pub use condition::EventCondition;
pub use event::{Event, EventStatus};
pub use reward::{Reward, RewardType};
pub use reward_request::{
    RewardRequest, RewardRequestStatus, StatusTransitionError, TransactionDetails,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
