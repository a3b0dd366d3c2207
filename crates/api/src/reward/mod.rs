mod create_reward;
mod delete_reward;
mod get_event_rewards;
mod get_reward;
mod update_reward;

use actix_web::web;
use create_reward::create_reward_controller;
use delete_reward::delete_reward_controller;
use get_event_rewards::get_event_rewards_controller;
use get_reward::get_reward_controller;
use update_reward::update_reward_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/rewards", web::post().to(create_reward_controller));
    cfg.route(
        "/events/{event_id}/rewards",
        web::get().to(get_event_rewards_controller),
    );
    cfg.route("/rewards/{reward_id}", web::get().to(get_reward_controller));
    cfg.route(
        "/rewards/{reward_id}",
        web::put().to(update_reward_controller),
    );
    cfg.route(
        "/rewards/{reward_id}",
        web::delete().to(delete_reward_controller),
    );
}
