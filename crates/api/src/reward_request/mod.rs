mod create_reward_request;
mod get_my_reward_requests;
mod get_reward_request;
mod get_reward_requests;
mod update_reward_request_status;
mod verify_conditions;

use actix_web::web;
use create_reward_request::create_reward_request_controller;
use get_my_reward_requests::get_my_reward_requests_controller;
use get_reward_request::get_reward_request_controller;
use get_reward_requests::get_reward_requests_controller;
use update_reward_request_status::update_reward_request_status_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/reward-requests",
        web::post().to(create_reward_request_controller),
    );
    cfg.route(
        "/reward-requests",
        web::get().to(get_reward_requests_controller),
    );
    cfg.route(
        "/reward-requests/me",
        web::get().to(get_my_reward_requests_controller),
    );
    cfg.route(
        "/reward-requests/{request_id}",
        web::get().to(get_reward_request_controller),
    );
    cfg.route(
        "/reward-requests/{request_id}/status",
        web::patch().to(update_reward_request_status_controller),
    );
}
