pub mod cache;
pub mod draw_service;
pub mod participant_service;
pub mod prize_service;
pub mod winner_service;

pub use cache::SessionCache;
pub use draw_service::DrawService;
pub use participant_service::ParticipantService;
pub use prize_service::PrizeService;
pub use winner_service::WinnerService;
