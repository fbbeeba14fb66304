mod activity_feed;
mod admin_panel;
mod game_status;
mod layout;
mod prize_pool_card;
mod round_history;
mod staking_panel;
mod timer_display;
mod toast;
mod wallet_button;

pub use activity_feed::ActivityFeed;
pub use admin_panel::AdminPanel;
pub use game_status::GameStatus;
pub use layout::{Layout, NavLink};
pub use prize_pool_card::PrizePoolCard;
pub use round_history::RoundHistory;
pub use staking_panel::StakingPanel;
pub use timer_display::TimerDisplay;
pub use toast::Toasts;
pub use wallet_button::WalletButton;
pub use wallet_button::send_transaction;
