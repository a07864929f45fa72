//! Instruction handlers for the Pooled Staking program.

pub mod add_reward_stream;
pub mod admin;
pub mod claim_rewards;
pub mod create_pool;
pub mod deposit;
pub mod emergency_withdraw;
pub mod fund_rewards;
pub mod initialize_registry;
pub mod withdraw;

pub use add_reward_stream::*;
pub use admin::*;
pub use claim_rewards::*;
pub use create_pool::*;
pub use deposit::*;
pub use emergency_withdraw::*;
pub use fund_rewards::*;
pub use initialize_registry::*;
pub use withdraw::*;
