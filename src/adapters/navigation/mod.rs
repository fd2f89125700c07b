//! Navigator adapters.

mod channel_navigator;

pub use channel_navigator::ChannelNavigator;
