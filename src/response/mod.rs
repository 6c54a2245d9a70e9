//! Response playback and navigation dispatch

mod navigation;
mod player;

pub use navigation::{
    plan_navigation, search_fallback_url, NavigationConfig, NavigationDispatcher,
    NavigationTargets, OpenTarget, Platform, ScheduledOpen,
};
pub use player::{decode_clip, ResponsePlayer};
