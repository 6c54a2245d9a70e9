use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::devices::{Geolocator, Position, UrlOpener};

/// Platform family that decides the dispatch strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Ios,
    Android,
    Other,
}

impl Platform {
    pub fn from_user_agent(user_agent: &str) -> Self {
        let ua = user_agent.to_ascii_lowercase();
        if ["iphone", "ipad", "ipod"].iter().any(|d| ua.contains(d)) {
            Platform::Ios
        } else if ua.contains("android") {
            Platform::Android
        } else {
            Platform::Other
        }
    }
}

/// Navigation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Pin the platform instead of sniffing the user agent
    pub platform: Option<Platform>,
    /// User agent to classify when no platform is pinned
    pub user_agent: Option<String>,
}

impl NavigationConfig {
    pub fn resolve_platform(&self) -> Platform {
        self.platform.unwrap_or_else(|| {
            self.user_agent
                .as_deref()
                .map(Platform::from_user_agent)
                .unwrap_or(Platform::Other)
        })
    }
}

/// Walking-directions URIs for one origin/destination pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTargets {
    pub google_maps_app: String,
    pub apple_maps: String,
    pub web: String,
}

impl NavigationTargets {
    pub fn new(origin: Position, destination: &str) -> Self {
        let origin = origin.as_query();
        let destination = urlencoding::encode(destination);

        Self {
            google_maps_app: format!(
                "comgooglemaps://?saddr={}&daddr={}&directionsmode=walking&nav=1",
                origin, destination
            ),
            apple_maps: format!(
                "maps://maps.apple.com/?saddr={}&daddr={}&dirflg=w",
                origin, destination
            ),
            web: format!(
                "https://www.google.com/maps/dir/?api=1&origin={}&destination={}&travelmode=walking",
                origin, destination
            ),
        }
    }
}

/// Search URL used when the current position is unknown
pub fn search_fallback_url(destination: &str) -> String {
    format!(
        "https://www.google.com/maps/search/{}",
        urlencoding::encode(destination)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTarget {
    /// Redirect the current context (native app schemes)
    InPlace,
    /// Open a new context
    NewContext,
}

/// One URL open, relative to the start of dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledOpen {
    pub delay: Duration,
    pub url: String,
    pub target: OpenTarget,
}

impl ScheduledOpen {
    fn new(delay_ms: u64, url: &str, target: OpenTarget) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            url: url.to_string(),
            target,
        }
    }
}

/// Staggered attempts: a native scheme that silently fails leaves the client
/// in place, so each later entry is the fallback for the one before it.
pub fn plan_navigation(platform: Platform, targets: &NavigationTargets) -> Vec<ScheduledOpen> {
    match platform {
        Platform::Ios => vec![
            ScheduledOpen::new(0, &targets.google_maps_app, OpenTarget::InPlace),
            ScheduledOpen::new(1000, &targets.apple_maps, OpenTarget::InPlace),
            ScheduledOpen::new(2000, &targets.web, OpenTarget::NewContext),
        ],
        Platform::Android => vec![
            ScheduledOpen::new(0, &targets.google_maps_app, OpenTarget::InPlace),
            ScheduledOpen::new(1000, &targets.web, OpenTarget::NewContext),
        ],
        Platform::Other => vec![ScheduledOpen::new(0, &targets.web, OpenTarget::NewContext)],
    }
}

/// Resolves the current position and opens map targets
pub struct NavigationDispatcher {
    platform: Platform,
    geolocator: Arc<dyn Geolocator>,
    opener: Arc<dyn UrlOpener>,
    alive: Arc<AtomicBool>,
}

impl NavigationDispatcher {
    pub fn new(
        platform: Platform,
        geolocator: Arc<dyn Geolocator>,
        opener: Arc<dyn UrlOpener>,
        alive: Arc<AtomicBool>,
    ) -> Self {
        Self {
            platform,
            geolocator,
            opener,
            alive,
        }
    }

    /// Navigate to `destination`, returning the schedule that was executed
    pub async fn navigate(&self, destination: &str) -> Vec<ScheduledOpen> {
        info!("Handling navigation for: {}", destination);

        let plan = match self.geolocator.current_position().await {
            Ok(position) => {
                plan_navigation(self.platform, &NavigationTargets::new(position, destination))
            }
            Err(e) => {
                warn!("Error getting location: {}", e);
                vec![ScheduledOpen::new(
                    0,
                    &search_fallback_url(destination),
                    OpenTarget::NewContext,
                )]
            }
        };

        self.execute(&plan).await;
        plan
    }

    /// Open each entry at its delay; stops early if the application was reset
    pub async fn execute(&self, plan: &[ScheduledOpen]) {
        let start = Instant::now();

        for entry in plan {
            tokio::time::sleep_until(start + entry.delay).await;

            if !self.alive.load(Ordering::SeqCst) {
                info!("Application was reset, abandoning navigation");
                return;
            }

            match entry.target {
                OpenTarget::InPlace => self.opener.open_in_place(&entry.url),
                OpenTarget::NewContext => self.opener.open_new_context(&entry.url),
            }
        }
    }
}
