pub mod notifications;
pub mod settings;

// Re-exports for convenience
pub use notifications::{
    LocationFix, NotificationProgress, NotificationSink, RouteFollower, TurnNotificationScheduler,
    lead_distance_meters,
};
pub use settings::{Settings, SettingsError, SettingsProvider};
pub use turnsound_types::{LengthUnits, TurnDirection, TurnItem, TurnNotification};
