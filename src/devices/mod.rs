//! Device and platform collaborators
//!
//! Everything the client needs from the outside world is expressed as a trait
//! here: permission queries, microphone and camera handles, geolocation,
//! haptics, audio output, URL opening and UI affordances. `local` provides
//! file- and log-backed implementations for headless runs.

mod location;
mod media;
mod output;
mod permissions;

pub mod local;

pub use location::{Geolocator, Position};
pub use media::{FrameGrabber, Microphone, MotionSource};
pub use output::{AudioClip, AudioSink, CameraView, Haptics, Playback, UiHooks, UrlOpener};
pub use permissions::{request_permissions, Capability, PermissionProvider, PermissionState};
