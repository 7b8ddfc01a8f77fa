//! Client for a Firebase bridge backend.
//!
//! [`DataBridge`] holds a [`Configuration`] and hands out one client per capability. Every
//! client sends its requests through the shared [`core::Dispatcher`], which attaches the
//! configuration headers and turns any remote failure into `{"error": "..."}`.

#[cfg(feature = "auth")]
pub mod auth;
#[cfg(feature = "azure")]
pub mod azure;
pub mod config;
pub mod core;
#[cfg(feature = "firestore")]
pub mod firestore;
#[cfg(feature = "realtime")]
pub mod realtime;
#[cfg(feature = "storage")]
pub mod storage;

#[cfg(feature = "auth")]
use auth::FirebaseAuth;
pub use config::Configuration;
#[cfg(feature = "firestore")]
use firestore::FirebaseFirestore;
#[cfg(feature = "realtime")]
use realtime::FirebaseRealtime;
#[cfg(feature = "storage")]
use storage::FirebaseStorage;

/// Entry point handing out capability clients that share one configuration.
///
/// Each accessor builds a new client, which captures the configuration's headers at that moment.
#[derive(Debug, Clone)]
pub struct DataBridge {
    config: Configuration,
}

impl DataBridge {
    pub fn new(config: Configuration) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Mutable access to the configuration. Only clients created afterwards see the changes.
    pub fn config_mut(&mut self) -> &mut Configuration {
        &mut self.config
    }

    #[cfg(feature = "auth")]
    pub fn auth(&self) -> FirebaseAuth {
        FirebaseAuth::new(&self.config)
    }

    #[cfg(feature = "firestore")]
    pub fn firestore(&self) -> FirebaseFirestore {
        FirebaseFirestore::new(&self.config)
    }

    #[cfg(feature = "realtime")]
    pub fn realtime(&self) -> FirebaseRealtime {
        FirebaseRealtime::new(&self.config)
    }

    #[cfg(feature = "storage")]
    pub fn storage(&self) -> FirebaseStorage {
        FirebaseStorage::new(&self.config)
    }
}
