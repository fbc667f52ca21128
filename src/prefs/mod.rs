pub mod client_id;
pub mod connection;
pub mod store;

pub use client_id::{generate_client_token, hash_client_token, CLIENT_COOKIE};
pub use connection::{init_db, PrefsDb};
pub use store::{load_prefs, save_prefs, ScreenPrefs, DEFAULT_PER_PAGE, PER_PAGE_CHOICES};
