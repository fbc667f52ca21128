use crate::api::models::{Announcement, Appointment, BlotterRecord, Program};
use crate::api::BackendClient;
use crate::config::Config;
use crate::errors::ServerError;
use crate::pipeline::RecordStore;
use crate::prefs::PrefsDb;
use std::sync::Mutex;

/// Everything the request handlers share: the backend client, the
/// preferences handle, and one record store per list screen. Stores cache
/// the last-good snapshot between requests; the backend stays the source
/// of truth.
pub struct AppState {
    pub config: Config,
    pub client: BackendClient,
    pub prefs: PrefsDb,
    pub blotters: Mutex<RecordStore<BlotterRecord>>,
    pub appointments: Mutex<RecordStore<Appointment>>,
    pub announcements: Mutex<RecordStore<Announcement>>,
    pub programs: Mutex<RecordStore<Program>>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ServerError> {
        let client = BackendClient::new(config.backend_base_url.clone())
            .map_err(|e| ServerError::Backend(e.to_string()))?;
        let prefs = PrefsDb::new(config.prefs_db_path.clone());

        Ok(Self {
            config,
            client,
            prefs,
            blotters: Mutex::new(RecordStore::new()),
            appointments: Mutex::new(RecordStore::new()),
            announcements: Mutex::new(RecordStore::new()),
            programs: Mutex::new(RecordStore::new()),
        })
    }
}
