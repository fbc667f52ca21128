use crate::errors::ServerError;
use crate::pipeline::{SortDir, SortSpec};
use crate::prefs::connection::PrefsDb;
use rusqlite::{params, OptionalExtension};
use std::time::{SystemTime, UNIX_EPOCH};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const PER_PAGE_CHOICES: [usize; 4] = [10, 25, 50, 100];

/// Per-screen UI preferences: items-per-page, last sort, last view mode.
/// A scoped cache, not a durable store: reads fall back to defaults on
/// any problem, and writes are best-effort.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenPrefs {
    pub per_page: usize,
    pub sort_field: String,
    pub sort_dir: SortDir,
    pub view_mode: String,
}

impl ScreenPrefs {
    pub fn default_for(default_sort_field: &str) -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            sort_field: default_sort_field.to_string(),
            sort_dir: SortDir::Desc,
            view_mode: "table".to_string(),
        }
    }

    pub fn sort_spec(&self) -> SortSpec {
        SortSpec::new(self.sort_field.clone(), self.sort_dir)
    }
}

/// Fail-soft read: missing database, missing row, or a corrupt value all
/// come back as the defaults. Screen rendering never fails on a bad cache.
pub fn load_prefs(
    db: &PrefsDb,
    client_hash: &[u8; 32],
    screen: &str,
    default_sort_field: &str,
) -> ScreenPrefs {
    let loaded = db.with_conn(|conn| {
        conn.query_row(
            r#"
            select per_page, sort_field, sort_dir, view_mode
            from ui_prefs
            where client_hash = ? and screen = ?
            "#,
            params![client_hash.as_slice(), screen],
            |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| ServerError::PrefsError(format!("prefs lookup failed: {e}")))
    });

    match loaded {
        Ok(Some((per_page, sort_field, sort_dir, view_mode))) => {
            let defaults = ScreenPrefs::default_for(default_sort_field);
            // Discard out-of-range values a stale or tampered row may hold.
            let per_page = usize::try_from(per_page)
                .ok()
                .filter(|n| PER_PAGE_CHOICES.contains(n))
                .unwrap_or(defaults.per_page);
            let sort_field = if sort_field.trim().is_empty() {
                defaults.sort_field
            } else {
                sort_field
            };
            ScreenPrefs {
                per_page,
                sort_field,
                sort_dir: SortDir::parse(&sort_dir),
                view_mode: if view_mode.is_empty() {
                    defaults.view_mode
                } else {
                    view_mode
                },
            }
        }
        Ok(None) => ScreenPrefs::default_for(default_sort_field),
        Err(e) => {
            eprintln!("Preferences read failed, using defaults: {e}");
            ScreenPrefs::default_for(default_sort_field)
        }
    }
}

/// Best-effort write; failures are logged and ignored.
pub fn save_prefs(db: &PrefsDb, client_hash: &[u8; 32], screen: &str, prefs: &ScreenPrefs) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0);

    let result = db.with_conn(|conn| {
        conn.execute(
            r#"
            insert into ui_prefs (client_hash, screen, per_page, sort_field, sort_dir, view_mode, updated_at)
            values (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            on conflict(client_hash, screen) do update set
                per_page = excluded.per_page,
                sort_field = excluded.sort_field,
                sort_dir = excluded.sort_dir,
                view_mode = excluded.view_mode,
                updated_at = excluded.updated_at
            "#,
            params![
                client_hash.as_slice(),
                screen,
                prefs.per_page as i64,
                prefs.sort_field,
                prefs.sort_dir.as_str(),
                prefs.view_mode,
                now,
            ],
        )
        .map_err(|e| ServerError::PrefsError(format!("prefs save failed: {e}")))?;
        Ok(())
    });

    if let Err(e) = result {
        eprintln!("Preferences write failed (ignored): {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::client_id::hash_client_token;
    use crate::prefs::connection::{init_db, PrefsDb};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn make_db() -> PrefsDb {
        let path = std::env::temp_dir().join(format!(
            "prefs_test_{}.sqlite",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        let db = PrefsDb::new(path.to_string_lossy().to_string());
        init_db(&db, "sql/schema.sql").expect("Failed to initialize prefs DB");
        db
    }

    #[test]
    fn missing_row_falls_back_to_defaults() {
        let db = make_db();
        let hash = hash_client_token("someone");
        let prefs = load_prefs(&db, &hash, "blotter", "created_at");
        assert_eq!(prefs, ScreenPrefs::default_for("created_at"));
    }

    #[test]
    fn saved_prefs_round_trip() {
        let db = make_db();
        let hash = hash_client_token("someone");
        let mut prefs = ScreenPrefs::default_for("created_at");
        prefs.per_page = 50;
        prefs.sort_field = "complainant".to_string();
        prefs.sort_dir = SortDir::Asc;
        save_prefs(&db, &hash, "blotter", &prefs);

        let loaded = load_prefs(&db, &hash, "blotter", "created_at");
        assert_eq!(loaded, prefs);

        // Scoped per screen and per client.
        let other_screen = load_prefs(&db, &hash, "appointments", "created_at");
        assert_eq!(other_screen, ScreenPrefs::default_for("created_at"));
        let other_client = load_prefs(&db, &hash_client_token("else"), "blotter", "created_at");
        assert_eq!(other_client, ScreenPrefs::default_for("created_at"));
    }

    #[test]
    fn corrupt_per_page_is_discarded() {
        let db = make_db();
        let hash = hash_client_token("someone");
        db.with_conn(|conn| {
            conn.execute(
                "insert into ui_prefs (client_hash, screen, per_page, sort_field, sort_dir, view_mode, updated_at)
                 values (?, 'blotter', -3, 'created_at', 'sideways', 'table', 0)",
                params![hash.as_slice()],
            )
            .unwrap();
            Ok(())
        })
        .unwrap();

        let prefs = load_prefs(&db, &hash, "blotter", "created_at");
        assert_eq!(prefs.per_page, DEFAULT_PER_PAGE);
        // Unknown direction string parses to ascending rather than erroring.
        assert_eq!(prefs.sort_dir, SortDir::Asc);
    }

    #[test]
    fn unreadable_database_still_yields_defaults() {
        let db = PrefsDb::new("/definitely/not/a/real/path/prefs.sqlite");
        let hash = hash_client_token("someone");
        let prefs = load_prefs(&db, &hash, "blotter", "created_at");
        assert_eq!(prefs, ScreenPrefs::default_for("created_at"));
    }
}
