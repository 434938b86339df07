use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MedMinder";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application data directory
/// ~/MedMinder/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("MedMinder")
}

/// Path of the SQLite database holding accounts, medications and
/// notifications.
pub fn database_path() -> PathBuf {
    app_data_dir().join("medminder.db")
}

/// Path of the local reminder list (the offline flow's single storage
/// slot).
pub fn reminders_path() -> PathBuf {
    app_data_dir().join("reminders.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("MedMinder"));
    }

    #[test]
    fn storage_paths_under_app_data() {
        assert!(database_path().starts_with(app_data_dir()));
        assert!(reminders_path().ends_with("reminders.json"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }
}
