use std::io::Write;
use std::path::Path;

use base::settings::Settings;
use log::LevelFilter;

#[test]
fn should_read_settings_from_env_file() {
    let dir = tempfile::tempdir().unwrap();
    let env_file_path = dir.path().join("wizard.env");

    let mut env_file = std::fs::File::create(&env_file_path).unwrap();
    writeln!(env_file, "MODIFIERS_CSV_FILE=catalogs/modifiers.csv").unwrap();
    writeln!(env_file, "WIZARD_SESSION_KEY_PREFIX=test-session:").unwrap();
    writeln!(env_file, "LOG_LEVEL=warn").unwrap();
    env_file.flush().unwrap();

    dotenv::from_filename(&env_file_path).unwrap();

    let settings = Settings::from_env().unwrap();

    assert_eq!(
        settings.modifiers_csv_file().unwrap(),
        Path::new("catalogs/modifiers.csv")
    );
    assert_eq!(settings.session_key("42"), "test-session:42");
    assert_eq!(settings.log_level, LevelFilter::Warn);
}
