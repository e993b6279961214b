use nice_log::{Config, ENV_VAR, Level};

#[test]
fn from_env_reads_filters() {
    // SAFETY: the only test in this binary, nothing else reads the environment concurrently
    unsafe { std::env::set_var(ENV_VAR, "warning, app::net=debug,app=bogus") };
    let config = Config::from_env();
    assert_eq!(config.level, Level::Warning);
    assert_eq!(config.threshold("app::net::tcp"), Level::Debug);
    assert_eq!(config.threshold("app"), Level::Warning);
    assert_eq!(config.target_levels.len(), 1);

    unsafe { std::env::remove_var(ENV_VAR) };
    let config = Config::from_env();
    assert_eq!(config.level, Level::Info);
    assert!(config.target_levels.is_empty());

    unsafe { std::env::set_var(ENV_VAR, "none") };
    nice_log::init();
    assert_eq!(nice_log::config().level, Level::None);
    assert!(!nice_log::error!("suppressed"));
}
