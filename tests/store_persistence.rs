//! Store behavior: defaults on absent or malformed records, field-by-field
//! config upgrades, atomic persistence and reset.

use propmon::application::AccountService;
use propmon::domain::config::GlobalConfig;
use propmon::infrastructure::Store;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn temp_store() -> (Store, TempDir) {
    let dir = TempDir::new().expect("temp dir");
    (Store::with_dir(dir.path().to_path_buf()), dir)
}

#[test]
fn absent_records_yield_defaults() {
    let (store, _dir) = temp_store();

    assert!(store.load_accounts().is_empty());
    assert_eq!(store.load_config(), GlobalConfig::default());
}

#[test]
fn accounts_round_trip_through_disk() {
    let (store, _dir) = temp_store();

    let mut service = AccountService::new(Vec::new());
    let id = service.create_account().id;
    service.add_profit(&id, dec!(250)).unwrap();
    service.add_profit(&id, dec!(-75)).unwrap();

    store.save_accounts(service.accounts()).unwrap();

    let loaded = store.load_accounts();
    assert_eq!(loaded, service.accounts());
}

#[test]
fn config_round_trip_through_disk() {
    let (store, _dir) = temp_store();

    let config = GlobalConfig {
        target_profit_threshold: dec!(175),
        required_days: 4,
        max_drawdown: dec!(1500),
        post_payout_liquidation_level: dec!(-100),
        subsequent_payout_ratio: 60,
    };
    store.save_config(&config).unwrap();

    assert_eq!(store.load_config(), config);
}

#[test]
fn malformed_records_are_treated_as_absent() {
    let (store, dir) = temp_store();

    std::fs::write(dir.path().join("accounts.json"), "not json{{").unwrap();
    std::fs::write(dir.path().join("config.json"), "[1,2,3]").unwrap();

    assert!(store.load_accounts().is_empty());
    assert_eq!(store.load_config(), GlobalConfig::default());
}

#[test]
fn partial_config_record_upgrades_missing_fields() {
    let (store, dir) = temp_store();

    // A record from the schema version before the risk-control fields
    std::fs::write(
        dir.path().join("config.json"),
        r#"{"targetProfitThreshold": 300, "requiredDays": 10}"#,
    )
    .unwrap();

    let config = store.load_config();
    assert_eq!(config.target_profit_threshold, dec!(300));
    assert_eq!(config.required_days, 10);
    assert_eq!(config.max_drawdown, dec!(2000));
    assert_eq!(config.post_payout_liquidation_level, dec!(0));
    assert_eq!(config.subsequent_payout_ratio, 50);
}

#[test]
fn reset_clears_both_records() {
    let (store, dir) = temp_store();

    let mut service = AccountService::new(Vec::new());
    service.create_account();
    store.save_accounts(service.accounts()).unwrap();
    store.save_config(&GlobalConfig::default()).unwrap();

    store.reset().unwrap();

    assert!(!dir.path().join("accounts.json").exists());
    assert!(!dir.path().join("config.json").exists());
    assert!(store.load_accounts().is_empty());
    assert_eq!(store.load_config(), GlobalConfig::default());
}

#[test]
fn save_overwrites_without_leaving_temp_files() {
    let (store, dir) = temp_store();

    store.save_config(&GlobalConfig::default()).unwrap();
    let mut changed = GlobalConfig::default();
    changed.required_days = 9;
    store.save_config(&changed).unwrap();

    assert_eq!(store.load_config().required_days, 9);
    assert!(!dir.path().join("config.tmp").exists());
}
