use chrono::NaiveDate;
use std::collections::HashSet;
use uuid::Uuid;
use wealth_tracker_core::errors::CoreError;
use wealth_tracker_core::models::analytics::{format_percent, ClassTotals, GainLoss, GroupedTotals};
use wealth_tracker_core::models::asset_class::AssetClass;
use wealth_tracker_core::models::chart::{AnnotatedSnapshot, ClassVisibility, LookbackWindow, SeriesPoint};
use wealth_tracker_core::models::ledger::Ledger;
use wealth_tracker_core::models::position::{Position, PositionDraft, PositionPatch};
use wealth_tracker_core::models::settings::{Settings, DEFAULT_PERFORMER_COUNT};
use wealth_tracker_core::models::snapshot::{MonthlyUpdate, PortfolioSnapshot};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn equity_position() -> Position {
    let draft = PositionDraft::new("  World ETF ", AssetClass::Equities, "usd", 10.0, 1200.0)
        .with_buying_price(100.0)
        .with_current_price(120.0)
        .with_source("Broker A");
    Position::from_draft(draft, d(2025, 1, 15))
}

// ═══════════════════════════════════════════════════════════════════
//  AssetClass
// ═══════════════════════════════════════════════════════════════════

mod asset_class {
    use super::*;

    #[test]
    fn parse_known_classes_case_insensitive() {
        assert_eq!(AssetClass::parse("cash"), AssetClass::Cash);
        assert_eq!(AssetClass::parse("BONDS"), AssetClass::Bonds);
        assert_eq!(AssetClass::parse(" Equities "), AssetClass::Equities);
        assert_eq!(AssetClass::parse("Alternatives"), AssetClass::Alternatives);
    }

    #[test]
    fn parse_singular_aliases() {
        assert_eq!(AssetClass::parse("bond"), AssetClass::Bonds);
        assert_eq!(AssetClass::parse("equity"), AssetClass::Equities);
        assert_eq!(AssetClass::parse("alternative"), AssetClass::Alternatives);
    }

    #[test]
    fn parse_legacy_value_kept_verbatim() {
        assert_eq!(AssetClass::parse(" Crypto "), AssetClass::Other("Crypto".into()));
        assert_eq!(AssetClass::parse("Real Estate"), AssetClass::Other("Real Estate".into()));
    }

    #[test]
    fn display() {
        assert_eq!(AssetClass::Cash.to_string(), "Cash");
        assert_eq!(AssetClass::Bonds.to_string(), "Bonds");
        assert_eq!(AssetClass::Equities.to_string(), "Equities");
        assert_eq!(AssetClass::Alternatives.to_string(), "Alternatives");
        assert_eq!(AssetClass::Other("Gold".into()).to_string(), "Gold");
    }

    #[test]
    fn only_bonds_are_bond_like() {
        assert!(AssetClass::Bonds.is_bond_like());
        assert!(!AssetClass::Cash.is_bond_like());
        assert!(!AssetClass::Other("bond fund".into()).is_bond_like());
    }

    #[test]
    fn ordering_known_before_legacy() {
        let mut classes = vec![
            AssetClass::Other("Crypto".into()),
            AssetClass::Alternatives,
            AssetClass::Other("Art".into()),
            AssetClass::Cash,
            AssetClass::Equities,
            AssetClass::Bonds,
        ];
        classes.sort();
        assert_eq!(
            classes,
            vec![
                AssetClass::Cash,
                AssetClass::Bonds,
                AssetClass::Equities,
                AssetClass::Alternatives,
                AssetClass::Other("Art".into()),
                AssetClass::Other("Crypto".into()),
            ]
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&AssetClass::Equities).unwrap(), "\"equities\"");
        assert_eq!(serde_json::to_string(&AssetClass::Other("Crypto".into())).unwrap(), "\"Crypto\"");
    }

    #[test]
    fn deserializes_legacy_and_known_strings() {
        let known: AssetClass = serde_json::from_str("\"Bonds\"").unwrap();
        assert_eq!(known, AssetClass::Bonds);
        let legacy: AssetClass = serde_json::from_str("\"P2P Loans\"").unwrap();
        assert_eq!(legacy, AssetClass::Other("P2P Loans".into()));
    }

    #[test]
    fn hashable() {
        let set: HashSet<AssetClass> = AssetClass::KNOWN.iter().cloned().collect();
        assert_eq!(set.len(), 4);
        assert!(AssetClass::KNOWN.iter().all(|c| c.is_known()));
    }

    #[test]
    fn normalized_matches_parse() {
        assert_eq!(AssetClass::Other("Cash".into()).normalized(), AssetClass::Cash);
        assert_eq!(AssetClass::Other(" bond ".into()).normalized(), AssetClass::Bonds);
        assert_eq!(
            AssetClass::Other(" crypto ".into()).normalized(),
            AssetClass::Other("crypto".into())
        );
        assert_eq!(AssetClass::Equities.normalized(), AssetClass::Equities);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Position
// ═══════════════════════════════════════════════════════════════════

mod position {
    use super::*;

    #[test]
    fn from_draft_normalizes_fields() {
        let p = equity_position();
        assert_eq!(p.name, "World ETF");
        assert_eq!(p.currency, "USD");
        assert_eq!(p.asset_class, AssetClass::Equities);
        assert_eq!(p.buying_price, Some(100.0));
        assert_eq!(p.current_price, Some(120.0));
        assert_eq!(p.source.as_deref(), Some("Broker A"));
        assert_eq!(p.accrued_interest, 0.0);
        assert_eq!(p.updated_at, d(2025, 1, 15));
    }

    #[test]
    fn from_draft_normalizes_asset_class() {
        let draft = PositionDraft::new("Savings", AssetClass::Other("Cash".into()), "USD", 1.0, 500.0);
        let p = Position::from_draft(draft, d(2025, 1, 15));
        assert_eq!(p.asset_class, AssetClass::Cash);

        let draft = PositionDraft::new("Coins", AssetClass::Other(" crypto ".into()), "USD", 1.0, 50.0);
        let p = Position::from_draft(draft, d(2025, 1, 15));
        assert_eq!(p.asset_class, AssetClass::Other("crypto".into()));
    }

    #[test]
    fn patch_normalizes_asset_class() {
        let mut p = equity_position();
        p.apply_patch(
            PositionPatch {
                asset_class: Some(AssetClass::Other(" Bonds".into())),
                ..PositionPatch::default()
            },
            d(2025, 3, 1),
        );
        assert_eq!(p.asset_class, AssetClass::Bonds);
    }

    #[test]
    fn fresh_ids() {
        let a = equity_position();
        let b = equity_position();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn total_cost_and_gain() {
        let p = equity_position();
        assert_eq!(p.total_cost(), 1000.0);
        let gl = p.gain_loss();
        assert_eq!(gl.gain_amount, 200.0);
        assert_eq!(gl.gain_percent, Some(20.0));
    }

    #[test]
    fn missing_buying_price_counts_as_zero_cost() {
        let p = Position::from_draft(
            PositionDraft::new("Savings", AssetClass::Cash, "EUR", 1.0, 5000.0),
            d(2025, 1, 1),
        );
        assert_eq!(p.total_cost(), 0.0);
        assert_eq!(p.gain_loss().gain_amount, 5000.0);
        assert_eq!(p.gain_loss().gain_percent, None);
    }

    #[test]
    fn market_value_is_independent_of_unit_price() {
        let p = equity_position();
        // 10 units × 120 = 1200 here, but nothing ties the two together
        let mut edited = p.clone();
        edited.apply_patch(PositionPatch::market_value(1500.0), d(2025, 2, 1));
        assert_eq!(edited.market_value, 1500.0);
        assert_eq!(edited.current_price, Some(120.0));
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut p = equity_position();
        let original = p.clone();
        let patch = PositionPatch {
            name: Some("  Renamed ETF".into()),
            units: Some(12.0),
            ..PositionPatch::default()
        };
        p.apply_patch(patch, d(2025, 3, 1));

        assert_eq!(p.id, original.id);
        assert_eq!(p.name, "Renamed ETF");
        assert_eq!(p.units, 12.0);
        assert_eq!(p.market_value, original.market_value);
        assert_eq!(p.buying_price, original.buying_price);
        assert_eq!(p.currency, original.currency);
        assert_eq!(p.source, original.source);
        assert_eq!(p.updated_at, d(2025, 3, 1));
    }

    #[test]
    fn patch_uppercases_currency() {
        let mut p = equity_position();
        p.apply_patch(
            PositionPatch {
                currency: Some(" eur ".into()),
                ..PositionPatch::default()
            },
            d(2025, 3, 1),
        );
        assert_eq!(p.currency, "EUR");
    }

    #[test]
    fn empty_patch() {
        assert!(PositionPatch::default().is_empty());
        assert!(!PositionPatch::market_value(1.0).is_empty());
    }

    #[test]
    fn serde_json_roundtrip() {
        let p = equity_position();
        let json = serde_json::to_string(&p).unwrap();
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn deserialize_without_optional_fields() {
        let id = Uuid::new_v4();
        let json = format!(
            r#"{{"id":"{id}","name":"Old","asset_class":"Crypto","currency":"USD",
                "units":2.0,"market_value":300.0,"updated_at":"2024-05-01"}}"#
        );
        let p: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(p.asset_class, AssetClass::Other("Crypto".into()));
        assert_eq!(p.buying_price, None);
        assert_eq!(p.accrued_interest, 0.0);
        assert_eq!(p.source, None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  GainLoss
// ═══════════════════════════════════════════════════════════════════

mod gain_loss {
    use super::*;

    #[test]
    fn gain() {
        let gl = GainLoss::compute(10.0, 100.0, 1200.0);
        assert_eq!(gl.total_cost, 1000.0);
        assert_eq!(gl.gain_amount, 200.0);
        assert_eq!(gl.gain_percent, Some(20.0));
    }

    #[test]
    fn loss() {
        let gl = GainLoss::compute(5.0, 50.0, 200.0);
        assert_eq!(gl.total_cost, 250.0);
        assert_eq!(gl.gain_amount, -50.0);
        assert_eq!(gl.gain_percent, Some(-20.0));
    }

    #[test]
    fn zero_cost_basis_has_no_percent() {
        assert_eq!(GainLoss::compute(0.0, 100.0, 50.0).gain_percent, None);
        assert_eq!(GainLoss::compute(10.0, 0.0, 50.0).gain_percent, None);
        assert_eq!(GainLoss::compute(0.0, 0.0, 0.0).gain_percent, None);
    }

    #[test]
    fn percent_label() {
        assert_eq!(GainLoss::compute(10.0, 100.0, 1200.0).percent_label(), "+20.00%");
        assert_eq!(GainLoss::compute(5.0, 50.0, 200.0).percent_label(), "-20.00%");
        assert_eq!(GainLoss::compute(0.0, 0.0, 10.0).percent_label(), "N/A");
    }

    #[test]
    fn format_percent_zero_has_plus_sign() {
        assert_eq!(format_percent(Some(0.0)), "+0.00%");
        assert_eq!(format_percent(Some(12.346)), "+12.35%");
        assert_eq!(format_percent(None), "N/A");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  GroupedTotals
// ═══════════════════════════════════════════════════════════════════

mod grouped_totals {
    use super::*;

    #[test]
    fn default_is_empty() {
        let g = GroupedTotals::default();
        assert!(g.is_empty());
        assert_eq!(g.total_value(), 0.0);
        assert_eq!(g.total_cost(), 0.0);
        assert_eq!(g.total_gain(), 0.0);
        assert_eq!(g.accrued_interest, 0.0);
        assert_eq!(g.value_of(&AssetClass::Cash), 0.0);
    }

    #[test]
    fn totals_sum_all_classes() {
        let mut g = GroupedTotals::default();
        g.classes.insert(AssetClass::Equities, ClassTotals { value: 1200.0, gain: 200.0, cost: 1000.0 });
        g.classes.insert(AssetClass::Cash, ClassTotals { value: 200.0, gain: -50.0, cost: 250.0 });
        assert_eq!(g.total_value(), 1400.0);
        assert_eq!(g.total_cost(), 1250.0);
        assert_eq!(g.total_gain(), 150.0);
        assert_eq!(g.get(&AssetClass::Cash).unwrap().value, 200.0);
        assert!(g.get(&AssetClass::Bonds).is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioSnapshot / MonthlyUpdate
// ═══════════════════════════════════════════════════════════════════

mod snapshot {
    use super::*;

    #[test]
    fn from_buckets_sums_total() {
        let s = PortfolioSnapshot::from_buckets(d(2025, 1, 1), 100.0, 200.0, 300.0, 400.0);
        assert_eq!(s.total_value, 1000.0);
        assert_eq!(s.bucket_sum(), 1000.0);
        assert!(s.is_consistent());
    }

    #[test]
    fn inconsistent_when_total_diverges() {
        let s = PortfolioSnapshot {
            date: d(2025, 1, 1),
            total_value: 999.0,
            cash: 100.0,
            bonds: 200.0,
            equities: 300.0,
            alternatives: 400.0,
        };
        assert!(!s.is_consistent());
    }

    #[test]
    fn monthly_update_builder() {
        let id = Uuid::new_v4();
        let update = MonthlyUpdate::snapshot_only(d(2025, 2, 1)).revalue(id, 1500.0);
        assert_eq!(update.date, d(2025, 2, 1));
        assert_eq!(update.revaluations.len(), 1);
        assert_eq!(update.revaluations[0].position_id, id);
        assert_eq!(update.revaluations[0].market_value, 1500.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Chart models
// ═══════════════════════════════════════════════════════════════════

mod chart {
    use super::*;

    #[test]
    fn window_days() {
        let days: Vec<Option<i64>> = LookbackWindow::ALL_WINDOWS.iter().map(|w| w.days()).collect();
        assert_eq!(
            days,
            vec![Some(30), Some(60), Some(90), Some(180), Some(365), Some(730), None]
        );
    }

    #[test]
    fn window_start_date() {
        assert_eq!(LookbackWindow::Days30.start_date(d(2025, 3, 31)), Some(d(2025, 3, 1)));
        assert_eq!(LookbackWindow::Days365.start_date(d(2025, 1, 1)), Some(d(2024, 1, 2)));
        assert_eq!(LookbackWindow::All.start_date(d(2025, 1, 1)), None);
    }

    #[test]
    fn window_parse() {
        assert_eq!(LookbackWindow::parse("30").unwrap(), LookbackWindow::Days30);
        assert_eq!(LookbackWindow::parse("180d").unwrap(), LookbackWindow::Days180);
        assert_eq!(LookbackWindow::parse(" ALL ").unwrap(), LookbackWindow::All);
        assert!(LookbackWindow::parse("45").is_err());
        assert!(LookbackWindow::parse("").is_err());
    }

    #[test]
    fn window_display_parses_back() {
        for w in LookbackWindow::ALL_WINDOWS {
            assert_eq!(LookbackWindow::parse(&w.to_string()).unwrap(), w);
        }
    }

    #[test]
    fn default_window_is_all() {
        assert_eq!(LookbackWindow::default(), LookbackWindow::All);
    }

    #[test]
    fn visibility_defaults_to_all() {
        let v = ClassVisibility::default();
        assert!(AssetClass::KNOWN.iter().all(|c| v.is_visible(c)));
    }

    #[test]
    fn visibility_set_and_legacy_mapping() {
        let mut v = ClassVisibility::none();
        v.set(&AssetClass::Bonds, true);
        assert!(v.is_visible(&AssetClass::Bonds));
        assert!(!v.is_visible(&AssetClass::Cash));
        assert!(!v.is_visible(&AssetClass::Other("Crypto".into())));

        v.set(&AssetClass::Other("Crypto".into()), true);
        assert!(v.alternatives);
    }

    #[test]
    fn hidden_series_omitted_from_json() {
        let snapshot = AnnotatedSnapshot {
            date: d(2025, 1, 1),
            total: SeriesPoint { value: 1000.0, change: None },
            cash: Some(SeriesPoint { value: 1000.0, change: None }),
            bonds: None,
            equities: None,
            alternatives: None,
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("cash").is_some());
        assert!(json.get("bonds").is_none());
        assert!(json.get("equities").is_none());
        assert!(json["total"]["change"].is_null());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings / Ledger
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.display_currency, "USD");
        assert_eq!(s.performer_count, DEFAULT_PERFORMER_COUNT);
        assert_eq!(s.performer_count, 5);
        assert_eq!(s.default_window, LookbackWindow::All);
        assert_eq!(s.visible_classes, ClassVisibility::all());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let s: Settings = serde_json::from_str(r#"{"display_currency":"PLN"}"#).unwrap();
        assert_eq!(s.display_currency, "PLN");
        assert_eq!(s.performer_count, 5);
        assert_eq!(s.default_window, LookbackWindow::All);
    }

    #[test]
    fn ledger_default_is_empty() {
        let ledger = Ledger::default();
        assert!(ledger.positions.is_empty());
        assert!(ledger.history.is_empty());
        assert_eq!(ledger.settings, Settings::default());
    }

    #[test]
    fn ledger_json_roundtrip() {
        let ledger = Ledger {
            positions: vec![equity_position()],
            history: vec![PortfolioSnapshot::from_buckets(d(2025, 1, 1), 1.0, 2.0, 3.0, 4.0)],
            settings: Settings::default(),
        };
        let json = serde_json::to_string(&ledger).unwrap();
        let back: Ledger = serde_json::from_str(&json).unwrap();
        assert_eq!(ledger, back);
    }

    #[test]
    fn ledger_consistency() {
        let mut ledger = Ledger {
            positions: vec![equity_position(), equity_position()],
            history: vec![
                PortfolioSnapshot::from_buckets(d(2025, 1, 31), 1.0, 2.0, 3.0, 4.0),
                PortfolioSnapshot::from_buckets(d(2025, 2, 28), 1.0, 2.0, 3.0, 5.0),
            ],
            settings: Settings::default(),
        };
        assert!(ledger.check_consistency().is_ok());
        assert!(Ledger::default().check_consistency().is_ok());

        let duplicate = ledger.positions[0].clone();
        ledger.positions.push(duplicate);
        assert!(matches!(ledger.check_consistency(), Err(CoreError::ValidationError(_))));
        ledger.positions.pop();

        ledger.history.swap(0, 1);
        assert!(matches!(ledger.check_consistency(), Err(CoreError::ValidationError(_))));
        ledger.history.swap(0, 1);

        ledger.history[1].total_value = 999.0;
        assert!(matches!(ledger.check_consistency(), Err(CoreError::ValidationError(_))));
        ledger.history[1].total_value = 11.0;

        ledger.settings.performer_count = 0;
        assert!(matches!(ledger.check_consistency(), Err(CoreError::ValidationError(_))));
    }
}
