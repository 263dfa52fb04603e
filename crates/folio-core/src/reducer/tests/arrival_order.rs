use super::*;
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, Copy)]
enum Arrival {
    Config,
    Owners,
    Groups,
}

const ORDERS: [[Arrival; 3]; 6] = [
    [Arrival::Config, Arrival::Owners, Arrival::Groups],
    [Arrival::Config, Arrival::Groups, Arrival::Owners],
    [Arrival::Owners, Arrival::Config, Arrival::Groups],
    [Arrival::Owners, Arrival::Groups, Arrival::Config],
    [Arrival::Groups, Arrival::Config, Arrival::Owners],
    [Arrival::Groups, Arrival::Owners, Arrival::Config],
];

fn deliver(model: &mut RouteModel, arrival: Arrival, config: &serde_json::Value) {
    let event = match arrival {
        Arrival::Config => RuntimeEvent::ConfigReceived(Ok(raw(config.clone()))),
        Arrival::Owners => RuntimeEvent::OwnersReceived(Ok(owners(&["alice", "bob"]))),
        Arrival::Groups => RuntimeEvent::GroupsReceived(Ok(groups(&["kids", "all"]))),
    };
    let effects = run_runtime(model, event);
    settle(model, effects);
}

fn final_state(url: &str, config: &serde_json::Value, order: [Arrival; 3]) -> (String, Mode, String, String) {
    let mut model = mounted(url);
    for arrival in order {
        deliver(&mut model, arrival, config);
    }
    assert_eq!(model.phase, RoutePhase::Stable, "order {order:?}");
    (
        model.location.to_url(),
        model.route.mode,
        model.route.selection.owner.clone(),
        model.route.selection.group.clone(),
    )
}

#[test]
fn final_route_is_independent_of_arrival_order() {
    let cases = [
        ("/performance", serde_json::json!({"tabs": {"performance": true, "group": true}})),
        ("/instrument/zzz", serde_json::json!({"tabs": {"group": true}})),
        ("/member/bob", serde_json::json!({"tabs": {"owner": true}})),
        ("/unknown", serde_json::json!({"tabs": {"watchlist": true, "movers": false}})),
    ];

    for (url, config) in cases {
        let expected = final_state(url, &config, ORDERS[0]);
        for order in &ORDERS[1..] {
            assert_eq!(final_state(url, &config, *order), expected, "{url} with {order:?}");
        }
    }
}

#[test]
fn disabled_instrument_settles_on_defaulted_group_view() {
    let config = serde_json::json!({"tabs": {"group": true}});

    let (url, mode, owner, group) = final_state("/instrument/zzz", &config, ORDERS[3]);

    assert_eq!(url, "/?group=kids");
    assert_eq!(mode, Mode::Group);
    assert_eq!(owner, "alice");
    assert_eq!(group, "kids");
}

#[test]
fn latest_location_wins_over_earlier_config_redirect() {
    let mut model = mounted("/movers");
    let stale = config_received(
        &mut model,
        serde_json::json!({"tabs": {"screener": true, "support": true}}),
    );
    let [RouteEffect::Navigate { pass: stale_pass, .. }, ..] = stale.as_slice() else {
        panic!("expected a corrective navigation, got {stale:?}");
    };

    let effects = run_runtime(&mut model, RuntimeEvent::LocationChanged(Location::parse("/support")));

    assert!(navigations(&effects).is_empty());
    assert!(!model.is_current(*stale_pass));
    assert!(model.pending.is_none());
    assert_route(&model, Mode::Support, "", "");
}
