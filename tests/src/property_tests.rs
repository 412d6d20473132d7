//! Property-based checks over arbitrary configurations

use crate::fakes::{Script, ScriptedConnector};
use keyprobe_core::prelude::*;
use keyprobe_core::ConfigError;
use keyprobe_validator::{ConnectivityValidator, FailureKind, ValidationOutcome};
use proptest::prelude::*;
use std::future::Future;

fn block_on<F: Future>(future: F) -> F::Output {
    monoio::RuntimeBuilder::<monoio::FusionDriver>::new()
        .enable_timer()
        .build()
        .expect("failed to build monoio runtime")
        .block_on(future)
}

/// Unset, empty, whitespace-only or a real-looking value
fn credential() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[ \t]{1,4}".prop_map(Some),
        "[A-Za-z0-9]{1,64}".prop_map(Some),
    ]
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_missing_credentials_never_touch_the_exchange(
        use_sandbox in any::<bool>(),
        api_key in credential(),
        api_secret in credential(),
    ) {
        let complete = is_present(&api_key) && is_present(&api_secret);
        let config = Configuration { use_sandbox, api_key, api_secret };

        let connector = ScriptedConnector::new(Script::default());
        let probe = connector.probe();
        let outcome: ValidationOutcome =
            block_on(ConnectivityValidator::new(connector).validate(&config));

        if complete {
            prop_assert!(outcome.success);
            prop_assert_eq!(probe.connects.get(), 1);
            prop_assert_eq!(probe.closes.get(), 1);
        } else {
            prop_assert!(!outcome.success);
            prop_assert_eq!(outcome.failure, Some(FailureKind::ConfigurationMissing));
            prop_assert_eq!(probe.connects.get(), 0);
            prop_assert_eq!(probe.network_calls(), 0);
        }
        prop_assert!(!outcome.diagnostics.is_empty());
    }

    #[test]
    fn prop_sandbox_flag_spellings(
        truthy in prop::sample::select(vec!["true", "TRUE", "1", "yes", "On", " true "]),
        falsy in prop::sample::select(vec!["false", "False", "0", "no", "OFF"]),
    ) {
        let sandbox = Configuration::from_lookup(|name| {
            (name == "USE_TESTNET").then(|| truthy.to_string())
        }).unwrap();
        prop_assert!(sandbox.use_sandbox);

        let production = Configuration::from_lookup(|name| {
            (name == "USE_TESTNET").then(|| falsy.to_string())
        }).unwrap();
        prop_assert!(!production.use_sandbox);
    }

    #[test]
    fn prop_unparseable_flag_is_rejected(raw in "[a-z]{6,12}") {
        let result = Configuration::from_lookup(|name| {
            (name == "USE_TESTNET").then(|| raw.clone())
        });

        let is_invalid_flag = matches!(result, Err(ConfigError::InvalidFlag { .. }));
        prop_assert!(is_invalid_flag);
    }
}
