//! Proptest strategies for Gridaware domain types.

use gridaware_core::{IntensityTier, StoredSettings};
use proptest::prelude::*;

/// Any of the three tiers.
pub fn any_tier() -> impl Strategy<Value = IntensityTier> {
    prop_oneof![
        Just(IntensityTier::Low),
        Just(IntensityTier::Medium),
        Just(IntensityTier::High),
    ]
}

/// A numeric carbon intensity spanning all tier bands, boundaries included.
pub fn any_intensity() -> impl Strategy<Value = f64> {
    prop_oneof![
        0.0..200.0f64,
        Just(199.9),
        Just(200.0),
        200.0..500.0f64,
        Just(499.9),
        Just(500.0),
        500.0..2000.0f64,
    ]
}

/// A stored flag value as hosts actually send them: valid string booleans
/// plus the junk that sanitization has to reject.
pub fn any_flag_input() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("0".to_string())),
        Just(Some("1".to_string())),
        Just(Some("true".to_string())),
        Just(Some("yes".to_string())),
        Just(Some(String::new())),
        "[a-z0-9]{1,8}".prop_map(Some),
    ]
}

/// A full settings payload with arbitrary flag inputs.
pub fn any_settings_input() -> impl Strategy<Value = StoredSettings> {
    (
        any_flag_input(),
        any_flag_input(),
        any_flag_input(),
        proptest::option::of("[A-Za-z0-9]{0,24}"),
    )
        .prop_map(|(images, videos, typography, api_key)| StoredSettings {
            images,
            videos,
            typography,
            api_key,
        })
}

#[cfg(test)]
mod prop_tests {
    use super::*;

    proptest! {
        #[test]
        fn prop_sanitized_flags_are_always_string_booleans(input in any_settings_input()) {
            let sanitized = StoredSettings::sanitize(&input, Some(&StoredSettings::defaults()));
            for flag in [&sanitized.images, &sanitized.videos, &sanitized.typography] {
                let value = flag.as_deref().unwrap_or("1");
                prop_assert!(value == "0" || value == "1");
            }
        }

        #[test]
        fn prop_classify_matches_tier_bands(value in any_intensity()) {
            let tier = gridaware_core::classify(value);
            if value < 200.0 {
                prop_assert_eq!(tier, IntensityTier::Low);
            } else if value < 500.0 {
                prop_assert_eq!(tier, IntensityTier::Medium);
            } else {
                prop_assert_eq!(tier, IntensityTier::High);
            }
        }
    }
}
