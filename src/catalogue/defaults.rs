//! Baked-in default catalogue.
//!
//! Served when the configuration source yields zero valid records, so the
//! process always starts with a usable catalogue: English, Spanish, and
//! French left-to-right with frequency profiles for the fallback classifier,
//! and Arabic right-to-left.

use crate::catalogue::{
    CurrencyFormat, FormatterSet, Gender, GenderOption, LanguageConfig, MeasurementSystem,
    NumberFormat, RegionInfo,
};
use std::collections::HashMap;

/// The default language configurations.
pub fn builtin_catalogue() -> Vec<LanguageConfig> {
    vec![english(), spanish(), french(), arabic()]
}

fn voice(gender: Gender, voice_id: &str, pronouns: &[&str]) -> GenderOption {
    GenderOption {
        gender,
        voice_id: Some(voice_id.to_string()),
        pronouns: pronouns.iter().map(|p| p.to_string()).collect(),
        formality_levels: Vec::new(),
    }
}

fn english() -> LanguageConfig {
    LanguageConfig {
        code: "en".to_string(),
        locale: "en-US".to_string(),
        name: "English".to_string(),
        native_name: Some("English".to_string()),
        rtl: false,
        enabled: true,
        region: RegionInfo {
            code: "US".to_string(),
            name: "United States".to_string(),
            country_code: Some("US".to_string()),
            dialects: vec!["American English".to_string()],
            cultural_notes: None,
        },
        gender_options: vec![
            voice(Gender::Female, "en-US-f1", &["she", "her"]),
            voice(Gender::Male, "en-US-m1", &["he", "him"]),
            voice(Gender::Neutral, "en-US-n1", &["they", "them"]),
        ],
        formatters: FormatterSet {
            date: "%m/%d/%Y".to_string(),
            time: "%I:%M %p".to_string(),
            number: NumberFormat {
                decimal_separator: '.',
                grouping_separator: ',',
                grouping: true,
            },
            currency: CurrencyFormat {
                symbol: "$".to_string(),
                template: "{symbol}{amount}".to_string(),
            },
            measurement: MeasurementSystem::Imperial,
        },
        frequencies: Some(english_frequencies()),
        security_hash: None,
        last_updated: None,
    }
}

fn spanish() -> LanguageConfig {
    LanguageConfig {
        code: "es".to_string(),
        locale: "es-ES".to_string(),
        name: "Spanish".to_string(),
        native_name: Some("Español".to_string()),
        rtl: false,
        enabled: true,
        region: RegionInfo {
            code: "ES".to_string(),
            name: "Spain".to_string(),
            country_code: Some("ES".to_string()),
            dialects: vec!["Castilian".to_string()],
            cultural_notes: None,
        },
        gender_options: vec![
            voice(Gender::Female, "es-ES-f1", &["ella"]),
            voice(Gender::Male, "es-ES-m1", &["él"]),
            voice(Gender::Neutral, "es-ES-n1", &["elle"]),
        ],
        formatters: FormatterSet {
            date: "%d/%m/%Y".to_string(),
            time: "%H:%M".to_string(),
            number: NumberFormat {
                decimal_separator: ',',
                grouping_separator: '.',
                grouping: true,
            },
            currency: CurrencyFormat {
                symbol: "€".to_string(),
                template: "{amount} {symbol}".to_string(),
            },
            measurement: MeasurementSystem::Metric,
        },
        frequencies: Some(spanish_frequencies()),
        security_hash: None,
        last_updated: None,
    }
}

fn french() -> LanguageConfig {
    LanguageConfig {
        code: "fr".to_string(),
        locale: "fr-FR".to_string(),
        name: "French".to_string(),
        native_name: Some("Français".to_string()),
        rtl: false,
        enabled: true,
        region: RegionInfo {
            code: "FR".to_string(),
            name: "France".to_string(),
            country_code: Some("FR".to_string()),
            dialects: Vec::new(),
            cultural_notes: None,
        },
        gender_options: vec![
            voice(Gender::Female, "fr-FR-f1", &["elle"]),
            voice(Gender::Male, "fr-FR-m1", &["il"]),
        ],
        formatters: FormatterSet {
            date: "%d/%m/%Y".to_string(),
            time: "%H:%M".to_string(),
            number: NumberFormat {
                decimal_separator: ',',
                grouping_separator: ' ',
                grouping: true,
            },
            currency: CurrencyFormat {
                symbol: "€".to_string(),
                template: "{amount} {symbol}".to_string(),
            },
            measurement: MeasurementSystem::Metric,
        },
        frequencies: Some(french_frequencies()),
        security_hash: None,
        last_updated: None,
    }
}

fn arabic() -> LanguageConfig {
    LanguageConfig {
        code: "ar".to_string(),
        locale: "ar-SA".to_string(),
        name: "Arabic".to_string(),
        native_name: Some("العربية".to_string()),
        rtl: true,
        enabled: true,
        region: RegionInfo {
            code: "SA".to_string(),
            name: "Saudi Arabia".to_string(),
            country_code: Some("SA".to_string()),
            dialects: vec!["Modern Standard Arabic".to_string()],
            cultural_notes: None,
        },
        gender_options: vec![
            voice(Gender::Female, "ar-SA-f1", &["هي"]),
            voice(Gender::Male, "ar-SA-m1", &["هو"]),
        ],
        formatters: FormatterSet {
            date: "%d/%m/%Y".to_string(),
            time: "%H:%M".to_string(),
            number: NumberFormat {
                decimal_separator: '٫',
                grouping_separator: '٬',
                grouping: true,
            },
            currency: CurrencyFormat {
                symbol: "ر.س".to_string(),
                template: "{amount} {symbol}".to_string(),
            },
            measurement: MeasurementSystem::Metric,
        },
        frequencies: None,
        security_hash: None,
        last_updated: None,
    }
}

/// Relative letter frequencies (percent) for English prose.
fn english_frequencies() -> HashMap<char, f64> {
    HashMap::from([
        ('a', 8.2),
        ('b', 1.5),
        ('c', 2.8),
        ('d', 4.3),
        ('e', 12.7),
        ('f', 2.2),
        ('g', 2.0),
        ('h', 6.1),
        ('i', 7.0),
        ('j', 0.15),
        ('k', 0.77),
        ('l', 4.0),
        ('m', 2.4),
        ('n', 6.7),
        ('o', 7.5),
        ('p', 1.9),
        ('q', 0.095),
        ('r', 6.0),
        ('s', 6.3),
        ('t', 9.1),
        ('u', 2.8),
        ('v', 0.98),
        ('w', 2.4),
        ('x', 0.15),
        ('y', 2.0),
        ('z', 0.074),
    ])
}

/// Relative letter frequencies (percent) for Spanish prose.
fn spanish_frequencies() -> HashMap<char, f64> {
    HashMap::from([
        ('a', 12.53),
        ('b', 1.42),
        ('c', 4.68),
        ('d', 5.86),
        ('e', 13.68),
        ('f', 0.69),
        ('g', 1.01),
        ('h', 0.70),
        ('i', 6.25),
        ('j', 0.44),
        ('k', 0.02),
        ('l', 4.97),
        ('m', 3.15),
        ('n', 6.71),
        ('ñ', 0.31),
        ('o', 8.68),
        ('p', 2.51),
        ('q', 0.88),
        ('r', 6.87),
        ('s', 7.98),
        ('t', 4.63),
        ('u', 3.93),
        ('v', 0.90),
        ('w', 0.01),
        ('x', 0.22),
        ('y', 0.90),
        ('z', 0.52),
    ])
}

/// Relative letter frequencies (percent) for French prose.
fn french_frequencies() -> HashMap<char, f64> {
    HashMap::from([
        ('a', 7.64),
        ('b', 0.90),
        ('c', 3.26),
        ('d', 3.67),
        ('e', 14.72),
        ('é', 1.90),
        ('f', 1.07),
        ('g', 0.87),
        ('h', 0.74),
        ('i', 7.53),
        ('j', 0.61),
        ('k', 0.05),
        ('l', 5.46),
        ('m', 2.97),
        ('n', 7.10),
        ('o', 5.80),
        ('p', 2.52),
        ('q', 1.36),
        ('r', 6.69),
        ('s', 7.95),
        ('t', 7.24),
        ('u', 6.31),
        ('v', 1.84),
        ('w', 0.05),
        ('x', 0.43),
        ('y', 0.13),
        ('z', 0.33),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_both_directions() {
        let catalogue = builtin_catalogue();
        assert!(catalogue.iter().any(|c| !c.rtl));
        assert!(catalogue.iter().any(|c| c.rtl));
    }

    #[test]
    fn test_defaults_have_unique_codes() {
        let catalogue = builtin_catalogue();
        let mut codes: Vec<&str> = catalogue.iter().map(|c| c.code.as_str()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), catalogue.len());
    }

    #[test]
    fn test_default_frequency_tables_roughly_sum_to_100() {
        for config in builtin_catalogue() {
            if let Some(freq) = &config.frequencies {
                let total: f64 = freq.values().sum();
                assert!(
                    (90.0..=110.0).contains(&total),
                    "{} frequencies sum to {}",
                    config.code,
                    total
                );
            }
        }
    }

    #[test]
    fn test_every_default_has_a_voice() {
        for config in builtin_catalogue() {
            assert!(
                config.gender_options.iter().any(|g| g.voice_id.is_some()),
                "{} has no voice",
                config.code
            );
        }
    }
}
