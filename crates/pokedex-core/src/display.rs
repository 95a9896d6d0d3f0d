// ── Presentation helpers ──
//
// Formatting shared by the CLI and TUI detail views.

use pokedex_api::{Pokemon, Stat};

/// Upper bound of the stat scale used for bars.
pub const MAX_STAT_VALUE: i32 = 255;

const UNKNOWN: &str = "Unknown";

/// Bar fill for a stat, in percent of [`MAX_STAT_VALUE`].
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn stat_percentage(value: i32) -> u8 {
    let clamped = value.clamp(0, MAX_STAT_VALUE);
    let percent = (f64::from(clamped) / f64::from(MAX_STAT_VALUE) * 100.0).round();
    percent.min(100.0) as u8
}

/// Key under which two stat names count as the same stat, so that
/// `specialAttack` and `special-attack` collapse. Only interior capitals
/// get a hyphen, so `Speed` and `speed` collapse too.
fn stat_key(name: &str) -> String {
    let stripped = name.replacen('_', "", 1);
    let mut key = String::with_capacity(stripped.len() + 2);
    for (idx, ch) in stripped.chars().enumerate() {
        if idx > 0 && ch.is_uppercase() {
            key.push('-');
        }
        key.extend(ch.to_lowercase());
    }
    key
}

/// Drop stats whose names collapse to an already-seen key, keeping the
/// first occurrence with its first `_` turned into `-`.
pub fn unique_stats(stats: &[Stat]) -> Vec<Stat> {
    let mut seen: Vec<String> = Vec::with_capacity(stats.len());
    let mut unique = Vec::with_capacity(stats.len());
    for stat in stats {
        let key = stat_key(&stat.name);
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        unique.push(Stat {
            name: stat.name.replacen('_', "-", 1),
            value: stat.value,
        });
    }
    unique
}

/// `special-attack` → `special attack`.
pub fn stat_label(name: &str) -> String {
    name.replacen('-', " ", 1)
}

/// Height arrives in decimetres.
pub fn format_height(decimetres: u32) -> String {
    if decimetres == 0 {
        return UNKNOWN.into();
    }
    format!("{:.1} m", f64::from(decimetres) / 10.0)
}

/// Weight arrives in hectograms.
pub fn format_weight(hectograms: u32) -> String {
    if hectograms == 0 {
        return UNKNOWN.into();
    }
    format!("{:.1} kg", f64::from(hectograms) / 10.0)
}

pub fn format_abilities(abilities: &[String]) -> String {
    if abilities.is_empty() {
        UNKNOWN.into()
    } else {
        abilities.join(", ")
    }
}

pub fn format_types(pokemon: &Pokemon) -> String {
    pokemon
        .types
        .iter()
        .map(|t| t.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// `#025`
pub fn format_pokedex_id(pokedex_id: u32) -> String {
    format!("#{pokedex_id:03}")
}

/// Whether `evolution` is the entry currently being shown.
pub fn is_current_evolution(evolution: &Pokemon, current_pokedex_id: u32) -> bool {
    evolution.pokedex_id == current_pokedex_id
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn stat(name: &str, value: i32) -> Stat {
        Stat {
            name: name.into(),
            value,
        }
    }

    #[test]
    fn percentage_is_rounded_and_capped() {
        assert_eq!(stat_percentage(0), 0);
        assert_eq!(stat_percentage(45), 18);
        assert_eq!(stat_percentage(128), 50);
        assert_eq!(stat_percentage(255), 100);
        assert_eq!(stat_percentage(300), 100);
        assert_eq!(stat_percentage(-5), 0);
    }

    #[test]
    fn duplicate_spellings_collapse_to_first() {
        let stats = vec![
            stat("hp", 45),
            stat("special-attack", 65),
            stat("specialAttack", 99),
        ];

        let unique = unique_stats(&stats);

        assert_eq!(unique, vec![stat("hp", 45), stat("special-attack", 65)]);
    }

    #[test]
    fn leading_capital_is_not_hyphenated() {
        assert_eq!(stat_key("Speed"), "speed");
        assert_eq!(stat_key("SpecialAttack"), "special-attack");

        let unique = unique_stats(&[stat("Speed", 45), stat("speed", 50)]);
        assert_eq!(unique, vec![stat("Speed", 45)]);
    }

    #[test]
    fn kept_name_gets_first_underscore_hyphenated() {
        let unique = unique_stats(&[stat("special_defense", 70)]);
        assert_eq!(unique[0].name, "special-defense");
    }

    #[test]
    fn labels_replace_first_hyphen() {
        assert_eq!(stat_label("special-attack"), "special attack");
        assert_eq!(stat_label("hp"), "hp");
    }

    #[test]
    fn measurements_are_converted() {
        assert_eq!(format_height(7), "0.7 m");
        assert_eq!(format_height(17), "1.7 m");
        assert_eq!(format_weight(69), "6.9 kg");
        assert_eq!(format_weight(0), "Unknown");
        assert_eq!(format_height(0), "Unknown");
    }

    #[test]
    fn abilities_are_joined() {
        assert_eq!(format_abilities(&[]), "Unknown");
        assert_eq!(
            format_abilities(&["Engrais".into(), "Chlorophylle".into()]),
            "Engrais, Chlorophylle"
        );
    }

    #[test]
    fn pokedex_ids_are_padded() {
        assert_eq!(format_pokedex_id(1), "#001");
        assert_eq!(format_pokedex_id(151), "#151");
    }
}
