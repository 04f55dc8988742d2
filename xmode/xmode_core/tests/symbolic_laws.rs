//! Algebraic laws of the symbolic evaluator.
//!
//! These check the evaluator against properties that must hold for every
//! starting mode, rather than against hand-picked cases.

use proptest::prelude::*;

use xmode_core::{get_effective_mode, FormatError, Mode, ModeRequest, SymbolicClause};

fn any_mode() -> impl Strategy<Value = Mode> {
    (0u32..=0o777).prop_map(Mode::from_bits_truncate)
}

fn any_clause() -> impl Strategy<Value = String> {
    (0u8..8, prop::sample::select(vec!['+', '-', '=']), 0u8..8).prop_map(|(who, op, perm)| {
        let mut clause = String::new();
        for (bit, letter) in [(0b100, 'u'), (0b010, 'g'), (0b001, 'o')] {
            if who & bit != 0 {
                clause.push(letter);
            }
        }
        clause.push(op);
        for (bit, letter) in [(0b100, 'r'), (0b010, 'w'), (0b001, 'x')] {
            if perm & bit != 0 {
                clause.push(letter);
            }
        }
        clause
    })
}

proptest! {
    #[test]
    fn add_execute_for_all(mode in any_mode()) {
        let result = get_effective_mode(mode, "ugo+x").unwrap();
        prop_assert_eq!(result.bits(), mode.bits() | 0o111);
    }

    #[test]
    fn remove_everything(mode in any_mode()) {
        prop_assert_eq!(get_effective_mode(mode, "ugo-rwx").unwrap(), Mode::EMPTY);
    }

    #[test]
    fn assign_everything(mode in any_mode()) {
        prop_assert_eq!(get_effective_mode(mode, "ugo=rwx").unwrap(), Mode::ALL);
    }

    #[test]
    fn a_is_ugo(mode in any_mode(), clause in any_clause()) {
        let with_a = format!("a{}", clause.trim_start_matches(['u', 'g', 'o']));
        let with_ugo = format!("ugo{}", clause.trim_start_matches(['u', 'g', 'o']));
        prop_assert_eq!(
            get_effective_mode(mode, &with_a).unwrap(),
            get_effective_mode(mode, &with_ugo).unwrap()
        );
    }

    #[test]
    fn clauses_fold_left(mode in any_mode(), first in any_clause(), second in any_clause()) {
        let combined = get_effective_mode(mode, &format!("{},{}", first, second)).unwrap();
        let stepwise = get_effective_mode(get_effective_mode(mode, &first).unwrap(), &second).unwrap();
        prop_assert_eq!(combined, stepwise);
    }

    #[test]
    fn clause_round_trips_through_display(mode in any_mode(), clause in any_clause()) {
        let parsed: SymbolicClause = clause.parse().unwrap();
        let reparsed: SymbolicClause = parsed.to_string().parse().unwrap();
        prop_assert_eq!(parsed.apply(mode), reparsed.apply(mode));
    }

    #[test]
    fn assign_leaves_unselected_fields(mode in any_mode(), perm in 0u32..8) {
        let letters: String = [(4, 'r'), (2, 'w'), (1, 'x')]
            .iter()
            .filter(|(bit, _)| perm & bit != 0)
            .map(|(_, letter)| *letter)
            .collect();
        let result = get_effective_mode(mode, &format!("g={}", letters)).unwrap();
        prop_assert_eq!(result.bits() & 0o707, mode.bits() & 0o707);
        prop_assert_eq!(u32::from(result.bits() & 0o070), perm << 3);
    }

    #[test]
    fn results_stay_in_range(mode in any_mode(), clauses in prop::collection::vec(any_clause(), 1..4)) {
        let result = get_effective_mode(mode, &clauses.join(",")).unwrap();
        prop_assert!(result.bits() <= 0o777);
    }

    #[test]
    fn malformed_clause_is_rejected(mode in any_mode(), good in any_clause()) {
        let expression = format!("{},zz+x", good);
        let is_malformed = matches!(
            get_effective_mode(mode, &expression),
            Err(FormatError::MalformedClause { .. })
        );
        prop_assert!(is_malformed);
        prop_assert!(ModeRequest::parse(&expression).is_err());
    }
}

#[test]
fn literal_scenarios() {
    let eff = |bits: u32, expression: &str| {
        get_effective_mode(Mode::from_bits_truncate(bits), expression)
            .unwrap()
            .bits()
    };

    assert_eq!(eff(0b111000000, "g+x"), 0b111001000);
    assert_eq!(eff(0b101001000, "ugo-x"), 0b100000000);
    assert_eq!(eff(0b111101110, "=r"), 0b100100100);
}
