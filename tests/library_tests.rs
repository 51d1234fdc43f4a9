//! Tests for loading and evaluating formula libraries.

use zzformula::*;

const LIBRARY: &str = r#"{
  "formulas": [
    {
      "name": "slash_damage",
      "expressions": [
        {
          "kind": "clamp",
          "value": {
            "kind": "addition",
            "values": [
              { "kind": "multiply", "values": [
                { "kind": "core_stat_lookup", "stat": "STR" },
                { "kind": "constant", "value": 2.0 }
              ]},
              { "kind": "ability_mastery_lookup" }
            ]
          },
          "min": { "kind": "constant", "value": 0.0 },
          "max": { "kind": "constant", "value": 50.0 }
        }
      ]
    },
    {
      "name": "regen_per_tick",
      "expressions": [
        {
          "kind": "multiply",
          "values": [
            {
              "kind": "derived_stat_lookup",
              "stat": {
                "id": "MAX_HP",
                "modifiers": [
                  { "stat": "CON", "weight": 10, "op": "addition" }
                ]
              }
            },
            { "kind": "divide", "values": [ { "kind": "constant", "value": 20.0 } ] }
          ]
        }
      ]
    },
    {
      "name": "scaled_cost",
      "expressions": [
        { "kind": "constant", "value": 99.0 },
        {
          "kind": "logarithmic",
          "base": { "kind": "constant", "value": 2.0 },
          "power": { "kind": "core_stat_lookup", "stat": "INT" }
        }
      ]
    }
  ]
}"#;

fn hero() -> Character {
    let mut hero = Character::new(
        CharacterData::new("hero")
            .with_core_stat("STR", 12)
            .with_core_stat("CON", 10)
            .with_core_stat("INT", 16),
    );
    hero.add_ability(AbilityId::new("slash"));
    hero
}

/// Loading a document registers every formula by name.
#[test]
fn test_load_library() {
    let library = FormulaLibrary::from_json_str(LIBRARY).unwrap();

    assert_eq!(library.len(), 3);
    assert_eq!(
        library.names().collect::<Vec<_>>(),
        vec!["regen_per_tick", "scaled_cost", "slash_damage"]
    );
    assert!(library.validate().is_ok());
}

/// Library formulas evaluate against a character and ability.
#[test]
fn test_evaluate_loaded_formulas() {
    let library = FormulaLibrary::from_json_str(LIBRARY).unwrap();
    let slash = Ability::new("slash").with_thresholds(vec![4, 8]);
    let hero = hero();
    let ctx = EvalContext::from_args([(&hero).into(), (&slash).into()]);

    // 12 * 2 + 4
    assert_eq!(library.evaluate("slash_damage", &ctx), 28.0);
    // 100 * (1 / 20)
    assert_eq!(library.evaluate("regen_per_tick", &ctx), 5.0);
    // log2(16), the leading 99 is overwritten
    assert!((library.evaluate("scaled_cost", &ctx) - 4.0).abs() < 1e-12);
}

/// Unknown formula names evaluate to 0.
#[test]
fn test_evaluate_unknown_formula() {
    let library = FormulaLibrary::from_json_str(LIBRARY).unwrap();
    assert_eq!(library.evaluate("meteor", &EvalContext::new()), 0.0);
    assert_eq!(
        library.require("meteor").unwrap_err(),
        FormulaError::MissingFormula("meteor".to_string())
    );
}

/// Duplicate names in a document are rejected.
#[test]
fn test_duplicate_names_rejected() {
    let json = r#"{"formulas": [{"name": "a"}, {"name": "a"}]}"#;
    assert_eq!(
        FormulaLibrary::from_json_str(json),
        Err(FormulaError::DuplicateFormula("a".to_string()))
    );
}

/// Formulas missing required children load, but fail validation.
#[test]
fn test_validate_reports_missing_operand() {
    let json = r#"{
        "formulas": [
            { "name": "ok", "expressions": [ { "kind": "euler_constant" } ] },
            { "name": "broken", "expressions": [
                { "kind": "power", "base": { "kind": "constant", "value": 2.0 } }
            ]}
        ]
    }"#;
    let library = FormulaLibrary::from_json_str(json).unwrap();

    assert_eq!(
        library.validate(),
        Err(FormulaError::MissingOperand {
            node: "power",
            operand: "exponent"
        })
    );
    assert_eq!(library.evaluate("broken", &EvalContext::new()), 0.0);
}

/// Null entries are allowed in max/min and skipped.
#[test]
fn test_null_entries_in_max() {
    let json = r#"{
        "formulas": [
            { "name": "best", "expressions": [
                { "kind": "max", "expressions": [
                    { "kind": "constant", "value": 3.0 },
                    null,
                    { "kind": "constant", "value": 7.0 }
                ]}
            ]}
        ]
    }"#;
    let library = FormulaLibrary::from_json_str(json).unwrap();

    assert!(library.validate().is_ok());
    assert_eq!(library.evaluate("best", &EvalContext::new()), 7.0);
}

/// A library written back out loads into an equal library.
#[test]
fn test_library_document_roundtrip() {
    let library = FormulaLibrary::from_json_str(LIBRARY).unwrap();
    let json = library.to_json_string().unwrap();
    let reloaded = FormulaLibrary::from_json_str(&json).unwrap();

    assert_eq!(reloaded, library);
}

/// Libraries can be assembled in code as well.
#[test]
fn test_build_library_in_code() {
    let mut library = FormulaLibrary::new();
    library
        .insert(Formula::new("heal").with_expression(Expression::mul([
            Expression::core_stat("WIS"),
            Expression::constant(3.0),
        ])))
        .unwrap();

    let cleric = CharacterData::new("cleric").with_core_stat("WIS", 9);
    let ctx = EvalContext::new().with_character_data(&cleric);
    assert_eq!(library.evaluate("heal", &ctx), 27.0);
    assert!(library.get("heal").is_some());
}
