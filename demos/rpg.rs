//! RPG Formula Example
//!
//! This example walks through a small combat setup driven by zzformula:
//! - Characters with core stats (STR, INT, CON)
//! - A derived stat (MAX_HP) defined by weighted core stats
//! - Abilities with mastery thresholds
//! - A formula library loaded from JSON
//! - Per-expression breakdowns for debugging
//!
//! Run with `RUST_LOG=zzformula=debug` to see evaluation diagnostics.

use tracing_subscriber::EnvFilter;
use zzformula::*;

// ============================================================================
// Formula Library
// ============================================================================

/// Game formulas, authored as data.
const FORMULAS: &str = r#"{
  "formulas": [
    {
      "name": "slash_damage",
      "expressions": [
        { "kind": "clamp",
          "value": { "kind": "addition", "values": [
            { "kind": "multiply", "values": [
              { "kind": "core_stat_lookup", "stat": "STR" },
              { "kind": "constant", "value": 2.0 }
            ]},
            { "kind": "ability_mastery_lookup" }
          ]},
          "min": { "kind": "constant", "value": 1.0 },
          "max": { "kind": "constant", "value": 60.0 }
        }
      ]
    },
    {
      "name": "fireball_damage",
      "expressions": [
        { "kind": "multiply", "values": [
          { "kind": "power", "base": { "kind": "core_stat_lookup", "stat": "INT" },
                             "exponent": { "kind": "constant", "value": 1.2 } },
          { "kind": "logarithmic", "base": { "kind": "euler_constant" },
                                   "power": { "kind": "ability_mastery_lookup" } }
        ]}
      ]
    },
    {
      "name": "second_wind",
      "expressions": [
        { "kind": "max", "expressions": [
          { "kind": "multiply", "values": [
            { "kind": "derived_stat_lookup", "stat": {
              "id": "MAX_HP",
              "modifiers": [ { "stat": "CON", "weight": 10, "op": "addition" } ]
            }},
            { "kind": "divide", "values": [ { "kind": "constant", "value": 4.0 } ] }
          ]},
          { "kind": "constant", "value": 15.0 }
        ]}
      ]
    }
  ]
}"#;

// ============================================================================
// Characters and Abilities
// ============================================================================

fn warrior() -> Character {
    let mut warrior = Character::new(
        CharacterData::new("warrior")
            .with_core_stat("STR", 16)
            .with_core_stat("INT", 6)
            .with_core_stat("CON", 14)
            .with_derived_adjustment("MAX_HP", 25),
    );
    warrior.add_ability(AbilityId::new("slash"));
    warrior
}

fn mage() -> Character {
    let mut mage = Character::new(
        CharacterData::new("mage")
            .with_core_stat("STR", 5)
            .with_core_stat("INT", 18)
            .with_core_stat("CON", 8),
    );
    mage.add_ability(AbilityId::new("fireball"));
    mage
}

fn print_evaluation(evaluation: &Evaluation) {
    println!("  {} = {:.2}", evaluation.formula, evaluation.value);
    for (step, value) in &evaluation.steps {
        println!("    {} -> {:.2}", step, value);
    }
}

fn main() -> Result<(), FormulaError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== RPG Formula Example ===\n");

    // ========================================================================
    // 1. Load formulas
    // ========================================================================
    println!("1. Loading Formula Library\n");

    let library = FormulaLibrary::from_json_str(FORMULAS)?;
    library.validate()?;
    for name in library.names() {
        println!("  {}", name);
    }
    println!();

    // ========================================================================
    // 2. Set up characters and abilities
    // ========================================================================
    println!("2. Creating Characters\n");

    let slash = Ability::new("slash")
        .with_thresholds(vec![0, 4, 10, 18])
        .with_cost("STAMINA", 5)
        .with_cooldown(1.5);
    let fireball = Ability::new("fireball")
        .with_thresholds(vec![1, 3, 8])
        .with_cost("MANA", 20)
        .with_cooldown(6.0);

    let mut warrior = warrior();
    let mut mage = mage();
    println!("  warrior: STR 16, CON 14, knows slash");
    println!("  mage:    INT 18, CON 8, knows fireball\n");

    // ========================================================================
    // 3. Evaluate as mastery grows
    // ========================================================================
    println!("3. Damage by Mastery Level\n");

    for level in 0..3 {
        let ctx = EvalContext::from_args([(&warrior).into(), (&slash).into()]);
        let slash_damage = library.evaluate("slash_damage", &ctx);

        let ctx = EvalContext::from_args([(&mage).into(), (&fireball).into()]);
        let fireball_damage = library.evaluate("fireball_damage", &ctx);

        println!(
            "  level {}: slash {:.2}, fireball {:.2}",
            level, slash_damage, fireball_damage
        );

        warrior.level_up_ability(&slash.id)?;
        mage.level_up_ability(&fireball.id)?;
    }
    println!();

    // ========================================================================
    // 4. Breakdown
    // ========================================================================
    println!("4. Detailed Breakdown\n");

    for (name, character) in [("warrior", &warrior), ("mage", &mage)] {
        let ctx = EvalContext::new().with_character(character);
        println!("{}:", name);
        print_evaluation(&library.require("second_wind")?.evaluate_detailed(&ctx));
    }
    println!();

    // ========================================================================
    // 5. Misconfigured formulas degrade to zero
    // ========================================================================
    println!("5. Misconfiguration\n");

    let ctx = EvalContext::new();
    let broken = Formula::new("broken").with_expression(Expression::div([
        Expression::constant(10.0),
        Expression::constant(0.0),
    ]));
    println!("  {} -> {:.2}", broken.expressions()[0], broken.evaluate(&ctx));
    println!("  unknown formula -> {:.2}", library.evaluate("meteor", &ctx));

    Ok(())
}
