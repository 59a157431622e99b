//! Validates a person record with built-in rules and one custom rule.
//!
//! Run with `RUST_LOG=rulecheck=debug` to see every rule dispatch.

use rulecheck::prelude::*;
use serde_json::json;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let person = json!({
        "name": "Peter",
        "phone": "12345678900",
        "email": "peter@example.com",
        "age": 24,
        "gender": "male",
        "hobbies": ["coding", "singing", "movies"],
        "studentId": "X2345678",
        "contact": "",
        "smilie": "{doge}",
    });

    let rules: RuleSet = serde_json::from_value(json!({
        "name": "required|string",
        "phone": "string|size:11",
        "email": "required_without:phone|email",
        "gender": "in:male,female",
        "age": "integer|between:0,120|older_than:17",
        "hobbies": "array",
        "studentId": "alpha_num|size:8",
        "contact": "required_without:phone,email",
        "smilie": r"regex:^\{([a-z]*)\}$",
    }))?;

    let validator = Validator::builder()
        .resume_on_failed(true)
        .predicate("older_than", Arity::Exact(1), |_, value, args| {
            match (value.as_f64(), args[0].parse::<f64>()) {
                (Some(age), Ok(bound)) => age > bound,
                _ => false,
            }
        })
        .build()?;

    println!("Record to be tested:\n{person}");
    println!("Validation rules:\n{}", serde_json::to_string(&rules)?);

    let result = validator.validate_value(&person, &rules);
    println!("Result:\n{}", serde_json::to_string(&result)?);

    // Same record, broken on purpose.
    let mut broken = person;
    broken["age"] = json!(15.5);
    broken["gender"] = json!("unknown");
    broken["smilie"] = json!("{Doge}");

    let result = validator.validate_value(&broken, &rules);
    for reject in &result.rejects {
        println!("✗ {reject}");
    }

    Ok(())
}
