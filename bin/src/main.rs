use std::{env, fs, process::ExitCode};

use ast::{Block, Element, Expression, Segment, Statement, VariableAccess};
use interpreter::Value;
use log::info;
use serde_json::json;

/// <ul>
///   @foreach (var hobbit in model.hobbits) {
///     var name = hobbit.name;
///     <li>@name (@hobbit.age)</li>
///   }
/// </ul>
fn template() -> Vec<Segment> {
    let hobbit = || Expression::var("hobbit");
    vec![Element::new("ul")
        .with_children(vec![Statement::for_each(
            "hobbit",
            Expression::var("model").member("hobbits"),
            Block::new(vec![
                Statement::assign(VariableAccess::new("name"), hobbit().member("name")).into(),
                Element::new("li")
                    .with_children(vec![
                        Expression::var("name").into(),
                        Segment::text(" ("),
                        hobbit().member("age").into(),
                        Segment::text(")"),
                    ])
                    .into(),
            ]),
        )
        .into()])
        .into()]
}

fn load_model() -> Result<serde_json::Value, String> {
    match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path).map_err(|e| format!("{path}: {e}"))?;
            serde_json::from_str(&text).map_err(|e| format!("{path}: {e}"))
        }
        None => Ok(json!({
            "hobbits": [
                { "name": "Bilbo", "age": 111 },
                { "name": "Frodo", "age": 33 },
            ]
        })),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    let model = match load_model() {
        Ok(model) => model,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let view = match transpiler::transpile(&template()) {
        Ok(view) => view,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Program:\n{}", view.program());

    match view.instantiate(Some(Value::from(model))).render() {
        Ok(html) => {
            println!("{html}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
