// mentor-client-rs/src/main.rs
// Terminal front end for the mentor service
//
// Reads the solution code from a file (or stdin with "-"), submits it to the
// mentor service and prints the returned feedback as plain text.

use std::env;
use std::io::Read;
use std::process;

use mentor_client::MentorForm;
use shared_types_rs::PATTERN_CHOICES;

fn read_code(source: &str) -> std::io::Result<String> {
    if source == "-" {
        let mut code = String::new();
        std::io::stdin().read_to_string(&mut code)?;
        Ok(code)
    } else {
        std::fs::read_to_string(source)
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <code-file | -> [problem-name] [pattern]", program);
    eprintln!("Patterns:");
    for choice in PATTERN_CHOICES {
        eprintln!("  {:<16} {}", choice.value, choice.label);
    }
}

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage(&args[0]);
        process::exit(2);
    }

    let code = match read_code(&args[1]) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Failed to read {}: {}", args[1], err);
            process::exit(1);
        }
    };

    let mut form = MentorForm::from_env();
    form.set_code(code);
    if let Some(problem_name) = args.get(2) {
        form.set_problem_name(problem_name.clone());
    }
    if let Some(pattern) = args.get(3) {
        form.set_pattern(pattern.clone());
    }

    if !form.can_submit() {
        eprintln!("Nothing to submit: the code input is empty");
        process::exit(1);
    }

    log::info!(
        "Submitting {} bytes of code (pattern: {})",
        form.code().len(),
        form.pattern()
    );

    form.submit().await;

    if !form.error().is_empty() {
        eprintln!("Error: {}", form.error());
        process::exit(1);
    }

    println!("{}", form.feedback());
}
