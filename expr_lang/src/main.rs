use expr_lang::config::runtime::RuntimeConfig;
use expr_lang::logging;
use expr_lang::pipeline::{load_source, ExpressionLanguage, PipelineError};
use expr_lang::runtime::default_registry;
use expr_lang::utils::SourceMap;
use std::env;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputMode {
    Value,
    Json,
    Ast,
    Tokens,
}

struct Options {
    mode: OutputMode,
    config: Option<String>,
    file: Option<String>,
    expression: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} [--ast|--tokens|--json] <expression>", args[0]);
        eprintln!("       {} --file <path>", args[0]);
        eprintln!("       {} --help", args[0]);
        std::process::exit(1);
    }

    if args[1] == "--help" {
        print_help(&args[0]);
        return Ok(());
    }

    let options = match parse_options(&args[1..]) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    };

    let config = match &options.config {
        Some(path) => RuntimeConfig::load(Path::new(path))?,
        None => RuntimeConfig::default(),
    };

    // Initialize global logging system
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;

    let source = match (&options.file, &options.expression) {
        (Some(path), _) => match load_source(path) {
            Ok(source) => source,
            Err(error) => report(&PipelineError::from(error), None),
        },
        (None, Some(expression)) => expression.clone(),
        (None, None) => String::new(),
    };

    if let Err(error) = run(&options, &config, &source) {
        report(&error, Some(source));
    }

    Ok(())
}

fn report(error: &PipelineError, source: Option<String>) -> ! {
    eprintln!("error[{}]: {}", error.error_code(), error);
    if let (Some(source), Some((line, column))) = (source, error.location()) {
        eprint!("{}", SourceMap::new(source).excerpt(line, column));
    }
    std::process::exit(1);
}

fn run(options: &Options, config: &RuntimeConfig, source: &str) -> Result<(), PipelineError> {
    let language = ExpressionLanguage::with_config(config)?;

    match options.mode {
        OutputMode::Tokens => {
            print!("{}", language.tokenize(source)?.render());
        }
        OutputMode::Ast => {
            println!("{}", language.compile(source)?.render());
        }
        OutputMode::Json => {
            let value = language.evaluate(source, &default_registry())?;
            match serde_json::to_string_pretty(&value) {
                Ok(json) => println!("{}", json),
                Err(_) => println!("{}", value),
            }
        }
        OutputMode::Value => {
            let value = language.evaluate(source, &default_registry())?;
            println!("{}", value);
        }
    }

    Ok(())
}

fn parse_options(args: &[String]) -> Result<Options, String> {
    let mut options = Options {
        mode: OutputMode::Value,
        config: None,
        file: None,
        expression: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--ast" => options.mode = OutputMode::Ast,
            "--tokens" => options.mode = OutputMode::Tokens,
            "--json" => options.mode = OutputMode::Json,
            "--file" | "--config" => {
                let Some(value) = args.get(i + 1) else {
                    return Err(format!("{} requires a path", args[i]));
                };
                if args[i] == "--file" {
                    options.file = Some(value.clone());
                } else {
                    options.config = Some(value.clone());
                }
                i += 1;
            }
            other if other.starts_with("--") => {
                return Err(format!("Unknown option '{}'", other));
            }
            other => {
                if options.expression.is_some() {
                    return Err("Only one expression may be given".to_string());
                }
                options.expression = Some(other.to_string());
            }
        }
        i += 1;
    }

    if options.file.is_none() && options.expression.is_none() {
        return Err("No expression or --file given".to_string());
    }
    Ok(options)
}

fn print_help(program_name: &str) {
    println!("expr_lang v{}", env!("CARGO_PKG_VERSION"));
    println!("Evaluate expressions with the builtin function library");
    println!();
    println!("USAGE:");
    println!("    {} [options] <expression>", program_name);
    println!("    {} [options] --file <path>", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --ast               Print the syntax tree instead of evaluating");
    println!("    --tokens            Print the token stream instead of evaluating");
    println!("    --json              Print the result as pretty JSON");
    println!("    --file <path>       Read the expression from a file");
    println!("    --config <path>     Load runtime preferences from a TOML file");
    println!();
    println!("EXAMPLES:");
    println!("    {} '4 |> add(2) |> div(3)'", program_name);
    println!("    {} --ast '1 + 2 * 3'", program_name);
    println!("    {} --json \"{{a: [1, 2], b}}\"", program_name);
    println!();
    println!("BUILD:");
    println!("    {}", expr_lang::config::build_info::source_info());
}
