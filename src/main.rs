use ReactBalance::cli::cli_main::{run_batch, run_interactive_menu};
use ReactBalance::settings::{ParserSettings, SETTINGS_FILE};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

const USAGE: &str = "usage: ReactBalance [--mineral] [--json] [--settings FILE] [EQUATION ...]
  no equations: interactive menu
  --mineral     target species is the first on the left hand side (default: first on the right)
  --json        print results as JSON";

pub fn main() {
    let mut association = true;
    let mut as_json = false;
    let mut settings_file = SETTINGS_FILE.to_string();
    let mut equations: Vec<String> = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mineral" => association = false,
            "--json" => as_json = true,
            "--settings" => match args.next() {
                Some(file) => settings_file = file,
                None => {
                    eprintln!("{}", USAGE);
                    std::process::exit(2);
                }
            },
            "-h" | "--help" => {
                println!("{}", USAGE);
                return;
            }
            _ => equations.push(arg),
        }
    }

    let settings = ParserSettings::from_file(&settings_file);
    if let Err(e) = TermLogger::init(
        settings.level_filter(),
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialize logger: {}", e);
    }

    if equations.is_empty() {
        run_interactive_menu(settings);
    } else if !run_batch(&equations, association, as_json, settings) {
        std::process::exit(1);
    }
}
